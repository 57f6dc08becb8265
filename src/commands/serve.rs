//! Coordinator server command

use anyhow::{Context, Result};

use crate::coordinator::{CoordinatorConfig, CoordinatorServer};

/// Configuration parameters for the serve command
pub struct ServeParams {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub config_file: Option<String>,
    pub disable_cors: bool,
    pub disable_request_logging: bool,
}

/// Start the coordinator server
pub async fn run(params: ServeParams) -> Result<()> {
    let config = resolve_config(params)?;
    let bind_address = config.bind_address;
    let server = CoordinatorServer::new(config);

    println!("{}", server.info().display());
    println!();
    println!("API Endpoints:");
    println!("  GET  /status          - Full state snapshot");
    println!("  GET  /mode            - Current control mode");
    println!("  GET  /health          - Health check");
    println!("  POST /update_light    - Ingest light reading");
    println!("  POST /update_distance - Ingest distance reading");
    println!("  POST /update_dht      - Ingest temperature/humidity");
    println!("  POST /control_led     - Switch the LED");
    println!("  POST /control_fan     - Set fan speed (mode-gated)");
    println!("  POST /control_mode    - Toggle manual/automatic mode");
    println!();
    println!("Coordinator listening on http://{bind_address}");
    println!("Press Ctrl+C to stop.\n");

    server
        .start_with_shutdown(async {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    tracing::info!("shutdown signal received");
                }
                Err(e) => {
                    tracing::error!("failed to wait for Ctrl+C: {}", e);
                }
            }
        })
        .await?;

    println!("Coordinator stopped.");
    Ok(())
}

/// Merge file config and command-line overrides.
///
/// The config file supplies the base; an explicit `--host`/`--port` or a
/// disable flag wins over it. When neither `--host` nor `--port` is given
/// the file's bind address (or the built-in default) is used as-is.
fn resolve_config(params: ServeParams) -> Result<CoordinatorConfig> {
    let ServeParams {
        host,
        port,
        config_file,
        disable_cors,
        disable_request_logging,
    } = params;

    let base = match config_file {
        Some(path) => CoordinatorConfig::from_file(&path)
            .with_context(|| format!("failed to load config from {path}"))?,
        None => CoordinatorConfig::default(),
    };

    let bind_address = if host.is_none() && port.is_none() {
        base.bind_address
    } else {
        let host = host.unwrap_or_else(|| base.bind_address.ip().to_string());
        let port = port.unwrap_or_else(|| base.bind_address.port());
        format!("{host}:{port}")
            .parse()
            .context("invalid bind address")?
    };

    Ok(CoordinatorConfig::builder()
        .bind_address(bind_address)
        .enable_cors(!disable_cors && base.enable_cors)
        .enable_request_logging(!disable_request_logging && base.enable_request_logging)
        .build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn params() -> ServeParams {
        ServeParams {
            host: None,
            port: None,
            config_file: None,
            disable_cors: false,
            disable_request_logging: false,
        }
    }

    fn config_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{contents}").unwrap();
        file
    }

    #[test]
    fn test_defaults_without_config_file() {
        let config = resolve_config(params()).unwrap();
        assert_eq!(config.bind_address.port(), 5000);
        assert!(config.enable_cors);
        assert!(config.enable_request_logging);
    }

    #[test]
    fn test_config_file_bind_address_is_used() {
        let file = config_file("bind_address = \"127.0.0.1:8123\"\n");
        let mut p = params();
        p.config_file = Some(file.path().display().to_string());

        let config = resolve_config(p).unwrap();
        assert_eq!(config.bind_address.to_string(), "127.0.0.1:8123");
    }

    #[test]
    fn test_cli_port_overrides_config_file_host_kept() {
        let file = config_file("bind_address = \"127.0.0.1:8123\"\n");
        let mut p = params();
        p.config_file = Some(file.path().display().to_string());
        p.port = Some(9000);

        let config = resolve_config(p).unwrap();
        assert_eq!(config.bind_address.to_string(), "127.0.0.1:9000");
    }

    #[test]
    fn test_cli_host_and_port_override_config_file() {
        let file = config_file("bind_address = \"127.0.0.1:8123\"\n");
        let mut p = params();
        p.config_file = Some(file.path().display().to_string());
        p.host = Some("0.0.0.0".to_string());
        p.port = Some(6000);

        let config = resolve_config(p).unwrap();
        assert_eq!(config.bind_address.to_string(), "0.0.0.0:6000");
    }

    #[test]
    fn test_disable_flags_override_config_file() {
        let file = config_file("enable_cors = true\nenable_request_logging = true\n");
        let mut p = params();
        p.config_file = Some(file.path().display().to_string());
        p.disable_cors = true;

        let config = resolve_config(p).unwrap();
        assert!(!config.enable_cors);
        assert!(config.enable_request_logging);
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let mut p = params();
        p.config_file = Some("/nonexistent/smartroom.toml".to_string());

        assert!(resolve_config(p).is_err());
    }
}
