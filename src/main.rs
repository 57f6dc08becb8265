use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use smartroom::commands::{control, serve, watch};

#[derive(Parser)]
#[command(
    name = "smartroom",
    version,
    about = "Supervisory coordinator for room sensors and actuators",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json)
    #[arg(long, global = true, default_value = "text")]
    log_format: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the coordinator server
    Serve {
        /// Host to bind to (default 0.0.0.0, unless set in the config file)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (default 5000, unless set in the config file)
        #[arg(short, long)]
        port: Option<u16>,

        /// Path to a TOML config file
        #[arg(short, long)]
        config: Option<String>,

        /// Disable CORS
        #[arg(long, default_value = "false")]
        no_cors: bool,

        /// Disable per-request trace logging
        #[arg(long, default_value = "false")]
        no_request_log: bool,
    },

    /// Poll the coordinator and print each snapshot
    Watch {
        /// Coordinator base URL
        #[arg(short, long, default_value = "http://localhost:5000")]
        url: String,

        /// Poll interval in milliseconds
        #[arg(short, long, default_value = "2000")]
        interval: u64,
    },

    /// Fetch and print a single status snapshot
    Status {
        /// Coordinator base URL
        #[arg(short, long, default_value = "http://localhost:5000")]
        url: String,
    },

    /// Switch the LED on or off
    Led {
        /// Desired state
        #[arg(value_parser = ["on", "off"])]
        state: String,

        /// Coordinator base URL
        #[arg(short, long, default_value = "http://localhost:5000")]
        url: String,
    },

    /// Set the fan speed (rejected while in automatic mode)
    Fan {
        /// Desired speed, nominally 0-255
        speed: i64,

        /// Coordinator base URL
        #[arg(short, long, default_value = "http://localhost:5000")]
        url: String,
    },

    /// Toggle manual/automatic control mode
    Mode {
        /// Coordinator base URL
        #[arg(short, long, default_value = "http://localhost:5000")]
        url: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_tracing(&cli.log_format, cli.verbose)?;

    match cli.command {
        Commands::Serve {
            host,
            port,
            config,
            no_cors,
            no_request_log,
        } => {
            tracing::info!(host = ?host, port = ?port, "starting serve command");
            serve::run(serve::ServeParams {
                host,
                port,
                config_file: config,
                disable_cors: no_cors,
                disable_request_logging: no_request_log,
            })
            .await?;
        }

        Commands::Watch { url, interval } => {
            tracing::info!(url = %url, interval_ms = %interval, "starting watch command");
            watch::run(watch::WatchParams {
                url,
                interval_ms: interval,
            })
            .await?;
        }

        Commands::Status { url } => {
            control::status(&url).await?;
        }

        Commands::Led { state, url } => {
            control::led(&url, state == "on").await?;
        }

        Commands::Fan { speed, url } => {
            control::fan(&url, speed).await?;
        }

        Commands::Mode { url } => {
            control::mode(&url).await?;
        }
    }

    Ok(())
}

fn setup_tracing(format: &str, verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        tracing_subscriber::EnvFilter::new("smartroom=debug,info")
    } else {
        tracing_subscriber::EnvFilter::new("smartroom=info,warn")
    };

    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }

    Ok(())
}
