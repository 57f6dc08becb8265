//! Continuous status watcher command
//!
//! A headless stand-in for the dashboard: polls the coordinator on a fixed
//! cadence and prints one line per snapshot. Runs until Ctrl+C.

use anyhow::{Context, Result};
use std::time::Duration;

use crate::coordinator::{ClientConfig, PollClient, StatusSnapshot};

/// Configuration parameters for the watch command
pub struct WatchParams {
    pub url: String,
    pub interval_ms: u64,
}

/// Poll the coordinator and print each snapshot
pub async fn run(params: WatchParams) -> Result<()> {
    let config = ClientConfig::new(&params.url)
        .with_poll_interval(Duration::from_millis(params.interval_ms));
    let client = PollClient::new(config).context("failed to create poll client")?;

    println!("Watching coordinator at {}", params.url);
    println!("Press Ctrl+C to stop.\n");

    tokio::select! {
        _ = client.watch(print_snapshot) => {}
        result = tokio::signal::ctrl_c() => {
            result.context("failed to wait for Ctrl+C")?;
            println!("\nStopped watching.");
        }
    }

    Ok(())
}

fn print_snapshot(snapshot: &StatusSnapshot) {
    println!(
        "light={} distance={}cm temp={:.1}C humidity={:.1}% led={} fan={} buzzer={}",
        snapshot.light_level,
        snapshot.distance,
        snapshot.temperature,
        snapshot.humidity,
        if snapshot.led_status { "ON" } else { "OFF" },
        snapshot.fan_speed,
        if snapshot.buzzer_status { "ALERT" } else { "NORMAL" },
    );
}
