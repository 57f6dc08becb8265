//! One-shot read and control commands

use anyhow::{Context, Result};

use crate::coordinator::{ClientConfig, PollClient};

fn client(url: &str) -> Result<PollClient> {
    PollClient::new(ClientConfig::new(url)).context("failed to create client")
}

/// Fetch and print a single status snapshot
pub async fn status(url: &str) -> Result<()> {
    let snapshot = client(url)?
        .fetch_status()
        .await
        .context("status request failed")?;

    println!("Light Level: {}", snapshot.light_level);
    println!("Distance:    {} cm", snapshot.distance);
    println!("Temperature: {:.1} C", snapshot.temperature);
    println!("Humidity:    {:.1} %", snapshot.humidity);
    println!(
        "LED:         {}",
        if snapshot.led_status { "ON" } else { "OFF" }
    );
    println!("Fan Speed:   {}", snapshot.fan_speed);
    println!(
        "Buzzer:      {}",
        if snapshot.buzzer_status { "ALERT" } else { "NORMAL" }
    );

    Ok(())
}

/// Switch the LED on or off
pub async fn led(url: &str, on: bool) -> Result<()> {
    let stored = client(url)?
        .set_led(on)
        .await
        .context("led request failed")?;

    println!("LED is now {}", if stored { "ON" } else { "OFF" });
    Ok(())
}

/// Request a fan speed; reports a mode-gate rejection instead of hiding it
pub async fn fan(url: &str, speed: i64) -> Result<()> {
    let write = client(url)?
        .set_fan(speed)
        .await
        .context("fan request failed")?;

    if write.applied {
        println!("Fan speed set to {}", write.fan_speed);
    } else {
        println!(
            "Fan write rejected (coordinator is in {} mode); speed remains {}",
            write.mode, write.fan_speed
        );
    }
    Ok(())
}

/// Toggle the coordinator's control mode
pub async fn mode(url: &str) -> Result<()> {
    let mode = client(url)?
        .toggle_mode()
        .await
        .context("mode request failed")?;

    println!("Control mode is now {mode}");
    Ok(())
}
