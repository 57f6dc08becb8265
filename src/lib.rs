//! smartroom - Supervisory coordinator for room sensors and actuators
//!
//! External sensor reporters (light, distance, temperature/humidity) push
//! readings in over HTTP; dashboard clients poll aggregated state out and
//! issue actuator commands (LED, fan). The coordinator owns all state behind
//! a single synchronization boundary and derives the proximity buzzer from
//! the distance reading.
//!
//! # Architecture
//!
//! - [`coordinator::store`] - Authoritative state store with atomic snapshots
//! - [`coordinator::rules`] - Pure derivation rules (proximity alarm)
//! - [`coordinator::mode`] - Manual/automatic control-mode gate
//! - [`coordinator::api`] / [`coordinator::server`] - HTTP sync endpoint
//! - [`coordinator::client`] - Polling/control client for consumers
//! - [`commands`] - CLI entry points
//!
//! # Example
//!
//! ```no_run
//! use smartroom::coordinator::{CoordinatorConfig, CoordinatorServer};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let server = CoordinatorServer::new(CoordinatorConfig::default());
//!     server.start().await?;
//!     Ok(())
//! }
//! ```

pub mod commands;
pub mod coordinator;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::coordinator::{
        ClientConfig, ControlMode, CoordinatorConfig, CoordinatorServer, ModeGate, PollClient,
        StateSnapshot, StateStore, StatusSnapshot,
    };
}
