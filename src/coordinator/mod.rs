//! Shared-state coordinator for room sensors and actuators
//!
//! This module provides the authoritative store of sensor/actuator state,
//! the rule deriving the proximity alarm, the manual/automatic mode gate,
//! and the HTTP surface that ties them together.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │        Coordinator Server           │
//! │                                     │
//! │  ┌──────────────────────────────┐   │
//! │  │         State Store          │   │
//! │  │  - Atomic snapshots          │   │
//! │  │  - Field-level writes        │   │
//! │  │  - distance + alarm together │   │
//! │  └──────────────────────────────┘   │
//! │                                     │
//! │  ┌──────────────┐ ┌─────────────┐   │
//! │  │  Rule Engine │ │  Mode Gate  │   │
//! │  │  alarm < 20cm│ │ manual/auto │   │
//! │  └──────────────┘ └─────────────┘   │
//! │                                     │
//! │  ┌──────────────────────────────┐   │
//! │  │          REST API            │   │
//! │  │  GET  /status                │   │
//! │  │  POST /update_light          │   │
//! │  │  POST /update_distance       │   │
//! │  │  POST /update_dht            │   │
//! │  │  POST /control_led           │   │
//! │  │  POST /control_fan           │   │
//! │  │  POST /control_mode          │   │
//! │  └──────────────────────────────┘   │
//! └─────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use smartroom::coordinator::{CoordinatorConfig, CoordinatorServer};
//!
//! let config = CoordinatorConfig::default();
//! let server = CoordinatorServer::new(config);
//! server.start().await?;
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod mode;
pub mod rules;
pub mod server;
pub mod store;

// Re-export main types
pub use client::{ClientConfig, FanWrite, PollClient, StatusSnapshot};
pub use config::CoordinatorConfig;
pub use mode::{ControlMode, ModeGate};
pub use rules::{derive_alarm, ALARM_THRESHOLD_CM};
pub use server::{AppState, CoordinatorServer};
pub use store::{StateSnapshot, StateStore};
