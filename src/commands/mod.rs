//! CLI command implementations

pub mod control;
pub mod serve;
pub mod watch;
