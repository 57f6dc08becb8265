//! Control-mode gate for actuator writes
//!
//! Tracks the process-wide MANUAL/AUTOMATIC switch and decides whether an
//! operator-issued fan-speed command is honored. In AUTOMATIC mode an
//! external policy is expected to drive the fan from the sensed temperature,
//! so manual writes are rejected to keep the two from fighting. LED commands
//! are never gated.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};

// ============================================================================
// Control Mode
// ============================================================================

/// Process-wide actuator control mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlMode {
    /// Operator commands drive the actuators
    Manual,

    /// An external policy drives the fan; operator fan writes are rejected
    Automatic,
}

impl ControlMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Automatic => "automatic",
        }
    }

    /// Whether an operator fan-speed write is honored in this mode
    pub fn allows_fan_write(&self) -> bool {
        matches!(self, Self::Manual)
    }
}

impl Default for ControlMode {
    fn default() -> Self {
        Self::Manual
    }
}

impl std::fmt::Display for ControlMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Mode Gate
// ============================================================================

/// Gate deciding whether operator actuator commands are honored
///
/// Two states, starting in [`ControlMode::Manual`]. Transitions happen only
/// through an explicit [`toggle`](ModeGate::toggle); there are no timeouts or
/// sensor-driven transitions.
#[derive(Debug)]
pub struct ModeGate {
    manual: AtomicBool,
}

impl ModeGate {
    pub fn new() -> Self {
        Self {
            manual: AtomicBool::new(true),
        }
    }

    /// Get the current mode
    pub fn current(&self) -> ControlMode {
        if self.manual.load(Ordering::SeqCst) {
            ControlMode::Manual
        } else {
            ControlMode::Automatic
        }
    }

    /// Flip the mode, returning the new state
    pub fn toggle(&self) -> ControlMode {
        let was_manual = self.manual.fetch_xor(true, Ordering::SeqCst);
        if was_manual {
            ControlMode::Automatic
        } else {
            ControlMode::Manual
        }
    }

    /// True iff a fan-speed write from an operator should be applied
    pub fn allow_fan_write(&self) -> bool {
        self.current().allows_fan_write()
    }
}

impl Default for ModeGate {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
