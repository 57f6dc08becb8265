//! Authoritative in-memory state store
//!
//! Single source of truth for sensor readings, actuator state, and derived
//! state. All fields live behind one `RwLock`; a writer holds the write lock
//! for the whole mutation, so the distance reading and the alarm derived from
//! it are never observable in a mutually inconsistent pair. Readers take the
//! read lock and clone, which keeps snapshots consistent without exposing the
//! lock to callers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use super::mode::ControlMode;
use super::rules;

// ============================================================================
// State Snapshot
// ============================================================================

/// Point-in-time copy of the full coordinator state
///
/// Sensor fields are mutated only by ingestion calls, actuator fields only by
/// control calls, and `alarm_active` only by the distance rule. The struct
/// exists for the lifetime of the process, initialized to zero values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// Latest ambient light reading (unit-less, non-negative)
    pub light_level: u64,

    /// Latest distance reading in centimeters (negative = no echo)
    pub distance: i64,

    /// Latest temperature reading in degrees
    pub temperature: f64,

    /// Latest relative humidity reading in percent
    pub humidity: f64,

    /// LED actuator state
    pub led_on: bool,

    /// Fan speed, nominally 0-255 (advisory range, not clamped here)
    pub fan_speed: i64,

    /// Proximity alarm, derived from `distance` and never written directly
    pub alarm_active: bool,

    /// When any field last changed
    pub updated_at: DateTime<Utc>,
}

impl StateSnapshot {
    fn zeroed() -> Self {
        Self {
            light_level: 0,
            distance: 0,
            temperature: 0.0,
            humidity: 0.0,
            led_on: false,
            fan_speed: 0,
            alarm_active: rules::derive_alarm(0),
            updated_at: Utc::now(),
        }
    }
}

// ============================================================================
// State Store
// ============================================================================

/// Concurrently-accessed store owning all sensor and actuator fields
///
/// No other component retains a mutable reference to the fields; consumers
/// only ever hold [`StateSnapshot`] copies.
#[derive(Debug)]
pub struct StateStore {
    inner: RwLock<StateSnapshot>,
}

impl StateStore {
    /// Create a store with all fields at their zero values
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(StateSnapshot::zeroed()),
        }
    }

    /// Get a consistent copy of all fields
    ///
    /// Never fails and has no side effects. May run concurrently with other
    /// snapshot reads but never observes a partially-applied mutation.
    pub async fn get_snapshot(&self) -> StateSnapshot {
        self.inner.read().await.clone()
    }

    /// Overwrite the light reading
    pub async fn set_light(&self, level: u64) {
        let mut state = self.inner.write().await;
        state.light_level = level;
        state.updated_at = Utc::now();
    }

    /// Overwrite the distance reading and recompute the alarm
    ///
    /// Both fields are updated under the same write lock, so no snapshot can
    /// pair this distance with a stale alarm value. Returns the new alarm
    /// state.
    pub async fn set_distance(&self, distance: i64) -> bool {
        let mut state = self.inner.write().await;
        state.distance = distance;
        state.alarm_active = rules::derive_alarm(distance);
        state.updated_at = Utc::now();
        state.alarm_active
    }

    /// Overwrite the temperature and humidity readings
    pub async fn set_dht(&self, temperature: f64, humidity: f64) {
        let mut state = self.inner.write().await;
        state.temperature = temperature;
        state.humidity = humidity;
        state.updated_at = Utc::now();
    }

    /// Overwrite the LED state (never mode-gated)
    pub async fn set_led(&self, on: bool) {
        let mut state = self.inner.write().await;
        state.led_on = on;
        state.updated_at = Utc::now();
    }

    /// Apply a fan-speed write if the given mode allows it
    ///
    /// Returns whether the write was applied. In AUTOMATIC mode the stored
    /// speed is left untouched.
    pub async fn try_set_fan(&self, speed: i64, mode: ControlMode) -> bool {
        if !mode.allows_fan_write() {
            return false;
        }

        let mut state = self.inner.write().await;
        state.fan_speed = speed;
        state.updated_at = Utc::now();
        true
    }
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
