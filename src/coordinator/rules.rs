//! Derivation rules for computed state
//!
//! Pure functions that turn raw sensor readings into derived actuator state.
//! These are kept free of I/O and store access so the store can evaluate them
//! while holding its write lock.

/// Distance below which the proximity buzzer fires, in centimeters.
pub const ALARM_THRESHOLD_CM: i64 = 20;

/// Decide whether the proximity alarm is active for a distance reading.
///
/// Total over all inputs. A negative reading is the ultrasonic sensor's
/// "no echo" sentinel; it still satisfies the `< 20` rule and therefore
/// triggers the alarm.
pub fn derive_alarm(distance: i64) -> bool {
    distance < ALARM_THRESHOLD_CM
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_alarm_boundary() {
        assert!(derive_alarm(19));
        assert!(!derive_alarm(20));
        assert!(!derive_alarm(21));
    }

    #[test]
    fn test_alarm_negative_sentinel() {
        assert!(derive_alarm(-1));
        assert!(derive_alarm(i64::MIN));
    }

    #[test]
    fn test_alarm_far_distance() {
        assert!(!derive_alarm(400));
        assert!(!derive_alarm(i64::MAX));
    }

    proptest! {
        #[test]
        fn alarm_matches_threshold_for_all_distances(d in any::<i64>()) {
            prop_assert_eq!(derive_alarm(d), d < ALARM_THRESHOLD_CM);
        }
    }
}
