//! Closing speed and raw time-to-collision

use crate::sample::Sample;

/// Closing dynamics for one sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClosingState {
    /// Vehicle speed minus object speed (m/s), positive when closing
    pub relative_speed: f64,

    /// Raw time to collision (s), `f64::INFINITY` when not closing
    pub raw_ttc: f64,
}

impl ClosingState {
    /// Whether the vehicle is gaining on the object
    pub fn is_closing(&self) -> bool {
        self.relative_speed > 0.0
    }
}

/// Evaluate closing dynamics under a constant-velocity assumption.
///
/// A relative speed of exactly zero is treated as non-closing, so the
/// division below never sees a zero divisor. The sign of
/// `object_position_x` is not checked.
pub fn evaluate(vehicle_speed: f64, object_speed: f64, object_position_x: f64) -> ClosingState {
    let relative_speed = vehicle_speed - object_speed;

    let raw_ttc = if relative_speed <= 0.0 {
        f64::INFINITY
    } else {
        object_position_x / relative_speed
    };

    ClosingState {
        relative_speed,
        raw_ttc,
    }
}

/// Evaluate closing dynamics for a sample
pub fn evaluate_sample(sample: &Sample) -> ClosingState {
    evaluate(
        sample.vehicle_speed,
        sample.object_speed,
        sample.object_position_x,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closing() {
        let state = evaluate(20.0, 10.0, 22.0);
        assert!((state.relative_speed - 10.0).abs() < 1e-9);
        assert!((state.raw_ttc - 2.2).abs() < 1e-9);
        assert!(state.is_closing());
    }

    #[test]
    fn test_receding() {
        let state = evaluate(10.0, 15.0, 20.0);
        assert!((state.relative_speed + 5.0).abs() < 1e-9);
        assert!(state.raw_ttc.is_infinite());
        assert!(!state.is_closing());
    }

    #[test]
    fn test_equal_speeds_never_divide() {
        let state = evaluate(12.0, 12.0, 30.0);
        assert_eq!(state.relative_speed, 0.0);
        assert_eq!(state.raw_ttc, f64::INFINITY);
    }

    #[test]
    fn test_zero_distance_while_closing() {
        let state = evaluate(15.0, 5.0, 0.0);
        assert_eq!(state.raw_ttc, 0.0);
    }

    #[test]
    fn test_negative_distance_not_validated() {
        let state = evaluate(15.0, 5.0, -10.0);
        assert!((state.raw_ttc + 1.0).abs() < 1e-9);
    }
}
