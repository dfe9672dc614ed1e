//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

/// Floor a f64 and clamp it to the u64 range, returning 0 for non-finite
/// or negative values.
#[must_use]
pub fn floor_f64_to_u64(value: f64) -> u64 {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    let max = cast::<u64, f64>(u64::MAX).unwrap_or(f64::MAX);
    let clamped = value.clamp(0.0, max).floor();
    cast::<f64, u64>(clamped).unwrap_or(0)
}

/// Clamp elapsed time to a non-negative finite value, returning 0.0 for
/// NaN or negative inputs. Guards against clocks that step backwards.
#[must_use]
pub fn non_negative_secs(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floor_handles_non_finite_and_negatives() {
        assert_eq!(floor_f64_to_u64(f64::NAN), 0);
        assert_eq!(floor_f64_to_u64(-3.5), 0);
        assert_eq!(floor_f64_to_u64(17.9), 17);
        assert_eq!(floor_f64_to_u64(f64::INFINITY), 0);
    }

    #[test]
    fn elapsed_clamp_rejects_backward_clock() {
        assert!((non_negative_secs(-0.5) - 0.0).abs() < f64::EPSILON);
        assert!((non_negative_secs(f64::NAN) - 0.0).abs() < f64::EPSILON);
        assert!((non_negative_secs(1.25) - 1.25).abs() < f64::EPSILON);
    }
}
