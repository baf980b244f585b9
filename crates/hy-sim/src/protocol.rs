//! Delimited-text sample protocol.
//!
//! Fields inside a sample are joined by `,`, samples by `;`, and whole
//! trajectories by `|`. Numbers are rounded to [`SIGNIFICANT_DIGITS`]
//! significant digits, then written in the shortest form that parses back
//! to the rounded value.

use hy_core::Real;

use crate::error::SimError;

pub const FIELD_DELIM: &str = ",";
pub const SAMPLE_DELIM: &str = ";";
pub const TRAJECTORY_DELIM: &str = "|";

/// Prefix of a failed slot in batch output, followed by the error kind.
pub const FAILURE_MARKER: char = '!';

pub const SIGNIFICANT_DIGITS: usize = 10;

pub fn format_value(value: Real) -> String {
    let rounded: Real = format!("{:.*e}", SIGNIFICANT_DIGITS - 1, value)
        .parse()
        .unwrap_or(value);
    if rounded == 0.0 {
        // also folds -0.0
        return "0.0".to_string();
    }
    format!("{rounded:?}")
}

/// `mode,coord_0,...,coord_{n-1}`
pub fn format_sample(mode: &str, state: &[Real]) -> String {
    let mut out = String::from(mode);
    for &v in state {
        out.push_str(FIELD_DELIM);
        out.push_str(&format_value(v));
    }
    out
}

/// `start_value,end_value`
pub fn format_pair(start: Real, end: Real) -> String {
    format!("{}{FIELD_DELIM}{}", format_value(start), format_value(end))
}

/// `!kind`
pub fn format_failure(err: &SimError) -> String {
    format!("{FAILURE_MARKER}{}", err.kind())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_always_carry_a_decimal_point_or_exponent() {
        assert_eq!(format_value(0.0), "0.0");
        assert_eq!(format_value(-0.0), "0.0");
        assert_eq!(format_value(4.0), "4.0");
        assert_eq!(format_value(-2.5), "-2.5");
        assert_eq!(format_value(1e-7), "1e-7");
    }

    #[test]
    fn values_absorb_integration_round_off() {
        assert_eq!(format_value(3.9999999999996), "4.0");
        assert_eq!(format_value(0.1 * 4.0), "0.4");
        assert_eq!(format_value(0.30000000000000004), "0.3");
    }

    #[test]
    fn values_round_trip_within_precision() {
        for v in [std::f64::consts::PI, -1.234_567_890_123e5, 6.02e23, 1.5e-12] {
            let back: Real = format_value(v).parse().unwrap();
            assert!(((back - v) / v).abs() < 1e-9, "{v} -> {back}");
        }
    }

    #[test]
    fn samples_and_pairs() {
        assert_eq!(format_sample("on", &[2.0, 4.0]), "on,2.0,4.0");
        assert_eq!(format_pair(0.0, 4.0), "0.0,4.0");
        assert_eq!(
            format_failure(&SimError::StepBudgetExceeded { max_steps: 1 }),
            "!step_budget_exceeded"
        );
    }
}
