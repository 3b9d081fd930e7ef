//! Duration formatting and elapsed-time math for derived snapshot fields

use voltmesh_types::{SECS_PER_DAY, SECS_PER_HOUR, SECS_PER_MINUTE};

/// Format a duration as its largest whole unit, integer-floored.
///
/// 90 seconds is "1 minutes", not "2 minutes"; the cascade is
/// seconds / minutes / hours / days.
pub fn format_duration(secs: u64) -> String {
    if secs < SECS_PER_MINUTE {
        format!("{} seconds", secs)
    } else if secs < SECS_PER_HOUR {
        format!("{} minutes", secs / SECS_PER_MINUTE)
    } else if secs < SECS_PER_DAY {
        format!("{} hours", secs / SECS_PER_HOUR)
    } else {
        format!("{} days", secs / SECS_PER_DAY)
    }
}

/// Elapsed seconds since `start`, clamped to zero to tolerate clock skew
/// between the client and the chain.
pub fn elapsed_since(start: u64, now: u64) -> u64 {
    now.saturating_sub(start)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration_floors() {
        assert_eq!(format_duration(0), "0 seconds");
        assert_eq!(format_duration(59), "59 seconds");
        assert_eq!(format_duration(60), "1 minutes");
        assert_eq!(format_duration(90), "1 minutes");
        assert_eq!(format_duration(119), "1 minutes");
        assert_eq!(format_duration(3_599), "59 minutes");
        assert_eq!(format_duration(3_600), "1 hours");
        assert_eq!(format_duration(86_399), "23 hours");
        assert_eq!(format_duration(86_400), "1 days");
        assert_eq!(format_duration(200_000), "2 days");
    }

    #[test]
    fn test_elapsed_clamps_clock_skew() {
        assert_eq!(elapsed_since(100, 190), 90);
        assert_eq!(elapsed_since(200, 190), 0);
    }
}
