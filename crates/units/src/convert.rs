//! Base-unit / display-unit conversion at the fixed 18-decimal scale

use voltmesh_types::{AmountError, AmountResult, BASE_UNITS_PER_TOKEN, DISPLAY_DECIMALS};

/// Convert an integer base-unit amount to its decimal display string.
///
/// The fraction is trimmed of trailing zeros but always keeps at least one
/// digit, so `2 * 10^18` renders as `"2.0"`. Round-trips through
/// [`to_base_units`] for every representable amount.
pub fn to_display(base_units: u128) -> String {
    let whole = base_units / BASE_UNITS_PER_TOKEN;
    let frac = base_units % BASE_UNITS_PER_TOKEN;

    let frac_digits = format!("{:0width$}", frac, width = DISPLAY_DECIMALS as usize);
    let trimmed = frac_digits.trim_end_matches('0');
    if trimmed.is_empty() {
        format!("{}.0", whole)
    } else {
        format!("{}.{}", whole, trimmed)
    }
}

/// Parse a decimal display string into integer base units.
///
/// Rejects empty, non-numeric, negative, and over-precise input (more than
/// 18 fractional digits would silently lose precision) before any network
/// call is made with the value.
pub fn to_base_units(input: &str) -> AmountResult<u128> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AmountError::invalid_amount(input, "empty input"));
    }
    if trimmed.starts_with('-') {
        return Err(AmountError::invalid_amount(input, "negative amount"));
    }
    if trimmed.starts_with('+') {
        return Err(AmountError::invalid_amount(input, "unexpected sign"));
    }

    let (whole_part, frac_part) = match trimmed.split_once('.') {
        Some((w, f)) => (w, f),
        None => (trimmed, ""),
    };
    if whole_part.is_empty() && frac_part.is_empty() {
        return Err(AmountError::invalid_amount(input, "no digits"));
    }
    if frac_part.contains('.') {
        return Err(AmountError::invalid_amount(input, "multiple decimal points"));
    }
    if frac_part.len() > DISPLAY_DECIMALS as usize {
        return Err(AmountError::invalid_amount(
            input,
            "more than 18 fractional digits",
        ));
    }

    let whole: u128 = if whole_part.is_empty() {
        0
    } else {
        whole_part
            .parse()
            .map_err(|_| AmountError::invalid_amount(input, "non-numeric input"))?
    };

    let frac: u128 = if frac_part.is_empty() {
        0
    } else {
        let padded = format!("{:0<width$}", frac_part, width = DISPLAY_DECIMALS as usize);
        padded
            .parse()
            .map_err(|_| AmountError::invalid_amount(input, "non-numeric input"))?
    };

    whole
        .checked_mul(BASE_UNITS_PER_TOKEN)
        .and_then(|scaled| scaled.checked_add(frac))
        .ok_or_else(|| AmountError::invalid_amount(input, "amount too large"))
}

/// Parse a display amount that must be strictly positive.
pub fn to_base_units_positive(input: &str) -> AmountResult<u128> {
    let amount = to_base_units(input)?;
    if amount == 0 {
        return Err(AmountError::invalid_amount(input, "amount must be positive"));
    }
    Ok(amount)
}

/// Estimated cost of a supply: `requested_amount * rate`, computed in
/// exact integer base units before any decimal conversion.
pub fn estimated_cost(requested_amount: u128, rate: u128) -> AmountResult<u128> {
    requested_amount
        .checked_mul(rate)
        .ok_or_else(|| AmountError::overflow("estimated_cost"))
}

/// Effective rate of a settled trade in base units per second:
/// `amount * 10^18 / duration`. `None` for zero-duration settlements or
/// when the scaled amount overflows.
pub fn implied_rate(amount: u128, duration_secs: u64) -> Option<u128> {
    if duration_secs == 0 {
        return None;
    }
    amount
        .checked_mul(BASE_UNITS_PER_TOKEN)
        .map(|scaled| scaled / duration_secs as u128)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_whole_amounts() {
        assert_eq!(to_display(0), "0.0");
        assert_eq!(to_display(BASE_UNITS_PER_TOKEN), "1.0");
        assert_eq!(to_display(2 * BASE_UNITS_PER_TOKEN), "2.0");
    }

    #[test]
    fn test_display_fractional_amounts() {
        assert_eq!(to_display(BASE_UNITS_PER_TOKEN / 2), "0.5");
        assert_eq!(to_display(BASE_UNITS_PER_TOKEN + 250_000_000_000_000_000), "1.25");
        assert_eq!(to_display(1), "0.000000000000000001");
    }

    #[test]
    fn test_parse_basic_amounts() {
        assert_eq!(to_base_units("2.0").unwrap(), 2 * BASE_UNITS_PER_TOKEN);
        assert_eq!(to_base_units("2").unwrap(), 2 * BASE_UNITS_PER_TOKEN);
        assert_eq!(to_base_units("0.5").unwrap(), BASE_UNITS_PER_TOKEN / 2);
        assert_eq!(to_base_units(".5").unwrap(), BASE_UNITS_PER_TOKEN / 2);
        assert_eq!(to_base_units("0").unwrap(), 0);
    }

    #[test]
    fn test_parse_rejects_invalid_input() {
        assert!(to_base_units("").is_err());
        assert!(to_base_units("abc").is_err());
        assert!(to_base_units("-1").is_err());
        assert!(to_base_units("1.2.3").is_err());
        assert!(to_base_units("1,5").is_err());
        assert!(to_base_units(".").is_err());
        // 19 fractional digits would lose precision
        assert!(to_base_units("0.0000000000000000001").is_err());
    }

    #[test]
    fn test_positive_rejects_zero() {
        assert!(to_base_units_positive("0").is_err());
        assert!(to_base_units_positive("0.0").is_err());
        assert_eq!(to_base_units_positive("0.1").unwrap(), BASE_UNITS_PER_TOKEN / 10);
    }

    #[test]
    fn test_roundtrip() {
        let samples: &[u128] = &[
            0,
            1,
            999,
            BASE_UNITS_PER_TOKEN - 1,
            BASE_UNITS_PER_TOKEN,
            BASE_UNITS_PER_TOKEN + 1,
            3 * BASE_UNITS_PER_TOKEN / 2,
            123_456_789_012_345_678_901_234_567,
            u128::MAX / BASE_UNITS_PER_TOKEN * BASE_UNITS_PER_TOKEN,
        ];
        for &x in samples {
            assert_eq!(to_base_units(&to_display(x)).unwrap(), x, "roundtrip of {}", x);
        }
    }

    #[test]
    fn test_estimated_cost_example() {
        // 100 kWh at 0.02 per kWh => 2.0 in display units
        let rate = 2 * BASE_UNITS_PER_TOKEN / 100;
        let cost = estimated_cost(100, rate).unwrap();
        assert_eq!(cost, 2 * BASE_UNITS_PER_TOKEN);
        assert_eq!(to_display(cost), "2.0");
    }

    #[test]
    fn test_estimated_cost_overflow() {
        assert!(estimated_cost(u128::MAX, 2).is_err());
    }

    #[test]
    fn test_implied_rate() {
        assert_eq!(implied_rate(100, 0), None);
        assert_eq!(
            implied_rate(2 * BASE_UNITS_PER_TOKEN, 2),
            Some(BASE_UNITS_PER_TOKEN * BASE_UNITS_PER_TOKEN)
        );
        assert_eq!(implied_rate(u128::MAX, 10), None);
    }
}
