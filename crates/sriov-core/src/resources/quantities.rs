use crate::{Result, SriovError};

/// Whole number of constrained-resource slots (VFs)
pub type SlotCount = u64;

/// Parse a Kubernetes quantity string (e.g., "8", "1k", "2Ki", "1e3", "1500m")
/// into whole slots.
///
/// Fractional values round up, like `Quantity.Value()` does. Allocated and
/// promised counts are whole numbers, so `total > allocated + promised` has
/// the same answer for the rounded total as for the exact decimal.
pub fn parse_slot_quantity(s: &str) -> Result<SlotCount> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(SriovError::invalid_quantity(s, "empty quantity"));
    }

    let (negative, unsigned) = match trimmed.as_bytes()[0] {
        b'-' => (true, &trimmed[1..]),
        b'+' => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let number_end = unsigned
        .find(|c: char| !c.is_ascii_digit() && c != '.')
        .unwrap_or(unsigned.len());
    let (number, suffix) = unsigned.split_at(number_end);

    let (int_part, frac_part) = match number.split_once('.') {
        Some((i, f)) => (i, f),
        None => (number, ""),
    };
    if int_part.is_empty() && frac_part.is_empty() {
        return Err(SriovError::invalid_quantity(s, "missing numeric value"));
    }
    if frac_part.contains('.') {
        return Err(SriovError::invalid_quantity(s, "more than one decimal point"));
    }

    let mut mantissa: u128 = 0;
    for digit in int_part.bytes().chain(frac_part.bytes()) {
        mantissa = mantissa
            .checked_mul(10)
            .and_then(|m| m.checked_add(u128::from(digit - b'0')))
            .ok_or_else(|| SriovError::invalid_quantity(s, "value too large"))?;
    }

    let (multiplier, exponent) = parse_suffix(suffix).ok_or_else(|| {
        SriovError::invalid_quantity(s, format!("unknown suffix '{}'", suffix))
    })?;

    if negative && mantissa != 0 {
        return Err(SriovError::invalid_quantity(s, "capacity cannot be negative"));
    }

    let numerator = mantissa
        .checked_mul(multiplier)
        .ok_or_else(|| SriovError::invalid_quantity(s, "value too large"))?;
    let net_exponent = exponent.saturating_sub(frac_part.len() as i32);

    let value = if numerator == 0 {
        0
    } else if net_exponent >= 0 {
        10u128
            .checked_pow(net_exponent as u32)
            .and_then(|scale| numerator.checked_mul(scale))
            .ok_or_else(|| SriovError::invalid_quantity(s, "value too large"))?
    } else {
        match 10u128.checked_pow(net_exponent.unsigned_abs()) {
            Some(scale) => numerator.div_ceil(scale),
            // The divisor exceeds any representable numerator
            None => 1,
        }
    };

    SlotCount::try_from(value).map_err(|_| SriovError::invalid_quantity(s, "value too large"))
}

/// Binary multiplier and decimal exponent of a quantity suffix
fn parse_suffix(suffix: &str) -> Option<(u128, i32)> {
    let parsed = match suffix {
        "" => (1, 0),
        "Ki" => (1 << 10, 0),
        "Mi" => (1 << 20, 0),
        "Gi" => (1 << 30, 0),
        "Ti" => (1 << 40, 0),
        "Pi" => (1 << 50, 0),
        "Ei" => (1 << 60, 0),
        "n" => (1, -9),
        "u" => (1, -6),
        "m" => (1, -3),
        "k" => (1, 3),
        "M" => (1, 6),
        "G" => (1, 9),
        "T" => (1, 12),
        "P" => (1, 15),
        "E" => (1, 18),
        _ => {
            let exponent = suffix
                .strip_prefix('e')
                .or_else(|| suffix.strip_prefix('E'))?;
            if exponent.is_empty() {
                return None;
            }
            (1, exponent.parse::<i32>().ok()?)
        }
    };
    Some(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain() {
        assert_eq!(parse_slot_quantity("0").unwrap(), 0);
        assert_eq!(parse_slot_quantity("1").unwrap(), 1);
        assert_eq!(parse_slot_quantity("64").unwrap(), 64);
        assert_eq!(parse_slot_quantity(" 7 ").unwrap(), 7);
        assert_eq!(parse_slot_quantity("+3").unwrap(), 3);
    }

    #[test]
    fn test_parse_suffixes() {
        assert_eq!(parse_slot_quantity("1k").unwrap(), 1000);
        assert_eq!(parse_slot_quantity("1Ki").unwrap(), 1024);
        assert_eq!(parse_slot_quantity("2M").unwrap(), 2_000_000);
        assert_eq!(parse_slot_quantity("1e3").unwrap(), 1000);
        assert_eq!(parse_slot_quantity("1E2").unwrap(), 100);
        assert_eq!(parse_slot_quantity("2000m").unwrap(), 2);
        assert_eq!(parse_slot_quantity("1.5Ki").unwrap(), 1536);
        assert_eq!(parse_slot_quantity("1E").unwrap(), 1_000_000_000_000_000_000);
    }

    #[test]
    fn test_parse_fraction_rounds_up() {
        assert_eq!(parse_slot_quantity("1500m").unwrap(), 2);
        assert_eq!(parse_slot_quantity("0.5").unwrap(), 1);
        assert_eq!(parse_slot_quantity("1.0").unwrap(), 1);
        assert_eq!(parse_slot_quantity("1n").unwrap(), 1);
        assert_eq!(parse_slot_quantity("0m").unwrap(), 0);
        assert_eq!(parse_slot_quantity("1e-50").unwrap(), 1);
    }

    #[test]
    fn test_parse_rejects_invalid() {
        assert!(parse_slot_quantity("").is_err());
        assert!(parse_slot_quantity("-1").is_err());
        assert!(parse_slot_quantity("abc").is_err());
        assert!(parse_slot_quantity("1x").is_err());
        assert!(parse_slot_quantity("1e").is_err());
        assert!(parse_slot_quantity(".").is_err());
        assert!(parse_slot_quantity("1.2.3").is_err());
        assert!(parse_slot_quantity("99999999999999999999999").is_err());
    }

    #[test]
    fn test_negative_zero_is_zero() {
        assert_eq!(parse_slot_quantity("-0").unwrap(), 0);
    }

    #[test]
    fn test_zero_with_huge_exponent() {
        assert_eq!(parse_slot_quantity("0e999").unwrap(), 0);
        assert_eq!(parse_slot_quantity("0.0E999").unwrap(), 0);
        assert_eq!(parse_slot_quantity("0e-999").unwrap(), 0);
        assert!(parse_slot_quantity("1e999").is_err());
        assert_eq!(parse_slot_quantity("1e-999").unwrap(), 1);
    }
}
