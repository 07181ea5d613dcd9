//! Numeric formatting helpers.

use crate::{LatticeError, LatticeResult};

/// Format an integer as `0x`-prefixed upper-case hex.
#[must_use]
pub fn to_hex(value: i64) -> String {
    format!("0x{value:X}")
}

/// Parse a hex string, with or without a leading `0x`.
pub fn from_hex(value: &str) -> LatticeResult<i64> {
    let digits = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value);

    i64::from_str_radix(digits, 16)
        .map_err(|e| LatticeError::invalid_input(format!("invalid hex '{value}': {e}")))
}

/// Format an integer with thousands separators (`1,234,567`).
#[must_use]
pub fn format_grouped(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    if value < 0 {
        out.push('-');
    }

    let first_group = digits.len() % 3;
    if first_group > 0 {
        out.push_str(&digits[..first_group]);
    }
    for (i, chunk) in digits.as_bytes()[first_group..].chunks(3).enumerate() {
        if i > 0 || first_group > 0 {
            out.push(',');
        }
        out.push_str(std::str::from_utf8(chunk).unwrap_or(""));
    }

    out
}

/// Round to a fixed number of decimal places and format.
#[must_use]
pub fn format_rounded(value: f64, places: usize) -> String {
    format!("{value:.places$}")
}

/// Round a float to `places` decimal places.
#[must_use]
pub fn round_to(value: f64, places: u32) -> f64 {
    let multiplier = 10_f64.powi(places as i32);
    (value * multiplier).round() / multiplier
}

/// Format a byte count with binary unit suffixes (B, KiB, MiB).
#[must_use]
pub fn format_binary(value: f64) -> String {
    const KIB: f64 = 1024.0;
    const MIB: f64 = 1024.0 * 1024.0;

    if value > MIB {
        format!("{} MiB", format_number(round_to(value / MIB, 2)))
    } else if value > KIB {
        format!("{} KiB", format_number(round_to(value / KIB, 2)))
    } else {
        format!("{} B", format_number(value))
    }
}

/// Return `value` when positive, else the first positive fallback.
#[must_use]
pub fn if_default_use(value: i64, fallbacks: &[i64]) -> i64 {
    if value > 0 {
        value
    } else {
        fallbacks.iter().copied().find(|v| *v > 0).unwrap_or(0)
    }
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format_grouped(value as i64)
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_round_trip() {
        assert_eq!(to_hex(255), "0xFF");
        assert_eq!(from_hex("0xFF").unwrap(), 255);
        assert_eq!(from_hex("ff").unwrap(), 255);
        assert!(from_hex("0xZZ").is_err());
    }

    #[test]
    fn test_format_grouped() {
        assert_eq!(format_grouped(0), "0");
        assert_eq!(format_grouped(999), "999");
        assert_eq!(format_grouped(1000), "1,000");
        assert_eq!(format_grouped(1234567), "1,234,567");
        assert_eq!(format_grouped(-1234), "-1,234");
    }

    #[test]
    fn test_rounding() {
        assert_eq!(round_to(3.14159, 2), 3.14);
        assert_eq!(format_rounded(3.14159, 2), "3.14");
        assert_eq!(format_rounded(2.0, 1), "2.0");
    }

    #[test]
    fn test_format_binary() {
        assert_eq!(format_binary(512.0), "512 B");
        assert_eq!(format_binary(2048.0), "2 KiB");
        assert_eq!(format_binary(3.5 * 1024.0 * 1024.0), "3.5 MiB");
    }

    #[test]
    fn test_if_default_use() {
        assert_eq!(if_default_use(5, &[10]), 5);
        assert_eq!(if_default_use(0, &[0, 7, 9]), 7);
        assert_eq!(if_default_use(0, &[]), 0);
    }
}
