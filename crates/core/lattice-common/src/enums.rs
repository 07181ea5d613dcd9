//! Enum naming and bit-flag helpers.

use crate::{LatticeError, LatticeResult};

/// An enum whose variants carry stable names.
///
/// Implementors list their variants once; parsing and display formatting
/// come for free.
pub trait NamedVariant: Sized + Copy + PartialEq + 'static {
    /// All variants, in declaration order.
    fn variants() -> &'static [Self];

    /// The stable name of this variant.
    fn name(&self) -> &'static str;

    /// A human-facing label: the name with spaces inserted at word
    /// boundaries, so `PowerSaveMode` renders as `Power Save Mode`.
    fn display_name(&self) -> String {
        split_words(self.name())
    }

    /// Parses a variant by name, case-insensitively.
    fn parse(text: &str) -> LatticeResult<Self> {
        let text = text.trim();
        Self::variants()
            .iter()
            .find(|v| v.name().eq_ignore_ascii_case(text))
            .copied()
            .ok_or_else(|| LatticeError::invalid_input(format!("unknown variant '{text}'")))
    }

    /// Parses a variant by name, falling back to `default` on failure.
    fn parse_or(text: &str, default: Self) -> Self {
        Self::parse(text).unwrap_or(default)
    }
}

fn split_words(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev_lower = false;
    for c in name.chars() {
        if c.is_uppercase() && prev_lower {
            out.push(' ');
        }
        prev_lower = c.is_lowercase() || c.is_ascii_digit();
        out.push(c);
    }
    out
}

/// Whether all bits of `flag` are set in `value`.
#[must_use]
pub const fn has_flag(value: u64, flag: u64) -> bool {
    value & flag == flag && flag != 0
}

/// Returns `value` with `flag` set or cleared.
#[must_use]
pub const fn set_flag(value: u64, flag: u64, on: bool) -> u64 {
    if on {
        value | flag
    } else {
        value & !flag
    }
}

/// The highest single set bit of `value`, or 0 when none are set.
#[must_use]
pub const fn highest_flag(value: u64) -> u64 {
    if value == 0 {
        0
    } else {
        1 << (63 - value.leading_zeros())
    }
}

/// The lowest single set bit of `value`, or 0 when none are set.
#[must_use]
pub const fn lowest_flag(value: u64) -> u64 {
    value & value.wrapping_neg()
}

/// The individual set bits of `value`, lowest first.
#[must_use]
pub fn flags(value: u64) -> Vec<u64> {
    let mut out = Vec::with_capacity(value.count_ones() as usize);
    let mut rest = value;
    while rest != 0 {
        let bit = lowest_flag(rest);
        out.push(bit);
        rest &= !bit;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum RunMode {
        Idle,
        PowerSave,
        FullThrottle,
    }

    impl NamedVariant for RunMode {
        fn variants() -> &'static [Self] {
            &[RunMode::Idle, RunMode::PowerSave, RunMode::FullThrottle]
        }

        fn name(&self) -> &'static str {
            match self {
                RunMode::Idle => "Idle",
                RunMode::PowerSave => "PowerSave",
                RunMode::FullThrottle => "FullThrottle",
            }
        }
    }

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!(RunMode::parse("powersave").unwrap(), RunMode::PowerSave);
        assert_eq!(RunMode::parse(" Idle ").unwrap(), RunMode::Idle);
        assert!(RunMode::parse("warp").is_err());
    }

    #[test]
    fn test_parse_or_fallback() {
        assert_eq!(RunMode::parse_or("nope", RunMode::Idle), RunMode::Idle);
        assert_eq!(RunMode::parse_or("FullThrottle", RunMode::Idle), RunMode::FullThrottle);
    }

    #[test]
    fn test_display_name_splits_words() {
        assert_eq!(RunMode::PowerSave.display_name(), "Power Save");
        assert_eq!(RunMode::Idle.display_name(), "Idle");
    }

    #[test]
    fn test_flag_queries() {
        assert!(has_flag(0b1010, 0b0010));
        assert!(has_flag(0b1010, 0b1010));
        assert!(!has_flag(0b1010, 0b0100));
        assert!(!has_flag(0b1010, 0));
    }

    #[test]
    fn test_set_flag() {
        assert_eq!(set_flag(0b1000, 0b0010, true), 0b1010);
        assert_eq!(set_flag(0b1010, 0b0010, false), 0b1000);
    }

    #[test]
    fn test_highest_and_lowest_flag() {
        assert_eq!(highest_flag(0b0110), 0b0100);
        assert_eq!(lowest_flag(0b0110), 0b0010);
        assert_eq!(highest_flag(0), 0);
        assert_eq!(lowest_flag(0), 0);
        assert_eq!(highest_flag(u64::MAX), 1 << 63);
    }

    #[test]
    fn test_flags_enumeration() {
        assert_eq!(flags(0b1011), vec![0b0001, 0b0010, 0b1000]);
        assert!(flags(0).is_empty());
    }
}
