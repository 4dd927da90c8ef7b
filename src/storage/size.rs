//! Storage size literals.
//!
//! Sizes come from three places: declared configuration ("512M", "unlimited"),
//! catalog rows (plain byte counts), and DDL rendering (canonical form). The
//! unit ladder is K, M, G, T, P, E with each step 1024 times the previous.

use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Input unit suffixes in ascending order. "Z" is render-only, one step above
/// the largest accepted input unit.
const UNITS: [char; 6] = ['K', 'M', 'G', 'T', 'P', 'E'];

/// A byte count or the unlimited sentinel.
///
/// `Unlimited` compares greater than every finite size and equal only to
/// itself. Finite sizes compare numerically. Byte counts are wide enough for
/// the whole unit ladder ("1024E" is 2^70 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Size {
    Bytes(u128),
    Unlimited,
}

impl Size {
    /// Parses a size literal.
    ///
    /// Accepts a plain integer byte count, the word "unlimited" in any case,
    /// or `<number>[.<number>]<unit>` with a unit from the K..E ladder
    /// (case-insensitive). Fractional values are truncated after scaling.
    /// Anything else parses as zero bytes; callers that need strict input
    /// validate before parsing.
    pub fn parse(input: &str) -> Size {
        if let Ok(bytes) = input.trim().parse::<u128>() {
            return Size::Bytes(bytes);
        }
        if input.eq_ignore_ascii_case("unlimited") {
            return Size::Unlimited;
        }
        if let Some(bytes) = parse_scaled(input) {
            return Size::Bytes(bytes);
        }
        Size::Bytes(0)
    }

    pub const fn from_bytes(bytes: u128) -> Size {
        Size::Bytes(bytes)
    }

    pub fn is_unlimited(&self) -> bool {
        matches!(self, Size::Unlimited)
    }

    /// Finite byte count, or None for `Unlimited`.
    pub fn bytes(&self) -> Option<u128> {
        match self {
            Size::Bytes(bytes) => Some(*bytes),
            Size::Unlimited => None,
        }
    }
}

impl From<u64> for Size {
    fn from(bytes: u64) -> Size {
        Size::Bytes(bytes as u128)
    }
}

/// Canonical rendering: divide by 1024 while evenly divisible and suffix the
/// unit reached. Values under 1024 render bare, zero renders "0", and a value
/// still evenly divisible past "E" renders with the top-of-scale "Z".
impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Size::Unlimited => f.write_str("unlimited"),
            Size::Bytes(0) => f.write_str("0"),
            Size::Bytes(bytes) => {
                let mut value = *bytes;
                for unit in ["", "K", "M", "G", "T", "P", "E"] {
                    if value % 1024 != 0 {
                        return write!(f, "{}{}", value, unit);
                    }
                    value /= 1024;
                }
                write!(f, "{}Z", value)
            }
        }
    }
}

fn parse_scaled(input: &str) -> Option<u128> {
    let mut chars = input.chars();
    let unit = chars.next_back()?;
    let number = chars.as_str();
    let exponent = UNITS.iter().position(|u| u.eq_ignore_ascii_case(&unit))? as i32 + 1;
    if !is_decimal_literal(number) {
        return None;
    }
    let value: f64 = number.parse().ok()?;
    Some((value * 1024f64.powi(exponent)) as u128)
}

/// `<digits>` or `<digits>.<digits>`, nothing else.
fn is_decimal_literal(s: &str) -> bool {
    let bytes = s.as_bytes();
    if bytes.is_empty() {
        return false;
    }
    let mut seen_dot = false;
    for (i, b) in bytes.iter().enumerate() {
        match b {
            b'0'..=b'9' => {}
            b'.' if !seen_dot && i > 0 && i < bytes.len() - 1 => seen_dot = true,
            _ => return false,
        }
    }
    true
}

impl Serialize for Size {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Size {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Size, D::Error> {
        deserializer.deserialize_any(SizeVisitor)
    }
}

struct SizeVisitor;

impl<'de> Visitor<'de> for SizeVisitor {
    type Value = Size;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a size literal string or a byte count")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Size, E> {
        Ok(Size::parse(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Size, E> {
        Ok(Size::Bytes(v as u128))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Size, E> {
        Ok(Size::Bytes(v.max(0) as u128))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Size, E> {
        Ok(Size::Bytes(v.max(0.0) as u128))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimal_literal_shape() {
        assert!(is_decimal_literal("12"));
        assert!(is_decimal_literal("12.5"));
        assert!(!is_decimal_literal(".5"));
        assert!(!is_decimal_literal("12."));
        assert!(!is_decimal_literal("1.2.3"));
        assert!(!is_decimal_literal("-5"));
        assert!(!is_decimal_literal("1e3"));
        assert!(!is_decimal_literal(""));
    }

    #[test]
    fn test_scaled_unit_ladder() {
        assert_eq!(parse_scaled("1K"), Some(1024));
        assert_eq!(parse_scaled("15m"), Some(15 * 1024 * 1024));
        assert_eq!(parse_scaled("1024E"), Some(1u128 << 70));
        assert_eq!(parse_scaled("1Z"), None);
        assert_eq!(parse_scaled("K"), None);
    }

    #[test]
    fn test_fraction_truncates_after_scaling() {
        assert_eq!(parse_scaled("0.5M"), Some(512 * 1024));
        assert_eq!(parse_scaled("1.1G"), Some(1_181_116_006));
    }
}
