use std::fmt;

use crate::error::LineError;

/// A reading with one fractional digit, stored as value × 10.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Reading(i16);

impl Reading {
    pub const MIN: Reading = Reading(-9999);
    pub const MAX: Reading = Reading(9999);

    pub const fn from_tenths(tenths: i16) -> Self {
        Reading(tenths)
    }

    pub const fn tenths(self) -> i16 {
        self.0
    }

    pub fn as_f64(self) -> f64 {
        self.0 as f64 / 10.0
    }

    /// Decodes `[-]d[d[d]].d` without going through a float parser.
    #[inline]
    pub fn decode(bytes: &[u8]) -> Result<Self, LineError> {
        let (negative, digits) = match bytes.split_first() {
            Some((b'-', rest)) => (true, rest),
            _ => (false, bytes),
        };

        let n = digits.len();
        if !(3..=5).contains(&n) || digits[n - 2] != b'.' {
            return Err(LineError::InvalidReading);
        }

        let mut value: i16 = 0;
        for &b in digits[..n - 2].iter().chain(&digits[n - 1..]) {
            let d = b.wrapping_sub(b'0');
            if d > 9 {
                return Err(LineError::InvalidReading);
            }
            value = value * 10 + d as i16;
        }

        Ok(Reading(if negative { -value } else { value }))
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{}", abs / 10, abs % 10)
    }
}
