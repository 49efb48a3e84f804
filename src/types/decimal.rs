//! A fixed-point decimal value backed by an `i128` unscaled integer.
//!
//! The widest decimal column carries 38 significant digits, which is exactly
//! the range an `i128` can hold, so no arbitrary-precision arithmetic is needed.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::{ColIndexError, Result};

/// The largest scale (and precision) a 128-bit unscaled value can carry.
pub const MAX_DECIMAL_DIGITS: u32 = 38;

/// An exact decimal number `unscaled * 10^-scale`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Decimal {
    unscaled: i128,
    scale: u32,
}

impl Decimal {
    pub const fn new(unscaled: i128, scale: u32) -> Self {
        Self { unscaled, scale }
    }

    pub fn unscaled(&self) -> i128 {
        self.unscaled
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    pub fn signum(&self) -> i32 {
        self.unscaled.signum() as i32
    }

    /// Number of decimal digits in the unscaled value (zero counts as one digit).
    pub fn precision(&self) -> u32 {
        let mut magnitude = self.unscaled.unsigned_abs();
        let mut digits = 1;
        while magnitude >= 10 {
            magnitude /= 10;
            digits += 1;
        }
        digits
    }

    /// Re-expresses the value at `target_scale` without rounding.
    ///
    /// Fails with `DecimalOutOfRange` if the conversion would drop non-zero
    /// digits or overflow the 128-bit unscaled representation.
    pub fn rescale(&self, target_scale: u32) -> Result<Decimal> {
        if target_scale > MAX_DECIMAL_DIGITS {
            return Err(ColIndexError::DecimalOutOfRange(format!(
                "scale {} exceeds the maximum of {}",
                target_scale, MAX_DECIMAL_DIGITS
            )));
        }
        match target_scale.cmp(&self.scale) {
            Ordering::Equal => Ok(*self),
            Ordering::Greater => {
                let factor = pow10(target_scale - self.scale)?;
                let unscaled = self.unscaled.checked_mul(factor).ok_or_else(|| {
                    ColIndexError::DecimalOutOfRange(format!(
                        "{} overflows at scale {}",
                        self, target_scale
                    ))
                })?;
                Ok(Decimal::new(unscaled, target_scale))
            }
            Ordering::Less => {
                let factor = pow10(self.scale - target_scale)?;
                if self.unscaled % factor != 0 {
                    return Err(ColIndexError::DecimalOutOfRange(format!(
                        "rescaling {} to scale {} would round",
                        self, target_scale
                    )));
                }
                Ok(Decimal::new(self.unscaled / factor, target_scale))
            }
        }
    }

    /// Numeric comparison across differing scales.
    pub fn cmp_value(&self, other: &Decimal) -> Ordering {
        let common = self.scale.max(other.scale);
        match (self.rescale(common), other.rescale(common)) {
            (Ok(a), Ok(b)) => a.unscaled.cmp(&b.unscaled),
            // Only reachable near the i128 limits; the sign and magnitude
            // of the wider side decide the order.
            _ => self
                .to_f64()
                .partial_cmp(&other.to_f64())
                .unwrap_or(Ordering::Equal),
        }
    }

    fn to_f64(self) -> f64 {
        self.unscaled as f64 / 10f64.powi(self.scale as i32)
    }
}

fn pow10(exp: u32) -> Result<i128> {
    10i128.checked_pow(exp).ok_or_else(|| {
        ColIndexError::DecimalOutOfRange(format!("10^{} does not fit in 128 bits", exp))
    })
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.unscaled < 0 { "-" } else { "" };
        let digits = self.unscaled.unsigned_abs().to_string();
        let scale = self.scale as usize;
        if scale == 0 {
            return write!(f, "{}{}", sign, digits);
        }
        let padded = format!("{:0>width$}", digits, width = scale + 1);
        let (int_part, frac_part) = padded.split_at(padded.len() - scale);
        write!(f, "{}{}.{}", sign, int_part, frac_part)
    }
}

impl FromStr for Decimal {
    type Err = ColIndexError;

    /// Parses `[+-]digits[.digits]`. The scale is the number of fractional digits.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || ColIndexError::InvalidDecimal(s.to_string());
        let (negative, body) = match s.as_bytes().first() {
            Some(b'-') => (true, &s[1..]),
            Some(b'+') => (false, &s[1..]),
            _ => (false, s),
        };
        let (int_part, frac_part) = match body.split_once('.') {
            Some((i, f)) => (i, f),
            None => (body, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(invalid());
        }
        if !int_part.bytes().chain(frac_part.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let scale = frac_part.len() as u32;
        if scale > MAX_DECIMAL_DIGITS {
            return Err(invalid());
        }
        let mut unscaled: i128 = 0;
        for b in int_part.bytes().chain(frac_part.bytes()) {
            unscaled = unscaled
                .checked_mul(10)
                .and_then(|v| v.checked_add(i128::from(b - b'0')))
                .ok_or_else(|| ColIndexError::DecimalOutOfRange(s.to_string()))?;
        }
        if negative {
            unscaled = -unscaled;
        }
        Ok(Decimal::new(unscaled, scale))
    }
}
