use std::{fmt, str::FromStr};

use crate::{Currency, EngineError};

const CURRENCY: Currency = Currency::Khr;

/// Signed money amount represented as **integer minor units**.
///
/// Use this type for **all** monetary values (record amounts, daily and
/// lifetime totals) to avoid floating-point drift when many small amounts
/// are summed.
///
/// `Display` renders the raw decimal without separators and without trailing
/// fractional zeros, which is what confirmation messages echo back.
///
/// # Examples
///
/// ```rust
/// use engine::Money;
///
/// let amount = Money::new(123_450);
/// assert_eq!(amount.minor(), 123_450);
/// assert_eq!(amount.to_string(), "1234.5");
/// assert_eq!(amount.grouped(), "1,234.5");
/// ```
///
/// Parsing from user input (accepts `.` or `,` as decimal separator; rejects
/// more than 2 decimals and thousands separators):
///
/// ```rust
/// use engine::Money;
///
/// assert_eq!("10".parse::<Money>().unwrap().minor(), 1000);
/// assert_eq!("10,5".parse::<Money>().unwrap().minor(), 1050);
/// assert!("12.345".parse::<Money>().is_err());
/// assert!("5,000".parse::<Money>().is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// Creates a new amount from integer minor units.
    #[must_use]
    pub const fn new(minor: i64) -> Self {
        Self(minor)
    }

    /// Returns the raw value in minor units.
    #[must_use]
    pub const fn minor(self) -> i64 {
        self.0
    }

    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Checked addition (returns `None` on overflow).
    #[must_use]
    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }

    /// Renders the amount with thousands separators, e.g. `12,500` or
    /// `1,234.5`.
    #[must_use]
    pub fn grouped(self) -> String {
        let (sign, major, minor) = self.parts();
        format!("{sign}{}{}", group_thousands(major), fraction_suffix(minor))
    }

    fn parts(self) -> (&'static str, u64, u64) {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let scale = CURRENCY.scale().unsigned_abs();
        (sign, abs / scale, abs % scale)
    }
}

/// Fractional part with trailing zeros removed (`.5` rather than `.50`).
fn fraction_suffix(minor: u64) -> String {
    if minor == 0 {
        return String::new();
    }
    let width = usize::from(CURRENCY.minor_units());
    let digits = format!("{minor:0width$}");
    format!(".{}", digits.trim_end_matches('0'))
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (sign, major, minor) = self.parts();
        write!(f, "{sign}{major}{}", fraction_suffix(minor))
    }
}

impl From<i64> for Money {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<Money> for i64 {
    fn from(value: Money) -> Self {
        value.0
    }
}

impl FromStr for Money {
    type Err = EngineError;

    /// Parses a decimal string into minor units.
    ///
    /// Accepts `.` or `,` as decimal separator and an optional leading `+`/`-`.
    /// The sign is kept: rejecting zero or negative amounts is up to the
    /// caller.
    ///
    /// Validation rules:
    /// - max 2 fractional digits (rejects `12.345`)
    /// - `,` is a decimal separator only when followed by one or two digits;
    ///   `5,000` or `1,000.5` are [`EngineError::GroupedAmount`]
    /// - only ASCII digits (rejects `1e3`, `NaN`, `inf`)
    /// - rejects empty/invalid strings
    /// - digits that do not fit are [`EngineError::AmountOutOfRange`], which
    ///   keeps the sign
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let empty = || EngineError::InvalidAmount("empty amount".to_string());
        let invalid = || EngineError::InvalidAmount("invalid amount".to_string());

        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(empty());
        }

        let (negative, rest) = if let Some(stripped) = trimmed.strip_prefix('-') {
            (true, stripped)
        } else if let Some(stripped) = trimmed.strip_prefix('+') {
            (false, stripped)
        } else {
            (false, trimmed)
        };

        if rest.is_empty() {
            return Err(empty());
        }

        if let Some((_, after)) = rest.split_once(',') {
            let decimal_comma = !rest.contains('.')
                && (1..=usize::from(CURRENCY.minor_units())).contains(&after.len());
            if !decimal_comma {
                let grouped = !after.is_empty()
                    && after
                        .chars()
                        .all(|c| c.is_ascii_digit() || c == ',' || c == '.');
                return Err(if grouped {
                    EngineError::GroupedAmount(trimmed.to_string())
                } else {
                    invalid()
                });
            }
        }

        let overflow = || EngineError::AmountOutOfRange { negative };
        let rest = rest.replace(',', ".");
        let mut parts = rest.split('.');
        let major_str = parts.next().ok_or_else(invalid)?;
        let fraction_str = parts.next().unwrap_or("");
        if parts.next().is_some() {
            return Err(invalid());
        }

        if major_str.is_empty() && fraction_str.is_empty() {
            return Err(invalid());
        }
        if !major_str.chars().all(|c| c.is_ascii_digit())
            || !fraction_str.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid());
        }

        let minor_units = usize::from(CURRENCY.minor_units());
        if fraction_str.len() > minor_units {
            return Err(EngineError::InvalidAmount("too many decimals".to_string()));
        }

        let major: i64 = if major_str.is_empty() {
            0
        } else {
            major_str.parse().map_err(|_| overflow())?
        };
        let minor: i64 = if fraction_str.is_empty() {
            0
        } else {
            let padded = format!("{fraction_str:0<minor_units$}");
            padded.parse().map_err(|_| invalid())?
        };

        let total = major
            .checked_mul(CURRENCY.scale())
            .and_then(|v| v.checked_add(minor))
            .ok_or_else(overflow)?;

        Ok(Money(if negative { -total } else { total }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_raw_decimal() {
        assert_eq!(Money::new(0).to_string(), "0");
        assert_eq!(Money::new(1).to_string(), "0.01");
        assert_eq!(Money::new(10).to_string(), "0.1");
        assert_eq!(Money::new(350).to_string(), "3.5");
        assert_eq!(Money::new(1_500).to_string(), "15");
        assert_eq!(Money::new(1_234_500).to_string(), "12345");
        assert_eq!(Money::new(-1050).to_string(), "-10.5");
    }

    #[test]
    fn grouped_inserts_thousands_separators() {
        assert_eq!(Money::new(0).grouped(), "0");
        assert_eq!(Money::new(99_900).grouped(), "999");
        assert_eq!(Money::new(100_000).grouped(), "1,000");
        assert_eq!(Money::new(1_234_567_89).grouped(), "1,234,567.89");
        assert_eq!(Money::new(-2_500_050).grouped(), "-25,000.5");
    }

    #[test]
    fn parse_accepts_dot_or_comma() {
        assert_eq!("10".parse::<Money>().unwrap().minor(), 1000);
        assert_eq!("10.5".parse::<Money>().unwrap().minor(), 1050);
        assert_eq!("10,50".parse::<Money>().unwrap().minor(), 1050);
        assert_eq!("2,5".parse::<Money>().unwrap().minor(), 250);
        assert_eq!(".5".parse::<Money>().unwrap().minor(), 50);
        assert_eq!("3.".parse::<Money>().unwrap().minor(), 300);
        assert_eq!("-0.01".parse::<Money>().unwrap().minor(), -1);
        assert_eq!("+1.00".parse::<Money>().unwrap().minor(), 100);
        assert_eq!("  2.30 ".parse::<Money>().unwrap().minor(), 230);
    }

    #[test]
    fn parse_keeps_zero_and_negative_values() {
        assert_eq!("0".parse::<Money>().unwrap(), Money::ZERO);
        assert_eq!("-5".parse::<Money>().unwrap().minor(), -500);
    }

    #[test]
    fn parse_rejects_non_numbers() {
        for input in [
            "", "abc", "-", ".", "1e3", "NaN", "inf", "1.2.3", "12abc", "1 000", "3,", "1,2a",
        ] {
            assert!(input.parse::<Money>().is_err(), "{input:?} should be rejected");
        }
    }

    #[test]
    fn parse_rejects_more_than_two_decimals() {
        assert!("12.345".parse::<Money>().is_err());
        assert!("0.001".parse::<Money>().is_err());
    }

    #[test]
    fn parse_rejects_thousands_separators() {
        for input in ["5,000", "1,000,000", "1,000.5", "-12,500"] {
            assert_eq!(
                input.parse::<Money>(),
                Err(EngineError::GroupedAmount(input.to_string())),
                "{input:?}"
            );
        }
    }

    #[test]
    fn parse_overflow_keeps_the_sign() {
        assert_eq!(
            "99999999999999999999".parse::<Money>(),
            Err(EngineError::AmountOutOfRange { negative: false })
        );
        assert_eq!(
            "-99999999999999999999".parse::<Money>(),
            Err(EngineError::AmountOutOfRange { negative: true })
        );
        assert_eq!(
            "-92233720368547758.08".parse::<Money>(),
            Err(EngineError::AmountOutOfRange { negative: true })
        );
    }
}
