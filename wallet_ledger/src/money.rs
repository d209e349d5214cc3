//! Fixed-point money in minor currency units.
//!
//! A [`Money`] value is an `i64` count of hundredths of the major unit. Parsing
//! is the only place where rounding happens: any rational input is scaled to
//! two decimal places with round-half-up (`floor(value * 100 + 1/2)`), so
//! `"1.005"` becomes `101` minor units and `"-1.005"` becomes `-100`.
//!
//! ## Example
//!
//! ```
//! use wallet_ledger::money::Money;
//!
//! let balance: Money = "1000.00".parse().unwrap();
//! let deposit: Money = "500".parse().unwrap();
//!
//! let total = balance.add(deposit).unwrap();
//! assert_eq!(total.minor_units(), 150_000);
//! assert_eq!(total.to_string(), "1500.00");
//! ```

use std::{cmp::Ordering, fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::wallet::errors::{WalletError, WalletResult};

/// Number of minor units in one major unit.
pub const MINOR_UNITS_PER_MAJOR: i64 = 100;

/// Number of fractional digits kept after rounding.
const SCALE: i64 = 2;

/// Any value with more integer digits than this cannot fit in an `i64` of
/// minor units.
const MAX_SCALED_DIGITS: i64 = 20;

/// Immutable fixed-point amount stored as minor units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, sqlx::Type)]
#[sqlx(transparent)]
pub struct Money(i64);

impl Money {
    /// Zero in any currency.
    pub const ZERO: Money = Money(0);

    /// Wrap a raw minor-unit count.
    pub const fn from_minor(minor_units: i64) -> Self {
        Money(minor_units)
    }

    /// Whole major units, e.g. `from_major(15)` is `15.00`.
    pub fn from_major(major_units: i64) -> WalletResult<Self> {
        major_units
            .checked_mul(MINOR_UNITS_PER_MAJOR)
            .map(Money)
            .ok_or_else(|| WalletError::InvalidAmount(major_units.to_string()))
    }

    /// Raw minor-unit count.
    pub const fn minor_units(self) -> i64 {
        self.0
    }

    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Exact addition, `None` on 64-bit overflow.
    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    /// Exact subtraction, `None` on 64-bit overflow.
    pub fn checked_sub(self, other: Money) -> Option<Money> {
        self.0.checked_sub(other.0).map(Money)
    }

    /// Exact addition.
    ///
    /// # Errors
    ///
    /// * `WalletError::BalanceOverflow` - The sum does not fit in 64 bits
    pub fn add(self, other: Money) -> WalletResult<Money> {
        self.checked_add(other).ok_or(WalletError::BalanceOverflow)
    }

    /// Exact subtraction.
    ///
    /// # Errors
    ///
    /// * `WalletError::BalanceOverflow` - The difference does not fit in 64 bits
    pub fn sub(self, other: Money) -> WalletResult<Money> {
        self.checked_sub(other).ok_or(WalletError::BalanceOverflow)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let magnitude = self.0.unsigned_abs();
        let per_major = MINOR_UNITS_PER_MAJOR.unsigned_abs();
        write!(
            f,
            "{sign}{}.{:02}",
            magnitude / per_major,
            magnitude % per_major
        )
    }
}

impl FromStr for Money {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || WalletError::InvalidAmount(s.to_string());

        let (negative, unsigned) = match s.as_bytes().first() {
            Some(b'-') => (true, &s[1..]),
            Some(b'+') => (false, &s[1..]),
            _ => (false, s),
        };

        let raw = match unsigned.split_once('/') {
            Some((numerator, denominator)) => {
                parse_fraction(numerator, denominator, negative).ok_or_else(invalid)?
            }
            None => parse_decimal(unsigned, negative).ok_or_else(invalid)?,
        };

        Ok(Money(raw))
    }
}

/// Parses `numerator/denominator` (both unsigned integers) and rounds the
/// quotient half-up to two places.
fn parse_fraction(numerator: &str, denominator: &str, negative: bool) -> Option<i64> {
    let numerator = parse_digits(numerator)?;
    let denominator = parse_digits(denominator)?;
    if denominator == 0 {
        return None;
    }

    let scaled = i128::try_from(numerator)
        .ok()?
        .checked_mul(2 * i128::from(MINOR_UNITS_PER_MAJOR))?;
    let scaled = if negative { -scaled } else { scaled };
    let denominator = i128::try_from(denominator).ok()?;

    // floor((200 * n + d) / (2 * d)) == floor(n / d * 100 + 1/2)
    let raw = scaled
        .checked_add(denominator)?
        .div_euclid(denominator.checked_mul(2)?);
    i64::try_from(raw).ok()
}

fn parse_digits(digits: &str) -> Option<u128> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.bytes().try_fold(0u128, |acc, b| {
        acc.checked_mul(10)?.checked_add(u128::from(b - b'0'))
    })
}

/// Parses `int[.frac][e[+-]exp]` and rounds half-up to two places.
fn parse_decimal(text: &str, negative: bool) -> Option<i64> {
    let (mantissa, exponent) = match text.find(['e', 'E']) {
        Some(idx) => (&text[..idx], parse_exponent(&text[idx + 1..])?),
        None => (text, 0),
    };

    let (integer, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    if integer.is_empty() && fraction.is_empty() {
        return None;
    }
    if !integer.bytes().chain(fraction.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }

    // All significant digits with the decimal point after `point` of them.
    let mut digits: Vec<u8> = integer
        .bytes()
        .chain(fraction.bytes())
        .map(|b| b - b'0')
        .collect();
    let mut point = i64::try_from(integer.len()).ok()?.checked_add(exponent)?;

    let leading_zeros = digits.iter().take_while(|&&d| d == 0).count();
    digits.drain(..leading_zeros);
    point = point.checked_sub(i64::try_from(leading_zeros).ok()?)?;

    if digits.is_empty() {
        return Some(0);
    }

    // Digits at index < cut are whole minor units, the rest is the tail.
    let cut = point.checked_add(SCALE)?;
    if cut > MAX_SCALED_DIGITS {
        return None;
    }

    let mut minor: u128 = 0;
    for idx in 0..cut.max(0) {
        let digit = usize::try_from(idx)
            .ok()
            .and_then(|i| digits.get(i))
            .copied()
            .unwrap_or(0);
        minor = minor * 10 + u128::from(digit);
    }

    let tail_at = |idx: i64| -> u8 {
        usize::try_from(idx)
            .ok()
            .and_then(|i| digits.get(i))
            .copied()
            .unwrap_or(0)
    };
    let first_tail = tail_at(cut);
    let rest_nonzero = match usize::try_from(cut + 1) {
        Ok(start) => digits.iter().skip(start).any(|&d| d != 0),
        // The first tail digit is an implicit zero, so the tail is below a half.
        Err(_) => false,
    };

    let magnitude = i128::try_from(minor).ok()?;
    let raw = if negative {
        // floor(-(m + t) + 1/2) moves away from zero only when t > 1/2.
        let above_half = first_tail > 5 || (first_tail == 5 && rest_nonzero);
        -(magnitude + i128::from(above_half))
    } else {
        magnitude + i128::from(first_tail >= 5)
    };

    i64::try_from(raw).ok()
}

fn parse_exponent(text: &str) -> Option<i64> {
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let magnitude = i64::try_from(parse_digits(digits)?).ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

impl PartialEq<i64> for Money {
    fn eq(&self, other: &i64) -> bool {
        self.0 == *other
    }
}

impl PartialOrd<i64> for Money {
    fn partial_cmp(&self, other: &i64) -> Option<Ordering> {
        self.0.partial_cmp(other)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Accepts decimal strings and numbers. Integers are major units; floats are
/// rounded from their shortest decimal rendering, so `0.1` is ten minor units.
struct MoneyVisitor;

impl de::Visitor<'_> for MoneyVisitor {
    type Value = Money;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a decimal amount as a string or number")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Money, E> {
        v.trim().parse().map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Money, E> {
        Money::from_major(v).map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Money, E> {
        i64::try_from(v)
            .map_err(|_| E::custom(WalletError::InvalidAmount(v.to_string())))
            .and_then(|v| self.visit_i64(v))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Money, E> {
        if !v.is_finite() {
            return Err(E::custom(WalletError::InvalidAmount(v.to_string())));
        }
        // `Display` for f64 is the shortest string that round-trips
        self.visit_str(&v.to_string())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(MoneyVisitor)
    }
}
