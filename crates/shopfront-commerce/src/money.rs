//! Money type for representing monetary values.
//!
//! Uses minor-unit integer representation so prices read from the backend's
//! decimal strings (`"1200.00"`) never pass through floating point.

use crate::error::CommerceError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Supported currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    /// Bangladeshi taka, the storefront's trading currency.
    #[default]
    BDT,
    USD,
    EUR,
    GBP,
    INR,
}

impl Currency {
    /// Get the currency code (e.g., "BDT").
    pub fn code(&self) -> &'static str {
        match self {
            Currency::BDT => "BDT",
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::INR => "INR",
        }
    }

    /// Get the currency symbol (e.g., "৳").
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::BDT => "\u{09f3}",
            Currency::USD => "$",
            Currency::EUR => "\u{20ac}",
            Currency::GBP => "\u{00a3}",
            Currency::INR => "\u{20b9}",
        }
    }

    /// Whether the symbol is written after the amount.
    pub fn symbol_trails(&self) -> bool {
        matches!(self, Currency::BDT)
    }

    /// Get the number of decimal places for this currency.
    pub fn decimal_places(&self) -> u32 {
        2
    }

    /// Parse a currency code string.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_uppercase().as_str() {
            "BDT" => Some(Currency::BDT),
            "USD" => Some(Currency::USD),
            "EUR" => Some(Currency::EUR),
            "GBP" => Some(Currency::GBP),
            "INR" => Some(Currency::INR),
            _ => None,
        }
    }

    fn scale(&self) -> i64 {
        10_i64.pow(self.decimal_places())
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A monetary value with currency.
///
/// Amounts are stored in the smallest unit of the currency (poisha for BDT).
/// On the wire a `Money` is the backend's decimal string; the currency is
/// not transmitted and defaults to [`Currency::BDT`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Money {
    /// Amount in smallest currency unit.
    pub amount_minor: i64,
    /// The currency.
    pub currency: Currency,
}

impl Money {
    /// Create a new Money value from minor units.
    pub fn new(amount_minor: i64, currency: Currency) -> Self {
        Self {
            amount_minor,
            currency,
        }
    }

    /// Create a Money value from a decimal amount.
    ///
    /// ```
    /// use shopfront_commerce::money::{Money, Currency};
    /// let price = Money::from_decimal(1199.5, Currency::BDT);
    /// assert_eq!(price.amount_minor, 119950);
    /// ```
    pub fn from_decimal(amount: f64, currency: Currency) -> Self {
        let amount_minor = (amount * currency.scale() as f64).round() as i64;
        Self::new(amount_minor, currency)
    }

    /// Parse a decimal string such as `"1200.00"`, `"85"` or `"-3.5"`.
    ///
    /// Digits beyond the currency's precision are rounded half-up.
    pub fn parse(input: &str, currency: Currency) -> Result<Self, CommerceError> {
        let invalid = || CommerceError::InvalidPrice(input.to_string());
        let trimmed = input.trim();
        let (negative, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        let (whole, frac) = digits.split_once('.').unwrap_or((digits, ""));
        if whole.is_empty() && frac.is_empty() {
            return Err(invalid());
        }
        if !whole.bytes().all(|b| b.is_ascii_digit()) || !frac.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }

        let places = currency.decimal_places() as usize;
        let whole_units: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid())?
        };
        let mut kept: String = frac.chars().take(places).collect();
        while kept.len() < places {
            kept.push('0');
        }
        let mut minor: i64 = if kept.is_empty() {
            0
        } else {
            kept.parse().map_err(|_| invalid())?
        };
        if frac.as_bytes().get(places).is_some_and(|d| *d >= b'5') {
            minor += 1;
        }

        let amount = whole_units
            .checked_mul(currency.scale())
            .and_then(|w| w.checked_add(minor))
            .ok_or_else(invalid)?;
        Ok(Self::new(if negative { -amount } else { amount }, currency))
    }

    /// Create a zero amount in the given currency.
    pub fn zero(currency: Currency) -> Self {
        Self::new(0, currency)
    }

    /// Check if this is zero.
    pub fn is_zero(&self) -> bool {
        self.amount_minor == 0
    }

    /// Check if this is positive.
    pub fn is_positive(&self) -> bool {
        self.amount_minor > 0
    }

    /// Convert to a decimal value.
    pub fn to_decimal(&self) -> f64 {
        self.amount_minor as f64 / self.currency.scale() as f64
    }

    /// Whole currency units, rounded (e.g., 1199.50 becomes 1200).
    pub fn whole_units(&self) -> i64 {
        self.to_decimal().round() as i64
    }

    /// Format as a display string: `"1200 ৳"` for taka, `"$49.99"` otherwise.
    pub fn display(&self) -> String {
        if self.currency.symbol_trails() {
            format!("{} {}", self.whole_units(), self.currency.symbol())
        } else {
            format!("{}{}", self.currency.symbol(), self.display_amount())
        }
    }

    /// Format as a display string without symbol (e.g., "1200.00").
    pub fn display_amount(&self) -> String {
        let places = self.currency.decimal_places() as usize;
        let scale = self.currency.scale();
        let sign = if self.amount_minor < 0 { "-" } else { "" };
        let abs = self.amount_minor.unsigned_abs();
        format!(
            "{sign}{}.{:0places$}",
            abs / scale as u64,
            abs % scale as u64
        )
    }

    /// Add another Money value, failing on a currency mismatch.
    pub fn checked_add(&self, other: &Money) -> Result<Money, CommerceError> {
        self.ensure_same_currency(other)?;
        Ok(Money::new(
            self.amount_minor + other.amount_minor,
            self.currency,
        ))
    }

    /// Subtract another Money value, failing on a currency mismatch.
    pub fn checked_sub(&self, other: &Money) -> Result<Money, CommerceError> {
        self.ensure_same_currency(other)?;
        Ok(Money::new(
            self.amount_minor - other.amount_minor,
            self.currency,
        ))
    }

    /// Multiply by a scalar.
    pub fn multiply(&self, factor: i64) -> Money {
        Money::new(self.amount_minor * factor, self.currency)
    }

    /// Sum an iterator of Money values.
    pub fn sum<'a>(
        mut iter: impl Iterator<Item = &'a Money>,
        currency: Currency,
    ) -> Result<Money, CommerceError> {
        iter.try_fold(Money::zero(currency), |acc, m| acc.checked_add(m))
    }

    fn ensure_same_currency(&self, other: &Money) -> Result<(), CommerceError> {
        if self.currency != other.currency {
            return Err(CommerceError::CurrencyMismatch {
                expected: self.currency.code().to_string(),
                got: other.currency.code().to_string(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.display_amount())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Text(String),
    Number(f64),
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match RawAmount::deserialize(deserializer)? {
            RawAmount::Text(text) => {
                Money::parse(&text, Currency::default()).map_err(serde::de::Error::custom)
            }
            RawAmount::Number(n) if n.is_finite() => Ok(Money::from_decimal(n, Currency::default())),
            RawAmount::Number(n) => Err(serde::de::Error::custom(format!("invalid price: {n}"))),
        }
    }
}

/// Serialize a [`Money`] as a JSON number, as the order endpoints expect.
pub mod as_number {
    use super::Money;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(money: &Money, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(money.to_decimal())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Money, D::Error> {
        Money::deserialize(deserializer)
    }
}
