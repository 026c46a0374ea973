//! Money type for representing monetary values.
//!
//! Uses cents-based integer representation to avoid floating-point
//! precision issues that plague monetary calculations. Catalog payloads carry
//! decimal prices, so a serde adapter ([`decimal`]) converts at the edge.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    #[default]
    USD,
    EUR,
    GBP,
    JPY,
    CAD,
}

impl Currency {
    /// Get the currency code (e.g., "USD").
    pub fn code(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::JPY => "JPY",
            Currency::CAD => "CAD",
        }
    }

    /// Get the currency symbol (e.g., "$").
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::USD => "$",
            Currency::EUR => "\u{20ac}",
            Currency::GBP => "\u{00a3}",
            Currency::JPY => "\u{00a5}",
            Currency::CAD => "CA$",
        }
    }

    /// Get the number of decimal places for this currency.
    pub fn decimal_places(&self) -> u32 {
        match self {
            Currency::JPY => 0,
            _ => 2,
        }
    }

    /// Parse a currency code string.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_uppercase().as_str() {
            "USD" => Some(Currency::USD),
            "EUR" => Some(Currency::EUR),
            "GBP" => Some(Currency::GBP),
            "JPY" => Some(Currency::JPY),
            "CAD" => Some(Currency::CAD),
            _ => None,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A monetary value with currency.
///
/// Amounts are stored in the smallest unit of the currency (e.g., cents for USD).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Money {
    /// Amount in smallest currency unit (e.g., cents).
    pub amount_cents: i64,
    /// The currency.
    pub currency: Currency,
}

impl Money {
    /// Create a new Money value from cents.
    pub fn new(amount_cents: i64, currency: Currency) -> Self {
        Self {
            amount_cents,
            currency,
        }
    }

    /// Create a Money value from a decimal amount.
    ///
    /// ```
    /// use storefront_commerce::money::{Money, Currency};
    /// let price = Money::from_decimal(129.99, Currency::USD);
    /// assert_eq!(price.amount_cents, 12999);
    /// ```
    pub fn from_decimal(amount: f64, currency: Currency) -> Self {
        let multiplier = 10_i64.pow(currency.decimal_places());
        let amount_cents = (amount * multiplier as f64).round() as i64;
        Self::new(amount_cents, currency)
    }

    /// Whole units of a currency (e.g., `Money::units(100, USD)` is $100.00).
    pub fn units(units: i64, currency: Currency) -> Self {
        Self::new(units * 10_i64.pow(currency.decimal_places()), currency)
    }

    /// Create a zero amount in the given currency.
    pub fn zero(currency: Currency) -> Self {
        Self::new(0, currency)
    }

    /// Check if this is zero.
    pub fn is_zero(&self) -> bool {
        self.amount_cents == 0
    }

    /// Check if this is positive.
    pub fn is_positive(&self) -> bool {
        self.amount_cents > 0
    }

    /// Check if this is negative.
    pub fn is_negative(&self) -> bool {
        self.amount_cents < 0
    }

    /// Convert to a decimal value.
    pub fn to_decimal(&self) -> f64 {
        let divisor = 10_i64.pow(self.currency.decimal_places());
        self.amount_cents as f64 / divisor as f64
    }

    /// Format as a display string (e.g., "$49.99").
    pub fn display(&self) -> String {
        let decimal = self.to_decimal();
        let places = self.currency.decimal_places() as usize;
        format!("{}{:.places$}", self.currency.symbol(), decimal)
    }

    /// Try to add another Money value, returning None on currency mismatch or overflow.
    pub fn try_add(&self, other: &Money) -> Option<Money> {
        if self.currency != other.currency {
            return None;
        }
        self.amount_cents
            .checked_add(other.amount_cents)
            .map(|cents| Money::new(cents, self.currency))
    }

    /// Try to subtract another Money value.
    pub fn try_subtract(&self, other: &Money) -> Option<Money> {
        if self.currency != other.currency {
            return None;
        }
        self.amount_cents
            .checked_sub(other.amount_cents)
            .map(|cents| Money::new(cents, self.currency))
    }

    /// Multiply by a scalar, returning None on overflow.
    pub fn try_multiply(&self, factor: i64) -> Option<Money> {
        self.amount_cents
            .checked_mul(factor)
            .map(|cents| Money::new(cents, self.currency))
    }

    /// Multiply by a decimal factor (e.g., for percentages).
    pub fn multiply_decimal(&self, factor: f64) -> Money {
        let new_amount = (self.amount_cents as f64 * factor).round() as i64;
        Money::new(new_amount, self.currency)
    }

    /// Calculate a percentage of this amount.
    pub fn percentage(&self, percent: f64) -> Money {
        self.multiply_decimal(percent / 100.0)
    }

    /// Clamp negative amounts to zero.
    pub fn floor_zero(&self) -> Money {
        Money::new(self.amount_cents.max(0), self.currency)
    }

    /// Sum an iterator of Money values, returning None on mismatch or overflow.
    pub fn try_sum<'a>(mut iter: impl Iterator<Item = &'a Money>, currency: Currency) -> Option<Money> {
        iter.try_fold(Money::zero(currency), |acc, m| acc.try_add(m))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// Currency of every price the catalog API sends.
pub const CATALOG_CURRENCY: Currency = Currency::USD;

/// Serde adapter for decimal prices (`129.99`) as sent by the catalog API.
///
/// Amounts are read in [`CATALOG_CURRENCY`].
pub mod decimal {
    use super::{Money, CATALOG_CURRENCY};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(money: &Money, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(money.to_decimal())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Money, D::Error> {
        let amount = f64::deserialize(deserializer)?;
        Ok(Money::from_decimal(amount, CATALOG_CURRENCY))
    }

    /// Same adapter for optional prices.
    pub mod option {
        use super::super::{Money, CATALOG_CURRENCY};
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            money: &Option<Money>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match money {
                Some(m) => serializer.serialize_some(&m.to_decimal()),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<Money>, D::Error> {
            let amount = Option::<f64>::deserialize(deserializer)?;
            Ok(amount.map(|a| Money::from_decimal(a, CATALOG_CURRENCY)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_from_decimal() {
        let m = Money::from_decimal(49.99, Currency::USD);
        assert_eq!(m.amount_cents, 4999);

        let m = Money::from_decimal(100.0, Currency::JPY);
        assert_eq!(m.amount_cents, 100); // JPY has no decimals
    }

    #[test]
    fn test_money_units() {
        assert_eq!(Money::units(100, Currency::USD).amount_cents, 10000);
        assert_eq!(Money::units(100, Currency::JPY).amount_cents, 100);
    }

    #[test]
    fn test_money_display() {
        let m = Money::new(4999, Currency::USD);
        assert_eq!(m.display(), "$49.99");

        let m = Money::new(100, Currency::JPY);
        assert_eq!(m.display(), "\u{00a5}100");
    }

    #[test]
    fn test_money_checked_arithmetic() {
        let a = Money::new(1000, Currency::USD);
        let b = Money::new(300, Currency::USD);
        assert_eq!(a.try_add(&b).unwrap().amount_cents, 1300);
        assert_eq!(a.try_subtract(&b).unwrap().amount_cents, 700);
        assert_eq!(a.try_multiply(3).unwrap().amount_cents, 3000);
        assert!(Money::new(i64::MAX, Currency::USD).try_multiply(2).is_none());
    }

    #[test]
    fn test_money_currency_mismatch() {
        let usd = Money::new(1000, Currency::USD);
        let eur = Money::new(1000, Currency::EUR);
        assert!(usd.try_add(&eur).is_none());
    }

    #[test]
    fn test_money_percentage() {
        let m = Money::new(8000, Currency::USD);
        assert_eq!(m.percentage(20.0).amount_cents, 1600);
    }

    #[test]
    fn test_try_sum() {
        let values = [Money::new(100, Currency::USD), Money::new(250, Currency::USD)];
        let total = Money::try_sum(values.iter(), Currency::USD).unwrap();
        assert_eq!(total.amount_cents, 350);
    }

    #[test]
    fn test_decimal_serde() {
        #[derive(Serialize, Deserialize)]
        struct Priced {
            #[serde(with = "decimal")]
            price: Money,
            #[serde(default, with = "decimal::option")]
            sale: Option<Money>,
        }

        let parsed: Priced = serde_json::from_str(r#"{"price": 129.99}"#).unwrap();
        assert_eq!(parsed.price.amount_cents, 12999);
        assert!(parsed.sale.is_none());

        let parsed: Priced = serde_json::from_str(r#"{"price": 10, "sale": 7.5}"#).unwrap();
        assert_eq!(parsed.sale.unwrap().amount_cents, 750);
    }

    #[test]
    fn test_currency_from_code() {
        assert_eq!(Currency::from_code("USD"), Some(Currency::USD));
        assert_eq!(Currency::from_code("eur"), Some(Currency::EUR));
        assert_eq!(Currency::from_code("INVALID"), None);
    }
}
