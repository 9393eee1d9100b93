use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An amount in a currency's minor units, as storefront APIs report it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in minor units (cents for USD).
    pub minor_units: i64,
    /// Number of decimal places in one major unit.
    pub decimals: u32,
    /// ISO 4217 currency code.
    pub currency: String,
}

impl Price {
    /// Create a price from minor units.
    pub fn new(minor_units: i64, decimals: u32, currency: impl Into<String>) -> Self {
        Self {
            minor_units,
            decimals,
            currency: currency.into(),
        }
    }

    /// Amount in major units, if the scale is representable.
    #[must_use]
    pub fn amount(&self) -> Option<Decimal> {
        Decimal::try_new(self.minor_units, self.decimals).ok()
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(amount) = self.amount() else {
            return write!(f, "{} {}", self.minor_units, self.currency);
        };
        let code = self.currency.to_ascii_uppercase();
        match code.as_str() {
            "USD" => write!(f, "${amount}"),
            "CAD" => write!(f, "CA${amount}"),
            "AUD" => write!(f, "A${amount}"),
            "BRL" => write!(f, "R${amount}"),
            "GBP" => write!(f, "£{amount}"),
            "JPY" => write!(f, "¥{amount}"),
            "EUR" => write!(f, "{amount} €"),
            _ => write!(f, "{amount} {code}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_known_currencies() {
        assert_eq!(Price::new(1999, 2, "USD").to_string(), "$19.99");
        assert_eq!(Price::new(499, 2, "gbp").to_string(), "£4.99");
        assert_eq!(Price::new(1250, 2, "EUR").to_string(), "12.50 €");
        assert_eq!(Price::new(980, 0, "JPY").to_string(), "¥980");
    }

    #[test]
    fn unknown_currency_falls_back_to_code() {
        assert_eq!(Price::new(10000, 2, "PLN").to_string(), "100.00 PLN");
    }
}
