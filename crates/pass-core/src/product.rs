//! # Product Types
//!
//! The single SKU sold by dex-pass.
//! The default can be overridden from `config/product.toml`.

use serde::{Deserialize, Serialize};

/// Supported currencies (ISO 4217)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    #[default]
    EUR,
    USD,
    GBP,
    CHF,
    JPY,
}

impl Currency {
    /// Returns the lowercase ISO 4217 code the provider expects
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::EUR => "eur",
            Currency::USD => "usd",
            Currency::GBP => "gbp",
            Currency::CHF => "chf",
            Currency::JPY => "jpy",
        }
    }

    /// Number of minor-unit decimals (JPY has none)
    pub fn decimal_places(&self) -> u8 {
        match self {
            Currency::JPY => 0,
            _ => 2,
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str().to_uppercase())
    }
}

/// Price with amount in smallest currency unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in smallest currency unit (cents for EUR)
    pub amount: i64,
    /// Currency
    pub currency: Currency,
}

impl Price {
    /// Create a price from smallest unit (cents)
    pub fn from_cents(amount: i64, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Format for logs (e.g., "5.00 EUR")
    pub fn display(&self) -> String {
        match self.currency.decimal_places() {
            0 => format!("{} {}", self.amount, self.currency),
            _ => format!(
                "{}.{:02} {}",
                self.amount / 100,
                (self.amount % 100).abs(),
                self.currency
            ),
        }
    }
}

/// The product granted by a successful checkout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Label shown on the hosted checkout page
    pub name: String,

    /// Unit price (quantity is always 1)
    pub price: Price,
}

impl Product {
    pub fn new(name: impl Into<String>, price: Price) -> Self {
        Self {
            name: name.into(),
            price,
        }
    }

    /// Load from a TOML document with `name` and `[price]`
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }
}

impl Default for Product {
    fn default() -> Self {
        Self::new("Accès Pokédex", Price::from_cents(500, Currency::EUR))
    }
}
