//! Type-safe price representation using decimal arithmetic.
//!
//! The store prices everything in Egyptian pounds and renders amounts with
//! two decimals followed by the currency symbol (`"149.50 ج.م"`).

use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., pounds, not piastres).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Format for display, e.g. `"10.00 ج.م"` or `"10.00 $"`.
    #[must_use]
    pub fn display(&self) -> String {
        let rounded = self
            .amount
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        format!("{rounded:.2} {}", self.currency_code.symbol())
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display())
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    EGP,
    SAR,
    AED,
    USD,
    EUR,
}

impl CurrencyCode {
    /// Symbol shown after amounts.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::EGP => "ج.م",
            Self::SAR => "ر.س",
            Self::AED => "د.إ",
            Self::USD => "$",
            Self::EUR => "€",
        }
    }

    /// The three-letter ISO code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::EGP => "EGP",
            Self::SAR => "SAR",
            Self::AED => "AED",
            Self::USD => "USD",
            Self::EUR => "EUR",
        }
    }
}

/// Error returned when a currency code is not supported.
#[derive(Debug, Clone, Error)]
#[error("unsupported currency code: {0}")]
pub struct ParseCurrencyError(String);

impl FromStr for CurrencyCode {
    type Err = ParseCurrencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "EGP" => Ok(Self::EGP),
            "SAR" => Ok(Self::SAR),
            "AED" => Ok(Self::AED),
            "USD" => Ok(Self::USD),
            "EUR" => Ok(Self::EUR),
            _ => Err(ParseCurrencyError(s.to_string())),
        }
    }
}

/// Percentage saved relative to a product's original (pre-sale) price.
///
/// Rounds half away from zero to a whole percent. Returns `0` when there is
/// no original price or it does not exceed the current price.
#[must_use]
pub fn discount_percent(original: Option<Decimal>, price: Decimal) -> u32 {
    let Some(original) = original else {
        return 0;
    };
    if original <= Decimal::ZERO || original <= price {
        return 0;
    }

    let Some(ratio) = original
        .checked_sub(price)
        .and_then(|saved| saved.checked_div(original))
    else {
        return 0;
    };
    let percent = (ratio * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);

    percent.to_u32().unwrap_or(0)
}
