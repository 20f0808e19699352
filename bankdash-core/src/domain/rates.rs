//! Static exchange-rate tables
//!
//! Rates are hand-authored mock values, never refreshed from a market feed.
//! Tables are not required to be consistent: converting A -> B -> A may not
//! return the starting amount, and the tables used by different screens
//! disagree with each other for the same pair.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How a unit's converted amounts are rounded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "type")]
pub enum UnitKind {
    /// Fiat currency, rounded to the table's fiat precision
    Fiat,
    /// Crypto asset with its own display precision
    Crypto { decimals: u32 },
}

/// Screen a rate table belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RateSource {
    Swap,
    Transfer,
    International,
}

impl RateSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            RateSource::Swap => "swap",
            RateSource::Transfer => "transfer",
            RateSource::International => "international",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "swap" => Some(RateSource::Swap),
            "transfer" => Some(RateSource::Transfer),
            "international" => Some(RateSource::International),
            _ => None,
        }
    }
}

/// How rates are keyed
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "type")]
pub enum RateQuote {
    /// Direct rate per ordered pair: `from -> to -> rate`
    Pairs(BTreeMap<String, BTreeMap<String, Decimal>>),
    /// Value of one unit expressed in `base`
    Base {
        base: String,
        values: BTreeMap<String, Decimal>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeRateTable {
    pub source: RateSource,
    pub quote: RateQuote,
    pub units: BTreeMap<String, UnitKind>,
    /// Decimal places for fiat targets
    pub fiat_decimals: u32,
}

impl ExchangeRateTable {
    /// Empty table keyed by currency pair
    pub fn pairs(source: RateSource, fiat_decimals: u32) -> Self {
        Self {
            source,
            quote: RateQuote::Pairs(BTreeMap::new()),
            units: BTreeMap::new(),
            fiat_decimals,
        }
    }

    /// Empty table keyed by value in a base unit
    pub fn based_on(source: RateSource, base: &str, fiat_decimals: u32) -> Self {
        let base = normalize_unit(base);
        let mut values = BTreeMap::new();
        values.insert(base.clone(), Decimal::ONE);
        Self {
            source,
            quote: RateQuote::Base { base, values },
            units: BTreeMap::new(),
            fiat_decimals,
        }
    }

    pub fn with_unit(mut self, code: &str, kind: UnitKind) -> Self {
        self.units.insert(normalize_unit(code), kind);
        self
    }

    /// Add a direct pair rate. Ignored on base-keyed tables.
    pub fn with_pair(mut self, from: &str, to: &str, rate: Decimal) -> Self {
        if let RateQuote::Pairs(pairs) = &mut self.quote {
            pairs
                .entry(normalize_unit(from))
                .or_default()
                .insert(normalize_unit(to), rate);
        }
        self
    }

    /// Set the base value of a unit. Ignored on pair-keyed tables.
    pub fn with_value(mut self, code: &str, value: Decimal) -> Self {
        if let RateQuote::Base { values, .. } = &mut self.quote {
            values.insert(normalize_unit(code), value);
        }
        self
    }

    /// Rate to multiply an amount of `from` by to get `to`
    ///
    /// Identical units are always 1 without touching the table. A missing
    /// entry or a zero divisor gives `None`.
    pub fn rate(&self, from: &str, to: &str) -> Option<Decimal> {
        let from = normalize_unit(from);
        let to = normalize_unit(to);
        if from == to {
            return Some(Decimal::ONE);
        }

        match &self.quote {
            RateQuote::Pairs(pairs) => pairs.get(&from).and_then(|m| m.get(&to)).copied(),
            RateQuote::Base { values, .. } => {
                let from_value = values.get(&from)?;
                let to_value = values.get(&to)?;
                if to_value.is_zero() {
                    return None;
                }
                from_value.checked_div(*to_value)
            }
        }
    }

    /// Decimal places a converted amount in `unit` is rounded to
    pub fn decimals_for(&self, unit: &str) -> u32 {
        match self.units.get(&normalize_unit(unit)) {
            Some(UnitKind::Crypto { decimals }) => *decimals,
            _ => self.fiat_decimals,
        }
    }

    pub fn unit_codes(&self) -> Vec<&str> {
        self.units.keys().map(String::as_str).collect()
    }

    pub fn knows(&self, unit: &str) -> bool {
        self.units.contains_key(&normalize_unit(unit))
    }
}

/// Normalize a currency or asset code to uppercase
pub fn normalize_unit(code: &str) -> String {
    code.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_needs_no_entry() {
        let table = ExchangeRateTable::pairs(RateSource::Transfer, 2);
        assert_eq!(table.rate("XYZ", "xyz"), Some(Decimal::ONE));
    }

    #[test]
    fn test_pair_lookup_is_directional() {
        let table = ExchangeRateTable::pairs(RateSource::Transfer, 2)
            .with_pair("USD", "EUR", Decimal::new(92, 2));
        assert_eq!(table.rate("usd", "eur"), Some(Decimal::new(92, 2)));
        assert_eq!(table.rate("EUR", "USD"), None);
    }

    #[test]
    fn test_base_values_divide() {
        let table = ExchangeRateTable::based_on(RateSource::Swap, "USD", 2)
            .with_value("BTC", Decimal::new(67500, 0))
            .with_value("ETH", Decimal::new(3375, 0));
        assert_eq!(table.rate("BTC", "ETH"), Some(Decimal::new(20, 0)));
        assert_eq!(table.rate("USD", "BTC").map(|r| r.is_sign_positive()), Some(true));
    }

    #[test]
    fn test_zero_value_yields_no_rate() {
        let table = ExchangeRateTable::based_on(RateSource::Swap, "USD", 2)
            .with_value("DEAD", Decimal::ZERO);
        assert_eq!(table.rate("USD", "DEAD"), None);
    }

    #[test]
    fn test_decimals_for_units() {
        let table = ExchangeRateTable::pairs(RateSource::International, 4)
            .with_unit("BTC", UnitKind::Crypto { decimals: 8 })
            .with_unit("EUR", UnitKind::Fiat);
        assert_eq!(table.decimals_for("btc"), 8);
        assert_eq!(table.decimals_for("EUR"), 4);
    }
}
