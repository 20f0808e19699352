//! Conversion service - currency and asset conversion over static rate tables

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::domain::rates::normalize_unit;
use crate::domain::ExchangeRateTable;

/// A computed conversion, for display next to the form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionQuote {
    pub amount: Decimal,
    pub from: String,
    pub to: String,
    pub rate: Decimal,
    pub converted: Decimal,
}

/// Parse a user-typed amount
///
/// Returns `None` for anything that is not a strictly positive decimal.
pub fn parse_amount(input: &str) -> Option<Decimal> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    Decimal::from_str(trimmed)
        .ok()
        .filter(|amount| amount.is_sign_positive() && !amount.is_zero())
}

/// Convert `amount` of `from` into `to`
///
/// Invalid, zero or negative amounts and unknown pairs give `None` rather
/// than an error. The result is rounded half away from zero to the target
/// unit's precision.
pub fn convert(amount: &str, from: &str, to: &str, table: &ExchangeRateTable) -> Option<Decimal> {
    quote(amount, from, to, table).map(|q| q.converted)
}

/// Convert and keep the rate used
pub fn quote(amount: &str, from: &str, to: &str, table: &ExchangeRateTable) -> Option<ConversionQuote> {
    let amount = parse_amount(amount)?;
    let rate = table.rate(from, to)?;
    let converted = amount
        .checked_mul(rate)?
        .round_dp_with_strategy(table.decimals_for(to), RoundingStrategy::MidpointAwayFromZero);

    Some(ConversionQuote {
        amount,
        from: normalize_unit(from),
        to: normalize_unit(to),
        rate,
        converted,
    })
}

/// Convert there and back again
///
/// The rate tables are hand-authored, so the result routinely differs from
/// the starting amount. Used to document those asymmetries.
pub fn round_trip(amount: &str, from: &str, to: &str, table: &ExchangeRateTable) -> Option<Decimal> {
    let there = convert(amount, from, to, table)?;
    convert(&there.to_string(), to, from, table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::demo::{international_rates, swap_rates, transfer_rates};

    #[test]
    fn test_invalid_amounts_yield_nothing() {
        let table = transfer_rates();
        for input in ["0", "-5", "abc", "", "  ", "0.00", "1e5", "NaN"] {
            assert_eq!(convert(input, "USD", "EUR", &table), None, "input {:?}", input);
        }
    }

    #[test]
    fn test_same_unit_is_identity() {
        let table = transfer_rates();
        assert_eq!(convert("12.5", "usd", "USD", &table), Some(Decimal::new(1250, 2)));
        // No self-pair exists for an unknown unit either
        assert_eq!(convert("3", "XAU", "XAU", &table), Some(Decimal::new(3, 0)));
    }

    #[test]
    fn test_transfer_pair() {
        let table = transfer_rates();
        assert_eq!(convert("100", "USD", "EUR", &table), Some(Decimal::new(9200, 2)));
        assert_eq!(convert("1000", "JPY", "USD", &table), Some(Decimal::new(670, 2)));
    }

    #[test]
    fn test_unknown_pair_yields_nothing() {
        let table = transfer_rates();
        assert_eq!(convert("100", "CAD", "JPY", &table), None);
    }

    #[test]
    fn test_crypto_rounds_to_asset_precision() {
        let table = swap_rates();
        // 1000 / 67500 = 0.0148148148...
        assert_eq!(convert("1000", "USDT", "BTC", &table), Some(Decimal::new(1481481, 8)));
        // 1 BTC = 20 ETH exactly
        assert_eq!(convert("1", "BTC", "ETH", &table), Some(Decimal::new(20, 0)));
    }

    #[test]
    fn test_international_cross_rate_uses_four_places() {
        let table = international_rates();
        // 1 / 1.10 = 0.90909...
        let quote = quote("1", "USD", "EUR", &table).unwrap();
        assert_eq!(quote.converted, Decimal::new(9091, 4));
        assert_eq!(quote.from, "USD");
    }

    #[test]
    fn test_midpoint_rounds_away_from_zero() {
        let table = transfer_rates();
        // 0.125 * 1.08 = 0.135 -> 0.14
        assert_eq!(convert("0.125", "EUR", "USD", &table), Some(Decimal::new(14, 2)));
    }
}
