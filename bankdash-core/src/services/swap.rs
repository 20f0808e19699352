//! Swap service - exchange between wallet assets at the swap table's prices

use std::sync::Arc;

use crate::domain::result::{Error, Result};
use crate::domain::{
    Asset, ExchangeRateTable, FormData, Receipt, SwapForm, TransactionKind, TransactionRequest,
    ValidationErrors,
};
use crate::ports::TransactionGateway;
use crate::services::conversion::{self, ConversionQuote};
use crate::services::submission::Submission;
use crate::services::validation::{schemas, Schema};

pub struct SwapService {
    assets: Vec<Asset>,
    rates: ExchangeRateTable,
    schema: Schema,
    submission: Submission,
}

impl SwapService {
    pub fn new(assets: Vec<Asset>, rates: ExchangeRateTable, gateway: Arc<dyn TransactionGateway>) -> Self {
        let schema = schemas::swap(&rates.unit_codes());
        Self {
            assets,
            rates,
            schema,
            submission: Submission::new(gateway),
        }
    }

    pub fn rates(&self) -> &ExchangeRateTable {
        &self.rates
    }

    pub fn submission(&self) -> &Submission {
        &self.submission
    }

    fn normalized(form: &SwapForm) -> SwapForm {
        SwapForm {
            from_asset: form.from_asset.trim().to_uppercase(),
            to_asset: form.to_asset.trim().to_uppercase(),
            amount: form.amount.clone(),
        }
    }

    /// Validate a swap and price it
    ///
    /// Swapping more of a held asset than the wallet holds is rejected;
    /// units the wallet does not hold (fiat) are not balance-checked.
    pub fn quote(&self, form: &SwapForm) -> Result<ConversionQuote> {
        let form = Self::normalized(form);
        self.schema.validate(&FormData::from_form(&form)?)?;

        let quote = conversion::quote(&form.amount, &form.from_asset, &form.to_asset, &self.rates)
            .ok_or_else(|| {
                let mut errors = ValidationErrors::default();
                errors.push("toAsset", "No price available for this pair");
                Error::Validation(errors)
            })?;

        if let Some(held) = self.assets.iter().find(|a| a.symbol == quote.from) {
            if quote.amount > held.balance {
                let mut errors = ValidationErrors::default();
                errors.push("amount", format!("Insufficient {} balance", held.symbol));
                return Err(Error::Validation(errors));
            }
        }

        Ok(quote)
    }

    pub async fn submit(&self, form: &SwapForm) -> Result<Receipt> {
        let quote = self.quote(form)?;
        let request = TransactionRequest::new(
            TransactionKind::Swap,
            quote.amount,
            &quote.from,
            format!("{} {} -> {} {}", quote.amount, quote.from, quote.converted, quote.to),
        );
        self.submission.submit(&request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use rust_decimal::Decimal;

    use crate::adapters::demo::{demo_assets, swap_rates};
    use crate::adapters::simulated::SimulatedGateway;

    fn service() -> SwapService {
        SwapService::new(
            demo_assets(),
            swap_rates(),
            Arc::new(SimulatedGateway::new(Duration::from_millis(1500))),
        )
    }

    fn swap(from: &str, to: &str, amount: &str) -> SwapForm {
        SwapForm {
            from_asset: from.to_string(),
            to_asset: to.to_string(),
            amount: amount.to_string(),
        }
    }

    #[test]
    fn test_quote() {
        let quote = service().quote(&swap("btc", "eth", "0.1")).unwrap();
        assert_eq!(quote.converted, Decimal::new(2, 0));
        assert_eq!(quote.from, "BTC");
    }

    #[test]
    fn test_insufficient_balance() {
        let err = service().quote(&swap("BTC", "ETH", "2")).unwrap_err();
        assert_eq!(
            err.validation_errors().unwrap().first_for("amount"),
            Some("Insufficient BTC balance")
        );
    }

    #[test]
    fn test_same_asset_rejected() {
        let err = service().quote(&swap("ETH", "eth", "1")).unwrap_err();
        assert!(err.validation_errors().unwrap().has("toAsset"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit() {
        let service = service();
        let receipt = service.submit(&swap("SOL", "USDT", "10")).await.unwrap();
        assert_eq!(receipt.kind, TransactionKind::Swap);
        assert_eq!(receipt.currency, "SOL");
        assert!(receipt.summary.starts_with("10 SOL -> 1452"));
        assert!(receipt.summary.ends_with("USDT"));
    }
}
