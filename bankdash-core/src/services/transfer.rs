//! Transfer service - domestic and international transfers
//!
//! Transfers are validated, quoted and handed to the gateway. Account
//! balances are display values and are never changed by a transfer.

use std::sync::Arc;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::adapters::demo::{international_rates, transfer_rates};
use crate::domain::result::{Error, Result};
use crate::domain::{
    Account, Beneficiary, ExchangeRateTable, FeePaymentOption, FieldKind, FormData,
    InternationalTransferForm, Receipt, TransactionKind, TransactionRequest, TransferForm,
    ValidationErrors,
};
use crate::ports::TransactionGateway;
use crate::services::conversion::{self, ConversionQuote};
use crate::services::requirements::RequirementResolver;
use crate::services::submission::Submission;
use crate::services::validation::{schemas, Schema};

/// Flat international transfer fee, in USD
pub fn international_fee_usd() -> Decimal {
    Decimal::new(2500, 2)
}

/// A validated domestic transfer
#[derive(Debug, Clone, Serialize)]
pub struct DomesticQuote {
    pub from_account: String,
    pub to_account: String,
    pub amount: Decimal,
    pub currency: String,
    /// Present when the two accounts hold different currencies
    pub converted: Option<ConversionQuote>,
}

/// A validated international transfer with its fee split
#[derive(Debug, Clone, Serialize)]
pub struct InternationalQuote {
    pub from_account: String,
    pub recipient_country: String,
    pub amount: Decimal,
    pub source_currency: String,
    pub fee: Decimal,
    pub fee_option: FeePaymentOption,
    /// What leaves the source account
    pub total_debit: Decimal,
    pub target_currency: String,
    pub rate: Decimal,
    /// What the recipient receives, in the target currency
    pub recipient_amount: Decimal,
    pub required_fields: Vec<FieldKind>,
}

fn field_error(path: &str, message: impl Into<String>) -> Error {
    let mut errors = ValidationErrors::default();
    errors.push(path, message);
    Error::Validation(errors)
}

fn round_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Amounts (debit, net) for a fee split
fn split_fee(amount: Decimal, fee: Decimal, option: FeePaymentOption) -> (Decimal, Decimal) {
    match option {
        FeePaymentOption::Sender => (amount + fee, amount),
        FeePaymentOption::Recipient => (amount, amount - fee),
        FeePaymentOption::Shared => {
            let sender_half = round_cents(fee / Decimal::TWO);
            (amount + sender_half, amount - (fee - sender_half))
        }
    }
}

pub struct TransferService {
    accounts: Vec<Account>,
    beneficiaries: Vec<Beneficiary>,
    resolver: Arc<RequirementResolver>,
    transfer_rates: ExchangeRateTable,
    international_rates: ExchangeRateTable,
    international_schema: Schema,
    domestic: Submission,
    international: Submission,
}

impl TransferService {
    pub fn new(
        accounts: Vec<Account>,
        beneficiaries: Vec<Beneficiary>,
        resolver: Arc<RequirementResolver>,
        gateway: Arc<dyn TransactionGateway>,
    ) -> Self {
        Self {
            accounts,
            beneficiaries,
            international_schema: schemas::international_transfer(&resolver),
            resolver,
            transfer_rates: transfer_rates(),
            international_rates: international_rates(),
            domestic: Submission::new(Arc::clone(&gateway)),
            international: Submission::new(gateway),
        }
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn beneficiaries(&self) -> &[Beneficiary] {
        &self.beneficiaries
    }

    pub fn resolver(&self) -> &RequirementResolver {
        &self.resolver
    }

    pub fn domestic_submission(&self) -> &Submission {
        &self.domestic
    }

    pub fn international_submission(&self) -> &Submission {
        &self.international
    }

    /// Find an account by id or by name (case-insensitive)
    pub fn find_account(&self, key: &str) -> Option<&Account> {
        let key = key.trim();
        self.accounts
            .iter()
            .find(|a| a.id.to_string() == key || a.name.eq_ignore_ascii_case(key))
    }

    fn account_for(&self, path: &str, key: &str) -> Result<&Account> {
        self.find_account(key)
            .ok_or_else(|| field_error(path, "Unknown account"))
    }

    /// Validate a domestic transfer and work out any currency conversion
    pub fn quote_domestic(&self, form: &TransferForm) -> Result<DomesticQuote> {
        schemas::transfer().validate(&FormData::from_form(form)?)?;

        let from = self.account_for("fromAccount", &form.from_account)?;
        let to = self.account_for("toAccount", &form.to_account)?;
        if from.id == to.id {
            return Err(field_error("toAccount", "Cannot transfer to the same account"));
        }

        let amount = conversion::parse_amount(&form.amount)
            .ok_or_else(|| field_error("amount", "Amount must be greater than 0"))?;

        let converted = if from.currency == to.currency {
            None
        } else {
            let quote = conversion::quote(&form.amount, &from.currency, &to.currency, &self.transfer_rates)
                .ok_or_else(|| {
                    field_error(
                        "toAccount",
                        format!("No exchange rate from {} to {}", from.currency, to.currency),
                    )
                })?;
            Some(quote)
        };

        Ok(DomesticQuote {
            from_account: from.name.clone(),
            to_account: to.name.clone(),
            amount,
            currency: from.currency.clone(),
            converted,
        })
    }

    pub async fn submit_domestic(&self, form: &TransferForm) -> Result<Receipt> {
        let quote = self.quote_domestic(form)?;
        let request = TransactionRequest::new(
            TransactionKind::Transfer,
            quote.amount,
            &quote.currency,
            format!("{} -> {}", quote.from_account, quote.to_account),
        );
        self.domestic.submit(&request).await
    }

    /// Fill the recipient from a saved beneficiary
    ///
    /// Switches the destination country too, clearing identifiers the new
    /// country does not use.
    pub fn apply_beneficiary(&self, form: &mut InternationalTransferForm, id: &str) -> Result<()> {
        let id = id.trim();
        let beneficiary = self
            .beneficiaries
            .iter()
            .find(|b| b.id.to_string() == id || b.name.eq_ignore_ascii_case(id))
            .ok_or_else(|| Error::not_found(format!("Beneficiary {}", id)))?;

        form.recipient_name = beneficiary.name.clone();
        form.bank_name = beneficiary.bank_name.clone();
        form.account_number = beneficiary.account_number.clone();
        self.resolver.select_country(form, &beneficiary.country);
        Ok(())
    }

    /// Validate an international transfer and price it
    ///
    /// The fee is converted from USD into the source account's currency.
    /// `feePaymentOption` defaults to the sender paying.
    pub fn quote_international(&self, form: &InternationalTransferForm) -> Result<InternationalQuote> {
        self.international_schema.validate(&FormData::from_form(form)?)?;

        let from = self.account_for("fromAccount", &form.from_account)?;
        let amount = conversion::parse_amount(&form.amount)
            .ok_or_else(|| field_error("amount", "Amount must be greater than 0"))?;
        let fee_option = form
            .fee_payment_option
            .as_deref()
            .and_then(FeePaymentOption::parse)
            .unwrap_or(FeePaymentOption::Sender);

        let source = from.currency.clone();
        let target = form.currency.trim().to_uppercase();

        let fee = conversion::convert(
            &international_fee_usd().to_string(),
            "USD",
            &source,
            &self.international_rates,
        )
        .map(round_cents)
        .ok_or_else(|| field_error("fromAccount", format!("Transfers from {} are not supported", source)))?;

        let (total_debit, net) = split_fee(amount, fee, fee_option);
        if net <= Decimal::ZERO {
            return Err(field_error("amount", "Amount must be greater than the transfer fee"));
        }

        let quote = conversion::quote(&net.to_string(), &source, &target, &self.international_rates)
            .ok_or_else(|| field_error("currency", format!("No exchange rate from {} to {}", source, target)))?;

        Ok(InternationalQuote {
            from_account: from.name.clone(),
            recipient_country: form.recipient_country.trim().to_uppercase(),
            amount,
            source_currency: source,
            fee,
            fee_option,
            total_debit,
            target_currency: target,
            rate: quote.rate,
            recipient_amount: quote.converted,
            required_fields: self.resolver.resolve(&form.recipient_country),
        })
    }

    pub async fn submit_international(&self, form: &InternationalTransferForm) -> Result<Receipt> {
        let quote = self.quote_international(form)?;
        let request = TransactionRequest::new(
            TransactionKind::InternationalTransfer,
            quote.total_debit,
            &quote.source_currency,
            format!(
                "{} -> {} ({})",
                quote.from_account, quote.recipient_country, quote.target_currency
            ),
        );
        self.international.submit(&request).await
    }
}
