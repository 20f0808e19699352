//! Demo reference data
//!
//! Hardcoded lookup tables the dashboard runs on:
//! - 5 bank accounts and 5 crypto assets
//! - 3 exchange-rate tables (swap, transfer, international), intentionally
//!   left inconsistent with each other
//! - 18 countries with their required bank identifiers and banks
//! - 5 loan products and 4 saved beneficiaries

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::country::FieldKind::*;
use crate::domain::{
    Account, AccountKind, Asset, Bank, Beneficiary, CountryProfile, ExchangeRateTable, LoanType,
    RateSource, UnitKind,
};

pub const CHECKING_ID: Uuid = Uuid::from_u128(0x11111111_1111_1111_1111_111111111111);
pub const SAVINGS_ID: Uuid = Uuid::from_u128(0x22222222_2222_2222_2222_222222222222);
pub const BUSINESS_ID: Uuid = Uuid::from_u128(0x33333333_3333_3333_3333_333333333333);
pub const EURO_ID: Uuid = Uuid::from_u128(0x44444444_4444_4444_4444_444444444444);
pub const CREDIT_ID: Uuid = Uuid::from_u128(0x55555555_5555_5555_5555_555555555555);

/// Generate demo bank accounts
pub fn demo_accounts() -> Vec<Account> {
    vec![
        Account::new(CHECKING_ID, "Primary Checking", AccountKind::Checking, "4532015112830366")
            .with_balance(Decimal::new(1245075, 2), "USD"), // $12,450.75
        Account::new(SAVINGS_ID, "High-Yield Savings", AccountKind::Savings, "4532015144712209")
            .with_balance(Decimal::new(4523000, 2), "USD"), // $45,230.00
        Account::new(BUSINESS_ID, "Business Account", AccountKind::Business, "4532015177651843")
            .with_balance(Decimal::new(7892050, 2), "USD"), // $78,920.50
        Account::new(EURO_ID, "Euro Account", AccountKind::Checking, "DE89370400440532013000")
            .with_balance(Decimal::new(834020, 2), "EUR"), // 8,340.20 EUR
        Account::new(CREDIT_ID, "Platinum Credit", AccountKind::Credit, "5425233430109903")
            .with_balance(Decimal::new(-215040, 2), "USD"), // -$2,150.40
    ]
}

/// Generate demo crypto wallet
pub fn demo_assets() -> Vec<Asset> {
    vec![
        Asset::new(
            "btc",
            "BTC",
            "Bitcoin",
            Decimal::new(5, 1),
            "bc1qxy2kgdygjrsqtzq2n0yrf2493p83kkfjhx0wlh",
            Decimal::new(3375000, 2),
        ),
        Asset::new(
            "eth",
            "ETH",
            "Ethereum",
            Decimal::new(425, 2),
            "0x71C7656EC7ab88b098defB751B7401B5f6d8976F",
            Decimal::new(1434375, 2),
        ),
        Asset::new(
            "sol",
            "SOL",
            "Solana",
            Decimal::new(120, 0),
            "7EcDhSYGxXyscszYEp35KHN8vvw3svAuLKTzXwCFLtV",
            Decimal::new(1742400, 2),
        ),
        Asset::new(
            "usdt",
            "USDT",
            "Tether",
            Decimal::new(5000, 0),
            "0x8ba1f109551bD432803012645Ac136ddd64DBA72",
            Decimal::new(500000, 2),
        ),
        Asset::new(
            "ada",
            "ADA",
            "Cardano",
            Decimal::new(2500, 0),
            "addr1qx2fxv2umyhttkxyxp8x0dlpdt3k6cwng5pxj3jhsydzer3jcu5d8ps7zex2k2xt3uqxgjqnnj83ws8lhrn648jjxtwq2ytjqp",
            Decimal::new(112500, 2),
        ),
    ]
}

/// Swap page rates: USD value of one unit
pub fn swap_rates() -> ExchangeRateTable {
    ExchangeRateTable::based_on(RateSource::Swap, "USD", 2)
        .with_unit("USD", UnitKind::Fiat)
        .with_unit("EUR", UnitKind::Fiat)
        .with_unit("BTC", UnitKind::Crypto { decimals: 8 })
        .with_unit("ETH", UnitKind::Crypto { decimals: 6 })
        .with_unit("SOL", UnitKind::Crypto { decimals: 4 })
        .with_unit("USDT", UnitKind::Crypto { decimals: 2 })
        .with_unit("ADA", UnitKind::Crypto { decimals: 2 })
        .with_value("EUR", Decimal::new(109, 2))
        .with_value("BTC", Decimal::new(67500, 0))
        .with_value("ETH", Decimal::new(3375, 0))
        .with_value("SOL", Decimal::new(14520, 2))
        .with_value("USDT", Decimal::ONE)
        .with_value("ADA", Decimal::new(45, 2))
}

/// Transfer page rates: direct pairs, not reciprocal
pub fn transfer_rates() -> ExchangeRateTable {
    ExchangeRateTable::pairs(RateSource::Transfer, 2)
        .with_unit("USD", UnitKind::Fiat)
        .with_unit("EUR", UnitKind::Fiat)
        .with_unit("GBP", UnitKind::Fiat)
        .with_unit("JPY", UnitKind::Fiat)
        .with_unit("CAD", UnitKind::Fiat)
        .with_pair("USD", "EUR", Decimal::new(92, 2))
        .with_pair("EUR", "USD", Decimal::new(108, 2))
        .with_pair("USD", "GBP", Decimal::new(79, 2))
        .with_pair("GBP", "USD", Decimal::new(126, 2))
        .with_pair("EUR", "GBP", Decimal::new(86, 2))
        .with_pair("GBP", "EUR", Decimal::new(116, 2))
        .with_pair("USD", "JPY", Decimal::new(14950, 2))
        .with_pair("JPY", "USD", Decimal::new(67, 4))
        .with_pair("USD", "CAD", Decimal::new(136, 2))
        .with_pair("CAD", "USD", Decimal::new(73, 2))
}

/// International transfer rates: USD value of one unit, 4 dp cross-rates
pub fn international_rates() -> ExchangeRateTable {
    let fiat = [
        ("EUR", Decimal::new(110, 2)),
        ("GBP", Decimal::new(127, 2)),
        ("CHF", Decimal::new(113, 2)),
        ("AUD", Decimal::new(66, 2)),
        ("CAD", Decimal::new(74, 2)),
        ("INR", Decimal::new(12, 3)),
        ("MXN", Decimal::new(58, 3)),
        ("RUB", Decimal::new(11, 3)),
        ("BRL", Decimal::new(20, 2)),
        ("JPY", Decimal::new(68, 4)),
        ("ZAR", Decimal::new(55, 3)),
        ("SGD", Decimal::new(75, 2)),
        ("NGN", Decimal::new(65, 5)),
    ];

    let mut table = ExchangeRateTable::based_on(RateSource::International, "USD", 4)
        .with_unit("USD", UnitKind::Fiat);
    for (code, value) in fiat {
        table = table.with_unit(code, UnitKind::Fiat).with_value(code, value);
    }
    table
}

/// Rate table used by a given screen
pub fn rate_table(source: RateSource) -> ExchangeRateTable {
    match source {
        RateSource::Swap => swap_rates(),
        RateSource::Transfer => transfer_rates(),
        RateSource::International => international_rates(),
    }
}

fn banks(entries: &[(&str, &str)]) -> Vec<Bank> {
    entries
        .iter()
        .map(|(name, code)| Bank::new(*name, *code))
        .collect()
}

/// Generate the country reference table
pub fn demo_countries() -> Vec<CountryProfile> {
    vec![
        CountryProfile::new("US", "United States", "USD", &[RoutingNumber, SwiftBic]).with_banks(
            banks(&[("JPMorgan Chase", "CHASUS33"), ("Bank of America", "BOFAUS3N"), ("Wells Fargo", "WFBIUS6S")]),
        ),
        CountryProfile::new("GB", "United Kingdom", "GBP", &[SortCode, SwiftBic]).with_banks(
            banks(&[("Barclays", "BARCGB22"), ("HSBC UK", "HBUKGB4B"), ("Lloyds Bank", "LOYDGB2L")]),
        ),
        CountryProfile::new("DE", "Germany", "EUR", &[Iban, SwiftBic]).with_banks(banks(&[
            ("Deutsche Bank", "DEUTDEFF"),
            ("Commerzbank", "COBADEFF"),
            ("DZ Bank", "GENODEFF"),
        ])),
        CountryProfile::new("FR", "France", "EUR", &[Iban, SwiftBic])
            .with_banks(banks(&[("BNP Paribas", "BNPAFRPP"), ("Societe Generale", "SOGEFRPP")])),
        CountryProfile::new("ES", "Spain", "EUR", &[Iban, SwiftBic])
            .with_banks(banks(&[("Banco Santander", "BSCHESMM"), ("BBVA", "BBVAESMM")])),
        CountryProfile::new("IT", "Italy", "EUR", &[Iban, SwiftBic])
            .with_banks(banks(&[("UniCredit", "UNCRITMM"), ("Intesa Sanpaolo", "BCITITMM")])),
        CountryProfile::new("NL", "Netherlands", "EUR", &[Iban, SwiftBic])
            .with_banks(banks(&[("ING Bank", "INGBNL2A"), ("ABN AMRO", "ABNANL2A")])),
        CountryProfile::new("CH", "Switzerland", "CHF", &[Iban, SwiftBic])
            .with_banks(banks(&[("UBS", "UBSWCHZH"), ("Credit Suisse", "CRESCHZZ")])),
        CountryProfile::new("AU", "Australia", "AUD", &[Bsb, SwiftBic]).with_banks(banks(&[
            ("Commonwealth Bank", "CTBAAU2S"),
            ("Westpac", "WPACAU2S"),
            ("ANZ", "ANZBAU3M"),
        ])),
        CountryProfile::new("CA", "Canada", "CAD", &[BankCode, BranchCode, SwiftBic])
            .with_banks(banks(&[("Royal Bank of Canada", "003"), ("TD Canada Trust", "004")])),
        CountryProfile::new("IN", "India", "INR", &[Ifsc, SwiftBic])
            .with_banks(banks(&[("State Bank of India", "SBININBB"), ("HDFC Bank", "HDFCINBB")])),
        CountryProfile::new("MX", "Mexico", "MXN", &[Clabe, SwiftBic])
            .with_banks(banks(&[("BBVA Mexico", "BCMRMXMM"), ("Banorte", "MENOMXMT")])),
        CountryProfile::new("RU", "Russia", "RUB", &[Bik, SwiftBic])
            .with_banks(banks(&[("Sberbank", "SABRRUMM"), ("VTB Bank", "VTBRRUMM")])),
        CountryProfile::new("BR", "Brazil", "BRL", &[CpfCnpj, BankCode, BranchCode, SwiftBic])
            .with_banks(banks(&[("Banco do Brasil", "001"), ("Itau Unibanco", "341")])),
        CountryProfile::new("JP", "Japan", "JPY", &[BankCode, BranchCode, SwiftBic])
            .with_banks(banks(&[("MUFG Bank", "0005"), ("Mizuho Bank", "0001")])),
        CountryProfile::new("ZA", "South Africa", "ZAR", &[BranchCode, SwiftBic])
            .with_banks(banks(&[("Standard Bank", "051001"), ("FNB", "250655")])),
        CountryProfile::new("SG", "Singapore", "SGD", &[BankCode, SwiftBic])
            .with_banks(banks(&[("DBS Bank", "7171"), ("OCBC Bank", "7339")])),
        CountryProfile::new("NG", "Nigeria", "NGN", &[BankCode])
            .with_banks(banks(&[("Access Bank", "044"), ("Zenith Bank", "057")])),
    ]
}

/// Generate loan products
pub fn demo_loan_types() -> Vec<LoanType> {
    let loan = |id: &str, name: &str, apr: Decimal, min: i64, max: i64, terms: &[u32]| LoanType {
        id: id.to_string(),
        name: name.to_string(),
        apr,
        min_amount: Decimal::new(min, 0),
        max_amount: Decimal::new(max, 0),
        terms: terms.to_vec(),
    };

    vec![
        loan("personal", "Personal Loan", Decimal::new(85, 1), 1_000, 50_000, &[12, 24, 36, 48, 60]),
        loan("auto", "Auto Loan", Decimal::new(59, 1), 5_000, 75_000, &[36, 48, 60, 72]),
        loan("mortgage", "Home Mortgage", Decimal::new(675, 2), 50_000, 1_000_000, &[180, 240, 360]),
        loan("business", "Business Loan", Decimal::new(725, 2), 10_000, 500_000, &[12, 24, 36, 60, 84]),
        loan("student", "Student Loan", Decimal::new(499, 2), 1_000, 100_000, &[60, 120, 180]),
    ]
}

/// Generate saved beneficiaries
pub fn demo_beneficiaries() -> Vec<Beneficiary> {
    let beneficiary = |id: u128, name: &str, bank: &str, number: &str, country: &str| Beneficiary {
        id: Uuid::from_u128(id),
        name: name.to_string(),
        bank_name: bank.to_string(),
        account_number: number.to_string(),
        country: country.to_string(),
    };

    vec![
        beneficiary(0xb1, "Sarah Johnson", "JPMorgan Chase", "021000021784512", "US"),
        beneficiary(0xb2, "Oliver Smith", "Barclays", "31926819", "GB"),
        beneficiary(0xb3, "Lena Fischer", "Deutsche Bank", "DE89370400440532013000", "DE"),
        beneficiary(0xb4, "Priya Sharma", "State Bank of India", "30012345678", "IN"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_accounts_are_valid() {
        let accounts = demo_accounts();
        assert_eq!(accounts.len(), 5);
        for account in &accounts {
            assert!(account.validate().is_ok());
        }
    }

    #[test]
    fn test_asset_values_match_swap_prices() {
        let rates = swap_rates();
        for asset in demo_assets() {
            let price = rates.rate(&asset.symbol, "USD").unwrap();
            assert_eq!((asset.balance * price).round_dp(2), asset.usd_value, "{}", asset.symbol);
        }
    }

    #[test]
    fn test_country_codes_are_unique() {
        let countries = demo_countries();
        let mut codes: Vec<&str> = countries.iter().map(|c| c.code.as_str()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), countries.len());
    }

    #[test]
    fn test_every_country_currency_has_an_international_rate() {
        let rates = international_rates();
        for country in demo_countries() {
            assert!(rates.knows(&country.currency), "{}", country.currency);
        }
    }
}
