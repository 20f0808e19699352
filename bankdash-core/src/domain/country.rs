//! Country profiles and the bank-identifier vocabulary

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Additional bank identifier a country may require on a transfer form
///
/// Serialized as the form field name used for that identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FieldKind {
    #[serde(rename = "swiftCode")]
    SwiftBic,
    #[serde(rename = "iban")]
    Iban,
    #[serde(rename = "sortCode")]
    SortCode,
    #[serde(rename = "bsb")]
    Bsb,
    #[serde(rename = "branchCode")]
    BranchCode,
    #[serde(rename = "routingNumber")]
    RoutingNumber,
    #[serde(rename = "ifsc")]
    Ifsc,
    #[serde(rename = "clabe")]
    Clabe,
    #[serde(rename = "bik")]
    Bik,
    #[serde(rename = "cpfCnpj")]
    CpfCnpj,
    #[serde(rename = "bankCode")]
    BankCode,
}

static SWIFT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]{4}[A-Z]{2}[A-Z0-9]{2}([A-Z0-9]{3})?$").unwrap());
static IBAN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]{2}[0-9]{2}[A-Z0-9]{11,30}$").unwrap());
static SORT_CODE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{2}-?\d{2}-?\d{2}$").unwrap());
static BSB_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{3}-?\d{3}$").unwrap());
static BRANCH_CODE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{3,6}$").unwrap());
static ROUTING_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{9}$").unwrap());
static IFSC_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z]{4}0[A-Z0-9]{6}$").unwrap());
static CLABE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{18}$").unwrap());
static BIK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^04\d{7}$").unwrap());
static CPF_CNPJ_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{3}\.?\d{3}\.?\d{3}-?\d{2}|\d{2}\.?\d{3}\.?\d{3}/?\d{4}-?\d{2})$").unwrap()
});
static BANK_CODE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{3,5}$").unwrap());

impl FieldKind {
    pub const ALL: [FieldKind; 11] = [
        FieldKind::SwiftBic,
        FieldKind::Iban,
        FieldKind::SortCode,
        FieldKind::Bsb,
        FieldKind::BranchCode,
        FieldKind::RoutingNumber,
        FieldKind::Ifsc,
        FieldKind::Clabe,
        FieldKind::Bik,
        FieldKind::CpfCnpj,
        FieldKind::BankCode,
    ];

    /// Form field name carrying this identifier
    pub fn field_name(&self) -> &'static str {
        match self {
            FieldKind::SwiftBic => "swiftCode",
            FieldKind::Iban => "iban",
            FieldKind::SortCode => "sortCode",
            FieldKind::Bsb => "bsb",
            FieldKind::BranchCode => "branchCode",
            FieldKind::RoutingNumber => "routingNumber",
            FieldKind::Ifsc => "ifsc",
            FieldKind::Clabe => "clabe",
            FieldKind::Bik => "bik",
            FieldKind::CpfCnpj => "cpfCnpj",
            FieldKind::BankCode => "bankCode",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FieldKind::SwiftBic => "SWIFT/BIC Code",
            FieldKind::Iban => "IBAN",
            FieldKind::SortCode => "Sort Code",
            FieldKind::Bsb => "BSB Number",
            FieldKind::BranchCode => "Branch Code",
            FieldKind::RoutingNumber => "Routing Number",
            FieldKind::Ifsc => "IFSC Code",
            FieldKind::Clabe => "CLABE",
            FieldKind::Bik => "BIK",
            FieldKind::CpfCnpj => "CPF/CNPJ",
            FieldKind::BankCode => "Bank Code",
        }
    }

    /// Accepted format, checked after trimming and upper-casing the input
    pub fn pattern(&self) -> &'static Regex {
        match self {
            FieldKind::SwiftBic => &SWIFT_RE,
            FieldKind::Iban => &IBAN_RE,
            FieldKind::SortCode => &SORT_CODE_RE,
            FieldKind::Bsb => &BSB_RE,
            FieldKind::BranchCode => &BRANCH_CODE_RE,
            FieldKind::RoutingNumber => &ROUTING_RE,
            FieldKind::Ifsc => &IFSC_RE,
            FieldKind::Clabe => &CLABE_RE,
            FieldKind::Bik => &BIK_RE,
            FieldKind::CpfCnpj => &CPF_CNPJ_RE,
            FieldKind::BankCode => &BANK_CODE_RE,
        }
    }

    /// Whether a raw value is well-formed for this identifier
    pub fn accepts(&self, value: &str) -> bool {
        let normalized: String = value
            .trim()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_uppercase();
        self.pattern().is_match(&normalized)
    }

    pub fn from_field_name(name: &str) -> Option<FieldKind> {
        Self::ALL.iter().copied().find(|k| k.field_name() == name)
    }
}

/// A bank selectable for a country
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bank {
    pub name: String,
    pub code: String,
}

impl Bank {
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
        }
    }
}

/// Country reference entry driving the international transfer form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountryProfile {
    /// ISO 3166-1 alpha-2 code, upper-case
    pub code: String,
    pub name: String,
    /// ISO 4217 currency code
    pub currency: String,
    /// Identifier fields required by this country, in display order
    pub requirements: Vec<FieldKind>,
    pub banks: Vec<Bank>,
}

impl CountryProfile {
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        currency: impl Into<String>,
        requirements: &[FieldKind],
    ) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            currency: currency.into(),
            requirements: requirements.to_vec(),
            banks: Vec::new(),
        }
    }

    pub fn with_banks(mut self, banks: Vec<Bank>) -> Self {
        self.banks = banks;
        self
    }

    pub fn requires(&self, kind: FieldKind) -> bool {
        self.requirements.contains(&kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_formats() {
        assert!(FieldKind::SwiftBic.accepts("DEUTDEFF"));
        assert!(FieldKind::SwiftBic.accepts("deutdeff500"));
        assert!(!FieldKind::SwiftBic.accepts("DEUT"));
        assert!(FieldKind::Iban.accepts("DE89 3704 0044 0532 0130 00"));
        assert!(FieldKind::SortCode.accepts("20-00-00"));
        assert!(FieldKind::Bsb.accepts("062-000"));
        assert!(FieldKind::RoutingNumber.accepts("021000021"));
        assert!(!FieldKind::RoutingNumber.accepts("02100002"));
        assert!(FieldKind::Ifsc.accepts("SBIN0000300"));
        assert!(FieldKind::Clabe.accepts("002010077777777771"));
        assert!(FieldKind::Bik.accepts("044525225"));
        assert!(FieldKind::CpfCnpj.accepts("123.456.789-09"));
        assert!(FieldKind::CpfCnpj.accepts("12.345.678/0001-95"));
    }

    #[test]
    fn test_field_name_round_trips_through_lookup() {
        for kind in FieldKind::ALL {
            assert_eq!(FieldKind::from_field_name(kind.field_name()), Some(kind));
        }
        assert_eq!(FieldKind::from_field_name("accountNumber"), None);
    }

    #[test]
    fn test_field_kind_serializes_as_field_name() {
        let json = serde_json::to_string(&FieldKind::SortCode).unwrap();
        assert_eq!(json, "\"sortCode\"");
    }
}
