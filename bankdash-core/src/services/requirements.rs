//! Requirement resolver - which bank identifiers a destination country needs
//!
//! A pure lookup from country code to an ordered list of identifier kinds,
//! kept apart from any rendering so it can be tested on its own.

use crate::adapters::demo::demo_countries;
use crate::domain::{CountryProfile, FieldKind, InternationalTransferForm};

pub struct RequirementResolver {
    countries: Vec<CountryProfile>,
}

impl Default for RequirementResolver {
    fn default() -> Self {
        Self::new(demo_countries())
    }
}

impl RequirementResolver {
    pub fn new(countries: Vec<CountryProfile>) -> Self {
        Self { countries }
    }

    pub fn countries(&self) -> &[CountryProfile] {
        &self.countries
    }

    /// Look up a country by code, case-insensitively
    pub fn find(&self, code: &str) -> Option<&CountryProfile> {
        let code = code.trim();
        self.countries
            .iter()
            .find(|c| c.code.eq_ignore_ascii_case(code))
    }

    /// Look up a country by display name, case-insensitively
    pub fn find_by_name(&self, name: &str) -> Option<&CountryProfile> {
        let name = name.trim();
        self.countries
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Identifier kinds required for `code`, in display order
    ///
    /// Unknown codes resolve to an empty list.
    pub fn resolve(&self, code: &str) -> Vec<FieldKind> {
        self.find(code)
            .map(|c| c.requirements.clone())
            .unwrap_or_default()
    }

    pub fn is_visible(&self, code: &str, kind: FieldKind) -> bool {
        self.find(code).map(|c| c.requires(kind)).unwrap_or(false)
    }

    /// Kinds from the vocabulary that are not shown for `code`
    pub fn hidden(&self, code: &str) -> Vec<FieldKind> {
        let visible = self.resolve(code);
        FieldKind::ALL
            .iter()
            .copied()
            .filter(|k| !visible.contains(k))
            .collect()
    }

    /// Switch the form to a new destination country
    ///
    /// Identifier values the new country does not use are cleared. Returns
    /// the kinds now shown.
    pub fn select_country(&self, form: &mut InternationalTransferForm, code: &str) -> Vec<FieldKind> {
        let visible = self.resolve(code);
        form.recipient_country = self
            .find(code)
            .map(|c| c.code.clone())
            .unwrap_or_else(|| code.trim().to_uppercase());
        form.identifiers.retain(|kind, _| visible.contains(kind));
        visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_country_is_empty() {
        let resolver = RequirementResolver::default();
        assert!(resolver.resolve("ZZ").is_empty());
        assert!(resolver.resolve("").is_empty());
        assert_eq!(resolver.hidden("ZZ").len(), FieldKind::ALL.len());
    }

    #[test]
    fn test_codes_are_case_insensitive() {
        let resolver = RequirementResolver::default();
        assert_eq!(resolver.resolve("de"), resolver.resolve("DE"));
        assert_eq!(resolver.find_by_name("united kingdom").unwrap().code, "GB");
    }

    #[test]
    fn test_select_country_clears_inapplicable_fields() {
        let resolver = RequirementResolver::default();
        let mut form = InternationalTransferForm::default();

        resolver.select_country(&mut form, "GB");
        form.set_identifier(FieldKind::SortCode, "20-00-00");
        form.set_identifier(FieldKind::SwiftBic, "BARCGB22");

        let visible = resolver.select_country(&mut form, "de");
        assert_eq!(visible, vec![FieldKind::Iban, FieldKind::SwiftBic]);
        assert_eq!(form.recipient_country, "DE");
        assert_eq!(form.identifier(FieldKind::SortCode), None);
        // SWIFT is still required, so its value survives the switch
        assert_eq!(form.identifier(FieldKind::SwiftBic), Some("BARCGB22"));
    }

    #[test]
    fn test_select_unknown_country_clears_everything() {
        let resolver = RequirementResolver::default();
        let mut form = InternationalTransferForm::default();
        form.set_identifier(FieldKind::Iban, "DE89370400440532013000");

        let visible = resolver.select_country(&mut form, "zz");
        assert!(visible.is_empty());
        assert!(form.identifiers.is_empty());
        assert_eq!(form.recipient_country, "ZZ");
    }
}
