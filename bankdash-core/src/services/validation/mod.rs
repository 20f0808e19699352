//! Declarative form validation
//!
//! A `Schema` is a list of per-field rule chains plus cross-field
//! refinements. Validation is synchronous and purely local: nothing here
//! replaces server-side checks, which the dashboard does not have.
//!
//! Rules per field run in order and stop at the first failure, so each
//! field reports at most one message. A field without a `Required` rule
//! that is left empty skips its remaining rules. Refinements always run and
//! report under their own path.

pub mod schemas;

use std::str::FromStr;

use regex::Regex;
use rust_decimal::Decimal;

use crate::domain::{FormData, ValidationErrors};

/// One field-level constraint
#[derive(Debug, Clone)]
pub enum Rule {
    Required,
    MinLength(usize),
    MaxLength(usize),
    /// Inclusive numeric bounds; non-numeric input fails
    Range {
        min: Option<Decimal>,
        max: Option<Decimal>,
    },
    /// Strictly greater than zero; non-numeric input fails
    Positive,
    Pattern(Regex),
    OneOf(Vec<String>),
    Equals(String),
}

impl Rule {
    fn passes(&self, value: &str) -> bool {
        match self {
            Rule::Required => !value.is_empty(),
            Rule::MinLength(min) => value.chars().count() >= *min,
            Rule::MaxLength(max) => value.chars().count() <= *max,
            Rule::Range { min, max } => match Decimal::from_str(value) {
                Ok(n) => min.map_or(true, |m| n >= m) && max.map_or(true, |m| n <= m),
                Err(_) => false,
            },
            Rule::Positive => Decimal::from_str(value)
                .map(|n| n > Decimal::ZERO)
                .unwrap_or(false),
            Rule::Pattern(re) => re.is_match(value),
            Rule::OneOf(allowed) => allowed.iter().any(|a| a == value),
            Rule::Equals(expected) => value == expected,
        }
    }
}

#[derive(Debug, Clone)]
struct Check {
    rule: Rule,
    message: String,
}

/// Rule chain for one field
#[derive(Debug, Clone)]
pub struct FieldSpec {
    name: String,
    checks: Vec<Check>,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            checks: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rule(mut self, rule: Rule, message: impl Into<String>) -> Self {
        self.checks.push(Check {
            rule,
            message: message.into(),
        });
        self
    }

    pub fn required(self, message: impl Into<String>) -> Self {
        self.rule(Rule::Required, message)
    }

    pub fn min_length(self, min: usize, message: impl Into<String>) -> Self {
        self.rule(Rule::MinLength(min), message)
    }

    pub fn max_length(self, max: usize, message: impl Into<String>) -> Self {
        self.rule(Rule::MaxLength(max), message)
    }

    pub fn range(self, min: Option<Decimal>, max: Option<Decimal>, message: impl Into<String>) -> Self {
        self.rule(Rule::Range { min, max }, message)
    }

    pub fn positive(self, message: impl Into<String>) -> Self {
        self.rule(Rule::Positive, message)
    }

    pub fn pattern(self, re: &Regex, message: impl Into<String>) -> Self {
        self.rule(Rule::Pattern(re.clone()), message)
    }

    pub fn one_of<S: AsRef<str>>(self, allowed: &[S], message: impl Into<String>) -> Self {
        let allowed = allowed.iter().map(|s| s.as_ref().to_string()).collect();
        self.rule(Rule::OneOf(allowed), message)
    }

    pub fn equals(self, expected: impl Into<String>, message: impl Into<String>) -> Self {
        self.rule(Rule::Equals(expected.into()), message)
    }

    pub fn is_required(&self) -> bool {
        self.checks.iter().any(|c| matches!(c.rule, Rule::Required))
    }

    /// First failing message for this field, if any
    pub fn check(&self, data: &FormData) -> Option<&str> {
        let value = match data.value(&self.name) {
            Some(v) => v,
            None => {
                return self
                    .checks
                    .iter()
                    .find(|c| matches!(c.rule, Rule::Required))
                    .map(|c| c.message.as_str());
            }
        };

        self.checks
            .iter()
            .filter(|c| !matches!(c.rule, Rule::Required))
            .find(|c| !c.rule.passes(value))
            .map(|c| c.message.as_str())
    }
}

type Predicate = Box<dyn Fn(&FormData) -> bool + Send + Sync>;

/// Cross-field constraint reported under `path`
pub struct Refinement {
    path: String,
    message: String,
    predicate: Predicate,
}

impl Refinement {
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Whether `data` satisfies this refinement
    pub fn holds(&self, data: &FormData) -> bool {
        (self.predicate)(data)
    }
}

/// Validation schema for one form
pub struct Schema {
    name: String,
    fields: Vec<FieldSpec>,
    refinements: Vec<Refinement>,
}

impl Schema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            refinements: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    /// Add a refinement; `predicate` returns true when the data is valid
    pub fn refine<F>(mut self, path: impl Into<String>, message: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&FormData) -> bool + Send + Sync + 'static,
    {
        self.refinements.push(Refinement {
            path: path.into(),
            message: message.into(),
            predicate: Box::new(predicate),
        });
        self
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name()).collect()
    }

    pub fn field_spec(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Validate every field and every refinement
    pub fn validate(&self, data: &FormData) -> Result<(), ValidationErrors> {
        self.run(data, |_| true)
    }

    /// Validate only `subset`: its field rules and the refinements reporting
    /// under one of its paths
    pub fn validate_fields(&self, data: &FormData, subset: &[&str]) -> Result<(), ValidationErrors> {
        self.run(data, |path| subset.contains(&path))
    }

    fn run(&self, data: &FormData, include: impl Fn(&str) -> bool) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();

        for spec in self.fields.iter().filter(|f| include(&f.name)) {
            if let Some(message) = spec.check(data) {
                errors.push(&spec.name, message);
            }
        }

        for refinement in self.refinements.iter().filter(|r| include(&r.path)) {
            if !refinement.holds(data) {
                errors.push(&refinement.path, &refinement.message);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
