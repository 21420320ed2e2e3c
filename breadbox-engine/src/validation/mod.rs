//! Validation rule sets and the built-in validator.

mod rules;
mod validator;

pub use rules::{Rule, RuleSet, build_rules};
pub use validator::{RuleValidator, ValidationErrors, Validator};
