//! Validation Engine
//!
//! Rule evaluation, blind correction and result aggregation, kept apart from transport concerns.

pub mod corrector;
pub mod engine;
pub mod result;

pub use result::{Diagnostic, Severity, ValidationResult};

use crate::profile::LanguageProfile;

/// Heuristic analysis of a snippet: rules, rewrites, aggregation.
///
/// Pure and deterministic for a given input and profile.
pub fn analyze(code: &str, profile: &LanguageProfile) -> ValidationResult {
    let errors = engine::run(code, profile);
    let corrected_code = corrector::apply(code, profile);
    ValidationResult::build(errors, corrected_code)
}
