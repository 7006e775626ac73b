//! Rule Engine
//!
//! Evaluates a profile's rules over a snippet. Line-scoped findings come first in line order,
//! whole-source findings trail them.

use crate::profile::{LanguageProfile, Rule};
use crate::validation::Diagnostic;

/// Run every rule of `profile` against `source`
pub fn run(source: &str, profile: &LanguageProfile) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    for (line_num, line) in source.lines().enumerate() {
        diagnostics.extend(validate_line(line_num + 1, line, source, profile));
    }

    diagnostics.extend(validate_source(source, profile));
    diagnostics
}

/// Evaluate the line-scoped rules against one raw line, in profile order
pub fn validate_line(
    line_num: usize,
    line: &str,
    source: &str,
    profile: &LanguageProfile,
) -> Vec<Diagnostic> {
    let trimmed = line.trim();

    profile
        .rules
        .iter()
        .filter_map(|rule| match rule {
            Rule::Line(rule) => rule.check(trimmed, line_num, source),
            Rule::Source(_) => None,
        })
        .collect()
}

/// Evaluate the whole-source rules, in profile order
pub fn validate_source(source: &str, profile: &LanguageProfile) -> Vec<Diagnostic> {
    profile
        .rules
        .iter()
        .filter_map(|rule| match rule {
            Rule::Source(rule) => rule.check(source),
            Rule::Line(_) => None,
        })
        .collect()
}
