//! Corrector
//!
//! Blind textual rewrites. Independent of what the rule engine reports: it fixes recognizable
//! typos only and never repairs structure, so corrected code may still carry diagnostics.

use crate::profile::LanguageProfile;

/// Apply the profile's rewrites in order, each one to the output of the previous
pub fn apply(source: &str, profile: &LanguageProfile) -> String {
    profile
        .corrector_rules
        .iter()
        .fold(source.to_string(), |text, rule| rule.apply(&text).into_owned())
}
