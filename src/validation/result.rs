//! Validation Results
//!
//! Diagnostics and the aggregated result contract returned to callers.

use serde::{Deserialize, Serialize};

/// Severity of a diagnostic message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// A diagnostic message for a validation issue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub line: usize,
    pub message: String,
    pub severity: Severity,
}

impl Diagnostic {
    pub fn new(line: usize, message: impl Into<String>, severity: Severity) -> Self {
        Self {
            line,
            message: message.into(),
            severity,
        }
    }
}

/// Result of validating a snippet.
///
/// Serialized with camelCase field names (`hasErrors`, `errorCount`, ...), which is the wire
/// shape shared by the HTTP transport and the enrichment backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub has_errors: bool,
    pub error_count: usize,
    pub warning_count: usize,
    pub errors: Vec<Diagnostic>,
    pub corrected_code: String,
    pub explanation: String,
}

impl ValidationResult {
    /// Aggregate diagnostics and corrected code into a result.
    ///
    /// `errors` keeps detection order; it is never re-sorted by line.
    pub fn build(errors: Vec<Diagnostic>, corrected_code: String) -> Self {
        let error_count = count(&errors, Severity::Error);
        let warning_count = count(&errors, Severity::Warning);

        Self {
            has_errors: error_count > 0,
            error_count,
            warning_count,
            explanation: explain(error_count, warning_count),
            errors,
            corrected_code,
        }
    }

    /// Fixed result reported when the snippet could not be analyzed at all.
    pub fn degraded() -> Self {
        Self {
            has_errors: true,
            error_count: 1,
            warning_count: 0,
            errors: vec![Diagnostic::new(1, "Error analyzing code", Severity::Error)],
            corrected_code: String::new(),
            explanation: "Failed to analyze code.".to_string(),
        }
    }

    /// Check that the counters and flag agree with `errors` and every line is 1-based.
    pub fn is_consistent(&self) -> bool {
        self.error_count == count(&self.errors, Severity::Error)
            && self.warning_count == count(&self.errors, Severity::Warning)
            && self.has_errors == (self.error_count > 0)
            && self.errors.iter().all(|d| d.line >= 1)
    }
}

fn count(errors: &[Diagnostic], severity: Severity) -> usize {
    errors.iter().filter(|d| d.severity == severity).count()
}

/// Explanation text for a pair of counts
pub fn explain(error_count: usize, warning_count: usize) -> String {
    if error_count > 0 {
        format!(
            "Found {} error(s) and {} warning(s) in your code.",
            error_count, warning_count
        )
    } else if warning_count > 0 {
        format!("No critical errors, but found {} warning(s).", warning_count)
    } else {
        "Your code looks good! No errors detected.".to_string()
    }
}
