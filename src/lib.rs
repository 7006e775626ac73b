//! Snippet Checker
//!
//! Rule-based quality feedback for short source snippets.
//!
//! This library provides:
//! - Per-language rule tables and a registry to serve them
//! - Line and whole-source diagnostics plus blind typo correction
//! - Optional generative enrichment with all-or-nothing override
//! - HTTP and LSP transports around a single validate entry point

pub mod config;
pub mod enrichment;
pub mod http;
pub mod lsp;
pub mod profile;
pub mod validation;
pub mod validator;

// Re-exports for clean public API
pub use config::Config;
pub use profile::{LanguageProfile, ProfileRegistry};
pub use validation::{Diagnostic, Severity, ValidationResult, analyze};
pub use validator::Validator;
