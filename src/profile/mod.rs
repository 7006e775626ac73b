//! Language Profiles
//!
//! Declarative per-language rule tables and the registry that serves them.

pub mod registry;
pub mod schema;

pub use registry::{DEFAULT_PROFILE, ProfileRegistry};
pub use schema::{LanguageProfile, LineRule, ProfileError, RewriteRule, Rule, SourceRule};
