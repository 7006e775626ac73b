//! Profile Schema Types
//!
//! TOML-facing table definitions and the compiled runtime profile built from them.

use regex::{NoExpand, Regex};
use serde::Deserialize;
use std::borrow::Cow;
use thiserror::Error;

use crate::validation::{Diagnostic, Severity};

/// Errors raised while compiling a profile table
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("failed to parse profile table: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("profile '{profile}': invalid pattern in '{rule}': {source}")]
    Pattern {
        profile: String,
        rule: String,
        #[source]
        source: regex::Error,
    },

    #[error("profile '{profile}': rule '{rule}' must balance single characters")]
    BalanceDelimiter { profile: String, rule: String },

    #[error("profile '{profile}': rewrite replacement '{replacement}' matches its own pattern")]
    NonIdempotentRewrite {
        profile: String,
        replacement: String,
    },

    #[error("default profile '{0}' is missing")]
    MissingDefault(String),
}

/// Root profile file structure (matches TOML)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ProfileFile {
    pub profile: ProfileMeta,
    #[serde(default)]
    pub line_rules: Vec<LineRuleDef>,
    #[serde(default)]
    pub source_rules: Vec<SourceRuleDef>,
    #[serde(default)]
    pub rewrites: Vec<RewriteDef>,
}

/// Profile metadata
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ProfileMeta {
    pub id: String,
    pub description: Option<String>,
}

/// Rule evaluated against every trimmed source line
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LineRuleDef {
    pub name: String,
    pub severity: Severity,
    pub message: String,
    pub matches: String,
    pub unless: Option<String>,
    pub unless_source: Option<String>,
}

/// Rule evaluated once against the whole source
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SourceRuleDef {
    pub name: String,
    pub severity: Severity,
    pub message: String,
    pub open: String,
    pub close: String,
}

/// Blind textual substitution
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RewriteDef {
    pub pattern: String,
    pub replacement: String,
}

/// Runtime language profile, immutable once compiled
#[derive(Debug, Clone)]
pub struct LanguageProfile {
    pub id: String,
    pub description: Option<String>,
    pub rules: Vec<Rule>,
    pub corrector_rules: Vec<RewriteRule>,
}

/// A diagnostic rule, scoped either to one line or to the whole source
#[derive(Debug, Clone)]
pub enum Rule {
    Line(LineRule),
    Source(SourceRule),
}

impl Rule {
    pub fn name(&self) -> &str {
        match self {
            Rule::Line(rule) => &rule.name,
            Rule::Source(rule) => &rule.name,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LineRule {
    pub name: String,
    pub severity: Severity,
    pub message: String,
    matches: Regex,
    unless: Option<Regex>,
    unless_source: Option<Regex>,
}

impl LineRule {
    /// Evaluate against one trimmed line; `source` is the full snippet for context checks.
    pub fn check(&self, line: &str, line_number: usize, source: &str) -> Option<Diagnostic> {
        if !self.matches.is_match(line) {
            return None;
        }
        if self.unless.as_ref().is_some_and(|re| re.is_match(line)) {
            return None;
        }
        if self.unless_source.as_ref().is_some_and(|re| re.is_match(source)) {
            return None;
        }
        Some(Diagnostic::new(line_number, &self.message, self.severity))
    }
}

/// Delimiter balance over the whole source
#[derive(Debug, Clone)]
pub struct SourceRule {
    pub name: String,
    pub severity: Severity,
    pub message: String,
    open: char,
    close: char,
}

impl SourceRule {
    /// Findings from whole-source rules are anchored at line 1.
    pub fn check(&self, source: &str) -> Option<Diagnostic> {
        let open = source.chars().filter(|&c| c == self.open).count();
        let close = source.chars().filter(|&c| c == self.close).count();
        if open == close {
            return None;
        }

        let message = self
            .message
            .replace("{open}", &open.to_string())
            .replace("{close}", &close.to_string());
        Some(Diagnostic::new(1, message, self.severity))
    }
}

/// Compiled rewrite: every match of `pattern` becomes the literal `replacement`
#[derive(Debug, Clone)]
pub struct RewriteRule {
    pattern: Regex,
    replacement: String,
}

impl RewriteRule {
    pub fn apply<'a>(&self, text: &'a str) -> Cow<'a, str> {
        self.pattern
            .replace_all(text, NoExpand(self.replacement.as_str()))
    }
}

impl TryFrom<ProfileFile> for LanguageProfile {
    type Error = ProfileError;

    fn try_from(file: ProfileFile) -> Result<Self, Self::Error> {
        let id = file.profile.id;
        let compile = |rule: &str, pattern: &str| {
            Regex::new(pattern).map_err(|source| ProfileError::Pattern {
                profile: id.clone(),
                rule: rule.to_string(),
                source,
            })
        };

        let mut rules = Vec::with_capacity(file.line_rules.len() + file.source_rules.len());
        for def in file.line_rules {
            let matches = compile(&def.name, &def.matches)?;
            let unless = def
                .unless
                .as_deref()
                .map(|p| compile(&def.name, p))
                .transpose()?;
            let unless_source = def
                .unless_source
                .as_deref()
                .map(|p| compile(&def.name, p))
                .transpose()?;

            rules.push(Rule::Line(LineRule {
                name: def.name,
                severity: def.severity,
                message: def.message,
                matches,
                unless,
                unless_source,
            }));
        }

        for def in file.source_rules {
            let (Some(open), Some(close)) = (single_char(&def.open), single_char(&def.close))
            else {
                return Err(ProfileError::BalanceDelimiter {
                    profile: id.clone(),
                    rule: def.name,
                });
            };

            rules.push(Rule::Source(SourceRule {
                name: def.name,
                severity: def.severity,
                message: def.message,
                open,
                close,
            }));
        }

        let mut corrector_rules = Vec::with_capacity(file.rewrites.len());
        for def in file.rewrites {
            let pattern = compile("rewrite", &def.pattern)?;
            if pattern.is_match(&def.replacement) {
                return Err(ProfileError::NonIdempotentRewrite {
                    profile: id.clone(),
                    replacement: def.replacement,
                });
            }
            corrector_rules.push(RewriteRule {
                pattern,
                replacement: def.replacement,
            });
        }

        Ok(Self {
            id,
            description: file.profile.description,
            rules,
            corrector_rules,
        })
    }
}

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}
