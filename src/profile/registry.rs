//! Profile Registry
//!
//! In-memory registry of compiled language profiles. Built once, read-only afterwards.

use super::schema::{LanguageProfile, ProfileError, ProfileFile};
use std::collections::HashMap;

/// Profile used for any language id the registry does not know
pub const DEFAULT_PROFILE: &str = "javascript";

const BUILTIN_PROFILES: [&str; 4] = [
    include_str!("../../resources/profiles/javascript.profile.toml"),
    include_str!("../../resources/profiles/python.profile.toml"),
    include_str!("../../resources/profiles/java.profile.toml"),
    include_str!("../../resources/profiles/cpp.profile.toml"),
];

/// Read-only language profile registry
#[derive(Debug, Clone)]
pub struct ProfileRegistry {
    profiles: HashMap<String, LanguageProfile>,
    fallback: LanguageProfile,
}

impl ProfileRegistry {
    /// Registry with the profiles embedded in the binary
    pub fn builtin() -> Result<Self, ProfileError> {
        Self::from_sources(BUILTIN_PROFILES)
    }

    /// Compile a registry from TOML profile tables.
    ///
    /// A later table with the same id replaces an earlier one. The default profile must be present.
    pub fn from_sources<I, S>(sources: I) -> Result<Self, ProfileError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut profiles = HashMap::new();
        for source in sources {
            let file: ProfileFile = toml::from_str(source.as_ref())?;
            let profile = LanguageProfile::try_from(file)?;
            log::debug!(
                "Loaded profile '{}' ({} rules, {} rewrites)",
                profile.id,
                profile.rules.len(),
                profile.corrector_rules.len()
            );
            profiles.insert(profile.id.clone(), profile);
        }

        let fallback = profiles
            .get(DEFAULT_PROFILE)
            .cloned()
            .ok_or_else(|| ProfileError::MissingDefault(DEFAULT_PROFILE.to_string()))?;

        Ok(Self { profiles, fallback })
    }

    /// Exact lookup; unknown ids resolve to the javascript profile.
    pub fn get_profile(&self, language_id: &str) -> &LanguageProfile {
        self.profiles.get(language_id).unwrap_or(&self.fallback)
    }

    pub fn contains(&self, language_id: &str) -> bool {
        self.profiles.contains_key(language_id)
    }

    /// Known profile ids, sorted
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.profiles.keys().map(|s| s.as_str()).collect();
        ids.sort_unstable();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL_JS: &str = r#"
        [profile]
        id = "javascript"
    "#;

    #[test]
    fn test_builtin_registry() {
        let registry = ProfileRegistry::builtin().unwrap();
        assert_eq!(registry.ids(), vec!["cpp", "java", "javascript", "python"]);
    }

    #[test]
    fn test_exact_lookup() {
        let registry = ProfileRegistry::builtin().unwrap();
        assert_eq!(registry.get_profile("python").id, "python");
        assert_eq!(registry.get_profile("cpp").id, "cpp");
        assert_eq!(registry.get_profile("java").id, "java");
    }

    #[test]
    fn test_unknown_language_falls_back_to_javascript() {
        let registry = ProfileRegistry::builtin().unwrap();
        assert_eq!(registry.get_profile("ruby").id, "javascript");
        assert_eq!(registry.get_profile("").id, "javascript");
        // Lookup is case-sensitive
        assert_eq!(registry.get_profile("Python").id, "javascript");
        assert!(!registry.contains("Python"));
    }

    #[test]
    fn test_missing_default_rejected() {
        let err = ProfileRegistry::from_sources(["[profile]\nid = \"python\""]).unwrap_err();
        assert!(matches!(err, ProfileError::MissingDefault(_)));
    }

    #[test]
    fn test_later_source_replaces_earlier() {
        let replacement = r#"
            [profile]
            id = "javascript"
            description = "replaced"
        "#;
        let registry = ProfileRegistry::from_sources([MINIMAL_JS, replacement]).unwrap();
        assert_eq!(
            registry.get_profile("javascript").description.as_deref(),
            Some("replaced")
        );
    }
}
