use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

use crate::apis::{builtin_profiles, SourceProfile};

/// Registry of source profiles, keyed by adapter name
pub struct ProfileRegistry {
    profiles: HashMap<String, Arc<SourceProfile>>,
}

impl ProfileRegistry {
    /// Create an empty registry
    pub fn empty() -> Self {
        Self {
            profiles: HashMap::new(),
        }
    }

    /// Create a registry with the built-in profiles
    pub fn new() -> Self {
        let mut registry = Self::empty();
        for profile in builtin_profiles() {
            registry.register(profile);
        }
        registry
    }

    /// Register a profile, replacing any existing one of the same name
    pub fn register(&mut self, profile: SourceProfile) {
        if self.profiles.contains_key(&profile.name) {
            info!(adapter = %profile.name, "Replacing registered profile");
        }
        self.profiles.insert(profile.name.clone(), Arc::new(profile));
    }

    pub fn get(&self, adapter: &str) -> Option<Arc<SourceProfile>> {
        self.profiles.get(adapter).cloned()
    }

    /// List all registered adapter names, sorted
    pub fn list_adapters(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.profiles.keys().map(|k| k.as_str()).collect();
        names.sort_unstable();
        names
    }
}

impl Default for ProfileRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::get_supported_adapters;
    use crate::types::Attribution;

    #[test]
    fn test_registry_has_built_in_profiles() {
        let registry = ProfileRegistry::new();

        let adapters = registry.list_adapters();
        for name in get_supported_adapters() {
            assert!(adapters.contains(&name), "missing {name}");
        }
    }

    #[test]
    fn test_registry_returns_none_for_unknown_adapter() {
        let registry = ProfileRegistry::new();
        assert!(registry.get("unknown_source").is_none());
    }

    #[test]
    fn test_register_replaces_profile() {
        let mut registry = ProfileRegistry::new();
        let mut profile = crate::apis::pm25in::profile();
        profile.attribution = Attribution::new("Mirror", "http://mirror.example");
        registry.register(profile);

        let profile = registry.get("pm25in").unwrap();
        assert_eq!(profile.attribution.name, "Mirror");
        assert_eq!(registry.list_adapters().len(), get_supported_adapters().len());
    }
}
