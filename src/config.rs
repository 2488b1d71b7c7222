use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::apis::SourceProfile;
use crate::constants::{CONFIG_PATH_ENV, DEFAULT_CONFIG_PATH, DEFAULT_REQUEST_TIMEOUT_SECS};
use crate::error::{Result, ScraperError};
use crate::registry::ProfileRegistry;
use crate::types::SourceDescriptor;

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub fetch: FetchConfig,
    /// Replaces the built-in coordinate table when set.
    #[serde(default)]
    pub coordinates_path: Option<PathBuf>,
    /// Chinese name → display name, consulted before transliteration.
    #[serde(default)]
    pub name_overrides: HashMap<String, String>,
    #[serde(default)]
    pub profiles: Vec<SourceProfile>,
    #[serde(default)]
    pub sources: Vec<SourceDescriptor>,
}

#[derive(Debug, Deserialize)]
pub struct FetchConfig {
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    #[serde(default)]
    pub user_agent: Option<String>,
}

fn default_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: DEFAULT_REQUEST_TIMEOUT_SECS,
            user_agent: None,
        }
    }
}

impl Config {
    /// Load from `$AQ_SCRAPER_CONFIG`, falling back to `config.toml`.
    pub fn load() -> Result<Self> {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::from_path(path)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            ScraperError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let config = Self::from_toml(&content)?;
        info!(
            path = %path.display(),
            sources = config.sources.len(),
            profiles = config.profiles.len(),
            "Loaded configuration"
        );
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.fetch.timeout_seconds == 0 {
            return Err(ScraperError::Config(
                "fetch.timeout_seconds must be greater than zero".to_string(),
            ));
        }
        let mut seen = std::collections::HashSet::new();
        for source in &self.sources {
            if !seen.insert(source.name.as_str()) {
                return Err(ScraperError::Config(format!(
                    "duplicate source name '{}'",
                    source.name
                )));
            }
        }
        Ok(())
    }

    /// Built-in profiles plus any configured ones; configured entries win.
    pub fn registry(&self) -> ProfileRegistry {
        let mut registry = ProfileRegistry::new();
        for profile in &self.profiles {
            registry.register(profile.clone());
        }
        registry
    }

    /// Sources filtered to `names`, in the order given. Unknown names are an error.
    pub fn select_sources(&self, names: &[String]) -> Result<Vec<SourceDescriptor>> {
        names
            .iter()
            .map(|name| {
                self.sources
                    .iter()
                    .find(|s| &s.name == name)
                    .cloned()
                    .ok_or_else(|| ScraperError::Config(format!("no source named '{name}'")))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"
        [fetch]
        timeout_seconds = 5
        user_agent = "aq_scraper-test"

        [name_overrides]
        "西安" = "Xi'an"

        [[sources]]
        name = "Beijing"
        adapter = "pm25in"
        url = "http://www.pm25.in/beijing"
        sourceURL = "http://www.pm25.in"
        country = "CN"

        [[sources]]
        name = "Hefei"
        adapter = "airlevel"
        url = "http://www.airlevel.cn/hefei"
        sourceURL = "http://www.airlevel.cn"
        country = "CN"
        city = "Hefei"
        active = false
    "#;

    #[test]
    fn test_parses_sources_and_fetch_settings() {
        let config = Config::from_toml(SAMPLE).unwrap();

        assert_eq!(config.fetch.timeout_seconds, 5);
        assert_eq!(config.fetch.user_agent.as_deref(), Some("aq_scraper-test"));
        assert_eq!(config.sources.len(), 2);
        assert!(config.sources[0].active);
        assert!(!config.sources[1].active);
        assert_eq!(config.sources[1].city.as_deref(), Some("Hefei"));
        assert_eq!(config.name_overrides["西安"], "Xi'an");
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.fetch.timeout_seconds, DEFAULT_REQUEST_TIMEOUT_SECS);
        assert!(config.sources.is_empty());
        assert!(config.coordinates_path.is_none());
    }

    #[test]
    fn test_rejects_duplicate_source_names() {
        let doubled = format!(
            "{SAMPLE}\n[[sources]]\nname = \"Beijing\"\nadapter = \"pm25s\"\nurl = \"u\"\nsourceURL = \"s\"\ncountry = \"CN\"\n"
        );
        assert!(matches!(
            Config::from_toml(&doubled),
            Err(ScraperError::Config(_))
        ));
    }

    #[test]
    fn test_select_sources_keeps_requested_order() {
        let config = Config::from_toml(SAMPLE).unwrap();
        let picked = config
            .select_sources(&["Hefei".to_string(), "Beijing".to_string()])
            .unwrap();
        assert_eq!(picked[0].name, "Hefei");
        assert_eq!(picked[1].name, "Beijing");
        assert!(config.select_sources(&["Nowhere".to_string()]).is_err());
    }

    #[test]
    fn test_configured_profile_is_registered() {
        let content = r#"
            [[profiles]]
            name = "hefei_json"
            attribution = { name = "Hefei EPB", url = "http://hfepb.example" }
            station_key = "code"
            location_includes_city = false

            [profiles.layout]
            kind = "json"
            records_pointer = ""
            station_field = "name"
            code_field = "code"
            time_field = "time"
            fields = [{ parameter = "pm25", field = "pm25" }]

            [profiles.date]
            kind = "timestamp"
        "#;
        let config = Config::from_toml(content).unwrap();
        let registry = config.registry();
        assert!(registry.get("hefei_json").is_some());
        assert!(registry.get("pm25in").is_some());
    }

    #[test]
    fn test_from_path_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let config = Config::from_path(file.path()).unwrap();
        assert_eq!(config.sources[0].name, "Beijing");
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = Config::from_path("/nonexistent/aq_scraper.toml").unwrap_err();
        assert!(matches!(err, ScraperError::Config(_)));
    }
}
