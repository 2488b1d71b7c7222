/// Adapter name constants to ensure consistency across the codebase.
/// These are the names `[[sources]]` entries use in their `adapter` field.
pub const AIRLEVEL_ADAPTER: &str = "airlevel";
pub const PM25IN_ADAPTER: &str = "pm25in";
pub const PM25S_ADAPTER: &str = "pm25s";
pub const PM25IN_API_ADAPTER: &str = "pm25in_api";

/// Canonical unit for every parameter after conversion.
pub const MICROGRAMS_PER_CUBIC_METER: &str = "µg/m³";

/// Chinese portals report carbon monoxide in mg/m³.
pub const CO_MG_TO_UG: f64 = 1000.0;

/// Every portal handled here publishes hourly averages.
pub const AVERAGING_PERIOD_HOURS: u32 = 1;

/// Upper bound on a single source fetch.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 20;

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";
pub const CONFIG_PATH_ENV: &str = "AQ_SCRAPER_CONFIG";

pub const SOURCE_TYPE_GOVERNMENT: &str = "government";

/// Get all built-in adapter names
pub fn get_supported_adapters() -> Vec<&'static str> {
    vec![
        AIRLEVEL_ADAPTER,
        PM25IN_ADAPTER,
        PM25S_ADAPTER,
        PM25IN_API_ADAPTER,
    ]
}
