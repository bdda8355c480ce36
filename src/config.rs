use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::models::ScoringWeights;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub backend: BackendSettings,
    #[serde(default)]
    pub tables: TableSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    pub deck: DeckSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Managed backend (PostgREST-style REST endpoint)
#[derive(Debug, Clone, Deserialize)]
pub struct BackendSettings {
    pub url: String,
    pub service_key: String,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TableSettings {
    #[serde(default = "default_profiles_table")]
    pub profiles: String,
    #[serde(default = "default_swipes_table")]
    pub swipes: String,
    #[serde(default = "default_blocks_table")]
    pub blocked_users: String,
    #[serde(default = "default_reports_table")]
    pub reports: String,
    #[serde(default = "default_messages_table")]
    pub messages: String,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            profiles: default_profiles_table(),
            swipes: default_swipes_table(),
            blocked_users: default_blocks_table(),
            reports: default_reports_table(),
            messages: default_messages_table(),
        }
    }
}

fn default_profiles_table() -> String { "profiles".to_string() }
fn default_swipes_table() -> String { "matches".to_string() }
fn default_blocks_table() -> String { "blocked_users".to_string() }
fn default_reports_table() -> String { "reports".to_string() }
fn default_messages_table() -> String { "messages".to_string() }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CacheSettings {
    /// Shared L2 cache; the service runs on the in-process L1 alone without it
    pub redis_url: Option<String>,
    pub ttl_secs: Option<u64>,
    pub l1_cache_size: Option<u64>,
}

/// Swipe deck settings
///
/// `min_score` has no code default: it must come from a config file or the
/// environment.
#[derive(Debug, Clone, Deserialize)]
pub struct DeckSettings {
    pub min_score: u8,
    #[serde(default = "default_pool_limit")]
    pub pool_limit: usize,
    #[serde(default = "default_deck_limit")]
    pub default_limit: usize,
}

fn default_pool_limit() -> usize { 50 }
fn default_deck_limit() -> usize { 20 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_interests_weight")]
    pub interests: f64,
    #[serde(default = "default_major_weight")]
    pub major: f64,
    #[serde(default = "default_graduation_year_weight")]
    pub graduation_year: f64,
    #[serde(default = "default_bio_weight")]
    pub bio: f64,
    #[serde(default = "default_university_weight")]
    pub university: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            interests: default_interests_weight(),
            major: default_major_weight(),
            graduation_year: default_graduation_year_weight(),
            bio: default_bio_weight(),
            university: default_university_weight(),
        }
    }
}

impl From<&WeightsConfig> for ScoringWeights {
    fn from(config: &WeightsConfig) -> Self {
        Self {
            interests: config.interests,
            major: config.major,
            graduation_year: config.graduation_year,
            bio: config.bio,
            university: config.university,
        }
    }
}

fn default_interests_weight() -> f64 { 40.0 }
fn default_major_weight() -> f64 { 20.0 }
fn default_graduation_year_weight() -> f64 { 15.0 }
fn default_bio_weight() -> f64 { 15.0 }
fn default_university_weight() -> f64 { 10.0 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with CAMPUS__)
    /// 5. SUPABASE_URL / SUPABASE_SERVICE_KEY
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., CAMPUS__SERVER__PORT -> server.port
            .add_source(env_source())
            .build()?;

        apply_backend_env(settings)?.try_deserialize()
    }
}

fn env_source() -> Environment {
    Environment::with_prefix("CAMPUS")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

/// Apply the backend's conventional environment variables on top of the
/// layered config
fn apply_backend_env(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let mut builder = Config::builder().add_source(settings);

    if let Ok(url) = env::var("SUPABASE_URL") {
        builder = builder.set_override("backend.url", url)?;
    }
    if let Ok(key) = env::var("SUPABASE_SERVICE_KEY") {
        builder = builder.set_override("backend.service_key", key)?;
    }

    builder.build()
}
