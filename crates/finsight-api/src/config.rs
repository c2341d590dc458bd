use config::{Config as ConfigLoader, ConfigError, Environment, File, FileFormat};
use finsight_auth::AuthSettings;
use finsight_llm::ModelSettings;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub llm: LlmConfig,
    #[serde(default)]
    pub memory: MemoryConfig,
    pub auth: AuthConfig,
    pub mongodb: MongoDbConfig,
    pub logging: LoggingConfig,

    // Secrets (from ENV only, both optional)
    #[serde(default)]
    pub mongodb_uri: Option<String>,
    #[serde(default)]
    pub openai_api_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Base URL placed in report links
    pub public_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    pub enabled: bool,
    pub origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl From<LlmConfig> for ModelSettings {
    fn from(config: LlmConfig) -> Self {
        ModelSettings::new(config.model)
            .temperature(config.temperature)
            .max_tokens(config.max_tokens)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MemoryConfig {
    /// Index committed exchanges for `/api/search-conversations`
    pub search_enabled: bool,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            search_enabled: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    pub passcode_length: usize,
    pub passcode_ttl_minutes: i64,
    pub session_ttl_hours: i64,
}

impl From<AuthConfig> for AuthSettings {
    fn from(config: AuthConfig) -> Self {
        Self {
            passcode_length: config.passcode_length,
            passcode_ttl: chrono::Duration::minutes(config.passcode_ttl_minutes),
            session_ttl: chrono::Duration::hours(config.session_ttl_hours),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MongoDbConfig {
    pub database: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

const BUNDLED_DEFAULTS: &str = include_str!("../config/default.toml");

/// Variables named `<SECTION>__<KEY>`, e.g. `SERVER__PORT=9000`
fn section_env(section: &str) -> Environment {
    Environment::with_prefix(section)
        .prefix_separator("__")
        .keep_prefix(true)
        .separator("__")
        .try_parsing(true)
}

impl Config {
    /// Load configuration from TOML files and environment variables
    ///
    /// Hierarchy (weakest to strongest):
    /// 1. Bundled defaults (this crate's config/default.toml)
    /// 2. config/default.toml relative to the working directory
    /// 3. config/{ENV}.toml (ENV defaults to `dev`)
    /// 4. Environment variables (SERVER__, CORS__, LLM__, MEMORY__, AUTH__,
    ///    MONGODB__, LOGGING__ prefixes)
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("ENV").unwrap_or_else(|_| "dev".to_string());

        let builder = ConfigLoader::builder()
            // 1. Bundled defaults
            .add_source(File::from_str(BUNDLED_DEFAULTS, FileFormat::Toml))
            // 2. Load default config
            .add_source(File::with_name("config/default").required(false))
            // 3. Load environment-specific config
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            // 4. Environment variables override everything
            .add_source(section_env("SERVER"))
            .add_source(
                section_env("CORS")
                    .list_separator(",")
                    .with_list_parse_key("cors.origins"),
            )
            .add_source(section_env("LLM"))
            .add_source(section_env("MEMORY"))
            .add_source(section_env("AUTH"))
            .add_source(section_env("MONGODB"))
            .add_source(section_env("LOGGING"));

        let config = builder.build()?;

        let mut cfg: Config = config.try_deserialize()?;

        // Secrets from ENV (not in TOML); absent values degrade instead of failing
        cfg.mongodb_uri = non_empty_env("MONGODB_URI");
        cfg.openai_api_key = non_empty_env("OPENAI_API_KEY");

        Ok(cfg)
    }

    /// Load config from a specific path (useful for testing)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let builder = ConfigLoader::builder().add_source(File::from(path.as_ref()));

        let config = builder.build()?;
        config.try_deserialize()
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
