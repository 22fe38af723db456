use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub shopify: ShopifyConfig,
    pub analysis: AnalysisConfig,
    pub server: ServerConfig,
    pub pipeline: PipelineConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct ShopifyConfig {
    pub api_key: Option<SecretString>,
    pub api_secret: Option<SecretString>,
    /// Process-lifetime Admin API credential. Absent means mock-only mode.
    pub access_token: Option<SecretString>,
    pub api_version: String,
    pub timeout_secs: u64,
    pub callback_base_url: Option<String>,
}

#[derive(Clone, Debug)]
pub struct AnalysisConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_address: String,
    pub analysis_port: u16,
    pub gateway_port: u16,
}

#[derive(Clone, Debug)]
pub struct PipelineConfig {
    pub default_top_n: u32,
    pub default_window_days: u32,
    pub default_low_stock_threshold: u32,
    pub forecast_window_days: u32,
    /// Minimum live record count for a `high` confidence answer. Heuristic,
    /// kept configurable rather than contractual.
    pub high_confidence_min_records: u32,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub shopify_api_key: Option<String>,
    pub shopify_api_secret: Option<String>,
    pub shopify_access_token: Option<String>,
    pub shopify_callback_base_url: Option<String>,
    pub analysis_base_url: Option<String>,
    pub log_level: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            shopify: ShopifyConfig {
                api_key: None,
                api_secret: None,
                access_token: None,
                api_version: "2024-01".to_string(),
                timeout_secs: 10,
                callback_base_url: None,
            },
            analysis: AnalysisConfig {
                base_url: "http://127.0.0.1:8000".to_string(),
                timeout_secs: 30,
            },
            server: ServerConfig {
                bind_address: "127.0.0.1".to_string(),
                analysis_port: 8000,
                gateway_port: 3000,
            },
            pipeline: PipelineConfig {
                default_top_n: 5,
                default_window_days: 30,
                default_low_stock_threshold: 20,
                forecast_window_days: 30,
                high_confidence_min_records: 5,
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

fn secret_value(value: String) -> SecretString {
    value.into()
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("shoplens.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(shopify) = patch.shopify {
            if let Some(api_key_value) = shopify.api_key {
                self.shopify.api_key = Some(secret_value(api_key_value));
            }
            if let Some(api_secret_value) = shopify.api_secret {
                self.shopify.api_secret = Some(secret_value(api_secret_value));
            }
            if let Some(access_token_value) = shopify.access_token {
                self.shopify.access_token = Some(secret_value(access_token_value));
            }
            if let Some(api_version) = shopify.api_version {
                self.shopify.api_version = api_version;
            }
            if let Some(timeout_secs) = shopify.timeout_secs {
                self.shopify.timeout_secs = timeout_secs;
            }
            if let Some(callback_base_url) = shopify.callback_base_url {
                self.shopify.callback_base_url = Some(callback_base_url);
            }
        }

        if let Some(analysis) = patch.analysis {
            if let Some(base_url) = analysis.base_url {
                self.analysis.base_url = base_url;
            }
            if let Some(timeout_secs) = analysis.timeout_secs {
                self.analysis.timeout_secs = timeout_secs;
            }
        }

        if let Some(server) = patch.server {
            if let Some(bind_address) = server.bind_address {
                self.server.bind_address = bind_address;
            }
            if let Some(analysis_port) = server.analysis_port {
                self.server.analysis_port = analysis_port;
            }
            if let Some(gateway_port) = server.gateway_port {
                self.server.gateway_port = gateway_port;
            }
        }

        if let Some(pipeline) = patch.pipeline {
            if let Some(default_top_n) = pipeline.default_top_n {
                self.pipeline.default_top_n = default_top_n;
            }
            if let Some(default_window_days) = pipeline.default_window_days {
                self.pipeline.default_window_days = default_window_days;
            }
            if let Some(default_low_stock_threshold) = pipeline.default_low_stock_threshold {
                self.pipeline.default_low_stock_threshold = default_low_stock_threshold;
            }
            if let Some(forecast_window_days) = pipeline.forecast_window_days {
                self.pipeline.forecast_window_days = forecast_window_days;
            }
            if let Some(high_confidence_min_records) = pipeline.high_confidence_min_records {
                self.pipeline.high_confidence_min_records = high_confidence_min_records;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("SHOPLENS_SHOPIFY_API_KEY") {
            self.shopify.api_key = Some(secret_value(value));
        }
        if let Some(value) = read_env("SHOPLENS_SHOPIFY_API_SECRET") {
            self.shopify.api_secret = Some(secret_value(value));
        }
        if let Some(value) = read_env("SHOPLENS_SHOPIFY_ACCESS_TOKEN") {
            self.shopify.access_token = Some(secret_value(value));
        }
        if let Some(value) = read_env("SHOPLENS_SHOPIFY_API_VERSION") {
            self.shopify.api_version = value;
        }
        if let Some(value) = read_env("SHOPLENS_SHOPIFY_TIMEOUT_SECS") {
            self.shopify.timeout_secs = parse_u64("SHOPLENS_SHOPIFY_TIMEOUT_SECS", &value)?;
        }
        if let Some(value) = read_env("SHOPLENS_SHOPIFY_CALLBACK_BASE_URL") {
            self.shopify.callback_base_url = Some(value);
        }

        if let Some(value) = read_env("SHOPLENS_ANALYSIS_BASE_URL") {
            self.analysis.base_url = value;
        }
        if let Some(value) = read_env("SHOPLENS_ANALYSIS_TIMEOUT_SECS") {
            self.analysis.timeout_secs = parse_u64("SHOPLENS_ANALYSIS_TIMEOUT_SECS", &value)?;
        }

        if let Some(value) = read_env("SHOPLENS_SERVER_BIND_ADDRESS") {
            self.server.bind_address = value;
        }
        if let Some(value) = read_env("SHOPLENS_SERVER_ANALYSIS_PORT") {
            self.server.analysis_port = parse_u16("SHOPLENS_SERVER_ANALYSIS_PORT", &value)?;
        }
        if let Some(value) = read_env("SHOPLENS_SERVER_GATEWAY_PORT") {
            self.server.gateway_port = parse_u16("SHOPLENS_SERVER_GATEWAY_PORT", &value)?;
        }

        if let Some(value) = read_env("SHOPLENS_PIPELINE_DEFAULT_TOP_N") {
            self.pipeline.default_top_n = parse_u32("SHOPLENS_PIPELINE_DEFAULT_TOP_N", &value)?;
        }
        if let Some(value) = read_env("SHOPLENS_PIPELINE_DEFAULT_WINDOW_DAYS") {
            self.pipeline.default_window_days =
                parse_u32("SHOPLENS_PIPELINE_DEFAULT_WINDOW_DAYS", &value)?;
        }
        if let Some(value) = read_env("SHOPLENS_PIPELINE_DEFAULT_LOW_STOCK_THRESHOLD") {
            self.pipeline.default_low_stock_threshold =
                parse_u32("SHOPLENS_PIPELINE_DEFAULT_LOW_STOCK_THRESHOLD", &value)?;
        }
        if let Some(value) = read_env("SHOPLENS_PIPELINE_FORECAST_WINDOW_DAYS") {
            self.pipeline.forecast_window_days =
                parse_u32("SHOPLENS_PIPELINE_FORECAST_WINDOW_DAYS", &value)?;
        }
        if let Some(value) = read_env("SHOPLENS_PIPELINE_HIGH_CONFIDENCE_MIN_RECORDS") {
            self.pipeline.high_confidence_min_records =
                parse_u32("SHOPLENS_PIPELINE_HIGH_CONFIDENCE_MIN_RECORDS", &value)?;
        }

        let log_level =
            read_env("SHOPLENS_LOGGING_LEVEL").or_else(|| read_env("SHOPLENS_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("SHOPLENS_LOGGING_FORMAT").or_else(|| read_env("SHOPLENS_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(shopify_api_key) = overrides.shopify_api_key {
            self.shopify.api_key = Some(secret_value(shopify_api_key));
        }
        if let Some(shopify_api_secret) = overrides.shopify_api_secret {
            self.shopify.api_secret = Some(secret_value(shopify_api_secret));
        }
        if let Some(shopify_access_token) = overrides.shopify_access_token {
            self.shopify.access_token = Some(secret_value(shopify_access_token));
        }
        if let Some(shopify_callback_base_url) = overrides.shopify_callback_base_url {
            self.shopify.callback_base_url = Some(shopify_callback_base_url);
        }
        if let Some(analysis_base_url) = overrides.analysis_base_url {
            self.analysis.base_url = analysis_base_url;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_shopify(&self.shopify)?;
        validate_analysis(&self.analysis)?;
        validate_server(&self.server)?;
        validate_pipeline(&self.pipeline)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("shoplens.toml"), PathBuf::from("config/shoplens.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_shopify(shopify: &ShopifyConfig) -> Result<(), ConfigError> {
    let has_key = shopify
        .api_key
        .as_ref()
        .map(|value| !value.expose_secret().trim().is_empty())
        .unwrap_or(false);
    let has_secret = shopify
        .api_secret
        .as_ref()
        .map(|value| !value.expose_secret().trim().is_empty())
        .unwrap_or(false);

    // Fully absent credentials are valid (mock-only mode); a partial pair is
    // always a misconfiguration.
    if has_key != has_secret {
        return Err(ConfigError::Validation(
            "shopify.api_key and shopify.api_secret must be configured together \
             (set both for OAuth, or neither for mock-only mode)"
                .to_string(),
        ));
    }

    if shopify.api_version.trim().is_empty() {
        return Err(ConfigError::Validation("shopify.api_version must not be empty".to_string()));
    }

    if shopify.timeout_secs == 0 || shopify.timeout_secs > 300 {
        return Err(ConfigError::Validation(
            "shopify.timeout_secs must be in range 1..=300".to_string(),
        ));
    }

    if let Some(base_url) = &shopify.callback_base_url {
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ConfigError::Validation(
                "shopify.callback_base_url must start with http:// or https://".to_string(),
            ));
        }
    }

    Ok(())
}

fn validate_analysis(analysis: &AnalysisConfig) -> Result<(), ConfigError> {
    if !analysis.base_url.starts_with("http://") && !analysis.base_url.starts_with("https://") {
        return Err(ConfigError::Validation(
            "analysis.base_url must start with http:// or https://".to_string(),
        ));
    }

    if analysis.timeout_secs == 0 || analysis.timeout_secs > 300 {
        return Err(ConfigError::Validation(
            "analysis.timeout_secs must be in range 1..=300".to_string(),
        ));
    }

    Ok(())
}

fn validate_server(server: &ServerConfig) -> Result<(), ConfigError> {
    if server.analysis_port == 0 {
        return Err(ConfigError::Validation(
            "server.analysis_port must be greater than zero".to_string(),
        ));
    }

    if server.gateway_port == 0 {
        return Err(ConfigError::Validation(
            "server.gateway_port must be greater than zero".to_string(),
        ));
    }

    if server.analysis_port == server.gateway_port {
        return Err(ConfigError::Validation(
            "server.analysis_port and server.gateway_port must differ".to_string(),
        ));
    }

    Ok(())
}

fn validate_pipeline(pipeline: &PipelineConfig) -> Result<(), ConfigError> {
    if pipeline.default_top_n == 0 {
        return Err(ConfigError::Validation(
            "pipeline.default_top_n must be greater than zero".to_string(),
        ));
    }

    if pipeline.default_window_days == 0 || pipeline.default_window_days > 365 {
        return Err(ConfigError::Validation(
            "pipeline.default_window_days must be in range 1..=365".to_string(),
        ));
    }

    if pipeline.forecast_window_days == 0 || pipeline.forecast_window_days > 365 {
        return Err(ConfigError::Validation(
            "pipeline.forecast_window_days must be in range 1..=365".to_string(),
        ));
    }

    if pipeline.high_confidence_min_records == 0 {
        return Err(ConfigError::Validation(
            "pipeline.high_confidence_min_records must be greater than zero".to_string(),
        ));
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u16(key: &str, value: &str) -> Result<u16, ConfigError> {
    value.parse::<u16>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u32(key: &str, value: &str) -> Result<u32, ConfigError> {
    value.parse::<u32>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    shopify: Option<ShopifyPatch>,
    analysis: Option<AnalysisPatch>,
    server: Option<ServerPatch>,
    pipeline: Option<PipelinePatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct ShopifyPatch {
    api_key: Option<String>,
    api_secret: Option<String>,
    access_token: Option<String>,
    api_version: Option<String>,
    timeout_secs: Option<u64>,
    callback_base_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct AnalysisPatch {
    base_url: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerPatch {
    bind_address: Option<String>,
    analysis_port: Option<u16>,
    gateway_port: Option<u16>,
}

#[derive(Debug, Default, Deserialize)]
struct PipelinePatch {
    default_top_n: Option<u32>,
    default_window_days: Option<u32>,
    default_low_stock_threshold: Option<u32>,
    forecast_window_days: Option<u32>,
    high_confidence_min_records: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
