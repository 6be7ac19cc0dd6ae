use chrono::NaiveDate;
use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::path::PathBuf;

/// Name of the optional settings file (`configuration.toml`, `.yaml`, ...).
const CONFIG_FILE_STEM: &str = "configuration";

#[derive(Debug, Clone, Deserialize)]
pub struct AssistantConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    #[serde(default)]
    pub budget: BudgetConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub paths: PathsConfig,
}

/// Daily spending guard for the chat proxy.
#[derive(Debug, Clone, Deserialize)]
pub struct BudgetConfig {
    #[serde(default = "default_max_daily_requests")]
    pub max_daily_requests: u32,
    /// USD.
    #[serde(default = "default_max_daily_cost")]
    pub max_daily_cost: f64,
    /// Last day the chat proxy accepts requests.
    #[serde(default = "default_cutoff_date")]
    pub cutoff_date: NaiveDate,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_api_version")]
    pub api_version: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_input_price")]
    pub input_price_per_million: f64,
    #[serde(default = "default_output_price")]
    pub output_price_per_million: f64,
    /// Local file searched for an API key when the environment has none.
    #[serde(default = "default_credentials_file")]
    pub credentials_file: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "default_faq_file")]
    pub faq_file: PathBuf,
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            max_daily_requests: default_max_daily_requests(),
            max_daily_cost: default_max_daily_cost(),
            cutoff_date: default_cutoff_date(),
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            api_version: default_api_version(),
            timeout_secs: default_timeout_secs(),
            input_price_per_million: default_input_price(),
            output_price_per_million: default_output_price(),
            credentials_file: default_credentials_file(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            faq_file: default_faq_file(),
            static_dir: default_static_dir(),
        }
    }
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            common: core_config::Config::default(),
            budget: BudgetConfig::default(),
            provider: ProviderConfig::default(),
            paths: PathsConfig::default(),
        }
    }
}

impl AssistantConfig {
    pub fn load() -> Result<Self, AppError> {
        core_config::load_layered(CONFIG_FILE_STEM)
    }
}

fn default_max_daily_requests() -> u32 {
    200
}

fn default_max_daily_cost() -> f64 {
    30.0
}

fn default_cutoff_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 23).unwrap_or_default()
}

fn default_base_url() -> String {
    "https://api.anthropic.com".to_string()
}

fn default_model() -> String {
    "claude-sonnet-4-20250514".to_string()
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_api_version() -> String {
    "2023-06-01".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_input_price() -> f64 {
    3.0
}

fn default_output_price() -> f64 {
    15.0
}

fn default_credentials_file() -> PathBuf {
    PathBuf::from("config.js")
}

fn default_faq_file() -> PathBuf {
    PathBuf::from("data/faq.json")
}

fn default_static_dir() -> PathBuf {
    PathBuf::from(".")
}
