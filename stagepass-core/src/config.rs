use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub business_rules: BusinessRules,
    #[serde(default)]
    pub currency: CurrencyConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BusinessRules {
    /// Client-side mirror of the backend hold TTL
    #[serde(default = "default_lock_seconds")]
    pub seat_lock_seconds: u64,
    /// Remaining seconds at which the countdown turns urgent (display only)
    #[serde(default = "default_critical_seconds")]
    pub critical_threshold_seconds: u64,
    /// Base for the gateway success/cancel redirect targets
    #[serde(default = "default_return_url")]
    pub return_url_base: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CurrencyConfig {
    /// Currency the exchange-rate table pivots through
    #[serde(default = "default_base_currency")]
    pub base_currency: String,
    /// Default when locale detection finds no known region
    #[serde(default = "default_fallback_currency")]
    pub fallback_currency: String,
    /// Location of the persisted preferred-currency entry
    #[serde(default = "default_preference_path")]
    pub preference_path: String,
}

fn default_lock_seconds() -> u64 {
    120
}
fn default_critical_seconds() -> u64 {
    30
}
fn default_return_url() -> String {
    "https://app.stagepass.local/checkout/return".to_string()
}
fn default_base_currency() -> String {
    "INR".to_string()
}
fn default_fallback_currency() -> String {
    "USD".to_string()
}
fn default_preference_path() -> String {
    ".stagepass/preferences.json".to_string()
}

impl Default for BusinessRules {
    fn default() -> Self {
        Self {
            seat_lock_seconds: default_lock_seconds(),
            critical_threshold_seconds: default_critical_seconds(),
            return_url_base: default_return_url(),
        }
    }
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            base_currency: default_base_currency(),
            fallback_currency: default_fallback_currency(),
            preference_path: default_preference_path(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            business_rules: BusinessRules::default(),
            currency: CurrencyConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(config::File::with_name("config/local").required(false))
            // Eg. `STAGEPASS_BUSINESS_RULES__SEAT_LOCK_SECONDS=90`
            .add_source(config::Environment::with_prefix("STAGEPASS").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
