//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//! - `MOVENPICK_BASE_URL` - Site base URL (default: `http://localhost/movenpick/`)
//! - `MOVENPICK_DATA_DIR` - Directory for durable client storage (default: `.movenpick`)
//! - `MOVENPICK_DELIVERY_FEE` - Flat delivery fee in RWF (default: 2000)
//! - `MOVENPICK_MENU_PATH` - Menu JSON file (default: `crates/storefront/content/menu.json`)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name (default: development)
//! - `SENTRY_SAMPLE_RATE` - Error sample rate, 0.0 to 1.0 (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Trace sample rate, 0.0 to 1.0 (default: 0.0)

use std::path::PathBuf;

use movenpick_core::Money;
use thiserror::Error;
use url::Url;

const DEFAULT_BASE_URL: &str = "http://localhost/movenpick/";
const DEFAULT_DATA_DIR: &str = ".movenpick";
const DEFAULT_DELIVERY_FEE: &str = "2000";
const DEFAULT_MENU_PATH: &str = "crates/storefront/content/menu.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Ordering client configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Site base URL, always ending in `/`
    pub base_url: Url,
    /// Directory holding the durable storage files
    pub data_dir: PathBuf,
    /// Flat delivery fee added to every order
    pub delivery_fee: Money,
    /// Menu catalog file
    pub menu_path: PathBuf,
    /// Error tracking configuration
    pub sentry: SentryConfig,
}

/// Sentry configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SentryConfig {
    pub dsn: Option<String>,
    pub environment: String,
    pub sample_rate: f32,
    pub traces_sample_rate: f32,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup` instead of the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(lookup);

        let base_url = parse_base_url(&env.get_or_default("MOVENPICK_BASE_URL", DEFAULT_BASE_URL))?;
        let data_dir = PathBuf::from(env.get_or_default("MOVENPICK_DATA_DIR", DEFAULT_DATA_DIR));
        let delivery_fee = env
            .get_or_default("MOVENPICK_DELIVERY_FEE", DEFAULT_DELIVERY_FEE)
            .trim()
            .parse::<u64>()
            .map(Money::new)
            .map_err(|e| {
                ConfigError::InvalidEnvVar("MOVENPICK_DELIVERY_FEE".to_string(), e.to_string())
            })?;
        let menu_path = PathBuf::from(env.get_or_default("MOVENPICK_MENU_PATH", DEFAULT_MENU_PATH));

        let sentry = SentryConfig {
            dsn: env.get_optional("SENTRY_DSN"),
            environment: env.get_or_default("SENTRY_ENVIRONMENT", "development"),
            sample_rate: env.get_rate("SENTRY_SAMPLE_RATE", 1.0)?,
            traces_sample_rate: env.get_rate("SENTRY_TRACES_SAMPLE_RATE", 0.0)?,
        };

        Ok(Self {
            base_url,
            data_dir,
            delivery_fee,
            menu_path,
            sentry,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<F>(F);

impl<F: Fn(&str) -> Option<String>> Env<F> {
    /// Get an optional variable. Blank values count as unset.
    fn get_optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    /// Get a variable with a default value.
    fn get_or_default(&self, key: &str, default: &str) -> String {
        self.get_optional(key)
            .unwrap_or_else(|| default.to_string())
    }

    /// Get a sample rate in `0.0..=1.0`.
    fn get_rate(&self, key: &str, default: f32) -> Result<f32, ConfigError> {
        let Some(raw) = self.get_optional(key) else {
            return Ok(default);
        };
        let rate = raw
            .trim()
            .parse::<f32>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
        if !(0.0..=1.0).contains(&rate) {
            return Err(ConfigError::InvalidEnvVar(
                key.to_string(),
                format!("{rate} is outside 0.0..=1.0"),
            ));
        }
        Ok(rate)
    }
}

/// Parse the base URL, adding the trailing `/` that `Url::join` needs.
fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let raw = raw.trim();
    let normalized = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{raw}/")
    };
    Url::parse(&normalized)
        .map_err(|e| ConfigError::InvalidEnvVar("MOVENPICK_BASE_URL".to_string(), e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        StorefrontConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.base_url.as_str(), "http://localhost/movenpick/");
        assert_eq!(config.data_dir, PathBuf::from(".movenpick"));
        assert_eq!(config.delivery_fee, Money::new(2000));
        assert_eq!(config.menu_path, PathBuf::from(DEFAULT_MENU_PATH));
        assert_eq!(config.sentry.dsn, None);
        assert_eq!(config.sentry.environment, "development");
        assert!((config.sentry.sample_rate - 1.0).abs() < f32::EPSILON);
        assert!(config.sentry.traces_sample_rate.abs() < f32::EPSILON);
    }

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let config = load(&[("MOVENPICK_BASE_URL", "https://movenpick.rw/shop")]).unwrap();
        assert_eq!(config.base_url.as_str(), "https://movenpick.rw/shop/");
        assert_eq!(
            config.base_url.join("orders/place_order.php").unwrap().as_str(),
            "https://movenpick.rw/shop/orders/place_order.php"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let err = load(&[("MOVENPICK_BASE_URL", "not a url")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "MOVENPICK_BASE_URL"));
    }

    #[test]
    fn test_delivery_fee_override() {
        let config = load(&[("MOVENPICK_DELIVERY_FEE", "3500")]).unwrap();
        assert_eq!(config.delivery_fee, Money::new(3500));

        let err = load(&[("MOVENPICK_DELIVERY_FEE", "-1")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "MOVENPICK_DELIVERY_FEE"));
    }

    #[test]
    fn test_sample_rate_bounds() {
        let config = load(&[("SENTRY_TRACES_SAMPLE_RATE", "0.25")]).unwrap();
        assert!((config.sentry.traces_sample_rate - 0.25).abs() < f32::EPSILON);

        assert!(load(&[("SENTRY_SAMPLE_RATE", "1.5")]).is_err());
        assert!(load(&[("SENTRY_SAMPLE_RATE", "often")]).is_err());
    }

    #[test]
    fn test_blank_values_use_defaults() {
        let config = load(&[("SENTRY_DSN", "  "), ("MOVENPICK_DATA_DIR", "")]).unwrap();
        assert_eq!(config.sentry.dsn, None);
        assert_eq!(config.data_dir, PathBuf::from(".movenpick"));
    }
}
