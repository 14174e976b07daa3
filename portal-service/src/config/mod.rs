use secrecy::Secret;
use serde::Deserialize;
use service_core::config::{self as core_config, get_env, is_production};
use service_core::error::AppError;
use std::time::Duration;

use crate::services::transactions::PaymentSimulation;
use crate::services::SimulationSettings;

#[derive(Debug, Clone, Deserialize)]
pub struct PortalConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub service_name: String,
    pub storage: StorageConfig,
    pub simulation: SimulationConfig,
    pub otlp_endpoint: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Memory,
    Redis,
}

impl std::str::FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" => Ok(StoreBackend::Memory),
            "redis" => Ok(StoreBackend::Redis),
            other => Err(format!("unknown store backend: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub backend: StoreBackend,
    pub redis_url: Option<Secret<String>>,
    pub key_prefix: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimulationConfig {
    pub payment_delay_ms: u64,
    pub payment_success_rate: f64,
    pub gateway_test_delay_ms: u64,
}

impl SimulationConfig {
    pub fn settings(&self) -> SimulationSettings {
        SimulationSettings {
            payment: PaymentSimulation {
                delay: Duration::from_millis(self.payment_delay_ms),
                success_rate: self.payment_success_rate,
            },
            gateway_test_delay: Duration::from_millis(self.gateway_test_delay_ms),
        }
    }
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            common: core_config::Config::default(),
            service_name: "portal-service".to_string(),
            storage: StorageConfig {
                backend: StoreBackend::Memory,
                redis_url: None,
                key_prefix: "portal:".to_string(),
            },
            simulation: SimulationConfig {
                payment_delay_ms: 2000,
                payment_success_rate: 0.9,
                gateway_test_delay_ms: 2000,
            },
            otlp_endpoint: None,
        }
    }
}

fn parse<T>(key: &str, raw: String) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse()
        .map_err(|e: T::Err| AppError::ConfigError(anyhow::anyhow!("invalid {}: {}", key, e)))
}

impl PortalConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;
        let is_prod = is_production();

        let backend: StoreBackend = parse(
            "PORTAL_STORE_BACKEND",
            get_env("PORTAL_STORE_BACKEND", Some("memory"), is_prod)?,
        )?;
        let redis_url = match backend {
            StoreBackend::Redis => Some(Secret::new(get_env("PORTAL_REDIS_URL", None, is_prod)?)),
            StoreBackend::Memory => None,
        };

        let config = PortalConfig {
            common,
            service_name: get_env("SERVICE_NAME", Some("portal-service"), false)?,
            storage: StorageConfig {
                backend,
                redis_url,
                key_prefix: get_env("PORTAL_REDIS_KEY_PREFIX", Some("portal:"), false)?,
            },
            simulation: SimulationConfig {
                payment_delay_ms: parse(
                    "PORTAL_PAYMENT_DELAY_MS",
                    get_env("PORTAL_PAYMENT_DELAY_MS", Some("2000"), false)?,
                )?,
                payment_success_rate: parse(
                    "PORTAL_PAYMENT_SUCCESS_RATE",
                    get_env("PORTAL_PAYMENT_SUCCESS_RATE", Some("0.9"), false)?,
                )?,
                gateway_test_delay_ms: parse(
                    "PORTAL_GATEWAY_TEST_DELAY_MS",
                    get_env("PORTAL_GATEWAY_TEST_DELAY_MS", Some("2000"), false)?,
                )?,
            },
            otlp_endpoint: std::env::var("OTLP_ENDPOINT").ok().filter(|v| !v.is_empty()),
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), AppError> {
        let rate = self.simulation.payment_success_rate;
        if !(0.0..=1.0).contains(&rate) {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "PORTAL_PAYMENT_SUCCESS_RATE must be between 0 and 1, got {}",
                rate
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_parses_case_insensitively() {
        assert_eq!("Redis".parse::<StoreBackend>(), Ok(StoreBackend::Redis));
        assert_eq!("memory".parse::<StoreBackend>(), Ok(StoreBackend::Memory));
        assert!("mongo".parse::<StoreBackend>().is_err());
    }

    #[test]
    fn success_rate_out_of_range_is_rejected() {
        let mut config = PortalConfig::default();
        config.simulation.payment_success_rate = 1.5;
        assert!(matches!(config.validate(), Err(AppError::ConfigError(_))));
    }

    #[test]
    fn simulation_settings_follow_config() {
        let config = PortalConfig::default();
        let settings = config.simulation.settings();
        assert_eq!(settings.payment.delay, Duration::from_millis(2000));
        assert_eq!(settings.payment.success_rate, 0.9);
    }
}
