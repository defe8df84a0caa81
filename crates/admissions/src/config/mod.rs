use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

/// Fee charged once an application has cleared every assessment stage.
pub const DEFAULT_PAYMENT_AMOUNT: u32 = 500;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub admissions: AdmissionsConfig,
}

impl AppConfig {
    /// Read `.env` (when present) and the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            environment: AppEnvironment::from_str(&setting("APP_ENV", "development")),
            server: ServerConfig::from_env()?,
            telemetry: TelemetryConfig {
                log_level: setting("APP_LOG_LEVEL", "info"),
            },
            admissions: AdmissionsConfig::from_env()?,
        })
    }
}

fn setting(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let port = setting("APP_PORT", "3000")
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;
        Ok(Self {
            host: setting("APP_HOST", "127.0.0.1"),
            port,
        })
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Admissions policy knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdmissionsConfig {
    pub payment_amount: u32,
}

impl AdmissionsConfig {
    /// Build the policy for a given fee; a zero fee is refused.
    pub fn with_payment_amount(payment_amount: u32) -> Result<Self, ConfigError> {
        if payment_amount == 0 {
            return Err(ConfigError::InvalidPaymentAmount {
                value: payment_amount.to_string(),
            });
        }
        Ok(Self { payment_amount })
    }

    fn from_env() -> Result<Self, ConfigError> {
        let raw = match env::var("ADMISSIONS_PAYMENT_AMOUNT") {
            Ok(raw) => raw,
            Err(_) => return Ok(Self::default()),
        };
        let amount = raw
            .trim()
            .parse::<u32>()
            .map_err(|_| ConfigError::InvalidPaymentAmount { value: raw.clone() })?;
        Self::with_payment_amount(amount)
            .map_err(|_| ConfigError::InvalidPaymentAmount { value: raw })
    }
}

impl Default for AdmissionsConfig {
    fn default() -> Self {
        Self {
            payment_amount: DEFAULT_PAYMENT_AMOUNT,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidPaymentAmount { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidPaymentAmount { value } => write!(
                f,
                "ADMISSIONS_PAYMENT_AMOUNT must be a positive integer (found '{value}')"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidPaymentAmount { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("APP_ENV");
        env::remove_var("APP_HOST");
        env::remove_var("APP_PORT");
        env::remove_var("APP_LOG_LEVEL");
        env::remove_var("ADMISSIONS_PAYMENT_AMOUNT");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.admissions.payment_amount, DEFAULT_PAYMENT_AMOUNT);
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn reads_payment_amount_override() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("ADMISSIONS_PAYMENT_AMOUNT", "750");
        env::set_var("APP_ENV", "ci");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.admissions.payment_amount, 750);
        assert_eq!(config.environment, AppEnvironment::Test);
        reset_env();
    }

    #[test]
    fn rejects_zero_payment_amount() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("ADMISSIONS_PAYMENT_AMOUNT", "0");
        match AppConfig::load() {
            Err(ConfigError::InvalidPaymentAmount { value }) => assert_eq!(value, "0"),
            other => panic!("expected invalid payment amount, got {other:?}"),
        }
        reset_env();
    }

    #[test]
    fn admissions_policy_requires_positive_fee() {
        assert_eq!(
            AdmissionsConfig::with_payment_amount(650)
                .expect("positive fee accepted")
                .payment_amount,
            650
        );
        assert!(matches!(
            AdmissionsConfig::with_payment_amount(0),
            Err(ConfigError::InvalidPaymentAmount { value }) if value == "0"
        ));
    }

    #[test]
    fn rejects_non_numeric_payment_amount() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("ADMISSIONS_PAYMENT_AMOUNT", " five hundred ");
        match AppConfig::load() {
            Err(ConfigError::InvalidPaymentAmount { value }) => {
                assert_eq!(value, " five hundred ")
            }
            other => panic!("expected invalid payment amount, got {other:?}"),
        }
        reset_env();
    }

    #[test]
    fn rejects_unparseable_port() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_PORT", "not-a-port");
        assert!(matches!(AppConfig::load(), Err(ConfigError::InvalidPort)));
        reset_env();
    }
}
