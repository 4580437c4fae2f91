use crate::workflows::assessment::service::SessionSettings;
use crate::workflows::assessment::session::DEFAULT_LOW_TIME_WARNING_SECONDS;
use std::env;
use std::fmt;
use std::num::ParseIntError;
use std::path::PathBuf;

const DEFAULT_TICK_MILLIS: u64 = 1_000;

/// Distinguishes runtime behavior for different stages of the tool.
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
    pub telemetry: TelemetryConfig,
    pub assessment: AssessmentConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let ansi = env::var("APP_LOG_ANSI")
            .map(|value| matches!(value.trim(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let bank_dir = env::var_os("ASSESSMENT_BANK_DIR")
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);

        let time_limit_override = match non_empty_var("ASSESSMENT_TIME_LIMIT_SECS") {
            Some(raw) => {
                let seconds = raw
                    .parse::<u32>()
                    .map_err(|source| ConfigError::InvalidTimeLimit {
                        value: raw.clone(),
                        source: Some(source),
                    })?;
                if seconds == 0 {
                    return Err(ConfigError::InvalidTimeLimit {
                        value: raw,
                        source: None,
                    });
                }
                Some(seconds)
            }
            None => None,
        };

        let low_time_warning_seconds = match non_empty_var("ASSESSMENT_LOW_TIME_WARNING_SECS") {
            Some(raw) => raw
                .parse::<u32>()
                .map_err(|source| ConfigError::InvalidWarning { value: raw, source })?,
            None => DEFAULT_LOW_TIME_WARNING_SECONDS,
        };

        let tick_millis = match non_empty_var("ASSESSMENT_TICK_MILLIS") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(0) => return Err(ConfigError::InvalidTick { value: raw, source: None }),
                Ok(millis) => millis,
                Err(source) => {
                    return Err(ConfigError::InvalidTick {
                        value: raw,
                        source: Some(source),
                    })
                }
            },
            None => DEFAULT_TICK_MILLIS,
        };

        Ok(Self {
            environment,
            telemetry: TelemetryConfig { log_level, ansi },
            assessment: AssessmentConfig {
                bank_dir,
                time_limit_override,
                low_time_warning_seconds,
                tick_millis,
            },
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub ansi: bool,
}

/// Where question banks come from and how sessions are timed.
#[derive(Debug, Clone)]
pub struct AssessmentConfig {
    /// Directory holding `step1.csv`..`step3.csv`; `None` selects the built-in catalog.
    pub bank_dir: Option<PathBuf>,
    pub time_limit_override: Option<u32>,
    pub low_time_warning_seconds: u32,
    pub tick_millis: u64,
}

impl AssessmentConfig {
    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            time_limit_override: self.time_limit_override,
            low_time_warning_seconds: self.low_time_warning_seconds,
        }
    }

    pub fn tick_period(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.tick_millis)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidTimeLimit {
        value: String,
        source: Option<ParseIntError>,
    },
    InvalidWarning {
        value: String,
        source: ParseIntError,
    },
    InvalidTick {
        value: String,
        source: Option<ParseIntError>,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidTimeLimit { value, .. } => write!(
                f,
                "ASSESSMENT_TIME_LIMIT_SECS must be a positive number of seconds, got '{}'",
                value
            ),
            ConfigError::InvalidWarning { value, .. } => write!(
                f,
                "ASSESSMENT_LOW_TIME_WARNING_SECS must be a number of seconds, got '{}'",
                value
            ),
            ConfigError::InvalidTick { value, .. } => write!(
                f,
                "ASSESSMENT_TICK_MILLIS must be a positive number of milliseconds, got '{}'",
                value
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidTimeLimit { source, .. } | ConfigError::InvalidTick { source, .. } => {
                source.as_ref().map(|err| err as &(dyn std::error::Error + 'static))
            }
            ConfigError::InvalidWarning { source, .. } => Some(source),
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
        env::remove_var("APP_LOG_LEVEL");
        env::remove_var("APP_LOG_ANSI");
        env::remove_var("ASSESSMENT_BANK_DIR");
        env::remove_var("ASSESSMENT_TIME_LIMIT_SECS");
        env::remove_var("ASSESSMENT_LOW_TIME_WARNING_SECS");
        env::remove_var("ASSESSMENT_TICK_MILLIS");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.telemetry.log_level, "info");
        assert!(!config.telemetry.ansi);
        assert_eq!(config.assessment.bank_dir, None);
        assert_eq!(config.assessment.time_limit_override, None);
        assert_eq!(config.assessment.low_time_warning_seconds, 120);
        assert_eq!(config.assessment.tick_millis, 1_000);
    }

    #[test]
    fn reads_assessment_overrides() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_ENV", "ci");
        env::set_var("ASSESSMENT_BANK_DIR", "/srv/banks");
        env::set_var("ASSESSMENT_TIME_LIMIT_SECS", "300");
        env::set_var("ASSESSMENT_LOW_TIME_WARNING_SECS", "30");
        env::set_var("ASSESSMENT_TICK_MILLIS", "250");

        let config = AppConfig::load().expect("config loads");
        reset_env();

        assert_eq!(config.environment, AppEnvironment::Test);
        assert_eq!(config.assessment.bank_dir, Some(PathBuf::from("/srv/banks")));
        let settings = config.assessment.session_settings();
        assert_eq!(settings.time_limit_override, Some(300));
        assert_eq!(settings.low_time_warning_seconds, 30);
        assert_eq!(
            config.assessment.tick_period(),
            std::time::Duration::from_millis(250)
        );
    }

    #[test]
    fn rejects_zero_time_limit_and_tick() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("ASSESSMENT_TIME_LIMIT_SECS", "0");
        let err = AppConfig::load().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTimeLimit { source: None, .. }));

        reset_env();
        env::set_var("ASSESSMENT_TICK_MILLIS", "0");
        let err = AppConfig::load().unwrap_err();
        assert!(err.to_string().contains("ASSESSMENT_TICK_MILLIS"));
        reset_env();
    }

    #[test]
    fn rejects_non_numeric_warning() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("ASSESSMENT_LOW_TIME_WARNING_SECS", "soon");
        let err = AppConfig::load().unwrap_err();
        reset_env();
        assert!(matches!(err, ConfigError::InvalidWarning { .. }));
        assert!(std::error::Error::source(&err).is_some());
    }
}
