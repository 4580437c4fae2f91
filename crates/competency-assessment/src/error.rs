use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::assessment::{
    AssessmentServiceError, ContentError, SessionError, TickerError,
};
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Json(serde_json::Error),
    Content(ContentError),
    Assessment(AssessmentServiceError),
    Ticker(TickerError),
    Task(tokio::task::JoinError),
    Usage(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Json(err) => write!(f, "json error: {}", err),
            AppError::Content(err) => write!(f, "content error: {}", err),
            AppError::Assessment(err) => write!(f, "assessment error: {}", err),
            AppError::Ticker(err) => write!(f, "ticker error: {}", err),
            AppError::Task(err) => write!(f, "background task failed: {}", err),
            AppError::Usage(message) => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Json(err) => Some(err),
            AppError::Content(err) => Some(err),
            AppError::Assessment(err) => Some(err),
            AppError::Ticker(err) => Some(err),
            AppError::Task(err) => Some(err),
            AppError::Usage(_) => None,
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<ContentError> for AppError {
    fn from(value: ContentError) -> Self {
        Self::Content(value)
    }
}

impl From<AssessmentServiceError> for AppError {
    fn from(value: AssessmentServiceError) -> Self {
        Self::Assessment(value)
    }
}

impl From<SessionError> for AppError {
    fn from(value: SessionError) -> Self {
        Self::Assessment(AssessmentServiceError::Session(value))
    }
}

impl From<TickerError> for AppError {
    fn from(value: TickerError) -> Self {
        Self::Ticker(value)
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(value: tokio::task::JoinError) -> Self {
        Self::Task(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::assessment::AssessmentStep;

    #[test]
    fn session_errors_surface_through_the_service_variant() {
        let err = AppError::from(SessionError::OutOfRange { index: 12, len: 10 });
        assert!(matches!(
            err,
            AppError::Assessment(AssessmentServiceError::Session(_))
        ));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn content_errors_keep_their_message() {
        let err = AppError::from(ContentError::MissingStep(AssessmentStep::Three));
        assert_eq!(
            err.to_string(),
            "content error: no question bank configured for step 3"
        );
    }
}
