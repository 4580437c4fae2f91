use super::certification::CertificationOutcome;
use super::domain::{AssessmentStep, SubmitReason};
use super::scoring::ScoreResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Final record of a submitted session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionResult {
    pub step: AssessmentStep,
    pub score: ScoreResult,
    pub outcome: CertificationOutcome,
    pub reason: SubmitReason,
    pub submitted_at: DateTime<Utc>,
}

/// Results store receiving each finalized session once.
///
/// Delivery is fire-and-forget: sessions log a failed hand-off and keep
/// their result.
pub trait ResultRecorder: Send + Sync {
    fn record_result(&self, result: &SessionResult) -> Result<(), RecorderError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RecorderError {
    #[error("results store unavailable: {0}")]
    Unavailable(String),
    #[error("result rejected: {0}")]
    Rejected(String),
}
