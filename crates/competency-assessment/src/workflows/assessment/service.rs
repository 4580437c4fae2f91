use std::sync::Arc;

use super::certification::CertificationPolicy;
use super::content::{ContentError, QuestionBankProvider};
use super::domain::AssessmentStep;
use super::progress::LadderProgress;
use super::recorder::ResultRecorder;
use super::session::{SessionError, TestSession, DEFAULT_LOW_TIME_WARNING_SECONDS};

/// Knobs applied to every session the service opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSettings {
    pub time_limit_override: Option<u32>,
    pub low_time_warning_seconds: u32,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            time_limit_override: None,
            low_time_warning_seconds: DEFAULT_LOW_TIME_WARNING_SECONDS,
        }
    }
}

/// Service composing the content provider, certification policy, and results store.
pub struct AssessmentService<P, R> {
    provider: Arc<P>,
    recorder: Arc<R>,
    policy: CertificationPolicy,
    settings: SessionSettings,
}

impl<P, R> AssessmentService<P, R>
where
    P: QuestionBankProvider + 'static,
    R: ResultRecorder + 'static,
{
    pub fn new(provider: Arc<P>, recorder: Arc<R>) -> Self {
        Self {
            provider,
            recorder,
            policy: CertificationPolicy::standard(),
            settings: SessionSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: SessionSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_policy(mut self, policy: CertificationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> &CertificationPolicy {
        &self.policy
    }

    /// Build a not-yet-started session for a step; results go to the recorder.
    pub fn open_session(&self, step: AssessmentStep) -> Result<TestSession, AssessmentServiceError> {
        let mut bank = self.provider.load_question_bank(step)?;
        if let Some(limit) = self.settings.time_limit_override {
            let adjusted = bank.with_time_limit(limit).map_err(ContentError::from)?;
            bank = Arc::new(adjusted);
        }

        let recorder: Arc<dyn ResultRecorder> = self.recorder.clone();
        tracing::debug!(%step, time_limit = bank.time_limit_seconds(), "opening assessment session");

        Ok(TestSession::new(bank)
            .with_policy(self.policy)
            .with_recorder(recorder)
            .with_low_time_warning(self.settings.low_time_warning_seconds))
    }

    /// Like [`Self::open_session`], but only for steps the candidate's ladder allows.
    pub fn open_session_for(
        &self,
        progress: &LadderProgress,
        step: AssessmentStep,
    ) -> Result<TestSession, AssessmentServiceError> {
        if progress.attempted(step) {
            return Err(AssessmentServiceError::StepLocked {
                step,
                reason: "already attempted and retakes are not offered",
            });
        }
        if !progress.can_start(step) {
            return Err(AssessmentServiceError::StepLocked {
                step,
                reason: "previous step not passed with an advancing score",
            });
        }
        self.open_session(step)
    }
}

/// Error raised by the assessment service.
#[derive(Debug, thiserror::Error)]
pub enum AssessmentServiceError {
    #[error(transparent)]
    Content(#[from] ContentError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("{step} is locked: {reason}")]
    StepLocked {
        step: AssessmentStep,
        reason: &'static str,
    },
}
