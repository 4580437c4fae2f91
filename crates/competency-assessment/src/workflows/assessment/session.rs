use super::bank::QuestionBank;
use super::certification::CertificationPolicy;
use super::clock::{format_clock, ClockTick, TestClock};
use super::domain::{AssessmentStep, PublicQuestion, Question, QuestionId, SubmitReason};
use super::ledger::AnswerLedger;
use super::recorder::{ResultRecorder, SessionResult};
use super::scoring::{round_percentage, ScoringEngine};
use chrono::Utc;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const DEFAULT_LOW_TIME_WARNING_SECONDS: u32 = 120;

/// Externally visible lifecycle of a [`TestSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    NotStarted,
    Active,
    Submitting,
    Finalized,
}

impl SessionState {
    pub const fn label(self) -> &'static str {
        match self {
            Self::NotStarted => "not started",
            Self::Active => "active",
            Self::Submitting => "submitting",
            Self::Finalized => "finalized",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

enum Phase {
    NotStarted,
    Active,
    Submitting,
    Finalized(Box<SessionResult>),
}

impl Phase {
    fn state(&self) -> SessionState {
        match self {
            Phase::NotStarted => SessionState::NotStarted,
            Phase::Active => SessionState::Active,
            Phase::Submitting => SessionState::Submitting,
            Phase::Finalized(_) => SessionState::Finalized,
        }
    }
}

/// Outcome of feeding one second to a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionTick {
    Running { remaining_seconds: u32 },
    /// The clock ran out on this tick and the session was auto-submitted.
    Expired(Box<SessionResult>),
    Inactive,
}

/// One candidate's timed attempt at a step's question bank.
///
/// Submission is first-writer-wins: whichever of a manual submit or the clock
/// expiry arrives first scores the ledger, later calls get the stored result.
pub struct TestSession {
    bank: Arc<QuestionBank>,
    ledger: AnswerLedger,
    clock: TestClock,
    cursor: usize,
    phase: Phase,
    policy: CertificationPolicy,
    recorder: Option<Arc<dyn ResultRecorder>>,
    low_time_warning_seconds: u32,
}

impl TestSession {
    pub fn new(bank: Arc<QuestionBank>) -> Self {
        let clock = TestClock::new(bank.time_limit_seconds());
        Self {
            bank,
            ledger: AnswerLedger::new(),
            clock,
            cursor: 0,
            phase: Phase::NotStarted,
            policy: CertificationPolicy::standard(),
            recorder: None,
            low_time_warning_seconds: DEFAULT_LOW_TIME_WARNING_SECONDS,
        }
    }

    pub fn with_policy(mut self, policy: CertificationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_recorder(mut self, recorder: Arc<dyn ResultRecorder>) -> Self {
        self.recorder = Some(recorder);
        self
    }

    pub fn with_low_time_warning(mut self, seconds: u32) -> Self {
        self.low_time_warning_seconds = seconds;
        self
    }

    pub fn start(&mut self) -> Result<(), SessionError> {
        match self.phase {
            Phase::NotStarted => {}
            Phase::Finalized(_) => return Err(SessionError::SessionClosed { operation: "start" }),
            Phase::Active | Phase::Submitting => return Err(self.invalid_state("start")),
        }

        let tick = self
            .clock
            .start()
            .map_err(|_| self.invalid_state("start"))?;
        self.phase = Phase::Active;
        info!(
            step = %self.bank.step(),
            questions = self.bank.len(),
            time_limit = self.bank.time_limit_seconds(),
            "assessment session started"
        );

        if tick == ClockTick::Expired {
            self.finalize(SubmitReason::Timeout);
        }
        Ok(())
    }

    pub fn answer(&mut self, question_id: QuestionId, option_index: usize) -> Result<(), SessionError> {
        self.ensure_active("answer")?;
        self.position_of(question_id)?;
        self.ledger.set_answer(question_id, option_index);
        debug!(question = %question_id, option = option_index, "answer recorded");
        Ok(())
    }

    pub fn answer_current(&mut self, option_index: usize) -> Result<(), SessionError> {
        self.ensure_active("answer")?;
        let question_id = self.current().id;
        self.answer(question_id, option_index)
    }

    /// Toggles the review flag, returning whether the question is now flagged.
    pub fn flag(&mut self, question_id: QuestionId) -> Result<bool, SessionError> {
        self.ensure_active("flag")?;
        self.position_of(question_id)?;
        let flagged = self.ledger.toggle_flag(question_id);
        debug!(question = %question_id, flagged, "flag toggled");
        Ok(flagged)
    }

    pub fn flag_current(&mut self) -> Result<bool, SessionError> {
        self.ensure_active("flag")?;
        let question_id = self.current().id;
        self.flag(question_id)
    }

    /// Moves the cursor. Indices outside the bank fail with `OutOfRange`
    /// and leave the cursor where it was.
    pub fn go_to(&mut self, index: usize) -> Result<usize, SessionError> {
        self.ensure_active("go_to")?;
        self.bank.get(index)?;
        self.cursor = index;
        debug!(cursor = index, "cursor moved");
        Ok(self.cursor)
    }

    /// Advances the cursor; stays put on the last question.
    pub fn next(&mut self) -> Result<usize, SessionError> {
        self.ensure_active("next")?;
        self.cursor = (self.cursor + 1).min(self.bank.len() - 1);
        Ok(self.cursor)
    }

    /// Moves the cursor back; stays put on the first question.
    pub fn previous(&mut self) -> Result<usize, SessionError> {
        self.ensure_active("previous")?;
        self.cursor = self.cursor.saturating_sub(1);
        Ok(self.cursor)
    }

    /// Feeds one elapsed second to the clock, auto-submitting on expiry.
    pub fn tick(&mut self) -> SessionTick {
        if !matches!(self.phase, Phase::Active) {
            return SessionTick::Inactive;
        }

        match self.clock.tick() {
            ClockTick::Running { remaining_seconds } => SessionTick::Running { remaining_seconds },
            ClockTick::Expired => {
                SessionTick::Expired(Box::new(self.finalize(SubmitReason::Timeout)))
            }
            ClockTick::Inert => SessionTick::Inactive,
        }
    }

    pub fn submit(&mut self, reason: SubmitReason) -> Result<SessionResult, SessionError> {
        if let Phase::Finalized(result) = &self.phase {
            debug!(
                requested = reason.label(),
                original = result.reason.label(),
                "session already finalized, returning stored result"
            );
            return Ok(result.as_ref().clone());
        }
        if !matches!(self.phase, Phase::Active) {
            return Err(self.invalid_state("submit"));
        }

        Ok(self.finalize(reason))
    }

    /// Registers a callback for when the time limit runs out.
    pub fn on_expire<F>(&mut self, callback: F) -> Result<(), SessionError>
    where
        F: FnOnce() + Send + 'static,
    {
        match self.phase {
            Phase::NotStarted | Phase::Active => {
                self.clock.on_expire(callback);
                Ok(())
            }
            Phase::Finalized(_) => Err(SessionError::SessionClosed {
                operation: "on_expire",
            }),
            Phase::Submitting => Err(self.invalid_state("on_expire")),
        }
    }

    pub fn state(&self) -> SessionState {
        self.phase.state()
    }

    pub fn step(&self) -> AssessmentStep {
        self.bank.step()
    }

    pub fn bank(&self) -> &Arc<QuestionBank> {
        &self.bank
    }

    pub fn ledger(&self) -> &AnswerLedger {
        &self.ledger
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.clock.remaining_seconds()
    }

    pub fn current_question(&self) -> PublicQuestion {
        self.current().to_public()
    }

    pub fn result(&self) -> Option<&SessionResult> {
        match &self.phase {
            Phase::Finalized(result) => Some(result),
            _ => None,
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let question = self.current();
        let total_questions = self.bank.len();
        let answered = self.ledger.answered_count();
        let remaining_seconds = self.clock.remaining_seconds();

        let navigator = self
            .bank
            .questions()
            .iter()
            .enumerate()
            .map(|(index, entry)| NavigatorEntry {
                number: index + 1,
                question_id: entry.id,
                current: index == self.cursor,
                answered: self.ledger.answer_for(entry.id).is_some(),
                flagged: self.ledger.is_flagged(entry.id),
            })
            .collect();

        SessionSnapshot {
            step: self.bank.step(),
            level_pair: self.bank.level_pair(),
            state: self.state(),
            question_number: self.cursor + 1,
            total_questions,
            question: question.to_public(),
            selected_option: self.ledger.answer_for(question.id),
            flagged: self.ledger.is_flagged(question.id),
            answered,
            flagged_count: self.ledger.flagged_ids().len(),
            unanswered: total_questions - answered.min(total_questions),
            remaining_seconds,
            countdown: format_clock(remaining_seconds),
            time_running_out: self.clock.is_running()
                && remaining_seconds < self.low_time_warning_seconds,
            progress_percent: round_percentage(self.cursor + 1, total_questions),
            navigator,
        }
    }

    /// Counts shown in the confirmation prompt before a manual submit.
    pub fn submission_preview(&self) -> SubmissionPreview {
        let total = self.bank.len();
        let answered = self
            .bank
            .questions()
            .iter()
            .filter(|question| self.ledger.answer_for(question.id).is_some())
            .count();
        let unanswered = total - answered;
        let warning = (unanswered > 0).then(|| {
            format!(
                "You have {unanswered} unanswered questions. These will be marked as incorrect."
            )
        });

        SubmissionPreview {
            total,
            answered,
            unanswered,
            flagged: self.ledger.flagged_ids().len(),
            warning,
        }
    }

    fn finalize(&mut self, reason: SubmitReason) -> SessionResult {
        self.phase = Phase::Submitting;
        self.clock.stop();

        let score = ScoringEngine::score(&self.bank, &self.ledger, self.clock.elapsed_seconds());
        let outcome = self.policy.decide(self.bank.step(), score.percentage);
        let result = SessionResult {
            step: self.bank.step(),
            score,
            outcome,
            reason,
            submitted_at: Utc::now(),
        };

        info!(
            step = %result.step,
            reason = reason.label(),
            percentage = result.score.percentage,
            correct = result.score.correct,
            total = result.score.total_questions,
            outcome = %result.outcome.summary(),
            "assessment session finalized"
        );
        self.phase = Phase::Finalized(Box::new(result.clone()));

        if let Some(recorder) = &self.recorder {
            if let Err(err) = recorder.record_result(&result) {
                warn!(step = %result.step, error = %err, "failed to hand off assessment result");
            }
        }

        result
    }

    fn current(&self) -> &Question {
        // The cursor only ever holds indices validated against the bank.
        &self.bank.questions()[self.cursor]
    }

    fn position_of(&self, question_id: QuestionId) -> Result<usize, SessionError> {
        self.bank
            .position_of(question_id)
            .ok_or(SessionError::UnknownQuestion(question_id))
    }

    fn ensure_active(&self, operation: &'static str) -> Result<(), SessionError> {
        match self.phase {
            Phase::Active => Ok(()),
            Phase::Finalized(_) => Err(SessionError::SessionClosed { operation }),
            Phase::NotStarted | Phase::Submitting => Err(self.invalid_state(operation)),
        }
    }

    fn invalid_state(&self, operation: &'static str) -> SessionError {
        SessionError::InvalidState {
            operation,
            state: self.state(),
        }
    }
}

impl fmt::Debug for TestSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestSession")
            .field("step", &self.bank.step())
            .field("state", &self.state())
            .field("cursor", &self.cursor)
            .field("answered", &self.ledger.answered_count())
            .field("clock", &self.clock)
            .field("has_recorder", &self.recorder.is_some())
            .finish()
    }
}

/// Read model for rendering the exam screen.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub step: AssessmentStep,
    pub level_pair: &'static str,
    pub state: SessionState,
    pub question_number: usize,
    pub total_questions: usize,
    pub question: PublicQuestion,
    pub selected_option: Option<usize>,
    pub flagged: bool,
    pub answered: usize,
    pub flagged_count: usize,
    pub unanswered: usize,
    pub remaining_seconds: u32,
    pub countdown: String,
    pub time_running_out: bool,
    pub progress_percent: u8,
    pub navigator: Vec<NavigatorEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigatorEntry {
    pub number: usize,
    pub question_id: QuestionId,
    pub current: bool,
    pub answered: bool,
    pub flagged: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionPreview {
    pub total: usize,
    pub answered: usize,
    pub unanswered: usize,
    pub flagged: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Programming errors raised by session operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("index {index} is outside the question range 0..{len}")]
    OutOfRange { index: usize, len: usize },
    #[error("cannot {operation} while the session is {state}")]
    InvalidState {
        operation: &'static str,
        state: SessionState,
    },
    #[error("cannot {operation}: the session is finalized")]
    SessionClosed { operation: &'static str },
    #[error("question {0} is not part of this bank")]
    UnknownQuestion(QuestionId),
}
