//! Timed multiple-choice assessments and the three-step certification ladder.

pub mod bank;
pub mod certification;
pub mod clock;
pub mod content;
pub mod domain;
pub mod ledger;
pub mod progress;
pub mod recorder;
pub mod report;
pub mod scoring;
pub mod service;
pub mod session;
pub mod ticker;

#[cfg(test)]
mod tests;

pub use bank::{QuestionBank, QuestionBankError};
pub use certification::{
    CertificationOutcome, CertificationPolicy, CertificationResult, InvalidScoreBands, ScoreBand,
    ScoreBands,
};
pub use clock::{format_clock, ClockError, ClockState, ClockTick, TestClock};
pub use content::{
    BuiltinCatalog, ContentError, CsvQuestionBankImporter, CsvQuestionBankProvider,
    QuestionBankProvider,
};
pub use domain::{AssessmentStep, LevelTag, PublicQuestion, Question, QuestionId, SubmitReason};
pub use ledger::AnswerLedger;
pub use progress::LadderProgress;
pub use recorder::{RecorderError, ResultRecorder, SessionResult};
pub use report::{CompetencyRow, ResultReport};
pub use scoring::{CompetencyScore, ScoreResult, ScoringEngine};
pub use service::{AssessmentService, AssessmentServiceError, SessionSettings};
pub use session::{
    NavigatorEntry, SessionError, SessionSnapshot, SessionState, SessionTick, SubmissionPreview,
    TestSession,
};
pub use ticker::{spawn_ticker, SharedSession, TickerError};
