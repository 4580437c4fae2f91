use super::domain::{AssessmentStep, LevelTag, Question, QuestionId};
use super::session::SessionError;
use std::collections::HashSet;

/// Ordered, validated set of questions for one assessment step.
///
/// Banks are shared read-only between sessions; nothing can reorder options
/// or change an answer key once a bank is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionBank {
    step: AssessmentStep,
    questions: Vec<Question>,
    time_limit_seconds: u32,
    pass_threshold: u8,
}

impl QuestionBank {
    pub fn new(
        step: AssessmentStep,
        questions: Vec<Question>,
        time_limit_seconds: u32,
        pass_threshold: u8,
    ) -> Result<Self, QuestionBankError> {
        if questions.is_empty() {
            return Err(QuestionBankError::Empty(step));
        }
        if time_limit_seconds == 0 {
            return Err(QuestionBankError::ZeroTimeLimit);
        }
        if pass_threshold > 100 {
            return Err(QuestionBankError::ThresholdOutOfRange(pass_threshold));
        }

        let mut seen = HashSet::with_capacity(questions.len());
        for question in &questions {
            if !seen.insert(question.id) {
                return Err(QuestionBankError::DuplicateQuestion(question.id));
            }
            if question.options.is_empty() {
                return Err(QuestionBankError::NoOptions(question.id));
            }
            if question.correct_option() >= question.options.len() {
                return Err(QuestionBankError::CorrectOptionOutOfRange {
                    id: question.id,
                    index: question.correct_option(),
                    options: question.options.len(),
                });
            }
            if !step.covers(question.level) {
                return Err(QuestionBankError::LevelOutsideStep {
                    id: question.id,
                    level: question.level,
                    step,
                });
            }
        }

        Ok(Self {
            step,
            questions,
            time_limit_seconds,
            pass_threshold,
        })
    }

    pub fn step(&self) -> AssessmentStep {
        self.step
    }

    pub fn level_pair(&self) -> &'static str {
        self.step.level_pair()
    }

    pub fn get(&self, index: usize) -> Result<&Question, SessionError> {
        self.questions.get(index).ok_or(SessionError::OutOfRange {
            index,
            len: self.questions.len(),
        })
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn time_limit_seconds(&self) -> u32 {
        self.time_limit_seconds
    }

    /// Displayed pass mark; certification itself follows the policy table.
    pub fn pass_threshold(&self) -> u8 {
        self.pass_threshold
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn position_of(&self, id: QuestionId) -> Option<usize> {
        self.questions.iter().position(|question| question.id == id)
    }

    /// Copy of this bank with a different time limit.
    pub fn with_time_limit(&self, time_limit_seconds: u32) -> Result<Self, QuestionBankError> {
        Self::new(
            self.step,
            self.questions.clone(),
            time_limit_seconds,
            self.pass_threshold,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuestionBankError {
    #[error("question bank for {0} has no questions")]
    Empty(AssessmentStep),
    #[error("question {0} appears more than once")]
    DuplicateQuestion(QuestionId),
    #[error("question {0} has no options")]
    NoOptions(QuestionId),
    #[error("question {id} marks option {index} correct but only has {options} options")]
    CorrectOptionOutOfRange {
        id: QuestionId,
        index: usize,
        options: usize,
    },
    #[error("question {id} is tagged {level}, which {step} does not assess")]
    LevelOutsideStep {
        id: QuestionId,
        level: LevelTag,
        step: AssessmentStep,
    },
    #[error("time limit must be at least one second")]
    ZeroTimeLimit,
    #[error("pass threshold {0}% exceeds 100%")]
    ThresholdOutOfRange(u8),
}
