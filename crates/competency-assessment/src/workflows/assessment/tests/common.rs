use std::sync::{Arc, Mutex};

use crate::workflows::assessment::bank::QuestionBank;
use crate::workflows::assessment::domain::{AssessmentStep, Question, QuestionId};
use crate::workflows::assessment::recorder::{RecorderError, ResultRecorder, SessionResult};
use crate::workflows::assessment::session::TestSession;

const COMPETENCIES: [&str; 3] = ["Digital Safety", "Digital Communication", "Problem Solving"];

/// Ten questions, ids 1..=10, whose key is `id % 4`.
pub(super) fn bank(step: AssessmentStep, time_limit_seconds: u32) -> Arc<QuestionBank> {
    let (lower, upper) = step.levels();
    let questions = (1..=10u32)
        .map(|id| {
            Question::new(
                QuestionId(id),
                COMPETENCIES[(id as usize) % COMPETENCIES.len()],
                if id % 2 == 0 { upper } else { lower },
                format!("Question {id}"),
                vec![
                    "Option A".to_string(),
                    "Option B".to_string(),
                    "Option C".to_string(),
                    "Option D".to_string(),
                ],
                (id % 4) as usize,
            )
        })
        .collect();

    Arc::new(QuestionBank::new(step, questions, time_limit_seconds, 44).expect("valid bank"))
}

pub(super) fn correct_option(id: u32) -> usize {
    (id % 4) as usize
}

pub(super) fn wrong_option(id: u32) -> usize {
    (correct_option(id) + 1) % 4
}

pub(super) fn started_session(step: AssessmentStep, time_limit_seconds: u32) -> TestSession {
    let mut session = TestSession::new(bank(step, time_limit_seconds));
    session.start().expect("session starts");
    session
}

pub(super) fn answer_correctly(session: &mut TestSession, ids: impl IntoIterator<Item = u32>) {
    for id in ids {
        session
            .answer(QuestionId(id), correct_option(id))
            .expect("answer accepted");
    }
}

pub(super) fn answer_incorrectly(session: &mut TestSession, ids: impl IntoIterator<Item = u32>) {
    for id in ids {
        session
            .answer(QuestionId(id), wrong_option(id))
            .expect("answer accepted");
    }
}

#[derive(Default)]
pub(super) struct MemoryRecorder {
    results: Mutex<Vec<SessionResult>>,
}

impl MemoryRecorder {
    pub(super) fn results(&self) -> Vec<SessionResult> {
        self.results.lock().expect("recorder mutex poisoned").clone()
    }
}

impl ResultRecorder for MemoryRecorder {
    fn record_result(&self, result: &SessionResult) -> Result<(), RecorderError> {
        self.results
            .lock()
            .expect("recorder mutex poisoned")
            .push(result.clone());
        Ok(())
    }
}

#[derive(Default)]
pub(super) struct FailingRecorder {
    attempts: Mutex<usize>,
}

impl FailingRecorder {
    pub(super) fn attempts(&self) -> usize {
        *self.attempts.lock().expect("recorder mutex poisoned")
    }
}

impl ResultRecorder for FailingRecorder {
    fn record_result(&self, _result: &SessionResult) -> Result<(), RecorderError> {
        *self.attempts.lock().expect("recorder mutex poisoned") += 1;
        Err(RecorderError::Unavailable("results API offline".to_string()))
    }
}
