use super::recorder::SessionResult;
use super::session::{SessionTick, TestSession};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Session shared between the ticker task and whoever handles user input.
pub type SharedSession = Arc<Mutex<TestSession>>;

/// Spawns a task that ticks `session` once per `period` until it is finalized,
/// either by running out of time or by a submit from another task.
pub fn spawn_ticker(
    session: SharedSession,
    period: Duration,
) -> JoinHandle<Result<SessionResult, TickerError>> {
    let period = period.max(Duration::from_millis(1));

    tokio::spawn(async move {
        let mut interval = tokio::time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            interval.tick().await;
            if let Some(result) = tick_once(&session)? {
                return Ok(result);
            }
        }
    })
}

fn tick_once(session: &Mutex<TestSession>) -> Result<Option<SessionResult>, TickerError> {
    let mut guard = session.lock().map_err(|_| TickerError::Poisoned)?;
    match guard.tick() {
        SessionTick::Running { .. } => Ok(None),
        SessionTick::Expired(result) => Ok(Some(*result)),
        // Not started yet, or already submitted by someone else.
        SessionTick::Inactive => Ok(guard.result().cloned()),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TickerError {
    #[error("session lock poisoned by a panicking task")]
    Poisoned,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::assessment::bank::QuestionBank;
    use crate::workflows::assessment::domain::{
        AssessmentStep, LevelTag, Question, QuestionId, SubmitReason,
    };

    fn shared_session(time_limit: u32) -> SharedSession {
        let questions = (1..=4)
            .map(|id| {
                Question::new(
                    QuestionId(id),
                    "Digital Safety",
                    LevelTag::A1,
                    "Prompt",
                    vec!["a".into(), "b".into(), "c".into(), "d".into()],
                    0,
                )
            })
            .collect();
        let bank = QuestionBank::new(AssessmentStep::One, questions, time_limit, 44)
            .expect("valid bank");
        let mut session = TestSession::new(Arc::new(bank));
        session.start().expect("session starts");
        Arc::new(Mutex::new(session))
    }

    #[tokio::test(start_paused = true)]
    async fn auto_submits_when_time_runs_out() {
        let session = shared_session(3);
        session
            .lock()
            .expect("lock")
            .answer(QuestionId(1), 0)
            .expect("answer");

        let result = spawn_ticker(Arc::clone(&session), Duration::from_secs(1))
            .await
            .expect("ticker task joins")
            .expect("ticker finishes");

        assert_eq!(result.reason, SubmitReason::Timeout);
        assert_eq!(result.score.elapsed_seconds, 3);
        assert_eq!(result.score.percentage, 25);
        assert_eq!(session.lock().expect("lock").remaining_seconds(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn stops_after_a_manual_submit() {
        let session = shared_session(600);
        let handle = spawn_ticker(Arc::clone(&session), Duration::from_secs(1));

        tokio::time::sleep(Duration::from_millis(2_500)).await;
        let manual = session
            .lock()
            .expect("lock")
            .submit(SubmitReason::Manual)
            .expect("manual submit");

        let from_ticker = handle
            .await
            .expect("ticker task joins")
            .expect("ticker finishes");

        assert_eq!(from_ticker, manual);
        assert_eq!(manual.score.elapsed_seconds, 2);
        assert_eq!(session.lock().expect("lock").remaining_seconds(), 598);
    }
}
