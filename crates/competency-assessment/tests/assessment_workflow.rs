use std::sync::{Arc, Mutex};
use std::time::Duration;

use competency_assessment::workflows::assessment::{
    spawn_ticker, AssessmentService, AssessmentStep, BuiltinCatalog, CertificationResult,
    LadderProgress, LevelTag, RecorderError, ResultRecorder, ResultReport, SessionResult,
    SessionSettings, SessionState, SubmitReason, TestSession,
};

#[derive(Default)]
struct CollectingRecorder {
    results: Mutex<Vec<SessionResult>>,
}

impl CollectingRecorder {
    fn results(&self) -> Vec<SessionResult> {
        self.results.lock().expect("recorder mutex").clone()
    }
}

impl ResultRecorder for CollectingRecorder {
    fn record_result(&self, result: &SessionResult) -> Result<(), RecorderError> {
        self.results.lock().expect("recorder mutex").push(result.clone());
        Ok(())
    }
}

fn service() -> (
    AssessmentService<BuiltinCatalog, CollectingRecorder>,
    Arc<CollectingRecorder>,
) {
    let catalog = Arc::new(BuiltinCatalog::standard().expect("catalog validates"));
    let recorder = Arc::new(CollectingRecorder::default());
    (
        AssessmentService::new(catalog, Arc::clone(&recorder)),
        recorder,
    )
}

/// Answers the first `correct` questions correctly and the rest wrongly.
fn sit(mut session: TestSession, correct: usize) -> SessionResult {
    session.start().expect("session starts");
    let bank = Arc::clone(session.bank());
    for (index, question) in bank.questions().iter().enumerate() {
        let key = question.correct_option();
        let choice = if index < correct {
            key
        } else {
            (key + 1) % question.options.len()
        };
        session.answer(question.id, choice).expect("answer accepted");
    }
    session.submit(SubmitReason::Manual).expect("submit succeeds")
}

#[test]
fn candidate_climbs_the_ladder() {
    let (service, recorder) = service();
    let mut progress = LadderProgress::default();

    let step_one = sit(
        service
            .open_session_for(&progress, AssessmentStep::One)
            .expect("step 1 open"),
        9,
    );
    assert_eq!(step_one.score.percentage, 90);
    assert_eq!(
        step_one.outcome.result,
        CertificationResult::Certified(LevelTag::A2)
    );
    progress.apply(&step_one.outcome);
    assert_eq!(progress.next_step(), Some(AssessmentStep::Two));

    let step_two = sit(
        service
            .open_session_for(&progress, AssessmentStep::Two)
            .expect("step 2 open"),
        8,
    );
    assert_eq!(step_two.outcome.advance_to, Some(AssessmentStep::Three));
    progress.apply(&step_two.outcome);

    let step_three = sit(
        service
            .open_session_for(&progress, AssessmentStep::Three)
            .expect("step 3 open"),
        1,
    );
    assert_eq!(step_three.score.percentage, 10);
    assert_eq!(
        step_three.outcome.result,
        CertificationResult::Retained(LevelTag::B2)
    );
    progress.apply(&step_three.outcome);

    assert_eq!(progress.current_level(), Some(LevelTag::B2));
    assert!(progress.is_complete());
    assert_eq!(recorder.results().len(), 3);
}

#[test]
fn a_low_step_one_score_ends_the_ladder() {
    let (service, _) = service();
    let result = sit(
        service
            .open_session(AssessmentStep::One)
            .expect("step 1 open"),
        2,
    );

    assert_eq!(result.outcome.result, CertificationResult::Failed);
    assert!(!result.outcome.can_retake);

    let progress = LadderProgress::from_outcomes([&result.outcome]);
    assert!(!progress.can_start(AssessmentStep::Two));
    assert!(service
        .open_session_for(&progress, AssessmentStep::One)
        .is_err());

    let report = ResultReport::from_result(&result, service.policy());
    assert_eq!(report.badge, "Not Certified");
    assert!(!report.certificate_eligible);
}

#[test]
fn results_serialize_for_the_results_store() {
    let (service, _) = service();
    let result = sit(
        service
            .open_session(AssessmentStep::Two)
            .expect("step 2 open"),
        6,
    );

    let json = serde_json::to_value(&result).expect("result serializes");
    assert_eq!(json["step"], 2);
    assert_eq!(json["reason"], "manual");
    assert_eq!(json["score"]["percentage"], 60);
    assert_eq!(json["outcome"]["result"]["kind"], "certified");
    assert_eq!(json["outcome"]["result"]["level"], "B2");

    let restored: SessionResult = serde_json::from_value(json).expect("result deserializes");
    assert_eq!(restored, result);
}

#[tokio::test(start_paused = true)]
async fn background_ticker_submits_when_time_runs_out() {
    let (service, recorder) = service();
    let service = service.with_settings(SessionSettings {
        time_limit_override: Some(5),
        ..SessionSettings::default()
    });

    let mut session = service
        .open_session(AssessmentStep::Three)
        .expect("step 3 open");
    session.start().expect("session starts");
    let bank = Arc::clone(session.bank());
    for question in bank.questions().iter().take(5) {
        session
            .answer(question.id, question.correct_option())
            .expect("answer accepted");
    }

    let shared = Arc::new(Mutex::new(session));
    let result = spawn_ticker(Arc::clone(&shared), Duration::from_secs(1))
        .await
        .expect("ticker joins")
        .expect("ticker finishes");

    assert_eq!(result.reason, SubmitReason::Timeout);
    assert_eq!(result.score.percentage, 50);
    assert_eq!(
        result.outcome.result,
        CertificationResult::Certified(LevelTag::C2)
    );
    assert_eq!(shared.lock().expect("lock").state(), SessionState::Finalized);
    assert_eq!(recorder.results(), vec![result]);
}
