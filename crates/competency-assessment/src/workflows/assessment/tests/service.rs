use std::sync::Arc;

use super::common::*;
use crate::workflows::assessment::content::{BuiltinCatalog, ContentError};
use crate::workflows::assessment::domain::{AssessmentStep, LevelTag, SubmitReason};
use crate::workflows::assessment::progress::LadderProgress;
use crate::workflows::assessment::service::{
    AssessmentService, AssessmentServiceError, SessionSettings,
};
use crate::workflows::assessment::session::SessionState;
use crate::workflows::assessment::CertificationResult;

fn build_service() -> (AssessmentService<BuiltinCatalog, MemoryRecorder>, Arc<MemoryRecorder>) {
    let catalog = Arc::new(BuiltinCatalog::standard().expect("catalog validates"));
    let recorder = Arc::new(MemoryRecorder::default());
    let service = AssessmentService::new(catalog, Arc::clone(&recorder));
    (service, recorder)
}

#[test]
fn sessions_hand_results_to_the_recorder_once() {
    let (service, recorder) = build_service();
    let mut session = service
        .open_session(AssessmentStep::Two)
        .expect("session opens");
    assert_eq!(session.state(), SessionState::NotStarted);
    session.start().expect("session starts");

    // Demo bank keys for questions 1..=10.
    let keys = [1, 2, 3, 1, 3, 1, 2, 0, 2, 1];
    for (index, key) in keys.iter().enumerate().take(7) {
        session.go_to(index).expect("navigate");
        session.answer_current(*key).expect("answer");
    }
    session.go_to(7).expect("navigate");
    session.answer_current(3).expect("wrong answer");
    session.go_to(8).expect("navigate");
    session.answer_current(0).expect("wrong answer");

    let result = session.submit(SubmitReason::Manual).expect("submit");
    session.submit(SubmitReason::Timeout).expect("duplicate submit");

    assert_eq!(result.score.percentage, 70);
    assert_eq!(
        result.outcome.result,
        CertificationResult::Certified(LevelTag::B2)
    );
    assert_eq!(recorder.results(), vec![result]);
}

#[test]
fn time_limit_override_applies_to_opened_sessions() {
    let (service, recorder) = build_service();
    let service = service.with_settings(SessionSettings {
        time_limit_override: Some(3),
        low_time_warning_seconds: 2,
    });

    let mut session = service
        .open_session(AssessmentStep::One)
        .expect("session opens");
    assert_eq!(session.remaining_seconds(), 3);
    session.start().expect("session starts");
    assert!(!session.snapshot().time_running_out);
    session.tick();
    session.tick();
    assert!(session.snapshot().time_running_out);
    session.tick();

    let recorded = recorder.results();
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].reason, SubmitReason::Timeout);
    assert_eq!(recorded[0].outcome.result, CertificationResult::Failed);
}

#[test]
fn invalid_override_surfaces_as_content_error() {
    let (service, _) = build_service();
    let service = service.with_settings(SessionSettings {
        time_limit_override: Some(0),
        ..SessionSettings::default()
    });

    assert!(matches!(
        service.open_session(AssessmentStep::One),
        Err(AssessmentServiceError::Content(ContentError::InvalidBank(_)))
    ));
}

#[test]
fn ladder_gates_which_steps_can_be_opened() {
    let (service, _) = build_service();
    let progress = LadderProgress::default();

    assert!(service
        .open_session_for(&progress, AssessmentStep::One)
        .is_ok());
    assert!(matches!(
        service.open_session_for(&progress, AssessmentStep::Two),
        Err(AssessmentServiceError::StepLocked {
            step: AssessmentStep::Two,
            ..
        })
    ));

    let passed = service.policy().decide(AssessmentStep::One, 80);
    let progress = LadderProgress::from_outcomes([&passed]);
    assert!(service
        .open_session_for(&progress, AssessmentStep::Two)
        .is_ok());

    let err = service
        .open_session_for(&progress, AssessmentStep::One)
        .unwrap_err();
    assert!(err.to_string().contains("already attempted"));
}
