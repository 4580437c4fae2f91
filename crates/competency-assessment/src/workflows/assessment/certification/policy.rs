use super::super::domain::{AssessmentStep, LevelTag};
use super::config::ScoreBands;
use super::CertificationOutcome;
use serde::{Deserialize, Serialize};

/// Level decision for one step attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "level", rename_all = "snake_case")]
pub enum CertificationResult {
    /// Below the minimum on step 1; nothing is awarded.
    Failed,
    /// A level from this step's pair was awarded.
    Certified(LevelTag),
    /// Below the minimum on a later step; the previous step's top level stands.
    Retained(LevelTag),
}

impl CertificationResult {
    pub fn level(&self) -> Option<LevelTag> {
        match self {
            Self::Failed => None,
            Self::Certified(level) | Self::Retained(level) => Some(*level),
        }
    }

    pub fn summary(&self) -> String {
        match self {
            Self::Failed => "not certified".to_string(),
            Self::Certified(level) => format!("certified at {level}"),
            Self::Retained(level) => format!("remains at {level}"),
        }
    }
}

pub(crate) fn decide_outcome(
    step: AssessmentStep,
    percentage: u8,
    bands: &ScoreBands,
) -> CertificationOutcome {
    let (lower, upper) = step.levels();

    let result = if percentage < bands.lower_level() {
        match step.previous() {
            Some(previous) => CertificationResult::Retained(previous.levels().1),
            None => CertificationResult::Failed,
        }
    } else if percentage < bands.upper_level() {
        CertificationResult::Certified(lower)
    } else {
        CertificationResult::Certified(upper)
    };

    // Step 3 has no further step, so its top band only collapses into C2.
    let advance_to = if percentage >= bands.advancement() {
        step.next()
    } else {
        None
    };

    CertificationOutcome {
        step,
        result,
        advance_to,
        can_retake: false,
    }
}
