mod config;
mod policy;

pub use config::{InvalidScoreBands, ScoreBands};
pub use policy::CertificationResult;

use super::domain::{AssessmentStep, LevelTag};
use policy::decide_outcome;
use serde::{Deserialize, Serialize};

/// Maps a step attempt's percentage onto the certification ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CertificationPolicy {
    bands: ScoreBands,
}

impl CertificationPolicy {
    pub fn new(bands: ScoreBands) -> Self {
        Self { bands }
    }

    pub fn standard() -> Self {
        Self::new(ScoreBands::standard())
    }

    pub fn bands(&self) -> ScoreBands {
        self.bands
    }

    pub fn decide(&self, step: AssessmentStep, percentage: u8) -> CertificationOutcome {
        decide_outcome(step, percentage, &self.bands)
    }
}

/// Certification decision handed to the candidate and the results store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificationOutcome {
    pub step: AssessmentStep,
    pub result: CertificationResult,
    pub advance_to: Option<AssessmentStep>,
    pub can_retake: bool,
}

impl CertificationOutcome {
    pub fn level(&self) -> Option<LevelTag> {
        self.result.level()
    }

    pub fn is_failed(&self) -> bool {
        self.result == CertificationResult::Failed
    }

    pub fn can_advance(&self) -> bool {
        self.advance_to.is_some()
    }

    pub fn certificate_eligible(&self) -> bool {
        !self.is_failed()
    }

    pub fn badge(&self) -> String {
        match self.level() {
            Some(level) => format!("Level {level} Certified"),
            None => "Not Certified".to_string(),
        }
    }

    pub fn summary(&self) -> String {
        match self.advance_to {
            Some(next) => format!(
                "{}: {}, eligible for {}",
                self.step,
                self.result.summary(),
                next
            ),
            None => format!("{}: {}", self.step, self.result.summary()),
        }
    }
}

/// Coarse performance band used for results messaging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Excellent,
    Good,
    Minimum,
    Insufficient,
}

impl ScoreBand {
    pub fn from_percentage(percentage: u8, bands: &ScoreBands) -> Self {
        if percentage >= bands.advancement() {
            Self::Excellent
        } else if percentage >= bands.upper_level() {
            Self::Good
        } else if percentage >= bands.lower_level() {
            Self::Minimum
        } else {
            Self::Insufficient
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Minimum => "Minimum",
            Self::Insufficient => "Insufficient",
        }
    }

    pub fn message(self, outcome: &CertificationOutcome) -> &'static str {
        if outcome.is_failed() {
            return "Unfortunately, you did not meet the minimum requirements.";
        }
        match self {
            Self::Excellent => "Excellent performance! You've qualified for the next step.",
            Self::Good => "Good job! You've earned your certification.",
            Self::Minimum | Self::Insufficient => {
                "You've achieved the minimum requirements for certification."
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decide(step: AssessmentStep, score: u8) -> CertificationOutcome {
        CertificationPolicy::standard().decide(step, score)
    }

    #[test]
    fn step_one_boundaries() {
        let failed = decide(AssessmentStep::One, 24);
        assert_eq!(failed.result, CertificationResult::Failed);
        assert!(!failed.can_advance());
        assert!(!failed.can_retake);
        assert!(!failed.certificate_eligible());

        for score in [25, 49] {
            let outcome = decide(AssessmentStep::One, score);
            assert_eq!(outcome.result, CertificationResult::Certified(LevelTag::A1));
            assert!(!outcome.can_advance());
        }
        for score in [50, 74] {
            let outcome = decide(AssessmentStep::One, score);
            assert_eq!(outcome.result, CertificationResult::Certified(LevelTag::A2));
            assert!(!outcome.can_advance());
        }

        let advance = decide(AssessmentStep::One, 75);
        assert_eq!(advance.result, CertificationResult::Certified(LevelTag::A2));
        assert_eq!(advance.advance_to, Some(AssessmentStep::Two));
    }

    #[test]
    fn step_two_keeps_a2_below_minimum() {
        assert_eq!(
            decide(AssessmentStep::Two, 10).result,
            CertificationResult::Retained(LevelTag::A2)
        );
        assert_eq!(
            decide(AssessmentStep::Two, 30).result,
            CertificationResult::Certified(LevelTag::B1)
        );
        let b2 = decide(AssessmentStep::Two, 70);
        assert_eq!(b2.result, CertificationResult::Certified(LevelTag::B2));
        assert!(!b2.can_advance());
        assert_eq!(
            decide(AssessmentStep::Two, 90).advance_to,
            Some(AssessmentStep::Three)
        );
    }

    #[test]
    fn step_three_collapses_upper_bands_into_c2() {
        assert_eq!(
            decide(AssessmentStep::Three, 24).result,
            CertificationResult::Retained(LevelTag::B2)
        );
        assert_eq!(
            decide(AssessmentStep::Three, 25).result,
            CertificationResult::Certified(LevelTag::C1)
        );
        assert_eq!(
            decide(AssessmentStep::Three, 49).result,
            CertificationResult::Certified(LevelTag::C1)
        );
        for score in [50, 74, 75, 100] {
            let outcome = decide(AssessmentStep::Three, score);
            assert_eq!(outcome.result, CertificationResult::Certified(LevelTag::C2));
            assert!(!outcome.can_advance());
        }
    }

    #[test]
    fn no_band_allows_a_retake() {
        for step in AssessmentStep::ordered() {
            for score in 0..=100 {
                assert!(!decide(step, score).can_retake);
            }
        }
    }

    #[test]
    fn badges_and_messages_follow_the_outcome() {
        let failed = decide(AssessmentStep::One, 10);
        assert_eq!(failed.badge(), "Not Certified");
        let band = ScoreBand::from_percentage(10, &ScoreBands::standard());
        assert_eq!(band, ScoreBand::Insufficient);
        assert!(band.message(&failed).contains("did not meet"));

        let retained = decide(AssessmentStep::Two, 10);
        assert_eq!(retained.badge(), "Level A2 Certified");
        assert!(retained.certificate_eligible());

        let excellent = decide(AssessmentStep::Two, 80);
        assert_eq!(
            ScoreBand::from_percentage(80, &ScoreBands::standard()).message(&excellent),
            "Excellent performance! You've qualified for the next step."
        );
        assert_eq!(
            excellent.summary(),
            "step 2: certified at B2, eligible for step 3"
        );
    }

    #[test]
    fn custom_bands_shift_the_cut_offs() {
        let policy = CertificationPolicy::new(ScoreBands::new(30, 60, 90).expect("ordered bands"));

        let lower = policy.decide(AssessmentStep::One, 59);
        assert_eq!(lower.result, CertificationResult::Certified(LevelTag::A1));
        assert_eq!(lower.advance_to, None);

        let upper = policy.decide(AssessmentStep::One, 89);
        assert_eq!(upper.result, CertificationResult::Certified(LevelTag::A2));
        assert!(!upper.can_advance());

        assert!(policy.decide(AssessmentStep::One, 90).can_advance());
    }
}
