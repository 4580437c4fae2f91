use super::certification::CertificationOutcome;
use super::domain::{AssessmentStep, LevelTag};
use serde::Serialize;
use std::collections::BTreeSet;

/// A candidate's position on the three-step ladder, rebuilt from past outcomes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LadderProgress {
    current_level: Option<LevelTag>,
    highest_unlocked: AssessmentStep,
    attempted: BTreeSet<AssessmentStep>,
}

impl Default for LadderProgress {
    fn default() -> Self {
        Self {
            current_level: None,
            highest_unlocked: AssessmentStep::One,
            attempted: BTreeSet::new(),
        }
    }
}

impl LadderProgress {
    pub fn from_outcomes<'a, I>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = &'a CertificationOutcome>,
    {
        let mut progress = Self::default();
        for outcome in outcomes {
            progress.apply(outcome);
        }
        progress
    }

    pub fn apply(&mut self, outcome: &CertificationOutcome) {
        self.attempted.insert(outcome.step);
        if let Some(level) = outcome.level() {
            self.current_level = self.current_level.max(Some(level));
        }
        if let Some(next) = outcome.advance_to {
            self.highest_unlocked = self.highest_unlocked.max(next);
        }
    }

    pub fn current_level(&self) -> Option<LevelTag> {
        self.current_level
    }

    pub fn attempted(&self, step: AssessmentStep) -> bool {
        self.attempted.contains(&step)
    }

    /// Steps are unlocked in order and each may be attempted once.
    pub fn can_start(&self, step: AssessmentStep) -> bool {
        step <= self.highest_unlocked && !self.attempted(step)
    }

    pub fn next_step(&self) -> Option<AssessmentStep> {
        Some(self.highest_unlocked).filter(|step| self.can_start(*step))
    }

    pub fn is_complete(&self) -> bool {
        self.attempted(AssessmentStep::Three)
    }
}
