use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Competency level awarded by the certification ladder, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LevelTag {
    A1,
    A2,
    B1,
    B2,
    C1,
    C2,
}

impl LevelTag {
    pub const fn ordered() -> [Self; 6] {
        [Self::A1, Self::A2, Self::B1, Self::B2, Self::C1, Self::C2]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::A1 => "A1",
            Self::A2 => "A2",
            Self::B1 => "B1",
            Self::B2 => "B2",
            Self::C1 => "C1",
            Self::C2 => "C2",
        }
    }

    /// Step whose question bank covers this level.
    pub const fn step(self) -> AssessmentStep {
        match self {
            Self::A1 | Self::A2 => AssessmentStep::One,
            Self::B1 | Self::B2 => AssessmentStep::Two,
            Self::C1 | Self::C2 => AssessmentStep::Three,
        }
    }
}

impl fmt::Display for LevelTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown competency level '{0}' (expected A1, A2, B1, B2, C1 or C2)")]
pub struct UnknownLevel(pub String);

impl FromStr for LevelTag {
    type Err = UnknownLevel;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "A1" => Ok(Self::A1),
            "A2" => Ok(Self::A2),
            "B1" => Ok(Self::B1),
            "B2" => Ok(Self::B2),
            "C1" => Ok(Self::C1),
            "C2" => Ok(Self::C2),
            _ => Err(UnknownLevel(value.to_string())),
        }
    }
}

/// One of the three sequential assessment stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum AssessmentStep {
    One,
    Two,
    Three,
}

impl AssessmentStep {
    pub const fn ordered() -> [Self; 3] {
        [Self::One, Self::Two, Self::Three]
    }

    pub const fn number(self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Three => 3,
        }
    }

    pub const fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(Self::One),
            2 => Some(Self::Two),
            3 => Some(Self::Three),
            _ => None,
        }
    }

    /// The two adjacent levels a step's bank covers, lower first.
    pub const fn levels(self) -> (LevelTag, LevelTag) {
        match self {
            Self::One => (LevelTag::A1, LevelTag::A2),
            Self::Two => (LevelTag::B1, LevelTag::B2),
            Self::Three => (LevelTag::C1, LevelTag::C2),
        }
    }

    pub const fn level_pair(self) -> &'static str {
        match self {
            Self::One => "A1 & A2",
            Self::Two => "B1 & B2",
            Self::Three => "C1 & C2",
        }
    }

    pub const fn next(self) -> Option<Self> {
        match self {
            Self::One => Some(Self::Two),
            Self::Two => Some(Self::Three),
            Self::Three => None,
        }
    }

    pub const fn previous(self) -> Option<Self> {
        match self {
            Self::One => None,
            Self::Two => Some(Self::One),
            Self::Three => Some(Self::Two),
        }
    }

    pub fn covers(self, level: LevelTag) -> bool {
        level.step() == self
    }

    pub fn label(self) -> String {
        format!("Step {}: {}", self.number(), self.level_pair())
    }
}

impl fmt::Display for AssessmentStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "step {}", self.number())
    }
}

impl From<AssessmentStep> for u8 {
    fn from(step: AssessmentStep) -> Self {
        step.number()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("assessment step must be 1, 2 or 3 (got {0})")]
pub struct InvalidStep(pub u8);

impl TryFrom<u8> for AssessmentStep {
    type Error = InvalidStep;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_number(value).ok_or(InvalidStep(value))
    }
}

/// Identifier of a question, unique within its bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(pub u32);

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

/// Multiple-choice question including its answer key.
///
/// The key cannot be changed after construction; anything handed to a
/// presentation layer goes through [`PublicQuestion`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub id: QuestionId,
    pub competency: String,
    pub level: LevelTag,
    pub prompt: String,
    pub options: Vec<String>,
    correct_option: usize,
}

impl Question {
    pub fn new(
        id: QuestionId,
        competency: impl Into<String>,
        level: LevelTag,
        prompt: impl Into<String>,
        options: Vec<String>,
        correct_option: usize,
    ) -> Self {
        Self {
            id,
            competency: competency.into(),
            level,
            prompt: prompt.into(),
            options,
            correct_option,
        }
    }

    /// Answer key. Never part of [`PublicQuestion`].
    pub fn correct_option(&self) -> usize {
        self.correct_option
    }

    pub fn is_correct(&self, selected: usize) -> bool {
        self.correct_option == selected
    }

    pub fn to_public(&self) -> PublicQuestion {
        PublicQuestion {
            id: self.id,
            competency: self.competency.clone(),
            level: self.level,
            prompt: self.prompt.clone(),
            options: self.options.clone(),
        }
    }
}

/// Question as shown to a candidate: no answer key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublicQuestion {
    pub id: QuestionId,
    pub competency: String,
    pub level: LevelTag,
    pub prompt: String,
    pub options: Vec<String>,
}

/// What triggered a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitReason {
    Manual,
    Timeout,
}

impl SubmitReason {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Timeout => "timeout",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_cover_adjacent_level_pairs() {
        assert!(AssessmentStep::One.covers(LevelTag::A2));
        assert!(!AssessmentStep::One.covers(LevelTag::B1));
        assert_eq!(AssessmentStep::Three.levels(), (LevelTag::C1, LevelTag::C2));
        assert_eq!(AssessmentStep::Two.label(), "Step 2: B1 & B2");
        assert_eq!(AssessmentStep::Three.next(), None);
    }

    #[test]
    fn level_tags_parse_case_insensitively() {
        assert_eq!(" b2 ".parse::<LevelTag>(), Ok(LevelTag::B2));
        assert!("D1".parse::<LevelTag>().is_err());
        assert!(LevelTag::A2 < LevelTag::B1);
    }

    #[test]
    fn steps_serialize_as_numbers() {
        let json = serde_json::to_string(&AssessmentStep::Two).expect("serialize step");
        assert_eq!(json, "2");
        let parsed: AssessmentStep = serde_json::from_str("3").expect("parse step");
        assert_eq!(parsed, AssessmentStep::Three);
        assert!(serde_json::from_str::<AssessmentStep>("4").is_err());
    }
}
