use serde::{Deserialize, Serialize};

/// Lower bounds of the certification score bands, each half-open `[lower, next)`.
///
/// Bounds are ordered `lower_level <= upper_level <= advancement <= 100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawScoreBands")]
pub struct ScoreBands {
    lower_level: u8,
    upper_level: u8,
    advancement: u8,
}

impl ScoreBands {
    pub fn new(
        lower_level: u8,
        upper_level: u8,
        advancement: u8,
    ) -> Result<Self, InvalidScoreBands> {
        if lower_level > upper_level || upper_level > advancement || advancement > 100 {
            return Err(InvalidScoreBands {
                lower_level,
                upper_level,
                advancement,
            });
        }
        Ok(Self {
            lower_level,
            upper_level,
            advancement,
        })
    }

    pub const fn standard() -> Self {
        Self {
            lower_level: 25,
            upper_level: 50,
            advancement: 75,
        }
    }

    pub const fn lower_level(&self) -> u8 {
        self.lower_level
    }

    pub const fn upper_level(&self) -> u8 {
        self.upper_level
    }

    pub const fn advancement(&self) -> u8 {
        self.advancement
    }
}

impl Default for ScoreBands {
    fn default() -> Self {
        Self::standard()
    }
}

#[derive(Deserialize)]
struct RawScoreBands {
    lower_level: u8,
    upper_level: u8,
    advancement: u8,
}

impl TryFrom<RawScoreBands> for ScoreBands {
    type Error = InvalidScoreBands;

    fn try_from(raw: RawScoreBands) -> Result<Self, Self::Error> {
        Self::new(raw.lower_level, raw.upper_level, raw.advancement)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error(
    "score bands must satisfy lower <= upper <= advancement <= 100 \
     (got {lower_level}/{upper_level}/{advancement})"
)]
pub struct InvalidScoreBands {
    pub lower_level: u8,
    pub upper_level: u8,
    pub advancement: u8,
}
