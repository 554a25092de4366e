use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

/// How much a viewer enjoyed a title, ordered from most to least positive
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Rating {
    VeryLiked,
    Liked,
    OkayNeutral,
    Disliked,
}

impl Rating {
    /// Every rating in scale order
    pub const ALL: [Rating; 4] = [
        Rating::VeryLiked,
        Rating::Liked,
        Rating::OkayNeutral,
        Rating::Disliked,
    ];

    /// Zero-based position on the scale (0 = very_liked, 3 = disliked)
    pub fn index(self) -> u8 {
        match self {
            Rating::VeryLiked => 0,
            Rating::Liked => 1,
            Rating::OkayNeutral => 2,
            Rating::Disliked => 3,
        }
    }

    /// Wire name of the rating
    pub fn as_str(self) -> &'static str {
        match self {
            Rating::VeryLiked => "very_liked",
            Rating::Liked => "liked",
            Rating::OkayNeutral => "okay_neutral",
            Rating::Disliked => "disliked",
        }
    }
}

impl Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when text is not one of the four rating names
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown rating '{0}', expected one of: very_liked, liked, okay_neutral, disliked")]
pub struct ParseRatingError(pub String);

impl FromStr for Rating {
    type Err = ParseRatingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Rating::ALL
            .into_iter()
            .find(|rating| rating.as_str() == normalized)
            .ok_or_else(|| ParseRatingError(s.to_string()))
    }
}

/// Signed distance between a predicted and an actual rating, computed as
/// `index(predicted) - index(actual)`.
///
/// Its magnitude is the calibration error. Stored evaluation snapshots rely on
/// this exact sign, so never flip the operands.
pub fn level_diff(predicted: Rating, actual: Rating) -> i8 {
    predicted.index() as i8 - actual.index() as i8
}
