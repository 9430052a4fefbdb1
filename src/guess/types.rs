//! Guess-the-emperor data structures.
//!
//! The hidden answer is a random emperor; the player sees a few of its
//! scores up front and narrows in by naming emperors, receiving a
//! higher/lower (or earlier/later) verdict for every compared field.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::constants::{
    EASY_GUESSES, HARD_GUESSES, HARD_HINTS, HELL_GUESSES, HELL_HINTS, MEDIUM_GUESSES, MEDIUM_HINTS,
};
use crate::emperor::{EmperorRecord, ScoreField};

/// Difficulty tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Hell,
}

/// How many valid score fields a tier reveals before the first guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HintPolicy {
    All,
    Sample(usize),
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Hell,
    ];

    /// Accepts tier names and the legacy guess-count aliases 15/10/5/3.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "easy" | "15" => Some(Self::Easy),
            "medium" | "10" => Some(Self::Medium),
            "hard" | "5" => Some(Self::Hard),
            "hell" | "3" => Some(Self::Hell),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
            Self::Hell => "hell",
        }
    }

    pub fn total_guesses(&self) -> i32 {
        match self {
            Self::Easy => EASY_GUESSES,
            Self::Medium => MEDIUM_GUESSES,
            Self::Hard => HARD_GUESSES,
            Self::Hell => HELL_GUESSES,
        }
    }

    pub fn hint_policy(&self) -> HintPolicy {
        match self {
            Self::Easy => HintPolicy::All,
            Self::Medium => HintPolicy::Sample(MEDIUM_HINTS),
            Self::Hard => HintPolicy::Sample(HARD_HINTS),
            Self::Hell => HintPolicy::Sample(HELL_HINTS),
        }
    }
}

/// Outcome of comparing one field of a guess against the answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Correct,
    /// Guessed value above the answer (or a better rank).
    High,
    /// Guessed value below the answer (or a worse rank).
    Low,
    /// Guessed era precedes the answer's.
    Early,
    /// Guessed era follows the answer's.
    Late,
}

impl Verdict {
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Correct => "√",
            Self::High | Self::Early => "↑",
            Self::Low | Self::Late => "↓",
        }
    }
}

/// A field that takes part in guess comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareField {
    Rank,
    Era,
    Score(ScoreField),
}

impl CompareField {
    /// Rank, era, then all sixteen scores in table order.
    pub fn all() -> impl Iterator<Item = CompareField> {
        [CompareField::Rank, CompareField::Era]
            .into_iter()
            .chain(ScoreField::ALL.into_iter().map(CompareField::Score))
    }

    pub fn key(&self) -> &'static str {
        match self {
            Self::Rank => "overall_rank",
            Self::Era => "era",
            Self::Score(field) => field.key(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Rank => "排名",
            Self::Era => "时代",
            Self::Score(field) => field.label(),
        }
    }

    pub fn value_of(&self, record: &EmperorRecord) -> FieldValue {
        match self {
            Self::Rank => FieldValue::Rank(record.overall_rank),
            Self::Era => FieldValue::Era(record.era.clone()),
            Self::Score(field) => FieldValue::Score(record.score(*field)),
        }
    }
}

/// A field's value as read from a record. Serializes as the bare value or null.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Rank(Option<u32>),
    Era(Option<String>),
    Score(Option<f64>),
}

/// A score revealed at game start.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hint {
    pub field: &'static str,
    pub label: &'static str,
    pub value: f64,
}

/// One row of a guess result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldComparison {
    pub field: &'static str,
    pub label: &'static str,
    /// The guessed emperor's value for this field.
    pub value: FieldValue,
    pub result: Verdict,
}

/// Per-player game state, held between requests.
#[derive(Debug, Clone, PartialEq)]
pub struct GameSession {
    /// Materialized at start so later catalog changes cannot alter the round.
    pub answer: EmperorRecord,
    pub guesses_left: i32,
    pub revealed_hint_field: String,
    pub difficulty: Difficulty,
    pub started_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StartOutcome {
    pub difficulty: Difficulty,
    pub hints: Vec<Hint>,
    pub total_guesses: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct GuessOutcome {
    pub comparison: Vec<FieldComparison>,
    pub won: bool,
    pub guesses_left: i32,
    pub guess_name: String,
    pub guess_rank: Option<u32>,
    /// Only revealed once the round is over.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<EmperorRecord>,
}

impl GuessOutcome {
    pub fn is_over(&self) -> bool {
        self.answer.is_some()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GiveUpOutcome {
    pub answer: EmperorRecord,
}
