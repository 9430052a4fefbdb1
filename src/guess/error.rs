use thiserror::Error;

use crate::catalog::SourceError;

/// Why a game operation was refused.
#[derive(Error, Debug)]
pub enum GameError {
    #[error("暂无可用的皇帝数据，请稍后重试")]
    NoEligibleCandidate,

    #[error("没有进行中的游戏，请先开始游戏")]
    NoActiveGame,

    #[error("猜测次数已用完")]
    GuessesExhausted,

    #[error("{0}")]
    InvalidInput(String),

    #[error("未找到该皇帝：{0}")]
    NotFound(String),

    #[error(transparent)]
    Source(#[from] SourceError),
}

impl GameError {
    /// Stable machine-readable name of the failure.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NoEligibleCandidate => "no_eligible_candidate",
            Self::NoActiveGame => "no_active_game",
            Self::GuessesExhausted => "guesses_exhausted",
            Self::InvalidInput(_) => "invalid_input",
            Self::NotFound(_) => "not_found",
            Self::Source(_) => "source_error",
        }
    }
}
