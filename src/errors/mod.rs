use std::time::Duration;
use thiserror::Error;

/// Failures surfaced by the pairing engines and prediction requests
#[derive(Debug, Error)]
pub enum PredictionError {
    #[error("round {round} is not a valid round (tournament has {total} rounds)")]
    InvalidRound { round: u32, total: u32 },

    #[error("no eligible players to pair")]
    EmptyPool,

    #[error("tournament already completed all {0} rounds; pick a round to replay")]
    TournamentComplete(u32),

    #[error("completed rounds ({completed}) exceed total rounds ({total})")]
    InconsistentMetadata { completed: u32, total: u32 },

    #[error("pairing exceeded its time budget of {0:?}")]
    DeadlineExceeded(Duration),

    #[error("pairing engine failed (exit code {code:?}): {output}")]
    EngineFailed { code: Option<i32>, output: String },

    #[error("pairing engine produced no output")]
    EngineNoOutput,

    #[error("pairing engine output is malformed: {0}")]
    EngineOutput(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl PredictionError {
    /// Problems with the request itself; retrying the same input cannot help
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            PredictionError::InvalidRound { .. }
                | PredictionError::EmptyPool
                | PredictionError::TournamentComplete(_)
                | PredictionError::InconsistentMetadata { .. }
        )
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, PredictionError::DeadlineExceeded(_))
    }
}

/// Add context to snapshot read errors
pub fn read_context(path: &std::path::Path) -> String {
    format!("Failed to read tournament snapshot from {}", path.display())
}

/// Add context to parse errors
pub fn parse_context(data_type: &str) -> String {
    format!("Failed to parse {}", data_type)
}

/// Add context to write errors
pub fn write_context(path: &std::path::Path) -> String {
    format!("Failed to write {}", path.display())
}
