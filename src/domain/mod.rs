pub mod models;
pub mod rewind;
mod state;

pub use models::*;
pub use rewind::rewind_to_round;
pub use state::{EligiblePool, HistoryIssue, IssueKind, TournamentState};
