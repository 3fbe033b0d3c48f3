//! FIDE Dutch system pairing prediction.
//!
//! The engine works on a per-request snapshot: score groups are formed from
//! the eligible pool, each bracket is paired S1 against S2 with repeat
//! opponents forbidden and color conflicts minimised, odd brackets push one
//! player down, and the finished pairings get board numbers and colors.

pub mod boards;
pub mod bye;
pub mod color;
pub mod downfloat;
mod dutch;
mod leftovers;
mod prediction;
pub mod score_groups;
pub mod search;

pub use color::{ColorPreference, PreferenceStrength};
pub use dutch::DutchPairer;
pub use prediction::{ByeRecord, PlayerSummary, PredictedPairing, Prediction};

use crate::domain::{EligiblePool, Player, Score, TournamentState};
use crate::errors::PredictionError;

/// Player taking part in the search, with the color preference resolved once
#[derive(Debug, Clone, Copy)]
pub struct Entrant<'a> {
    pub player: &'a Player,
    pub preference: Option<ColorPreference>,
}

impl<'a> Entrant<'a> {
    pub fn new(player: &'a Player) -> Self {
        Self {
            player,
            preference: color::preference(player),
        }
    }

    pub fn start_no(&self) -> u32 {
        self.player.start_no
    }

    pub fn score(&self) -> Score {
        self.player.current_score
    }

    pub fn can_play(&self, other: &Entrant<'_>) -> bool {
        self.player.can_play(other.player)
    }
}

/// Two players matched during the search; `first` is the S1 side
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub first: Entrant<'a>,
    pub second: Entrant<'a>,
}

impl<'a> Candidate<'a> {
    pub fn new(first: Entrant<'a>, second: Entrant<'a>) -> Self {
        Self { first, second }
    }

    /// The member with the lower start number
    pub fn higher_ranked(&self) -> Entrant<'a> {
        if self.first.start_no() < self.second.start_no() {
            self.first
        } else {
            self.second
        }
    }

    pub fn score_sum(&self) -> Score {
        self.first.score() + self.second.score()
    }

    pub fn involves(&self, start_no: u32) -> bool {
        self.first.start_no() == start_no || self.second.start_no() == start_no
    }
}

/// Everything a backend needs to pair one round
#[derive(Debug, Clone, Copy)]
pub struct PairingRequest<'a> {
    /// Full tournament state; backends rewind it themselves when needed
    pub state: &'a TournamentState,
    pub target_round: u32,
    pub pool: Option<&'a EligiblePool>,
}

impl<'a> PairingRequest<'a> {
    pub fn next_round(state: &'a TournamentState) -> Self {
        Self {
            state,
            target_round: state.tournament.next_round(),
            pool: None,
        }
    }
}

pub trait PairingEngine {
    fn name(&self) -> &'static str;

    fn predict(&self, request: &PairingRequest<'_>) -> Result<Prediction, PredictionError>;
}
