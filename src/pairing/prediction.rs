use serde::{Deserialize, Serialize};

use crate::domain::{Player, Score};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSummary {
    pub start_no: u32,
    pub name: String,
    pub rating: u32,
    pub score: Score,
}

impl From<&Player> for PlayerSummary {
    fn from(player: &Player) -> Self {
        Self {
            start_no: player.start_no,
            name: player.name.clone(),
            rating: player.rating,
            score: player.current_score,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictedPairing {
    pub board: u32,
    pub white: PlayerSummary,
    pub black: PlayerSummary,
}

impl PredictedPairing {
    pub fn involves(&self, start_no: u32) -> bool {
        self.white.start_no == start_no || self.black.start_no == start_no
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ByeRecord {
    pub player_no: u32,
    pub player_name: String,
    pub player_rating: u32,
}

impl From<&Player> for ByeRecord {
    fn from(player: &Player) -> Self {
        Self {
            player_no: player.start_no,
            player_name: player.name.clone(),
            player_rating: player.rating,
        }
    }
}

/// Predicted pairing table for one round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    pub next_round: u32,
    pub pairings: Vec<PredictedPairing>,
    pub bye: Option<ByeRecord>,
    /// Players that could not be placed without a repeat pairing
    #[serde(default)]
    pub unpaired: Vec<PlayerSummary>,
}

impl Prediction {
    /// Start numbers of everyone placed on a board or given the bye
    pub fn placed_players(&self) -> Vec<u32> {
        let mut placed: Vec<u32> = self
            .pairings
            .iter()
            .flat_map(|p| [p.white.start_no, p.black.start_no])
            .chain(self.bye.as_ref().map(|b| b.player_no))
            .collect();
        placed.sort_unstable();
        placed
    }
}
