use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::cmp::Reverse;

use crate::config::AppConfig;
use crate::domain::{Color, EligiblePool, GameResult, Score, TournamentInfo, TournamentState, rewind_to_round};
use crate::errors::PredictionError;
use crate::pairing::{DutchPairer, PairingEngine, PairingRequest, Prediction};
use crate::trf::{ExternalPairer, TrfWriter};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EngineKind {
    #[default]
    Dutch,
    External,
}

#[derive(Debug, Clone, Default)]
pub struct PredictionRequest {
    /// Round to pair; the next unplayed round when absent
    pub round: Option<u32>,
    /// Start numbers allowed into the round
    pub pool: Option<Vec<u32>>,
    pub engine: EngineKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Standing {
    pub rank: u32,
    pub start_no: u32,
    pub name: String,
    pub rating: u32,
    pub score: Score,
}

/// One played (or missed) round in a player's record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub round: u32,
    /// `Some(0)` for a bye, `None` when the player has no entry for the round
    pub opponent_no: Option<u32>,
    pub opponent_name: String,
    pub opponent_rating: Option<u32>,
    pub color: Option<Color>,
    pub result: Option<GameResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerDetail {
    pub start_no: u32,
    pub name: String,
    pub rating: u32,
    pub current_score: Score,
    pub history: Vec<HistoryEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionReport {
    pub tournament: TournamentInfo,
    pub target_round: u32,
    pub engine: String,
    /// Set when a historical round was replayed
    pub replayed: bool,
    pub prediction: Prediction,
    pub standings: Vec<Standing>,
    #[serde(default)]
    pub player_details: Vec<PlayerDetail>,
    /// Players who actually sat at a board in the replayed round
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_pool_size: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_players: Option<usize>,
}

pub struct PredictionService {
    config: AppConfig,
}

impl PredictionService {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn predict(&self, state: &TournamentState, request: &PredictionRequest) -> Result<PredictionReport> {
        info!("=== Predicting pairings for {} ===", state.tournament.name);

        let target_round = self.resolve_round(state, request.round)?;
        let pool = self.resolve_pool(state, request.pool.as_deref(), target_round);
        info!(
            "  → Round {} with {} eligible players",
            target_round,
            state.eligible_players(pool.as_ref()).len()
        );
        if state.eligible_players(pool.as_ref()).is_empty() {
            return Err(PredictionError::EmptyPool.into());
        }

        let engine = self.engine(request.engine);
        let pairing_request = PairingRequest {
            state,
            target_round,
            pool: pool.as_ref(),
        };
        let prediction = engine
            .predict(&pairing_request)
            .with_context(|| format!("{} engine could not pair round {}", engine.name(), target_round))?;
        info!(
            "  → {} boards, bye: {}, unpaired: {}",
            prediction.pairings.len(),
            prediction.bye.as_ref().map_or("none".to_string(), |b| b.player_no.to_string()),
            prediction.unpaired.len()
        );

        let from_round_table = request.pool.is_none() && pool.is_some();
        let view = self.state_before(state, target_round)?;
        Ok(PredictionReport {
            tournament: state.tournament.clone(),
            target_round,
            engine: engine.name().to_string(),
            replayed: target_round != state.tournament.next_round(),
            prediction,
            standings: standings(&view),
            player_details: player_details(&view, target_round),
            actual_pool_size: pool.as_ref().filter(|_| from_round_table).map(|p| p.iter().count()),
            total_players: from_round_table.then(|| state.players.len()),
        })
    }

    /// State as it stood before `round` was paired
    pub fn rewind(&self, state: &TournamentState, round: u32) -> Result<TournamentState> {
        self.validate_round(state, round)?;
        let rewound = rewind_to_round(state, round)?;
        info!("  → Rewound to {} completed rounds", rewound.tournament.completed_rounds);
        Ok(rewound)
    }

    /// TRF file the external engine would receive
    pub fn trf(&self, state: &TournamentState, round: Option<u32>, pool: Option<&[u32]>) -> Result<String> {
        let target_round = self.resolve_round(state, round)?;
        let pool = self.resolve_pool(state, pool, target_round);
        Ok(TrfWriter::new(state, target_round, pool.as_ref()).render())
    }

    fn resolve_round(&self, state: &TournamentState, round: Option<u32>) -> Result<u32, PredictionError> {
        match round {
            Some(round) => {
                self.validate_round(state, round)?;
                Ok(round)
            }
            None if state.tournament.is_complete() => {
                Err(PredictionError::TournamentComplete(state.tournament.total_rounds))
            }
            None => Ok(state.tournament.next_round()),
        }
    }

    fn validate_round(&self, state: &TournamentState, round: u32) -> Result<(), PredictionError> {
        let total = state.tournament.total_rounds;
        if round == 0 || (total > 0 && round > total) {
            return Err(PredictionError::InvalidRound { round, total });
        }
        Ok(())
    }

    /// Explicit pool first, then whoever actually sat at a board in that round
    fn resolve_pool(&self, state: &TournamentState, pool: Option<&[u32]>, round: u32) -> Option<EligiblePool> {
        match pool {
            Some(numbers) => Some(numbers.iter().copied().collect()),
            None => state.actual_pool(round),
        }
    }

    fn state_before<'s>(&self, state: &'s TournamentState, round: u32) -> Result<Cow<'s, TournamentState>> {
        if round == state.tournament.next_round() {
            Ok(Cow::Borrowed(state))
        } else {
            Ok(Cow::Owned(rewind_to_round(state, round)?))
        }
    }

    fn engine(&self, kind: EngineKind) -> Box<dyn PairingEngine> {
        match kind {
            EngineKind::Dutch => Box::new(DutchPairer::new(self.config.pairing.clone())),
            EngineKind::External => Box::new(ExternalPairer::new(self.config.engine.clone())),
        }
    }
}

/// Ranking by score, then rating, then start number
pub fn standings(state: &TournamentState) -> Vec<Standing> {
    let mut players: Vec<_> = state.players.values().collect();
    players.sort_by_key(|p| (Reverse(p.current_score), Reverse(p.rating), p.start_no));

    players
        .into_iter()
        .zip(1..)
        .map(|(p, rank)| Standing {
            rank,
            start_no: p.start_no,
            name: p.name.clone(),
            rating: p.rating,
            score: p.current_score,
        })
        .collect()
}

/// Round-by-round record of every player before `target_round`
pub fn player_details(state: &TournamentState, target_round: u32) -> Vec<PlayerDetail> {
    state
        .players
        .values()
        .map(|player| PlayerDetail {
            start_no: player.start_no,
            name: player.name.clone(),
            rating: player.rating,
            current_score: player.current_score,
            history: (1..target_round)
                .map(|round| {
                    let opponent_no = player.opponents.get(&round).copied();
                    let opponent = opponent_no.and_then(|no| state.player(no));
                    HistoryEntry {
                        round,
                        opponent_no,
                        opponent_name: match (opponent, opponent_no) {
                            (Some(o), _) => o.name.clone(),
                            (None, Some(0)) => "Bye".to_string(),
                            _ => "-".to_string(),
                        },
                        opponent_rating: opponent.map(|o| o.rating),
                        color: player.colors.get(&round).copied(),
                        result: player.results.get(&round).copied(),
                    }
                })
                .collect(),
        })
        .collect()
}
