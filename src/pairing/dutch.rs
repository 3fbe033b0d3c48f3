use log::{debug, info};
use std::borrow::Cow;
use std::time::Instant;

use crate::config::PairingSettings;
use crate::domain::{EligiblePool, TournamentState, rewind_to_round};
use crate::errors::PredictionError;

use super::boards::assign_boards;
use super::bye::select_bye;
use super::downfloat::select_downfloater;
use super::leftovers::resolve_leftovers;
use super::score_groups::{build_score_groups, split_halves};
use super::search::BracketSearch;
use super::{
    ByeRecord, Candidate, Entrant, PairingEngine, PairingRequest, PlayerSummary, PredictedPairing, Prediction,
    color,
};

/// Built-in approximation of the FIDE Dutch system
#[derive(Debug, Clone, Default)]
pub struct DutchPairer {
    settings: PairingSettings,
}

impl DutchPairer {
    pub fn new(settings: PairingSettings) -> Self {
        Self { settings }
    }

    /// Pair the round after the last completed one of `state`
    pub fn pair_state(
        &self,
        state: &TournamentState,
        pool: Option<&EligiblePool>,
    ) -> Result<Prediction, PredictionError> {
        let started = Instant::now();
        let next_round = state.tournament.next_round();

        let mut players = state.eligible_players(pool);
        if players.is_empty() {
            return Err(PredictionError::EmptyPool);
        }

        let bye = if players.len() % 2 == 1 {
            let chosen = select_bye(&players);
            if let Some(player) = chosen {
                debug!("Bye goes to {} ({})", player.start_no, player.name);
                players.retain(|p| p.start_no != player.start_no);
            }
            chosen
        } else {
            None
        };

        let entrants: Vec<Entrant<'_>> = players.into_iter().map(Entrant::new).collect();
        let groups = build_score_groups(&entrants);
        let search = BracketSearch::new(&self.settings);

        let mut pairs: Vec<Candidate<'_>> = Vec::with_capacity(entrants.len() / 2);
        let mut floaters: Vec<Entrant<'_>> = Vec::new();

        for (index, bracket) in groups.iter().enumerate() {
            self.check_deadline(started)?;
            let next = groups.get(index + 1).map_or(&[][..], |g| g.players.as_slice());
            let mut group = bracket.players.clone();

            if !floaters.is_empty() {
                debug!(
                    "Bracket {}: {} floaters meet {} natives",
                    bracket.score,
                    floaters.len(),
                    group.len()
                );
                let outcome = search.pair_heterogeneous(&floaters, &group);
                pairs.extend(outcome.pairs);
                group = outcome.remaining_natives;
                floaters = outcome.unpaired_floaters;
            }
            if group.is_empty() {
                continue;
            }

            group.sort_by_key(|e| e.start_no());
            if group.len() % 2 == 1 {
                let chosen = select_downfloater(&search, &group, next);
                floaters.push(group.remove(chosen));
            }
            if group.is_empty() {
                continue;
            }

            let (s1, s2) = split_halves(&group);
            let attempt = search.best_assignment(s1, s2);
            debug!(
                "Bracket {}: {} pairs, {} unpaired, penalty {}",
                bracket.score,
                attempt.pairs.len(),
                attempt.unpaired.len(),
                attempt.penalty
            );
            pairs.extend(attempt.pairs);
            floaters.extend(attempt.unpaired);
        }
        self.check_deadline(started)?;

        let unplaced = resolve_leftovers(&search, &mut pairs, floaters);

        let pairings: Vec<PredictedPairing> = assign_boards(pairs)
            .into_iter()
            .map(|boarded| {
                let (white, black) = color::allocate(boarded.pairing.first, boarded.pairing.second, boarded.board);
                PredictedPairing {
                    board: boarded.board,
                    white: PlayerSummary::from(white.player),
                    black: PlayerSummary::from(black.player),
                }
            })
            .collect();

        info!(
            "Round {}: {} boards predicted in {:?}",
            next_round,
            pairings.len(),
            started.elapsed()
        );

        Ok(Prediction {
            next_round,
            pairings,
            bye: bye.map(ByeRecord::from),
            unpaired: unplaced.iter().map(|e| PlayerSummary::from(e.player)).collect(),
        })
    }

    fn check_deadline(&self, started: Instant) -> Result<(), PredictionError> {
        match self.settings.time_budget {
            Some(budget) if started.elapsed() >= budget => Err(PredictionError::DeadlineExceeded(budget)),
            _ => Ok(()),
        }
    }
}

impl PairingEngine for DutchPairer {
    fn name(&self) -> &'static str {
        "dutch"
    }

    fn predict(&self, request: &PairingRequest<'_>) -> Result<Prediction, PredictionError> {
        let state = if request.target_round == request.state.tournament.next_round() {
            Cow::Borrowed(request.state)
        } else {
            Cow::Owned(rewind_to_round(request.state, request.target_round)?)
        };
        self.pair_state(&state, request.pool)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BoardResult, Player, Round, RoundPairing, TournamentInfo};
    use std::time::Duration;

    fn fresh_state(n: u32) -> TournamentState {
        let roster = (1..=n).map(|no| Player::new(no, format!("Player {no}"), 2400 - no * 20));
        TournamentState::from_rounds(TournamentInfo::new("Open", 0, 5), roster, Vec::new())
    }

    #[test]
    fn first_round_pairs_top_half_against_bottom_half() {
        let state = fresh_state(8);
        let prediction = DutchPairer::default().pair_state(&state, None).unwrap();

        assert_eq!(prediction.next_round, 1);
        assert!(prediction.bye.is_none());
        let boards: Vec<(u32, u32, u32)> = prediction
            .pairings
            .iter()
            .map(|p| (p.board, p.white.start_no, p.black.start_no))
            .collect();
        assert_eq!(boards, vec![(1, 1, 5), (2, 6, 2), (3, 3, 7), (4, 8, 4)]);
    }

    #[test]
    fn odd_field_gives_the_last_player_a_bye() {
        let state = fresh_state(5);
        let prediction = DutchPairer::default().pair_state(&state, None).unwrap();

        assert_eq!(prediction.bye.as_ref().map(|b| b.player_no), Some(5));
        assert_eq!(prediction.pairings.len(), 2);
        assert_eq!(prediction.placed_players(), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn empty_pool_is_rejected() {
        let state = fresh_state(4);
        let pool = EligiblePool::default();
        let err = DutchPairer::default().pair_state(&state, Some(&pool)).unwrap_err();
        assert!(matches!(err, PredictionError::EmptyPool));
    }

    #[test]
    fn second_round_avoids_rematches() {
        let roster = (1..=4).map(|no| Player::new(no, format!("P{no}"), 2000));
        let rounds = vec![Round::new(
            1,
            vec![
                RoundPairing::game(1, 1, 3, Some(BoardResult::WhiteWin)),
                RoundPairing::game(2, 4, 2, Some(BoardResult::BlackWin)),
            ],
        )];
        let state = TournamentState::from_rounds(TournamentInfo::new("Open", 1, 3), roster, rounds);

        let prediction = DutchPairer::default().pair_state(&state, None).unwrap();
        assert_eq!(prediction.pairings.len(), 2);
        for pairing in &prediction.pairings {
            let white = state.player(pairing.white.start_no).unwrap();
            assert!(!white.has_played(pairing.black.start_no));
        }
        // winners meet on board 1
        assert!(prediction.pairings[0].involves(1) && prediction.pairings[0].involves(2));
    }

    #[test]
    fn predict_rewinds_for_an_earlier_round() {
        let roster = (1..=4).map(|no| Player::new(no, format!("P{no}"), 2000));
        let rounds = vec![Round::new(
            1,
            vec![
                RoundPairing::game(1, 1, 3, Some(BoardResult::WhiteWin)),
                RoundPairing::game(2, 4, 2, Some(BoardResult::BlackWin)),
            ],
        )];
        let state = TournamentState::from_rounds(TournamentInfo::new("Open", 1, 3), roster, rounds);
        let request = PairingRequest {
            state: &state,
            target_round: 1,
            pool: None,
        };

        let prediction = DutchPairer::default().predict(&request).unwrap();
        assert_eq!(prediction.next_round, 1);
        let rewound = rewind_to_round(&state, 1).unwrap();
        assert_eq!(prediction, DutchPairer::default().pair_state(&rewound, None).unwrap());
    }

    #[test]
    fn zero_budget_times_out() {
        let settings = PairingSettings {
            time_budget: Some(Duration::ZERO),
            ..PairingSettings::default()
        };
        let result = DutchPairer::new(settings).pair_state(&fresh_state(6), None);
        assert!(matches!(result, Err(PredictionError::DeadlineExceeded(_))));
    }
}
