use super::models::{Player, TournamentInfo};
use super::state::TournamentState;
use crate::errors::PredictionError;

/// Reconstruct the state as it stood before `target_round` was paired.
///
/// Every history, bye flag and score is rebuilt from rounds `1..target_round`
/// only; the running totals of the input are never trusted. Rounds beyond
/// the tournament's length are accepted and simply keep everything.
pub fn rewind_to_round(
    state: &TournamentState,
    target_round: u32,
) -> Result<TournamentState, PredictionError> {
    if target_round == 0 {
        return Err(PredictionError::InvalidRound {
            round: target_round,
            total: state.tournament.total_rounds,
        });
    }
    let cutoff = target_round - 1;

    let players = state
        .players
        .iter()
        .map(|(&start_no, player)| (start_no, rewind_player(player, cutoff)))
        .collect();

    let rounds = state
        .rounds
        .range(..=cutoff)
        .map(|(&number, round)| (number, round.clone()))
        .collect();

    Ok(TournamentState {
        tournament: TournamentInfo {
            completed_rounds: cutoff,
            ..state.tournament.clone()
        },
        players,
        rounds,
    })
}

fn rewind_player(player: &Player, cutoff: u32) -> Player {
    let bye_rounds: Vec<u32> = player
        .bye_rounds
        .iter()
        .copied()
        .filter(|&round| round <= cutoff)
        .collect();

    Player {
        opponents: player.opponents.range(..=cutoff).map(|(&r, &o)| (r, o)).collect(),
        colors: player.colors.range(..=cutoff).map(|(&r, &c)| (r, c)).collect(),
        results: player.results.range(..=cutoff).map(|(&r, &g)| (r, g)).collect(),
        current_score: player.score_through(cutoff),
        had_bye: !bye_rounds.is_empty(),
        bye_rounds,
        ..player.clone()
    }
}
