use std::cmp::Reverse;
use std::collections::BTreeMap;

use crate::domain::Score;

use super::Entrant;

/// All players on one score, in pairing-number (start number) order
#[derive(Debug, Clone)]
pub struct ScoreGroup<'a> {
    pub score: Score,
    pub players: Vec<Entrant<'a>>,
}

/// Brackets by strictly descending score
pub fn build_score_groups<'a>(pool: &[Entrant<'a>]) -> Vec<ScoreGroup<'a>> {
    let mut by_score: BTreeMap<Reverse<Score>, Vec<Entrant<'a>>> = BTreeMap::new();
    for entrant in pool {
        by_score.entry(Reverse(entrant.score())).or_default().push(*entrant);
    }

    by_score
        .into_iter()
        .map(|(Reverse(score), mut players)| {
            players.sort_by_key(|e| e.start_no());
            ScoreGroup { score, players }
        })
        .collect()
}

/// S1 is the top half, S2 the rest (one longer when the count is odd)
pub fn split_halves<'a, 'b>(players: &'b [Entrant<'a>]) -> (&'b [Entrant<'a>], &'b [Entrant<'a>]) {
    players.split_at(players.len() / 2)
}
