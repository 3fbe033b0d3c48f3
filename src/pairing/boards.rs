use std::cmp::Reverse;

use super::Candidate;

#[derive(Debug, Clone, Copy)]
pub struct BoardedPairing<'a> {
    pub board: u32,
    pub pairing: Candidate<'a>,
}

/// Number boards from 1: the higher-ranked member's score first, then the
/// pair's combined score, then the higher-ranked member's start number.
pub fn assign_boards(mut pairings: Vec<Candidate<'_>>) -> Vec<BoardedPairing<'_>> {
    pairings.sort_by_key(|c| {
        let higher = c.higher_ranked();
        (Reverse(higher.score()), Reverse(c.score_sum()), higher.start_no())
    });

    pairings
        .into_iter()
        .zip(1..)
        .map(|(pairing, board)| BoardedPairing { board, pairing })
        .collect()
}
