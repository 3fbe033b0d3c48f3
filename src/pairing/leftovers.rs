use log::{debug, warn};

use super::score_groups::split_halves;
use super::search::BracketSearch;
use super::{Candidate, Entrant};

/// Place players that fell out of the last bracket.
///
/// They are first paired among themselves; whoever is still left is fitted
/// in by breaking an existing pairing whose members can each take one of
/// them. Returns the players that could not be placed at all.
pub fn resolve_leftovers<'a>(
    search: &BracketSearch<'_>,
    pairs: &mut Vec<Candidate<'a>>,
    mut leftovers: Vec<Entrant<'a>>,
) -> Vec<Entrant<'a>> {
    if leftovers.len() < 2 {
        return leftovers;
    }

    leftovers.sort_by_key(|e| e.start_no());
    let (s1, s2) = split_halves(&leftovers);
    let attempt = search.best_assignment(s1, s2);
    pairs.extend(attempt.pairs);
    let mut unplaced = attempt.unpaired;
    unplaced.sort_by_key(|e| e.start_no());

    while unplaced.len() >= 2 {
        if let Some((i, j)) = direct_match(&unplaced) {
            let second = unplaced.remove(j);
            let first = unplaced.remove(i);
            pairs.push(Candidate::new(first, second));
            continue;
        }
        if !exchange_partners(pairs, &mut unplaced) {
            break;
        }
    }

    if !unplaced.is_empty() {
        warn!(
            "{} players cannot be paired without a repeat: {:?}",
            unplaced.len(),
            unplaced.iter().map(|e| e.start_no()).collect::<Vec<_>>()
        );
    }
    unplaced
}

fn direct_match(players: &[Entrant<'_>]) -> Option<(usize, usize)> {
    (0..players.len()).find_map(|i| {
        (i + 1..players.len())
            .find(|&j| players[i].can_play(&players[j]))
            .map(|j| (i, j))
    })
}

/// Break one settled pairing (a, b) so that a takes x and b takes y.
/// Lower boards are disturbed first.
fn exchange_partners<'a>(pairs: &mut Vec<Candidate<'a>>, unplaced: &mut Vec<Entrant<'a>>) -> bool {
    for i in 0..unplaced.len() {
        for j in i + 1..unplaced.len() {
            let (x, y) = (unplaced[i], unplaced[j]);

            for index in (0..pairs.len()).rev() {
                let Candidate { first: a, second: b } = pairs[index];
                let replacement = if a.can_play(&x) && b.can_play(&y) {
                    Some((Candidate::new(a, x), Candidate::new(b, y)))
                } else if a.can_play(&y) && b.can_play(&x) {
                    Some((Candidate::new(a, y), Candidate::new(b, x)))
                } else {
                    None
                };

                if let Some((left, right)) = replacement {
                    debug!(
                        "Split {}-{} to place {} and {}",
                        a.start_no(),
                        b.start_no(),
                        x.start_no(),
                        y.start_no()
                    );
                    pairs[index] = left;
                    pairs.push(right);
                    unplaced.remove(j);
                    unplaced.remove(i);
                    return true;
                }
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PairingSettings;
    use crate::domain::Player;

    fn met(players: &mut [Player], a: u32, b: u32, round: u32) {
        for p in players.iter_mut() {
            if p.start_no == a {
                p.opponents.insert(round, b);
            } else if p.start_no == b {
                p.opponents.insert(round, a);
            }
        }
    }

    #[test]
    fn leftovers_pair_among_themselves() {
        let settings = PairingSettings::default();
        let search = BracketSearch::new(&settings);
        let players: Vec<Player> = (1..=2).map(|no| Player::new(no, format!("P{no}"), 0)).collect();
        let e: Vec<Entrant> = players.iter().map(Entrant::new).collect();

        let mut pairs = Vec::new();
        let rest = resolve_leftovers(&search, &mut pairs, e.clone());
        assert!(rest.is_empty());
        assert_eq!(pairs.len(), 1);
    }

    #[test]
    fn settled_pair_is_split_to_place_two_leftovers() {
        let settings = PairingSettings::default();
        let search = BracketSearch::new(&settings);
        let mut players: Vec<Player> = (1..=4).map(|no| Player::new(no, format!("P{no}"), 0)).collect();
        met(&mut players, 3, 4, 1);
        let e: Vec<Entrant> = players.iter().map(Entrant::new).collect();

        let mut pairs = vec![Candidate::new(e[0], e[1])];
        let rest = resolve_leftovers(&search, &mut pairs, vec![e[2], e[3]]);
        assert!(rest.is_empty());
        assert_eq!(pairs.len(), 2);
        for pair in &pairs {
            assert!(pair.first.can_play(&pair.second));
            assert!(!(pair.involves(3) && pair.involves(4)));
        }
    }

    #[test]
    fn impossible_leftovers_are_reported() {
        let settings = PairingSettings::default();
        let search = BracketSearch::new(&settings);
        let mut players: Vec<Player> = (1..=2).map(|no| Player::new(no, format!("P{no}"), 0)).collect();
        met(&mut players, 1, 2, 1);
        let e: Vec<Entrant> = players.iter().map(Entrant::new).collect();

        let mut pairs = Vec::new();
        let rest = resolve_leftovers(&search, &mut pairs, e.clone());
        assert_eq!(rest.len(), 2);
        assert!(pairs.is_empty());
    }
}
