//! Properties of the built-in engine checked over simulated tournaments.

mod common;

use std::collections::BTreeSet;

use swiss_predictor::domain::{Color, EligiblePool, Player, TournamentInfo, TournamentState, rewind_to_round};
use swiss_predictor::pairing::{DutchPairer, PairingEngine, PairingRequest, Prediction};

use common::{player_with_score, simulate};

fn fixtures() -> Vec<TournamentState> {
    vec![
        simulate(12, 5, 7, &[]),
        simulate(15, 6, 42, &[(11, 2)]),
        simulate(9, 4, 1234, &[(3, 1), (8, 3)]),
        simulate(24, 7, 99, &[(5, 4)]),
    ]
}

/// Replay every round of `full` with the players who actually played it
fn replays(full: &TournamentState) -> Vec<(u32, Option<EligiblePool>, TournamentState, Prediction)> {
    let pairer = DutchPairer::default();
    (1..=full.tournament.completed_rounds)
        .map(|round| {
            let pool = full.actual_pool(round);
            let request = PairingRequest {
                state: full,
                target_round: round,
                pool: pool.as_ref(),
            };
            let prediction = pairer.predict(&request).unwrap();
            let before = rewind_to_round(full, round).unwrap();
            (round, pool, before, prediction)
        })
        .collect()
}

fn eligible(state: &TournamentState, pool: Option<&EligiblePool>) -> Vec<u32> {
    state.eligible_players(pool).iter().map(|p| p.start_no).collect()
}

#[test]
fn nobody_meets_the_same_opponent_twice() {
    for full in fixtures() {
        for (round, _, before, prediction) in replays(&full) {
            for pairing in &prediction.pairings {
                let white = before.player(pairing.white.start_no).unwrap();
                assert!(
                    !white.has_played(pairing.black.start_no),
                    "round {round}: {} and {} already met",
                    pairing.white.start_no,
                    pairing.black.start_no
                );
            }
        }
    }
}

#[test]
fn every_eligible_player_is_placed_exactly_once() {
    for full in fixtures() {
        for (round, pool, before, prediction) in replays(&full) {
            let mut seen: Vec<u32> = prediction.placed_players();
            seen.extend(prediction.unpaired.iter().map(|p| p.start_no));
            seen.sort_unstable();

            let unique: BTreeSet<u32> = seen.iter().copied().collect();
            assert_eq!(unique.len(), seen.len(), "round {round}: a player was placed twice");
            assert_eq!(seen, eligible(&before, pool.as_ref()), "round {round}");
        }
    }
}

#[test]
fn bye_only_for_odd_pools_and_to_the_lowest_eligible_score() {
    for full in fixtures() {
        for (round, pool, before, prediction) in replays(&full) {
            let players = before.eligible_players(pool.as_ref());
            match &prediction.bye {
                None => assert_eq!(players.len() % 2, 0, "round {round}"),
                Some(bye) => {
                    assert_eq!(players.len() % 2, 1, "round {round}");
                    let chosen = before.player(bye.player_no).unwrap();
                    for other in players.iter().filter(|p| !p.had_bye) {
                        assert!(chosen.current_score <= other.current_score, "round {round}");
                    }
                }
            }
        }
    }

    // odd pools also come up when replaying with everyone registered
    let full = simulate(11, 4, 5, &[]);
    let pairer = DutchPairer::default();
    for round in 1..=4 {
        let request = PairingRequest {
            state: &full,
            target_round: round,
            pool: None,
        };
        let prediction = pairer.predict(&request).unwrap();
        let before = rewind_to_round(&full, round).unwrap();
        let bye = prediction.bye.expect("odd field needs a bye");
        let chosen = before.player(bye.player_no).unwrap();
        for other in before.players.values().filter(|p| !p.had_bye) {
            assert!(chosen.current_score <= other.current_score);
        }
    }
}

#[test]
fn boards_are_ordered_by_leader_score_then_total_then_rank() {
    for full in fixtures() {
        for (round, _, _, prediction) in replays(&full) {
            let keys: Vec<_> = prediction
                .pairings
                .iter()
                .map(|p| {
                    let (higher, lower) = if p.white.start_no < p.black.start_no {
                        (&p.white, &p.black)
                    } else {
                        (&p.black, &p.white)
                    };
                    (
                        std::cmp::Reverse(higher.score),
                        std::cmp::Reverse(higher.score + lower.score),
                        higher.start_no,
                    )
                })
                .collect();
            assert!(keys.windows(2).all(|w| w[0] <= w[1]), "round {round}: {keys:?}");
            let boards: Vec<u32> = prediction.pairings.iter().map(|p| p.board).collect();
            assert_eq!(boards, (1..=boards.len() as u32).collect::<Vec<_>>());
        }
    }
}

#[test]
fn rewinding_is_idempotent_and_composes() {
    for full in fixtures() {
        let rounds = full.tournament.completed_rounds;
        for n in 1..=rounds {
            let once = rewind_to_round(&full, n).unwrap();
            assert_eq!(rewind_to_round(&once, n).unwrap(), once);

            let later = rewind_to_round(&full, n + 1).unwrap();
            assert_eq!(rewind_to_round(&later, n).unwrap(), once);

            let forward = rewind_to_round(&once, n + 1).unwrap();
            assert_eq!(forward.players, once.players);
        }
    }
}

#[test]
fn third_color_in_a_row_only_when_both_players_needed_it() {
    for full in fixtures() {
        for (round, _, before, prediction) in replays(&full) {
            for pairing in &prediction.pairings {
                for (summary, color, opponent) in [
                    (&pairing.white, Color::White, &pairing.black),
                    (&pairing.black, Color::Black, &pairing.white),
                ] {
                    let player = before.player(summary.start_no).unwrap();
                    if last_two(player) == Some(color) {
                        // both were due the other color and the opponent won the tiebreak
                        let other = before.player(opponent.start_no).unwrap();
                        let due = swiss_predictor::pairing::color::preference(other).map(|p| p.color);
                        assert_eq!(due, Some(color.opposite()), "round {round}");
                    }
                }
            }
        }
    }
}

fn last_two(player: &Player) -> Option<Color> {
    let colors: Vec<Color> = player.played_colors().collect();
    match colors.as_slice() {
        [.., a, b] if a == b => Some(*a),
        _ => None,
    }
}

#[test]
fn absolute_preferences_are_honored_when_compatible() {
    let mut p1 = player_with_score(1, 2.0);
    let mut p2 = player_with_score(2, 2.0);
    let mut p3 = player_with_score(3, 2.0);
    let mut p4 = player_with_score(4, 2.0);
    // 1 and 3 played black twice, 2 and 4 white twice; nobody met
    for (round, opponent_of_1, opponent_of_3) in [(1, 10, 12), (2, 11, 13)] {
        p1.opponents.insert(round, opponent_of_1);
        p1.colors.insert(round, Color::Black);
        p3.opponents.insert(round, opponent_of_3);
        p3.colors.insert(round, Color::Black);
        p2.opponents.insert(round, opponent_of_1 + 4);
        p2.colors.insert(round, Color::White);
        p4.opponents.insert(round, opponent_of_3 + 4);
        p4.colors.insert(round, Color::White);
    }
    let state = TournamentState::new(TournamentInfo::new("Colors", 2, 5), [p1, p2, p3, p4], Vec::new());

    let prediction = DutchPairer::default().pair_state(&state, None).unwrap();
    assert_eq!(prediction.pairings.len(), 2);
    for pairing in &prediction.pairings {
        assert!([1, 3].contains(&pairing.white.start_no));
        assert!([2, 4].contains(&pairing.black.start_no));
    }
}

#[test]
fn five_players_two_boards_and_a_bye() {
    let players = [
        player_with_score(1, 2.0),
        player_with_score(2, 2.0),
        player_with_score(3, 1.0),
        player_with_score(4, 1.0),
        player_with_score(5, 0.0),
    ];
    let state = TournamentState::new(TournamentInfo::new("Five", 2, 5), players, Vec::new());

    let prediction = DutchPairer::default().pair_state(&state, None).unwrap();
    assert_eq!(prediction.bye.as_ref().map(|b| b.player_no), Some(5));
    assert_eq!(prediction.pairings.len(), 2);
    assert!(prediction.unpaired.is_empty());
    assert!(prediction.pairings[0].involves(1) && prediction.pairings[0].involves(2));
    assert!(prediction.pairings[1].involves(3) && prediction.pairings[1].involves(4));
}

#[test]
fn odd_bracket_floats_one_of_the_players_who_already_met() {
    let mut p1 = player_with_score(1, 1.5);
    let mut p2 = player_with_score(2, 1.5);
    let p3 = player_with_score(3, 1.5);
    let p4 = player_with_score(4, 0.5);
    p1.opponents.insert(1, 2);
    p2.opponents.insert(1, 1);
    let state = TournamentState::new(TournamentInfo::new("Float", 2, 5), [p1, p2, p3, p4], Vec::new());

    let prediction = DutchPairer::default().pair_state(&state, None).unwrap();
    assert_eq!(prediction.pairings.len(), 2);
    assert!(prediction.unpaired.is_empty());
    assert!(!prediction.pairings.iter().any(|p| p.involves(1) && p.involves(2)));
    // the player left in the top bracket plays 3, the floater plays 4
    let with_three = prediction.pairings.iter().find(|p| p.involves(3)).unwrap();
    assert!(with_three.involves(1) || with_three.involves(2));
}

#[test]
fn engines_share_one_interface() {
    let full = simulate(8, 3, 3, &[]);
    let engines: Vec<Box<dyn PairingEngine>> = vec![Box::new(DutchPairer::default())];
    for engine in &engines {
        let prediction = engine.predict(&PairingRequest::next_round(&full)).unwrap();
        assert_eq!(prediction.next_round, 4);
        assert_eq!(engine.name(), "dutch");
    }
}
