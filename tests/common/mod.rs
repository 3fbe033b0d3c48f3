#![allow(dead_code)]

use swiss_predictor::domain::{
    BoardResult, EligiblePool, Player, Round, RoundPairing, Score, TournamentInfo, TournamentState,
};
use swiss_predictor::pairing::DutchPairer;

pub fn roster(count: u32) -> Vec<Player> {
    (1..=count)
        .map(|no| {
            let mut player = Player::new(no, format!("Player {no:02}"), 2500 - no * 30);
            player.federation = "POL".to_string();
            player
        })
        .collect()
}

pub fn player_with_score(start_no: u32, score: f64) -> Player {
    let mut player = Player::new(start_no, format!("Player {start_no}"), 2000 - start_no * 10);
    player.current_score = Score::from(score);
    player
}

/// Small linear congruential generator so fixtures are reproducible
pub struct Dice(u64);

impl Dice {
    pub fn new(seed: u64) -> Self {
        Dice(seed)
    }

    pub fn roll(&mut self, sides: u64) -> u64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (self.0 >> 33) % sides
    }
}

/// Play `rounds` rounds with the built-in engine and random results.
/// `withdrawn` players leave the event after the given round.
pub fn simulate(players: u32, rounds: u32, seed: u64, withdrawn: &[(u32, u32)]) -> TournamentState {
    let roster = roster(players);
    let mut dice = Dice::new(seed);
    let mut played: Vec<Round> = Vec::new();
    let pairer = DutchPairer::default();

    for number in 1..=rounds {
        let info = TournamentInfo::new("Simulated Open", number - 1, rounds);
        let state = TournamentState::from_rounds(info, roster.clone(), played.clone());
        let pool: EligiblePool = roster
            .iter()
            .map(|p| p.start_no)
            .filter(|no| !withdrawn.iter().any(|&(who, after)| who == *no && number > after))
            .collect();

        let prediction = pairer.pair_state(&state, Some(&pool)).unwrap();
        let mut pairings: Vec<RoundPairing> = prediction
            .pairings
            .iter()
            .map(|p| {
                let result = match dice.roll(10) {
                    0..=3 => BoardResult::WhiteWin,
                    4..=6 => BoardResult::Draw,
                    7 | 8 => BoardResult::BlackWin,
                    _ => BoardResult::WhiteForfeitWin,
                };
                RoundPairing::game(p.board, p.white.start_no, p.black.start_no, Some(result))
            })
            .collect();
        if let Some(bye) = &prediction.bye {
            pairings.push(RoundPairing::bye(pairings.len() as u32 + 1, bye.player_no, None));
        }
        played.push(Round::new(number, pairings));
    }

    TournamentState::from_rounds(TournamentInfo::new("Simulated Open", rounds, rounds), roster, played)
}
