use std::fmt::{self, Write};

use crate::domain::{Color, EligiblePool, GameResult, Player, Score, TournamentState};

/// One round column of a `001` player line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundEntry {
    pub opponent: u32,
    pub color: char,
    pub result: char,
}

impl RoundEntry {
    fn absent(result: char) -> Self {
        Self {
            opponent: 0,
            color: '-',
            result,
        }
    }
}

impl fmt::Display for RoundEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.opponent == 0 {
            write!(f, "  0000 - {}", self.result)
        } else {
            write!(f, "  {:4} {} {}", self.opponent, self.color, self.result)
        }
    }
}

/// Writes the tournament as it stood before `target_round`.
///
/// The state is expected to be complete: rounds at or after the target are
/// not written, but they still tell which gaps in a player's history were
/// half-point byes rather than absences.
pub struct TrfWriter<'a> {
    state: &'a TournamentState,
    target_round: u32,
    pool: Option<&'a EligiblePool>,
}

impl<'a> TrfWriter<'a> {
    pub fn new(state: &'a TournamentState, target_round: u32, pool: Option<&'a EligiblePool>) -> Self {
        Self {
            state,
            target_round,
            pool,
        }
    }

    fn completed_rounds(&self) -> u32 {
        self.target_round.saturating_sub(1)
    }

    pub fn render(&self) -> String {
        let info = &self.state.tournament;
        let total_rounds = if info.total_rounds > 0 {
            info.total_rounds
        } else {
            self.target_round
        };
        let name = if info.name.is_empty() { "Tournament" } else { info.name.as_str() };

        let mut out = String::new();
        // writing into a String cannot fail
        let _ = writeln!(out, "012 {name}");
        let _ = writeln!(out, "032 ENG");
        let _ = writeln!(out, "062 {}", self.state.players.len());
        let _ = writeln!(out, "092 Individual: Swiss-System");
        let _ = writeln!(out, "XXR {total_rounds}");

        for player in self.state.players.values() {
            out.push_str(&self.player_line(player));
            out.push('\n');
        }
        out
    }

    pub fn player_line(&self, player: &Player) -> String {
        let (entries, points) = self.round_entries(player);
        let name: String = player.name.chars().take(33).collect();

        let mut line = String::from("001");
        line.push_str(&format!(" {:4}", player.start_no));
        line.push_str(" m");
        line.push_str("    ");
        line.push_str(&format!("{name:<33}"));
        line.push_str(&format!("{:4}", player.rating));
        line.push_str(&format!(" {:<3}", player.federation));
        line.push_str(&" ".repeat(12 + 5 + 8));
        line.push_str(&format!("{:>4.1}", points.as_f64()));
        line.push_str(&format!(" {:4}", player.start_no));
        for entry in &entries {
            line.push_str(&entry.to_string());
        }
        line
    }

    /// Entries for rounds `1..target_round` and the points they are worth
    pub fn round_entries(&self, player: &Player) -> (Vec<RoundEntry>, Score) {
        let completed = self.completed_rounds();
        let last_data_round = player.last_data_round();
        let mut entries = Vec::with_capacity(completed as usize + 1);
        let mut inferred = Score::ZERO;

        for round in 1..=completed {
            let entry = match player.opponents.get(&round) {
                Some(&opponent) => played_entry(player, round, opponent),
                None if round < last_data_round => {
                    inferred = inferred + Score::HALF;
                    RoundEntry::absent('H')
                }
                None => RoundEntry::absent('-'),
            };
            entries.push(entry);
        }

        if self.pool.is_some_and(|pool| !pool.contains(player.start_no)) {
            entries.push(RoundEntry::absent('-'));
        }

        (entries, inferred + player.score_through(completed))
    }
}

fn played_entry(player: &Player, round: u32, opponent: u32) -> RoundEntry {
    let result = player.results.get(&round).copied();
    if opponent == 0 {
        return RoundEntry::absent(unplayed_result(result));
    }

    match player.colors.get(&round) {
        Some(&color) if color != Color::None => RoundEntry {
            opponent,
            color: color.trf_letter(),
            result: match result {
                Some(GameResult::Win) => '1',
                Some(GameResult::Loss) => '0',
                Some(GameResult::Draw) => '=',
                None => '-',
            },
        },
        _ => RoundEntry {
            opponent,
            color: '-',
            result: unplayed_result(result),
        },
    }
}

/// Byes and forfeits
fn unplayed_result(result: Option<GameResult>) -> char {
    match result {
        Some(GameResult::Win) => '+',
        Some(GameResult::Draw) => 'H',
        _ => '-',
    }
}
