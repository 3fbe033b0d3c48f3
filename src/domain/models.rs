use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::iter::Sum;
use std::ops::Add;

/// Tournament score kept in half points so equality is exact
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct Score(u32);

impl Score {
    pub const ZERO: Score = Score(0);
    pub const HALF: Score = Score(1);
    pub const ONE: Score = Score(2);

    pub fn half_points(self) -> u32 {
        self.0
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.0) / 2.0
    }
}

impl From<f64> for Score {
    fn from(value: f64) -> Self {
        if !value.is_finite() || value <= 0.0 {
            return Score::ZERO;
        }
        Score((value * 2.0).round() as u32)
    }
}

impl From<Score> for f64 {
    fn from(score: Score) -> Self {
        score.as_f64()
    }
}

impl Add for Score {
    type Output = Score;

    fn add(self, rhs: Score) -> Score {
        Score(self.0 + rhs.0)
    }
}

impl Sum for Score {
    fn sum<I: Iterator<Item = Score>>(iter: I) -> Score {
        iter.fold(Score::ZERO, Add::add)
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 % 2 == 0 {
            write!(f, "{}", self.0 / 2)
        } else {
            write!(f, "{}.5", self.0 / 2)
        }
    }
}

/// Color played in a round; `None` marks a forfeit or a bye
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    #[serde(rename = "W")]
    White,
    #[serde(rename = "B")]
    Black,
    #[serde(rename = "-")]
    None,
}

impl Color {
    pub fn opposite(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
            Color::None => Color::None,
        }
    }

    pub fn is_played(self) -> bool {
        self != Color::None
    }

    /// Lowercase letter used by the TRF round entries
    pub fn trf_letter(self) -> char {
        match self {
            Color::White => 'w',
            Color::Black => 'b',
            Color::None => '-',
        }
    }
}

/// Individual game result from one player's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameResult {
    #[serde(rename = "1")]
    Win,
    #[serde(rename = "½", alias = "0.5", alias = "=")]
    Draw,
    #[serde(rename = "0")]
    Loss,
}

impl GameResult {
    pub fn points(self) -> Score {
        match self {
            GameResult::Win => Score::ONE,
            GameResult::Draw => Score::HALF,
            GameResult::Loss => Score::ZERO,
        }
    }

    pub fn complement(self) -> GameResult {
        match self {
            GameResult::Win => GameResult::Loss,
            GameResult::Draw => GameResult::Draw,
            GameResult::Loss => GameResult::Win,
        }
    }
}

/// Result written on a board of a published round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoardResult {
    #[serde(rename = "1-0")]
    WhiteWin,
    #[serde(rename = "0-1")]
    BlackWin,
    #[serde(rename = "½-½", alias = "1/2-1/2")]
    Draw,
    #[serde(rename = "F1-0")]
    WhiteForfeitWin,
    #[serde(rename = "F0-1")]
    BlackForfeitWin,
}

impl BoardResult {
    pub fn for_white(self) -> GameResult {
        match self {
            BoardResult::WhiteWin | BoardResult::WhiteForfeitWin => GameResult::Win,
            BoardResult::BlackWin | BoardResult::BlackForfeitWin => GameResult::Loss,
            BoardResult::Draw => GameResult::Draw,
        }
    }

    pub fn for_black(self) -> GameResult {
        self.for_white().complement()
    }

    pub fn is_forfeit(self) -> bool {
        matches!(self, BoardResult::WhiteForfeitWin | BoardResult::BlackForfeitWin)
    }
}

/// Registered player with round-indexed history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub start_no: u32,
    pub name: String,
    #[serde(default)]
    pub rating: u32,
    #[serde(default)]
    pub federation: String,
    #[serde(default)]
    pub current_score: Score,
    #[serde(default)]
    pub rank: u32,
    /// Opponent start number per round, 0 for a bye
    #[serde(default)]
    pub opponents: BTreeMap<u32, u32>,
    #[serde(default)]
    pub colors: BTreeMap<u32, Color>,
    #[serde(default)]
    pub results: BTreeMap<u32, GameResult>,
    #[serde(default)]
    pub had_bye: bool,
    #[serde(default)]
    pub bye_rounds: Vec<u32>,
}

impl Player {
    pub fn new(start_no: u32, name: impl Into<String>, rating: u32) -> Self {
        Self {
            start_no,
            name: name.into(),
            rating,
            federation: String::new(),
            current_score: Score::ZERO,
            rank: 0,
            opponents: BTreeMap::new(),
            colors: BTreeMap::new(),
            results: BTreeMap::new(),
            had_bye: false,
            bye_rounds: Vec::new(),
        }
    }

    pub fn has_played(&self, opponent: u32) -> bool {
        opponent != 0 && self.opponents.values().any(|&o| o == opponent)
    }

    /// Two different players who have not met yet
    pub fn can_play(&self, other: &Player) -> bool {
        self.start_no != other.start_no && !self.has_played(other.start_no)
    }

    /// Colors actually played over the board, in round order
    pub fn played_colors(&self) -> impl Iterator<Item = Color> + '_ {
        self.colors.values().copied().filter(|c| c.is_played())
    }

    pub fn color_counts(&self) -> (u32, u32) {
        self.played_colors().fold((0, 0), |(w, b), c| match c {
            Color::White => (w + 1, b),
            _ => (w, b + 1),
        })
    }

    pub fn color_imbalance(&self) -> u32 {
        let (whites, blacks) = self.color_counts();
        whites.abs_diff(blacks)
    }

    /// Last round this color was played, 0 if never
    pub fn last_round_with(&self, color: Color) -> u32 {
        self.colors
            .iter()
            .filter(|&(_, &c)| c == color)
            .map(|(&round, _)| round)
            .next_back()
            .unwrap_or(0)
    }

    /// Highest round with any recorded opponent, 0 without history
    pub fn last_data_round(&self) -> u32 {
        self.opponents.keys().next_back().copied().unwrap_or(0)
    }

    /// Sum of recorded results over rounds `1..=cutoff`
    pub fn score_through(&self, cutoff: u32) -> Score {
        self.results
            .range(..=cutoff)
            .map(|(_, result)| result.points())
            .sum()
    }

    pub(crate) fn forget_round(&mut self, round: u32) {
        self.opponents.remove(&round);
        self.colors.remove(&round);
        self.results.remove(&round);
    }
}

/// One board of a published round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundPairing {
    pub board: u32,
    pub white_no: u32,
    #[serde(default)]
    pub black_no: u32,
    #[serde(default)]
    pub result: Option<BoardResult>,
    #[serde(default)]
    pub is_bye: bool,
}

impl RoundPairing {
    pub fn game(board: u32, white_no: u32, black_no: u32, result: Option<BoardResult>) -> Self {
        Self {
            board,
            white_no,
            black_no,
            result,
            is_bye: false,
        }
    }

    pub fn bye(board: u32, player_no: u32, result: Option<BoardResult>) -> Self {
        Self {
            board,
            white_no: player_no,
            black_no: 0,
            result,
            is_bye: true,
        }
    }

    /// Start number of the player receiving a bye on this board
    pub fn bye_player(&self) -> u32 {
        if self.white_no != 0 {
            self.white_no
        } else {
            self.black_no
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Round {
    #[serde(default)]
    pub number: u32,
    #[serde(default)]
    pub pairings: Vec<RoundPairing>,
}

impl Round {
    pub fn new(number: u32, pairings: Vec<RoundPairing>) -> Self {
        Self { number, pairings }
    }

    /// A round counts only when at least one game was actually paired
    pub fn is_well_formed(&self) -> bool {
        self.pairings.iter().any(|p| !p.is_bye)
    }

    /// Start numbers seated at a non-bye board
    pub fn participants(&self) -> impl Iterator<Item = u32> + '_ {
        self.pairings
            .iter()
            .filter(|p| !p.is_bye)
            .flat_map(|p| [p.white_no, p.black_no])
            .filter(|&no| no > 0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub completed_rounds: u32,
    #[serde(default)]
    pub total_rounds: u32,
}

impl TournamentInfo {
    pub fn new(name: impl Into<String>, completed_rounds: u32, total_rounds: u32) -> Self {
        Self {
            name: name.into(),
            id: String::new(),
            completed_rounds,
            total_rounds,
        }
    }

    pub fn next_round(&self) -> u32 {
        self.completed_rounds + 1
    }

    pub fn is_complete(&self) -> bool {
        self.total_rounds > 0 && self.completed_rounds >= self.total_rounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_round_trips_through_decimal() {
        let score: Score = serde_json::from_str("2.5").unwrap();
        assert_eq!(score.half_points(), 5);
        assert_eq!(score.to_string(), "2.5");
        assert_eq!(serde_json::to_string(&score).unwrap(), "2.5");
        assert_eq!(Score::from(-1.0), Score::ZERO);
    }

    #[test]
    fn player_history_parses_sparse_rounds() {
        let json = r#"{
            "startNo": 7, "name": "Kowalski", "rating": 1850, "currentScore": 1.5,
            "opponents": {"1": 3, "3": 0},
            "colors": {"1": "W", "3": "-"},
            "results": {"1": "½", "3": "1"},
            "hadBye": true, "byeRounds": [3]
        }"#;
        let player: Player = serde_json::from_str(json).unwrap();

        assert_eq!(player.opponents.get(&2), None);
        assert_eq!(player.opponents.get(&3), Some(&0));
        assert_eq!(player.colors.get(&1), Some(&Color::White));
        assert_eq!(player.score_through(3), Score::from(1.5));
        assert_eq!(player.color_counts(), (1, 0));
    }

    #[test]
    fn bye_is_never_a_played_opponent() {
        let mut player = Player::new(1, "A", 0);
        player.opponents.insert(1, 0);
        player.opponents.insert(2, 5);

        assert!(!player.has_played(0));
        assert!(player.has_played(5));
        assert!(!player.can_play(&Player::new(5, "B", 0)));
        assert!(!player.can_play(&Player::new(1, "A", 0)));
    }

    #[test]
    fn last_round_with_color_tracks_most_recent() {
        let mut player = Player::new(1, "A", 0);
        player.colors.insert(1, Color::White);
        player.colors.insert(2, Color::Black);
        player.colors.insert(3, Color::White);

        assert_eq!(player.last_round_with(Color::White), 3);
        assert_eq!(player.last_round_with(Color::Black), 2);
        assert_eq!(player.color_imbalance(), 1);
    }

    #[test]
    fn board_results_map_to_both_sides() {
        assert_eq!(BoardResult::WhiteForfeitWin.for_black(), GameResult::Loss);
        assert_eq!(BoardResult::Draw.for_black(), GameResult::Draw);
        assert!(BoardResult::BlackForfeitWin.is_forfeit());
        let parsed: BoardResult = serde_json::from_str(r#""1/2-1/2""#).unwrap();
        assert_eq!(parsed, BoardResult::Draw);
    }
}
