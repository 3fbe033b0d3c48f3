use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use super::models::{Color, GameResult, Player, Round, TournamentInfo};
use crate::errors::PredictionError;

/// Players and round history for one prediction request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentState {
    pub tournament: TournamentInfo,
    pub players: BTreeMap<u32, Player>,
    #[serde(default)]
    pub rounds: BTreeMap<u32, Round>,
}

/// Start numbers allowed into the round being paired
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EligiblePool(BTreeSet<u32>);

impl EligiblePool {
    pub fn contains(&self, start_no: u32) -> bool {
        self.0.contains(&start_no)
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<u32> for EligiblePool {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        EligiblePool(iter.into_iter().collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueKind {
    UnknownOpponent,
    MissingReturnEntry,
    SameColor,
    ResultMismatch,
}

/// A history entry that breaks the opponent/color/result symmetry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryIssue {
    pub start_no: u32,
    pub round: u32,
    pub opponent: u32,
    pub kind: IssueKind,
}

impl fmt::Display for HistoryIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = match self.kind {
            IssueKind::UnknownOpponent => "opponent is not registered",
            IssueKind::MissingReturnEntry => "opponent does not list this player back",
            IssueKind::SameColor => "both players recorded the same color",
            IssueKind::ResultMismatch => "results are not complementary",
        };
        write!(
            f,
            "player {} round {} vs {}: {}",
            self.start_no, self.round, self.opponent, what
        )
    }
}

impl TournamentState {
    pub fn new(
        tournament: TournamentInfo,
        players: impl IntoIterator<Item = Player>,
        rounds: impl IntoIterator<Item = Round>,
    ) -> Self {
        Self {
            tournament,
            players: players.into_iter().map(|p| (p.start_no, p)).collect(),
            rounds: rounds.into_iter().map(|r| (r.number, r)).collect(),
        }
    }

    /// Build player histories and scores from the published round tables.
    ///
    /// Rounds without a single paired game (byes published ahead of the
    /// pairing) are discarded before any history is recorded.
    pub fn from_rounds(
        tournament: TournamentInfo,
        roster: impl IntoIterator<Item = Player>,
        rounds: impl IntoIterator<Item = Round>,
    ) -> Self {
        let (rounds, discarded): (Vec<Round>, Vec<Round>) = rounds.into_iter().partition(Round::is_well_formed);
        if !discarded.is_empty() {
            warn!(
                "Discarded rounds {:?} without any paired game",
                discarded.iter().map(|r| r.number).collect::<Vec<_>>()
            );
        }
        let mut state = Self::new(tournament, roster, rounds);
        for player in state.players.values_mut() {
            player.opponents.clear();
            player.colors.clear();
            player.results.clear();
            player.had_bye = false;
            player.bye_rounds.clear();
        }

        for (&number, round) in &state.rounds {
            for pairing in &round.pairings {
                if pairing.is_bye {
                    if let Some(player) = state.players.get_mut(&pairing.bye_player()) {
                        let result = pairing.result.map_or(GameResult::Win, |r| r.for_white());
                        player.opponents.insert(number, 0);
                        player.colors.insert(number, Color::None);
                        player.results.insert(number, result);
                        player.had_bye = true;
                        player.bye_rounds.push(number);
                    }
                    continue;
                }

                let forfeit = pairing.result.is_some_and(|r| r.is_forfeit());
                if let Some(white) = state.players.get_mut(&pairing.white_no) {
                    white.opponents.insert(number, pairing.black_no);
                    white.colors.insert(number, if forfeit { Color::None } else { Color::White });
                    if let Some(result) = pairing.result {
                        white.results.insert(number, result.for_white());
                    }
                }
                if let Some(black) = state.players.get_mut(&pairing.black_no) {
                    black.opponents.insert(number, pairing.white_no);
                    black.colors.insert(number, if forfeit { Color::None } else { Color::Black });
                    if let Some(result) = pairing.result {
                        black.results.insert(number, result.for_black());
                    }
                }
            }
        }

        for player in state.players.values_mut() {
            player.current_score = player.score_through(u32::MAX);
        }
        state
    }

    pub fn validate(&self) -> Result<(), PredictionError> {
        let info = &self.tournament;
        if info.total_rounds > 0 && info.completed_rounds > info.total_rounds {
            return Err(PredictionError::InconsistentMetadata {
                completed: info.completed_rounds,
                total: info.total_rounds,
            });
        }
        Ok(())
    }

    /// Drop empty rounds and strip history entries that break symmetry
    pub fn normalized(mut self) -> Self {
        let before = self.rounds.len();
        self.rounds.retain(|_, round| round.is_well_formed());
        if self.rounds.len() < before {
            warn!("Discarded {} rounds without any paired game", before - self.rounds.len());
        }
        for (&number, round) in self.rounds.iter_mut() {
            round.number = number;
        }

        let issues = self.history_issues();
        for issue in &issues {
            warn!("Ignoring inconsistent history: {}", issue);
            if let Some(player) = self.players.get_mut(&issue.start_no) {
                player.forget_round(issue.round);
                player.current_score = player.score_through(u32::MAX);
            }
        }
        self
    }

    pub fn history_issues(&self) -> Vec<HistoryIssue> {
        let mut issues = Vec::new();
        for player in self.players.values() {
            for (&round, &opponent) in &player.opponents {
                if opponent == 0 {
                    continue;
                }
                if let Some(kind) = self.symmetry_issue(player, round, opponent) {
                    issues.push(HistoryIssue {
                        start_no: player.start_no,
                        round,
                        opponent,
                        kind,
                    });
                }
            }
        }
        issues
    }

    fn symmetry_issue(&self, player: &Player, round: u32, opponent: u32) -> Option<IssueKind> {
        let Some(other) = self.players.get(&opponent) else {
            return Some(IssueKind::UnknownOpponent);
        };
        if other.opponents.get(&round) != Some(&player.start_no) {
            return Some(IssueKind::MissingReturnEntry);
        }
        if let (Some(&mine), Some(&theirs)) = (player.colors.get(&round), other.colors.get(&round)) {
            if mine.is_played() && mine == theirs {
                return Some(IssueKind::SameColor);
            }
        }
        if let (Some(&mine), Some(&theirs)) = (player.results.get(&round), other.results.get(&round)) {
            if mine.complement() != theirs {
                return Some(IssueKind::ResultMismatch);
            }
        }
        None
    }

    pub fn player(&self, start_no: u32) -> Option<&Player> {
        self.players.get(&start_no)
    }

    /// Players who sat at a game board in the given round, if it was published
    pub fn actual_pool(&self, round: u32) -> Option<EligiblePool> {
        self.rounds
            .get(&round)
            .map(|r| r.participants().collect())
    }

    /// Players considered for the next pairing, in start-number order
    pub fn eligible_players(&self, pool: Option<&EligiblePool>) -> Vec<&Player> {
        self.players
            .values()
            .filter(|p| pool.is_none_or(|pool| pool.contains(p.start_no)))
            .collect()
    }
}
