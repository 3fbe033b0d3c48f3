use crate::config::PairingSettings;
use crate::domain::{Color, Player};

use super::Entrant;

/// How hard a player is pulled towards a color
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PreferenceStrength {
    /// Plain alternation from the last game
    Mild,
    /// Whites and blacks are out of balance
    Strong,
    /// The last two games had the same color
    Absolute,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorPreference {
    pub color: Color,
    pub strength: PreferenceStrength,
}

impl ColorPreference {
    fn new(color: Color, strength: PreferenceStrength) -> Self {
        Self { color, strength }
    }
}

/// Due color for the next game, `None` before the first game over the board
pub fn preference(player: &Player) -> Option<ColorPreference> {
    let history: Vec<Color> = player.played_colors().collect();
    let last = *history.last()?;

    if history.len() >= 2 && history[history.len() - 2] == last {
        return Some(ColorPreference::new(last.opposite(), PreferenceStrength::Absolute));
    }

    let (whites, blacks) = player.color_counts();
    if whites > blacks {
        Some(ColorPreference::new(Color::Black, PreferenceStrength::Strong))
    } else if blacks > whites {
        Some(ColorPreference::new(Color::White, PreferenceStrength::Strong))
    } else {
        Some(ColorPreference::new(last.opposite(), PreferenceStrength::Mild))
    }
}

pub fn strength_weight(strength: PreferenceStrength, settings: &PairingSettings) -> u64 {
    match strength {
        PreferenceStrength::Absolute => settings.absolute_color_weight,
        PreferenceStrength::Strong => settings.strong_color_weight,
        PreferenceStrength::Mild => settings.mild_color_weight,
    }
}

/// Weight of the weaker preference when both players want the same color
pub fn conflict_cost(a: &Entrant<'_>, b: &Entrant<'_>, settings: &PairingSettings) -> u64 {
    match (a.preference, b.preference) {
        (Some(pa), Some(pb)) if pa.color == pb.color => {
            strength_weight(pa.strength, settings).min(strength_weight(pb.strength, settings))
        }
        _ => 0,
    }
}

/// Returns `(white, black)` for a pairing whose S1-side member is `first`
pub fn allocate<'a>(first: Entrant<'a>, second: Entrant<'a>, board: u32) -> (Entrant<'a>, Entrant<'a>) {
    match (first.preference, second.preference) {
        (None, None) => {
            let (higher, lower) = if first.start_no() < second.start_no() {
                (first, second)
            } else {
                (second, first)
            };
            if board % 2 == 1 { (higher, lower) } else { (lower, higher) }
        }
        (None, Some(wanted)) => gets(second, first, wanted.color),
        (Some(wanted), None) => gets(first, second, wanted.color),
        (Some(p1), Some(p2)) if p1.color != p2.color => gets(first, second, p1.color),
        (Some(shared), Some(_)) => {
            let (winner, loser) = if first_wins_tiebreak(&first, &second, shared.color) {
                (first, second)
            } else {
                (second, first)
            };
            gets(winner, loser, shared.color)
        }
    }
}

/// `chooser` receives `color`, `other` the opposite one
fn gets<'a>(chooser: Entrant<'a>, other: Entrant<'a>, color: Color) -> (Entrant<'a>, Entrant<'a>) {
    if color == Color::White {
        (chooser, other)
    } else {
        (other, chooser)
    }
}

fn first_wins_tiebreak(first: &Entrant<'_>, second: &Entrant<'_>, color: Color) -> bool {
    let first_imbalance = first.player.color_imbalance();
    let second_imbalance = second.player.color_imbalance();
    if first_imbalance != second_imbalance {
        return first_imbalance > second_imbalance;
    }

    let first_last = first.player.last_round_with(color);
    let second_last = second.player.last_round_with(color);
    if first_last != second_last {
        return first_last < second_last;
    }

    true
}
