use log::debug;

use super::Entrant;
use super::color;
use super::score_groups::split_halves;
use super::search::BracketSearch;

/// Index of the player to float out of an odd bracket.
///
/// Candidates come from the bottom of the bracket. Each is scored by how
/// well the rest of the bracket pairs without them, weighted above how
/// easily they fit into the next bracket. Ties keep the lowest-ranked one.
pub fn select_downfloater(search: &BracketSearch<'_>, group: &[Entrant<'_>], next: &[Entrant<'_>]) -> usize {
    let count = group.len();
    let Some(last) = count.checked_sub(1) else {
        return 0;
    };
    let settings = search.settings();
    let first_candidate = (count / 2).max(count.saturating_sub(settings.downfloat_window));

    let mut chosen = last;
    let mut best_total = u64::MAX;

    for index in (first_candidate..count).rev() {
        let remaining: Vec<Entrant<'_>> = group
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, e)| *e)
            .collect();
        let (s1, s2) = split_halves(&remaining);
        let current = search.best_assignment(s1, s2).penalty;
        let lookahead = next_bracket_fit(search, &group[index], next);

        let total = current
            .saturating_mul(settings.downfloat_current_weight)
            .saturating_add(lookahead);
        if total < best_total {
            best_total = total;
            chosen = index;
            if total == 0 {
                break;
            }
        }
    }

    debug!(
        "Downfloater {} chosen from bracket of {} (cost {})",
        group[chosen].start_no(),
        count,
        best_total
    );
    chosen
}

/// How well `candidate` would sit in the next bracket: the best native
/// partner's color cost plus what the natives left behind would cost to pair.
pub fn next_bracket_fit(search: &BracketSearch<'_>, candidate: &Entrant<'_>, next: &[Entrant<'_>]) -> u64 {
    if next.is_empty() {
        return 0;
    }
    let settings = search.settings();

    let mut natives = next.to_vec();
    natives.sort_by_key(|e| e.start_no());

    let mut best: Option<u64> = None;
    for (index, native) in natives.iter().enumerate() {
        if !candidate.can_play(native) {
            continue;
        }

        let remaining: Vec<Entrant<'_>> = natives
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, e)| *e)
            .collect();
        let half = remaining.len() / 2;
        let rest = if half > 0 {
            let upper = (2 * half).min(remaining.len());
            search.best_assignment(&remaining[..half], &remaining[half..upper]).penalty
        } else {
            0
        };

        let total = color::conflict_cost(candidate, native, settings) * settings.lookahead_color_weight + rest;
        if best.is_none_or(|b| total < b) {
            best = Some(total);
            if total == 0 {
                break;
            }
        }
    }

    best.unwrap_or(settings.lookahead_no_partner_penalty)
}
