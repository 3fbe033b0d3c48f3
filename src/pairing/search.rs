use log::debug;
use std::collections::HashSet;
use std::ops::ControlFlow;

use crate::config::PairingSettings;

use super::{Candidate, Entrant, color};

/// One assignment of S2 onto S1 and what it costs
#[derive(Debug, Clone)]
pub struct Attempt<'a> {
    pub pairs: Vec<Candidate<'a>>,
    pub unpaired: Vec<Entrant<'a>>,
    pub conflicts: usize,
    pub color_cost: u64,
    pub penalty: u64,
}

impl<'a> Attempt<'a> {
    fn unmatched(s1: &[Entrant<'a>], s2: &[Entrant<'a>]) -> Self {
        Self {
            pairs: Vec::new(),
            unpaired: s1.iter().chain(s2).copied().collect(),
            conflicts: 0,
            color_cost: 0,
            penalty: 0,
        }
    }
}

/// Result of pairing downfloaters into the next bracket
#[derive(Debug, Clone)]
pub struct HeterogeneousOutcome<'a> {
    pub pairs: Vec<Candidate<'a>>,
    /// Natives left for the bracket's own pairing, by start number
    pub remaining_natives: Vec<Entrant<'a>>,
    pub unpaired_floaters: Vec<Entrant<'a>>,
}

pub struct BracketSearch<'s> {
    settings: &'s PairingSettings,
}

impl<'s> BracketSearch<'s> {
    pub fn new(settings: &'s PairingSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &PairingSettings {
        self.settings
    }

    /// Cost of seating `a` against `b`: a repeat pairing dominates any color conflict
    pub fn pair_cost(&self, a: &Entrant<'_>, b: &Entrant<'_>) -> u64 {
        if a.can_play(b) {
            color::conflict_cost(a, b, self.settings)
        } else {
            self.settings.repeat_penalty
        }
    }

    /// Pair `s1[i]` with `s2[i]`; illegal positions and surplus players stay unpaired
    pub fn try_pairing<'a>(&self, s1: &[Entrant<'a>], s2: &[Entrant<'a>]) -> Attempt<'a> {
        let count = s1.len().min(s2.len());
        let mut attempt = Attempt {
            pairs: Vec::with_capacity(count),
            unpaired: Vec::new(),
            conflicts: 0,
            color_cost: 0,
            penalty: 0,
        };

        for (a, b) in s1.iter().zip(s2) {
            if a.can_play(b) {
                attempt.pairs.push(Candidate::new(*a, *b));
                attempt.color_cost += color::conflict_cost(a, b, self.settings);
            } else {
                attempt.conflicts += 1;
                attempt.unpaired.push(*a);
                attempt.unpaired.push(*b);
            }
        }
        attempt.unpaired.extend_from_slice(&s1[count..]);
        attempt.unpaired.extend_from_slice(&s2[count..]);

        attempt.penalty = attempt.conflicts as u64 * self.settings.repeat_penalty + attempt.color_cost;
        attempt
    }

    /// Lowest-penalty assignment of S2 onto S1.
    ///
    /// The identity order is tried first. Small halves are searched
    /// exhaustively (bounded by `max_permutations`); larger ones run a
    /// swap-based local search that is not guaranteed to be optimal.
    pub fn best_assignment<'a>(&self, s1: &[Entrant<'a>], s2: &[Entrant<'a>]) -> Attempt<'a> {
        let count = s1.len().min(s2.len());
        if count == 0 {
            return Attempt::unmatched(s1, s2);
        }

        let direct = self.try_pairing(s1, s2);
        if direct.penalty == 0 {
            return direct;
        }

        if count <= self.settings.exhaustive_limit {
            self.exhaustive(s1, s2, direct)
        } else {
            debug!("Local search over halves of {} and {}", s1.len(), s2.len());
            self.local_search(s1, s2, direct)
        }
    }

    /// Every order of S2 against S1. When S2 is longer, each choice of the
    /// S2 members that sit out is searched on its own.
    fn exhaustive<'a>(&self, s1: &[Entrant<'a>], s2: &[Entrant<'a>], direct: Attempt<'a>) -> Attempt<'a> {
        let count = s1.len().min(s2.len());
        let mut best_penalty = direct.penalty;
        let mut best_order: Option<Vec<usize>> = None;

        for_each_combination(s2.len(), count, self.settings.max_combinations, |picked| {
            for_each_permutation(count, self.settings.max_permutations, |order| {
                let penalty = self.ordered_penalty(s1, s2, picked, order);
                if penalty < best_penalty {
                    best_penalty = penalty;
                    best_order = Some(order.iter().map(|&j| picked[j]).collect());
                    if penalty == 0 {
                        return ControlFlow::Break(());
                    }
                }
                ControlFlow::Continue(())
            });
            if best_penalty == 0 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });

        match best_order {
            Some(order) => {
                let mut permuted: Vec<Entrant<'a>> = order.iter().map(|&i| s2[i]).collect();
                permuted.extend(
                    s2.iter()
                        .enumerate()
                        .filter(|(i, _)| !order.contains(i))
                        .map(|(_, e)| *e),
                );
                self.try_pairing(s1, &permuted)
            }
            None => direct,
        }
    }

    fn ordered_penalty(&self, s1: &[Entrant<'_>], s2: &[Entrant<'_>], picked: &[usize], order: &[usize]) -> u64 {
        s1.iter()
            .zip(order)
            .map(|(a, &j)| self.pair_cost(a, &s2[picked[j]]))
            .sum()
    }

    /// Left-to-right passes; a swap at position `i` is taken only when it lowers
    /// the total penalty and does not create a repeat pairing at the other position.
    fn local_search<'a>(&self, s1: &[Entrant<'a>], s2: &[Entrant<'a>], direct: Attempt<'a>) -> Attempt<'a> {
        let count = s1.len().min(s2.len());
        let mut order: Vec<Entrant<'a>> = s2.to_vec();
        let mut best = direct;
        let passes = (count * self.settings.swap_passes_factor).max(1);

        for _ in 0..passes {
            let mut swapped = false;

            for i in 0..count {
                if self.pair_cost(&s1[i], &order[i]) == 0 {
                    continue;
                }

                let mut chosen: Option<(usize, Attempt<'a>)> = None;
                for j in swap_candidates(i, order.len()) {
                    if !s1[i].can_play(&order[j]) {
                        continue;
                    }
                    if j < count && s1[j].can_play(&order[j]) && !s1[j].can_play(&order[i]) {
                        continue;
                    }

                    order.swap(i, j);
                    let attempt = self.try_pairing(s1, &order);
                    order.swap(i, j);

                    let to_beat = chosen.as_ref().map_or(best.penalty, |(_, a)| a.penalty);
                    if attempt.penalty < to_beat {
                        chosen = Some((j, attempt));
                    }
                }

                if let Some((j, attempt)) = chosen {
                    order.swap(i, j);
                    best = attempt;
                    swapped = true;
                }
            }

            if !swapped || best.penalty == 0 {
                break;
            }
        }

        best
    }

    /// Pair downfloaters (S1 side) against the natives of the next bracket.
    ///
    /// With few floaters and a small native pool every combination of natives
    /// is tried; otherwise the floaters face the first natives by start number.
    pub fn pair_heterogeneous<'a>(
        &self,
        floaters: &[Entrant<'a>],
        natives: &[Entrant<'a>],
    ) -> HeterogeneousOutcome<'a> {
        let mut floaters = floaters.to_vec();
        floaters.sort_by_key(|e| (std::cmp::Reverse(e.score()), e.start_no()));
        let mut natives = natives.to_vec();
        natives.sort_by_key(|e| e.start_no());

        let wanted = floaters.len().min(natives.len());
        let pool_size = natives
            .len()
            .min(floaters.len() + self.settings.heterogeneous_extra_natives);

        let attempt = if floaters.len() <= self.settings.heterogeneous_max_floaters
            && pool_size <= self.settings.heterogeneous_max_natives
        {
            self.best_over_combinations(&floaters, &natives[..pool_size], wanted)
        } else {
            self.best_assignment(&floaters, &natives[..wanted])
        };

        let used: HashSet<u32> = attempt
            .pairs
            .iter()
            .flat_map(|c| [c.first.start_no(), c.second.start_no()])
            .collect();

        HeterogeneousOutcome {
            remaining_natives: natives
                .into_iter()
                .filter(|e| !used.contains(&e.start_no()))
                .collect(),
            unpaired_floaters: floaters
                .into_iter()
                .filter(|e| !used.contains(&e.start_no()))
                .collect(),
            pairs: attempt.pairs,
        }
    }

    fn best_over_combinations<'a>(
        &self,
        floaters: &[Entrant<'a>],
        candidates: &[Entrant<'a>],
        size: usize,
    ) -> Attempt<'a> {
        let mut best: Option<Attempt<'a>> = None;
        let mut combo: Vec<Entrant<'a>> = Vec::with_capacity(size);

        for_each_combination(candidates.len(), size, self.settings.max_combinations, |picked| {
            combo.clear();
            combo.extend(picked.iter().map(|&i| candidates[i]));

            let attempt = self.best_assignment(floaters, &combo);
            if best.as_ref().is_none_or(|b| attempt.penalty < b.penalty) {
                let done = attempt.penalty == 0;
                best = Some(attempt);
                if done {
                    return ControlFlow::Break(());
                }
            }
            ControlFlow::Continue(())
        });

        best.unwrap_or_else(|| Attempt::unmatched(floaters, &[]))
    }
}

/// Forward positions first, nearest first, then backward
fn swap_candidates(i: usize, len: usize) -> impl Iterator<Item = usize> {
    (i + 1..len).chain((0..i).rev())
}

/// Visit permutations of `0..n` (Heap's algorithm), at most `limit` of them
pub(crate) fn for_each_permutation(n: usize, limit: usize, mut visit: impl FnMut(&[usize]) -> ControlFlow<()>) {
    let mut items: Vec<usize> = (0..n).collect();
    let mut counters = vec![0usize; n];
    let mut visited = 1;
    if visit(&items).is_break() || visited >= limit {
        return;
    }

    let mut i = 1;
    while i < n {
        if counters[i] < i {
            if i % 2 == 0 {
                items.swap(0, i);
            } else {
                items.swap(counters[i], i);
            }
            visited += 1;
            if visit(&items).is_break() || visited >= limit {
                return;
            }
            counters[i] += 1;
            i = 1;
        } else {
            counters[i] = 0;
            i += 1;
        }
    }
}

/// Visit `k`-element index combinations of `0..n` in lexicographic order, at most `limit`
pub(crate) fn for_each_combination(
    n: usize,
    k: usize,
    limit: usize,
    mut visit: impl FnMut(&[usize]) -> ControlFlow<()>,
) {
    if k > n {
        return;
    }
    let mut picked: Vec<usize> = (0..k).collect();
    let mut visited = 0;

    loop {
        visited += 1;
        if visit(&picked).is_break() || visited >= limit {
            return;
        }
        let Some(i) = (0..k).rev().find(|&i| picked[i] < n - k + i) else {
            return;
        };
        picked[i] += 1;
        for j in i + 1..k {
            picked[j] = picked[j - 1] + 1;
        }
    }
}
