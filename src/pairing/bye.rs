use std::cmp::Reverse;

use crate::domain::Player;

/// Player receiving the bye in an odd pool.
///
/// Lowest score first and, within a score, the highest start number. A
/// player who already had a bye is passed over unless everyone has had one.
pub fn select_bye<'a>(pool: &[&'a Player]) -> Option<&'a Player> {
    let mut order: Vec<&'a Player> = pool.to_vec();
    order.sort_by_key(|p| (p.current_score, Reverse(p.start_no)));

    order
        .iter()
        .find(|p| !p.had_bye)
        .or_else(|| order.first())
        .copied()
}
