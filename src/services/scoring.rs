//! Per-recipe ingredient coverage.
//!
//! Every line with a catalogue ingredient counts, required or optional; lines
//! without an ingredient id never affect the score.

use crate::models::recipe::IngredientLine;
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchScore {
    pub matched: usize,
    pub total: usize,
    pub percentage: u8,
    pub missing: Vec<IngredientLine>,
}

/// `round(matched / total * 100)`, 0 when `total` is 0. Halves round up.
#[must_use]
pub fn match_percentage(matched: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let matched = matched.min(total);
    u8::try_from((matched * 200 + total) / (total * 2)).unwrap_or(100)
}

#[must_use]
pub fn score(lines: &[IngredientLine], held: &HashSet<i32>) -> MatchScore {
    let (covered, missing): (Vec<&IngredientLine>, Vec<&IngredientLine>) = lines
        .iter()
        .filter(|line| line.ingredient_id.is_some())
        .partition(|line| line.ingredient_id.is_some_and(|id| held.contains(&id)));

    let matched = covered.len();
    let total = matched + missing.len();

    MatchScore {
        matched,
        total,
        percentage: match_percentage(matched, total),
        missing: missing.into_iter().cloned().collect(),
    }
}
