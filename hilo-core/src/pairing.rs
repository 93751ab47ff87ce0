//! Round pairing: pick two items whose values sit in a streak-derived
//! difficulty band.
//!
//! Difficulty is the ratio `min / max` of the two fact values: a ratio near 1
//! means the values are close (a hard call), near 0 means they are far apart
//! (an easy one). The search prefers items the session has not shown yet and
//! widens the target band before it ever gives up; only a pool without two
//! usable items at all is an error.

use crate::catalog::{Category, Item, ItemId};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

/// How far the band grows per widening pass, on each side.
const WIDEN_STEP: f64 = 0.1;

/// Widening passes attempted before falling back to the full pair set.
const MAX_WIDENINGS: u32 = 3;

/// Absolute ceiling for the widened upper bound.
const RATIO_CEILING: f64 = 0.95;

/// Error type for pair selection.
#[derive(Debug, Error)]
pub enum PairingError {
    #[error(
        "category '{category}' has {eligible} eligible item(s) in a pool of {pool_size}, need at least 2"
    )]
    NotEnoughEligibleItems {
        category: String,
        eligible: usize,
        pool_size: usize,
    },
}

/// Difficulty band derived from the current streak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyBand {
    Easy,
    Medium,
    Hard,
}

impl DifficultyBand {
    /// Band for a streak: easy through 2, medium through 5, hard from 6 on.
    pub fn for_streak(streak: u32) -> Self {
        match streak {
            0..=2 => DifficultyBand::Easy,
            3..=5 => DifficultyBand::Medium,
            _ => DifficultyBand::Hard,
        }
    }

    /// Target ratio range `(min, max)`, inclusive on both ends.
    pub fn ratio_range(&self) -> (f64, f64) {
        match self {
            DifficultyBand::Easy => (0.0, 0.35),
            DifficultyBand::Medium => (0.25, 0.65),
            DifficultyBand::Hard => (0.55, 0.85),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DifficultyBand::Easy => "easy",
            DifficultyBand::Medium => "medium",
            DifficultyBand::Hard => "hard",
        }
    }
}

impl fmt::Display for DifficultyBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Ratio of two fact values: `min / max`, in (0, 1] for positive values.
pub fn pair_ratio(a: f64, b: f64) -> f64 {
    if a <= b {
        a / b
    } else {
        b / a
    }
}

/// Select the next round's pair using a thread-local RNG.
///
/// See [`select_pair_with_rng`] for the selection rules.
pub fn select_pair(
    pool: &[Item],
    category: &Category,
    streak: u32,
    history: &HashSet<ItemId>,
) -> Result<(Item, Item), PairingError> {
    select_pair_with_rng(pool, category, streak, history, &mut rand::thread_rng())
}

/// Select the next round's pair with a specific RNG (useful for testing).
///
/// Both returned items carry a fact for `category.metric_key` and have
/// distinct ids. Items whose ids appear in `history` are excluded unless
/// that would leave fewer than two candidates, in which case the history
/// exclusion is dropped entirely for this call. The pair's value ratio is
/// drawn from the streak's difficulty band, widened by 0.1 per side up to
/// three times (lower bound clamped to 0, upper to 0.95); if no pair ever
/// lands in the widened band, any
/// candidate pair qualifies. The winning pair is chosen uniformly, and a
/// 50/50 draw decides which item is the anchor.
pub fn select_pair_with_rng<R: Rng>(
    pool: &[Item],
    category: &Category,
    streak: u32,
    history: &HashSet<ItemId>,
    rng: &mut R,
) -> Result<(Item, Item), PairingError> {
    // Items usable for this category's metric, deduplicated by id.
    let mut seen: HashSet<ItemId> = HashSet::new();
    let mut eligible: Vec<(&Item, f64)> = Vec::new();
    for item in pool {
        if let Some(value) = item.metric_value(&category.metric_key) {
            if seen.insert(item.id.clone()) {
                eligible.push((item, value));
            }
        }
    }

    if eligible.len() < 2 {
        return Err(PairingError::NotEnoughEligibleItems {
            category: category.id.clone(),
            eligible: eligible.len(),
            pool_size: pool.len(),
        });
    }

    // Prefer items the session has not shown yet; a starved search drops the
    // history exclusion rather than failing.
    let fresh: Vec<(&Item, f64)> = eligible
        .iter()
        .copied()
        .filter(|(item, _)| !history.contains(&item.id))
        .collect();
    let candidates = if fresh.len() >= 2 { fresh } else { eligible };

    // All unordered candidate pairs with their value ratios.
    let mut pairs: Vec<(usize, usize, f64)> = Vec::new();
    for i in 0..candidates.len() {
        for j in (i + 1)..candidates.len() {
            pairs.push((i, j, pair_ratio(candidates[i].1, candidates[j].1)));
        }
    }

    let (band_min, band_max) = DifficultyBand::for_streak(streak).ratio_range();
    let mut in_band: Vec<&(usize, usize, f64)> = Vec::new();
    for widen in 0..=MAX_WIDENINGS {
        let step = WIDEN_STEP * f64::from(widen);
        let lo = (band_min - step).max(0.0);
        let hi = (band_max + step).min(RATIO_CEILING);
        in_band = pairs
            .iter()
            .filter(|&&(_, _, ratio)| ratio >= lo && ratio <= hi)
            .collect();
        if !in_band.is_empty() {
            break;
        }
    }

    let &(first, second, _) = if in_band.is_empty() {
        &pairs[rng.gen_range(0..pairs.len())]
    } else {
        in_band[rng.gen_range(0..in_band.len())]
    };

    // Randomize which item's value the player sees first.
    let (anchor, challenger) = if rng.gen_bool(0.5) {
        (candidates[first].0, candidates[second].0)
    } else {
        (candidates[second].0, candidates[first].0)
    };
    Ok((anchor.clone(), challenger.clone()))
}
