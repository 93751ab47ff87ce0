//! Round-pairing and difficulty-progression engine for a "higher or lower"
//! trivia game.
//!
//! Players compare two items (foods, countries, movies...) on a numeric
//! metric and guess whether the challenger's value is higher or lower than
//! the shown anchor value, building a streak. This crate provides:
//! - The pairing engine: picks a fair pair for the next round, with a
//!   streak-derived difficulty band over the ratio of the two values, a
//!   widening search fallback, and session-history exclusion
//! - The round state machine: a pure reducer driving
//!   start → comparing → revealing → next round / game over
//!
//! Persistence, external fact ingestion, and rendering live elsewhere; the
//! engine consumes an item pool and a category descriptor and hands decisions
//! back to the presentation layer.
//!
//! # Quick Start
//!
//! ```ignore
//! use hilo_core::{reduce, select_pair, Action, GameState};
//!
//! let pool = pool_provider.items()?;        // external collaborator
//! let category = pool_provider.categories()?[0].clone();
//!
//! let mut state = GameState::initial();
//! let pair = select_pair(&pool, &category, state.streak, &state.history)?;
//! state = reduce(&state, Action::StartGame { category, pair });
//! // ...dispatch Choose / RevealComplete / NextRound as the player plays.
//! ```

pub mod catalog;
pub mod game;
pub mod pairing;

// Primary public API
pub use catalog::{Category, Fact, Item, ItemId, ValueFormatter};
pub use game::{reduce, Action, Choice, GameState, Phase};
pub use pairing::{pair_ratio, select_pair, select_pair_with_rng, DifficultyBand, PairingError};
