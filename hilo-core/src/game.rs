//! Round progression state machine.
//!
//! A pure reducer over [`GameState`]: every transition returns a fresh state
//! value, and an action that is not valid in the current phase leaves the
//! state unchanged. The external driver owns everything else — it computes
//! pairs (via [`crate::pairing`]) and judges correctness before dispatching,
//! and it decides when the reveal animation has finished. The reducer itself
//! never draws randomness and never fails.

use crate::catalog::{Category, Item, ItemId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Phase of the round state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// No game running; the only phase where `current_pair` is absent.
    Start,
    /// Waiting for the player's higher/lower guess.
    Comparing,
    /// Guess locked in; the driver reveals the challenger's value.
    Revealing,
    /// A wrong guess ended the game; the fatal streak is kept for display.
    GameOver,
}

/// The player's guess about the challenger's value relative to the anchor's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Choice {
    Higher,
    Lower,
}

impl Choice {
    /// Whether this guess is correct for the given values.
    ///
    /// Ties count as correct in both directions.
    pub fn is_correct(&self, anchor_value: f64, challenger_value: f64) -> bool {
        match self {
            Choice::Higher => challenger_value >= anchor_value,
            Choice::Lower => challenger_value <= anchor_value,
        }
    }
}

/// Events the driver dispatches into the reducer.
#[derive(Debug, Clone)]
pub enum Action {
    /// Begin a game with a category and the first pair.
    StartGame { category: Category, pair: (Item, Item) },
    /// Lock in the player's guess for the current round.
    Choose { choice: Choice },
    /// The reveal finished and the driver has judged the guess.
    ///
    /// A correct guess bumps the streak but stays in [`Phase::Revealing`];
    /// the driver dispatches [`Action::NextRound`] once it has the next pair.
    /// This two-step advance lets a UI finish its reveal animation before the
    /// cards swap.
    RevealComplete { is_correct: bool },
    /// Swap in the next round's pair after a correct guess.
    NextRound { pair: (Item, Item) },
    /// Return to the start screen after a loss.
    Reset,
    /// Abandon the game from any phase.
    Quit,
}

/// Full session state, owned by the caller and changed only through
/// [`reduce`].
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub phase: Phase,
    /// `(anchor, challenger)` for the current round; absent before a game
    /// starts. The two items always have distinct ids.
    pub current_pair: Option<(Item, Item)>,
    /// Active category; absent only in [`Phase::Start`].
    pub category: Option<Category>,
    /// Consecutive correct guesses this game.
    pub streak: u32,
    /// Best streak achieved this session; survives `Reset` and `Quit`.
    pub record: u32,
    /// Pending guess for the current round.
    pub choice: Option<Choice>,
    /// Ids already shown this game, so rounds avoid immediate repeats.
    pub history: HashSet<ItemId>,
}

impl GameState {
    /// State before any game has started.
    pub fn initial() -> Self {
        Self {
            phase: Phase::Start,
            current_pair: None,
            category: None,
            streak: 0,
            record: 0,
            choice: None,
            history: HashSet::new(),
        }
    }

    /// Whether the current game has ended on a wrong guess.
    pub fn is_game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    /// The item whose value is shown first.
    pub fn anchor(&self) -> Option<&Item> {
        self.current_pair.as_ref().map(|(anchor, _)| anchor)
    }

    /// The item the player guesses about.
    pub fn challenger(&self) -> Option<&Item> {
        self.current_pair.as_ref().map(|(_, challenger)| challenger)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::initial()
    }
}

/// Apply one action to the state, returning the successor state.
///
/// Total over all inputs: an action outside its phase is a no-op, and `Quit`
/// is accepted in every phase. A `StartGame`/`NextRound` pair whose two items
/// share an id would break the distinct-pair invariant, so the action is
/// ignored instead of applied.
pub fn reduce(state: &GameState, action: Action) -> GameState {
    match (state.phase, action) {
        (_, Action::Quit) => reset_to_start(state),

        (Phase::Start, Action::StartGame { category, pair }) => {
            if pair.0.id == pair.1.id {
                return state.clone();
            }
            let mut history = HashSet::new();
            history.insert(pair.0.id.clone());
            history.insert(pair.1.id.clone());
            GameState {
                phase: Phase::Comparing,
                current_pair: Some(pair),
                category: Some(category),
                streak: 0,
                record: state.record,
                choice: None,
                history,
            }
        }

        (Phase::Comparing, Action::Choose { choice }) => GameState {
            phase: Phase::Revealing,
            choice: Some(choice),
            ..state.clone()
        },

        (Phase::Revealing, Action::RevealComplete { is_correct }) => {
            if is_correct {
                let streak = state.streak + 1;
                GameState {
                    streak,
                    record: state.record.max(streak),
                    ..state.clone()
                }
            } else {
                // The streak stays at its pre-reveal value for display.
                GameState {
                    phase: Phase::GameOver,
                    ..state.clone()
                }
            }
        }

        (Phase::Revealing, Action::NextRound { pair }) => {
            if pair.0.id == pair.1.id {
                return state.clone();
            }
            let mut history = state.history.clone();
            history.insert(pair.0.id.clone());
            history.insert(pair.1.id.clone());
            GameState {
                phase: Phase::Comparing,
                current_pair: Some(pair),
                choice: None,
                history,
                ..state.clone()
            }
        }

        (Phase::GameOver, Action::Reset) => reset_to_start(state),

        _ => state.clone(),
    }
}

/// Back to the start screen: everything cleared except the session record.
fn reset_to_start(state: &GameState) -> GameState {
    GameState {
        record: state.record,
        ..GameState::initial()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Fact;
    use std::collections::HashMap;

    fn item(id: &str, calories: f64) -> Item {
        let mut facts = HashMap::new();
        facts.insert(
            "calories".to_string(),
            Fact {
                value: calories,
                unit: "kcal".to_string(),
                source: "test".to_string(),
                as_of: None,
            },
        );
        Item {
            id: ItemId::from(id),
            name: id.to_string(),
            facts,
        }
    }

    fn calories() -> Category {
        Category::new("cal", "Calories", "Which has more calories?", "calories")
    }

    fn pair(a: &str, b: &str) -> (Item, Item) {
        (item(a, 100.0), item(b, 400.0))
    }

    /// A state mid-game in the given phase.
    fn mid_game(phase: Phase, streak: u32, record: u32) -> GameState {
        let mut history: HashSet<ItemId> = HashSet::new();
        history.insert(ItemId::from("apple"));
        history.insert(ItemId::from("cheddar"));
        GameState {
            phase,
            current_pair: Some(pair("apple", "cheddar")),
            category: Some(calories()),
            streak,
            record,
            choice: None,
            history,
        }
    }

    #[test]
    fn test_initial_state() {
        let state = GameState::initial();
        assert_eq!(state.phase, Phase::Start);
        assert_eq!(state.streak, 0);
        assert_eq!(state.record, 0);
        assert!(state.current_pair.is_none());
        assert!(state.category.is_none());
        assert!(state.choice.is_none());
        assert!(state.history.is_empty());
        assert_eq!(state, GameState::default());
    }

    #[test]
    fn test_start_game() {
        let state = reduce(
            &GameState::initial(),
            Action::StartGame {
                category: calories(),
                pair: pair("apple", "cheddar"),
            },
        );
        assert_eq!(state.phase, Phase::Comparing);
        assert_eq!(state.streak, 0);
        assert!(state.choice.is_none());
        assert_eq!(state.history.len(), 2);
        assert!(state.history.contains(&ItemId::from("apple")));
        assert!(state.history.contains(&ItemId::from("cheddar")));
        assert_eq!(state.anchor().unwrap().id.as_str(), "apple");
        assert_eq!(state.challenger().unwrap().id.as_str(), "cheddar");
    }

    #[test]
    fn test_start_game_keeps_record() {
        let mut before = GameState::initial();
        before.record = 9;
        let state = reduce(
            &before,
            Action::StartGame {
                category: calories(),
                pair: pair("apple", "cheddar"),
            },
        );
        assert_eq!(state.record, 9);
        assert_eq!(state.streak, 0);
    }

    #[test]
    fn test_choose() {
        let state = reduce(
            &mid_game(Phase::Comparing, 0, 0),
            Action::Choose {
                choice: Choice::Higher,
            },
        );
        assert_eq!(state.phase, Phase::Revealing);
        assert_eq!(state.choice, Some(Choice::Higher));
    }

    #[test]
    fn test_reveal_correct_below_record() {
        let state = reduce(
            &mid_game(Phase::Revealing, 3, 5),
            Action::RevealComplete { is_correct: true },
        );
        assert_eq!(state.phase, Phase::Revealing);
        assert_eq!(state.streak, 4);
        assert_eq!(state.record, 5);
    }

    #[test]
    fn test_reveal_correct_beats_record() {
        let state = reduce(
            &mid_game(Phase::Revealing, 5, 5),
            Action::RevealComplete { is_correct: true },
        );
        assert_eq!(state.streak, 6);
        assert_eq!(state.record, 6);
    }

    #[test]
    fn test_reveal_wrong_ends_game() {
        let state = reduce(
            &mid_game(Phase::Revealing, 3, 5),
            Action::RevealComplete { is_correct: false },
        );
        assert_eq!(state.phase, Phase::GameOver);
        assert!(state.is_game_over());
        assert_eq!(state.streak, 3);
        assert_eq!(state.record, 5);
    }

    #[test]
    fn test_next_round_unions_history() {
        let before = mid_game(Phase::Revealing, 1, 1);
        let state = reduce(
            &before,
            Action::NextRound {
                // "apple" is already in the history; no duplicate results.
                pair: pair("apple", "walnuts"),
            },
        );
        assert_eq!(state.phase, Phase::Comparing);
        assert!(state.choice.is_none());
        assert_eq!(state.history.len(), 3);
        assert!(state.history.contains(&ItemId::from("apple")));
        assert!(state.history.contains(&ItemId::from("cheddar")));
        assert!(state.history.contains(&ItemId::from("walnuts")));
    }

    #[test]
    fn test_reset_preserves_record() {
        let state = reduce(&mid_game(Phase::GameOver, 7, 12), Action::Reset);
        assert_eq!(state.phase, Phase::Start);
        assert_eq!(state.record, 12);
        assert_eq!(state.streak, 0);
        assert!(state.current_pair.is_none());
        assert!(state.category.is_none());
        assert!(state.history.is_empty());
    }

    #[test]
    fn test_quit_from_any_phase_matches_reset() {
        let reset_shape = reduce(&mid_game(Phase::GameOver, 7, 12), Action::Reset);
        for phase in [
            Phase::Start,
            Phase::Comparing,
            Phase::Revealing,
            Phase::GameOver,
        ] {
            let state = reduce(&mid_game(phase, 7, 12), Action::Quit);
            assert_eq!(state, reset_shape, "quit from {phase:?} diverged");
        }
    }

    #[test]
    fn test_out_of_phase_actions_are_noops() {
        let comparing = mid_game(Phase::Comparing, 2, 4);
        assert_eq!(
            reduce(&comparing, Action::RevealComplete { is_correct: true }),
            comparing
        );
        assert_eq!(reduce(&comparing, Action::Reset), comparing);
        assert_eq!(
            reduce(
                &comparing,
                Action::NextRound {
                    pair: pair("x", "y")
                }
            ),
            comparing
        );

        let start = GameState::initial();
        assert_eq!(
            reduce(
                &start,
                Action::Choose {
                    choice: Choice::Lower
                }
            ),
            start
        );

        let revealing = mid_game(Phase::Revealing, 2, 4);
        assert_eq!(
            reduce(
                &revealing,
                Action::StartGame {
                    category: calories(),
                    pair: pair("x", "y"),
                }
            ),
            revealing
        );
    }

    #[test]
    fn test_degenerate_pair_rejected() {
        let start = GameState::initial();
        let same = (item("twin", 1.0), item("twin", 2.0));
        assert_eq!(
            reduce(
                &start,
                Action::StartGame {
                    category: calories(),
                    pair: same.clone(),
                }
            ),
            start
        );

        let revealing = mid_game(Phase::Revealing, 2, 4);
        assert_eq!(
            reduce(&revealing, Action::NextRound { pair: same }),
            revealing
        );
    }

    #[test]
    fn test_streak_never_exceeds_record_after_reveal() {
        let mut state = mid_game(Phase::Revealing, 0, 0);
        for _ in 0..10 {
            // A correct reveal stays in Revealing, so this chains directly.
            state = reduce(&state, Action::RevealComplete { is_correct: true });
            assert!(state.streak <= state.record);
        }
        assert_eq!(state.streak, 10);
        assert_eq!(state.record, 10);
    }

    #[test]
    fn test_choice_correctness() {
        assert!(Choice::Higher.is_correct(100.0, 250.0));
        assert!(!Choice::Higher.is_correct(250.0, 100.0));
        assert!(Choice::Lower.is_correct(250.0, 100.0));
        assert!(!Choice::Lower.is_correct(100.0, 250.0));
        // Ties are correct both ways.
        assert!(Choice::Higher.is_correct(100.0, 100.0));
        assert!(Choice::Lower.is_correct(100.0, 100.0));
    }
}
