// Library interface for repeat-wordle
// This allows integration tests to access internal modules

pub mod cli;
pub mod engine;
pub mod game_state;
pub mod letters;
pub mod logging;
pub mod preferences;
pub mod timer;
pub mod tui;
pub mod wordbank;

// Re-export commonly used items for easier testing
pub use engine::{Action, Event, GuessEngine, MAX_ATTEMPTS, Mark, Phase, ScoredAttempt};
pub use game_state::{GameInterface, SessionSummary, UserAction, game_loop};
pub use letters::{fold_letter, fold_word, is_alphabet_letter};
pub use wordbank::{WordBank, load_wordbank_from_file, load_wordbank_from_str};
