use crate::engine::{Event, GuessEngine, MAX_ATTEMPTS, Mark, Phase};
use crate::game_state::{GameInterface, UserAction};
use crate::letters::is_alphabet_letter;
use clap::Parser;
use std::collections::VecDeque;
use std::io::BufRead;
use std::path::PathBuf;

/// Guess the secret word. Letters only earn feedback once you have used
/// them in an earlier attempt.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a newline-delimited word list used for secrets
    #[arg(short = 'i', long = "input")]
    pub wordbank_path: Option<String>,

    /// Play line by line on stdin/stdout instead of the full-screen UI
    #[arg(long)]
    pub plain: bool,

    /// Attempts per round
    #[arg(long, default_value_t = DEFAULT_ATTEMPTS, value_parser = clap::value_parser!(u16).range(1..))]
    pub attempts: u16,

    /// Use this word as the secret of the first round
    #[arg(long)]
    pub secret: Option<String>,

    /// Log file path (defaults to the local data directory)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Preferences file path (defaults to the config directory)
    #[arg(long)]
    pub preferences: Option<PathBuf>,
}

#[allow(clippy::cast_possible_truncation)]
const DEFAULT_ATTEMPTS: u16 = MAX_ATTEMPTS as u16;

#[must_use]
pub fn parse_cli() -> Cli {
    Cli::parse()
}

pub const RULES: [&str; 3] = [
    "Each attempt, type a word that repeats letters you have already used.",
    "A repeated letter that is in the secret word is revealed wherever it appears; otherwise it is marked incorrect.",
    "Strategy: start with words full of different letters, then check them.",
];

// UI Input/Output functions

pub enum LineInput {
    Word(Vec<UserAction>),
    Invalid(char),
    Help,
    Exit,
    NewGame,
    Empty,
}

/// Turns one line into actions. `<` is a backspace whose removal finishes
/// at once, and the line ends with a submit.
#[must_use]
pub fn parse_line(line: &str) -> LineInput {
    let input = line.trim();
    match input.to_lowercase().as_str() {
        "" => return LineInput::Empty,
        "exit" | "quit" => return LineInput::Exit,
        "next" | "new" => return LineInput::NewGame,
        "help" => return LineInput::Help,
        _ => {}
    }

    let mut actions = Vec::new();
    for c in input.chars() {
        if c == '<' {
            actions.push(UserAction::Backspace);
            actions.push(UserAction::RemovalComplete);
        } else if is_alphabet_letter(c) {
            actions.push(UserAction::Type(c));
        } else {
            return LineInput::Invalid(c);
        }
    }
    actions.push(UserAction::Submit);
    LineInput::Word(actions)
}

/// `[a]` correct, `(a)` incorrect, bare letter unmarked.
#[must_use]
pub fn format_scored(letters: &[char], marks: &[Mark]) -> String {
    letters
        .iter()
        .zip(marks)
        .map(|(letter, mark)| match mark {
            Mark::Correct => format!("[{letter}]"),
            Mark::Incorrect => format!("({letter})"),
            Mark::Unmarked => format!(" {letter} "),
        })
        .collect()
}

#[must_use]
pub fn format_reveal_mask(mask: &[Option<char>]) -> String {
    mask.iter()
        .map(|slot| slot.unwrap_or('_').to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn display_rules(max_attempts: usize) {
    println!("You have {max_attempts} attempts to uncover the secret word.");
    for line in RULES {
        println!("{line}");
    }
    println!("Type 'next' for a new word, 'help' for these rules, 'exit' to quit.");
}

fn display_round_started(length: usize, max_attempts: usize) {
    println!("\nNew secret word: {length} letters, {max_attempts} attempts.");
}

fn display_prompt(engine: &GuessEngine) {
    if engine.phase() == Phase::InProgress {
        println!(
            "Attempt {}/{}: {}",
            engine.attempts_used() + 1,
            engine.max_attempts(),
            format_reveal_mask(engine.reveal_mask())
        );
    }
}

pub fn display_exit_message() {
    println!("Exiting.");
}

/// CLI implementation of the `GameInterface` trait
/// This struct wraps a `BufRead` reader and plays one attempt per line.
pub struct CliInterface<R: BufRead> {
    reader: R,
    pending: VecDeque<UserAction>,
    max_attempts: usize,
    awaiting_prompt: bool,
}

impl<R: BufRead> CliInterface<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            pending: VecDeque::new(),
            max_attempts: MAX_ATTEMPTS,
            awaiting_prompt: false,
        }
    }

    fn read_line(&mut self) -> Option<String> {
        let mut input = String::new();
        match self.reader.read_line(&mut input) {
            Ok(0) => None,
            Ok(_) => Some(input),
            Err(e) => {
                log::warn!("Failed to read input: {e}");
                None
            }
        }
    }
}

impl<R: BufRead> GameInterface for CliInterface<R> {
    fn show_onboarding(&mut self, max_attempts: usize) {
        self.max_attempts = max_attempts;
        display_rules(max_attempts);
    }

    fn read_action(&mut self) -> Option<UserAction> {
        if let Some(action) = self.pending.pop_front() {
            return Some(action);
        }

        let Some(line) = self.read_line() else {
            return Some(UserAction::Exit);
        };
        match parse_line(&line) {
            LineInput::Word(actions) => {
                self.pending.extend(actions);
                self.pending.pop_front()
            }
            LineInput::Invalid(c) => {
                println!("Invalid letter '{c}'. Only letters are allowed.");
                None
            }
            LineInput::Help => {
                display_rules(self.max_attempts);
                None
            }
            LineInput::Exit => Some(UserAction::Exit),
            LineInput::NewGame => Some(UserAction::NewGame),
            LineInput::Empty => None,
        }
    }

    fn present(&mut self, event: &Event, engine: &GuessEngine) {
        match event {
            Event::RoundStarted { length } => {
                self.awaiting_prompt = false;
                display_round_started(*length, engine.max_attempts());
                display_prompt(engine);
            }
            Event::AttemptScored { letters, marks, .. } => {
                println!("  {}", format_scored(letters, marks));
                self.awaiting_prompt = true;
            }
            Event::LetterRevealed { position, letter } => {
                println!("  Revealed '{letter}' at position {}", position + 1);
            }
            Event::AttemptChanged => {
                // The attempt cleared after scoring; backspaces stay quiet.
                if self.awaiting_prompt && engine.attempt().is_empty() {
                    self.awaiting_prompt = false;
                    display_prompt(engine);
                }
            }
            Event::KeyMarked { .. } => {}
            Event::RoundWon { secret } => {
                println!("You won! The word was: {secret}");
                println!("Type 'next' for another word or 'exit' to quit.");
            }
            Event::RoundLost { secret } => {
                println!("Out of attempts. The word was: {secret}");
                println!("Type 'next' for another word or 'exit' to quit.");
            }
        }
    }

    fn display_exit_message(&mut self) {
        display_exit_message();
    }
}
