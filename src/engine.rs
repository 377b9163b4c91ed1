//! Guess engine: round lifecycle and repeat-letter scoring.
//!
//! A letter only earns feedback once it has been used in an earlier
//! submitted attempt of the same round. Feedback for an attempt is computed
//! against the seen letters as they stood before that attempt, and the
//! attempt's own letters are recorded afterwards.
//!
//! # State Machine
//! `Idle` → `InProgress` → `Won` | `Lost`. Terminal phases stay put until the
//! next call to one of the `start_round` methods.
//!
//! The engine never fails: an operation that does not apply in the current
//! state returns [`Action::Ignored`] and leaves everything untouched. State
//! changes are queued as [`Event`]s for the presentation to drain with
//! [`GuessEngine::next_event`].

use crate::letters::{fold_letter, lower_letter};
use crate::wordbank::WordBank;
use log::{debug, info};
use rand::Rng;
use std::collections::{BTreeSet, HashMap, VecDeque};

pub const MAX_ATTEMPTS: usize = 6;

/// Feedback for one attempt position or one keyboard key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mark {
    #[default]
    Unmarked,
    Correct,
    Incorrect,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    InProgress,
    Won,
    Lost,
}

impl Phase {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// Whether an operation changed the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[must_use]
pub enum Action {
    Applied,
    Ignored,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    RoundStarted {
        length: usize,
    },
    AttemptChanged,
    AttemptScored {
        index: usize,
        letters: Vec<char>,
        marks: Vec<Mark>,
    },
    LetterRevealed {
        position: usize,
        letter: char,
    },
    /// `key` is the folded letter; every key folding to it shares the mark.
    KeyMarked {
        key: char,
        mark: Mark,
    },
    RoundWon {
        secret: String,
    },
    RoundLost {
        secret: String,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScoredAttempt {
    pub letters: Vec<char>,
    pub marks: Vec<Mark>,
}

pub struct GuessEngine {
    word_bank: WordBank,
    max_attempts: usize,
    secret: Vec<char>,
    folded_secret: Vec<char>,
    attempt: Vec<char>,
    seen_letters: BTreeSet<char>,
    reveal_mask: Vec<Option<char>>,
    key_marks: HashMap<char, Mark>,
    history: Vec<ScoredAttempt>,
    attempts_used: usize,
    phase: Phase,
    removal_in_flight: bool,
    events: VecDeque<Event>,
}

impl GuessEngine {
    #[must_use]
    pub fn new(word_bank: WordBank) -> Self {
        Self {
            word_bank,
            max_attempts: MAX_ATTEMPTS,
            secret: Vec::new(),
            folded_secret: Vec::new(),
            attempt: Vec::new(),
            seen_letters: BTreeSet::new(),
            reveal_mask: Vec::new(),
            key_marks: HashMap::new(),
            history: Vec::new(),
            attempts_used: 0,
            phase: Phase::Idle,
            removal_in_flight: false,
            events: VecDeque::new(),
        }
    }

    /// Sets the number of attempts per round, at least one. Takes effect
    /// from the next round.
    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn start_round(&mut self) {
        self.start_round_with_rng(&mut rand::rng());
    }

    pub fn start_round_with_rng<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let secret = self.word_bank.choose(rng).to_string();
        let _ = self.start_round_with_secret(&secret);
    }

    /// Starts a round with a fixed secret. An empty secret is ignored.
    pub fn start_round_with_secret(&mut self, secret: &str) -> Action {
        if secret.is_empty() {
            return Action::Ignored;
        }
        self.reset(secret);
        Action::Applied
    }

    fn reset(&mut self, secret: &str) {
        self.secret = secret.chars().map(lower_letter).collect();
        self.folded_secret = self.secret.iter().copied().map(fold_letter).collect();
        self.attempt.clear();
        self.seen_letters.clear();
        self.reveal_mask = vec![None; self.secret.len()];
        self.key_marks.clear();
        self.history.clear();
        self.attempts_used = 0;
        self.phase = Phase::InProgress;
        self.removal_in_flight = false;
        self.events.clear();

        info!("Round started with a {}-letter secret", self.secret.len());
        debug!("Secret: {}", self.secret());
        self.events.push_back(Event::RoundStarted {
            length: self.secret.len(),
        });
    }

    pub fn append_character(&mut self, c: char) -> Action {
        if self.phase != Phase::InProgress || self.attempt.len() >= self.secret.len() {
            return Action::Ignored;
        }
        self.attempt.push(lower_letter(c));
        self.events.push_back(Event::AttemptChanged);
        Action::Applied
    }

    /// Removes the last typed character and holds the removal guard until
    /// [`complete_removal`](Self::complete_removal) is called. Requests made
    /// while the guard is held are dropped.
    pub fn remove_last_character(&mut self) -> Action {
        if self.phase != Phase::InProgress || self.removal_in_flight || self.attempt.is_empty() {
            return Action::Ignored;
        }
        self.attempt.pop();
        self.removal_in_flight = true;
        self.events.push_back(Event::AttemptChanged);
        Action::Applied
    }

    pub fn complete_removal(&mut self) -> Action {
        if !self.removal_in_flight {
            return Action::Ignored;
        }
        self.removal_in_flight = false;
        Action::Applied
    }

    pub fn submit_attempt(&mut self) -> Action {
        if self.phase != Phase::InProgress || self.attempt.is_empty() {
            return Action::Ignored;
        }

        let letters = std::mem::take(&mut self.attempt);
        let folded: Vec<char> = letters.iter().copied().map(fold_letter).collect();
        let scored_at = self.events.len();

        if folded == self.folded_secret {
            self.win_outright(scored_at, letters);
            return Action::Applied;
        }

        let marks = self.score_repeats(&folded);
        self.seen_letters.extend(folded.iter().copied());
        self.record_attempt(scored_at, letters, marks);

        if !self.check_victory() {
            self.advance_or_end();
        }
        Action::Applied
    }

    /// Exact match: every position is revealed with the secret's own
    /// spelling and no letters are recorded.
    fn win_outright(&mut self, scored_at: usize, letters: Vec<char>) {
        info!("Exact match on attempt {}", self.attempts_used + 1);
        for position in 0..self.secret.len() {
            self.reveal_position(position);
        }
        let marks = vec![Mark::Unmarked; letters.len()];
        self.record_attempt(scored_at, letters, marks);
        self.finish(Phase::Won);
    }

    fn score_repeats(&mut self, folded: &[char]) -> Vec<Mark> {
        let mut marks = Vec::with_capacity(folded.len());
        for &letter in folded {
            // self.seen_letters still holds only the earlier attempts here.
            let mark = if !self.seen_letters.contains(&letter) {
                Mark::Unmarked
            } else if self.folded_secret.contains(&letter) {
                self.reveal_letter(letter);
                self.mark_key(letter, Mark::Correct);
                Mark::Correct
            } else {
                self.mark_key(letter, Mark::Incorrect);
                Mark::Incorrect
            };
            marks.push(mark);
        }
        debug!("Scored attempt {}: {:?}", self.attempts_used + 1, marks);
        marks
    }

    fn reveal_letter(&mut self, folded: char) {
        for position in 0..self.folded_secret.len() {
            if self.folded_secret[position] == folded {
                self.reveal_position(position);
            }
        }
    }

    fn reveal_position(&mut self, position: usize) {
        if self.reveal_mask[position].is_some() {
            return;
        }
        let letter = self.secret[position];
        self.reveal_mask[position] = Some(letter);
        self.events
            .push_back(Event::LetterRevealed { position, letter });
    }

    fn mark_key(&mut self, key: char, mark: Mark) {
        let current = self.key_marks.entry(key).or_default();
        if *current == Mark::Correct || *current == mark {
            return;
        }
        *current = mark;
        self.events.push_back(Event::KeyMarked { key, mark });
    }

    /// Queues `AttemptScored` at `scored_at` so it precedes the reveals and
    /// key marks the attempt caused.
    fn record_attempt(&mut self, scored_at: usize, letters: Vec<char>, marks: Vec<Mark>) {
        self.events.insert(
            scored_at,
            Event::AttemptScored {
                index: self.history.len(),
                letters: letters.clone(),
                marks: marks.clone(),
            },
        );
        self.history.push(ScoredAttempt { letters, marks });
    }

    fn check_victory(&mut self) -> bool {
        if self.is_fully_revealed() {
            self.finish(Phase::Won);
            true
        } else {
            false
        }
    }

    fn advance_or_end(&mut self) {
        self.attempts_used += 1;
        if self.attempts_used >= self.max_attempts {
            self.finish(Phase::Lost);
        } else {
            self.events.push_back(Event::AttemptChanged);
        }
    }

    fn finish(&mut self, phase: Phase) {
        self.phase = phase;
        let secret = self.secret();
        info!(
            "Round {} after {} scored attempts: {}",
            if phase == Phase::Won { "won" } else { "lost" },
            self.history.len(),
            secret
        );
        self.events.push_back(match phase {
            Phase::Won => Event::RoundWon { secret },
            _ => Event::RoundLost { secret },
        });
    }

    pub fn next_event(&mut self) -> Option<Event> {
        self.events.pop_front()
    }

    #[must_use]
    pub fn is_fully_revealed(&self) -> bool {
        !self.reveal_mask.is_empty() && self.reveal_mask.iter().all(Option::is_some)
    }

    #[must_use]
    pub fn secret(&self) -> String {
        self.secret.iter().collect()
    }

    #[must_use]
    pub fn attempt(&self) -> &[char] {
        &self.attempt
    }

    /// Folded letters used in submitted attempts this round.
    #[must_use]
    pub fn seen_letters(&self) -> &BTreeSet<char> {
        &self.seen_letters
    }

    #[must_use]
    pub fn reveal_mask(&self) -> &[Option<char>] {
        &self.reveal_mask
    }

    /// Mark for any key; accented keys share the mark of their base letter.
    #[must_use]
    pub fn key_mark(&self, key: char) -> Mark {
        self.key_marks
            .get(&fold_letter(key))
            .copied()
            .unwrap_or_default()
    }

    #[must_use]
    pub fn history(&self) -> &[ScoredAttempt] {
        &self.history
    }

    #[must_use]
    pub fn attempts_used(&self) -> usize {
        self.attempts_used
    }

    #[must_use]
    pub fn attempts_remaining(&self) -> usize {
        self.max_attempts.saturating_sub(self.attempts_used)
    }

    #[must_use]
    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    #[must_use]
    pub fn secret_len(&self) -> usize {
        self.secret.len()
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.phase.is_terminal()
    }

    #[must_use]
    pub fn removal_in_flight(&self) -> bool {
        self.removal_in_flight
    }

    #[must_use]
    pub fn word_bank(&self) -> &WordBank {
        &self.word_bank
    }
}
