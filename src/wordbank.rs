use crate::letters::{is_alphabet_letter, lower_letter};
use rand::Rng;
use rand::prelude::IndexedRandom;
use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

pub const EMBEDDED_WORDBANK: &str = include_str!("resources/wordbank.txt");

fn normalize_word(line: &str) -> Option<String> {
    let word: String = line.trim().chars().map(lower_letter).collect();
    if !word.is_empty() && word.chars().all(is_alphabet_letter) {
        Some(word)
    } else {
        None
    }
}

fn dedup(words: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    words.filter(|word| seen.insert(word.clone())).collect()
}

pub fn load_wordbank_from_str(data: &str) -> Vec<String> {
    dedup(data.lines().filter_map(normalize_word))
}

pub fn load_wordbank_from_file<P: AsRef<Path>>(path: P) -> io::Result<Vec<String>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut words = Vec::new();
    for line in reader.lines() {
        if let Some(word) = normalize_word(&line?) {
            words.push(word);
        }
    }
    Ok(dedup(words.into_iter()))
}

/// A non-empty list of candidate secrets.
#[derive(Debug, Clone)]
pub struct WordBank {
    words: Vec<String>,
}

impl WordBank {
    pub fn new(words: Vec<String>) -> io::Result<Self> {
        if words.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "word bank contains no usable words",
            ));
        }
        Ok(Self { words })
    }

    #[must_use]
    pub fn embedded() -> Self {
        Self {
            words: load_wordbank_from_str(EMBEDDED_WORDBANK),
        }
    }

    /// Picks a word uniformly at random.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
        self.words.choose(rng).map_or("", String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    #[must_use]
    pub fn words(&self) -> &[String] {
        &self.words
    }
}
