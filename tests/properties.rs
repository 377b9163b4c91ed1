// Property tests for the guess engine invariants

use proptest::prelude::*;
use repeat_wordle::*;

#[derive(Debug, Clone)]
enum Op {
    Type(char),
    Backspace,
    CompleteRemoval,
    Submit,
}

const LETTERS: &[char] = &['a', 'b', 'c', 'd', 'e', 'á', 'é'];

fn letter() -> impl Strategy<Value = char> {
    prop::sample::select(LETTERS)
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => letter().prop_map(Op::Type),
        1 => Just(Op::Backspace),
        1 => Just(Op::CompleteRemoval),
        2 => Just(Op::Submit),
    ]
}

fn secret_word() -> impl Strategy<Value = String> {
    prop::collection::vec(letter(), 1..6).prop_map(|letters| letters.into_iter().collect())
}

fn engine_with_secret(secret: &str) -> GuessEngine {
    let bank = WordBank::new(vec![secret.to_string()]).unwrap();
    let mut engine = GuessEngine::new(bank);
    let _ = engine.start_round_with_secret(secret);
    engine
}

fn apply(engine: &mut GuessEngine, op: &Op) {
    let _ = match op {
        Op::Type(c) => engine.append_character(*c),
        Op::Backspace => engine.remove_last_character(),
        Op::CompleteRemoval => engine.complete_removal(),
        Op::Submit => engine.submit_attempt(),
    };
}

proptest! {
    #[test]
    fn attempt_never_exceeds_secret(secret in secret_word(), ops in prop::collection::vec(op(), 0..80)) {
        let mut engine = engine_with_secret(&secret);
        for op in &ops {
            apply(&mut engine, op);
            prop_assert!(engine.attempt().len() <= engine.secret_len());
        }
    }

    #[test]
    fn revealed_positions_are_stable(secret in secret_word(), ops in prop::collection::vec(op(), 0..80)) {
        let mut engine = engine_with_secret(&secret);
        let secret_chars: Vec<char> = engine.secret().chars().collect();
        for op in &ops {
            let before = engine.reveal_mask().to_vec();
            apply(&mut engine, op);
            for (position, slot) in before.iter().enumerate() {
                if slot.is_some() {
                    prop_assert_eq!(engine.reveal_mask()[position], *slot);
                }
            }
            for (position, slot) in engine.reveal_mask().iter().enumerate() {
                if let Some(letter) = slot {
                    prop_assert_eq!(*letter, secret_chars[position]);
                }
            }
        }
    }

    #[test]
    fn correct_keys_stay_correct(secret in secret_word(), ops in prop::collection::vec(op(), 0..80)) {
        let mut engine = engine_with_secret(&secret);
        for op in &ops {
            let correct_before: Vec<char> = LETTERS
                .iter()
                .copied()
                .filter(|&key| engine.key_mark(key) == Mark::Correct)
                .collect();
            apply(&mut engine, op);
            for key in correct_before {
                prop_assert_eq!(engine.key_mark(key), Mark::Correct);
            }
        }
    }

    #[test]
    fn first_use_of_a_letter_is_unmarked(secret in secret_word(), ops in prop::collection::vec(op(), 0..80)) {
        let mut engine = engine_with_secret(&secret);
        for op in &ops {
            let seen_before = engine.seen_letters().clone();
            let scored_before = engine.history().len();
            apply(&mut engine, op);
            if engine.history().len() > scored_before {
                let scored = &engine.history()[scored_before];
                for (letter, mark) in scored.letters.iter().zip(&scored.marks) {
                    if !seen_before.contains(&fold_letter(*letter)) {
                        prop_assert_eq!(*mark, Mark::Unmarked);
                    }
                }
            }
        }
    }

    #[test]
    fn outcome_matches_reveal_and_counter(secret in secret_word(), ops in prop::collection::vec(op(), 0..80)) {
        let mut engine = engine_with_secret(&secret);
        for op in &ops {
            apply(&mut engine, op);
            prop_assert!(engine.attempts_used() <= engine.max_attempts());
            match engine.phase() {
                Phase::Won => prop_assert!(engine.is_fully_revealed()),
                Phase::Lost => {
                    prop_assert!(!engine.is_fully_revealed());
                    prop_assert_eq!(engine.attempts_used(), engine.max_attempts());
                }
                Phase::InProgress => {
                    prop_assert!(!engine.is_fully_revealed());
                    prop_assert!(engine.attempts_used() < engine.max_attempts());
                }
                Phase::Idle => prop_assert!(false, "started engine went idle"),
            }
        }
    }

    #[test]
    fn at_most_one_removal_in_flight(secret in secret_word(), ops in prop::collection::vec(op(), 0..80)) {
        let mut engine = engine_with_secret(&secret);
        for op in &ops {
            let in_flight = engine.removal_in_flight();
            let before = engine.attempt().len();
            apply(&mut engine, op);
            if in_flight && matches!(op, Op::Backspace) {
                prop_assert_eq!(engine.attempt().len(), before);
            }
        }
    }

    #[test]
    fn restart_clears_round(secret in secret_word(), ops in prop::collection::vec(op(), 0..40)) {
        let mut engine = engine_with_secret(&secret);
        for op in &ops {
            apply(&mut engine, op);
        }
        engine.start_round();
        prop_assert_eq!(engine.phase(), Phase::InProgress);
        prop_assert!(engine.seen_letters().is_empty());
        prop_assert!(engine.history().is_empty());
        prop_assert_eq!(engine.attempts_used(), 0);
        prop_assert!(engine.reveal_mask().iter().all(Option::is_none));
        prop_assert!(!engine.removal_in_flight());
    }
}
