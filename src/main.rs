use repeat_wordle::cli::{Cli, CliInterface, parse_cli};
use repeat_wordle::engine::GuessEngine;
use repeat_wordle::game_state::game_loop;
use repeat_wordle::logging::{default_log_path, init_logger};
use repeat_wordle::preferences::default_preferences_path;
use repeat_wordle::tui::TuiInterface;
use repeat_wordle::wordbank::{WordBank, load_wordbank_from_file, load_wordbank_from_str};
use std::io;

fn load_word_bank(cli: &Cli) -> io::Result<WordBank> {
    match &cli.wordbank_path {
        Some(path) => WordBank::new(load_wordbank_from_file(path)?),
        None => Ok(WordBank::embedded()),
    }
}

fn main() {
    let cli = parse_cli();

    if let Some(path) = cli.log_file.clone().or_else(default_log_path)
        && let Err(e) = init_logger(&path)
    {
        eprintln!("Logging disabled, failed to open '{}': {e}", path.display());
    }

    let word_bank = match load_word_bank(&cli) {
        Ok(bank) => bank,
        Err(e) => {
            let source = cli.wordbank_path.as_deref().unwrap_or("embedded list");
            eprintln!("Failed to load word bank from '{source}': {e}");
            return;
        }
    };
    log::info!("Loaded {} words", word_bank.len());

    let mut engine = GuessEngine::new(word_bank).with_max_attempts(usize::from(cli.attempts));
    if let Some(secret) = &cli.secret {
        match load_wordbank_from_str(secret).first() {
            Some(word) => {
                let _ = engine.start_round_with_secret(word);
            }
            None => {
                eprintln!("Invalid secret '{secret}': only letters are allowed.");
                return;
            }
        }
    }

    let summary = if cli.plain {
        let stdin = io::stdin();
        let mut interface = CliInterface::new(stdin.lock());
        game_loop(&mut engine, &mut interface)
    } else {
        let preferences_path = cli.preferences.clone().or_else(default_preferences_path);
        match TuiInterface::new(preferences_path) {
            Ok(mut interface) => game_loop(&mut engine, &mut interface),
            Err(e) => {
                eprintln!("Failed to start the terminal UI: {e}. Try --plain.");
                return;
            }
        }
    };

    println!(
        "Rounds played: {} (won {}, lost {})",
        summary.rounds_played(),
        summary.rounds_won,
        summary.rounds_lost
    );
}
