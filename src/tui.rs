//! TUI (Terminal User Interface) module for the repeat-letter word game
//!
//! This module provides an interactive terminal interface using Ratatui.
//! It is both the input adapter (keys become [`UserAction`]s) and the
//! presentation layer (engine events become board, keyboard and dialogs).
//!
//! # Timing
//! - A backspace holds the engine's removal guard for [`REMOVAL_WINDOW`]
//!   while the removed cell fades, then reports `RemovalComplete`.
//! - Round outcome dialogs open [`OUTCOME_DELAY`] after the deciding attempt.
//! - The rules dialog opens [`ONBOARDING_DELAY`] after startup unless the
//!   player dismissed it for good.

use crate::engine::{Event as EngineEvent, GuessEngine, Mark, Phase, ScoredAttempt};
use crate::game_state::{GameInterface, UserAction};
use crate::letters::{KEYBOARD_ROWS, is_alphabet_letter};
use crate::preferences::{Preferences, Theme};
use crate::timer::{Deferred, ONBOARDING_DELAY, OUTCOME_DELAY, REMOVAL_WINDOW};
use crate::{debug_log, info_log};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use rand::prelude::IndexedRandom;
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

const EVENT_POLL_TIMEOUT_MS: u64 = 30;
const ROW_SPACING: u16 = 2;
const DIALOG_WIDTH: u16 = 60;
const DIALOG_HEIGHT: u16 = 14;

const VICTORY_PHRASES: [&str; 5] = [
    "Congratulations, but can you guess the next word?",
    "I knew you could do it. Can you repeat the feat with a harder word?",
    "Most players guess their first secret word, but not the second. Are you one of them?",
    "I admit I picked an easy word to start. The next one is a real challenge.",
    "You woke up with the right word today. I doubt that luck lasts another round...",
];

const DEFEAT_PHRASES: [&str; 5] = [
    "I dare you to try again, though I doubt you can change the outcome...",
    "Maybe give up now, I am not sure you will guess the next word...",
    "This game is not for everyone.",
    "Try again and be one of the few who crack their secret word.",
    "Real players never give up... are you one of them?",
];

#[derive(Clone, Copy, Debug)]
struct Palette {
    text: Color,
    background: Color,
    cell: Color,
    cell_text: Color,
    hidden: Color,
    correct: Color,
    incorrect: Color,
    header: Color,
}

const LIGHT_PALETTE: Palette = Palette {
    text: Color::Black,
    background: Color::White,
    cell: Color::Gray,
    cell_text: Color::Black,
    hidden: Color::DarkGray,
    correct: Color::Green,
    incorrect: Color::Red,
    header: Color::Blue,
};

const DARK_PALETTE: Palette = Palette {
    text: Color::White,
    background: Color::Black,
    cell: Color::DarkGray,
    cell_text: Color::White,
    hidden: Color::Gray,
    correct: Color::Green,
    incorrect: Color::Red,
    header: Color::Cyan,
};

impl Palette {
    fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => LIGHT_PALETTE,
            Theme::Dark => DARK_PALETTE,
        }
    }

    fn base(self) -> Style {
        Style::new().fg(self.text).bg(self.background)
    }

    fn header(self) -> Style {
        self.base().fg(self.header).add_modifier(Modifier::BOLD)
    }

    fn mark(self, mark: Mark) -> Style {
        match mark {
            Mark::Unmarked => Style::new().fg(self.cell_text).bg(self.cell),
            Mark::Correct => Style::new().fg(Color::Black).bg(self.correct),
            Mark::Incorrect => Style::new().fg(Color::White).bg(self.incorrect),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
enum Dialog {
    Onboarding,
    Outcome {
        won: bool,
        secret: String,
        phrase: &'static str,
    },
}

impl Dialog {
    fn is_outcome(&self) -> bool {
        matches!(self, Self::Outcome { .. })
    }
}

/// Copy of the engine state the board needs, refreshed on every event.
#[derive(Debug, Default)]
struct BoardSnapshot {
    reveal_mask: Vec<Option<char>>,
    history: Vec<ScoredAttempt>,
    attempt: Vec<char>,
    key_marks: HashMap<char, Mark>,
    attempts_used: usize,
    attempts_remaining: usize,
    max_attempts: usize,
    phase: Option<Phase>,
}

impl BoardSnapshot {
    fn capture(engine: &GuessEngine) -> Self {
        let key_marks = KEYBOARD_ROWS
            .iter()
            .flat_map(|row| row.chars())
            .map(|key| (key, engine.key_mark(key)))
            .collect();
        Self {
            reveal_mask: engine.reveal_mask().to_vec(),
            history: engine.history().to_vec(),
            attempt: engine.attempt().to_vec(),
            key_marks,
            attempts_used: engine.attempts_used(),
            attempts_remaining: engine.attempts_remaining(),
            max_attempts: engine.max_attempts(),
            phase: Some(engine.phase()),
        }
    }

    fn secret_len(&self) -> usize {
        self.reveal_mask.len()
    }

    fn accepting_input(&self) -> bool {
        self.phase == Some(Phase::InProgress) && self.attempts_remaining > 0
    }
}

/// A removed letter still fading out of the attempt row.
struct FadingCell {
    position: usize,
    letter: char,
    guard: Deferred<()>,
}

/// Context for rendering the UI - groups related parameters to avoid too many function arguments.
struct RenderContext<'a> {
    board: &'a BoardSnapshot,
    fading: Option<&'a FadingCell>,
    dialog: Option<&'a Dialog>,
    palette: Palette,
    status: &'a str,
    error_message: &'a str,
}

/// Main TUI interface component.
///
/// Manages terminal rendering, input handling, and game state display.
pub struct TuiInterface {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    preferences: Preferences,
    preferences_path: Option<PathBuf>,
    board: BoardSnapshot,
    fading: Option<FadingCell>,
    dialog: Option<Dialog>,
    pending_dialog: Option<Deferred<Dialog>>,
    status: String,
    error_message: String,
}

impl TuiInterface {
    pub fn new(preferences_path: Option<PathBuf>) -> Result<Self, io::Error> {
        info_log!("TuiInterface::new() - Initializing TUI");
        let preferences = preferences_path
            .as_deref()
            .map(Preferences::load)
            .unwrap_or_default();

        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, cursor::Hide)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        info_log!("Terminal setup complete: alternate screen, cursor hidden");

        Ok(Self::with_terminal(terminal, preferences, preferences_path))
    }

    /// Builds the interface around an already configured terminal.
    fn with_terminal(
        terminal: Terminal<CrosstermBackend<io::Stdout>>,
        preferences: Preferences,
        preferences_path: Option<PathBuf>,
    ) -> Self {
        Self {
            terminal,
            preferences,
            preferences_path,
            board: BoardSnapshot::default(),
            fading: None,
            dialog: None,
            pending_dialog: None,
            status: "Ready".to_string(),
            error_message: String::new(),
        }
    }

    /// Drops any outcome dialog left over from the previous round. The
    /// onboarding dialog survives a new round.
    fn clear_outcome(&mut self) {
        if self.dialog.as_ref().is_some_and(Dialog::is_outcome) {
            self.dialog = None;
        }
        if self
            .pending_dialog
            .as_ref()
            .and_then(Deferred::peek)
            .is_some_and(Dialog::is_outcome)
        {
            self.pending_dialog = None;
        }
    }

    pub fn cleanup(&mut self) -> Result<(), io::Error> {
        disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            cursor::Show
        )?;
        Ok(())
    }

    /// Draw the current UI state to the terminal.
    ///
    /// Returns an error if rendering fails.
    fn draw(&mut self) -> Result<(), io::Error> {
        let ctx = RenderContext {
            board: &self.board,
            fading: self.fading.as_ref(),
            dialog: self.dialog.as_ref(),
            palette: Palette::for_theme(self.preferences.theme),
            status: &self.status,
            error_message: &self.error_message,
        };

        self.terminal.draw(|f| {
            Self::render_static(f, &ctx);
        })?;
        Ok(())
    }

    /// Log and handle draw errors appropriately
    fn draw_or_log(&mut self) {
        if let Err(e) = self.draw() {
            debug_log!("Draw error: {}", e);
        }
    }

    /// Render the complete UI layout using the provided context.
    fn render_static(f: &mut Frame, ctx: &RenderContext) {
        f.render_widget(Block::default().style(ctx.palette.base()), f.area());

        #[allow(clippy::cast_possible_truncation)]
        let board_height = (ctx.board.max_attempts as u16 + 1) * ROW_SPACING + 2;
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),            // Title
                Constraint::Length(board_height), // Hidden word and attempts
                Constraint::Length(6),            // Keyboard
                Constraint::Min(3),               // Status and errors
                Constraint::Length(3),            // Instructions
            ])
            .split(f.area());

        Self::render_title(f, chunks[0], ctx.palette);
        Self::render_board(f, chunks[1], ctx);
        Self::render_keyboard(f, chunks[2], ctx.board, ctx.palette);
        Self::render_status(f, chunks[3], ctx);
        Self::render_instructions(f, chunks[4], ctx.palette);

        if let Some(dialog) = ctx.dialog {
            Self::render_dialog(f, dialog, ctx.board.max_attempts, ctx.palette);
        }
    }

    fn render_title(f: &mut Frame, area: Rect, palette: Palette) {
        let title = Paragraph::new("REPEAT THE LETTERS")
            .style(palette.header())
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(title, area);
    }

    fn render_board(f: &mut Frame, area: Rect, ctx: &RenderContext) {
        let block = Block::default()
            .title(format!(
                "Attempts {}/{} ({} left)",
                ctx.board.attempts_used, ctx.board.max_attempts, ctx.board.attempts_remaining
            ))
            .borders(Borders::ALL)
            .style(ctx.palette.base());

        let inner = block.inner(area);
        f.render_widget(block, area);

        let palette = ctx.palette;
        let hidden: Vec<Span> = ctx
            .board
            .reveal_mask
            .iter()
            .map(|slot| match slot {
                Some(letter) => Self::cell(*letter, palette.mark(Mark::Correct)),
                None => Self::cell(' ', Style::new().bg(palette.hidden)),
            })
            .collect();
        Self::render_row(f, inner, 0, hidden);

        for (index, scored) in ctx.board.history.iter().enumerate() {
            let spans = scored
                .letters
                .iter()
                .zip(&scored.marks)
                .map(|(letter, mark)| Self::cell(*letter, palette.mark(*mark)))
                .collect();
            Self::render_row(f, inner, index + 1, spans);
        }

        if ctx.board.accepting_input() {
            let spans = Self::current_attempt_spans(ctx.board, ctx.fading, palette);
            Self::render_row(f, inner, ctx.board.history.len() + 1, spans);
        }
    }

    fn current_attempt_spans(
        board: &BoardSnapshot,
        fading: Option<&FadingCell>,
        palette: Palette,
    ) -> Vec<Span<'static>> {
        let empty = palette.mark(Mark::Unmarked);
        (0..board.secret_len())
            .map(|position| {
                if let Some(letter) = board.attempt.get(position) {
                    return Self::cell(*letter, empty);
                }
                match fading {
                    Some(cell) if cell.position == position && cell.guard.progress() < 1.0 => {
                        Self::cell(cell.letter, empty.add_modifier(Modifier::DIM))
                    }
                    _ => Self::cell(' ', empty),
                }
            })
            .collect()
    }

    fn cell(letter: char, style: Style) -> Span<'static> {
        Span::styled(format!(" {} ", letter.to_uppercase()), style)
    }

    #[allow(clippy::cast_possible_truncation)]
    fn render_row(f: &mut Frame, area: Rect, row_index: usize, cells: Vec<Span<'static>>) {
        let y = area.y + (row_index as u16 * ROW_SPACING);
        if y >= area.y + area.height {
            return;
        }

        let mut spans = Vec::with_capacity(cells.len() * 2);
        for cell in cells {
            spans.push(cell);
            spans.push(Span::raw(" "));
        }
        let paragraph = Paragraph::new(Line::from(spans)).alignment(Alignment::Center);
        f.render_widget(
            paragraph,
            Rect {
                x: area.x,
                y,
                width: area.width,
                height: 1,
            },
        );
    }

    fn render_keyboard(f: &mut Frame, area: Rect, board: &BoardSnapshot, palette: Palette) {
        let lines: Vec<Line> = KEYBOARD_ROWS
            .iter()
            .map(|row| {
                let spans: Vec<Span> = row
                    .chars()
                    .flat_map(|key| {
                        let mark = board.key_marks.get(&key).copied().unwrap_or_default();
                        [Self::cell(key, palette.mark(mark)), Span::raw(" ")]
                    })
                    .collect();
                Line::from(spans)
            })
            .collect();

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .style(palette.base())
            .block(Block::default().title("Keyboard").borders(Borders::ALL));
        f.render_widget(paragraph, area);
    }

    fn render_status(f: &mut Frame, area: Rect, ctx: &RenderContext) {
        let mut lines = vec![Line::from(Span::styled(ctx.status, ctx.palette.header()))];
        if !ctx.error_message.is_empty() {
            lines.push(Line::from(Span::styled(
                ctx.error_message,
                ctx.palette.base().fg(ctx.palette.incorrect),
            )));
        }
        let paragraph = Paragraph::new(lines)
            .style(ctx.palette.base())
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title("Status"));
        f.render_widget(paragraph, area);
    }

    fn render_instructions(f: &mut Frame, area: Rect, palette: Palette) {
        let text = "Letters: type | BACKSPACE: delete | ENTER: submit | F5: new word | TAB: theme | F1: rules | ESC: quit";
        let paragraph = Paragraph::new(text)
            .style(palette.base().fg(Color::Gray))
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(paragraph, area);
    }

    fn render_dialog(f: &mut Frame, dialog: &Dialog, max_attempts: usize, palette: Palette) {
        let area = centered_rect(f.area(), DIALOG_WIDTH, DIALOG_HEIGHT);
        let (title, lines) = match dialog {
            Dialog::Onboarding => {
                let mut lines = vec![
                    Line::from(Span::styled("Rules", palette.header())),
                    Line::from(format!(
                        "You have {max_attempts} attempts to uncover the secret word."
                    )),
                    Line::from(""),
                ];
                lines.extend(crate::cli::RULES.iter().map(|rule| Line::from(*rule)));
                lines.push(Line::from(""));
                lines.push(Line::from("ENTER: accept the challenge | D: don't show again"));
                ("How to play", lines)
            }
            Dialog::Outcome {
                won,
                secret,
                phrase,
            } => {
                let headline = if *won {
                    Span::styled("You won!", palette.base().fg(palette.correct))
                } else {
                    Span::styled("Out of attempts", palette.base().fg(palette.incorrect))
                };
                let lines = vec![
                    Line::from(headline),
                    Line::from(""),
                    Line::from(format!("The word was: {}", secret.to_uppercase())),
                    Line::from(""),
                    Line::from(*phrase),
                    Line::from(""),
                    Line::from("ENTER: next word | ESC: quit"),
                ];
                (if *won { "Victory" } else { "Defeat" }, lines)
            }
        };

        let paragraph = Paragraph::new(lines)
            .style(palette.base())
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(Block::default().title(title).borders(Borders::ALL));
        f.render_widget(Clear, area);
        f.render_widget(paragraph, area);
    }

    fn handle_input(&mut self) -> Result<Option<UserAction>, io::Error> {
        if !event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            return Ok(None);
        }

        let Event::Key(key) = event::read()? else {
            debug_log!("handle_input() - Ignoring non-key event");
            return Ok(None);
        };

        // Only process Press events, ignore Release and Repeat to avoid double input
        if key.kind != KeyEventKind::Press {
            return Ok(None);
        }
        debug_log!(
            "handle_input() - Key event received: code={:?}, modifiers={:?}",
            key.code,
            key.modifiers
        );

        if self.dialog.is_some() {
            return Ok(self.handle_dialog_input(key));
        }
        Ok(self.handle_game_input(key))
    }

    fn handle_game_input(&mut self, key: KeyEvent) -> Option<UserAction> {
        self.error_message.clear();
        match key.code {
            KeyCode::Char(_) if Self::has_modifier_keys(&key) => {
                debug_log!(
                    "handle_game_input() - Ignoring character with modifier: {:?}",
                    key.modifiers
                );
                None
            }
            KeyCode::Char(c) if is_alphabet_letter(c) => Some(UserAction::Type(c)),
            KeyCode::Char(c) => {
                self.error_message = format!("Only letters are allowed! ('{c}' is not a letter)");
                None
            }
            KeyCode::Backspace => Some(UserAction::Backspace),
            KeyCode::Enter => Some(UserAction::Submit),
            KeyCode::F(5) => Some(UserAction::NewGame),
            KeyCode::F(1) => {
                self.dialog = Some(Dialog::Onboarding);
                None
            }
            KeyCode::Tab => {
                self.toggle_theme();
                None
            }
            KeyCode::Esc => {
                info_log!("handle_game_input() - ESC pressed, returning Exit");
                Some(UserAction::Exit)
            }
            _ => None,
        }
    }

    fn handle_dialog_input(&mut self, key: KeyEvent) -> Option<UserAction> {
        let onboarding = matches!(self.dialog, Some(Dialog::Onboarding));
        match (onboarding, key.code) {
            (true, KeyCode::Char('d' | 'D')) => {
                self.preferences.onboarding_hidden = true;
                self.preferences
                    .save_or_log(self.preferences_path.as_ref());
                self.dialog = None;
                None
            }
            (true, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) => {
                self.dialog = None;
                None
            }
            (false, KeyCode::Enter | KeyCode::Char(' ')) => {
                self.dialog = None;
                Some(UserAction::NewGame)
            }
            (false, KeyCode::Esc) => Some(UserAction::Exit),
            _ => None,
        }
    }

    fn has_modifier_keys(key: &KeyEvent) -> bool {
        key.modifiers.contains(KeyModifiers::ALT) || key.modifiers.contains(KeyModifiers::CONTROL)
    }

    fn toggle_theme(&mut self) {
        self.preferences.theme = self.preferences.theme.toggled();
        self.preferences
            .save_or_log(self.preferences_path.as_ref());
        info_log!("Theme switched to {:?}", self.preferences.theme);
    }

    fn schedule_outcome(&mut self, won: bool, secret: &str) {
        let phrases: &[&'static str] = if won {
            &VICTORY_PHRASES
        } else {
            &DEFEAT_PHRASES
        };
        let phrase = phrases.choose(&mut rand::rng()).copied().unwrap_or_default();
        self.pending_dialog = Some(Deferred::new(
            Dialog::Outcome {
                won,
                secret: secret.to_string(),
                phrase,
            },
            OUTCOME_DELAY,
        ));
    }

    /// Starts the fade of the letter removed since the last snapshot.
    fn start_fade(&mut self, previous_attempt: &[char]) {
        let position = self.board.attempt.len();
        if let Some(&letter) = previous_attempt.get(position) {
            self.fading = Some(FadingCell {
                position,
                letter,
                guard: Deferred::new((), REMOVAL_WINDOW),
            });
        }
    }
}

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

impl GameInterface for TuiInterface {
    fn show_onboarding(&mut self, max_attempts: usize) {
        self.board.max_attempts = max_attempts;
        if !self.preferences.onboarding_hidden {
            self.pending_dialog = Some(Deferred::new(Dialog::Onboarding, ONBOARDING_DELAY));
        }
    }

    fn read_action(&mut self) -> Option<UserAction> {
        if let Some(fading) = self.fading.as_mut()
            && fading.guard.poll().is_some()
        {
            self.fading = None;
            return Some(UserAction::RemovalComplete);
        }

        if let Some(dialog) = self.pending_dialog.as_mut().and_then(Deferred::poll) {
            self.pending_dialog = None;
            self.dialog = Some(dialog);
        }

        if self.draw().is_err() {
            info_log!("read_action() - Draw failed, returning Exit");
            return Some(UserAction::Exit);
        }

        match self.handle_input() {
            Ok(action) => action,
            Err(e) => {
                info_log!("read_action() - Error handling input: {}", e);
                Some(UserAction::Exit)
            }
        }
    }

    fn present(&mut self, event: &EngineEvent, engine: &GuessEngine) {
        let current = BoardSnapshot::capture(engine);
        let previous_attempt = std::mem::replace(&mut self.board, current).attempt;

        match event {
            EngineEvent::RoundStarted { length } => {
                self.clear_outcome();
                self.fading = None;
                self.status = format!("New secret word: {length} letters. Good luck!");
            }
            EngineEvent::AttemptChanged => {
                if engine.removal_in_flight() && self.board.attempt.len() < previous_attempt.len()
                {
                    self.start_fade(&previous_attempt);
                }
            }
            EngineEvent::AttemptScored { index, .. } => {
                self.status = format!("Attempt {} submitted", index + 1);
            }
            EngineEvent::LetterRevealed { letter, .. } => {
                self.status = format!("Revealed '{}'", letter.to_uppercase());
            }
            EngineEvent::KeyMarked { .. } => {}
            EngineEvent::RoundWon { secret } => {
                self.status = format!("You won! The word was {}", secret.to_uppercase());
                self.schedule_outcome(true, secret);
            }
            EngineEvent::RoundLost { secret } => {
                self.status = format!("Out of attempts. The word was {}", secret.to_uppercase());
                self.schedule_outcome(false, secret);
            }
        }
        self.draw_or_log();
    }

    fn display_exit_message(&mut self) {
        self.status = "Exiting...".to_string();
        self.draw_or_log();
    }
}

impl Drop for TuiInterface {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wordbank::WordBank;
    use ratatui::backend::TestBackend;
    use ratatui::{TerminalOptions, Viewport};

    fn fixed_interface(preferences: Preferences) -> TuiInterface {
        let terminal = Terminal::with_options(
            CrosstermBackend::new(io::stdout()),
            TerminalOptions {
                viewport: Viewport::Fixed(Rect::new(0, 0, 100, 40)),
            },
        )
        .unwrap();
        TuiInterface::with_terminal(terminal, preferences, None)
    }

    fn present_all(interface: &mut TuiInterface, engine: &mut GuessEngine) {
        while let Some(event) = engine.next_event() {
            interface.present(&event, engine);
        }
    }

    fn engine_with_secret(secret: &str) -> GuessEngine {
        let bank = WordBank::new(vec![secret.to_string()]).unwrap();
        let mut engine = GuessEngine::new(bank);
        let _ = engine.start_round_with_secret(secret);
        engine
    }

    fn render_to_string(ctx: &RenderContext) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal
            .draw(|f| TuiInterface::render_static(f, ctx))
            .unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn context<'a>(board: &'a BoardSnapshot, dialog: Option<&'a Dialog>) -> RenderContext<'a> {
        RenderContext {
            board,
            fading: None,
            dialog,
            palette: DARK_PALETTE,
            status: "status line",
            error_message: "",
        }
    }

    #[test]
    fn test_snapshot_captures_engine() {
        let mut engine = engine_with_secret("gato");
        for word in ["casa", "aula"] {
            for c in word.chars() {
                let _ = engine.append_character(c);
            }
            let _ = engine.submit_attempt();
        }
        let board = BoardSnapshot::capture(&engine);
        assert_eq!(board.reveal_mask, vec![None, Some('a'), None, None]);
        assert_eq!(board.history.len(), 2);
        assert_eq!(board.key_marks.get(&'a'), Some(&Mark::Correct));
        assert_eq!(board.key_marks.get(&'á'), Some(&Mark::Correct));
        assert!(board.accepting_input());
    }

    #[test]
    fn test_render_board_shows_revealed_letters() {
        let mut engine = engine_with_secret("gato");
        for c in "gato".chars() {
            let _ = engine.append_character(c);
        }
        let _ = engine.submit_attempt();
        let board = BoardSnapshot::capture(&engine);
        let screen = render_to_string(&context(&board, None));
        assert!(screen.contains("REPEAT THE LETTERS"));
        assert!(screen.contains(" G   A   T   O "));
        assert!(screen.contains("status line"));
    }

    #[test]
    fn test_render_outcome_dialog() {
        let engine = engine_with_secret("gato");
        let board = BoardSnapshot::capture(&engine);
        let dialog = Dialog::Outcome {
            won: false,
            secret: "gato".to_string(),
            phrase: DEFEAT_PHRASES[2],
        };
        let screen = render_to_string(&context(&board, Some(&dialog)));
        assert!(screen.contains("The word was: GATO"));
        assert!(screen.contains("Out of attempts"));
    }

    #[test]
    fn test_render_onboarding_dialog() {
        let engine = engine_with_secret("gato");
        let board = BoardSnapshot::capture(&engine);
        let screen = render_to_string(&context(&board, Some(&Dialog::Onboarding)));
        assert!(screen.contains("You have 6 attempts"));
    }

    #[test]
    fn test_current_attempt_spans_pad_to_secret_length() {
        let mut engine = engine_with_secret("gato");
        let _ = engine.append_character('g');
        let board = BoardSnapshot::capture(&engine);
        let spans = TuiInterface::current_attempt_spans(&board, None, LIGHT_PALETTE);
        assert_eq!(spans.len(), 4);
        assert_eq!(spans[0].content, " G ");
        assert_eq!(spans[1].content, "   ");
    }

    #[test]
    fn test_fading_cell_shows_removed_letter() {
        let mut engine = engine_with_secret("gato");
        let _ = engine.append_character('g');
        let board = BoardSnapshot::capture(&engine);
        let _ = engine.append_character('x');
        let _ = engine.remove_last_character();
        let board_after = BoardSnapshot::capture(&engine);
        assert_eq!(board.attempt.len(), board_after.attempt.len());

        let fading = FadingCell {
            position: 1,
            letter: 'x',
            guard: Deferred::new((), Duration::from_secs(3600)),
        };
        let spans = TuiInterface::current_attempt_spans(&board_after, Some(&fading), DARK_PALETTE);
        assert_eq!(spans[1].content, " X ");
        assert!(spans[1].style.add_modifier.contains(Modifier::DIM));
    }

    #[test]
    fn test_centered_rect_fits_area() {
        let area = Rect::new(0, 0, 40, 10);
        let rect = centered_rect(area, 60, 14);
        assert_eq!(rect, Rect::new(0, 0, 40, 10));
        let rect = centered_rect(Rect::new(0, 0, 100, 40), 60, 14);
        assert_eq!(rect, Rect::new(20, 13, 60, 14));
    }

    #[test]
    fn test_palette_marks_differ() {
        for palette in [LIGHT_PALETTE, DARK_PALETTE] {
            assert_ne!(palette.mark(Mark::Correct), palette.mark(Mark::Incorrect));
            assert_ne!(palette.mark(Mark::Correct), palette.mark(Mark::Unmarked));
        }
        assert_eq!(Palette::for_theme(Theme::Dark).background, Color::Black);
    }

    #[test]
    fn test_onboarding_survives_first_round_start() {
        let mut interface = fixed_interface(Preferences::default());
        let mut engine = engine_with_secret("gato");
        interface.show_onboarding(engine.max_attempts());
        present_all(&mut interface, &mut engine);
        assert!(
            interface
                .pending_dialog
                .as_ref()
                .and_then(Deferred::peek)
                .is_some_and(|dialog| matches!(dialog, Dialog::Onboarding))
        );
    }

    #[test]
    fn test_hidden_onboarding_schedules_nothing() {
        let preferences = Preferences {
            onboarding_hidden: true,
            ..Preferences::default()
        };
        let mut interface = fixed_interface(preferences);
        let mut engine = engine_with_secret("gato");
        interface.show_onboarding(engine.max_attempts());
        present_all(&mut interface, &mut engine);
        assert!(interface.pending_dialog.is_none());
        assert!(interface.dialog.is_none());
    }

    #[test]
    fn test_new_round_clears_outcome_dialog() {
        let mut interface = fixed_interface(Preferences::default());
        let mut engine = engine_with_secret("gato");
        present_all(&mut interface, &mut engine);
        for c in "gato".chars() {
            let _ = engine.append_character(c);
        }
        let _ = engine.submit_attempt();
        present_all(&mut interface, &mut engine);
        assert!(
            interface
                .pending_dialog
                .as_ref()
                .and_then(Deferred::peek)
                .is_some_and(Dialog::is_outcome)
        );

        let _ = engine.start_round_with_secret("perro");
        present_all(&mut interface, &mut engine);
        assert!(interface.pending_dialog.is_none());
        assert!(interface.board.accepting_input());
    }

    #[test]
    fn test_board_title_shows_attempts_left() {
        let mut engine = engine_with_secret("gato");
        for c in "casa".chars() {
            let _ = engine.append_character(c);
        }
        let _ = engine.submit_attempt();
        let board = BoardSnapshot::capture(&engine);
        assert_eq!(board.attempts_remaining, 5);
        let screen = render_to_string(&context(&board, None));
        assert!(screen.contains("Attempts 1/6 (5 left)"));
    }
}
