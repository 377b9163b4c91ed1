use crate::engine::{Action, Event, GuessEngine, Phase};
use crate::{debug_log, info_log};

/// Input adapter events, already validated against the game alphabet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAction {
    Type(char),
    Backspace,
    /// The presentation finished showing a removal.
    RemovalComplete,
    Submit,
    NewGame,
    Exit,
}

/// Trait for a front end that feeds the engine and shows its events.
/// This allows the game loop to work with the line CLI and the TUI alike.
pub trait GameInterface {
    /// Show how to play.
    fn show_onboarding(&mut self, max_attempts: usize);

    /// Wait for the next action. `None` means nothing to do yet.
    fn read_action(&mut self) -> Option<UserAction>;

    /// Show one engine event. The engine is passed along for redraws.
    fn present(&mut self, event: &Event, engine: &GuessEngine);

    fn display_exit_message(&mut self);
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub rounds_won: usize,
    pub rounds_lost: usize,
}

impl SessionSummary {
    #[must_use]
    pub fn rounds_played(&self) -> usize {
        self.rounds_won + self.rounds_lost
    }
}

/// Applies one action to the engine. Returns `None` for `Exit`.
pub fn apply_action(engine: &mut GuessEngine, action: UserAction) -> Option<Action> {
    let result = match action {
        UserAction::Type(c) => engine.append_character(c),
        UserAction::Backspace => engine.remove_last_character(),
        UserAction::RemovalComplete => engine.complete_removal(),
        UserAction::Submit => engine.submit_attempt(),
        UserAction::NewGame => {
            engine.start_round();
            Action::Applied
        }
        UserAction::Exit => return None,
    };
    if result == Action::Ignored {
        debug_log!("apply_action() - {:?} ignored in phase {:?}", action, engine.phase());
    }
    Some(result)
}

fn flush_events<I: GameInterface + ?Sized>(
    engine: &mut GuessEngine,
    interface: &mut I,
    summary: &mut SessionSummary,
) {
    while let Some(event) = engine.next_event() {
        match event {
            Event::RoundWon { .. } => summary.rounds_won += 1,
            Event::RoundLost { .. } => summary.rounds_lost += 1,
            _ => {}
        }
        interface.present(&event, engine);
    }
}

/// Runs rounds until the interface asks to exit.
pub fn game_loop<I: GameInterface + ?Sized>(
    engine: &mut GuessEngine,
    interface: &mut I,
) -> SessionSummary {
    let mut summary = SessionSummary::default();

    interface.show_onboarding(engine.max_attempts());
    if engine.phase() == Phase::Idle {
        engine.start_round();
    }
    flush_events(engine, interface, &mut summary);

    loop {
        let Some(action) = interface.read_action() else {
            continue;
        };
        info_log!("game_loop() - Action: {:?}", action);

        if apply_action(engine, action).is_none() {
            interface.display_exit_message();
            break;
        }
        flush_events(engine, interface, &mut summary);
    }

    log::info!(
        "Session over: {} won, {} lost",
        summary.rounds_won,
        summary.rounds_lost
    );
    summary
}
