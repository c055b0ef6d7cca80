//! Top-level modes: menu, play and high scores
//!
//! Each mode reports what should happen next through a [`Transition`]; the
//! [`App`] owns every mode and is the only place the active one changes.

use crate::game::{Action, Game, GameEvent};
use crate::highscore::{HighScoreScreen, Ledger};
use crate::input::{InputEvent, Key};
use crate::menu::Menu;
use crate::settings::Settings;
use ratatui::Frame;
use std::time::Duration;

/// Requested change of mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Stay,
    ToMenu,
    ToPlay,
    ToHighScores,
    /// The game ended with this score
    GameFinished(u64),
    Quit,
}

/// Shared contract of every mode
pub trait Mode {
    fn handle_event(&mut self, event: InputEvent) -> Transition;

    fn update(&mut self, _delta: Duration) -> Transition {
        Transition::Stay
    }

    /// Draw the mode; must not change any state
    fn render(&self, frame: &mut Frame, settings: &Settings);
}

impl Mode for Game {
    fn handle_event(&mut self, event: InputEvent) -> Transition {
        let action = match event {
            InputEvent::Key(Key::Up | Key::RotateRight) => Action::RotateRight,
            InputEvent::Key(Key::RotateLeft) => Action::RotateLeft,
            InputEvent::Key(Key::Left) => Action::MoveLeft,
            InputEvent::Key(Key::Right) => Action::MoveRight,
            InputEvent::Key(Key::Down) => Action::SoftDrop,
            InputEvent::Key(Key::HardDrop) => Action::HardDrop,
            InputEvent::Key(Key::Hold) => Action::Hold,
            InputEvent::Key(Key::Pause) => Action::Pause,
            _ => return Transition::Stay,
        };
        self.process_action(action);
        Transition::Stay
    }

    fn update(&mut self, delta: Duration) -> Transition {
        match Game::update(self, delta) {
            Some(GameEvent::Finished { score }) => Transition::GameFinished(score),
            None => Transition::Stay,
        }
    }

    fn render(&self, frame: &mut Frame, settings: &Settings) {
        crate::ui::render_game(frame, self, settings);
    }
}

/// Which mode receives input and time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveMode {
    Menu,
    Play,
    HighScores,
}

/// Owns every mode and switches between them
pub struct App {
    menu: Menu,
    game: Game,
    high_scores: HighScoreScreen,
    active: ActiveMode,
    quit: bool,
}

impl App {
    pub fn new(game: Game, ledger: Ledger) -> Self {
        Self {
            menu: Menu::new(),
            game,
            high_scores: HighScoreScreen::new(ledger),
            active: ActiveMode::Menu,
            quit: false,
        }
    }

    #[allow(dead_code)]
    pub fn active(&self) -> ActiveMode {
        self.active
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// True while the player is typing a name, when letter keys must not
    /// trigger anything else
    pub fn is_entering_name(&self) -> bool {
        self.active == ActiveMode::HighScores && self.high_scores.is_typing()
    }

    pub fn ledger(&self) -> &Ledger {
        &self.high_scores.ledger
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    fn active_mode(&self) -> &dyn Mode {
        match self.active {
            ActiveMode::Menu => &self.menu,
            ActiveMode::Play => &self.game,
            ActiveMode::HighScores => &self.high_scores,
        }
    }

    fn active_mode_mut(&mut self) -> &mut dyn Mode {
        match self.active {
            ActiveMode::Menu => &mut self.menu,
            ActiveMode::Play => &mut self.game,
            ActiveMode::HighScores => &mut self.high_scores,
        }
    }

    pub fn handle_event(&mut self, event: InputEvent) {
        let transition = self.active_mode_mut().handle_event(event);
        self.apply(transition);
    }

    pub fn update(&mut self, delta: Duration) {
        let transition = self.active_mode_mut().update(delta);
        self.apply(transition);
    }

    pub fn render(&self, frame: &mut Frame, settings: &Settings) {
        self.active_mode().render(frame, settings);
    }

    fn apply(&mut self, transition: Transition) {
        let next = match transition {
            Transition::Stay => return,
            Transition::Quit => {
                self.quit = true;
                return;
            }
            Transition::ToMenu => ActiveMode::Menu,
            Transition::ToPlay => ActiveMode::Play,
            Transition::ToHighScores => ActiveMode::HighScores,
            Transition::GameFinished(score) => {
                if self.high_scores.ledger.is_qualifying(score) {
                    self.high_scores.record_new_high_score(score);
                    ActiveMode::HighScores
                } else {
                    ActiveMode::Menu
                }
            }
        };
        tracing::info!(from = ?self.active, to = ?next, "mode change");
        self.active = next;
    }
}
