//! Main menu

use crate::input::{InputEvent, Key};
use crate::mode::{Mode, Transition};
use crate::settings::Settings;
use ratatui::Frame;

/// What a menu entry does when confirmed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Play,
    HighScores,
    Quit,
}

impl MenuAction {
    fn transition(self) -> Transition {
        match self {
            MenuAction::Play => Transition::ToPlay,
            MenuAction::HighScores => Transition::ToHighScores,
            MenuAction::Quit => Transition::Quit,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MenuItem {
    pub label: String,
    pub action: MenuAction,
}

/// Menu state
#[derive(Debug, Clone)]
pub struct Menu {
    pub selected: usize,
    pub items: Vec<MenuItem>,
}

impl Default for Menu {
    fn default() -> Self {
        Self::new()
    }
}

impl Menu {
    pub fn new() -> Self {
        Self::with_items(vec![
            MenuItem {
                label: "Play".to_string(),
                action: MenuAction::Play,
            },
            MenuItem {
                label: "High Scores".to_string(),
                action: MenuAction::HighScores,
            },
            MenuItem {
                label: "Quit Game".to_string(),
                action: MenuAction::Quit,
            },
        ])
    }

    pub fn with_items(items: Vec<MenuItem>) -> Self {
        assert!(!items.is_empty(), "menu needs at least one item");
        Self { selected: 0, items }
    }

    /// Move selection up, wrapping to the last item
    pub fn move_up(&mut self) {
        self.selected = (self.selected + self.items.len() - 1) % self.items.len();
    }

    /// Move selection down, wrapping to the first item
    pub fn move_down(&mut self) {
        self.selected = (self.selected + 1) % self.items.len();
    }

    /// Activate the selected item and reset the cursor for next time
    pub fn select(&mut self) -> MenuAction {
        let action = self.items[self.selected].action;
        self.selected = 0;
        action
    }
}

impl Mode for Menu {
    fn handle_event(&mut self, event: InputEvent) -> Transition {
        match event {
            InputEvent::Key(Key::Up) => self.move_up(),
            InputEvent::Key(Key::Down) => self.move_down(),
            InputEvent::Key(Key::Confirm) => return self.select().transition(),
            InputEvent::Key(Key::Quit) => return Transition::Quit,
            _ => {}
        }
        Transition::Stay
    }

    fn render(&self, frame: &mut Frame, _settings: &Settings) {
        crate::ui::render_menu(frame, self);
    }
}
