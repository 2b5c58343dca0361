//! Browser state and the pure transitions over it

use ratatui::crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use tui_input::backend::crossterm::EventHandler;
use tui_input::Input;

use dealdeck_core::catalog::{DealCard, DetailCard};
use dealdeck_core::view::ViewEvent;

/// Banner shown in place of the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Idle,
    Empty,
    Error,
}

/// Where key presses go
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Grid,
    Search,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modal {
    Detail(DetailCard),
    Alert(String),
}

/// Work the app has to hand to the pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Search(String),
    OpenDetail(String),
    CycleStore,
    CycleSort,
    Quit,
}

#[derive(Debug, Default)]
pub struct BrowserState {
    pub cards: Vec<DealCard>,
    pub selected_index: usize,
    pub status: Status,
    pub loading: bool,
    pub focus: Focus,
    pub search_input: Input,
    pub modal: Option<Modal>,
    /// Advances on every tick while loading
    pub spinner_frame: usize,
}

impl BrowserState {
    /// Fold a pipeline signal into the state
    pub fn apply(&mut self, event: ViewEvent) {
        match event {
            ViewEvent::List(records) => {
                self.cards = records.iter().map(DealCard::from).collect();
                self.selected_index = 0;
                self.status = Status::Idle;
            }
            ViewEvent::Empty => {
                self.cards.clear();
                self.selected_index = 0;
                self.status = Status::Empty;
            }
            ViewEvent::Error => {
                self.cards.clear();
                self.selected_index = 0;
                self.status = Status::Error;
            }
            ViewEvent::ClearStatus => self.status = Status::Idle,
            ViewEvent::Loading(loading) => self.loading = loading,
            ViewEvent::Detail(detail) => self.modal = Some(Modal::Detail(DetailCard::from(&detail))),
            ViewEvent::Alert(message) => self.modal = Some(Modal::Alert(message)),
        }
    }

    pub fn tick(&mut self) {
        if self.loading {
            self.spinner_frame = self.spinner_frame.wrapping_add(1);
        }
    }

    pub fn selected_card(&self) -> Option<&DealCard> {
        self.cards.get(self.selected_index)
    }

    /// Translate a key press into state changes and, maybe, an action
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        if self.modal.is_some() {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
                self.modal = None;
            }
            return None;
        }

        match self.focus {
            Focus::Search => self.handle_search_key(key),
            Focus::Grid => self.handle_grid_key(key),
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Esc => {
                self.focus = Focus::Grid;
                None
            }
            KeyCode::Enter => {
                self.focus = Focus::Grid;
                Some(Action::Search(self.search_input.value().to_string()))
            }
            _ => {
                self.search_input.handle_event(&Event::Key(key));
                None
            }
        }
    }

    fn handle_grid_key(&mut self, key: KeyEvent) -> Option<Action> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return None;
        }

        match key.code {
            KeyCode::Char('/') => {
                self.focus = Focus::Search;
                None
            }
            KeyCode::Enter => self
                .selected_card()
                .map(|card| Action::OpenDetail(card.game_id.clone())),
            KeyCode::Char('s') => Some(Action::CycleStore),
            KeyCode::Char('o') => Some(Action::CycleSort),
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected_index = self.selected_index.saturating_sub(1);
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected_index + 1 < self.cards.len() {
                    self.selected_index += 1;
                }
                None
            }
            KeyCode::Char('q') => Some(Action::Quit),
            _ => None,
        }
    }
}
