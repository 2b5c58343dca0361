use ratatui::crossterm::event::KeyEvent;

use dealdeck_core::view::ViewEvent;

/// All possible events in the application
#[derive(Debug)]
pub enum AppEvent {
    // Input events
    Key(KeyEvent),
    Resize(u16, u16),

    // Signals from the catalog pipeline
    View(ViewEvent),

    // UI events
    Tick, // spinner animation
}

impl From<ViewEvent> for AppEvent {
    fn from(event: ViewEvent) -> Self {
        AppEvent::View(event)
    }
}
