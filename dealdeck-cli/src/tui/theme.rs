use ratatui::style::{Color, Modifier, Style};

/// Consistent theme for the TUI
pub struct Theme {
    pub selected: Style,
    pub focused: Style,
    pub error: Style,
    pub success: Style,
    pub warning: Style,
    pub info: Style,
    pub muted: Style,
    pub highlight: Style,
    pub badge: Style,
    pub struck: Style,
    pub modal_border: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            selected: Style::default()
                .bg(Color::Rgb(50, 50, 80))
                .add_modifier(Modifier::BOLD),
            focused: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            error: Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
            success: Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
            warning: Style::default()
                .fg(Color::Yellow),
            info: Style::default()
                .fg(Color::Blue),
            muted: Style::default()
                .fg(Color::DarkGray),
            highlight: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            badge: Style::default()
                .fg(Color::Black)
                .bg(Color::Green)
                .add_modifier(Modifier::BOLD),
            struck: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::CROSSED_OUT),
            modal_border: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        }
    }
}

impl Theme {
    /// Spinner glyph for the given frame
    pub fn spinner(frame: usize) -> &'static str {
        const FRAMES: [&str; 4] = ["|", "/", "-", "\\"];
        FRAMES[frame % FRAMES.len()]
    }
}
