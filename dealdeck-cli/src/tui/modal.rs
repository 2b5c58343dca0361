//! Modal overlays for the browser

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use dealdeck_core::catalog::DetailCard;

use super::theme::Theme;

/// Calculate centered modal area
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

fn close_hint(theme: &Theme) -> Line<'static> {
    Line::from(vec![
        Span::styled("[Esc]", theme.highlight),
        Span::raw(" Close"),
    ])
}

/// Render the game detail modal
pub fn render_detail_modal(frame: &mut Frame, area: Rect, card: &DetailCard, theme: &Theme) {
    let modal_area = centered_rect(60, 40, area);
    frame.render_widget(Clear, modal_area);

    let block = Block::default()
        .title(format!(" {} ", card.title))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme.modal_border);

    let inner = block.inner(modal_area);
    frame.render_widget(block, modal_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(4), Constraint::Length(1)])
        .split(inner);

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Original price: ", theme.muted),
            Span::styled(card.original_price.clone(), theme.struck),
        ]),
        Line::from(vec![
            Span::styled("Sale price:     ", theme.muted),
            Span::styled(card.sale_price.clone(), theme.success),
        ]),
        Line::from(""),
    ];
    match &card.steam_url {
        Some(url) => lines.push(Line::from(vec![
            Span::styled("Steam: ", theme.muted),
            Span::styled(url.clone(), theme.info),
        ])),
        None => lines.push(Line::from(Span::styled("Not on Steam", theme.muted))),
    }

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), chunks[0]);
    frame.render_widget(
        Paragraph::new(close_hint(theme)).alignment(Alignment::Center),
        chunks[1],
    );
}

/// Render a blocking notice
pub fn render_alert_modal(frame: &mut Frame, area: Rect, message: &str, theme: &Theme) {
    let modal_area = centered_rect(50, 20, area);
    frame.render_widget(Clear, modal_area);

    let block = Block::default()
        .title(" Error ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme.error);

    let inner = block.inner(modal_area);
    frame.render_widget(block, modal_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(inner);

    frame.render_widget(
        Paragraph::new(message.to_string())
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        chunks[0],
    );
    frame.render_widget(
        Paragraph::new(close_hint(theme)).alignment(Alignment::Center),
        chunks[1],
    );
}
