//! The deal grid with its search bar and status lines

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use dealdeck_core::catalog::{store_name, DealCard, ViewCriteria};

use crate::deals_cli::{EMPTY_NOTICE, ERROR_NOTICE};
use crate::tui::modal;
use crate::tui::state::{BrowserState, Focus, Modal, Status};
use crate::tui::theme::Theme;

/// Render the browse screen
pub fn render(frame: &mut Frame, state: &BrowserState, criteria: &ViewCriteria, theme: &Theme) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Search bar
            Constraint::Length(1), // Active filter and sort
            Constraint::Min(0),    // Grid
            Constraint::Length(1), // Footer
            Constraint::Length(1), // Help
        ])
        .split(frame.area());

    render_search_bar(frame, chunks[0], state, theme);
    render_criteria(frame, chunks[1], criteria, theme);
    render_grid(frame, chunks[2], state, theme);
    render_footer(frame, chunks[3], state, theme);
    render_help_bar(frame, chunks[4], theme);

    match &state.modal {
        Some(Modal::Detail(card)) => modal::render_detail_modal(frame, frame.area(), card, theme),
        Some(Modal::Alert(message)) => modal::render_alert_modal(frame, frame.area(), message, theme),
        None => {}
    }
}

fn render_search_bar(frame: &mut Frame, area: Rect, state: &BrowserState, theme: &Theme) {
    let focused = state.focus == Focus::Search;
    let title = if state.loading {
        format!(" Search  {} loading ", Theme::spinner(state.spinner_frame))
    } else {
        " Search ".to_string()
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(if focused { theme.focused } else { theme.muted });

    let width = block.inner(area).width.max(1) as usize;
    let scroll = state.search_input.visual_scroll(width);
    let input = Paragraph::new(state.search_input.value())
        .scroll((0, scroll as u16))
        .block(block);
    frame.render_widget(input, area);

    if focused {
        let cursor = state.search_input.visual_cursor().saturating_sub(scroll) as u16;
        frame.set_cursor_position((area.x + 1 + cursor, area.y + 1));
    }
}

fn render_criteria(frame: &mut Frame, area: Rect, criteria: &ViewCriteria, theme: &Theme) {
    let store = criteria
        .store_filter
        .as_deref()
        .map(store_name)
        .unwrap_or_else(|| "All stores".to_string());
    let sort = criteria
        .sort_key
        .map(|key| key.label())
        .unwrap_or("As listed");

    let line = Line::from(vec![
        Span::styled(" Store: ", theme.muted),
        Span::styled(store, theme.info),
        Span::styled("   Sort: ", theme.muted),
        Span::styled(sort, theme.info),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_grid(frame: &mut Frame, area: Rect, state: &BrowserState, theme: &Theme) {
    let block = Block::default()
        .title(format!(" Deals ({}) ", state.cards.len()))
        .borders(Borders::ALL);

    match state.status {
        Status::Error => {
            let notice = Paragraph::new(Span::styled(ERROR_NOTICE, theme.error)).block(block);
            frame.render_widget(notice, area);
            return;
        }
        Status::Empty => {
            let notice = Paragraph::new(Span::styled(EMPTY_NOTICE, theme.warning)).block(block);
            frame.render_widget(notice, area);
            return;
        }
        Status::Idle => {}
    }

    let items: Vec<ListItem> = state
        .cards
        .iter()
        .map(|card| ListItem::new(card_lines(card, theme)))
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(theme.selected);

    let mut list_state = ListState::default();
    if !state.cards.is_empty() {
        list_state.select(Some(state.selected_index));
    }
    frame.render_stateful_widget(list, area, &mut list_state);
}

/// Three lines per card: title and badge, prices and store, rating and blurb
fn card_lines<'a>(card: &'a DealCard, theme: &Theme) -> Vec<Line<'a>> {
    let mut title = vec![Span::styled(card.title.as_str(), theme.highlight)];
    if let Some(badge) = &card.discount_badge {
        title.push(Span::raw(" "));
        title.push(Span::styled(format!(" {badge} "), theme.badge));
    }

    let mut prices = vec![Span::raw("  "), Span::styled(card.sale_price.as_str(), theme.success)];
    if let Some(normal) = &card.normal_price {
        prices.push(Span::raw(" "));
        prices.push(Span::styled(normal.as_str(), theme.struck));
    }
    prices.push(Span::styled(format!("  {}", card.store), theme.muted));

    let details = vec![
        Span::raw("  "),
        Span::styled(card.rating.as_str(), theme.warning),
        Span::styled(format!("  {}", card.blurb), theme.muted),
    ];

    vec![Line::from(title), Line::from(prices), Line::from(details)]
}

fn render_footer(frame: &mut Frame, area: Rect, state: &BrowserState, theme: &Theme) {
    if state.cards.is_empty() {
        return;
    }
    // Result sets are capped; there is never a further page
    let footer = Paragraph::new(Span::styled(" No more games to load", theme.muted));
    frame.render_widget(footer, area);
}

fn render_help_bar(frame: &mut Frame, area: Rect, theme: &Theme) {
    let keys = [
        ("/", "Search"),
        ("Enter", "Details"),
        ("s", "Store"),
        ("o", "Sort"),
        ("↑↓", "Move"),
        ("q", "Quit"),
    ];

    let mut spans = Vec::new();
    for (key, label) in keys {
        spans.push(Span::styled(format!(" [{key}]"), theme.highlight));
        spans.push(Span::styled(format!(" {label} "), theme.muted));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
