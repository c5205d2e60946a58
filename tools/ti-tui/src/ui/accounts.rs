//! Account list and pending edits.

use crate::app::App;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    render_accounts(frame, app, chunks[0]);
    render_pending(frame, app, chunks[1]);
}

fn render_accounts(frame: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .state
        .accounts()
        .iter()
        .map(|account| {
            let mut spans = vec![Span::raw(account.short())];
            if app.state.selected() == Some(account) {
                spans.push(Span::styled(" ●", Style::default().fg(Color::Green)));
            }
            if app.state.is_in_flight(account) {
                spans.push(Span::styled(" committing", Style::default().fg(Color::Yellow)));
            }
            let staged = app.state.pending_count(account);
            if staged > 0 {
                spans.push(Span::styled(
                    format!(" +{staged}"),
                    Style::default().fg(Color::Magenta),
                ));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let mut list_state = ListState::default();
    if !items.is_empty() {
        list_state.select(Some(app.account_cursor));
    }

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Accounts ({}) ", app.state.accounts().len())),
        )
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    frame.render_stateful_widget(list, area, &mut list_state);
}

fn render_pending(frame: &mut Frame, app: &App, area: Rect) {
    let pending = app
        .state
        .selected()
        .map(|account| app.state.pending(account))
        .unwrap_or_default();

    let items: Vec<ListItem> = pending
        .iter()
        .map(|(key, value)| {
            ListItem::new(Line::from(vec![
                Span::styled(key.to_string(), Style::default().fg(Color::Cyan)),
                Span::raw(" = "),
                Span::raw(value.to_string()),
            ]))
        })
        .collect();

    let mut list_state = ListState::default();
    if !items.is_empty() {
        list_state.select(Some(app.pending_cursor));
    }

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Staged ({}) ", pending.len())),
        )
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    frame.render_stateful_widget(list, area, &mut list_state);
}
