//! UI module for TUI rendering.

pub mod accounts;
pub mod trie;

use crate::app::App;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Render the whole screen.
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(10),   // Accounts + trie
            Constraint::Length(3), // Status / input
            Constraint::Length(1), // Key help
        ])
        .split(frame.area());

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(chunks[1]);

    render_header(frame, app, chunks[0]);
    accounts::render(frame, app, body[0]);
    trie::render(frame, app, body[1]);
    render_status(frame, app, chunks[2]);
    render_footer(frame, chunks[3]);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let selected = app
        .state
        .selected()
        .map(|a| a.to_string())
        .unwrap_or_else(|| "none".to_string());

    let header = Paragraph::new(Line::from(vec![
        Span::styled(" TRIE INSPECTOR ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("│ "),
        Span::styled(&app.backend_url, Style::default().fg(Color::Cyan)),
        Span::raw(" │ "),
        Span::styled(
            format!("Account: {selected}"),
            Style::default().fg(Color::White),
        ),
        Span::raw(" │ "),
        Span::styled(
            format!("View: {}", app.state.view_mode()),
            Style::default().fg(Color::Yellow),
        ),
    ]))
    .block(Block::default().borders(Borders::ALL));

    frame.render_widget(header, area);
}

fn render_status(frame: &mut Frame, app: &App, area: Rect) {
    let line = if let Some(prompt) = app.mode.prompt() {
        Line::from(vec![
            Span::styled(format!(" {prompt}: "), Style::default().fg(Color::Yellow)),
            Span::raw(&app.input),
            Span::styled("█", Style::default().fg(Color::DarkGray)),
        ])
    } else if let Some(error) = app.state.last_error() {
        Line::from(Span::styled(format!(" {error}"), Style::default().fg(Color::Red)))
    } else if let Some(status) = &app.status {
        Line::from(Span::styled(format!(" {status}"), Style::default().fg(Color::Green)))
    } else {
        Line::from(Span::styled(" Ready", Style::default().fg(Color::DarkGray)))
    };

    let block = Block::default().borders(Borders::ALL).title(" Status ");
    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn render_footer(frame: &mut Frame, area: Rect) {
    let keys = [
        ("a", "add"),
        ("↑↓/Enter", "select"),
        ("s", "stage"),
        ("←→/x", "unstage"),
        ("c", "commit"),
        ("g", "value"),
        ("p", "proof"),
        ("t/r/Tab", "view"),
        ("q", "quit"),
    ];
    let spans: Vec<Span> = keys
        .iter()
        .flat_map(|(key, action)| {
            [
                Span::styled(format!(" {key}"), Style::default().fg(Color::Yellow)),
                Span::styled(format!(" {action} "), Style::default().fg(Color::DarkGray)),
            ]
        })
        .collect();

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
