//! Trie view: text or tree projection plus the latest reading.

use crate::app::App;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use ti_core::{grid_text, DisplayBox, DisplayChild, NodeKind, Projection, Reading};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(4)])
        .split(area);

    let root = app
        .state
        .displayed()
        .map(|d| d.model.root_hash.as_str())
        .unwrap_or("-");

    let lines = projection_lines(app.state.projection());
    let view = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Trie ({}) │ root {root} ", app.state.view_mode()))
                .border_style(Style::default().fg(Color::Blue)),
        );
    frame.render_widget(view, chunks[0]);

    let reading = Paragraph::new(reading_lines(app.state.last_reading()))
        .block(Block::default().borders(Borders::ALL).title(" Last Reading "));
    frame.render_widget(reading, chunks[1]);
}

/// Lines for the active projection.
pub fn projection_lines(projection: Projection<'_>) -> Vec<Line<'static>> {
    match projection {
        Projection::Idle => vec![placeholder("Press 'a' to add an account.")],
        Projection::Loading => vec![placeholder("Loading trie...")],
        Projection::NoTree(text) => vec![placeholder(text)],
        Projection::Text(text) => text.lines().map(|l| Line::raw(l.to_string())).collect(),
        Projection::Tree(layout) => {
            let mut lines = Vec::with_capacity(layout.box_count() * 4);
            push_box(&mut lines, layout);
            lines
        }
    }
}

fn placeholder(text: &str) -> Line<'static> {
    Line::from(Span::styled(
        text.to_string(),
        Style::default().fg(Color::DarkGray),
    ))
}

fn kind_color(kind: NodeKind) -> Color {
    match kind {
        NodeKind::Branch => Color::Yellow,
        NodeKind::Extension => Color::Magenta,
        NodeKind::Leaf => Color::Green,
        NodeKind::HashRef => Color::DarkGray,
        NodeKind::Opaque => Color::Red,
    }
}

fn push_box(lines: &mut Vec<Line<'static>>, layout: &DisplayBox) {
    let indent = "    ".repeat(layout.depth);
    lines.push(Line::from(vec![
        Span::raw(indent.clone()),
        Span::styled(
            format!("[{}]", layout.title),
            Style::default()
                .fg(kind_color(layout.kind))
                .add_modifier(Modifier::BOLD),
        ),
    ]));
    for field in &layout.fields {
        lines.push(Line::from(vec![
            Span::raw(format!("{indent}  ")),
            Span::styled(format!("{}: ", field.label), Style::default().fg(Color::Gray)),
            Span::raw(field.value.clone()),
        ]));
    }
    if let Some(grid) = &layout.slot_grid {
        lines.push(Line::from(vec![
            Span::raw(format!("{indent}  ")),
            Span::styled("Slots: ", Style::default().fg(Color::Gray)),
            Span::styled(grid_text(grid), Style::default().fg(Color::Yellow)),
        ]));
    }
    for child in &layout.children {
        match child {
            DisplayChild::Node(child) => push_box(lines, child),
            DisplayChild::EmptySlot { slot } => lines.push(Line::from(Span::styled(
                format!("{indent}    (Slot {slot:X}) empty"),
                Style::default().fg(Color::DarkGray),
            ))),
        }
    }
}

fn reading_lines(reading: Option<&Reading>) -> Vec<Line<'static>> {
    match reading {
        None => vec![placeholder("No reads yet.")],
        Some(Reading::Value {
            account,
            key,
            reading,
        }) => vec![
            Line::raw(format!(" value {} @ {}", key, account.short())),
            Line::from(vec![
                Span::styled(format!(" {}", reading.value), Style::default().fg(Color::Green)),
                Span::raw(format!("  originalMatch: {}", reading.original_match)),
            ]),
        ],
        Some(Reading::Proof {
            account,
            key,
            root,
            reading,
        }) => vec![
            Line::raw(format!(" proof {} @ {} against {}", key, account.short(), root)),
            Line::from(vec![
                Span::styled(format!(" {}", reading.value), Style::default().fg(Color::Green)),
                Span::raw(format!(
                    "  rootHash: {}",
                    reading.root_hash.as_deref().unwrap_or("-")
                )),
            ]),
        ],
    }
}
