//! Small reusable widgets for the search screen.

use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use super::theme::ThemePalette;
use crate::model::types::SearchParams;

/// The query input bar. Shows a placeholder when empty and a spinner-ish
/// suffix while a request is in flight.
pub fn search_bar<'a>(query: &'a str, palette: ThemePalette, loading: bool) -> Paragraph<'a> {
    let mut spans: Vec<Span> = Vec::new();
    if query.is_empty() {
        spans.push(Span::styled(
            "Search posts... (Enter submits, Esc clears)",
            palette.muted(),
        ));
    } else {
        spans.push(Span::styled(query, palette.body()));
        spans.push(Span::styled("_", palette.emphasis()));
    }

    let title = if loading {
        Span::styled("Search (fetching...)", palette.title())
    } else {
        Span::styled("Search", palette.title())
    };

    Paragraph::new(Line::from(spans)).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette.border)),
    )
}

/// One-line parameter summary: active metric and result limit.
pub fn param_pills(params: SearchParams, palette: ThemePalette) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("[metric:{}]", params.metric.label()),
            Style::default()
                .fg(palette.accent_alt)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(format!("[k:{}]", params.k), Style::default().fg(palette.accent_alt)),
        Span::raw("  "),
        Span::styled("F9 metric | F7 top-k", palette.muted()),
    ])
}
