//! Ratatui-based interface wired to the query orchestrator.

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use crossterm::{ExecutableCommand, execute};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};
use serde::{Deserialize, Serialize};
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::api::http::HttpBackend;
use crate::config::ClientConfig;
use crate::default_data_dir;
use crate::model::types::Metric;
use crate::search::cache::ResponseCache;
use crate::search::highlight::highlight_line;
use crate::search::orchestrator::{QueryOrchestrator, SearchPhase};
use crate::ui::components::theme::ThemePalette;
use crate::ui::components::widgets::{param_pills, search_bar};

/// Result-limit presets cycled by F7.
const K_PRESETS: [usize; 4] = [3, 5, 10, 20];

/// Lightweight, non-secret UI preferences persisted across sessions.
#[derive(Serialize, Deserialize, Default)]
struct TuiStatePersisted {
    metric: Option<String>,
    k: Option<usize>,
    theme: Option<String>,
}

fn state_path_for(data_dir: &std::path::Path) -> std::path::PathBuf {
    data_dir.join("tui_state.json")
}

fn load_state(path: &std::path::Path) -> TuiStatePersisted {
    std::fs::read_to_string(path)
        .ok()
        .and_then(|s| serde_json::from_str(&s).ok())
        .unwrap_or_default()
}

fn save_state(path: &std::path::Path, state: &TuiStatePersisted) {
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    if let Ok(body) = serde_json::to_string_pretty(state) {
        let _ = std::fs::write(path, body);
    }
}

fn next_k_preset(current: usize) -> usize {
    match K_PRESETS.iter().position(|&k| k == current) {
        Some(idx) => K_PRESETS[(idx + 1) % K_PRESETS.len()],
        None => K_PRESETS[0],
    }
}

pub fn footer_legend(show_help: bool) -> &'static str {
    if show_help {
        "Esc clear/quit • type to live-search • Enter submit • F9 metric • F7 top-k • F2 theme • arrows select • F1 close help • F10 quit"
    } else {
        "F1 help | F9 metric | F7 top-k | F2 theme | Enter submit | Esc clear/quit"
    }
}

fn help_lines(palette: ThemePalette) -> Vec<Line<'static>> {
    let mut lines: Vec<Line<'static>> = Vec::new();

    let add_section = |title: &str, items: &[&str]| -> Vec<Line<'static>> {
        let mut v = Vec::new();
        v.push(Line::from(Span::styled(title.to_string(), palette.title())));
        for item in items {
            v.push(Line::from(format!("  {item}")));
        }
        v.push(Line::from(""));
        v
    };

    lines.extend(add_section(
        "Search",
        &[
            "type to live-search (debounced); Enter searches immediately",
            "matching terms are highlighted in results",
            "identical query + parameters are served from the session cache",
        ],
    ));
    lines.extend(add_section(
        "Parameters",
        &[
            "F9 cycles metric: cosine -> dot -> euclidean",
            "F7 cycles top-k: 3 / 5 / 10 / 20",
            "changing a parameter re-runs the active query immediately",
        ],
    ));
    lines.extend(add_section(
        "Navigation",
        &["Up/Down select result; PgUp/PgDn page"],
    ));
    lines.extend(add_section(
        "Misc",
        &[
            "F2 theme dark/light; preferences persist in tui_state.json",
            "Esc clears the query, or quits when it is already empty; F10 quits",
        ],
    ));

    lines
}

fn render_help_overlay(frame: &mut Frame, palette: ThemePalette) {
    let area = frame.area();
    let popup_area = centered_rect(70, 70, area);
    let block = Block::default()
        .title(Span::styled("Help / Shortcuts", palette.title()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.accent));

    frame.render_widget(ratatui::widgets::Clear, popup_area);
    frame.render_widget(
        Paragraph::new(help_lines(palette))
            .block(block)
            .wrap(Wrap { trim: true }),
        popup_area,
    );
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Percentage((100 - percent_y) / 2),
                Constraint::Percentage(percent_y),
                Constraint::Percentage((100 - percent_y) / 2),
            ]
            .as_ref(),
        )
        .split(r);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(
            [
                Constraint::Percentage((100 - percent_x) / 2),
                Constraint::Percentage(percent_x),
                Constraint::Percentage((100 - percent_x) / 2),
            ]
            .as_ref(),
        )
        .split(popup_layout[1]);

    horizontal[1]
}

pub fn run_tui(endpoint_override: Option<String>, once: bool) -> Result<()> {
    let config = ClientConfig::from_env().with_endpoint(endpoint_override);

    if once {
        return run_tui_headless(&config);
    }

    let backend = Arc::new(HttpBackend::new(&config)?);
    let cache = Arc::new(ResponseCache::new());
    let mut orchestrator = QueryOrchestrator::new(backend, cache, &config);

    let data_dir = default_data_dir();
    let state_path = state_path_for(&data_dir);
    let persisted = load_state(&state_path);
    if let Some(metric) = persisted.metric.as_deref().and_then(Metric::parse) {
        orchestrator.set_metric(metric);
    }
    if let Some(k) = persisted.k {
        orchestrator.set_k(k);
    }
    let mut theme_dark = persisted.theme.as_deref() != Some("light");

    let mut stdout = io::stdout();
    enable_raw_mode()?;
    stdout.execute(EnterAlternateScreen)?;
    let backend_impl = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend_impl)?;

    orchestrator.initial_load();

    let tick_rate = Duration::from_millis(30);
    let mut last_tick = Instant::now();
    let mut needs_draw = true;
    let mut show_help = false;
    let mut selected: usize = 0;
    let mut list_state = ListState::default();
    let status_endpoint = config.endpoint.clone();

    loop {
        if needs_draw {
            let palette = if theme_dark {
                ThemePalette::dark()
            } else {
                ThemePalette::light()
            };
            let state = orchestrator.state();
            let query = state.query.clone();

            terminal.draw(|f| {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .margin(1)
                    .constraints(
                        [
                            Constraint::Length(3), // search bar
                            Constraint::Length(1), // parameter pills
                            Constraint::Min(0),    // results
                            Constraint::Length(1), // footer
                        ]
                        .as_ref(),
                    )
                    .split(f.area());

                f.render_widget(search_bar(&query, palette, state.loading()), chunks[0]);
                f.render_widget(Paragraph::new(param_pills(state.params, palette)), chunks[1]);

                let items: Vec<ListItem> = state
                    .results
                    .iter()
                    .map(|hit| {
                        let header = Line::from(vec![
                            Span::styled(hit.id.clone(), palette.title()),
                            Span::raw("  "),
                            Span::styled(
                                format!("score {:.3}", hit.score),
                                Style::default().fg(palette.score),
                            ),
                        ]);
                        let body = highlight_line(
                            &hit.text,
                            &query,
                            palette.body(),
                            palette.emphasis(),
                        );
                        ListItem::new(vec![header, body, Line::from("")])
                    })
                    .collect();

                let results_title = match (state.phase, state.results.len()) {
                    (SearchPhase::Searching, _) => "Results (searching...)".to_string(),
                    (_, 0) if !query.trim().is_empty() => "Results - no matches".to_string(),
                    (_, n) => format!("Results ({n})"),
                };
                let list = List::new(items)
                    .block(
                        Block::default()
                            .title(Span::styled(results_title, palette.title()))
                            .borders(Borders::ALL)
                            .border_style(Style::default().fg(palette.border)),
                    )
                    .highlight_style(
                        Style::default().add_modifier(Modifier::REVERSED),
                    );
                list_state.select(if state.results.is_empty() {
                    None
                } else {
                    Some(selected.min(state.results.len() - 1))
                });
                f.render_stateful_widget(list, chunks[2], &mut list_state);

                let footer = match &state.error {
                    Some(message) => Line::from(Span::styled(
                        format!("error: {message} (any key to keep working)"),
                        palette.error_style(),
                    )),
                    None => Line::from(vec![
                        Span::styled(format!("{} | ", status_endpoint), palette.muted()),
                        Span::styled(footer_legend(false), palette.muted()),
                    ]),
                };
                f.render_widget(Paragraph::new(footer), chunks[3]);

                if show_help {
                    render_help_overlay(f, palette);
                }
            })?;
            needs_draw = false;
        }

        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)?
            && let Event::Key(key) = event::read()?
        {
            if key.kind == KeyEventKind::Release {
                continue;
            }
            let query = orchestrator.state().query.clone();
            match key.code {
                KeyCode::F(10) => break,
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => break,
                KeyCode::Esc => {
                    if show_help {
                        show_help = false;
                    } else if !query.is_empty() {
                        orchestrator.set_query("");
                        selected = 0;
                    } else {
                        break;
                    }
                    needs_draw = true;
                }
                KeyCode::F(1) => {
                    show_help = !show_help;
                    needs_draw = true;
                }
                KeyCode::F(2) => {
                    theme_dark = !theme_dark;
                    needs_draw = true;
                }
                KeyCode::F(9) => {
                    let next = orchestrator.state().params.metric.next();
                    orchestrator.set_metric(next);
                    needs_draw = true;
                }
                KeyCode::F(7) => {
                    let next = next_k_preset(orchestrator.state().params.k);
                    orchestrator.set_k(next);
                    needs_draw = true;
                }
                KeyCode::Enter => {
                    orchestrator.submit();
                    needs_draw = true;
                }
                KeyCode::Backspace => {
                    let mut q = query;
                    q.pop();
                    orchestrator.set_query(&q);
                    selected = 0;
                    needs_draw = true;
                }
                KeyCode::Up => {
                    selected = selected.saturating_sub(1);
                    needs_draw = true;
                }
                KeyCode::Down => {
                    let len = orchestrator.state().results.len();
                    if len > 0 && selected + 1 < len {
                        selected += 1;
                    }
                    needs_draw = true;
                }
                KeyCode::PageUp => {
                    selected = selected.saturating_sub(10);
                    needs_draw = true;
                }
                KeyCode::PageDown => {
                    let len = orchestrator.state().results.len();
                    if len > 0 {
                        selected = (selected + 10).min(len - 1);
                    }
                    needs_draw = true;
                }
                KeyCode::Char(c) => {
                    let mut q = query;
                    q.push(c);
                    orchestrator.set_query(&q);
                    selected = 0;
                    needs_draw = true;
                }
                _ => {}
            }
        }

        if last_tick.elapsed() >= tick_rate {
            if orchestrator.tick() {
                needs_draw = true;
            }
            last_tick = Instant::now();
        }
    }

    let state = orchestrator.state();
    let persisted_out = TuiStatePersisted {
        metric: Some(state.params.metric.label().to_string()),
        k: Some(state.params.k),
        theme: Some(if theme_dark { "dark" } else { "light" }.to_string()),
    };
    save_state(&state_path, &persisted_out);

    teardown_terminal()
}

/// Headless smoke path for `--once`: run the initial load against the
/// configured endpoint without entering the alternate screen.
fn run_tui_headless(config: &ClientConfig) -> Result<()> {
    let backend = Arc::new(HttpBackend::new(config)?);
    let cache = Arc::new(ResponseCache::new());
    let mut orchestrator = QueryOrchestrator::new(backend, cache, config);
    orchestrator.initial_load();

    let deadline = Instant::now() + config.request_timeout + Duration::from_secs(1);
    while orchestrator.state().phase == SearchPhase::Searching && Instant::now() < deadline {
        orchestrator.tick();
        std::thread::sleep(Duration::from_millis(10));
    }

    let state = orchestrator.state();
    match &state.error {
        Some(message) => println!("endpoint {}: error: {message}", config.endpoint),
        None => println!(
            "endpoint {}: {} posts loaded",
            config.endpoint,
            state.results.len()
        ),
    }
    Ok(())
}

fn teardown_terminal() -> Result<()> {
    let mut stdout = io::stdout();
    disable_raw_mode()?;
    execute!(stdout, LeaveAlternateScreen)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn state_roundtrip_persists_preferences() {
        let dir = TempDir::new().unwrap();
        let path = state_path_for(dir.path());

        let state = TuiStatePersisted {
            metric: Some("euclidean".into()),
            k: Some(20),
            theme: Some("light".into()),
        };
        save_state(&path, &state);

        let loaded = load_state(&path);
        assert_eq!(loaded.metric.as_deref(), Some("euclidean"));
        assert_eq!(loaded.k, Some(20));
        assert_eq!(loaded.theme.as_deref(), Some("light"));
    }

    #[test]
    fn missing_state_file_defaults() {
        let dir = TempDir::new().unwrap();
        let loaded = load_state(&state_path_for(dir.path()));
        assert!(loaded.metric.is_none());
        assert!(loaded.k.is_none());
    }

    #[test]
    fn k_presets_cycle_and_recover() {
        assert_eq!(next_k_preset(3), 5);
        assert_eq!(next_k_preset(20), 3);
        // A persisted value outside the presets snaps back to the first.
        assert_eq!(next_k_preset(42), 3);
    }
}
