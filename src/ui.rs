//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock};

use crate::app::{App, Pane};
use crate::config::{ControlsSettings, UiSettings};
use crate::player::{PlaybackState, TimeDisplay};

static CONTROLS_MAP: LazyLock<BTreeMap<String, String>> = LazyLock::new(|| {
    let mut map: BTreeMap<String, String> = BTreeMap::new();
    map.insert("j/k".to_string(), "up/down".to_string());
    map.insert("gg/G".to_string(), "top/bottom".to_string());
    map.insert("tab".to_string(), "switch pane".to_string());
    map.insert("enter".to_string(), "open folder / play track".to_string());
    map.insert("space/p".to_string(), "play/pause".to_string());
    map.insert("h/l".to_string(), "prev/next track".to_string());
    // H/L is filled dynamically from config.
    map.insert("0-9".to_string(), "seek".to_string());
    map.insert("b".to_string(), "library".to_string());
    map.insert("r".to_string(), "reload".to_string());
    map.insert("q".to_string(), "quit".to_string());
    map
});

/// Render the controls help text, incorporating scrub seconds.
fn controls_text(scrub_seconds: u64) -> String {
    // Keep the rendered order stable and human-friendly.
    let order = [
        "j/k", "gg/G", "tab", "enter", "space/p", "h/l", "H/L", "0-9", "b", "r", "q",
    ];
    order
        .iter()
        .filter_map(|k| {
            if *k == "H/L" {
                Some(format!("[H/L] scrub -/+{}s", scrub_seconds))
            } else {
                CONTROLS_MAP.get(*k).map(|v| format!("[{}] {}", k, v))
            }
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Map a click column inside the seek bar to a fraction of the track.
pub fn seek_fraction_at(bar: Rect, column: u16, row: u16) -> Option<f64> {
    if bar.width == 0
        || column < bar.x
        || column >= bar.x + bar.width
        || row < bar.y
        || row >= bar.y + bar.height
    {
        return None;
    }
    let offset = f64::from(column - bar.x);
    let span = f64::from(bar.width.saturating_sub(1).max(1));
    Some((offset / span).clamp(0.0, 1.0))
}

fn now_playing_text(state: &PlaybackState, time: &TimeDisplay, ui: &UiSettings) -> String {
    let marker = if state.is_playing { "▶" } else { "⏸" };
    let clock = format!("{}{}{}", time.elapsed, ui.time_separator, time.total);
    match (state.current_track(), &state.folder) {
        (Some(track), Some(folder)) => {
            format!("{marker} {} · {}  [{clock}]", track.display(), folder.title)
        }
        _ => format!("nothing loaded  [{clock}]"),
    }
}

fn focused_block(title: &str, focused: bool) -> Block<'_> {
    let block = Block::default().borders(Borders::ALL).title(title);
    if focused {
        block.border_style(Style::default().add_modifier(Modifier::BOLD))
    } else {
        block
    }
}

/// Render the entire UI into `frame`. Returns the seek bar area so mouse
/// clicks can be mapped back with [`seek_fraction_at`].
pub fn draw(
    frame: &mut Frame,
    app: &App,
    state: &PlaybackState,
    time: &TimeDisplay,
    pending_folder: Option<&str>,
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
) -> Rect {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(4),
            Constraint::Length(4),
        ])
        .split(frame.area());

    // Header
    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" albumdeck · {} ", app.source_label))
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    // Body: library sidebar + track list
    let body = if app.show_library {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(chunks[1])
    } else {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(100)])
            .split(chunks[1])
    };

    let tracks_area = if app.show_library {
        draw_library(frame, app, state, body[0]);
        body[1]
    } else {
        body[0]
    };
    draw_tracks(frame, app, state, pending_folder, tracks_area);

    // Now playing + seek bar
    let np_block = Block::default()
        .borders(Borders::ALL)
        .title(" now playing ")
        .padding(Padding {
            left: 1,
            right: 1,
            top: 0,
            bottom: 0,
        });
    let np_inner = np_block.inner(chunks[2]);
    frame.render_widget(np_block, chunks[2]);
    let np_rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(np_inner);

    frame.render_widget(
        Paragraph::new(now_playing_text(state, time, ui_settings)),
        np_rows[0],
    );
    let gauge = Gauge::default()
        .ratio(time.progress.clamp(0.0, 1.0))
        .label("")
        .gauge_style(Style::default().add_modifier(Modifier::REVERSED));
    frame.render_widget(gauge, np_rows[1]);

    // Footer: status + controls
    let mut footer_lines = Vec::new();
    if let Some(status) = &app.status {
        footer_lines.push(Line::from(Span::raw(status.as_str()).italic()));
    }
    footer_lines.push(Line::from(controls_text(controls_settings.scrub_seconds)));
    let footer = Paragraph::new(footer_lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[3]);

    np_rows[1]
}

fn draw_library(frame: &mut Frame, app: &App, state: &PlaybackState, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(5)])
        .split(area);

    let loaded_id = state.folder.as_ref().map(|f| f.id.as_str());
    let items: Vec<ListItem> = app
        .folders
        .iter()
        .map(|folder| {
            let mark = if Some(folder.id.as_str()) == loaded_id { "♪ " } else { "  " };
            ListItem::new(vec![
                Line::from(format!("{mark}{}", folder.title)).bold(),
                Line::from(format!("  {}", folder.description)).dim(),
            ])
        })
        .collect();

    let list = List::new(items)
        .block(focused_block(" library ", app.focus == Pane::Library))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    let mut list_state = ListState::default();
    if !app.folders.is_empty() {
        list_state.select(Some(app.library_cursor));
    }
    frame.render_stateful_widget(list, rows[0], &mut list_state);

    let cover = match app.highlighted_folder() {
        Some(folder) => format!("{}\ncover: {}", folder.title, folder.cover_path()),
        None => "no folders".to_string(),
    };
    frame.render_widget(
        Paragraph::new(cover)
            .block(Block::default().borders(Borders::ALL).title(" album "))
            .wrap(Wrap { trim: true }),
        rows[1],
    );
}

fn draw_tracks(
    frame: &mut Frame,
    app: &App,
    state: &PlaybackState,
    pending_folder: Option<&str>,
    area: Rect,
) {
    let title = match (pending_folder, &state.folder) {
        (Some(id), _) => format!(" tracks · loading {id}… "),
        (None, Some(folder)) => format!(" tracks · {} ", folder.title),
        (None, None) => " tracks ".to_string(),
    };

    let items: Vec<ListItem> = state
        .tracks
        .iter()
        .enumerate()
        .map(|(i, track)| {
            let marker = if i == state.current_index && state.is_playing {
                "▶ "
            } else if i == state.current_index {
                "· "
            } else {
                "  "
            };
            ListItem::new(format!("{marker}{}", track.display()))
        })
        .collect();

    let list = List::new(items)
        .block(focused_block(&title, app.focus == Pane::Tracks))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut list_state = ListState::default();
    if state.has_tracks() {
        list_state.select(Some(app.track_cursor.min(state.tracks.len() - 1)));
    }
    frame.render_stateful_widget(list, area, &mut list_state);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn controls_text_includes_scrub_seconds() {
        let text = controls_text(7);
        assert!(text.contains("[H/L] scrub -/+7s"));
        assert!(text.starts_with("[j/k] up/down"));
        assert!(text.ends_with("[q] quit"));
    }

    #[test]
    fn seek_fraction_maps_columns_across_bar() {
        let bar = Rect::new(10, 5, 11, 1);
        assert_eq!(seek_fraction_at(bar, 10, 5), Some(0.0));
        assert_eq!(seek_fraction_at(bar, 15, 5), Some(0.5));
        assert_eq!(seek_fraction_at(bar, 20, 5), Some(1.0));
        assert_eq!(seek_fraction_at(bar, 21, 5), None);
        assert_eq!(seek_fraction_at(bar, 15, 6), None);
        assert_eq!(seek_fraction_at(Rect::default(), 0, 0), None);
    }
}
