use std::time::Duration;

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{Terminal, backend::CrosstermBackend, layout::Rect};
use tracing::{debug, warn};

use crate::app::{App, Pane};
use crate::audio::{AudioPlayer, PlaybackHandle};
use crate::config;
use crate::player::PlayerController;
use crate::ui;

use super::fetch::{FetchMsg, Fetcher};

type Player = PlayerController<AudioPlayer>;

/// State tracked by the runtime event loop across iterations.
#[derive(Default)]
pub struct EventLoopState {
    /// Internal two-key prefix state used for `gg` handling.
    pub pending_gg: bool,
    /// Seek bar area from the last draw, for mouse clicks.
    pub seek_bar: Rect,
}

/// Main terminal event loop: handles input, UI drawing, fetch results and
/// sync with the audio thread. Returns `Ok(())` when shutdown is requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    player: &mut Player,
    fetcher: &Fetcher,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    let playback = player.output().playback_handle();

    loop {
        while let Some(msg) = fetcher.try_recv() {
            handle_fetch_msg(msg, app, player);
        }

        sync_playback(&playback, app, player);

        for ev in player.drain_events() {
            app.apply_event(&ev);
        }

        terminal.draw(|f| {
            state.seek_bar = ui::draw(
                f,
                app,
                player.state(),
                player.time_display(),
                player.pending_folder(),
                &settings.ui,
                &settings.controls,
            );
        })?;

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if handle_key_event(key, settings, app, player, fetcher, state)? {
                        break;
                    }
                }
                Event::Mouse(mouse) => handle_mouse_event(mouse, player, state),
                _ => {}
            }
        }
    }

    Ok(())
}

fn handle_fetch_msg(msg: FetchMsg, app: &mut App, player: &mut Player) {
    match msg {
        FetchMsg::Catalog(Ok(folders)) => {
            let count = folders.len();
            let highlighted = app.highlighted_folder().map(|f| f.id.clone());
            app.set_folders(folders);
            if let Some(id) = highlighted {
                app.focus_folder(&id);
            }
            app.set_status(format!("catalog reloaded: {count} folders"));
        }
        FetchMsg::Catalog(Err(e)) => {
            warn!(error = %e, "catalog reload failed");
            app.set_folders(Vec::new());
            app.set_status(e.to_string());
        }
        FetchMsg::Tracks(ticket, result) => {
            // Failures surface through the controller's FolderFailed event.
            let _ = player.finish_load(ticket, result);
        }
    }
}

/// Feed the audio thread's progress into the controller. Snapshots from any
/// load but the latest (including a restart of the same track) are ignored.
fn sync_playback(handle: &PlaybackHandle, app: &mut App, player: &mut Player) {
    let load_id = player.output().current_load();
    let Some(progress) = handle
        .lock()
        .ok()
        .and_then(|mut info| info.take_progress(load_id))
    else {
        return;
    };

    if let Some(err) = progress.error {
        app.set_status(format!("cannot play: {err}"));
    }
    player.on_time_update(progress.position, progress.duration);
    if progress.ended {
        debug!("track ended");
        player.on_track_ended();
    }
}

fn handle_mouse_event(mouse: MouseEvent, player: &mut Player, state: &EventLoopState) {
    if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
        if let Some(fraction) = ui::seek_fraction_at(state.seek_bar, mouse.column, mouse.row) {
            player.seek(fraction);
        }
    }
}

fn handle_key_event(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    player: &mut Player,
    fetcher: &Fetcher,
    state: &mut EventLoopState,
) -> Result<bool, Box<dyn std::error::Error>> {
    let track_count = player.state().tracks.len();

    if key.code != KeyCode::Char('g') {
        state.pending_gg = false;
    }

    match key.code {
        KeyCode::Char('q') => {
            player.output().quit_softly();
            return Ok(true);
        }
        KeyCode::Tab => app.switch_focus(),
        KeyCode::Char('b') => app.toggle_sidebar(),
        KeyCode::Char('j') | KeyCode::Down => app.next(track_count),
        KeyCode::Char('k') | KeyCode::Up => app.prev(track_count),
        KeyCode::Char('g') => {
            if state.pending_gg {
                state.pending_gg = false;
                app.jump_top();
            } else {
                state.pending_gg = true;
            }
        }
        KeyCode::Char('G') => app.jump_bottom(track_count),
        KeyCode::Enter => match app.focus {
            Pane::Library => {
                if let Some(folder) = app.highlighted_folder().cloned() {
                    app.set_status(format!("loading {}…", folder.title));
                    fetcher.request_tracks(player.begin_load(folder));
                }
            }
            Pane::Tracks => {
                player.select_track(app.track_cursor);
            }
        },
        KeyCode::Char('p') | KeyCode::Char(' ') => player.toggle_play_pause(),
        KeyCode::Char('l') | KeyCode::Char('n') => player.next(),
        KeyCode::Char('h') => player.previous(),
        KeyCode::Char('L') => {
            player.scrub(settings.controls.scrub_seconds as f64);
        }
        KeyCode::Char('H') => {
            player.scrub(-(settings.controls.scrub_seconds as f64));
        }
        KeyCode::Char(c @ '0'..='9') => {
            let tenth = f64::from(c.to_digit(10).unwrap_or(0));
            player.seek(tenth / 10.0);
        }
        KeyCode::Char('r') => {
            app.set_status("reloading catalog…");
            fetcher.request_catalog();
        }
        _ => {}
    }

    Ok(false)
}
