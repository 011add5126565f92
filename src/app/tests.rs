use super::*;
use crate::library::Folder;
use crate::player::PlayerEvent;

fn f(id: &str) -> Folder {
    Folder {
        id: id.into(),
        title: format!("{id} title"),
        description: String::new(),
        cover: "cover.jpg".into(),
    }
}

fn app_with(ids: &[&str]) -> App {
    let mut app = App::new("songs", true);
    app.set_folders(ids.iter().map(|id| f(id)).collect());
    app
}

#[test]
fn library_cursor_wraps_both_ways() {
    let mut app = app_with(&["a", "b", "c"]);
    app.prev(0);
    assert_eq!(app.library_cursor, 2);
    app.next(0);
    assert_eq!(app.library_cursor, 0);
    app.next(0);
    assert_eq!(app.highlighted_folder().map(|f| f.id.as_str()), Some("b"));
}

#[test]
fn track_cursor_uses_given_length() {
    let mut app = app_with(&["a"]);
    app.switch_focus();
    assert_eq!(app.focus, Pane::Tracks);

    app.prev(4);
    assert_eq!(app.track_cursor, 3);
    app.next(4);
    assert_eq!(app.track_cursor, 0);

    app.next(0);
    assert_eq!(app.track_cursor, 0);
}

#[test]
fn hiding_sidebar_moves_focus_to_tracks() {
    let mut app = app_with(&["a"]);
    app.toggle_sidebar();
    assert!(!app.show_library);
    assert_eq!(app.focus, Pane::Tracks);

    app.switch_focus();
    assert_eq!(app.focus, Pane::Tracks);

    app.toggle_sidebar();
    app.switch_focus();
    assert_eq!(app.focus, Pane::Library);
}

#[test]
fn set_folders_clamps_cursor() {
    let mut app = app_with(&["a", "b", "c"]);
    app.library_cursor = 2;
    app.set_folders(vec![f("x")]);
    assert_eq!(app.library_cursor, 0);

    app.set_folders(Vec::new());
    assert_eq!(app.library_cursor, 0);
    assert!(app.highlighted_folder().is_none());
}

#[test]
fn folder_loaded_event_updates_status_and_cursors() {
    let mut app = app_with(&["a", "b"]);
    app.track_cursor = 5;

    app.apply_event(&PlayerEvent::FolderLoaded {
        folder_id: "b".into(),
        track_count: 3,
    });
    assert_eq!(app.library_cursor, 1);
    assert_eq!(app.track_cursor, 0);
    assert_eq!(app.status.as_deref(), Some("b title: 3 tracks"));

    app.apply_event(&PlayerEvent::TrackStarted { index: 2 });
    assert_eq!(app.track_cursor, 2);
}

#[test]
fn folder_failed_event_sets_status() {
    let mut app = app_with(&["a"]);
    app.apply_event(&PlayerEvent::FolderFailed {
        folder_id: "a".into(),
        message: "not found".into(),
    });
    assert_eq!(app.status.as_deref(), Some("could not load a: not found"));
}

#[test]
fn jump_top_and_bottom_follow_focus() {
    let mut app = app_with(&["a", "b", "c"]);
    app.jump_bottom(10);
    assert_eq!(app.library_cursor, 2);
    assert_eq!(app.track_cursor, 0);

    app.switch_focus();
    app.jump_bottom(10);
    assert_eq!(app.track_cursor, 9);
    app.jump_top();
    assert_eq!(app.track_cursor, 0);
    assert_eq!(app.library_cursor, 2);
}
