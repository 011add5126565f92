use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{info, warn};

use crate::app::App;
use crate::audio::{AssetStore, AudioPlayer};
use crate::cli::Args;
use crate::library::{LibraryLoader, SourceKind};
use crate::player::PlayerController;

mod event_loop;
mod fetch;
mod logging;
mod settings;
mod startup;

use fetch::Fetcher;
use logging::LogTarget;

pub fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut settings = settings::load_settings();
    settings::apply_args(&mut settings, &args);

    let target = if args.list { LogTarget::Stderr } else { LogTarget::File };
    if let Some(path) = logging::init(&settings.logging, target) {
        info!(log = %path.display(), "logging initialised");
    }

    let kind = match args.source.as_deref() {
        Some(location) => SourceKind::parse(location),
        None => SourceKind::from_settings(&settings.library),
    };
    info!(source = %kind.describe(), "starting albumdeck");

    let loader = LibraryLoader::new(kind.connect(&settings.library)?);
    let fetcher = Fetcher::new(loader)?;

    if args.list {
        return print_library(&fetcher);
    }

    let mut app = App::new(kind.describe(), settings.ui.show_library);
    match fetcher.list_folders_blocking() {
        Ok(folders) => app.set_folders(folders),
        Err(e) => {
            warn!(error = %e, "starting with an empty library");
            app.set_status(e.to_string());
        }
    }

    let audio_player = AudioPlayer::new(AssetStore::from_kind(&kind), settings.audio.clone())?;
    let mut player =
        PlayerController::new(audio_player).with_auto_advance(settings.playback.auto_advance);

    match startup::pick_default_folder(&app.folders, settings.library.default_folder.as_deref()) {
        Some(folder) => {
            let folder = folder.clone();
            app.focus_folder(&folder.id);
            app.set_status(format!("loading {}…", folder.title));
            fetcher.request_tracks(player.begin_load(folder));
        }
        None if app.status.is_none() => {
            app.set_status(format!("no folders found in {}", kind.describe()));
        }
        None => {}
    }

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result: Result<(), Box<dyn std::error::Error>> = (|| {
        let mut state = event_loop::EventLoopState::default();
        event_loop::run(
            &mut terminal,
            &settings,
            &mut app,
            &mut player,
            &fetcher,
            &mut state,
        )
    })();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    run_result
}

/// `--list`: print every folder and its tracks without touching audio.
fn print_library(fetcher: &Fetcher) -> Result<(), Box<dyn std::error::Error>> {
    let folders = fetcher.list_folders_blocking()?;
    if folders.is_empty() {
        println!("(no folders)");
    }
    for folder in &folders {
        println!("{}\t{}", folder.id, folder.title);
        if !folder.description.is_empty() {
            println!("  {}", folder.description);
        }
        match fetcher.list_tracks_blocking(folder) {
            Ok(tracks) => {
                for (i, track) in tracks.iter().enumerate() {
                    println!("  {:>3}. {}", i + 1, track.display());
                }
            }
            Err(e) => println!("  ! {e}"),
        }
    }
    Ok(())
}
