use clap::Parser;

/// Terminal player for folder-based audio libraries.
#[derive(Parser, Debug, Default)]
#[command(name = "albumdeck")]
#[command(about = "Browse album folders and play their tracks")]
#[command(version)]
pub struct Args {
    /// Library location: a directory or an http(s) base URL.
    /// Overrides `[library]` in the config file.
    #[arg(env = "ALBUMDECK_SOURCE")]
    pub source: Option<String>,

    /// Folder to load at startup.
    #[arg(long)]
    pub folder: Option<String>,

    /// Print the catalog and every folder's tracks, then exit.
    #[arg(long)]
    pub list: bool,
}
