mod app;
mod audio;
mod cli;
mod config;
mod error;
mod library;
mod player;
mod runtime;
mod ui;

use clap::Parser;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run(cli::Args::parse())
}
