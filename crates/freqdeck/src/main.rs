use clap::Parser;
use colored::Colorize;

mod app;
mod cli;
mod clip;
mod commands;
mod config;
mod deck;
mod effects;
mod indicators;
mod logging;
mod media;
mod navigation;
mod oneshot;
mod slides;
mod theme;
mod trim;
mod visualizer;

fn main() {
    let cli = cli::Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }
    logging::init(cli.verbose, cli.quiet, cli.no_color);
    tracing::info!("freqdeck loaded");

    if let Err(e) = cli.run() {
        eprintln!("{} {e:#}", "error:".red().bold());
        std::process::exit(1);
    }
}
