use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::app::PresentOptions;
use crate::config::Config;
use crate::deck::Deck;

#[derive(Parser)]
#[command(name = "freqdeck")]
#[command(author, version, about)]
#[command(long_about = "A full-screen slide deck with background music.\n\n\
    Navigate with arrow keys, swipes, the mouse wheel or the dots along the\n\
    bottom edge. Music starts on the first click or key press.\n\n\
    Examples:\n  \
    freqdeck talk.yaml              Present fullscreen\n  \
    freqdeck talk.yaml --windowed   Present in a window\n  \
    freqdeck check talk.yaml        Validate a deck")]
#[command(propagate_version = true)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Deck file (YAML) to present
    pub file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Launch in a window instead of fullscreen
    #[arg(long, global = false)]
    pub windowed: bool,

    /// Start on a specific slide (1-indexed)
    #[arg(long, global = false)]
    pub slide: Option<usize>,

    /// Skip the start screen and begin playback immediately
    #[arg(long, global = false)]
    pub autostart: bool,

    /// Type out the title slide heading
    #[arg(long, global = false)]
    pub typewriter: bool,

    /// Never attempt to play music
    #[arg(long, global = false)]
    pub muted: bool,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate a deck and print a summary
    Check {
        /// Deck file to check
        file: PathBuf,
    },

    /// View and modify configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Display current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g. defaults.volume, navigation.wheel_cooldown_ms)
        key: String,

        /// Value to set
        value: String,
    },
}

#[derive(Clone, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

impl Cli {
    /// Options for the presentation window: command-line flags over config.
    pub fn present_options(&self, config: &Config) -> PresentOptions {
        PresentOptions {
            windowed: self.windowed,
            start_slide: self.slide.map(|n| n.saturating_sub(1)),
            autostart: self.autostart || config.autostart(),
            typewriter: self.typewriter || config.typewriter(),
            muted: self.muted,
            volume: config.volume(),
            swipe_threshold: config.swipe_threshold(),
            wheel_cooldown: config.wheel_cooldown(),
            particles: config.particles(),
            parallax: config.parallax(),
            bars: config.bars(),
        }
    }

    pub fn run(self) -> anyhow::Result<()> {
        match self.command {
            Some(Commands::Check { file }) => crate::commands::check::run(&file),
            Some(Commands::Config { command }) => crate::commands::config::run(command),
            Some(Commands::Completion { shell }) => {
                crate::commands::completion::run(shell);
                Ok(())
            }
            Some(Commands::Version) => {
                println!("freqdeck {}", env!("CARGO_PKG_VERSION"));
                Ok(())
            }
            None => {
                if let Some(file) = &self.file {
                    if !file.exists() {
                        anyhow::bail!("File not found: {}", file.display());
                    }
                    let deck = Deck::load(file)?;
                    for warning in deck.warnings() {
                        tracing::warn!("{warning}");
                    }
                    let options = self.present_options(&Config::load_or_default());
                    crate::app::run(deck, options)
                } else {
                    use clap::CommandFactory;
                    let mut cmd = Self::command();
                    cmd.print_help()?;
                    println!();
                    Ok(())
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_parse_present_flags() {
        let cli = Cli::try_parse_from([
            "freqdeck",
            "talk.yaml",
            "--windowed",
            "--slide",
            "3",
            "--muted",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.file, Some(PathBuf::from("talk.yaml")));
        assert!(cli.windowed);
        assert!(cli.muted);
        assert_eq!(cli.verbose, 2);
        let options = cli.present_options(&Config::default());
        assert_eq!(options.start_slide, Some(2));
        assert!(!options.autostart);
    }

    #[test]
    fn test_flags_override_config() {
        let mut config = Config::default();
        config.set("navigation.wheel_cooldown_ms", "300").unwrap();
        config.set("defaults.typewriter", "false").unwrap();
        let cli = Cli::try_parse_from(["freqdeck", "talk.yaml", "--typewriter"]).unwrap();
        let options = cli.present_options(&config);
        assert!(options.typewriter);
        assert_eq!(options.wheel_cooldown, Duration::from_millis(300));
    }

    #[test]
    fn test_subcommands_parse() {
        let cli = Cli::try_parse_from(["freqdeck", "config", "set", "effects.bars", "16"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Config {
                command: ConfigCommands::Set { .. }
            })
        ));
        let cli = Cli::try_parse_from(["freqdeck", "check", "talk.yaml"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Check { .. })));
    }
}
