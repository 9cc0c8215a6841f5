//! CLI argument parser.
//!
//! Standalone mode generates a single song concept and prints it, which is
//! handy for checking credentials and prompts without a front end.

use clap::{Parser, ValueEnum};

use crate::types::Language;

/// Languages selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LanguageArg {
    /// English
    En,
    /// Simplified Chinese
    Zh,
}

impl From<LanguageArg> for Language {
    fn from(arg: LanguageArg) -> Self {
        match arg {
            LanguageArg::En => Language::En,
            LanguageArg::Zh => Language::Zh,
        }
    }
}

/// tunesmith-daemon: AI song concept generation
#[derive(Parser, Debug)]
#[command(name = "tunesmith-daemon")]
#[command(about = "Generates song concepts (title, artist, style, lyrics, album art) with Gemini")]
#[command(version)]
pub struct Cli {
    /// Creative prompt describing the song
    #[arg(short, long)]
    pub prompt: Option<String>,

    /// Language of the generated concept (defaults to TUNESMITH_LANGUAGE)
    #[arg(short, long, value_enum)]
    pub language: Option<LanguageArg>,

    /// Run in daemon mode (JSON-RPC over stdio)
    #[arg(long)]
    pub daemon: bool,
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    /// Returns true if running in CLI mode (not daemon mode).
    pub fn is_cli_mode(&self) -> bool {
        !self.daemon && self.prompt.is_some()
    }

    /// Returns true if running in daemon mode.
    pub fn is_daemon_mode(&self) -> bool {
        self.daemon
    }

    /// Language override, if one was given.
    pub fn language(&self) -> Option<Language> {
        self.language.map(Language::from)
    }
}
