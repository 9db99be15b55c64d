//! CLI module for Tekst.

pub mod commands;
mod output;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Tekst - YouTube Transcripts from the Command Line
///
/// Fetches caption transcripts and metadata for YouTube videos.
/// The name "Tekst" comes from the Norwegian word for "text."
#[derive(Parser, Debug)]
#[command(name = "tekst")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch the transcript of a video
    Transcript {
        /// YouTube URL or video id
        input: String,

        /// Write the transcript to a file instead of stdout
        #[arg(short, long)]
        output: Option<String>,

        /// Output format (text, json)
        #[arg(long, default_value = "text")]
        format: String,

        /// Print the diagnostic trace even on success
        #[arg(long)]
        trace: bool,
    },

    /// Look up video metadata (title, channel, duration)
    Metadata {
        /// YouTube URL or video id
        input: String,

        /// Print metadata as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., "youtube.api_key")
        key: String,
        /// Configuration value
        value: String,
    },

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}
