//! Tekst - YouTube Transcripts from the Command Line
//!
//! A CLI tool for pulling transcripts and metadata from YouTube videos.
//!
//! The name "Tekst" comes from the Norwegian word for "text" — captions
//! are "undertekster."
//!
//! # Overview
//!
//! Tekst allows you to:
//! - Fetch the caption transcript of a YouTube video as plain text or JSON
//! - Look up video metadata (title, channel, duration, thumbnail)
//! - Inspect a step-by-step diagnostic trace when a fetch fails
//!
//! Caption retrieval is best-effort: YouTube offers no supported transcript
//! endpoint, so Tekst walks an ordered cascade of acquisition strategies
//! (several spoofed player clients, a watch-page scrape, an alternate relay)
//! and returns the first one that yields usable text.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration management
//! - `video` - Video id parsing and metadata lookup
//! - `transcript` - Multi-strategy transcript acquisition
//!
//! # Example
//!
//! ```rust,no_run
//! use tekst::config::Settings;
//! use tekst::transcript::TranscriptFetcher;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let fetcher = TranscriptFetcher::new(&settings.transcript);
//!
//!     match fetcher.fetch("dQw4w9WgXcQ").await {
//!         Ok(transcript) => println!("{}", transcript.text),
//!         Err(failure) => eprintln!("{}", failure.trace.render()),
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod transcript;
pub mod video;

pub use error::{Result, TekstError};
