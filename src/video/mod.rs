//! Video id parsing and metadata lookup.

pub mod metadata;

pub use metadata::{format_duration, MetadataClient, VideoMetadata};

use regex::Regex;

/// Extract a video id from a YouTube URL or bare 11-character id.
pub fn extract_video_id(input: &str) -> Option<String> {
    // Matches the common YouTube URL formats and bare video ids
    let video_id_regex = Regex::new(
        r"(?x)
        (?:
            # Full YouTube URLs
            (?:https?://)?
            (?:www\.)?
            (?:youtube\.com/watch\?v=|youtu\.be/|youtube\.com/embed/|youtube\.com/v/|youtube\.com/shorts/)
            ([a-zA-Z0-9_-]{11})
        )
        |
        # Bare video id (11 characters)
        ^([a-zA-Z0-9_-]{11})$
    ",
    )
    .expect("Invalid regex");

    let caps = video_id_regex.captures(input.trim())?;

    // Try group 1 (URL format) then group 2 (bare id)
    caps.get(1)
        .or_else(|| caps.get(2))
        .map(|m| m.as_str().to_string())
}
