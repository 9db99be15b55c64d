//! Metadata command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::error::TekstError;
use crate::video::{extract_video_id, MetadataClient};
use anyhow::Result;

/// Run the metadata command.
pub async fn run_metadata(input: &str, json: bool, settings: Settings) -> Result<()> {
    let video_id = extract_video_id(input).ok_or_else(|| {
        TekstError::InvalidInput(format!("Invalid YouTube video id or URL: {}", input))
    })?;

    let api_key = settings
        .youtube
        .api_key
        .filter(|k| !k.is_empty())
        .ok_or_else(|| {
            TekstError::Config(
                "YouTube API key not configured. Set youtube.api_key with 'tekst config edit'."
                    .to_string(),
            )
        })?;

    let client = MetadataClient::new(&api_key);

    let spinner = Output::spinner("Fetching video metadata...");
    let result = client.fetch(&video_id).await;
    spinner.finish_and_clear();

    let metadata = match result {
        Ok(metadata) => metadata,
        Err(e) => {
            Output::error(&format!("{}", e));
            return Err(e.into());
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&metadata)?);
        return Ok(());
    }

    Output::header(&metadata.title);
    Output::kv("Video", &metadata.video_id);
    if let Some(channel) = &metadata.channel {
        Output::kv("Channel", channel);
    }
    if let Some(duration) = &metadata.duration {
        Output::kv("Duration", duration);
    }
    if let Some(thumbnail) = &metadata.thumbnail_url {
        Output::kv("Thumbnail", thumbnail);
    }

    Ok(())
}
