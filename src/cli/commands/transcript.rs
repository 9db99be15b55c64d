//! Transcript command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::error::TekstError;
use crate::transcript::TranscriptFetcher;
use crate::video::extract_video_id;
use anyhow::Result;

/// Supported transcript output formats.
#[derive(Debug, Clone, Copy, PartialEq)]
enum OutputFormat {
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}. Use text or json.", s)),
        }
    }
}

/// Run the transcript command.
pub async fn run_transcript(
    input: &str,
    output: Option<String>,
    format: &str,
    show_trace: bool,
    settings: Settings,
) -> Result<()> {
    let video_id = extract_video_id(input).ok_or_else(|| {
        TekstError::InvalidInput(format!("Invalid YouTube video id or URL: {}", input))
    })?;

    let format: OutputFormat = format.parse().map_err(|e: String| anyhow::anyhow!(e))?;

    let fetcher = TranscriptFetcher::new(&settings.transcript);

    let spinner = Output::spinner(&format!("Fetching transcript for {}...", video_id));
    let (result, trace) = fetcher.fetch_with_trace(&video_id).await;
    spinner.finish_and_clear();

    let transcript = match result {
        Ok(transcript) => {
            if show_trace {
                eprintln!("{}\n", trace.render());
            }
            transcript
        }
        Err(error) => {
            Output::error(&format!("Failed to fetch transcript: {}", error));
            eprintln!("\n{}", trace.render());
            return Err(TekstError::Transcript(error.to_string()).into());
        }
    };

    if transcript.is_auto_generated {
        Output::warning("Transcript is auto-generated; expect recognition errors.");
    }

    let rendered = match format {
        OutputFormat::Text => transcript.text.clone(),
        OutputFormat::Json => serde_json::to_string_pretty(&transcript)?,
    };

    match output {
        Some(path) => {
            std::fs::write(&path, &rendered)?;
            Output::success(&format!(
                "Saved {} transcript for {} to {}",
                transcript.language, video_id, path
            ));
        }
        None => println!("{}", rendered),
    }

    Ok(())
}
