//! Watch-page scrape fallback.
//!
//! When every player-API identity is rejected, the public viewer page still
//! embeds the same player response as inline JSON. This stage recovers that
//! one JSON object by pattern matching; it makes no attempt to parse the
//! surrounding HTML. Two extraction patterns are tried in sequence, and
//! neither is guaranteed against every page variant.

use super::captions::{summarize_tracks, CaptionTrack};
use super::innertube::{Captions, PlayerResponse};
use super::relay::Relay;
use super::trace::FetchTrace;
use super::{AttemptError, FetchStrategy, Transcript};
use async_trait::async_trait;
use regex::Regex;

/// Scrapes the watch page for the embedded caption track list.
pub struct WatchPageStrategy {
    http: reqwest::Client,
    relay: Relay,
    player_regex: Regex,
    captions_regex: Regex,
}

impl WatchPageStrategy {
    pub fn new(http: reqwest::Client, relay: Relay) -> Self {
        // (?s) lets the embedded JSON span lines
        let player_regex =
            Regex::new(r"(?s)ytInitialPlayerResponse\s*=\s*(\{.+?\});").expect("Invalid regex");
        let captions_regex =
            Regex::new(r#"(?s)"captions":\s*(\{.+?"captionTracks":.+?\})\s*,\s*""#)
                .expect("Invalid regex");

        Self {
            http,
            relay,
            player_regex,
            captions_regex,
        }
    }

    /// Recover the caption track list from the page HTML.
    ///
    /// Tries the full `ytInitialPlayerResponse` assignment first, then a
    /// bare `"captions"` object as the alternative pattern.
    fn extract_tracks(
        &self,
        html: &str,
        trace: &mut FetchTrace,
    ) -> Result<Vec<CaptionTrack>, AttemptError> {
        if let Some(caps) = self.player_regex.captures(html) {
            let raw = caps.get(1).map(|m| m.as_str()).unwrap_or_default();

            let player: PlayerResponse = match serde_json::from_str(raw) {
                Ok(p) => p,
                Err(e) => {
                    trace.log("SCRAPE", format!("Failed to parse player response JSON: {}", e));
                    return Err(AttemptError::MalformedResponse(
                        "embedded player response was not valid JSON".to_string(),
                    ));
                }
            };

            if let Some(playability) = &player.playability_status {
                trace.log(
                    "SCRAPE",
                    format!(
                        "Playability from page: {}",
                        playability.status.as_deref().unwrap_or("UNKNOWN")
                    ),
                );
            }

            return match player.caption_tracks() {
                Some(tracks) => Ok(tracks),
                None => {
                    trace.log("SCRAPE", "No caption tracks in scraped player data");
                    Err(AttemptError::NoCaptionTracks)
                }
            };
        }

        if let Some(caps) = self.captions_regex.captures(html) {
            let raw = caps.get(1).map(|m| m.as_str()).unwrap_or_default();

            match serde_json::from_str::<Captions>(raw) {
                Ok(captions) => {
                    let tracks = captions
                        .player_captions_tracklist_renderer
                        .and_then(|r| r.caption_tracks)
                        .filter(|t| !t.is_empty());
                    if let Some(tracks) = tracks {
                        trace.log(
                            "SCRAPE",
                            format!("Found {} track(s) via alt pattern", tracks.len()),
                        );
                        return Ok(tracks);
                    }
                }
                Err(e) => {
                    trace.log("SCRAPE", format!("Alt pattern parse failed: {}", e));
                }
            }

            return Err(AttemptError::NoEmbeddedCaptionData);
        }

        trace.log(
            "SCRAPE",
            "Could not find player response or caption data in page HTML",
        );
        Err(AttemptError::NoEmbeddedCaptionData)
    }
}

#[async_trait]
impl FetchStrategy for WatchPageStrategy {
    fn label(&self) -> String {
        format!("watch page via {}", self.relay.name)
    }

    async fn attempt(
        &self,
        video_id: &str,
        trace: &mut FetchTrace,
    ) -> Result<Transcript, AttemptError> {
        let watch_url = format!("https://www.youtube.com/watch?v={}", video_id);
        let page_url = self.relay.route(&watch_url);

        trace.log("SCRAPE", "Fetching watch page...");
        let response = self.http.get(&page_url).send().await?;
        let status = response.status();
        trace.log("SCRAPE", format!("Response status: {}", status));

        if !status.is_success() {
            return Err(AttemptError::UpstreamStatus {
                endpoint: "watch page",
                status: status.as_u16(),
            });
        }

        let html = response.text().await?;
        trace.log("SCRAPE", format!("Got {} chars of HTML", html.len()));

        let tracks = self.extract_tracks(&html, trace)?;
        trace.log_with(
            "SCRAPE",
            format!("Found {} track(s) from watch page", tracks.len()),
            summarize_tracks(&tracks),
        );

        super::captions::download_captions(&self.http, &self.relay, video_id, &tracks, trace).await
    }
}
