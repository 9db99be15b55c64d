//! Video metadata lookup via the YouTube Data API.

use crate::error::{Result, TekstError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// YouTube Data API v3 videos endpoint.
const VIDEOS_URL: &str = "https://www.googleapis.com/youtube/v3/videos";

/// Metadata about a YouTube video.
#[derive(Debug, Clone, Serialize)]
pub struct VideoMetadata {
    pub video_id: String,
    pub title: String,
    pub channel: Option<String>,
    pub thumbnail_url: Option<String>,
    /// Formatted as H:MM:SS or M:SS.
    pub duration: Option<String>,
}

/// Client for the YouTube Data API.
pub struct MetadataClient {
    http: reqwest::Client,
    api_key: String,
}

impl MetadataClient {
    pub fn new(api_key: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.to_string(),
        }
    }

    /// Fetch snippet and content details for a video.
    #[instrument(skip(self))]
    pub async fn fetch(&self, video_id: &str) -> Result<VideoMetadata> {
        let response = self
            .http
            .get(VIDEOS_URL)
            .query(&[
                ("key", self.api_key.as_str()),
                ("part", "snippet,contentDetails"),
                ("id", video_id),
            ])
            .send()
            .await?;

        let status = response.status();
        let body: VideosResponse = response.json().await?;

        if !status.is_success() {
            let message = body
                .error
                .as_ref()
                .and_then(|e| e.message.clone())
                .unwrap_or_else(|| format!("HTTP {}", status));

            if status.as_u16() == 403 {
                return Err(TekstError::Metadata(format!(
                    "YouTube API key error: {}. Check that your key is valid and \
                     YouTube Data API v3 is enabled in Google Cloud Console.",
                    message
                )));
            }

            let reason = body
                .error
                .as_ref()
                .and_then(ApiError::first_reason)
                .unwrap_or_default();
            return Err(TekstError::Metadata(format!(
                "YouTube API error ({}): {} {}",
                status.as_u16(),
                message,
                reason
            )));
        }

        let video = body
            .items
            .and_then(|items| items.into_iter().next())
            .ok_or_else(|| TekstError::VideoNotFound(video_id.to_string()))?;

        let snippet = video.snippet.unwrap_or_default();
        let duration = video
            .content_details
            .and_then(|c| c.duration)
            .map(|d| format_duration(&d))
            .filter(|d| !d.is_empty());

        debug!(title = ?snippet.title, "fetched video metadata");

        Ok(VideoMetadata {
            video_id: video_id.to_string(),
            title: snippet
                .title
                .unwrap_or_else(|| "Unknown Title".to_string()),
            channel: snippet.channel_title,
            thumbnail_url: snippet.thumbnails.as_ref().and_then(pick_thumbnail),
            duration,
        })
    }
}

/// Prefer the medium thumbnail, fall back to the default one.
fn pick_thumbnail(thumbnails: &Thumbnails) -> Option<String> {
    thumbnails
        .medium
        .as_ref()
        .or(thumbnails.default.as_ref())
        .and_then(|t| t.url.clone())
}

/// Format an ISO-8601 duration (PT#H#M#S) as H:MM:SS or M:SS.
///
/// Returns an empty string when the input doesn't look like a duration.
pub fn format_duration(iso8601: &str) -> String {
    let duration_regex =
        Regex::new(r"PT(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?").expect("Invalid regex");

    let Some(caps) = duration_regex.captures(iso8601) else {
        return String::new();
    };

    let part = |i: usize| {
        caps.get(i)
            .and_then(|m| m.as_str().parse::<u32>().ok())
            .unwrap_or(0)
    };
    let hours = part(1);
    let minutes = part(2);
    let seconds = part(3);

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct VideosResponse {
    items: Option<Vec<VideoItem>>,
    error: Option<ApiError>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct VideoItem {
    snippet: Option<Snippet>,
    content_details: Option<ContentDetails>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct Snippet {
    title: Option<String>,
    channel_title: Option<String>,
    thumbnails: Option<Thumbnails>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Thumbnails {
    medium: Option<Thumbnail>,
    default: Option<Thumbnail>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Thumbnail {
    url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ContentDetails {
    duration: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ApiError {
    message: Option<String>,
    errors: Option<Vec<ApiErrorDetail>>,
}

impl ApiError {
    fn first_reason(&self) -> Option<String> {
        self.errors.as_ref()?.first()?.reason.clone()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ApiErrorDetail {
    reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration("PT1H2M3S"), "1:02:03");
        assert_eq!(format_duration("PT4M13S"), "4:13");
        assert_eq!(format_duration("PT58S"), "0:58");
        assert_eq!(format_duration("PT1H"), "1:00:00");
        assert_eq!(format_duration("garbage"), "");
        assert_eq!(format_duration(""), "");
    }

    #[test]
    fn test_videos_response_deserializes() {
        let payload = r#"{
            "items": [{
                "snippet": {
                    "title": "Some Talk",
                    "channelTitle": "Some Channel",
                    "thumbnails": {
                        "default": {"url": "https://example.com/default.jpg"},
                        "medium": {"url": "https://example.com/medium.jpg"}
                    }
                },
                "contentDetails": {"duration": "PT12M34S"}
            }]
        }"#;

        let body: VideosResponse = serde_json::from_str(payload).unwrap();
        let item = body.items.unwrap().into_iter().next().unwrap();
        let snippet = item.snippet.unwrap();

        assert_eq!(snippet.title.as_deref(), Some("Some Talk"));
        assert_eq!(
            pick_thumbnail(&snippet.thumbnails.unwrap()).as_deref(),
            Some("https://example.com/medium.jpg")
        );
        assert_eq!(
            item.content_details.unwrap().duration.as_deref(),
            Some("PT12M34S")
        );
    }

    #[test]
    fn test_pick_thumbnail_falls_back_to_default() {
        let thumbnails: Thumbnails = serde_json::from_str(
            r#"{"default": {"url": "https://example.com/default.jpg"}}"#,
        )
        .unwrap();
        assert_eq!(
            pick_thumbnail(&thumbnails).as_deref(),
            Some("https://example.com/default.jpg")
        );
    }

    #[test]
    fn test_error_body_deserializes() {
        let payload = r#"{
            "error": {
                "message": "API key not valid",
                "errors": [{"reason": "badRequest"}]
            }
        }"#;

        let body: VideosResponse = serde_json::from_str(payload).unwrap();
        let error = body.error.unwrap();
        assert_eq!(error.message.as_deref(), Some("API key not valid"));
        assert_eq!(error.first_reason().as_deref(), Some("badRequest"));
    }
}
