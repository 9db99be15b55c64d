//! Innertube player API access with spoofed client identities.
//!
//! The player endpoint is undocumented: which caption tracks it reveals, and
//! whether it answers at all, depends on the client identity presented in
//! the request context. Mobile identities see the most and are blocked the
//! least, so they sit at the front of the cascade.

use super::captions::{download_captions, summarize_tracks, CaptionTrack};
use super::relay::Relay;
use super::trace::FetchTrace;
use super::{AttemptError, FetchStrategy, Transcript};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Innertube player endpoint.
const PLAYER_URL: &str = "https://www.youtube.com/youtubei/v1/player?prettyPrint=false";

/// A spoofed player client identity sent in the request context.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientIdentity {
    client_name: &'static str,
    client_version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    android_sdk_version: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    device_make: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    device_model: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    hl: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    gl: Option<&'static str>,
}

impl ClientIdentity {
    /// Android player client. Broadest caption availability, least likely
    /// to be blocked.
    pub fn android() -> Self {
        Self {
            client_name: "ANDROID",
            client_version: "19.09.37",
            android_sdk_version: Some(30),
            device_make: None,
            device_model: None,
            hl: Some("en"),
            gl: Some("US"),
        }
    }

    /// iOS player client. Fallback when the Android identity is blocked or
    /// rate-limited.
    pub fn ios() -> Self {
        Self {
            client_name: "IOS",
            client_version: "19.09.3",
            android_sdk_version: None,
            device_make: Some("Apple"),
            device_model: Some("iPhone14,3"),
            hl: Some("en"),
            gl: Some("US"),
        }
    }

    /// Generic web client. Most exposed to anti-scraping measures.
    pub fn web() -> Self {
        Self {
            client_name: "WEB",
            client_version: "2.20250101.00.00",
            android_sdk_version: None,
            device_make: None,
            device_model: None,
            hl: None,
            gl: None,
        }
    }

    pub fn name(&self) -> &'static str {
        self.client_name
    }
}

/// Request body for the player endpoint.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PlayerRequest<'a> {
    context: RequestContext<'a>,
    video_id: &'a str,
}

#[derive(Serialize)]
struct RequestContext<'a> {
    client: &'a ClientIdentity,
}

/// Player response, reduced to the fields the cascade inspects.
///
/// Everything is optional on the wire; presence is checked explicitly so a
/// missing branch becomes an attempt failure instead of a crash.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct PlayerResponse {
    pub playability_status: Option<PlayabilityStatus>,
    pub captions: Option<Captions>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct PlayabilityStatus {
    pub status: Option<String>,
    pub reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct Captions {
    pub player_captions_tracklist_renderer: Option<TracklistRenderer>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct TracklistRenderer {
    pub caption_tracks: Option<Vec<CaptionTrack>>,
}

impl PlayerResponse {
    /// Pull a non-empty caption track list out of the nested response.
    pub fn caption_tracks(self) -> Option<Vec<CaptionTrack>> {
        self.captions?
            .player_captions_tracklist_renderer?
            .caption_tracks
            .filter(|tracks| !tracks.is_empty())
    }
}

/// One Innertube attempt: a client identity POSTed through a relay.
pub struct InnertubeStrategy {
    http: reqwest::Client,
    client: ClientIdentity,
    relay: Relay,
}

impl InnertubeStrategy {
    pub fn new(http: reqwest::Client, client: ClientIdentity, relay: Relay) -> Self {
        Self {
            http,
            client,
            relay,
        }
    }
}

#[async_trait]
impl FetchStrategy for InnertubeStrategy {
    fn label(&self) -> String {
        format!("{} via {}", self.client.name(), self.relay.name)
    }

    async fn attempt(
        &self,
        video_id: &str,
        trace: &mut FetchTrace,
    ) -> Result<Transcript, AttemptError> {
        let player_url = self.relay.route(PLAYER_URL);
        trace.log(
            "PLAYER",
            format!("POST {} via {}", self.client.name(), self.relay.name),
        );

        let body = PlayerRequest {
            context: RequestContext {
                client: &self.client,
            },
            video_id,
        };

        let response = self.http.post(&player_url).json(&body).send().await?;
        let status = response.status();
        trace.log("PLAYER", format!("Response status: {}", status));

        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read body".to_string());
            let preview: String = error_body.chars().take(300).collect();
            trace.log("PLAYER", format!("Error body: {}", preview));
            return Err(AttemptError::UpstreamStatus {
                endpoint: "player API",
                status: status.as_u16(),
            });
        }

        let player: PlayerResponse = match response.json().await {
            Ok(p) => p,
            Err(_) => {
                trace.log("PLAYER", "Response was not valid JSON");
                return Err(AttemptError::MalformedResponse(
                    "player response was not valid JSON".to_string(),
                ));
            }
        };

        if let Some(playability) = &player.playability_status {
            let play_status = playability.status.as_deref().unwrap_or("UNKNOWN");
            trace.log_with(
                "PLAYER",
                format!("Playability: {}", play_status),
                json!({
                    "status": play_status,
                    "reason": playability.reason.as_deref().unwrap_or("none"),
                }),
            );

            if play_status != "OK" {
                return Err(AttemptError::Unplayable {
                    status: play_status.to_string(),
                    reason: playability
                        .reason
                        .clone()
                        .unwrap_or_else(|| "unavailable".to_string()),
                });
            }
        }

        let has_captions = player.captions.is_some();
        let has_renderer = player
            .captions
            .as_ref()
            .is_some_and(|c| c.player_captions_tracklist_renderer.is_some());

        let Some(tracks) = player.caption_tracks() else {
            trace.log_with(
                "CAPTIONS",
                "No caption tracks found",
                json!({
                    "hasCaptionsKey": has_captions,
                    "hasRenderer": has_renderer,
                }),
            );
            return Err(AttemptError::NoCaptionTracks);
        };

        trace.log_with(
            "CAPTIONS",
            format!("Found {} track(s)", tracks.len()),
            summarize_tracks(&tracks),
        );

        download_captions(&self.http, &self.relay, video_id, &tracks, trace).await
    }
}
