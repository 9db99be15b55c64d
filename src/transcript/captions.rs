//! Caption track selection and timed-text download.
//!
//! Both the player API and the watch-page scrape produce the same caption
//! track list; everything from track choice onward is shared here.

use super::relay::Relay;
use super::trace::FetchTrace;
use super::{AttemptError, Transcript};
use serde::Deserialize;
use serde_json::{json, Value};

/// One available caption stream for a video.
///
/// All fields are optional on the wire; a track missing its locator simply
/// fails at download time rather than aborting deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CaptionTrack {
    /// Locator for the track's timed-text content.
    pub base_url: String,
    /// BCP-47 language tag.
    pub language_code: Option<String>,
    /// "asr" marks an automatically generated track.
    pub kind: Option<String>,
    /// Display name.
    pub name: Option<TrackName>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrackName {
    pub simple_text: Option<String>,
}

impl CaptionTrack {
    pub fn language(&self) -> &str {
        self.language_code.as_deref().unwrap_or("")
    }

    pub fn is_auto_generated(&self) -> bool {
        self.kind.as_deref() == Some("asr")
    }

    fn kind_label(&self) -> &str {
        self.kind.as_deref().unwrap_or("manual")
    }
}

/// Choose one track from a non-empty list.
///
/// Preference order: human-authored English, then any track whose language
/// tag starts with "en", then the first track offered.
pub fn select_track(tracks: &[CaptionTrack]) -> &CaptionTrack {
    tracks
        .iter()
        .find(|t| t.language() == "en" && !t.is_auto_generated())
        .or_else(|| tracks.iter().find(|t| t.language().starts_with("en")))
        .unwrap_or(&tracks[0])
}

/// Timed-text payload returned for `fmt=json3`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TimedText {
    events: Option<Vec<TimedEvent>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TimedEvent {
    segs: Option<Vec<TextSegment>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TextSegment {
    utf8: Option<String>,
}

/// Flatten timed-text events into trimmed, non-empty text lines.
///
/// Each event's segments are concatenated with no separator; events without
/// segments and lines that are empty after trimming contribute nothing.
fn parse_lines(events: &[TimedEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(|event| event.segs.as_ref())
        .map(|segs| {
            segs.iter()
                .filter_map(|seg| seg.utf8.as_deref())
                .collect::<String>()
                .trim()
                .to_string()
        })
        .filter(|line| !line.is_empty())
        .collect()
}

/// Pick the best track and download its content as one plain-text string.
pub(crate) async fn download_captions(
    http: &reqwest::Client,
    relay: &Relay,
    video_id: &str,
    tracks: &[CaptionTrack],
    trace: &mut FetchTrace,
) -> Result<Transcript, AttemptError> {
    let track = select_track(tracks);
    trace.log(
        "CAPTIONS",
        format!("Selected: {} ({})", track.language(), track.kind_label()),
    );

    let caption_url = format!("{}&fmt=json3", track.base_url);
    trace.log("FETCH", "Downloading caption text...");

    let response = http.get(relay.route(&caption_url)).send().await?;
    let status = response.status();
    trace.log("FETCH", format!("Caption response: {}", status));

    if !status.is_success() {
        return Err(AttemptError::UpstreamStatus {
            endpoint: "caption fetch",
            status: status.as_u16(),
        });
    }

    let timed_text: TimedText = match response.json().await {
        Ok(t) => t,
        Err(_) => {
            trace.log("FETCH", "Caption response was not valid JSON");
            return Err(AttemptError::MalformedResponse(
                "caption response was not valid JSON".to_string(),
            ));
        }
    };

    let Some(events) = timed_text.events else {
        trace.log("FETCH", "No transcript events in caption data");
        return Err(AttemptError::MalformedResponse(
            "no transcript events in caption data".to_string(),
        ));
    };

    let lines = parse_lines(&events);
    trace.log(
        "PARSE",
        format!("Parsed {} lines from {} events", lines.len(), events.len()),
    );

    if lines.is_empty() {
        return Err(AttemptError::EmptyTranscript);
    }

    Ok(Transcript {
        video_id: video_id.to_string(),
        text: lines.join(" "),
        language: track.language().to_string(),
        is_auto_generated: track.is_auto_generated(),
    })
}

/// Language/kind summary of a track list, for trace payloads.
pub(crate) fn summarize_tracks(tracks: &[CaptionTrack]) -> Value {
    Value::Array(
        tracks
            .iter()
            .map(|t| {
                json!({
                    "lang": t.language(),
                    "kind": t.kind_label(),
                    "name": t.name.as_ref().and_then(|n| n.simple_text.as_deref()).unwrap_or(""),
                })
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(lang: &str, kind: Option<&str>) -> CaptionTrack {
        CaptionTrack {
            base_url: format!("https://example.com/{}", lang),
            language_code: Some(lang.to_string()),
            kind: kind.map(|k| k.to_string()),
            name: None,
        }
    }

    #[test]
    fn test_select_prefers_manual_english() {
        let tracks = vec![
            track("de", None),
            track("en", Some("asr")),
            track("en", None),
        ];
        let selected = select_track(&tracks);
        assert_eq!(selected.language(), "en");
        assert!(!selected.is_auto_generated());
    }

    #[test]
    fn test_select_falls_back_to_english_variant() {
        let tracks = vec![track("de", None), track("en-GB", Some("asr"))];
        let selected = select_track(&tracks);
        assert_eq!(selected.language(), "en-GB");
        assert!(selected.is_auto_generated());
    }

    #[test]
    fn test_select_falls_back_to_first_track() {
        let tracks = vec![track("ja", Some("asr")), track("ko", None)];
        assert_eq!(select_track(&tracks).language(), "ja");
    }

    #[test]
    fn test_select_ignores_missing_language() {
        let tracks = vec![
            CaptionTrack {
                base_url: "https://example.com/unknown".to_string(),
                ..Default::default()
            },
            track("en", None),
        ];
        assert_eq!(select_track(&tracks).language(), "en");
    }

    #[test]
    fn test_parse_lines_joins_segments_and_drops_blanks() {
        let payload = r#"{
            "events": [
                {"segs": [{"utf8": "Hello "}, {"utf8": "world"}]},
                {"segs": [{"utf8": "  "}]},
                {"tStartMs": 1000},
                {"segs": [{"utf8": "Bye"}]}
            ]
        }"#;

        let timed_text: TimedText = serde_json::from_str(payload).unwrap();
        let lines = parse_lines(&timed_text.events.unwrap());
        assert_eq!(lines, vec!["Hello world", "Bye"]);
        assert_eq!(lines.join(" "), "Hello world Bye");
    }

    #[test]
    fn test_parse_lines_empty_when_all_blank() {
        let payload = r#"{"events": [{"segs": [{"utf8": " "}]}, {"segs": []}]}"#;
        let timed_text: TimedText = serde_json::from_str(payload).unwrap();
        assert!(parse_lines(&timed_text.events.unwrap()).is_empty());
    }

    #[test]
    fn test_track_list_deserializes_from_player_shape() {
        let payload = r#"[
            {"baseUrl": "https://example.com/t1", "languageCode": "en", "kind": "asr",
             "name": {"simpleText": "English (auto-generated)"}},
            {"baseUrl": "https://example.com/t2", "languageCode": "nb"}
        ]"#;

        let tracks: Vec<CaptionTrack> = serde_json::from_str(payload).unwrap();
        assert_eq!(tracks.len(), 2);
        assert!(tracks[0].is_auto_generated());
        assert_eq!(tracks[1].language(), "nb");
        assert!(!tracks[1].is_auto_generated());
    }
}
