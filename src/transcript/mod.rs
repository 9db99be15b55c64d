//! Multi-strategy transcript acquisition.
//!
//! YouTube has no supported endpoint for caption text, so every route to it
//! is unofficial and individually unreliable. This module walks an ordered
//! cascade of independent acquisition strategies and returns the first
//! success: three spoofed player-client identities against the Innertube
//! player API, a watch-page scrape, and a final player attempt through an
//! alternate relay.
//!
//! Strategies run strictly sequentially. Concurrent speculative requests
//! against an undocumented endpoint would raise the rate-limiting risk, and
//! only one result is needed. Each strategy is attempted at most once per
//! fetch; there are no retries, no backoff, and nothing is cached between
//! calls.
//!
//! Every step appends to a [`FetchTrace`], so a total failure can be
//! rendered as a complete postmortem.

mod captions;
mod innertube;
mod relay;
mod trace;
mod watch_page;

pub use captions::{select_track, CaptionTrack, TrackName};
pub use innertube::{ClientIdentity, InnertubeStrategy};
pub use relay::Relay;
pub use trace::{FetchTrace, TraceEntry};
pub use watch_page::WatchPageStrategy;

use crate::config::TranscriptSettings;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tracing::instrument;

/// A fetched transcript.
#[derive(Debug, Clone, Serialize)]
pub struct Transcript {
    /// Video the transcript belongs to.
    pub video_id: String,
    /// Full transcript text, one space between caption lines.
    pub text: String,
    /// Language tag of the selected caption track.
    pub language: String,
    /// Whether the selected track was automatically generated.
    pub is_auto_generated: bool,
}

/// Why a single strategy attempt failed.
///
/// Every variant is recoverable within a fetch: the cascade records it and
/// moves on to the next strategy.
#[derive(Debug, Error)]
pub enum AttemptError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{endpoint} returned HTTP {status}")]
    UpstreamStatus { endpoint: &'static str, status: u16 },

    #[error("video {status}: {reason}")]
    Unplayable { status: String, reason: String },

    #[error("{0}")]
    MalformedResponse(String),

    #[error("no captions available for this video")]
    NoCaptionTracks,

    #[error("no caption data found in watch page")]
    NoEmbeddedCaptionData,

    #[error("transcript is empty after parsing")]
    EmptyTranscript,

    #[error("no transcript strategies configured")]
    NoStrategies,
}

/// Terminal failure: every configured strategy failed.
///
/// Carries the most recent underlying error and the full diagnostic trace.
#[derive(Debug, Error)]
#[error("{error}")]
pub struct FetchFailure {
    pub error: AttemptError,
    pub trace: FetchTrace,
}

/// One self-contained method of acquiring a transcript.
#[async_trait]
pub trait FetchStrategy: Send + Sync {
    /// Short label for diagnostics (e.g. "ANDROID via corsproxy.io").
    fn label(&self) -> String;

    /// Make one attempt: at most one round-trip per upstream endpoint,
    /// every failure reported to the caller rather than retried here.
    async fn attempt(
        &self,
        video_id: &str,
        trace: &mut FetchTrace,
    ) -> Result<Transcript, AttemptError>;
}

/// Ordered cascade of transcript acquisition strategies.
pub struct TranscriptFetcher {
    strategies: Vec<Box<dyn FetchStrategy>>,
}

impl TranscriptFetcher {
    /// Build the default cascade. Order is a deliberate priority: the most
    /// reliable and least detectable identities go first, the alternate
    /// relay goes last in case the primary relay itself is the problem.
    pub fn new(settings: &TranscriptSettings) -> Self {
        let http = reqwest::Client::new();
        let primary = Relay::from_prefix(&settings.primary_relay);
        let fallback = Relay::from_prefix(&settings.fallback_relay);

        Self::with_strategies(vec![
            Box::new(InnertubeStrategy::new(
                http.clone(),
                ClientIdentity::android(),
                primary.clone(),
            )),
            Box::new(InnertubeStrategy::new(
                http.clone(),
                ClientIdentity::ios(),
                primary.clone(),
            )),
            Box::new(InnertubeStrategy::new(
                http.clone(),
                ClientIdentity::web(),
                primary.clone(),
            )),
            Box::new(WatchPageStrategy::new(http.clone(), primary)),
            Box::new(InnertubeStrategy::new(
                http,
                ClientIdentity::android(),
                fallback,
            )),
        ])
    }

    /// Build a fetcher over an explicit strategy list, in priority order.
    pub fn with_strategies(strategies: Vec<Box<dyn FetchStrategy>>) -> Self {
        Self { strategies }
    }

    /// Fetch a transcript, trying each strategy in order until one succeeds.
    ///
    /// Every call starts from the first strategy with a fresh trace; nothing
    /// is remembered between calls.
    #[instrument(skip(self))]
    pub async fn fetch(&self, video_id: &str) -> Result<Transcript, FetchFailure> {
        let (result, trace) = self.fetch_with_trace(video_id).await;
        result.map_err(|error| FetchFailure { error, trace })
    }

    /// Fetch a transcript and hand back the diagnostic trace regardless of
    /// outcome, for callers that want the step-by-step record on success too.
    #[instrument(skip(self))]
    pub async fn fetch_with_trace(
        &self,
        video_id: &str,
    ) -> (Result<Transcript, AttemptError>, FetchTrace) {
        let mut trace = FetchTrace::new();
        let result = self.run_cascade(video_id, &mut trace).await;
        (result, trace)
    }

    async fn run_cascade(
        &self,
        video_id: &str,
        trace: &mut FetchTrace,
    ) -> Result<Transcript, AttemptError> {
        trace.log("START", format!("Fetching transcript for video: {}", video_id));

        let mut last_error = None;

        for strategy in &self.strategies {
            trace.log("STRATEGY", format!("Trying {}...", strategy.label()));

            match strategy.attempt(video_id, trace).await {
                Ok(transcript) => {
                    trace.log_with(
                        "SUCCESS",
                        format!("Got transcript via {}", strategy.label()),
                        json!({
                            "length": transcript.text.len(),
                            "language": transcript.language,
                        }),
                    );
                    return Ok(transcript);
                }
                Err(error) => {
                    trace.log(
                        "STRATEGY_FAIL",
                        format!("{} failed: {}", strategy.label(), error),
                    );
                    last_error = Some(error);
                }
            }
        }

        trace.log("FAILED", "All transcript strategies exhausted");
        Err(last_error.unwrap_or(AttemptError::NoStrategies))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    enum Outcome {
        Success { language: &'static str, auto: bool },
        NoTracks,
        BadGateway,
    }

    struct ScriptedStrategy {
        name: &'static str,
        calls: Arc<AtomicUsize>,
        outcome: Outcome,
    }

    impl ScriptedStrategy {
        fn new(name: &'static str, outcome: Outcome) -> (Box<Self>, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            (
                Box::new(Self {
                    name,
                    calls: calls.clone(),
                    outcome,
                }),
                calls,
            )
        }
    }

    #[async_trait]
    impl FetchStrategy for ScriptedStrategy {
        fn label(&self) -> String {
            self.name.to_string()
        }

        async fn attempt(
            &self,
            video_id: &str,
            trace: &mut FetchTrace,
        ) -> Result<Transcript, AttemptError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            trace.log("PLAYER", format!("attempting {}", self.name));

            match &self.outcome {
                Outcome::Success { language, auto } => Ok(Transcript {
                    video_id: video_id.to_string(),
                    text: "hello world".to_string(),
                    language: language.to_string(),
                    is_auto_generated: *auto,
                }),
                Outcome::NoTracks => Err(AttemptError::NoCaptionTracks),
                Outcome::BadGateway => Err(AttemptError::UpstreamStatus {
                    endpoint: "player API",
                    status: 502,
                }),
            }
        }
    }

    #[tokio::test]
    async fn test_first_success_short_circuits() {
        let (first, first_calls) = ScriptedStrategy::new(
            "first",
            Outcome::Success {
                language: "en",
                auto: false,
            },
        );
        let (second, second_calls) = ScriptedStrategy::new(
            "second",
            Outcome::Success {
                language: "de",
                auto: false,
            },
        );

        let fetcher = TranscriptFetcher::with_strategies(vec![first, second]);
        let transcript = fetcher.fetch("abc123def45").await.unwrap();

        assert_eq!(transcript.language, "en");
        assert_eq!(first_calls.load(Ordering::SeqCst), 1);
        assert_eq!(second_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failure_advances_to_next_strategy() {
        let (first, _) = ScriptedStrategy::new("first", Outcome::BadGateway);
        let (second, _) = ScriptedStrategy::new(
            "second",
            Outcome::Success {
                language: "en",
                auto: true,
            },
        );

        let fetcher = TranscriptFetcher::with_strategies(vec![first, second]);
        let transcript = fetcher.fetch("abc123def45").await.unwrap();

        assert_eq!(transcript.language, "en");
        assert!(transcript.is_auto_generated);
    }

    #[tokio::test]
    async fn test_trace_records_failure_before_success() {
        let (first, _) = ScriptedStrategy::new("first", Outcome::BadGateway);
        let (second, _) = ScriptedStrategy::new(
            "second",
            Outcome::Success {
                language: "en",
                auto: true,
            },
        );

        let fetcher = TranscriptFetcher::with_strategies(vec![first, second]);
        let (result, trace) = fetcher.fetch_with_trace("abc123def45").await;
        assert!(result.is_ok());

        let steps: Vec<&str> = trace.entries().iter().map(|e| e.step).collect();
        let fail_at = steps.iter().position(|s| *s == "STRATEGY_FAIL").unwrap();
        let success_at = steps.iter().position(|s| *s == "SUCCESS").unwrap();
        assert!(fail_at < success_at);
        assert!(trace.entries()[fail_at].message.starts_with("first"));
        assert!(trace.entries()[success_at].message.contains("second"));
    }

    #[tokio::test]
    async fn test_exhaustion_traces_every_strategy_in_order() {
        let (first, _) = ScriptedStrategy::new("first", Outcome::NoTracks);
        let (second, _) = ScriptedStrategy::new("second", Outcome::NoTracks);
        let (third, _) = ScriptedStrategy::new("third", Outcome::NoTracks);

        let fetcher = TranscriptFetcher::with_strategies(vec![first, second, third]);
        let failure = fetcher.fetch("abc123def45").await.unwrap_err();

        assert!(matches!(failure.error, AttemptError::NoCaptionTracks));

        let failures: Vec<&str> = failure
            .trace
            .entries()
            .iter()
            .filter(|e| e.step == "STRATEGY_FAIL")
            .map(|e| e.message.as_str())
            .collect();
        assert_eq!(failures.len(), 3);
        assert!(failures[0].starts_with("first"));
        assert!(failures[1].starts_with("second"));
        assert!(failures[2].starts_with("third"));

        let last = failure.trace.entries().last().unwrap();
        assert_eq!(last.step, "FAILED");
    }

    #[tokio::test]
    async fn test_refetch_reattempts_every_strategy() {
        let (first, first_calls) = ScriptedStrategy::new("first", Outcome::BadGateway);
        let (second, second_calls) = ScriptedStrategy::new("second", Outcome::NoTracks);

        let fetcher = TranscriptFetcher::with_strategies(vec![first, second]);
        assert!(fetcher.fetch("abc123def45").await.is_err());
        assert!(fetcher.fetch("abc123def45").await.is_err());

        assert_eq!(first_calls.load(Ordering::SeqCst), 2);
        assert_eq!(second_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_empty_strategy_list_fails_cleanly() {
        let fetcher = TranscriptFetcher::with_strategies(vec![]);
        let failure = fetcher.fetch("abc123def45").await.unwrap_err();
        assert!(matches!(failure.error, AttemptError::NoStrategies));
    }

    #[test]
    fn test_default_cascade_order() {
        let fetcher = TranscriptFetcher::new(&TranscriptSettings::default());
        let labels: Vec<String> = fetcher.strategies.iter().map(|s| s.label()).collect();

        assert_eq!(
            labels,
            vec![
                "ANDROID via corsproxy.io",
                "IOS via corsproxy.io",
                "WEB via corsproxy.io",
                "watch page via corsproxy.io",
                "ANDROID via api.allorigins.win",
            ]
        );
    }
}
