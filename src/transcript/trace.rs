//! Diagnostic trace for transcript fetching.
//!
//! Every fetch call builds a fresh trace and threads it through each
//! strategy attempt. On total failure the trace is handed back to the
//! caller so the whole cascade can be rendered as a postmortem.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// A single recorded step.
#[derive(Debug, Clone, Serialize)]
pub struct TraceEntry {
    /// Step tag (e.g. "PLAYER", "CAPTIONS").
    pub step: &'static str,
    /// Human-readable message.
    pub message: String,
    /// Optional structured payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// When the entry was recorded.
    pub time: DateTime<Utc>,
}

/// Ordered, append-only record of every step taken during one fetch call.
#[derive(Debug, Default, Clone, Serialize)]
pub struct FetchTrace {
    entries: Vec<TraceEntry>,
}

impl FetchTrace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry with a step tag and message.
    pub fn log(&mut self, step: &'static str, message: impl Into<String>) {
        self.push(step, message.into(), None);
    }

    /// Append an entry with an attached structured payload.
    pub fn log_with(&mut self, step: &'static str, message: impl Into<String>, data: Value) {
        self.push(step, message.into(), Some(data));
    }

    fn push(&mut self, step: &'static str, message: String, data: Option<Value>) {
        debug!(step = step, "{}", message);
        self.entries.push(TraceEntry {
            step,
            message,
            data,
            time: Utc::now(),
        });
    }

    /// All entries, in append order.
    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }

    /// Render the trace as plain text for operator display.
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(|entry| {
                let mut line = format!("[{}] {}", entry.step, entry.message);
                if let Some(data) = &entry.data {
                    let rendered = match data {
                        Value::String(s) => s.clone(),
                        other => serde_json::to_string_pretty(other).unwrap_or_default(),
                    };
                    line.push_str("\n  -> ");
                    line.push_str(&rendered.replace('\n', "\n     "));
                }
                line
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_entries_keep_append_order() {
        let mut trace = FetchTrace::new();
        trace.log("START", "first");
        trace.log("PLAYER", "second");
        trace.log_with("CAPTIONS", "third", json!({"count": 2}));

        let steps: Vec<&str> = trace.entries().iter().map(|e| e.step).collect();
        assert_eq!(steps, vec!["START", "PLAYER", "CAPTIONS"]);
        assert!(trace.entries()[2].data.is_some());
    }

    #[test]
    fn test_render_includes_payload() {
        let mut trace = FetchTrace::new();
        trace.log("START", "Fetching transcript");
        trace.log_with("CAPTIONS", "Found 1 track(s)", json!([{"lang": "en"}]));

        let rendered = trace.render();
        assert!(rendered.contains("[START] Fetching transcript"));
        assert!(rendered.contains("[CAPTIONS] Found 1 track(s)"));
        assert!(rendered.contains("\"lang\": \"en\""));
    }
}
