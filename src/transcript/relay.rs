//! Forwarding relay used to route requests to the upstream provider.

use serde::{Deserialize, Serialize};
use url::Url;

/// An HTTP forwarding relay that takes the target URL as a parameter.
///
/// Requests go to `prefix` with the percent-encoded target appended, e.g.
/// `https://corsproxy.io/?https%3A%2F%2Fwww.youtube.com%2F...`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Relay {
    /// Short name for diagnostics, derived from the relay host.
    pub name: String,
    /// URL prefix the encoded target is appended to.
    pub prefix: String,
}

impl Relay {
    /// Build a relay from a prefix such as `https://corsproxy.io/?`.
    pub fn from_prefix(prefix: &str) -> Self {
        let name = Url::parse(prefix)
            .ok()
            .and_then(|u| u.host_str().map(|h| h.to_string()))
            .unwrap_or_else(|| "relay".to_string());

        Self {
            name,
            prefix: prefix.to_string(),
        }
    }

    /// Route a target URL through this relay.
    pub fn route(&self, target: &str) -> String {
        let encoded: String = url::form_urlencoded::byte_serialize(target.as_bytes()).collect();
        format!("{}{}", self.prefix, encoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_from_host() {
        let relay = Relay::from_prefix("https://corsproxy.io/?");
        assert_eq!(relay.name, "corsproxy.io");

        let relay = Relay::from_prefix("https://api.allorigins.win/raw?url=");
        assert_eq!(relay.name, "api.allorigins.win");
    }

    #[test]
    fn test_route_encodes_target() {
        let relay = Relay::from_prefix("https://corsproxy.io/?");
        let routed = relay.route("https://www.youtube.com/watch?v=abc");

        assert!(routed.starts_with("https://corsproxy.io/?"));
        assert!(routed.contains("https%3A%2F%2Fwww.youtube.com"));
        assert!(!routed["https://corsproxy.io/?".len()..].contains('?'));
    }
}
