//! Egress proxy selection for actor runs.

use serde::Serialize;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::platform::Platform;

/// Request key the actors read their proxy settings from.
pub const PROXY_CONFIGURATION_KEY: &str = "proxyConfiguration";

pub const DEFAULT_PROXY_GROUP: &str = "RESIDENTIAL";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionMode {
    /// The remote side rotates the exit IP per request.
    #[default]
    Rotate,
    /// Pin one exit IP for the whole run via a session id.
    Sticky,
}

impl SessionMode {
    /// Anything other than `sticky` rotates.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "sticky" => SessionMode::Sticky,
            _ => SessionMode::Rotate,
        }
    }
}

/// Proxy policy, read once at startup and shared by every invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyPolicy {
    pub enabled: bool,
    /// An empty list disables the proxy.
    pub groups: Vec<String>,
    pub country_code: Option<String>,
    pub session_mode: SessionMode,
    /// Defaults to the platform name.
    pub session_prefix: Option<String>,
}

impl Default for ProxyPolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            groups: vec![DEFAULT_PROXY_GROUP.to_string()],
            country_code: None,
            session_mode: SessionMode::Rotate,
            session_prefix: None,
        }
    }
}

impl ProxyPolicy {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }
}

/// Proxy object injected into an actor input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyConfig {
    pub use_apify_proxy: bool,
    pub groups: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<String>,
}

impl ProxyConfig {
    pub fn to_value(&self) -> Value {
        serde_json::json!(self)
    }
}

/// Source of sticky-session ids. Swapped for a fixed generator in tests.
pub trait SessionIdGenerator: Send + Sync {
    /// A fresh random token, without any prefix.
    fn next_id(&self) -> String;
}

/// uuid v4 in simple (32 hex chars) form.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidSessions;

impl SessionIdGenerator for UuidSessions {
    fn next_id(&self) -> String {
        Uuid::new_v4().simple().to_string()
    }
}

/// Build the default proxy for one invocation, or `None` when disabled.
pub fn select_proxy(
    platform: Platform,
    policy: &ProxyPolicy,
    sessions: &dyn SessionIdGenerator,
) -> Option<ProxyConfig> {
    if !policy.enabled || policy.groups.is_empty() {
        return None;
    }

    let country_code = policy
        .country_code
        .as_deref()
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(str::to_uppercase);

    let session = match policy.session_mode {
        SessionMode::Rotate => None,
        SessionMode::Sticky => {
            let prefix = policy
                .session_prefix
                .as_deref()
                .map(str::trim)
                .filter(|prefix| !prefix.is_empty())
                .unwrap_or(platform.as_str());
            Some(format!("{prefix}-{}", sessions.next_id()))
        }
    };

    Some(ProxyConfig {
        use_apify_proxy: true,
        groups: policy.groups.clone(),
        country_code,
        session,
    })
}

/// Add the default proxy unless the request already carries one. A
/// caller-supplied `proxyConfiguration` is never touched.
pub fn apply_default_proxy(
    request: &mut Map<String, Value>,
    platform: Platform,
    policy: &ProxyPolicy,
    sessions: &dyn SessionIdGenerator,
) {
    if request.contains_key(PROXY_CONFIGURATION_KEY) {
        return;
    }
    if let Some(proxy) = select_proxy(platform, policy, sessions) {
        request.insert(PROXY_CONFIGURATION_KEY.to_string(), proxy.to_value());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FixedSessions;
    use serde_json::json;

    #[test]
    fn default_policy_is_residential_rotating() {
        let proxy =
            select_proxy(Platform::Instagram, &ProxyPolicy::default(), &UuidSessions).unwrap();
        assert_eq!(
            proxy.to_value(),
            json!({ "useApifyProxy": true, "groups": ["RESIDENTIAL"] })
        );
    }

    #[test]
    fn disabled_or_groupless_yields_none() {
        assert!(select_proxy(Platform::TikTok, &ProxyPolicy::disabled(), &UuidSessions).is_none());

        let groupless = ProxyPolicy {
            groups: vec![],
            ..ProxyPolicy::default()
        };
        assert!(select_proxy(Platform::TikTok, &groupless, &UuidSessions).is_none());
    }

    #[test]
    fn country_code_is_uppercased() {
        let policy = ProxyPolicy {
            country_code: Some(" us ".into()),
            ..ProxyPolicy::default()
        };
        let proxy = select_proxy(Platform::Facebook, &policy, &UuidSessions).unwrap();
        assert_eq!(proxy.country_code.as_deref(), Some("US"));
    }

    #[test]
    fn sticky_session_defaults_prefix_to_platform() {
        let policy = ProxyPolicy {
            session_mode: SessionMode::Sticky,
            ..ProxyPolicy::default()
        };
        let proxy =
            select_proxy(Platform::LinkedIn, &policy, &FixedSessions::new("abc123")).unwrap();
        assert_eq!(proxy.session.as_deref(), Some("linkedin-abc123"));
    }

    #[test]
    fn sticky_session_uses_custom_prefix() {
        let policy = ProxyPolicy {
            session_mode: SessionMode::Sticky,
            session_prefix: Some("leads".into()),
            ..ProxyPolicy::default()
        };
        let proxy = select_proxy(Platform::Twitter, &policy, &FixedSessions::new("f00")).unwrap();
        assert_eq!(proxy.session.as_deref(), Some("leads-f00"));
    }

    #[test]
    fn uuid_sessions_are_unique_hex() {
        let a = UuidSessions.next_id();
        let b = UuidSessions.next_id();
        assert_ne!(a, b);
        assert_eq!(a.len(), 32);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn caller_proxy_is_kept_verbatim() {
        let caller = json!({ "useApifyProxy": false });
        let mut request = Map::new();
        request.insert(PROXY_CONFIGURATION_KEY.into(), caller.clone());

        apply_default_proxy(
            &mut request,
            Platform::Instagram,
            &ProxyPolicy::default(),
            &UuidSessions,
        );
        assert_eq!(request[PROXY_CONFIGURATION_KEY], caller);
    }

    #[test]
    fn session_mode_parsing() {
        assert_eq!(SessionMode::parse("Sticky"), SessionMode::Sticky);
        assert_eq!(SessionMode::parse("rotate"), SessionMode::Rotate);
        assert_eq!(SessionMode::parse("whatever"), SessionMode::Rotate);
    }
}
