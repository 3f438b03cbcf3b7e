//! Target classification.
//!
//! Raw caller strings carry no meaning of their own. A platform's [`RuleSet`]
//! decides which prefixes it understands; anything it does not understand is
//! treated as a free-text query and passed along verbatim.

const URL_PREFIX: &str = "http";
const HANDLE_MARKER: char = '@';
const HASHTAG_MARKER: char = '#';

/// Which buckets a platform's actor can make use of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleSet {
    pub urls: bool,
    pub handles: bool,
    pub hashtags: bool,
    /// When no URL is found, pass the remaining targets through as if they
    /// were URLs. Non-URL targets are dropped otherwise.
    pub identifier_fallback: bool,
}

impl RuleSet {
    /// URLs, handles, hashtags and queries.
    pub const FULL: RuleSet = RuleSet {
        urls: true,
        handles: true,
        hashtags: true,
        identifier_fallback: false,
    };

    /// URLs and queries; markers stay part of the query text.
    pub const URLS_AND_QUERIES: RuleSet = RuleSet {
        urls: true,
        handles: false,
        hashtags: false,
        identifier_fallback: false,
    };

    /// Handles and queries; URLs and hashtags are searched as text.
    pub const HANDLES_AND_QUERIES: RuleSet = RuleSet {
        urls: false,
        handles: true,
        hashtags: false,
        identifier_fallback: false,
    };

    /// Profile URLs only, raw identifiers accepted when no URL is present.
    pub const PROFILE_URLS: RuleSet = RuleSet {
        urls: true,
        handles: false,
        hashtags: false,
        identifier_fallback: true,
    };
}

/// Targets split into the buckets a request builder consumes. Each bucket
/// keeps input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifiedTargets {
    pub urls: Vec<String>,
    pub handles: Vec<String>,
    pub hashtags: Vec<String>,
    pub queries: Vec<String>,
}

impl ClassifiedTargets {
    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
            && self.handles.is_empty()
            && self.hashtags.is_empty()
            && self.queries.is_empty()
    }

    /// True when any URL, handle or hashtag was found.
    pub fn has_direct(&self) -> bool {
        !self.urls.is_empty() || !self.handles.is_empty() || !self.hashtags.is_empty()
    }

    pub fn len(&self) -> usize {
        self.urls.len() + self.handles.len() + self.hashtags.len() + self.queries.len()
    }
}

/// Partition `targets` under `rules`. Whitespace is trimmed and blank
/// entries are dropped; the first matching rule wins.
pub fn classify<S: AsRef<str>>(targets: &[S], rules: RuleSet) -> ClassifiedTargets {
    let mut out = ClassifiedTargets::default();

    for target in targets {
        let trimmed = target.as_ref().trim();
        if trimmed.is_empty() {
            continue;
        }

        if rules.urls && trimmed.starts_with(URL_PREFIX) {
            out.urls.push(trimmed.to_string());
        } else if rules.handles && trimmed.starts_with(HANDLE_MARKER) {
            out.handles
                .push(trimmed.trim_start_matches(HANDLE_MARKER).to_string());
        } else if rules.hashtags && trimmed.starts_with(HASHTAG_MARKER) {
            out.hashtags
                .push(trimmed.trim_start_matches(HASHTAG_MARKER).to_string());
        } else {
            out.queries.push(trimmed.to_string());
        }
    }

    if rules.identifier_fallback {
        let leftovers = std::mem::take(&mut out.queries);
        if out.urls.is_empty() {
            out.urls = leftovers;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_rules_split_every_bucket() {
        let got = classify(&["https://x.com/a", "@bob", "#deals", "shoes"], RuleSet::FULL);
        assert_eq!(got.urls, vec!["https://x.com/a"]);
        assert_eq!(got.handles, vec!["bob"]);
        assert_eq!(got.hashtags, vec!["deals"]);
        assert_eq!(got.queries, vec!["shoes"]);
    }

    #[test]
    fn whitespace_trimmed_and_blanks_dropped() {
        let got = classify(&["  @alice  ", "", "   ", "\tcoffee shops\n"], RuleSet::FULL);
        assert_eq!(got.handles, vec!["alice"]);
        assert_eq!(got.queries, vec!["coffee shops"]);
        assert_eq!(got.len(), 2);
    }

    #[test]
    fn all_blank_yields_empty() {
        let got = classify(&["", "  ", "\n"], RuleSet::FULL);
        assert!(got.is_empty());
        assert!(!got.has_direct());
    }

    #[test]
    fn repeated_markers_fully_stripped() {
        let got = classify(&["@@double", "##twice"], RuleSet::FULL);
        assert_eq!(got.handles, vec!["double"]);
        assert_eq!(got.hashtags, vec!["twice"]);
    }

    #[test]
    fn url_prefix_beats_markers() {
        // "http" is checked first, so even odd URLs land in the URL bucket.
        let got = classify(&["httpbin", "@http"], RuleSet::FULL);
        assert_eq!(got.urls, vec!["httpbin"]);
        assert_eq!(got.handles, vec!["http"]);
    }

    #[test]
    fn unsupported_markers_become_queries_verbatim() {
        let got = classify(
            &["https://fb.com/page", "@someone", "#topic"],
            RuleSet::URLS_AND_QUERIES,
        );
        assert_eq!(got.urls, vec!["https://fb.com/page"]);
        assert!(got.handles.is_empty());
        assert!(got.hashtags.is_empty());
        assert_eq!(got.queries, vec!["@someone", "#topic"]);
    }

    #[test]
    fn handles_and_queries_send_urls_to_queries() {
        let got = classify(
            &["@jack", "https://x.com/jack", "#rustlang", "lead gen"],
            RuleSet::HANDLES_AND_QUERIES,
        );
        assert_eq!(got.handles, vec!["jack"]);
        assert_eq!(got.queries, vec!["https://x.com/jack", "#rustlang", "lead gen"]);
        assert!(got.urls.is_empty());
    }

    #[test]
    fn profile_urls_drop_identifiers_when_a_url_exists() {
        let got = classify(&["https://linkedin.com/in/jane", "not-a-url"], RuleSet::PROFILE_URLS);
        assert_eq!(got.urls, vec!["https://linkedin.com/in/jane"]);
        assert!(got.queries.is_empty());
    }

    #[test]
    fn profile_urls_fall_back_to_identifiers() {
        let got = classify(&["jane-doe", " acme-corp "], RuleSet::PROFILE_URLS);
        assert_eq!(got.urls, vec!["jane-doe", "acme-corp"]);
        assert!(got.queries.is_empty());
    }

    #[test]
    fn partition_is_total_disjoint_and_ordered() {
        let targets = [
            "q1", "@h1", "https://a", "#t1", "q2", "@h2", "#t2", "https://b", "q3",
        ];
        let got = classify(&targets, RuleSet::FULL);
        assert_eq!(got.len(), targets.len());
        assert_eq!(got.urls, vec!["https://a", "https://b"]);
        assert_eq!(got.handles, vec!["h1", "h2"]);
        assert_eq!(got.hashtags, vec!["t1", "t2"]);
        assert_eq!(got.queries, vec!["q1", "q2", "q3"]);
    }
}
