//! Supported platforms and their actor request builders.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::error::LeadScoutError;
use crate::merge::merge;
use crate::models::ScrapeArgs;
use crate::proxy::{apply_default_proxy, ProxyPolicy, SessionIdGenerator};
use crate::targets::{classify, ClassifiedTargets, RuleSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Instagram,
    Facebook,
    TikTok,
    Twitter,
    LinkedIn,
}

impl Platform {
    pub const ALL: [Platform; 5] = [
        Platform::Instagram,
        Platform::Facebook,
        Platform::TikTok,
        Platform::Twitter,
        Platform::LinkedIn,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Instagram => "instagram",
            Platform::Facebook => "facebook",
            Platform::TikTok => "tiktok",
            Platform::Twitter => "twitter",
            Platform::LinkedIn => "linkedin",
        }
    }

    /// Apify actor that scrapes this platform.
    pub fn actor_id(&self) -> &'static str {
        match self {
            Platform::Instagram => "apify/instagram-scraper",
            Platform::Facebook => "apify/facebook-posts-scraper",
            Platform::TikTok => "clockworks/tiktok-scraper",
            Platform::Twitter => "apidojo/tweet-scraper",
            Platform::LinkedIn => "dev_fusion/linkedin-profile-scraper",
        }
    }

    pub fn tool_name(&self) -> &'static str {
        match self {
            Platform::Instagram => "instagram_lead_scraper",
            Platform::Facebook => "facebook_lead_scraper",
            Platform::TikTok => "tiktok_lead_scraper",
            Platform::Twitter => "twitter_lead_scraper",
            Platform::LinkedIn => "linkedin_lead_scraper",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Platform::Instagram => {
                "Scrape Instagram profiles, hashtags, or search results \
                 to identify potential leads. Targets can be profile URLs, \
                 @handles, #hashtags, or search keywords."
            }
            Platform::Facebook => {
                "Scrape Facebook pages and posts for engagement insights. \
                 Targets should be Facebook page URLs or search keywords."
            }
            Platform::TikTok => {
                "Scrape TikTok profiles, hashtags, or search results. \
                 Targets can be profile URLs, @handles, #hashtags, or keywords."
            }
            Platform::Twitter => {
                "Scrape X/Twitter timelines or search results. \
                 Targets can be @handles for timelines or raw search queries."
            }
            Platform::LinkedIn => {
                "Scrape LinkedIn profiles or company pages for lead details. \
                 Targets should be LinkedIn profile or company URLs."
            }
        }
    }

    pub fn rules(&self) -> RuleSet {
        match self {
            Platform::Instagram | Platform::TikTok => RuleSet::FULL,
            Platform::Facebook => RuleSet::URLS_AND_QUERIES,
            Platform::Twitter => RuleSet::HANDLES_AND_QUERIES,
            Platform::LinkedIn => RuleSet::PROFILE_URLS,
        }
    }

    pub fn classify<S: AsRef<str>>(&self, targets: &[S]) -> ClassifiedTargets {
        classify(targets, self.rules())
    }

    /// Default actor input for already-classified targets, before overrides
    /// and proxy. Empty buckets are left out; `maxItems` is always set.
    pub fn base_input(
        &self,
        targets: &ClassifiedTargets,
        max_items: u32,
        include_contact_info: bool,
    ) -> Map<String, Value> {
        let mut input = Map::new();
        input.insert("maxItems".into(), json!(max_items));

        match self {
            Platform::Instagram => {
                put_list(&mut input, "directUrls", &targets.urls);
                put_list(&mut input, "usernames", &targets.handles);
                put_list(&mut input, "hashtags", &targets.hashtags);
                // The actor takes a single search string.
                if let Some(first) = targets.queries.first() {
                    input.insert("search".into(), json!(first));
                }
                if include_contact_info {
                    input.insert("addUserInfo".into(), json!(true));
                }
            }
            Platform::Facebook => {
                put_start_urls(&mut input, &targets.urls);
                put_list(&mut input, "searchTerms", &targets.queries);
                if include_contact_info {
                    input.insert("shouldDownloadVideos".into(), json!(false));
                }
            }
            Platform::TikTok => {
                put_start_urls(&mut input, &targets.urls);
                put_list(&mut input, "handles", &targets.handles);
                put_list(&mut input, "hashtags", &targets.hashtags);
                put_list(&mut input, "searchTerms", &targets.queries);
                if include_contact_info {
                    input.insert("shouldDownloadCaptions".into(), json!(true));
                }
            }
            Platform::Twitter => {
                put_list(&mut input, "handles", &targets.handles);
                put_list(&mut input, "queries", &targets.queries);
                if include_contact_info {
                    input.insert("includeRetweet".into(), json!(true));
                }
            }
            Platform::LinkedIn => {
                if !targets.urls.is_empty() {
                    input.insert("profileUrls".into(), json!(targets.urls));
                    input.insert("maxDepth".into(), json!(1));
                }
                if include_contact_info {
                    input.insert("shouldFetchContact".into(), json!(true));
                }
            }
        }

        input
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = LeadScoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "instagram" => Ok(Platform::Instagram),
            "facebook" => Ok(Platform::Facebook),
            "tiktok" => Ok(Platform::TikTok),
            "twitter" | "x" => Ok(Platform::Twitter),
            "linkedin" => Ok(Platform::LinkedIn),
            other => Err(LeadScoutError::Validation(format!(
                "unknown platform: {other}"
            ))),
        }
    }
}

fn put_list(input: &mut Map<String, Value>, key: &str, values: &[String]) {
    if !values.is_empty() {
        input.insert(key.into(), json!(values));
    }
}

fn put_start_urls(input: &mut Map<String, Value>, urls: &[String]) {
    if !urls.is_empty() {
        let start_urls: Vec<Value> = urls.iter().map(|url| json!({ "url": url })).collect();
        input.insert("startUrls".into(), Value::Array(start_urls));
    }
}

/// Builds complete actor inputs: defaults, then caller overrides, then the
/// default proxy when the caller did not supply one.
pub struct RequestBuilder<'a> {
    pub proxy: &'a ProxyPolicy,
    pub sessions: &'a dyn SessionIdGenerator,
}

impl<'a> RequestBuilder<'a> {
    pub fn new(proxy: &'a ProxyPolicy, sessions: &'a dyn SessionIdGenerator) -> Self {
        Self { proxy, sessions }
    }

    /// Single-request input for `platform`.
    pub fn build(&self, platform: Platform, args: &ScrapeArgs) -> Map<String, Value> {
        let targets = platform.classify(&args.targets);
        let base = platform.base_input(&targets, args.max_items, args.include_contact_info);
        self.finish(platform, base, args)
    }

    /// Every request one scrape issues, in issue order.
    ///
    /// Instagram fans out: URLs, handles and hashtags share one request and
    /// each free-text query gets its own, since the actor only searches one
    /// term per run. All other platforms issue exactly one request.
    pub fn plan(&self, platform: Platform, args: &ScrapeArgs) -> Vec<Map<String, Value>> {
        if platform != Platform::Instagram {
            return vec![self.build(platform, args)];
        }

        let targets = platform.classify(&args.targets);
        let mut requests = Vec::with_capacity(targets.queries.len() + 1);

        if targets.has_direct() {
            let direct = ClassifiedTargets {
                queries: Vec::new(),
                ..targets.clone()
            };
            let base = platform.base_input(&direct, args.max_items, args.include_contact_info);
            requests.push(self.finish(platform, base, args));
        }

        for query in &targets.queries {
            let single = ClassifiedTargets {
                queries: vec![query.clone()],
                ..ClassifiedTargets::default()
            };
            let base = platform.base_input(&single, args.max_items, args.include_contact_info);
            requests.push(self.finish(platform, base, args));
        }

        if requests.is_empty() {
            // Nothing usable survived classification; still make one attempt.
            requests.push(self.build(platform, args));
        }

        requests
    }

    fn finish(
        &self,
        platform: Platform,
        base: Map<String, Value>,
        args: &ScrapeArgs,
    ) -> Map<String, Value> {
        let mut request = merge(&base, args.input_overrides.as_ref());
        apply_default_proxy(&mut request, platform, self.proxy, self.sessions);
        request
    }
}
