//! Routes scrape requests to the right platform builder and actor.

use std::sync::Arc;

use apify_client::ApifyClient;
use futures::future::{join_all, try_join_all};
use serde::{Serialize, Serializer};
use serde_json::Value;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{LeadScoutError, Result};
use crate::invoker::{invoke, ActorRunner};
use crate::models::{PlatformTargetConfig, ScrapeArgs};
use crate::platform::{Platform, RequestBuilder};
use crate::proxy::{ProxyPolicy, SessionIdGenerator, UuidSessions};

/// Resolve requested platform names. Unknown names are skipped with a
/// warning and duplicates collapse to their first occurrence.
pub fn resolve_platforms<S: AsRef<str>>(names: &[S]) -> Result<Vec<Platform>> {
    let mut platforms = Vec::new();
    for platform in names.iter().filter_map(|name| known_platform(name.as_ref())) {
        if !platforms.contains(&platform) {
            platforms.push(platform);
        }
    }
    require_any(platforms)
}

fn known_platform(name: &str) -> Option<Platform> {
    match name.parse::<Platform>() {
        Ok(platform) => Some(platform),
        Err(_) => {
            warn!(platform = name, "No tool configured for platform");
            None
        }
    }
}

fn require_any<T>(resolved: Vec<T>) -> Result<Vec<T>> {
    if resolved.is_empty() {
        return Err(LeadScoutError::Configuration(
            "no tools available for the requested platforms".into(),
        ));
    }
    Ok(resolved)
}

pub struct Dispatcher {
    runner: Arc<dyn ActorRunner>,
    proxy: ProxyPolicy,
    sessions: Arc<dyn SessionIdGenerator>,
}

impl Dispatcher {
    pub fn new(runner: Arc<dyn ActorRunner>, proxy: ProxyPolicy) -> Self {
        Self {
            runner,
            proxy,
            sessions: Arc::new(UuidSessions),
        }
    }

    /// Dispatcher backed by the Apify API.
    pub fn from_config(config: &Config) -> Self {
        let client = ApifyClient::new(config.apify_token.clone());
        Self::new(Arc::new(client), config.proxy.clone())
    }

    pub fn with_sessions(mut self, sessions: Arc<dyn SessionIdGenerator>) -> Self {
        self.sessions = sessions;
        self
    }

    pub fn proxy_policy(&self) -> &ProxyPolicy {
        &self.proxy
    }

    fn builder(&self) -> RequestBuilder<'_> {
        RequestBuilder::new(&self.proxy, self.sessions.as_ref())
    }

    /// Scrape one platform and return its raw records.
    pub async fn scrape(&self, platform: Platform, args: &ScrapeArgs) -> Result<Vec<Value>> {
        args.validate()?;
        self.scrape_validated(platform, args).await
    }

    async fn scrape_validated(&self, platform: Platform, args: &ScrapeArgs) -> Result<Vec<Value>> {
        let actor_id = platform.actor_id();
        let requests = self.builder().plan(platform, args);
        if requests.len() > 1 {
            info!(%platform, requests = requests.len(), "Fanning out actor requests");
        }

        // try_join_all keeps issue order, so records concatenate deterministically.
        let batches = try_join_all(
            requests
                .iter()
                .map(|request| invoke(self.runner.as_ref(), actor_id, request)),
        )
        .await?;

        let records: Vec<Value> = batches.into_iter().flatten().collect();
        info!(%platform, count = records.len(), "Scrape complete");
        Ok(records)
    }

    /// Run every config whose platform is known, concurrently. Each
    /// platform's failure is kept on its own outcome so siblings still
    /// report their records.
    pub async fn run_batch(&self, configs: &[PlatformTargetConfig]) -> Result<BatchReport> {
        let resolved = require_any(
            configs
                .iter()
                .filter_map(|config| Some((known_platform(&config.platform)?, &config.args)))
                .collect(),
        )?;

        for (platform, args) in &resolved {
            args.validate().map_err(|e| match e {
                LeadScoutError::Validation(msg) => {
                    LeadScoutError::Validation(format!("{platform}: {msg}"))
                }
                other => other,
            })?;
        }

        let outcomes = join_all(resolved.into_iter().map(|(platform, args)| async move {
            let result = self.scrape_validated(platform, args).await;
            if let Err(ref e) = result {
                warn!(%platform, error = %e, "Platform scrape failed");
            }
            PlatformOutcome::new(platform, result)
        }))
        .await;

        Ok(BatchReport { outcomes })
    }
}

/// Result of one platform within a batch.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformOutcome {
    pub platform: Platform,
    pub actor_id: &'static str,
    pub records: Vec<Value>,
    #[serde(
        serialize_with = "serialize_error",
        skip_serializing_if = "Option::is_none"
    )]
    pub error: Option<LeadScoutError>,
}

impl PlatformOutcome {
    fn new(platform: Platform, result: Result<Vec<Value>>) -> Self {
        let (records, error) = match result {
            Ok(records) => (records, None),
            Err(e) => (Vec::new(), Some(e)),
        };
        Self {
            platform,
            actor_id: platform.actor_id(),
            records,
            error,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

fn serialize_error<S: Serializer>(
    error: &Option<LeadScoutError>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match error {
        Some(e) => serializer.serialize_str(&e.to_string()),
        None => serializer.serialize_none(),
    }
}

/// Per-platform outcomes of a batch, in request order.
#[derive(Debug, Serialize)]
pub struct BatchReport {
    pub outcomes: Vec<PlatformOutcome>,
}

impl BatchReport {
    /// The first failure, in request order.
    pub fn first_error(&self) -> Option<&LeadScoutError> {
        self.outcomes.iter().find_map(|o| o.error.as_ref())
    }

    pub fn all_failed(&self) -> bool {
        !self.outcomes.is_empty() && self.outcomes.iter().all(|o| !o.is_ok())
    }

    /// Records from every successful platform, in request order.
    pub fn records(&self) -> impl Iterator<Item = &Value> {
        self.outcomes.iter().flat_map(|o| o.records.iter())
    }
}
