use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{LeadScoutError, Result};

pub const MIN_ITEMS: u32 = 1;
pub const MAX_ITEMS: u32 = 500;
pub const DEFAULT_MAX_ITEMS: u32 = 25;
pub const DEFAULT_MAX_LEADS: u32 = 100;

fn default_max_items() -> u32 {
    DEFAULT_MAX_ITEMS
}

fn default_true() -> bool {
    true
}

fn default_max_leads() -> u32 {
    DEFAULT_MAX_LEADS
}

/// Arguments of one platform scrape, as the agent supplies them.
#[derive(Debug, Clone, PartialEq, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeArgs {
    /// Profile URLs, handles, or search terms.
    #[schemars(length(min = 1))]
    pub targets: Vec<String>,

    /// Maximum number of results per target.
    #[serde(default = "default_max_items", alias = "max_items")]
    #[schemars(range(min = 1, max = 500))]
    pub max_items: u32,

    /// Attempt to enrich with contact details when supported.
    #[serde(default = "default_true", alias = "include_contact_info")]
    pub include_contact_info: bool,

    /// Optional raw overrides merged into the actor input.
    #[serde(default, alias = "input_overrides")]
    pub input_overrides: Option<Map<String, Value>>,
}

impl ScrapeArgs {
    pub fn new<S: Into<String>>(targets: impl IntoIterator<Item = S>) -> Self {
        Self {
            targets: targets.into_iter().map(Into::into).collect(),
            max_items: DEFAULT_MAX_ITEMS,
            include_contact_info: true,
            input_overrides: None,
        }
    }

    pub fn max_items(mut self, max_items: u32) -> Self {
        self.max_items = max_items;
        self
    }

    pub fn include_contact_info(mut self, include: bool) -> Self {
        self.include_contact_info = include;
        self
    }

    pub fn overrides(mut self, overrides: Map<String, Value>) -> Self {
        self.input_overrides = Some(overrides);
        self
    }

    /// Shape checks that run before anything is sent to the remote side.
    pub fn validate(&self) -> Result<()> {
        if self.targets.is_empty() {
            return Err(LeadScoutError::Validation(
                "at least one target is required".into(),
            ));
        }
        if !(MIN_ITEMS..=MAX_ITEMS).contains(&self.max_items) {
            return Err(LeadScoutError::Validation(format!(
                "maxItems must be between {MIN_ITEMS} and {MAX_ITEMS}, got {}",
                self.max_items
            )));
        }
        Ok(())
    }
}

/// One platform entry of a batch request. The platform stays a raw string
/// so an unknown name can be skipped without rejecting the whole batch.
#[derive(Debug, Clone, Deserialize)]
pub struct PlatformTargetConfig {
    pub platform: String,
    #[serde(flatten)]
    pub args: ScrapeArgs,
}

/// Batch input handed over by the host runtime.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadRequest {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub platforms: Vec<PlatformTargetConfig>,
    #[serde(default = "default_max_leads", alias = "max_leads")]
    pub max_leads: u32,
}

impl LeadRequest {
    pub fn validate(&self) -> Result<()> {
        if self.query.trim().is_empty() {
            return Err(LeadScoutError::Validation(
                "missing \"query\" attribute in input".into(),
            ));
        }
        if self.platforms.is_empty() {
            return Err(LeadScoutError::Validation(
                "at least one platform configuration is required".into(),
            ));
        }
        Ok(())
    }
}
