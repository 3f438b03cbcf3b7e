//! Target classification and Apify actor dispatch for social lead scraping.
//!
//! Raw targets (URLs, `@handles`, `#hashtags`, free text) are classified per
//! platform, shaped into an actor input, merged with caller overrides, given
//! a proxy, and sent to the platform's Apify actor. Records come back
//! untouched for downstream synthesis.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod invoker;
pub mod merge;
pub mod models;
pub mod platform;
pub mod proxy;
pub mod targets;
pub mod tool;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use config::Config;
pub use dispatch::{resolve_platforms, BatchReport, Dispatcher, PlatformOutcome};
pub use error::{LeadScoutError, Result};
pub use invoker::{invoke, ActorRunner, RunOutput};
pub use models::{LeadRequest, PlatformTargetConfig, ScrapeArgs};
pub use platform::{Platform, RequestBuilder};
pub use proxy::{ProxyConfig, ProxyPolicy, SessionIdGenerator, SessionMode};
pub use targets::{classify, ClassifiedTargets, RuleSet};
pub use tool::{tools_for, DynTool, ScrapeTool, ToolDefinition};
