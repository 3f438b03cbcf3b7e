//! Scrape tools handed to the synthesis agent.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::dispatch::Dispatcher;
use crate::models::ScrapeArgs;
use crate::platform::Platform;

#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// Object-safe tool interface: JSON arguments in, JSON result out.
#[async_trait]
pub trait DynTool: Send + Sync {
    fn name(&self) -> &'static str;
    async fn definition(&self) -> ToolDefinition;
    async fn call_json(&self, args: Value) -> Result<Value, String>;
}

/// One platform's scraper, exposed as a tool.
pub struct ScrapeTool {
    platform: Platform,
    dispatcher: Arc<Dispatcher>,
}

impl ScrapeTool {
    pub fn new(platform: Platform, dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            platform,
            dispatcher,
        }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }
}

#[async_trait]
impl DynTool for ScrapeTool {
    fn name(&self) -> &'static str {
        self.platform.tool_name()
    }

    async fn definition(&self) -> ToolDefinition {
        let schema = schemars::schema_for!(ScrapeArgs);
        ToolDefinition {
            name: self.name().to_string(),
            description: self.platform.description().to_string(),
            parameters: serde_json::to_value(schema).unwrap_or_default(),
        }
    }

    async fn call_json(&self, args: Value) -> Result<Value, String> {
        let args: ScrapeArgs =
            serde_json::from_value(args).map_err(|e| format!("Failed to parse args: {}", e))?;

        let records = self
            .dispatcher
            .scrape(self.platform, &args)
            .await
            .map_err(|e| format!("Tool error: {}", e))?;

        Ok(Value::Array(records))
    }
}

/// One tool per platform, sharing a dispatcher.
pub fn tools_for(platforms: &[Platform], dispatcher: Arc<Dispatcher>) -> Vec<Arc<dyn DynTool>> {
    platforms
        .iter()
        .map(|&platform| {
            Arc::new(ScrapeTool::new(platform, dispatcher.clone())) as Arc<dyn DynTool>
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proxy::ProxyPolicy;
    use crate::testing::{self, MockRunner};
    use serde_json::json;

    fn dispatcher(runner: MockRunner) -> Arc<Dispatcher> {
        Arc::new(Dispatcher::new(Arc::new(runner), ProxyPolicy::disabled()))
    }

    #[tokio::test]
    async fn definition_describes_arguments() {
        let tool = ScrapeTool::new(Platform::TikTok, dispatcher(MockRunner::new()));
        let def = tool.definition().await;
        assert_eq!(def.name, "tiktok_lead_scraper");
        assert!(def.description.contains("TikTok"));

        let props = &def.parameters["properties"];
        assert!(props.get("targets").is_some());
        assert!(props.get("maxItems").is_some());
        assert!(props.get("includeContactInfo").is_some());
        assert!(props.get("inputOverrides").is_some());
        assert_eq!(def.parameters["required"], json!(["targets"]));
    }

    #[tokio::test]
    async fn call_json_returns_records() {
        let runner = MockRunner::new().on_run(
            Platform::Twitter.actor_id(),
            testing::inline_run(vec![json!({ "text": "hello" })]),
        );
        let tool = ScrapeTool::new(Platform::Twitter, dispatcher(runner));

        let out = tool
            .call_json(json!({ "targets": ["@jack"], "maxItems": 5 }))
            .await
            .unwrap();
        assert_eq!(out, json!([{ "text": "hello" }]));
    }

    #[tokio::test]
    async fn call_json_rejects_bad_arguments() {
        let tool = ScrapeTool::new(Platform::LinkedIn, dispatcher(MockRunner::new()));

        let err = tool.call_json(json!({ "maxItems": 5 })).await.unwrap_err();
        assert!(err.starts_with("Failed to parse args"), "{err}");

        let err = tool
            .call_json(json!({ "targets": ["jane"], "maxItems": 900 }))
            .await
            .unwrap_err();
        assert!(err.starts_with("Tool error: invalid request"), "{err}");
    }

    #[test]
    fn tools_for_names_each_platform() {
        let tools = tools_for(&Platform::ALL, dispatcher(MockRunner::new()));
        let names: Vec<_> = tools.iter().map(|t| t.name()).collect();
        assert_eq!(
            names,
            vec![
                "instagram_lead_scraper",
                "facebook_lead_scraper",
                "tiktok_lead_scraper",
                "twitter_lead_scraper",
                "linkedin_lead_scraper",
            ]
        );
    }
}
