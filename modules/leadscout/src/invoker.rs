//! Actor invocation and run-output resolution.

use apify_client::{ApifyClient, RunData};
use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::error::{LeadScoutError, Result};

/// The remote actor-execution service.
#[async_trait]
pub trait ActorRunner: Send + Sync {
    /// Run an actor to completion. `None` means the service answered
    /// without any run metadata.
    async fn call_actor(
        &self,
        actor_id: &str,
        input: &Map<String, Value>,
    ) -> apify_client::Result<Option<RunData>>;

    async fn dataset_items(&self, dataset_id: &str) -> apify_client::Result<Vec<Value>>;
}

#[async_trait]
impl ActorRunner for ApifyClient {
    async fn call_actor(
        &self,
        actor_id: &str,
        input: &Map<String, Value>,
    ) -> apify_client::Result<Option<RunData>> {
        ApifyClient::call_actor(self, actor_id, input).await
    }

    async fn dataset_items(&self, dataset_id: &str) -> apify_client::Result<Vec<Value>> {
        self.get_dataset_items(dataset_id).await
    }
}

/// Where a finished run keeps its records. Decided once per run.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutput {
    Dataset(String),
    Inline(Vec<Value>),
    Output(Vec<Value>),
    Empty,
}

impl RunOutput {
    /// Dataset id, then inline `items`, then `output.items`, else empty.
    pub fn resolve(run: RunData) -> Self {
        if let Some(dataset_id) = run.dataset_id() {
            return RunOutput::Dataset(dataset_id.to_string());
        }

        if let Some(items) = run.items {
            return RunOutput::Inline(items);
        }

        if let Some(Value::Object(mut output)) = run.output {
            if let Some(items) = output.remove("items") {
                return RunOutput::Output(match items {
                    Value::Array(items) => items,
                    Value::Null => Vec::new(),
                    other => {
                        warn!(run_id = %run.id, found = %other, "Run output items is not an array");
                        Vec::new()
                    }
                });
            }
        }

        RunOutput::Empty
    }
}

/// Call `actor_id` with `input` and return its records.
///
/// Any failure of the remote call, including the dataset fetch, becomes
/// [`LeadScoutError::Invocation`]. A run that reports nothing is an empty
/// result, not an error.
pub async fn invoke(
    runner: &dyn ActorRunner,
    actor_id: &str,
    input: &Map<String, Value>,
) -> Result<Vec<Value>> {
    let payload = Value::Object(input.clone());
    info!(actor_id, input = %payload, "Calling actor");

    let run = runner
        .call_actor(actor_id, input)
        .await
        .map_err(|e| LeadScoutError::invocation(actor_id, e))?;

    let Some(run) = run else {
        warn!(actor_id, "Actor returned no run data");
        return Ok(Vec::new());
    };

    match RunOutput::resolve(run) {
        RunOutput::Dataset(dataset_id) => {
            let items = runner
                .dataset_items(&dataset_id)
                .await
                .map_err(|e| LeadScoutError::invocation(actor_id, e))?;
            info!(actor_id, dataset_id = %dataset_id, count = items.len(), "Fetched dataset items");
            if let Some(Value::Object(first)) = items.first() {
                let keys: Vec<&str> = first.keys().map(String::as_str).collect();
                tracing::debug!(actor_id, ?keys, "Sample item keys");
            }
            Ok(items)
        }
        RunOutput::Inline(items) => {
            info!(actor_id, count = items.len(), "Items returned inline on run");
            Ok(items)
        }
        RunOutput::Output(items) => {
            info!(actor_id, count = items.len(), "Items returned in run output");
            Ok(items)
        }
        RunOutput::Empty => {
            warn!(actor_id, "Actor completed but no items found in response");
            Ok(Vec::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{self, MockRunner};
    use apify_client::ApifyError;
    use serde_json::json;

    const ACTOR: &str = "apify/instagram-scraper";

    #[test]
    fn resolution_order() {
        let mut run = testing::dataset_run("ds-1");
        run.items = Some(vec![json!({ "inline": true })]);
        assert_eq!(RunOutput::resolve(run), RunOutput::Dataset("ds-1".into()));

        let mut run = testing::inline_run(vec![]);
        run.output = Some(json!({ "items": [1] }));
        assert_eq!(RunOutput::resolve(run), RunOutput::Inline(vec![]));

        let run = testing::output_run(json!({ "items": [{ "id": 1 }] }));
        assert_eq!(RunOutput::resolve(run), RunOutput::Output(vec![json!({ "id": 1 })]));

        let run = testing::output_run(json!({ "items": null }));
        assert_eq!(RunOutput::resolve(run), RunOutput::Output(vec![]));

        let run = testing::output_run(json!({ "items": { "fullName": "Jane" } }));
        assert_eq!(RunOutput::resolve(run), RunOutput::Output(vec![]));

        let run = testing::output_run(json!({ "summary": "done" }));
        assert_eq!(RunOutput::resolve(run), RunOutput::Empty);

        let run = testing::output_run(json!("plain string"));
        assert_eq!(RunOutput::resolve(run), RunOutput::Empty);

        assert_eq!(RunOutput::resolve(RunData::default()), RunOutput::Empty);
    }

    #[tokio::test]
    async fn dataset_items_are_returned() {
        let runner = MockRunner::new()
            .on_run(ACTOR, testing::dataset_run("ds-1"))
            .on_dataset("ds-1", vec![json!({ "ownerUsername": "bob" })]);

        let items = invoke(&runner, ACTOR, &Map::new()).await.unwrap();
        assert_eq!(items, vec![json!({ "ownerUsername": "bob" })]);
    }

    #[tokio::test]
    async fn empty_dataset_is_not_an_error() {
        let runner = MockRunner::new()
            .on_run(ACTOR, testing::dataset_run("ds-empty"))
            .on_dataset("ds-empty", vec![]);

        let items = invoke(&runner, ACTOR, &Map::new()).await.unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn null_run_resolves_empty() {
        let runner = MockRunner::new().on_null_run(ACTOR);
        let items = invoke(&runner, ACTOR, &Map::new()).await.unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn remote_failure_carries_actor_id() {
        let runner = MockRunner::new().on_failure(
            ACTOR,
            ApifyError::Api {
                status: 401,
                message: "unauthorized".into(),
            },
        );

        let err = invoke(&runner, ACTOR, &Map::new()).await.unwrap_err();
        match err {
            LeadScoutError::Invocation { actor_id, source } => {
                assert_eq!(actor_id, ACTOR);
                assert!(matches!(source, ApifyError::Api { status: 401, .. }));
            }
            other => panic!("expected invocation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn dataset_fetch_failure_is_invocation_error() {
        // Dataset "ds-missing" is never registered with the mock.
        let runner = MockRunner::new().on_run(ACTOR, testing::dataset_run("ds-missing"));
        let err = invoke(&runner, ACTOR, &Map::new()).await.unwrap_err();
        assert!(matches!(err, LeadScoutError::Invocation { .. }));
    }

    #[tokio::test]
    async fn request_is_forwarded_unchanged() {
        let runner = MockRunner::new().on_run(ACTOR, testing::inline_run(vec![json!(1)]));
        let mut input = Map::new();
        input.insert("maxItems".into(), json!(3));

        invoke(&runner, ACTOR, &input).await.unwrap();
        let calls = runner.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].actor_id, ACTOR);
        assert_eq!(calls[0].input, input);
    }
}
