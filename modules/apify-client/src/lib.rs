//! Pure Apify REST API client.
//!
//! Starts actor runs, waits for them to finish, and fetches dataset items.
//! Actor inputs and dataset records are plain JSON; shaping them is up to
//! the caller.
//!
//! # Example
//!
//! ```rust,ignore
//! use apify_client::ApifyClient;
//!
//! let client = ApifyClient::new("your-api-token".into());
//! let input = serde_json::json!({ "usernames": ["natgeo"], "maxItems": 10 });
//!
//! if let Some(run) = client.call_actor("apify/instagram-scraper", &input).await? {
//!     if let Some(dataset_id) = run.dataset_id() {
//!         let items: Vec<serde_json::Value> = client.get_dataset_items(dataset_id).await?;
//!         println!("{} items", items.len());
//!     }
//! }
//! ```

pub mod error;
pub mod types;

pub use error::{ApifyError, Result};
pub use types::{RunData, RunStatus};

use serde::de::DeserializeOwned;
use serde::Serialize;
use types::ApiResponse;

const BASE_URL: &str = "https://api.apify.com/v2";

/// Seconds the API may hold a run-status request open before answering.
const WAIT_FOR_FINISH_SECS: u32 = 60;

pub struct ApifyClient {
    client: reqwest::Client,
    token: String,
    base_url: String,
}

impl ApifyClient {
    pub fn new(token: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            token,
            base_url: BASE_URL.to_string(),
        }
    }

    /// Point the client at a different API root (mock servers, proxies).
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Start an actor run. Returns immediately with run metadata, or `None`
    /// when the API answers without any.
    pub async fn start_run<I: Serialize + ?Sized>(
        &self,
        actor_id: &str,
        input: &I,
    ) -> Result<Option<RunData>> {
        let url = format!("{}/acts/{}/runs", self.base_url, actor_path(actor_id));
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(input)
            .send()
            .await?;

        let resp = check_status(resp).await?;
        let api_resp: ApiResponse<Option<RunData>> = resp.json().await?;
        Ok(api_resp.data)
    }

    /// Poll until a run completes. Uses `waitForFinish` for efficient long-polling.
    pub async fn wait_for_run(&self, run_id: &str) -> Result<RunData> {
        loop {
            let url = format!(
                "{}/actor-runs/{}?waitForFinish={}",
                self.base_url, run_id, WAIT_FOR_FINISH_SECS
            );
            let resp = self
                .client
                .get(&url)
                .bearer_auth(&self.token)
                .send()
                .await?;

            let resp = check_status(resp).await?;
            let api_resp: ApiResponse<RunData> = resp.json().await?;
            let run = api_resp.data;
            match run.run_status() {
                RunStatus::Succeeded => return Ok(run),
                RunStatus::Failed => {
                    return Err(ApifyError::RunFailed {
                        run_id: run.id,
                        status: run.status,
                    });
                }
                RunStatus::InProgress => {
                    tracing::debug!(run_id, status = %run.status, "Run still in progress");
                }
            }
        }
    }

    /// Run an actor to completion: start it, then wait for a terminal status.
    pub async fn call_actor<I: Serialize + ?Sized>(
        &self,
        actor_id: &str,
        input: &I,
    ) -> Result<Option<RunData>> {
        let Some(run) = self.start_run(actor_id, input).await? else {
            return Ok(None);
        };
        tracing::info!(actor_id, run_id = %run.id, "Apify run started, polling for completion");

        match run.run_status() {
            RunStatus::Succeeded => Ok(Some(run)),
            RunStatus::Failed => Err(ApifyError::RunFailed {
                run_id: run.id,
                status: run.status,
            }),
            // Nothing to poll without an id; hand back what we have.
            RunStatus::InProgress if run.id.is_empty() => Ok(Some(run)),
            RunStatus::InProgress => {
                let completed = self.wait_for_run(&run.id).await?;
                tracing::info!(
                    actor_id,
                    run_id = %completed.id,
                    dataset_id = completed.dataset_id().unwrap_or("-"),
                    "Run completed"
                );
                Ok(Some(completed))
            }
        }
    }

    /// Fetch dataset items from a completed run. Empty and hidden fields are
    /// dropped server-side (`clean=true`).
    pub async fn get_dataset_items<T: DeserializeOwned>(&self, dataset_id: &str) -> Result<Vec<T>> {
        let url = format!(
            "{}/datasets/{}/items?format=json&clean=true",
            self.base_url, dataset_id
        );
        let resp = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;

        let resp = check_status(resp).await?;
        let items: Vec<T> = resp.json().await?;
        Ok(items)
    }
}

/// Actor ids like `apify/instagram-scraper` are addressed as `apify~instagram-scraper`.
fn actor_path(actor_id: &str) -> String {
    actor_id.replace('/', "~")
}

async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(ApifyError::Api {
            status: status.as_u16(),
            message: body,
        });
    }
    Ok(resp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actor_path_uses_tilde_separator() {
        assert_eq!(actor_path("apify/instagram-scraper"), "apify~instagram-scraper");
        assert_eq!(actor_path("nH2AHrwxeTRJoN5hX"), "nH2AHrwxeTRJoN5hX");
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = ApifyClient::new("token".into()).with_base_url("http://localhost:8080/v2/");
        assert_eq!(client.base_url, "http://localhost:8080/v2");
    }

    #[test]
    fn run_failure_names_the_run() {
        let err = ApifyError::RunFailed {
            run_id: "abc".into(),
            status: "ABORTED".into(),
        };
        assert_eq!(err.to_string(), "Run abc finished with status ABORTED");
    }
}
