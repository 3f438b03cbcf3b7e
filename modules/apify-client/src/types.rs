use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

/// Wrapper for Apify API responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

/// Apify actor run metadata.
///
/// Actors disagree on where they report their output, so every location
/// that has been observed in the wild is kept as its own optional field.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RunData {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub status: String,
    #[serde(rename = "defaultDatasetId")]
    pub default_dataset_id: Option<String>,
    #[serde(rename = "default_dataset_id")]
    pub default_dataset_id_snake: Option<String>,
    #[serde(rename = "datasetId")]
    pub dataset_id: Option<String>,
    #[serde(rename = "outputDatasetId")]
    pub output_dataset_id: Option<String>,
    /// Records returned inline by the run itself.
    pub items: Option<Vec<Value>>,
    /// Free-form run output; some actors nest an `items` array here.
    pub output: Option<Value>,
    #[serde(rename = "startedAt")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(rename = "finishedAt")]
    pub finished_at: Option<DateTime<Utc>>,
}

impl RunData {
    /// First non-empty dataset id, checked in canonical-first order.
    pub fn dataset_id(&self) -> Option<&str> {
        [
            &self.default_dataset_id,
            &self.default_dataset_id_snake,
            &self.dataset_id,
            &self.output_dataset_id,
        ]
        .into_iter()
        .filter_map(|id| id.as_deref())
        .find(|id| !id.is_empty())
    }

    pub fn run_status(&self) -> RunStatus {
        RunStatus::from_api(&self.status)
    }
}

/// Coarse lifecycle of an actor run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Succeeded,
    Failed,
    InProgress,
}

impl RunStatus {
    pub fn from_api(status: &str) -> Self {
        match status {
            "SUCCEEDED" => RunStatus::Succeeded,
            "FAILED" | "ABORTED" | "TIMED-OUT" => RunStatus::Failed,
            _ => RunStatus::InProgress,
        }
    }
}
