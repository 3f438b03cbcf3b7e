// Test doubles for the dispatch layer.
//
// - MockRunner (ActorRunner): per-actor queue of canned runs, dataset map,
//   and a log of every call it received
// - FixedSessions (SessionIdGenerator): always the same session token
//
// Plus constructors for the RunData shapes actors come back with.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use apify_client::{ApifyError, RunData};
use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::invoker::ActorRunner;
use crate::proxy::SessionIdGenerator;

// ---------------------------------------------------------------------------
// MockRunner
// ---------------------------------------------------------------------------

enum Canned {
    Run(Option<RunData>),
    Fail(ApifyError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub actor_id: String,
    pub input: Map<String, Value>,
}

/// Replays queued responses per actor id, in order. Once an actor's queue is
/// drained it answers with no run data. Unregistered datasets are a 404.
pub struct MockRunner {
    runs: Mutex<HashMap<String, VecDeque<Canned>>>,
    datasets: HashMap<String, Vec<Value>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockRunner {
    pub fn new() -> Self {
        Self {
            runs: Mutex::new(HashMap::new()),
            datasets: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn push(self, actor_id: &str, canned: Canned) -> Self {
        self.runs
            .lock()
            .unwrap()
            .entry(actor_id.to_string())
            .or_default()
            .push_back(canned);
        self
    }

    pub fn on_run(self, actor_id: &str, run: RunData) -> Self {
        self.push(actor_id, Canned::Run(Some(run)))
    }

    pub fn on_null_run(self, actor_id: &str) -> Self {
        self.push(actor_id, Canned::Run(None))
    }

    pub fn on_failure(self, actor_id: &str, error: ApifyError) -> Self {
        self.push(actor_id, Canned::Fail(error))
    }

    pub fn on_dataset(mut self, dataset_id: &str, items: Vec<Value>) -> Self {
        self.datasets.insert(dataset_id.to_string(), items);
        self
    }

    /// Every call received so far, in arrival order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_for(&self, actor_id: &str) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|call| call.actor_id == actor_id)
            .collect()
    }
}

impl Default for MockRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ActorRunner for MockRunner {
    async fn call_actor(
        &self,
        actor_id: &str,
        input: &Map<String, Value>,
    ) -> apify_client::Result<Option<RunData>> {
        self.calls.lock().unwrap().push(RecordedCall {
            actor_id: actor_id.to_string(),
            input: input.clone(),
        });

        let next = self
            .runs
            .lock()
            .unwrap()
            .get_mut(actor_id)
            .and_then(VecDeque::pop_front);

        match next {
            Some(Canned::Run(run)) => Ok(run),
            Some(Canned::Fail(error)) => Err(error),
            None => Ok(None),
        }
    }

    async fn dataset_items(&self, dataset_id: &str) -> apify_client::Result<Vec<Value>> {
        self.datasets
            .get(dataset_id)
            .cloned()
            .ok_or_else(|| ApifyError::Api {
                status: 404,
                message: format!("MockRunner: no dataset registered for {dataset_id}"),
            })
    }
}

// ---------------------------------------------------------------------------
// FixedSessions
// ---------------------------------------------------------------------------

pub struct FixedSessions(String);

impl FixedSessions {
    pub fn new(token: &str) -> Self {
        Self(token.to_string())
    }
}

impl SessionIdGenerator for FixedSessions {
    fn next_id(&self) -> String {
        self.0.clone()
    }
}

// ---------------------------------------------------------------------------
// RunData shapes
// ---------------------------------------------------------------------------

fn succeeded() -> RunData {
    RunData {
        id: "run-test".to_string(),
        status: "SUCCEEDED".to_string(),
        ..RunData::default()
    }
}

/// A run whose records live in `dataset_id`.
pub fn dataset_run(dataset_id: &str) -> RunData {
    RunData {
        default_dataset_id: Some(dataset_id.to_string()),
        ..succeeded()
    }
}

/// A run that carries its records inline.
pub fn inline_run(items: Vec<Value>) -> RunData {
    RunData {
        items: Some(items),
        ..succeeded()
    }
}

/// A run with a free-form `output` value.
pub fn output_run(output: Value) -> RunData {
    RunData {
        output: Some(output),
        ..succeeded()
    }
}
