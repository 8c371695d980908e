//! Test utilities shared across the workspace.
//! Only compiled when running tests or with the `testing` feature.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use crate::article::{Article, RelevanceScores};
use crate::error::Error;
use crate::provider::{SearchProvider, SemanticIndex};
use crate::settings::BusinessField;
use crate::task::ResearchTask;

/// Fixed reference instant used by test fixtures.
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
}

/// Build a minimal article for tests.
pub fn sample_article(id: &str, field: BusinessField, content: &str) -> Article {
    Article {
        id: id.to_string(),
        title: format!("Article {id}"),
        content: content.to_string(),
        source: "Test Wire".to_string(),
        source_url: format!("https://example.com/{id}"),
        publication_date: fixed_now(),
        image_url: None,
        scores: RelevanceScores::default(),
        field,
        key_innovations: Vec::new(),
        actionable_insights: vec![format!("Follow up on {id}")],
    }
}

/// A mock search provider with pre-configured responses.
///
/// Responses come from two places: a per-task script (keyed by task id,
/// checked first, so concurrent tasks cannot steal each other's responses)
/// and a global FIFO queue for single-task tests.
pub struct MockSearchProvider {
    queue: Mutex<Vec<Result<Vec<Article>, Error>>>,
    scripts: Mutex<HashMap<String, Vec<Result<Vec<Article>, Error>>>>,
    /// Captured tasks (for assertion).
    pub captured_tasks: Mutex<Vec<ResearchTask>>,
}

impl MockSearchProvider {
    pub fn new() -> Self {
        Self {
            queue: Mutex::new(Vec::new()),
            scripts: Mutex::new(HashMap::new()),
            captured_tasks: Mutex::new(Vec::new()),
        }
    }

    /// Queue articles to be returned by the next unscripted `search` call.
    /// Responses are returned in FIFO order (first queued = first returned).
    pub fn queue_articles(&self, articles: Vec<Article>) {
        self.queue.lock().unwrap().insert(0, Ok(articles));
    }

    /// Queue a failure for the next unscripted `search` call.
    pub fn queue_failure(&self, error: Error) {
        self.queue.lock().unwrap().insert(0, Err(error));
    }

    /// Script the responses for a specific task id, FIFO.
    pub fn script_for(&self, task_id: &str, responses: Vec<Result<Vec<Article>, Error>>) {
        let mut fifo = responses;
        fifo.reverse();
        self.scripts.lock().unwrap().insert(task_id.to_string(), fifo);
    }

    /// Number of `search` calls observed so far.
    pub fn request_count(&self) -> usize {
        self.captured_tasks.lock().unwrap().len()
    }

    pub fn last_task(&self) -> Option<ResearchTask> {
        self.captured_tasks.lock().unwrap().last().cloned()
    }
}

impl Default for MockSearchProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SearchProvider for MockSearchProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn search(&self, task: &ResearchTask) -> Result<Vec<Article>, Error> {
        self.captured_tasks.lock().unwrap().push(task.clone());

        if let Some(script) = self.scripts.lock().unwrap().get_mut(&task.id) {
            return match script.pop() {
                Some(response) => response,
                None => Err(Error::Unknown(format!(
                    "script for task '{}' exhausted",
                    task.id
                ))),
            };
        }

        match self.queue.lock().unwrap().pop() {
            Some(response) => response,
            None => Err(Error::Unknown("no mock response queued".to_string())),
        }
    }
}

/// A mock semantic index with queued refinements.
pub struct MockSemanticIndex {
    responses: Mutex<Vec<Result<Vec<String>, Error>>>,
    pub captured: Mutex<Vec<(BusinessField, Vec<String>)>>,
}

impl MockSemanticIndex {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(Vec::new()),
            captured: Mutex::new(Vec::new()),
        }
    }

    /// Queue a refinement result (FIFO).
    pub fn queue_refinement(&self, keywords: Vec<String>) {
        self.responses.lock().unwrap().insert(0, Ok(keywords));
    }

    pub fn queue_failure(&self, error: Error) {
        self.responses.lock().unwrap().insert(0, Err(error));
    }

    pub fn call_count(&self) -> usize {
        self.captured.lock().unwrap().len()
    }
}

impl Default for MockSemanticIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SemanticIndex for MockSemanticIndex {
    fn name(&self) -> &str {
        "mock-index"
    }

    async fn refine_keywords(
        &self,
        field: BusinessField,
        base: &[String],
    ) -> Result<Vec<String>, Error> {
        self.captured
            .lock()
            .unwrap()
            .push((field, base.to_vec()));
        match self.responses.lock().unwrap().pop() {
            Some(response) => response,
            None => Err(Error::Unknown("no mock refinement queued".to_string())),
        }
    }
}
