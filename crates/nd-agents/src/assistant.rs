//! Research assistants: the worker pool that executes tasks against the
//! external search provider, with bounded retry and a per-task deadline.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::sync::Semaphore;
use tokio::time::timeout;
use tracing::{debug, warn};

use nd_core::settings::ResearchSettings;
use nd_core::{Article, Error, ResearchTask, SearchProvider};

/// Retries allowed after the first failed provider call.
const MAX_RETRIES: u32 = 3;

/// A single pooled worker.
pub struct ResearchAssistantAgent {
    name: String,
    provider: Arc<dyn SearchProvider>,
    auto_retry: bool,
    task_timeout: Duration,
}

impl ResearchAssistantAgent {
    pub fn new(
        name: impl Into<String>,
        provider: Arc<dyn SearchProvider>,
        auto_retry: bool,
        task_timeout: Duration,
    ) -> Self {
        Self {
            name: name.into(),
            provider,
            auto_retry,
            task_timeout,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Execute one research task. A slow provider call is cut off at the
    /// task deadline and counts as a retryable failure. Retry state is a
    /// local of this invocation, so concurrent calls on the same worker
    /// cannot interfere with each other.
    pub async fn perform_research(&self, task: &ResearchTask) -> Result<Vec<Article>, Error> {
        let mut attempts: u32 = 0;
        loop {
            attempts += 1;
            let outcome = match timeout(self.task_timeout, self.provider.search(task)).await {
                Ok(result) => result,
                Err(_) => Err(Error::timeout(format!(
                    "provider call for '{}' exceeded {}s",
                    task.id,
                    self.task_timeout.as_secs()
                ))),
            };

            match outcome {
                Ok(articles) => {
                    debug!(
                        worker = %self.name,
                        task = %task.id,
                        articles = articles.len(),
                        attempts,
                        "research task finished"
                    );
                    return Ok(articles);
                }
                Err(err) => {
                    if !(self.auto_retry && err.is_retryable() && attempts <= MAX_RETRIES) {
                        return Err(Error::research(&task.id, err.to_string()));
                    }
                    debug!(
                        worker = %self.name,
                        task = %task.id,
                        attempt = attempts,
                        error = %err,
                        "provider call failed; retrying"
                    );
                }
            }
        }
    }
}

/// The outcome of one task run: the task in its terminal state (results
/// attached on completion) and the error when it failed.
pub struct TaskOutcome {
    pub task: ResearchTask,
    pub error: Option<Error>,
}

/// Fixed-size worker pool. Tasks in a batch are assigned round-robin by
/// index; a semaphore sized to the pool bounds concurrency, so a batch
/// larger than the pool queues instead of oversubscribing workers.
pub struct AssistantPool {
    workers: Vec<Arc<ResearchAssistantAgent>>,
    permits: Arc<Semaphore>,
}

impl AssistantPool {
    pub fn new(provider: Arc<dyn SearchProvider>, settings: &ResearchSettings) -> Self {
        let size = settings.pool_size.max(1);
        let workers = (0..size)
            .map(|i| {
                Arc::new(ResearchAssistantAgent::new(
                    format!("assistant-{}", i + 1),
                    Arc::clone(&provider),
                    settings.auto_retry,
                    Duration::from_secs(settings.task_timeout_secs),
                ))
            })
            .collect();
        Self {
            workers,
            permits: Arc::new(Semaphore::new(size)),
        }
    }

    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// Run one batch: every task dispatched concurrently, outcomes returned
    /// in input order. A task failure never aborts the batch.
    pub async fn run_batch(&self, batch: Vec<ResearchTask>) -> Vec<TaskOutcome> {
        let runs = batch.into_iter().enumerate().map(|(index, task)| {
            let worker = Arc::clone(&self.workers[index % self.workers.len()]);
            let permits = Arc::clone(&self.permits);
            async move {
                let permit = match permits.acquire().await {
                    Ok(permit) => permit,
                    Err(_) => {
                        return TaskOutcome {
                            error: Some(Error::research(&task.id, "worker pool shut down")),
                            task: task.fail(),
                        };
                    }
                };
                let task = task.start();
                let outcome = match worker.perform_research(&task).await {
                    Ok(articles) => TaskOutcome {
                        task: task.complete(articles),
                        error: None,
                    },
                    Err(err) => {
                        warn!(
                            worker = worker.name(),
                            task = %task.id,
                            error = %err,
                            "research task failed"
                        );
                        TaskOutcome {
                            task: task.fail(),
                            error: Some(err),
                        }
                    }
                };
                drop(permit);
                outcome
            }
        });
        join_all(runs).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use nd_core::testing::{sample_article, MockSearchProvider};
    use nd_core::{BusinessField, TaskStatus};

    fn task(id: &str) -> ResearchTask {
        ResearchTask::new(id, BusinessField::Hpc, vec!["quantum".to_string()])
    }

    fn agent(provider: Arc<MockSearchProvider>, auto_retry: bool) -> ResearchAssistantAgent {
        ResearchAssistantAgent::new(
            "assistant-1",
            provider as Arc<dyn SearchProvider>,
            auto_retry,
            Duration::from_secs(5),
        )
    }

    #[tokio::test]
    async fn test_success_after_transient_failures() {
        let provider = Arc::new(MockSearchProvider::new());
        provider.script_for(
            "task-1",
            vec![
                Err(Error::provider("connection reset")),
                Err(Error::rate_limit("slow down")),
                Ok(vec![sample_article("a-1", BusinessField::Hpc, "quantum")]),
            ],
        );

        let articles = agent(Arc::clone(&provider), true)
            .perform_research(&task("task-1"))
            .await
            .unwrap();
        assert_eq!(articles.len(), 1);
        assert_eq!(provider.request_count(), 3);
    }

    #[tokio::test]
    async fn test_retry_bound_is_three_retries() {
        let provider = Arc::new(MockSearchProvider::new());
        provider.script_for(
            "task-1",
            vec![
                Err(Error::provider("down")),
                Err(Error::provider("down")),
                Err(Error::provider("down")),
                Err(Error::provider("down")),
                Ok(vec![]),
            ],
        );

        let err = agent(Arc::clone(&provider), true)
            .perform_research(&task("task-1"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Research { .. }));
        // Initial attempt plus three retries, never the queued fifth response.
        assert_eq!(provider.request_count(), 4);
    }

    #[tokio::test]
    async fn test_no_retry_when_auto_retry_disabled() {
        let provider = Arc::new(MockSearchProvider::new());
        provider.script_for("task-1", vec![Err(Error::provider("down")), Ok(vec![])]);

        let err = agent(Arc::clone(&provider), false)
            .perform_research(&task("task-1"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Research { .. }));
        assert_eq!(provider.request_count(), 1);
    }

    #[tokio::test]
    async fn test_non_retryable_error_fails_immediately() {
        let provider = Arc::new(MockSearchProvider::new());
        provider.script_for("task-1", vec![Err(Error::config("bad credentials"))]);

        let err = agent(Arc::clone(&provider), true)
            .perform_research(&task("task-1"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Research { .. }));
        assert_eq!(provider.request_count(), 1);
    }

    struct HangingProvider;

    #[async_trait]
    impl SearchProvider for HangingProvider {
        fn name(&self) -> &str {
            "hanging"
        }

        async fn search(&self, _task: &ResearchTask) -> Result<Vec<Article>, Error> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(Vec::new())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_hung_provider_call_times_out() {
        let assistant = ResearchAssistantAgent::new(
            "assistant-1",
            Arc::new(HangingProvider),
            false,
            Duration::from_millis(50),
        );
        let err = assistant.perform_research(&task("task-1")).await.unwrap_err();
        assert!(err.to_string().contains("task-1"));
    }

    #[tokio::test]
    async fn test_batch_outcomes_preserve_input_order_and_statuses() {
        let provider = Arc::new(MockSearchProvider::new());
        provider.script_for(
            "task-ok",
            vec![Ok(vec![sample_article("a-1", BusinessField::Hpc, "quantum")])],
        );
        provider.script_for(
            "task-bad",
            vec![
                Err(Error::provider("down")),
                Err(Error::provider("down")),
                Err(Error::provider("down")),
                Err(Error::provider("down")),
            ],
        );

        let pool = AssistantPool::new(
            Arc::clone(&provider) as Arc<dyn SearchProvider>,
            &ResearchSettings {
                task_timeout_secs: 5,
                ..ResearchSettings::default()
            },
        );

        let outcomes = pool.run_batch(vec![task("task-ok"), task("task-bad")]).await;
        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].task.id, "task-ok");
        assert_eq!(outcomes[0].task.status, TaskStatus::Completed);
        assert_eq!(outcomes[0].task.results.len(), 1);
        assert!(outcomes[0].error.is_none());

        assert_eq!(outcomes[1].task.id, "task-bad");
        assert_eq!(outcomes[1].task.status, TaskStatus::Failed);
        assert!(outcomes[1].task.results.is_empty());
        assert!(outcomes[1].error.is_some());
    }

    #[tokio::test]
    async fn test_oversubscribed_batch_completes() {
        let provider = Arc::new(MockSearchProvider::new());
        for i in 0..5 {
            provider.script_for(&format!("task-{i}"), vec![Ok(vec![])]);
        }

        let pool = AssistantPool::new(
            Arc::clone(&provider) as Arc<dyn SearchProvider>,
            &ResearchSettings {
                pool_size: 2,
                task_timeout_secs: 5,
                ..ResearchSettings::default()
            },
        );
        assert_eq!(pool.size(), 2);

        let batch: Vec<ResearchTask> = (0..5).map(|i| task(&format!("task-{i}"))).collect();
        let outcomes = pool.run_batch(batch).await;
        assert_eq!(outcomes.len(), 5);
        assert!(outcomes
            .iter()
            .all(|o| o.task.status == TaskStatus::Completed));
    }
}
