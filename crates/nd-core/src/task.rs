//! Research tasks and their status machine.

use serde::{Deserialize, Serialize};

use crate::article::Article;
use crate::settings::BusinessField;

/// Lifecycle of a research task: `Pending → InProgress → Completed | Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
}

impl TaskStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Failed)
    }
}

/// One field-scoped unit of research work.
///
/// Created by the research leader, ordered and batched by the planner,
/// executed by an assistant. Transitions are consuming so that status
/// changes are explicit and a task can never silently skip a state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchTask {
    pub id: String,
    pub field: BusinessField,
    pub keywords: Vec<String>,
    pub status: TaskStatus,
    /// Articles attached when the task completes; empty before that.
    #[serde(default)]
    pub results: Vec<Article>,
}

impl ResearchTask {
    pub fn new(id: impl Into<String>, field: BusinessField, keywords: Vec<String>) -> Self {
        Self {
            id: id.into(),
            field,
            keywords,
            status: TaskStatus::Pending,
            results: Vec::new(),
        }
    }

    /// Mark the task as picked up by a worker.
    pub fn start(mut self) -> Self {
        self.status = TaskStatus::InProgress;
        self
    }

    /// Attach results and mark the task completed.
    pub fn complete(mut self, results: Vec<Article>) -> Self {
        self.status = TaskStatus::Completed;
        self.results = results;
        self
    }

    /// Mark the task failed; any partial results are discarded.
    pub fn fail(mut self) -> Self {
        self.status = TaskStatus::Failed;
        self.results = Vec::new();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_transitions() {
        let task = ResearchTask::new("task-hpc", BusinessField::Hpc, vec!["quantum".into()]);
        assert_eq!(task.status, TaskStatus::Pending);

        let task = task.start();
        assert_eq!(task.status, TaskStatus::InProgress);

        let task = task.complete(Vec::new());
        assert_eq!(task.status, TaskStatus::Completed);
        assert!(task.status.is_terminal());
    }

    #[test]
    fn test_fail_discards_results() {
        let task = ResearchTask::new("task-btc", BusinessField::Bitcoin, vec![])
            .start()
            .fail();
        assert_eq!(task.status, TaskStatus::Failed);
        assert!(task.results.is_empty());
    }

    #[test]
    fn test_pending_is_not_terminal() {
        assert!(!TaskStatus::Pending.is_terminal());
        assert!(!TaskStatus::InProgress.is_terminal());
        assert!(TaskStatus::Failed.is_terminal());
    }
}
