//! Task definition and status.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Task status.
///
/// Starts at [`TaskStatus::Pending`]; after creation only the worker writes
/// it. The queue does not persist transitions back to any store, so the
/// authoritative lifecycle lives in logs and notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    /// Waiting in queue.
    Pending,
    /// Currently being processed.
    InProgress,
    /// Completed successfully.
    Completed,
    /// Execution failed or timed out.
    Failed,
}

impl TaskStatus {
    /// Wire representation, identical to the serde rendering.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Completed => "completed",
            TaskStatus::Failed => "failed",
        }
    }
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::Pending
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A task flowing through the pipeline.
///
/// Created by the producer, serialized into the queue as an opaque payload,
/// dequeued exactly once by a worker under normal operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique task ID, assigned at creation, immutable afterwards.
    pub id: Uuid,
    /// Free-form caller-supplied title.
    pub title: String,
    /// Current status.
    pub status: TaskStatus,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Create a new pending task with a fresh random ID.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            status: TaskStatus::Pending,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_task_new() {
        let task = Task::new("build report");
        assert_eq!(task.title, "build report");
        assert_eq!(task.status, TaskStatus::Pending);
        assert!(!task.id.is_nil());
    }

    #[test]
    fn test_ids_unique_across_creations() {
        let ids: HashSet<Uuid> = (0..100).map(|_| Task::new("t").id).collect();
        assert_eq!(ids.len(), 100);
    }

    #[test]
    fn test_status_wire_strings() {
        assert_eq!(
            serde_json::to_string(&TaskStatus::InProgress).unwrap(),
            "\"in-progress\""
        );
        assert_eq!(
            serde_json::to_string(&TaskStatus::Pending).unwrap(),
            "\"pending\""
        );
        let status: TaskStatus = serde_json::from_str("\"failed\"").unwrap();
        assert_eq!(status, TaskStatus::Failed);
    }

    #[test]
    fn test_status_display_matches_serde() {
        for status in [
            TaskStatus::Pending,
            TaskStatus::InProgress,
            TaskStatus::Completed,
            TaskStatus::Failed,
        ] {
            let wire = serde_json::to_string(&status).unwrap();
            assert_eq!(wire, format!("\"{}\"", status));
        }
    }

    #[test]
    fn test_task_round_trip() {
        let task = Task::new("round trip");
        let json = serde_json::to_vec(&task).unwrap();
        let back: Task = serde_json::from_slice(&json).unwrap();
        assert_eq!(back, task);
    }

    #[test]
    fn test_unknown_status_rejected() {
        let result = serde_json::from_str::<TaskStatus>("\"paused\"");
        assert!(result.is_err());
    }
}
