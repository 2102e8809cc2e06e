//! Task model for the ROI tracker.
//!
//! A `Task` is always well-formed: positive revenue, positive hours, a
//! non-empty title. Loosely-typed input goes through `crate::normalize` first.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Revenue substituted when a record has none (or a non-positive one).
pub const DEFAULT_REVENUE: f64 = 100.0;

/// Hours substituted when a record has none; also the floor on every mutation.
pub const DEFAULT_TIME_TAKEN: f64 = 1.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    #[default]
    Todo,
    #[serde(rename = "In Progress")]
    InProgress,
    Done,
}

impl TaskStatus {
    /// Lenient parse used by raw input and the CLI.
    pub fn parse(s: &str) -> Option<Self> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "todo" => Some(TaskStatus::Todo),
            "inprogress" => Some(TaskStatus::InProgress),
            "done" => Some(TaskStatus::Done),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "Todo",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Done => "Done",
        }
    }
}

/// Ordering matters: `High` compares greatest.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Priority::Low),
            "medium" | "med" => Some(Priority::Medium),
            "high" => Some(Priority::High),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }
}

/// Canonical task record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,

    /// Always > 0.
    pub revenue: f64,

    /// Hours. Always > 0.
    pub time_taken: f64,

    pub priority: Priority,
    pub status: TaskStatus,

    #[serde(default)]
    pub notes: String,

    pub created_at: DateTime<Utc>,

    /// Set the first time the task reaches Done. Reverting status keeps it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            revenue: DEFAULT_REVENUE,
            time_taken: DEFAULT_TIME_TAKEN,
            priority: Priority::default(),
            status: TaskStatus::default(),
            notes: String::new(),
            created_at,
            completed_at: None,
        }
    }

    pub fn with_revenue(mut self, revenue: f64) -> Self {
        self.revenue = positive_or(revenue, DEFAULT_REVENUE);
        self
    }

    pub fn with_time_taken(mut self, hours: f64) -> Self {
        self.time_taken = positive_or(hours, DEFAULT_TIME_TAKEN);
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    pub fn is_done(&self) -> bool {
        self.status == TaskStatus::Done
    }
}

/// `value` if it is a finite number greater than zero, otherwise `fallback`.
pub fn positive_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        fallback
    }
}

/// Fresh unique task id.
pub fn new_task_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
