//! Normalizer: raw candidates -> well-formed `Task`s.
//!
//! Never fails. Bad or missing values are replaced with defaults:
//! - id: fresh UUID (also for duplicates within the batch)
//! - title: "Untitled Task {n}" (1-based)
//! - revenue / timeTaken: 100 / 1 unless a finite positive number
//! - createdAt: now - (index + 1) days, strictly decreasing across the batch
//! - completedAt: explicit value, else createdAt + 1 day for Done tasks
//!
//! Date arithmetic is checked. At the edge of chrono's range the synthesized
//! createdAt falls back to `now` and completedAt to createdAt.

use crate::raw::{RawField, RawTask};
use crate::task::{
    new_task_id, Priority, Task, TaskStatus, DEFAULT_REVENUE, DEFAULT_TIME_TAKEN,
};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashSet;
use tracing::debug;

/// Title used when a candidate has none.
pub fn untitled(index: usize) -> String {
    format!("Untitled Task {}", index + 1)
}

fn positive_field(field: &RawField, fallback: f64, name: &str, index: usize) -> f64 {
    match field.as_number() {
        Some(n) if n.is_finite() && n > 0.0 => n,
        _ => {
            if !field.is_missing() {
                debug!(index, field = name, "non-positive or malformed value defaulted");
            }
            fallback
        }
    }
}

/// Normalize one candidate at `index` of its batch.
pub fn normalize_one(raw: &RawTask, index: usize, now: DateTime<Utc>) -> Task {
    let id = raw.id.as_text().unwrap_or_else(new_task_id);
    let title = raw.title.as_text().unwrap_or_else(|| untitled(index));

    let revenue = positive_field(&raw.revenue, DEFAULT_REVENUE, "revenue", index);
    let time_taken = positive_field(&raw.time_taken, DEFAULT_TIME_TAKEN, "timeTaken", index);

    let priority = match &raw.priority.as_text() {
        Some(s) => Priority::parse(s).unwrap_or_default(),
        None => Priority::default(),
    };
    let status = match &raw.status.as_text() {
        Some(s) => TaskStatus::parse(s).unwrap_or_default(),
        None => TaskStatus::default(),
    };

    let created_at = raw
        .created_at
        .as_timestamp()
        .unwrap_or_else(|| {
            now.checked_sub_signed(Duration::days(index as i64 + 1))
                .unwrap_or(now)
        });

    let completed_at = raw.completed_at.as_timestamp().or_else(|| {
        (status == TaskStatus::Done).then(|| {
            created_at
                .checked_add_signed(Duration::days(1))
                .unwrap_or(created_at)
        })
    });

    let notes = match &raw.notes {
        RawField::Text(s) => s.clone(),
        _ => String::new(),
    };

    Task {
        id,
        title,
        revenue,
        time_taken,
        priority,
        status,
        notes,
        created_at,
        completed_at,
    }
}

/// Normalize a batch. Output has the same length and order as the input, and
/// ids are unique within it.
pub fn normalize(raw: &[RawTask], now: DateTime<Utc>) -> Vec<Task> {
    let mut seen: HashSet<String> = HashSet::with_capacity(raw.len());
    raw.iter()
        .enumerate()
        .map(|(i, r)| {
            let mut task = normalize_one(r, i, now);
            if !seen.insert(task.id.clone()) {
                debug!(id = %task.id, index = i, "duplicate id replaced");
                task.id = new_task_id();
                seen.insert(task.id.clone());
            }
            task
        })
        .collect()
}
