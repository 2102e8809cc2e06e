//! TaskStore - the single owner of the task collection.
//!
//! Holds the canonical `Vec<Task>`, the one-slot undo buffer, and the loading
//! flags. Every committed change recomputes the derived view before the call
//! returns, so readers never see a stale or half-applied snapshot.
//!
//! Mutations never fail: bad values fall back to defaults and unknown ids are
//! ignored.

use crate::derive::{DerivedTask, DerivedView};
use crate::load::LoadState;
use crate::metrics::Metrics;
use crate::normalize::untitled;
use crate::task::{
    new_task_id, positive_or, Priority, Task, TaskStatus, DEFAULT_REVENUE, DEFAULT_TIME_TAKEN,
};
use crate::time::{Clock, SystemClock};
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Input for `TaskStore::add`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewTask {
    /// Kept when present and not already taken.
    pub id: Option<String>,
    pub title: String,
    pub revenue: f64,
    pub time_taken: f64,
    pub priority: Priority,
    pub status: TaskStatus,
    pub notes: String,
}

impl NewTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            revenue: DEFAULT_REVENUE,
            time_taken: DEFAULT_TIME_TAKEN,
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_revenue(mut self, revenue: f64) -> Self {
        self.revenue = revenue;
        self
    }

    pub fn with_time_taken(mut self, hours: f64) -> Self {
        self.time_taken = hours;
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
}

/// Partial update for `TaskStore::update`. `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub revenue: Option<f64>,
    pub time_taken: Option<f64>,
    pub priority: Option<Priority>,
    pub status: Option<TaskStatus>,
    pub notes: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl TaskPatch {
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}

#[derive(Debug)]
pub struct TaskStore<C: Clock = SystemClock> {
    clock: C,
    tasks: Vec<Task>,
    last_deleted: Option<Task>,
    pub(crate) loading: bool,
    pub(crate) error: Option<String>,
    pub(crate) load_state: LoadState,
    pub(crate) mounted: Arc<AtomicBool>,
    view: DerivedView,
}

impl TaskStore<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for TaskStore<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> TaskStore<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            tasks: Vec::new(),
            last_deleted: None,
            loading: false,
            error: None,
            load_state: LoadState::NotStarted,
            mounted: Arc::new(AtomicBool::new(true)),
            view: DerivedView::default(),
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn load_state(&self) -> LoadState {
        self.load_state
    }

    /// Tasks in display order with their computed fields.
    pub fn derived_sorted(&self) -> &[DerivedTask] {
        &self.view.sorted
    }

    pub fn metrics(&self) -> &Metrics {
        &self.view.metrics
    }

    pub fn last_deleted(&self) -> Option<&Task> {
        self.last_deleted.as_ref()
    }

    pub(crate) fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::SeqCst)
    }

    /// Swap in a whole new collection (initial load).
    pub(crate) fn replace_tasks(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
        self.commit();
    }

    fn commit(&mut self) {
        self.view = DerivedView::compute(&self.tasks);
    }

    fn id_taken(&self, id: &str) -> bool {
        self.tasks.iter().any(|t| t.id == id)
    }

    /// Append a new task stamped with the current time. Returns its id.
    pub fn add(&mut self, new: NewTask) -> String {
        let now = self.clock.now();

        let id = match new.id {
            Some(id) if !id.trim().is_empty() && !self.id_taken(&id) => id,
            Some(id) => {
                debug!(%id, "requested id unusable; generating one");
                new_task_id()
            }
            None => new_task_id(),
        };
        let title = match new.title.trim() {
            "" => untitled(self.tasks.len()),
            t => t.to_string(),
        };

        let task = Task {
            id: id.clone(),
            title,
            revenue: positive_or(new.revenue, DEFAULT_REVENUE),
            time_taken: positive_or(new.time_taken, DEFAULT_TIME_TAKEN),
            priority: new.priority,
            status: new.status,
            notes: new.notes,
            created_at: now,
            completed_at: (new.status == TaskStatus::Done).then_some(now),
        };

        self.tasks.push(task);
        self.commit();
        id
    }

    /// Merge `patch` into task `id`. Returns false (and changes nothing) when
    /// the id is unknown.
    pub fn update(&mut self, id: &str, patch: TaskPatch) -> bool {
        let now = self.clock.now();
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            debug!(%id, "update for unknown task ignored");
            return false;
        };

        let was_done = task.is_done();

        if let Some(title) = patch.title {
            if title.trim().is_empty() {
                debug!(%id, "blank title in patch ignored");
            } else {
                task.title = title.trim().to_string();
            }
        }
        if let Some(revenue) = patch.revenue {
            task.revenue = revenue;
        }
        if let Some(hours) = patch.time_taken {
            task.time_taken = hours;
        }
        if let Some(priority) = patch.priority {
            task.priority = priority;
        }
        if let Some(status) = patch.status {
            task.status = status;
        }
        if let Some(notes) = patch.notes {
            task.notes = notes;
        }

        match patch.completed_at {
            Some(at) => task.completed_at = Some(at),
            None if !was_done && task.is_done() => task.completed_at = Some(now),
            None => {}
        }

        task.time_taken = positive_or(task.time_taken, DEFAULT_TIME_TAKEN);
        task.revenue = positive_or(task.revenue, DEFAULT_REVENUE);

        self.commit();
        true
    }

    /// Remove task `id`, keeping it as the single undo candidate.
    pub fn delete(&mut self, id: &str) -> Option<Task> {
        let Some(pos) = self.tasks.iter().position(|t| t.id == id) else {
            debug!(%id, "delete for unknown task ignored");
            return None;
        };
        let removed = self.tasks.remove(pos);
        self.last_deleted = Some(removed.clone());
        self.commit();
        Some(removed)
    }

    /// Re-append the last deleted task (at the end, not its old position).
    /// Returns its id, or None when there is nothing to undo.
    pub fn undo_delete(&mut self) -> Option<String> {
        let mut task = self.last_deleted.take()?;
        if self.id_taken(&task.id) {
            debug!(id = %task.id, "id reused since delete; restoring under a fresh id");
            task.id = new_task_id();
        }
        let id = task.id.clone();
        self.tasks.push(task);
        self.commit();
        Some(id)
    }
}

impl<C: Clock> Drop for TaskStore<C> {
    fn drop(&mut self) {
        self.mounted.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::PerformanceGrade;
    use crate::time::ManualClock;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap()
    }

    fn store(clock: &ManualClock) -> TaskStore<&ManualClock> {
        TaskStore::with_clock(clock)
    }

    #[test]
    fn test_add_stamps_and_floors() {
        let clock = ManualClock::new(t0());
        let mut s = store(&clock);

        let id = s.add(NewTask::new("Call").with_revenue(500.0).with_time_taken(0.0));
        let t = s.get(&id).unwrap();
        assert_eq!(t.time_taken, 1.0);
        assert_eq!(t.created_at, t0());
        assert_eq!(t.completed_at, None);

        let id = s.add(NewTask::new("  ").with_status(TaskStatus::Done).with_revenue(-1.0));
        let t = s.get(&id).unwrap();
        assert_eq!(t.title, "Untitled Task 2");
        assert_eq!(t.revenue, DEFAULT_REVENUE);
        assert_eq!(t.completed_at, Some(t0()));
        assert_eq!(s.tasks().len(), 2);
    }

    #[test]
    fn test_add_keeps_free_ids_and_replaces_taken_ones() {
        let clock = ManualClock::new(t0());
        let mut s = store(&clock);
        assert_eq!(s.add(NewTask::new("a").with_id("x")), "x");
        let second = s.add(NewTask::new("b").with_id("x"));
        assert_ne!(second, "x");
        assert!(!s.add(NewTask::default()).is_empty());
    }

    #[test]
    fn test_done_transition_stamps_once() {
        let clock = ManualClock::new(t0());
        let mut s = store(&clock);
        let id = s.add(NewTask::new("Deal"));

        clock.advance(Duration::hours(2));
        assert!(s.update(&id, TaskPatch::status(TaskStatus::Done)));
        let first = s.get(&id).unwrap().completed_at;
        assert_eq!(first, Some(t0() + Duration::hours(2)));

        clock.advance(Duration::hours(5));
        assert!(s.update(&id, TaskPatch::status(TaskStatus::Done)));
        assert_eq!(s.get(&id).unwrap().completed_at, first);
    }

    #[test]
    fn test_reverting_from_done_keeps_completed_at() {
        let clock = ManualClock::new(t0());
        let mut s = store(&clock);
        let id = s.add(NewTask::new("Deal").with_status(TaskStatus::Done));
        s.update(&id, TaskPatch::status(TaskStatus::Todo));
        let t = s.get(&id).unwrap();
        assert_eq!(t.status, TaskStatus::Todo);
        assert_eq!(t.completed_at, Some(t0()));
    }

    #[test]
    fn test_explicit_completed_at_wins() {
        let clock = ManualClock::new(t0());
        let mut s = store(&clock);
        let id = s.add(NewTask::new("Deal"));
        let at = t0() - Duration::days(1);
        s.update(
            &id,
            TaskPatch {
                status: Some(TaskStatus::Done),
                completed_at: Some(at),
                ..TaskPatch::default()
            },
        );
        assert_eq!(s.get(&id).unwrap().completed_at, Some(at));
    }

    #[test]
    fn test_update_refloors_and_ignores_blank_title() {
        let clock = ManualClock::new(t0());
        let mut s = store(&clock);
        let id = s.add(NewTask::new("Keep me").with_time_taken(3.0));
        s.update(
            &id,
            TaskPatch {
                title: Some("   ".into()),
                time_taken: Some(-2.0),
                revenue: Some(f64::NAN),
                ..TaskPatch::default()
            },
        );
        let t = s.get(&id).unwrap();
        assert_eq!(t.title, "Keep me");
        assert_eq!(t.time_taken, 1.0);
        assert_eq!(t.revenue, DEFAULT_REVENUE);
    }

    #[test]
    fn test_unknown_ids_are_silent_no_ops() {
        let clock = ManualClock::new(t0());
        let mut s = store(&clock);
        s.add(NewTask::new("a"));
        let before = s.tasks().to_vec();

        assert!(!s.update("nope", TaskPatch::status(TaskStatus::Done)));
        assert!(s.delete("nope").is_none());
        assert_eq!(s.tasks(), before.as_slice());
        assert!(s.last_deleted().is_none());
    }

    #[test]
    fn test_delete_then_undo_restores_at_end() {
        let clock = ManualClock::new(t0());
        let mut s = store(&clock);
        let a = s.add(NewTask::new("a"));
        s.add(NewTask::new("b"));
        let original = s.get(&a).unwrap().clone();

        assert_eq!(s.delete(&a).as_ref(), Some(&original));
        assert_eq!(s.last_deleted(), Some(&original));
        assert_eq!(s.tasks().len(), 1);

        assert_eq!(s.undo_delete().as_deref(), Some(a.as_str()));
        assert_eq!(s.tasks().last(), Some(&original));
        assert!(s.last_deleted().is_none());

        let snapshot = s.tasks().to_vec();
        assert_eq!(s.undo_delete(), None);
        assert_eq!(s.tasks(), snapshot.as_slice());
    }

    #[test]
    fn test_only_the_latest_delete_is_undoable() {
        let clock = ManualClock::new(t0());
        let mut s = store(&clock);
        let a = s.add(NewTask::new("a"));
        let b = s.add(NewTask::new("b"));
        s.delete(&a);
        s.delete(&b);
        assert_eq!(s.undo_delete().as_deref(), Some(b.as_str()));
        assert_eq!(s.undo_delete(), None);
        assert!(s.get(&a).is_none());
    }

    #[test]
    fn test_undo_does_not_duplicate_a_reused_id() {
        let clock = ManualClock::new(t0());
        let mut s = store(&clock);
        s.add(NewTask::new("a").with_id("x"));
        s.delete("x");
        s.add(NewTask::new("replacement").with_id("x"));

        let restored = s.undo_delete().unwrap();
        assert_ne!(restored, "x");
        assert_eq!(s.tasks().len(), 2);
    }

    #[test]
    fn test_derived_view_tracks_every_commit() {
        let clock = ManualClock::new(t0());
        let mut s = store(&clock);
        assert_eq!(s.metrics(), &Metrics::default());

        let low = s.add(NewTask::new("low").with_revenue(100.0).with_time_taken(1.0));
        let high = s.add(NewTask::new("high").with_revenue(900.0).with_time_taken(1.0));
        assert_eq!(s.derived_sorted()[0].task.id, high);
        assert_eq!(s.metrics().total_revenue, 1000.0);
        assert_eq!(s.metrics().performance_grade, PerformanceGrade::Good);

        s.update(&low, TaskPatch { revenue: Some(5000.0), ..TaskPatch::default() });
        assert_eq!(s.derived_sorted()[0].task.id, low);
        assert_eq!(s.metrics().total_revenue, 5900.0);
        assert_eq!(s.metrics().performance_grade, PerformanceGrade::Excellent);

        s.delete(&low);
        s.delete(&high);
        assert!(s.derived_sorted().is_empty());
        assert_eq!(s.metrics(), &Metrics::default());
    }
}
