//! Derivation engine - ROI, per-task derived fields, display order.
//!
//! Everything here is pure. The store recomputes the whole view after every
//! committed change; nothing is cached across snapshots.
//!
//! Display order (total):
//! - ROI DESC
//! - priority DESC (High first)
//! - title ASC, case-insensitive
//! - createdAt DESC (newest first)
//! - id ASC

use crate::metrics::Metrics;
use crate::task::Task;
use serde::Serialize;
use std::cmp::Ordering;

/// revenue / time_taken, or 0 when the quotient is undefined.
pub fn roi(revenue: f64, time_taken: f64) -> f64 {
    if time_taken == 0.0 {
        return 0.0;
    }
    let r = revenue / time_taken;
    if r.is_finite() { r } else { 0.0 }
}

/// Snapshot-wide figures some derived fields are relative to.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DerivationContext {
    pub total_revenue: f64,
    pub best_roi: f64,
}

impl DerivationContext {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        tasks.iter().fold(Self::default(), |acc, t| Self {
            total_revenue: acc.total_revenue + t.revenue,
            best_roi: acc.best_roi.max(roi(t.revenue, t.time_taken)),
        })
    }
}

/// A task plus its computed fields. Never stored on its own.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedTask {
    #[serde(flatten)]
    pub task: Task,
    pub roi: f64,
    /// ROI as a percentage of the best ROI in the snapshot (0-100).
    pub time_efficiency: f64,
    /// Share of snapshot revenue, in percent.
    pub performance_contribution: f64,
}

fn percent(part: f64, whole: f64) -> f64 {
    if whole == 0.0 {
        return 0.0;
    }
    let p = part / whole * 100.0;
    if p.is_finite() { p } else { 0.0 }
}

pub fn with_derived(task: &Task, ctx: &DerivationContext) -> DerivedTask {
    let r = roi(task.revenue, task.time_taken);
    DerivedTask {
        task: task.clone(),
        roi: r,
        time_efficiency: percent(r, ctx.best_roi),
        performance_contribution: percent(task.revenue, ctx.total_revenue),
    }
}

fn fold_case(s: &str) -> impl Iterator<Item = char> + '_ {
    s.chars().flat_map(char::to_lowercase)
}

pub fn compare_derived(a: &DerivedTask, b: &DerivedTask) -> Ordering {
    b.roi
        .total_cmp(&a.roi)
        .then_with(|| b.task.priority.cmp(&a.task.priority))
        .then_with(|| fold_case(&a.task.title).cmp(fold_case(&b.task.title)))
        .then_with(|| b.task.created_at.cmp(&a.task.created_at))
        .then_with(|| a.task.id.cmp(&b.task.id))
}

/// Derive and sort a snapshot.
pub fn derive_sorted(tasks: &[Task]) -> Vec<DerivedTask> {
    let ctx = DerivationContext::from_tasks(tasks);
    let mut out: Vec<DerivedTask> = tasks.iter().map(|t| with_derived(t, &ctx)).collect();
    out.sort_by(compare_derived);
    out
}

/// Everything consumers read besides the raw collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DerivedView {
    pub sorted: Vec<DerivedTask>,
    pub metrics: Metrics,
}

impl DerivedView {
    pub fn compute(tasks: &[Task]) -> Self {
        Self {
            sorted: derive_sorted(tasks),
            metrics: Metrics::compute(tasks),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Priority;
    use chrono::{Duration, TimeZone, Utc};

    fn t0() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap()
    }

    fn titles(v: &[DerivedTask]) -> Vec<&str> {
        v.iter().map(|d| d.task.title.as_str()).collect()
    }

    #[test]
    fn test_roi_is_safe() {
        assert_eq!(roi(200.0, 2.0), 100.0);
        assert_eq!(roi(200.0, 0.0), 0.0);
        assert_eq!(roi(f64::INFINITY, 1.0), 0.0);
        assert_eq!(roi(f64::NAN, 1.0), 0.0);
        assert_eq!(roi(1.0, f64::MIN_POSITIVE / 1e10), 0.0);
    }

    #[test]
    fn test_with_derived_bypasses_task_invariants_safely() {
        // Construct a task that skipped normalization.
        let mut t = Task::new("x", "raw", t0());
        t.time_taken = 0.0;
        let d = with_derived(&t, &DerivationContext::from_tasks(std::slice::from_ref(&t)));
        assert_eq!(d.roi, 0.0);
        assert_eq!(d.time_efficiency, 0.0);
        assert_eq!(d.performance_contribution, 100.0);
    }

    #[test]
    fn test_equal_roi_breaks_on_priority_then_title() {
        let tasks = vec![
            Task::new("b", "B", t0()).with_revenue(100.0).with_time_taken(1.0),
            Task::new("a", "A", t0()).with_revenue(200.0).with_time_taken(2.0),
            Task::new("c", "c low", t0())
                .with_revenue(100.0)
                .with_time_taken(1.0)
                .with_priority(Priority::Low),
            Task::new("d", "Z high", t0())
                .with_revenue(100.0)
                .with_time_taken(1.0)
                .with_priority(Priority::High),
        ];
        let sorted = derive_sorted(&tasks);
        assert_eq!(titles(&sorted), vec!["Z high", "A", "B", "c low"]);
    }

    #[test]
    fn test_title_compare_ignores_case() {
        let tasks = vec![
            Task::new("1", "beta", t0()),
            Task::new("2", "Alpha", t0()),
            Task::new("3", "ALPHA2", t0()),
        ];
        assert_eq!(titles(&derive_sorted(&tasks)), vec!["Alpha", "ALPHA2", "beta"]);
    }

    #[test]
    fn test_case_folded_title_compare_matches_lowercased_strings() {
        let pairs = [("Straße", "STRASSE"), ("abc", "ABCD"), ("Éclair", "eclair"), ("b", "B")];
        for (x, y) in pairs {
            let a = with_derived(&Task::new("1", x, t0()), &DerivationContext::default());
            let b = with_derived(&Task::new("1", y, t0()), &DerivationContext::default());
            assert_eq!(
                compare_derived(&a, &b),
                x.to_lowercase().cmp(&y.to_lowercase()),
                "{x} vs {y}"
            );
        }
    }

    #[test]
    fn test_newest_first_on_full_tie_and_stable_across_runs() {
        let tasks = vec![
            Task::new("old", "Same", t0() - Duration::days(3)),
            Task::new("new", "same", t0()),
            Task::new("mid", "SAME", t0() - Duration::days(1)),
        ];
        let first = derive_sorted(&tasks);
        let ids: Vec<&str> = first.iter().map(|d| d.task.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "mid", "old"]);

        let mut reversed = tasks.clone();
        reversed.reverse();
        assert_eq!(derive_sorted(&reversed), first);
        assert_eq!(derive_sorted(&tasks), first);
    }

    #[test]
    fn test_comparator_is_total_even_for_identical_timestamps() {
        let a = with_derived(&Task::new("a", "X", t0()), &DerivationContext::default());
        let b = with_derived(&Task::new("b", "X", t0()), &DerivationContext::default());
        assert_eq!(compare_derived(&a, &b), Ordering::Less);
        assert_eq!(compare_derived(&b, &a), Ordering::Greater);
        assert_eq!(compare_derived(&a, &a), Ordering::Equal);
    }

    #[test]
    fn test_relative_fields_use_snapshot_context() {
        let tasks = vec![
            Task::new("a", "A", t0()).with_revenue(300.0).with_time_taken(1.0),
            Task::new("b", "B", t0()).with_revenue(100.0).with_time_taken(2.0),
        ];
        let sorted = derive_sorted(&tasks);
        assert_eq!(sorted[0].time_efficiency, 100.0);
        assert!((sorted[1].time_efficiency - 50.0 / 3.0).abs() < 1e-9);
        assert_eq!(sorted[0].performance_contribution, 75.0);
        assert_eq!(sorted[1].performance_contribution, 25.0);
    }
}
