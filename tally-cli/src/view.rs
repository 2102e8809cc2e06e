//! Filtering and plain-text rendering of the derived view.

use tally_core::{DerivedTask, Metrics, Priority, TaskStatus};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    /// Case-insensitive substring of title or notes.
    pub search: Option<String>,
}

impl Filter {
    pub fn matches(&self, d: &DerivedTask) -> bool {
        if self.status.is_some_and(|s| s != d.task.status) {
            return false;
        }
        if self.priority.is_some_and(|p| p != d.task.priority) {
            return false;
        }
        match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(q) => {
                let q = q.to_lowercase();
                d.task.title.to_lowercase().contains(&q) || d.task.notes.to_lowercase().contains(&q)
            }
        }
    }

    /// Keep display order; only drop rows.
    pub fn apply<'a>(&self, rows: &'a [DerivedTask]) -> Vec<&'a DerivedTask> {
        rows.iter().filter(|d| self.matches(d)).collect()
    }
}

pub fn render_row(d: &DerivedTask) -> String {
    format!(
        "{:<38} {:<40} roi={:>9.2} eff={:>6.1}% share={:>5.1}% | {:<6} | {:<11} | ${:.2} / {:.1}h",
        d.task.id,
        truncate(&d.task.title, 40),
        d.roi,
        d.time_efficiency,
        d.performance_contribution,
        d.task.priority.label(),
        d.task.status.label(),
        d.task.revenue,
        d.task.time_taken,
    )
}

pub fn render_metrics(m: &Metrics) -> String {
    let mut s = String::new();
    s.push_str(&format!("Tasks:            {} ({} done)\n", m.task_count, m.done_count));
    s.push_str(&format!("Total revenue:    ${:.2}\n", m.total_revenue));
    s.push_str(&format!("Total time:       {:.1}h\n", m.total_time_taken));
    s.push_str(&format!("Time efficiency:  {:.1}%\n", m.time_efficiency_pct));
    s.push_str(&format!("Revenue per hour: ${:.2}\n", m.revenue_per_hour));
    s.push_str(&format!("Average ROI:      {:.2}\n", m.average_roi));
    s.push_str(&format!("Grade:            {}\n", m.performance_grade.label()));
    s
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}
