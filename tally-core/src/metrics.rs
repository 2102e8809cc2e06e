//! Aggregate metrics over a task snapshot.

use crate::derive::roi;
use crate::task::Task;
use serde::{Deserialize, Serialize};

/// Discrete label for average ROI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PerformanceGrade {
    #[default]
    #[serde(rename = "Needs Improvement")]
    NeedsImprovement,
    Good,
    Excellent,
}

impl PerformanceGrade {
    /// Above this average ROI the grade is Excellent.
    pub const EXCELLENT_ABOVE: f64 = 500.0;
    /// From this average ROI up the grade is Good.
    pub const GOOD_FROM: f64 = 200.0;

    pub fn from_average_roi(avg: f64) -> Self {
        if avg > Self::EXCELLENT_ABOVE {
            PerformanceGrade::Excellent
        } else if avg >= Self::GOOD_FROM {
            PerformanceGrade::Good
        } else {
            PerformanceGrade::NeedsImprovement
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PerformanceGrade::NeedsImprovement => "Needs Improvement",
            PerformanceGrade::Good => "Good",
            PerformanceGrade::Excellent => "Excellent",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    pub total_revenue: f64,
    pub total_time_taken: f64,
    /// Hours spent on Done tasks as a percentage of all hours.
    pub time_efficiency_pct: f64,
    pub revenue_per_hour: f64,
    pub average_roi: f64,
    pub performance_grade: PerformanceGrade,
    pub task_count: usize,
    pub done_count: usize,
}

fn guarded_div(num: f64, den: f64) -> f64 {
    if den == 0.0 {
        return 0.0;
    }
    let q = num / den;
    if q.is_finite() { q } else { 0.0 }
}

impl Metrics {
    /// Empty collections get the all-zero baseline.
    pub fn compute(tasks: &[Task]) -> Self {
        if tasks.is_empty() {
            return Self::default();
        }

        let mut total_revenue = 0.0;
        let mut total_time = 0.0;
        let mut done_time = 0.0;
        let mut roi_sum = 0.0;
        let mut done_count = 0;

        for t in tasks {
            total_revenue += t.revenue;
            total_time += t.time_taken;
            roi_sum += roi(t.revenue, t.time_taken);
            if t.is_done() {
                done_time += t.time_taken;
                done_count += 1;
            }
        }

        let average_roi = guarded_div(roi_sum, tasks.len() as f64);

        Self {
            total_revenue,
            total_time_taken: total_time,
            time_efficiency_pct: guarded_div(done_time, total_time) * 100.0,
            revenue_per_hour: guarded_div(total_revenue, total_time),
            average_roi,
            performance_grade: PerformanceGrade::from_average_roi(average_roi),
            task_count: tasks.len(),
            done_count,
        }
    }
}
