//! CSV export of the sorted derived view.

use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tally_core::DerivedTask;

#[derive(Debug, Serialize)]
struct Row<'a> {
    id: &'a str,
    title: &'a str,
    revenue: f64,
    time_taken: f64,
    roi: f64,
    time_efficiency: f64,
    performance_contribution: f64,
    priority: &'a str,
    status: &'a str,
    notes: &'a str,
    created_at: String,
    completed_at: String,
}

impl<'a> From<&'a DerivedTask> for Row<'a> {
    fn from(d: &'a DerivedTask) -> Self {
        Self {
            id: &d.task.id,
            title: &d.task.title,
            revenue: d.task.revenue,
            time_taken: d.task.time_taken,
            roi: d.roi,
            time_efficiency: d.time_efficiency,
            performance_contribution: d.performance_contribution,
            priority: d.task.priority.label(),
            status: d.task.status.label(),
            notes: &d.task.notes,
            created_at: d.task.created_at.to_rfc3339(),
            completed_at: d
                .task
                .completed_at
                .map(|t| t.to_rfc3339())
                .unwrap_or_default(),
        }
    }
}

pub fn write_csv<W: Write>(out: W, rows: &[&DerivedTask]) -> Result<()> {
    let mut w = csv::Writer::from_writer(out);
    for d in rows {
        w.serialize(Row::from(*d)).context("write csv row")?;
    }
    w.flush().context("flush csv")?;
    Ok(())
}

pub fn export_csv(path: &Path, rows: &[&DerivedTask]) -> Result<()> {
    let f = std::fs::File::create(path).with_context(|| format!("create {}", path.display()))?;
    write_csv(f, rows).with_context(|| format!("export {}", path.display()))
}
