//! Seed / fallback batches: deterministic synthetic sales tasks.
//!
//! Used when the input document is empty (`SEED_BATCH`) or unreachable
//! (`FALLBACK_BATCH`). No randomness: the same count always yields the same
//! candidates. `createdAt` is left out on purpose so the normalizer stamps the
//! decreasing `now - (i + 1) days` sequence.

use crate::raw::{RawField, RawTask};

pub const SEED_BATCH: usize = 20;
pub const FALLBACK_BATCH: usize = 15;

const ACTIVITIES: [&str; 12] = [
    "Follow up with inbound lead",
    "Prepare Q2 pricing proposal",
    "Demo call with prospect",
    "Renewal negotiation",
    "Update CRM pipeline notes",
    "Cold outreach sequence",
    "Contract redlines review",
    "Upsell existing account",
    "Partner referral check-in",
    "Quarterly business review",
    "Trade show lead triage",
    "Case study interview",
];

const PRIORITIES: [&str; 3] = ["High", "Medium", "Low"];
const STATUSES: [&str; 3] = ["Todo", "In Progress", "Done"];

/// Generate `count` synthetic candidates.
pub fn generate(count: usize) -> Vec<RawTask> {
    (0..count)
        .map(|i| {
            let activity = ACTIVITIES[i % ACTIVITIES.len()];
            // Round number appended once the activity list wraps, so titles stay distinct.
            let title = match i / ACTIVITIES.len() {
                0 => activity.to_string(),
                n => format!("{activity} #{}", n + 1),
            };

            // 150..=2850 in steps of 150, spread by a stride coprime with 19.
            let revenue = 150.0 * (1 + (i * 7) % 19) as f64;
            // 0.5..=8.0 hours in half-hour steps.
            let time_taken = 0.5 * (1 + (i * 5) % 16) as f64;

            RawTask {
                id: RawField::Text(format!("seed-{:03}", i + 1)),
                title: RawField::Text(title),
                revenue: RawField::Number(revenue),
                time_taken: RawField::Number(time_taken),
                priority: RawField::from(PRIORITIES[i % PRIORITIES.len()]),
                status: RawField::from(STATUSES[(i / 2) % STATUSES.len()]),
                notes: RawField::Text(format!("Synthetic task {} of {count}", i + 1)),
                ..RawTask::default()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use chrono::{TimeZone, Utc};
    use std::collections::HashSet;

    #[test]
    fn test_deterministic_for_a_given_count() {
        assert_eq!(generate(SEED_BATCH), generate(SEED_BATCH));
        assert_eq!(generate(SEED_BATCH).len(), 20);
        assert_eq!(generate(FALLBACK_BATCH).len(), 15);
        assert_eq!(generate(0).len(), 0);
    }

    #[test]
    fn test_normalizes_cleanly_with_unique_ids_and_titles() {
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap();
        let tasks = normalize(&generate(SEED_BATCH), now);

        let ids: HashSet<_> = tasks.iter().map(|t| t.id.as_str()).collect();
        let titles: HashSet<_> = tasks.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(ids.len(), SEED_BATCH);
        assert_eq!(titles.len(), SEED_BATCH);
        assert_eq!(tasks[0].id, "seed-001");
        assert_eq!(tasks[12].title, "Follow up with inbound lead #2");

        for t in &tasks {
            assert!(t.revenue > 0.0 && t.time_taken > 0.0);
            assert_eq!(t.completed_at.is_some(), t.is_done());
        }
        for w in tasks.windows(2) {
            assert!(w[0].created_at > w[1].created_at);
        }
    }
}
