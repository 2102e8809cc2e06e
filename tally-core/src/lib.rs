//! tally-core: task state for the ROI tracker.
//!
//! Loads a task list once, normalizes it, derives ROI metrics and display
//! order, and exposes add/update/delete/undo over a single `TaskStore`.

pub mod derive;
pub mod load;
pub mod metrics;
pub mod normalize;
pub mod raw;
pub mod seed;
pub mod store;
pub mod task;
pub mod time;

pub use derive::{compare_derived, derive_sorted, roi, with_derived, DerivationContext, DerivedTask, DerivedView};
pub use load::{LoadOutcome, LoadState, MountHandle, TaskSource};
pub use metrics::{Metrics, PerformanceGrade};
pub use normalize::{normalize, normalize_one};
pub use raw::{parse_document, RawField, RawTask};
pub use seed::{FALLBACK_BATCH, SEED_BATCH};
pub use store::{NewTask, TaskPatch, TaskStore};
pub use task::{Priority, Task, TaskStatus, DEFAULT_REVENUE, DEFAULT_TIME_TAKEN};
pub use time::{Clock, ManualClock, SystemClock};
