//! Greedy timetable generation and quality metrics.
//!
//! # Algorithm
//!
//! `TimetableGenerator` visits subjects in rule-engine order and places
//! each required occurrence into the first conflict-free compatible slot,
//! trying days the teacher does not use yet first. It never backtracks:
//! the result is predictable and explainable, not optimal.
//!
//! Occurrences that cannot be placed become structured [`Conflict`]
//! records with suggested remedies instead of aborting the run.
//!
//! # Statistics
//!
//! `TimetableStats` summarizes completion, teacher spread and slot usage.
//!
//! [`Conflict`]: crate::models::Conflict

mod conflicts;
mod generator;
mod report;
mod stats;

pub use conflicts::{order_by_day_distribution, teacher_days, ConflictDetector};
pub use generator::TimetableGenerator;
pub use report::unplaced_occurrence;
pub use stats::TimetableStats;
