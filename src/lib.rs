//! Weekly class timetabling.
//!
//! Validates a timetable configuration, assigns subject occurrences to
//! weekly time slots with a greedy day-distributing heuristic, reports
//! every occurrence that could not be placed, and re-checks manual edits
//! of the result.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Subject`, `TimeSlot`, `TimetableEntry`,
//!   `Conflict`, `TimetableConfig`, `GeneratedTimetable`
//! - **`validation`**: Pre-generation checks (no subjects, no slots,
//!   missing teachers, duration mismatch, workload cap) and warnings
//! - **`priority`**: Subject ordering rules and a composable rule engine
//! - **`scheduler`**: `TimetableGenerator`, conflict detection, statistics
//! - **`editing`**: Incremental conflict checks for post-generation edits
//! - **`persistence`**: Repository seam with in-memory and JSON-file stores
//! - **`export`**: Text grid and JSON renderings of saved timetables
//!
//! # Quick Start
//!
//! ```
//! use u_timetable::models::{Subject, TimetableConfig};
//! use u_timetable::{validate_configuration, TimetableGenerator};
//!
//! let config = TimetableConfig::with_default_slots(vec![
//!     Subject::new("MATH").with_name("Mathematics").with_teacher("T1").with_frequency(3),
//!     Subject::new("PHYS").with_name("Physics").with_teacher("T2").with_frequency(2),
//! ]);
//!
//! let report = validate_configuration(&config);
//! assert!(report.is_valid);
//!
//! let timetable = TimetableGenerator::new().generate(&config);
//! assert!(timetable.success);
//! assert_eq!(timetable.entries.len(), 5);
//! // Each teacher's sessions land on distinct days.
//! assert_eq!(timetable.teacher_days("T1").len(), 3);
//! ```
//!
//! # Logging
//!
//! The crate emits `tracing` events and never installs a subscriber.

pub mod editing;
pub mod error;
pub mod export;
pub mod models;
pub mod persistence;
pub mod priority;
pub mod scheduler;
pub mod validation;

pub use error::{Result, TimetableError};
pub use scheduler::TimetableGenerator;
pub use validation::{validate_configuration, ValidationReport};
