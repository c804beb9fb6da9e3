//! Timetabling domain models.
//!
//! Plain data records for the weekly class-timetabling problem and its
//! solution.
//!
//! # Domain Mappings
//!
//! | u-timetable | School | Tutoring centre | Training |
//! |-------------|--------|-----------------|----------|
//! | Subject | Course | Lesson series | Workshop |
//! | TimeSlot | Period | Booking slot | Session window |
//! | TimetableEntry | Lesson | Booking | Session |
//! | Conflict | Unplaced lesson | Unbooked lesson | Unplaced session |

mod conflict;
mod entry;
mod subject;
mod time_slot;
mod timetable;

pub use conflict::{Conflict, ConflictType, SlotRejection, SlotViolation, Suggestion};
pub use entry::TimetableEntry;
pub use subject::Subject;
pub use time_slot::{format_time, intervals_overlap, minutes_from_midnight, parse_time, TimeSlot, Weekday};
pub use timetable::{
    GeneratedTimetable, SchedulingPolicy, TimetableConfig, DEFAULT_MAX_WEEKLY_SESSIONS,
};
