//! Scheduling conflict model.
//!
//! A conflict records one required occurrence the generator could not
//! place. It is kept structured (category, per-slot violations, suggested
//! remedies) and rendered to prose only through [`Conflict::description`]
//! or `Display`.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Weekday;

/// Category of an unplaced occurrence.
///
/// Tags mirror the interactive checker's categories so callers can branch
/// on either path the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConflictType {
    /// No slot passed the preferred-slot and duration filters.
    NoCompatibleSlot,
    /// Every candidate slot was already occupied.
    TimeConflict,
    /// The teacher was booked at every free candidate time.
    TeacherConflict,
    /// The teacher reached the weekly workload cap.
    WorkloadViolation,
    /// The room was booked at every free candidate time.
    RoomConflict,
}

impl ConflictType {
    /// Stable machine tag.
    pub fn as_str(self) -> &'static str {
        match self {
            ConflictType::NoCompatibleSlot => "NO_COMPATIBLE_SLOT",
            ConflictType::TimeConflict => "TIME_CONFLICT",
            ConflictType::TeacherConflict => "TEACHER_CONFLICT",
            ConflictType::WorkloadViolation => "WORKLOAD_VIOLATION",
            ConflictType::RoomConflict => "ROOM_CONFLICT",
        }
    }
}

impl fmt::Display for ConflictType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a single candidate slot was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SlotViolation {
    /// Slot shorter than one session.
    SlotTooShort { slot_minutes: i64, required_minutes: i64 },
    /// Overlapping entries already hold the slot.
    SlotOccupied { subjects: Vec<String> },
    /// The teacher already teaches at an overlapping time.
    TeacherDoubleBooked { teacher: String, subjects: Vec<String> },
    /// The teacher already has `sessions >= cap` entries this week.
    TeacherOverloaded { teacher: String, sessions: usize, cap: usize },
    /// The room is already used at an overlapping time.
    RoomDoubleBooked { room: String, subjects: Vec<String> },
}

impl SlotViolation {
    /// Category this violation belongs to.
    pub fn category(&self) -> ConflictType {
        match self {
            SlotViolation::SlotTooShort { .. } => ConflictType::NoCompatibleSlot,
            SlotViolation::SlotOccupied { .. } => ConflictType::TimeConflict,
            SlotViolation::TeacherDoubleBooked { .. } => ConflictType::TeacherConflict,
            SlotViolation::TeacherOverloaded { .. } => ConflictType::WorkloadViolation,
            SlotViolation::RoomDoubleBooked { .. } => ConflictType::RoomConflict,
        }
    }
}

impl fmt::Display for SlotViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotViolation::SlotTooShort {
                slot_minutes,
                required_minutes,
            } => write!(
                f,
                "slot lasts {slot_minutes} min but a session needs {required_minutes} min"
            ),
            SlotViolation::SlotOccupied { subjects } => {
                write!(f, "slot already occupied by {}", subjects.join(", "))
            }
            SlotViolation::TeacherDoubleBooked { teacher, subjects } => write!(
                f,
                "teacher {teacher} is already teaching {} at this time",
                subjects.join(", ")
            ),
            SlotViolation::TeacherOverloaded {
                teacher,
                sessions,
                cap,
            } => write!(
                f,
                "teacher {teacher} already has {sessions} sessions this week (limit {cap})"
            ),
            SlotViolation::RoomDoubleBooked { room, subjects } => write!(
                f,
                "room {room} is already used by {} at this time",
                subjects.join(", ")
            ),
        }
    }
}

/// All violations found for one candidate slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotRejection {
    /// Rejected slot id.
    pub slot_id: String,
    /// Human label, e.g. `Monday 08:30-09:20`.
    pub slot_label: String,
    /// Independent violations (never empty).
    pub violations: Vec<SlotViolation>,
}

/// Remedy proposed for an unplaced occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Suggestion {
    /// Give the subject to a teacher who is free.
    AssignDifferentTeacher,
    /// Lengthen slots that are too short for the subject.
    ExtendSlotDuration,
    /// Ask for fewer weekly sessions.
    ReduceFrequency,
    /// Move load from the capped teacher to others.
    RebalanceTeachers,
    /// Add or free up time slots.
    AddTimeSlots,
    /// Widen the subject's preferred slots.
    RelaxPreferredSlots,
}

impl fmt::Display for Suggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Suggestion::AssignDifferentTeacher => {
                "assign another teacher to this subject or swap it with a free teacher"
            }
            Suggestion::ExtendSlotDuration => {
                "extend the time slots or shorten the session duration"
            }
            Suggestion::ReduceFrequency => "reduce the weekly frequency of this subject",
            Suggestion::RebalanceTeachers => {
                "spread this teacher's subjects across other teachers"
            }
            Suggestion::AddTimeSlots => "add time slots or free up existing ones",
            Suggestion::RelaxPreferredSlots => "widen the preferred time slots for this subject",
        })
    }
}

/// An occurrence the generator could not place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conflict {
    /// Dominant category.
    pub kind: ConflictType,
    /// Subject that lost the occurrence.
    pub subject_id: String,
    /// Subject display name.
    pub subject_name: String,
    /// Subject teacher at generation time.
    pub teacher: String,
    /// 1-based occurrence index.
    pub occurrence: u32,
    /// Required occurrences for the subject.
    pub required: u32,
    /// Days the teacher already teaches on.
    pub teacher_days: Vec<Weekday>,
    /// Every candidate slot that was tried, with its violations.
    pub rejections: Vec<SlotRejection>,
    /// Proposed remedies.
    pub suggestions: Vec<Suggestion>,
    /// Entries involved. Empty for unplaced occurrences, which have no entry.
    pub affected_entries: Vec<String>,
}

impl Conflict {
    /// Whether any rejection carries a violation of `kind`.
    pub fn has_violation(&self, kind: ConflictType) -> bool {
        self.rejections
            .iter()
            .flat_map(|r| r.violations.iter())
            .any(|v| v.category() == kind)
    }

    /// Multi-line human-readable report.
    pub fn description(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Could not schedule {} (occurrence {} of {}, teacher {}).",
            self.subject_name, self.occurrence, self.required, self.teacher
        )?;
        if !self.teacher_days.is_empty() {
            let days: Vec<&str> = self.teacher_days.iter().map(|d| d.as_str()).collect();
            writeln!(
                f,
                "Teacher {} already teaches on: {}.",
                self.teacher,
                days.join(", ")
            )?;
        }
        if self.rejections.is_empty() {
            writeln!(f, "  - no time slot matches the preferred slots and session length")?;
        }
        for rejection in &self.rejections {
            let reasons: Vec<String> = rejection.violations.iter().map(|v| v.to_string()).collect();
            writeln!(f, "  - {}: {}", rejection.slot_label, reasons.join("; "))?;
        }
        if !self.suggestions.is_empty() {
            writeln!(f, "Suggestions:")?;
            for s in &self.suggestions {
                writeln!(f, "  * {s}")?;
            }
        }
        Ok(())
    }
}
