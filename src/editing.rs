//! Post-generation editing with incremental conflict checks.
//!
//! [`TimetableEditor`] owns a snapshot of generated entries and re-checks
//! each proposed mutation against the rest of the snapshot. A mutation is
//! applied only when its check list is empty; other entries are never
//! re-verified.
//!
//! Occupancy checks here match on exact `(day, start)` pairs, the way slot
//! grids are edited, while the generator checks interval overlap.
//!
//! After generation each entry's `teacher_id` is authoritative: workload
//! and double-booking are counted from entries, so an entry may be handed
//! to a different teacher than its subject declares.
//!
//! # Example
//!
//! ```
//! use u_timetable::editing::{EntryUpdate, TimetableEditor};
//! use u_timetable::models::{Subject, TimetableConfig, Weekday};
//! use u_timetable::scheduler::TimetableGenerator;
//!
//! let config = TimetableConfig::with_default_slots(vec![
//!     Subject::new("M").with_teacher("A"),
//!     Subject::new("P").with_teacher("B"),
//! ]);
//! let generated = TimetableGenerator::new().generate(&config);
//! let mut editor = TimetableEditor::for_timetable(&generated, &config);
//!
//! // Moving P onto the slot M already holds is refused.
//! let m = editor.entries()[0].clone();
//! let p_id = editor.entries()[1].id.clone();
//! let update = EntryUpdate::new().with_day(m.day).with_start_time(m.start_time);
//! let violations = editor.check_update_conflicts(&p_id, &update).unwrap();
//! assert_eq!(violations[0].kind.as_str(), "TIME_CONFLICT");
//! assert!(editor.update_entry(&p_id, &update).is_err());
//! ```

use std::collections::HashMap;
use std::fmt;

use chrono::{Duration, NaiveTime};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{Result, TimetableError};
use crate::models::{
    format_time, GeneratedTimetable, SchedulingPolicy, Subject, TimetableConfig, TimetableEntry,
    Weekday,
};

/// Category of an edit violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EditViolationKind {
    /// Another entry already starts at that day and time.
    TimeConflict,
    /// The teacher already teaches at that day and time.
    TeacherConflict,
    /// The teacher is already at the weekly cap.
    WorkloadViolation,
    /// The room is already used at that day and time.
    RoomConflict,
    /// The subject is not part of the configuration.
    InvalidSubject,
    /// No subject given for a new entry.
    MissingSubject,
    /// No teacher given for a new entry.
    MissingTeacher,
}

impl EditViolationKind {
    /// Stable machine tag.
    pub fn as_str(self) -> &'static str {
        match self {
            EditViolationKind::TimeConflict => "TIME_CONFLICT",
            EditViolationKind::TeacherConflict => "TEACHER_CONFLICT",
            EditViolationKind::WorkloadViolation => "WORKLOAD_VIOLATION",
            EditViolationKind::RoomConflict => "ROOM_CONFLICT",
            EditViolationKind::InvalidSubject => "INVALID_SUBJECT",
            EditViolationKind::MissingSubject => "MISSING_SUBJECT",
            EditViolationKind::MissingTeacher => "MISSING_TEACHER",
        }
    }
}

impl fmt::Display for EditViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reason a proposed edit is refused.
///
/// Displays as `"<TAG>: <message>"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditViolation {
    /// Violation category.
    pub kind: EditViolationKind,
    /// Human-readable detail.
    pub message: String,
}

impl EditViolation {
    fn new(kind: EditViolationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for EditViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

/// Partial change to an existing entry. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryUpdate {
    /// New subject.
    pub subject_id: Option<String>,
    /// New day.
    pub day: Option<Weekday>,
    /// New start time.
    pub start_time: Option<NaiveTime>,
    /// New end time.
    pub end_time: Option<NaiveTime>,
    /// New teacher.
    pub teacher_id: Option<String>,
    /// `Some(None)` clears the room.
    pub room: Option<Option<String>>,
}

impl EntryUpdate {
    /// Creates an update that changes nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the subject.
    pub fn with_subject(mut self, subject_id: impl Into<String>) -> Self {
        self.subject_id = Some(subject_id.into());
        self
    }

    /// Moves the entry to another day.
    pub fn with_day(mut self, day: Weekday) -> Self {
        self.day = Some(day);
        self
    }

    /// Moves the start. Without an explicit end, the duration is kept.
    pub fn with_start_time(mut self, start: NaiveTime) -> Self {
        self.start_time = Some(start);
        self
    }

    /// Sets the end time.
    pub fn with_end_time(mut self, end: NaiveTime) -> Self {
        self.end_time = Some(end);
        self
    }

    /// Reassigns the entry to another teacher.
    pub fn with_teacher(mut self, teacher_id: impl Into<String>) -> Self {
        self.teacher_id = Some(teacher_id.into());
        self
    }

    /// Sets the room.
    pub fn with_room(mut self, room: impl Into<String>) -> Self {
        self.room = Some(Some(room.into()));
        self
    }

    /// Clears the room.
    pub fn without_room(mut self) -> Self {
        self.room = Some(None);
        self
    }

    /// Applies the change to `entry`, keeping the entry id.
    fn apply_to(&self, entry: &TimetableEntry) -> Result<TimetableEntry> {
        let mut next = entry.clone();
        if let Some(subject_id) = &self.subject_id {
            next.subject_id = subject_id.clone();
        }
        if let Some(day) = self.day {
            next.day = day;
        }
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => {
                next.start_time = start;
                next.end_time = end;
            }
            (Some(start), None) => {
                let (end, wrapped) =
                    start.overflowing_add_signed(Duration::minutes(entry.duration_minutes()));
                if wrapped != 0 {
                    return Err(TimetableError::InvalidTime {
                        value: format!("{} + {} min", format_time(start), entry.duration_minutes()),
                    });
                }
                next.start_time = start;
                next.end_time = end;
            }
            (None, Some(end)) => next.end_time = end,
            (None, None) => {}
        }
        if next.end_time <= next.start_time {
            return Err(TimetableError::InvalidTime {
                value: format!("{}-{}", format_time(next.start_time), format_time(next.end_time)),
            });
        }
        if let Some(teacher_id) = &self.teacher_id {
            next.teacher_id = teacher_id.trim().to_string();
        }
        if let Some(room) = &self.room {
            next.room = room.clone().filter(|r| !r.trim().is_empty());
        }
        Ok(next)
    }
}

/// A manually added session.
///
/// ```
/// use u_timetable::editing::{EditViolationKind, NewEntry, TimetableEditor};
/// use u_timetable::models::{parse_time, SchedulingPolicy, Subject, Weekday};
///
/// let subjects = vec![Subject::new("M").with_teacher("A")];
/// let mut editor = TimetableEditor::new(Vec::new(), &subjects, SchedulingPolicy::default());
/// let start = parse_time("08:30").unwrap();
/// let end = parse_time("09:20").unwrap();
///
/// let missing = NewEntry::new("M", Weekday::Monday, start, end, " ");
/// let kinds: Vec<_> = editor.check_add_conflicts(&missing).iter().map(|v| v.kind).collect();
/// assert_eq!(kinds, vec![EditViolationKind::MissingTeacher]);
///
/// let id = editor
///     .add_entry(&NewEntry::new("M", Weekday::Monday, start, end, "A").with_room("R1"))
///     .unwrap();
/// assert_eq!(editor.entry(&id).and_then(|e| e.room()), Some("R1"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEntry {
    /// Subject taught.
    pub subject_id: String,
    /// Day of the week.
    pub day: Weekday,
    /// Start time.
    pub start_time: NaiveTime,
    /// End time.
    pub end_time: NaiveTime,
    /// Teacher of the session.
    pub teacher_id: String,
    /// Optional room.
    pub room: Option<String>,
}

impl NewEntry {
    /// Creates a session without a room.
    pub fn new(
        subject_id: impl Into<String>,
        day: Weekday,
        start_time: NaiveTime,
        end_time: NaiveTime,
        teacher_id: impl Into<String>,
    ) -> Self {
        Self {
            subject_id: subject_id.into(),
            day,
            start_time,
            end_time,
            teacher_id: teacher_id.into(),
            room: None,
        }
    }

    /// Sets the room.
    pub fn with_room(mut self, room: impl Into<String>) -> Self {
        self.room = Some(room.into());
        self
    }

    fn to_entry(&self) -> TimetableEntry {
        let entry = TimetableEntry::new(
            self.subject_id.trim(),
            self.day,
            self.start_time,
            self.end_time,
            self.teacher_id.trim(),
        );
        match self.room.as_deref().map(str::trim) {
            Some(room) if !room.is_empty() => entry.with_room(room),
            _ => entry,
        }
    }
}

/// Editable snapshot of a generated timetable.
#[derive(Debug, Clone)]
pub struct TimetableEditor {
    entries: Vec<TimetableEntry>,
    subject_names: HashMap<String, String>,
    policy: SchedulingPolicy,
}

impl TimetableEditor {
    /// Creates an editor over `entries` with `subjects` as the known subject set.
    pub fn new(entries: Vec<TimetableEntry>, subjects: &[Subject], policy: SchedulingPolicy) -> Self {
        Self {
            entries,
            subject_names: subjects
                .iter()
                .map(|s| (s.id.clone(), s.display_name().to_string()))
                .collect(),
            policy,
        }
    }

    /// Creates an editor over a generated timetable and its configuration.
    pub fn for_timetable(timetable: &GeneratedTimetable, config: &TimetableConfig) -> Self {
        Self::new(timetable.entries.clone(), &config.subjects, config.policy)
    }

    /// Current entries, in insertion order.
    pub fn entries(&self) -> &[TimetableEntry] {
        &self.entries
    }

    /// Consumes the editor and returns its entries.
    pub fn into_entries(self) -> Vec<TimetableEntry> {
        self.entries
    }

    /// Looks up an entry by id.
    pub fn entry(&self, id: &str) -> Option<&TimetableEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Whether the snapshot differs from `baseline` (order-sensitive).
    pub fn differs_from(&self, baseline: &[TimetableEntry]) -> bool {
        self.entries.as_slice() != baseline
    }

    /// Checks a partial change to entry `id` against all other entries.
    ///
    /// # Errors
    /// [`TimetableError::EntryNotFound`] for an unknown id and
    /// [`TimetableError::InvalidTime`] when the resulting interval is empty.
    pub fn check_update_conflicts(&self, id: &str, update: &EntryUpdate) -> Result<Vec<EditViolation>> {
        let current = self
            .entry(id)
            .ok_or_else(|| TimetableError::EntryNotFound(id.to_string()))?;
        let proposed = update.apply_to(current)?;

        let mut violations = self.placement_violations(&proposed, Some(id));
        if update.subject_id.is_some() && !self.subject_names.contains_key(&proposed.subject_id) {
            violations.push(EditViolation::new(
                EditViolationKind::InvalidSubject,
                format!("unknown subject '{}'", proposed.subject_id),
            ));
        }
        Ok(violations)
    }

    /// Checks a new entry against the full snapshot.
    pub fn check_add_conflicts(&self, new_entry: &NewEntry) -> Vec<EditViolation> {
        let mut violations = Vec::new();
        let subject_id = new_entry.subject_id.trim();
        if subject_id.is_empty() {
            violations.push(EditViolation::new(
                EditViolationKind::MissingSubject,
                "a subject is required",
            ));
        } else if !self.subject_names.contains_key(subject_id) {
            violations.push(EditViolation::new(
                EditViolationKind::InvalidSubject,
                format!("unknown subject '{subject_id}'"),
            ));
        }
        if new_entry.teacher_id.trim().is_empty() {
            violations.push(EditViolation::new(
                EditViolationKind::MissingTeacher,
                "a teacher is required",
            ));
        }
        violations.extend(self.placement_violations(&new_entry.to_entry(), None));
        violations
    }

    /// Applies a partial change if it raises no violation.
    ///
    /// # Errors
    /// [`TimetableError::EditRejected`] with every violation found; the
    /// snapshot is left untouched.
    pub fn update_entry(&mut self, id: &str, update: &EntryUpdate) -> Result<&TimetableEntry> {
        let violations = self.check_update_conflicts(id, update)?;
        if !violations.is_empty() {
            warn!(entry = id, violations = violations.len(), "entry update rejected");
            return Err(TimetableError::EditRejected(violations));
        }

        let idx = self.position(id)?;
        let updated = update.apply_to(&self.entries[idx])?;
        info!(entry = id, day = %updated.day, start = %format_time(updated.start_time), "entry updated");
        self.entries[idx] = updated;
        Ok(&self.entries[idx])
    }

    /// Appends a new entry if it raises no violation. Returns its id.
    ///
    /// # Errors
    /// [`TimetableError::InvalidTime`] when end is not after start and
    /// [`TimetableError::EditRejected`] on any violation.
    pub fn add_entry(&mut self, new_entry: &NewEntry) -> Result<String> {
        if new_entry.end_time <= new_entry.start_time {
            return Err(TimetableError::InvalidTime {
                value: format!(
                    "{}-{}",
                    format_time(new_entry.start_time),
                    format_time(new_entry.end_time)
                ),
            });
        }
        let violations = self.check_add_conflicts(new_entry);
        if !violations.is_empty() {
            warn!(subject = %new_entry.subject_id, violations = violations.len(), "entry add rejected");
            return Err(TimetableError::EditRejected(violations));
        }

        let entry = new_entry.to_entry();
        let id = entry.id.clone();
        info!(entry = %id, subject = %entry.subject_id, day = %entry.day, "entry added");
        self.entries.push(entry);
        Ok(id)
    }

    /// Removes an entry and returns it.
    pub fn delete_entry(&mut self, id: &str) -> Result<TimetableEntry> {
        let idx = self.position(id)?;
        info!(entry = id, "entry deleted");
        Ok(self.entries.remove(idx))
    }

    fn position(&self, id: &str) -> Result<usize> {
        self.entries
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| TimetableError::EntryNotFound(id.to_string()))
    }

    /// Occupancy, teacher, workload and room checks for `proposed` against
    /// every entry except `exclude`.
    fn placement_violations(&self, proposed: &TimetableEntry, exclude: Option<&str>) -> Vec<EditViolation> {
        let others: Vec<&TimetableEntry> = self
            .entries
            .iter()
            .filter(|e| Some(e.id.as_str()) != exclude)
            .collect();
        let at_same_time: Vec<&TimetableEntry> = others
            .iter()
            .copied()
            .filter(|e| e.day == proposed.day && e.start_time == proposed.start_time)
            .collect();
        let when = format!("{} {}", proposed.day, format_time(proposed.start_time));

        let mut violations = Vec::new();
        if let Some(taken) = at_same_time.first() {
            violations.push(EditViolation::new(
                EditViolationKind::TimeConflict,
                format!("{when} is already taken by {}", self.name_of(taken)),
            ));
        }

        if let Some(teacher) = proposed.teacher() {
            if let Some(clash) = at_same_time.iter().find(|e| e.teacher() == Some(teacher)) {
                violations.push(EditViolation::new(
                    EditViolationKind::TeacherConflict,
                    format!("teacher {teacher} already teaches {} at {when}", self.name_of(clash)),
                ));
            }
            let sessions = others.iter().filter(|e| e.teacher() == Some(teacher)).count();
            if sessions >= self.policy.max_weekly_sessions {
                violations.push(EditViolation::new(
                    EditViolationKind::WorkloadViolation,
                    format!(
                        "teacher {teacher} already has {sessions} sessions this week (limit {})",
                        self.policy.max_weekly_sessions
                    ),
                ));
            }
        }

        if let Some(room) = proposed.room() {
            if let Some(clash) = at_same_time.iter().find(|e| e.room() == Some(room)) {
                violations.push(EditViolation::new(
                    EditViolationKind::RoomConflict,
                    format!("room {room} is already used by {} at {when}", self.name_of(clash)),
                ));
            }
        }

        debug!(day = %proposed.day, violations = violations.len(), "placement checked");
        violations
    }

    fn name_of<'a>(&'a self, entry: &'a TimetableEntry) -> &'a str {
        self.subject_names
            .get(&entry.subject_id)
            .map_or(entry.subject_id.as_str(), String::as_str)
    }
}
