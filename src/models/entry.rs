//! Timetable entry model.
//!
//! An entry is one committed occurrence of a subject. The teacher is copied
//! from the subject when the entry is created and stored independently
//! from then on; after generation the entry's `teacher_id` is the
//! authoritative teacher for that session.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::time_slot::{hhmm, intervals_overlap, minutes_from_midnight};
use super::{Subject, TimeSlot, Weekday};

/// One placed session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableEntry {
    /// Fresh identifier (UUID v4).
    pub id: String,
    /// Placed subject.
    pub subject_id: String,
    /// Day of the session.
    pub day: Weekday,
    /// Session start (inclusive).
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    /// Session end (exclusive).
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    /// Teacher giving the session.
    pub teacher_id: String,
    /// Room, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
}

impl TimetableEntry {
    /// Creates an entry with a freshly generated id.
    pub fn new(
        subject_id: impl Into<String>,
        day: Weekday,
        start_time: NaiveTime,
        end_time: NaiveTime,
        teacher_id: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            subject_id: subject_id.into(),
            day,
            start_time,
            end_time,
            teacher_id: teacher_id.into(),
            room: None,
        }
    }

    /// Places `subject` into `slot`, copying teacher and room from the subject.
    /// A blank teacher is stored as the empty string.
    pub fn place(subject: &Subject, slot: &TimeSlot) -> Self {
        let mut entry = Self::new(
            &subject.id,
            slot.day,
            slot.start_time,
            slot.end_time,
            subject.teacher_id().unwrap_or_default(),
        );
        entry.room = subject.room().map(str::to_string);
        entry
    }

    /// Sets the room.
    pub fn with_room(mut self, room: impl Into<String>) -> Self {
        self.room = Some(room.into());
        self
    }

    /// Overrides the generated id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Session length in minutes.
    #[inline]
    pub fn duration_minutes(&self) -> i64 {
        minutes_from_midnight(self.end_time) - minutes_from_midnight(self.start_time)
    }

    /// Whether this entry overlaps `[start, end)` on `day`.
    #[inline]
    pub fn overlaps(&self, day: Weekday, start: NaiveTime, end: NaiveTime) -> bool {
        self.day == day && intervals_overlap(self.start_time, self.end_time, start, end)
    }

    /// Room, if set and non-blank.
    pub fn room(&self) -> Option<&str> {
        self.room.as_deref().filter(|r| !r.trim().is_empty())
    }

    /// Teacher identity, or `None` when blank.
    pub fn teacher(&self) -> Option<&str> {
        Some(self.teacher_id.trim()).filter(|t| !t.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::time_slot::parse_time;

    #[test]
    fn test_place_copies_teacher_and_room() {
        let subject = Subject::new("MATH").with_teacher("A").with_room("R1");
        let slot = TimeSlot::parse("mon-1", Weekday::Monday, "08:30", "09:20").unwrap();
        let entry = TimetableEntry::place(&subject, &slot);

        assert_eq!(entry.subject_id, "MATH");
        assert_eq!(entry.teacher_id, "A");
        assert_eq!(entry.room(), Some("R1"));
        assert_eq!(entry.day, Weekday::Monday);
        assert_eq!(entry.duration_minutes(), 50);
    }

    #[test]
    fn test_place_trims_teacher() {
        let slot = TimeSlot::parse("mon-1", Weekday::Monday, "08:30", "09:20").unwrap();
        let padded = TimetableEntry::place(&Subject::new("M").with_teacher(" A "), &slot);
        assert_eq!(padded.teacher_id, "A");
        let blank = TimetableEntry::place(&Subject::new("M").with_teacher("  "), &slot);
        assert_eq!(blank.teacher_id, "");
    }

    #[test]
    fn test_fresh_ids() {
        let t = parse_time("08:30").unwrap();
        let a = TimetableEntry::new("S", Weekday::Monday, t, t, "A");
        let b = TimetableEntry::new("S", Weekday::Monday, t, t, "A");
        assert_ne!(a.id, b.id);
        assert!(Uuid::parse_str(&a.id).is_ok());
    }

    #[test]
    fn test_entry_overlap() {
        let t = |s: &str| parse_time(s).unwrap();
        let e = TimetableEntry::new("S", Weekday::Friday, t("10:00"), t("11:00"), "A");
        assert!(e.overlaps(Weekday::Friday, t("10:59"), t("12:00")));
        assert!(!e.overlaps(Weekday::Friday, t("11:00"), t("12:00")));
        assert!(!e.overlaps(Weekday::Thursday, t("10:00"), t("11:00")));
    }
}
