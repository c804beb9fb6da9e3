//! Subject (recurring class) model.
//!
//! A subject needs `frequency` sessions per week, each lasting `duration`
//! minutes, taught by one teacher and optionally pinned to a room or to a
//! list of preferred slots.

use serde::{Deserialize, Serialize};

use super::TimeSlot;

/// A recurring class to be placed on the weekly grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    /// Unique subject identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Session length (minutes).
    pub duration: i64,
    /// Required sessions per week.
    pub frequency: u32,
    /// Teacher identity. Required; an empty value fails validation.
    pub teacher: String,
    /// Room, if the subject is bound to one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
    /// Slot ids the subject may use. Empty = any slot.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub preferred_slots: Vec<String>,
}

impl Subject {
    /// Creates a subject with one 50-minute session per week and no teacher.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            duration: 50,
            frequency: 1,
            teacher: String::new(),
            room: None,
            preferred_slots: Vec::new(),
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the session length (minutes).
    pub fn with_duration(mut self, minutes: i64) -> Self {
        self.duration = minutes;
        self
    }

    /// Sets the weekly session count.
    pub fn with_frequency(mut self, frequency: u32) -> Self {
        self.frequency = frequency;
        self
    }

    /// Sets the teacher.
    pub fn with_teacher(mut self, teacher: impl Into<String>) -> Self {
        self.teacher = teacher.into();
        self
    }

    /// Sets the room.
    pub fn with_room(mut self, room: impl Into<String>) -> Self {
        self.room = Some(room.into());
        self
    }

    /// Adds a preferred slot id.
    pub fn with_preferred_slot(mut self, slot_id: impl Into<String>) -> Self {
        self.preferred_slots.push(slot_id.into());
        self
    }

    /// Name for reports; falls back to the id.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }

    /// Teacher identity used for clash and workload checks: the trimmed
    /// name, or `None` when it is blank.
    pub fn teacher_id(&self) -> Option<&str> {
        Some(self.teacher.trim()).filter(|t| !t.is_empty())
    }

    /// Whether a teacher is assigned.
    pub fn has_teacher(&self) -> bool {
        self.teacher_id().is_some()
    }

    /// Room, if set and non-blank.
    pub fn room(&self) -> Option<&str> {
        self.room.as_deref().filter(|r| !r.trim().is_empty())
    }

    /// Candidate slots in input order: the preferred list (if any), then
    /// only slots long enough for one session.
    pub fn compatible_slots<'a>(&self, slots: &'a [TimeSlot]) -> Vec<&'a TimeSlot> {
        slots
            .iter()
            .filter(|s| self.preferred_slots.is_empty() || self.preferred_slots.contains(&s.id))
            .filter(|s| s.fits(self.duration))
            .collect()
    }
}
