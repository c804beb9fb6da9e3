//! Configuration and generated timetable models.
//!
//! `TimetableConfig` is the immutable input of one generation run;
//! `GeneratedTimetable` is its result.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{Conflict, Subject, TimeSlot, TimetableEntry, Weekday};
use crate::error::Result;

/// Default maximum number of sessions one teacher may give per week.
pub const DEFAULT_MAX_WEEKLY_SESSIONS: usize = 3;

/// Tunable scheduling limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SchedulingPolicy {
    /// Workload cap: sessions per teacher per week.
    pub max_weekly_sessions: usize,
}

impl Default for SchedulingPolicy {
    fn default() -> Self {
        Self {
            max_weekly_sessions: DEFAULT_MAX_WEEKLY_SESSIONS,
        }
    }
}

impl SchedulingPolicy {
    /// Sets the workload cap.
    pub fn with_max_weekly_sessions(mut self, cap: usize) -> Self {
        self.max_weekly_sessions = cap;
        self
    }
}

/// Input of a generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableConfig {
    /// Subjects to place.
    #[serde(default)]
    pub subjects: Vec<Subject>,
    /// Available weekly slots.
    #[serde(default)]
    pub time_slots: Vec<TimeSlot>,
    /// Limits applied by validation, generation and editing.
    #[serde(default)]
    pub policy: SchedulingPolicy,
}

impl TimetableConfig {
    /// Creates a configuration with the default policy.
    pub fn new(subjects: Vec<Subject>, time_slots: Vec<TimeSlot>) -> Self {
        Self {
            subjects,
            time_slots,
            policy: SchedulingPolicy::default(),
        }
    }

    /// Creates a configuration on the default week of slots.
    pub fn with_default_slots(subjects: Vec<Subject>) -> Self {
        Self::new(subjects, TimeSlot::default_week())
    }

    /// Sets the policy.
    pub fn with_policy(mut self, policy: SchedulingPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Parses a camelCase JSON configuration.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a camelCase JSON configuration from disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// Looks up a subject by id.
    pub fn subject(&self, id: &str) -> Option<&Subject> {
        self.subjects.iter().find(|s| s.id == id)
    }

    /// Total required occurrences (Σ frequency).
    pub fn total_occurrences(&self) -> u32 {
        self.subjects.iter().map(|s| s.frequency).sum()
    }

    /// Declared weekly load for a teacher (Σ frequency of their subjects).
    pub fn teacher_load(&self, teacher: &str) -> u32 {
        self.subjects
            .iter()
            .filter(|s| s.teacher_id() == Some(teacher.trim()))
            .map(|s| s.frequency)
            .sum()
    }
}

/// Result of a generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedTimetable {
    /// Committed entries, in commit order.
    pub entries: Vec<TimetableEntry>,
    /// One conflict per unplaced occurrence.
    pub conflicts: Vec<Conflict>,
    /// `true` iff no conflicts and 100% completion.
    pub success: bool,
    /// Placed occurrences / required occurrences × 100.
    pub completion_rate: f64,
}

impl GeneratedTimetable {
    /// Builds the result and derives `completion_rate` and `success`.
    ///
    /// Zero required occurrences count as fully complete.
    pub fn from_parts(entries: Vec<TimetableEntry>, conflicts: Vec<Conflict>, required: u32) -> Self {
        let completion_rate = completion_rate(entries.len(), required);
        let success = conflicts.is_empty() && completion_rate == 100.0;
        Self {
            entries,
            conflicts,
            success,
            completion_rate,
        }
    }

    /// Entries on a given day, ordered by start time.
    pub fn entries_on(&self, day: Weekday) -> Vec<&TimetableEntry> {
        let mut entries: Vec<&TimetableEntry> = self.entries.iter().filter(|e| e.day == day).collect();
        entries.sort_by_key(|e| e.start_time);
        entries
    }

    /// Entries taught by a teacher.
    pub fn entries_for_teacher(&self, teacher: &str) -> Vec<&TimetableEntry> {
        self.entries.iter().filter(|e| e.teacher_id == teacher).collect()
    }

    /// Entries of a subject.
    pub fn entries_for_subject(&self, subject_id: &str) -> Vec<&TimetableEntry> {
        self.entries.iter().filter(|e| e.subject_id == subject_id).collect()
    }

    /// Distinct days a teacher teaches on, in calendar order.
    pub fn teacher_days(&self, teacher: &str) -> BTreeSet<Weekday> {
        self.entries_for_teacher(teacher).iter().map(|e| e.day).collect()
    }

    /// Number of committed entries.
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }
}

fn completion_rate(placed: usize, required: u32) -> f64 {
    if required == 0 {
        return 100.0;
    }
    placed as f64 * 100.0 / required as f64
}
