//! Assignment state passed to priority rules.

use std::collections::{BTreeSet, HashMap};

use crate::models::{Subject, TimeSlot, TimetableConfig, TimetableEntry, Weekday};

/// Snapshot of the configuration and committed entries seen by rules.
#[derive(Debug, Clone, Default)]
pub struct PriorityContext {
    /// All configured slots.
    pub time_slots: Vec<TimeSlot>,
    /// Days each teacher already teaches on (teacher → days).
    pub teacher_days: HashMap<String, BTreeSet<Weekday>>,
    /// Declared weekly load per teacher (teacher → Σ frequency).
    pub teacher_load: HashMap<String, u32>,
}

impl PriorityContext {
    /// Builds a context from a configuration and the entries committed so far.
    pub fn new(config: &TimetableConfig, entries: &[TimetableEntry]) -> Self {
        let mut teacher_days: HashMap<String, BTreeSet<Weekday>> = HashMap::new();
        for entry in entries {
            if let Some(teacher) = entry.teacher() {
                teacher_days.entry(teacher.to_string()).or_default().insert(entry.day);
            }
        }

        let mut teacher_load: HashMap<String, u32> = HashMap::new();
        for subject in &config.subjects {
            if let Some(teacher) = subject.teacher_id() {
                *teacher_load.entry(teacher.to_string()).or_insert(0) += subject.frequency;
            }
        }

        Self {
            time_slots: config.time_slots.clone(),
            teacher_days,
            teacher_load,
        }
    }

    /// Sets the used days of a teacher.
    pub fn with_teacher_days(
        mut self,
        teacher: impl Into<String>,
        days: impl IntoIterator<Item = Weekday>,
    ) -> Self {
        self.teacher_days.insert(teacher.into(), days.into_iter().collect());
        self
    }

    /// Sets the declared load of a teacher.
    pub fn with_teacher_load(mut self, teacher: impl Into<String>, load: u32) -> Self {
        self.teacher_load.insert(teacher.into(), load);
        self
    }

    /// Number of distinct days a teacher already uses.
    pub fn days_used(&self, teacher: &str) -> usize {
        self.teacher_days.get(teacher).map_or(0, BTreeSet::len)
    }

    /// Whether a teacher already teaches on `day`.
    pub fn uses_day(&self, teacher: &str, day: Weekday) -> bool {
        self.teacher_days
            .get(teacher)
            .is_some_and(|days| days.contains(&day))
    }

    /// Declared weekly load of a teacher.
    pub fn load_of(&self, teacher: &str) -> u32 {
        self.teacher_load.get(teacher).copied().unwrap_or(0)
    }

    /// Slots a subject could use.
    pub fn compatible_slots(&self, subject: &Subject) -> Vec<&TimeSlot> {
        subject.compatible_slots(&self.time_slots)
    }
}
