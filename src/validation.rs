//! Configuration validation for timetable generation.
//!
//! Checks structural feasibility of subjects and time slots before
//! generation. Produces:
//! - **errors**, which block generation (no subjects, no slots, missing
//!   teacher, workload over the cap, no slot long enough, malformed data)
//! - **warnings**, which are advisory (teacher exactly at the cap,
//!   same-day doubling likely, room demand above room supply)
//!
//! All rules run; only "no subjects" and "no time slots" return early
//! because nothing else can be meaningfully checked.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{TimetableConfig, Weekday};

/// Outcome of [`validate_configuration`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    /// `true` iff `errors` is empty.
    pub is_valid: bool,
    /// Blocking issues.
    pub errors: Vec<ValidationIssue>,
    /// Advisory issues.
    pub warnings: Vec<ValidationIssue>,
}

/// A single validation finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Issue category.
    pub kind: ValidationIssueKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValidationIssueKind {
    /// The configuration has no subjects.
    NoSubjects,
    /// The configuration has no time slots.
    NoTimeSlots,
    /// A subject has no teacher.
    MissingTeacher,
    /// A teacher's declared load exceeds the weekly cap.
    WorkloadExceeded,
    /// No slot is long enough for a subject's sessions.
    DurationMismatch,
    /// Two subjects or two slots share an id.
    DuplicateId,
    /// A slot does not end after it starts.
    InvalidTimeSlot,
    /// A subject requires zero sessions.
    InvalidFrequency,
    /// A teacher's declared load equals the weekly cap.
    WorkloadAtCapacity,
    /// A subject needs more sessions than it has usable days.
    SchedulingRisk,
    /// A shared room is demanded more often than the week offers.
    RoomConflictRisk,
}

impl ValidationIssue {
    fn new(kind: ValidationIssueKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl ValidationReport {
    fn from_issues(errors: Vec<ValidationIssue>, warnings: Vec<ValidationIssue>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
            warnings,
        }
    }

    /// Whether an error of `kind` was reported.
    pub fn has_error(&self, kind: ValidationIssueKind) -> bool {
        self.errors.iter().any(|e| e.kind == kind)
    }

    /// Whether a warning of `kind` was reported.
    pub fn has_warning(&self, kind: ValidationIssueKind) -> bool {
        self.warnings.iter().any(|w| w.kind == kind)
    }
}

/// Validates a configuration before generation.
///
/// Checks, in order:
/// 1. At least one subject (fatal, returns immediately)
/// 2. At least one time slot (fatal, returns immediately)
/// 3. Every subject has a teacher
/// 4. Declared load per teacher vs. the workload cap (error above, warning at)
/// 5. Every subject fits in at least one slot
/// 6. Every subject has as many usable days as sessions (warning)
/// 7. Shared rooms have enough weekly capacity (warning)
/// 8. Ids are unique, slots end after they start, frequencies are ≥ 1
pub fn validate_configuration(config: &TimetableConfig) -> ValidationReport {
    if config.subjects.is_empty() {
        return ValidationReport::from_issues(
            vec![ValidationIssue::new(
                ValidationIssueKind::NoSubjects,
                "No subjects configured. Add at least one subject before generating a timetable.",
            )],
            Vec::new(),
        );
    }
    if config.time_slots.is_empty() {
        return ValidationReport::from_issues(
            vec![ValidationIssue::new(
                ValidationIssueKind::NoTimeSlots,
                "No time slots configured. Add time slots before generating a timetable.",
            )],
            Vec::new(),
        );
    }

    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let cap = config.policy.max_weekly_sessions;

    // Teachers
    for subject in config.subjects.iter().filter(|s| !s.has_teacher()) {
        errors.push(ValidationIssue::new(
            ValidationIssueKind::MissingTeacher,
            format!("Subject '{}' has no teacher assigned.", subject.display_name()),
        ));
    }

    // Declared workload per teacher
    let mut load: BTreeMap<&str, usize> = BTreeMap::new();
    for subject in &config.subjects {
        if let Some(teacher) = subject.teacher_id() {
            *load.entry(teacher).or_insert(0) += subject.frequency as usize;
        }
    }
    for (teacher, total) in &load {
        if *total > cap {
            errors.push(ValidationIssue::new(
                ValidationIssueKind::WorkloadExceeded,
                format!(
                    "Teacher {teacher} is assigned {total} sessions per week, which would exceed {cap} slots/week."
                ),
            ));
        } else if *total == cap {
            warnings.push(ValidationIssue::new(
                ValidationIssueKind::WorkloadAtCapacity,
                format!(
                    "Teacher {teacher} is at full capacity ({total}/{cap} slots/week); no room is left for additional sessions."
                ),
            ));
        }
    }

    // Slot length
    for subject in &config.subjects {
        if !config.time_slots.iter().any(|s| s.fits(subject.duration)) {
            let longest = config
                .time_slots
                .iter()
                .map(|s| s.duration_minutes())
                .max()
                .unwrap_or(0);
            errors.push(ValidationIssue::new(
                ValidationIssueKind::DurationMismatch,
                format!(
                    "Subject '{}' needs {} min sessions but the longest time slot is {} min.",
                    subject.display_name(),
                    subject.duration,
                    longest
                ),
            ));
        }
    }

    // Same-day doubling risk
    for subject in &config.subjects {
        let usable_days: BTreeSet<Weekday> = config
            .time_slots
            .iter()
            .filter(|s| s.fits(subject.duration))
            .map(|s| s.day)
            .collect();
        if subject.frequency as usize > usable_days.len() {
            warnings.push(ValidationIssue::new(
                ValidationIssueKind::SchedulingRisk,
                format!(
                    "Subject '{}' needs {} sessions but only {} day(s) have a suitable slot; some sessions will likely share a day.",
                    subject.display_name(),
                    subject.frequency,
                    usable_days.len()
                ),
            ));
        }
    }

    // Shared rooms
    let mut room_demand: BTreeMap<&str, (usize, u32)> = BTreeMap::new();
    for subject in &config.subjects {
        if let Some(room) = subject.room() {
            let slot = room_demand.entry(room).or_insert((0, 0));
            slot.0 += 1;
            slot.1 += subject.frequency;
        }
    }
    let reference_day = config.time_slots[0].day;
    let slots_per_day = config
        .time_slots
        .iter()
        .filter(|s| s.day == reference_day)
        .count();
    let days: BTreeSet<Weekday> = config.time_slots.iter().map(|s| s.day).collect();
    let room_supply = slots_per_day * days.len();
    for (room, (subjects, demand)) in &room_demand {
        if *subjects > 1 && *demand as usize > room_supply {
            warnings.push(ValidationIssue::new(
                ValidationIssueKind::RoomConflictRisk,
                format!(
                    "Room {room} is requested for {demand} sessions by {subjects} subjects but only {room_supply} slots are available per week."
                ),
            ));
        }
    }

    // Structural integrity
    let mut subject_ids = HashSet::new();
    for subject in &config.subjects {
        if !subject_ids.insert(subject.id.as_str()) {
            errors.push(ValidationIssue::new(
                ValidationIssueKind::DuplicateId,
                format!("Duplicate subject ID: {}", subject.id),
            ));
        }
        if subject.frequency == 0 {
            errors.push(ValidationIssue::new(
                ValidationIssueKind::InvalidFrequency,
                format!(
                    "Subject '{}' must have at least one session per week.",
                    subject.display_name()
                ),
            ));
        }
    }
    let mut slot_ids = HashSet::new();
    for slot in &config.time_slots {
        if !slot_ids.insert(slot.id.as_str()) {
            errors.push(ValidationIssue::new(
                ValidationIssueKind::DuplicateId,
                format!("Duplicate time slot ID: {}", slot.id),
            ));
        }
        if slot.end_time <= slot.start_time {
            errors.push(ValidationIssue::new(
                ValidationIssueKind::InvalidTimeSlot,
                format!("Time slot '{}' ({}) does not end after it starts.", slot.id, slot.label()),
            ));
        }
    }

    debug!(
        errors = errors.len(),
        warnings = warnings.len(),
        "configuration validated"
    );
    ValidationReport::from_issues(errors, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Subject, TimeSlot};

    fn slot(id: &str, day: Weekday, start: &str, end: &str) -> TimeSlot {
        TimeSlot::parse(id, day, start, end).unwrap()
    }

    fn week() -> Vec<TimeSlot> {
        TimeSlot::default_week()
    }

    fn subject(id: &str, teacher: &str, frequency: u32) -> Subject {
        Subject::new(id)
            .with_name(id)
            .with_teacher(teacher)
            .with_frequency(frequency)
            .with_duration(50)
    }

    #[test]
    fn test_valid_configuration() {
        let config = TimetableConfig::new(vec![subject("M", "A", 2), subject("P", "B", 1)], week());
        let report = validate_configuration(&config);
        assert!(report.is_valid);
        assert!(report.errors.is_empty());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_no_subjects_short_circuits() {
        let config = TimetableConfig::new(Vec::new(), Vec::new());
        let report = validate_configuration(&config);
        assert!(!report.is_valid);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].kind, ValidationIssueKind::NoSubjects);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_no_time_slots_short_circuits() {
        // Missing teacher would also be an error, but must not be reported
        let config = TimetableConfig::new(vec![Subject::new("X")], Vec::new());
        let report = validate_configuration(&config);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].kind, ValidationIssueKind::NoTimeSlots);
    }

    #[test]
    fn test_missing_teacher_per_subject() {
        let config = TimetableConfig::new(
            vec![Subject::new("X"), Subject::new("Y").with_teacher(" "), subject("Z", "A", 1)],
            week(),
        );
        let report = validate_configuration(&config);
        let missing: Vec<_> = report
            .errors
            .iter()
            .filter(|e| e.kind == ValidationIssueKind::MissingTeacher)
            .collect();
        assert_eq!(missing.len(), 2);
    }

    #[test]
    fn test_workload_exceeded_names_teacher_and_total() {
        let config = TimetableConfig::new(vec![subject("M", "T1", 4)], week());
        let report = validate_configuration(&config);
        assert!(!report.is_valid);
        let err = report
            .errors
            .iter()
            .find(|e| e.kind == ValidationIssueKind::WorkloadExceeded)
            .unwrap();
        assert!(err.message.contains("Teacher T1"));
        assert!(err.message.contains('4'));
        assert!(err.message.contains("exceed 3 slots/week"));
    }

    #[test]
    fn test_workload_summed_across_subjects() {
        let config = TimetableConfig::new(
            vec![subject("M", "A", 2), subject("P", "A", 2), subject("C", "B", 3)],
            week(),
        );
        let report = validate_configuration(&config);
        assert_eq!(
            report
                .errors
                .iter()
                .filter(|e| e.kind == ValidationIssueKind::WorkloadExceeded)
                .count(),
            1
        );
        assert!(report.errors[0].message.contains("Teacher A is assigned 4"));
        // B at exactly the cap → warning only
        assert!(report.has_warning(ValidationIssueKind::WorkloadAtCapacity));
    }

    #[test]
    fn test_custom_policy_cap() {
        let config = TimetableConfig::new(vec![subject("M", "A", 4)], week())
            .with_policy(crate::models::SchedulingPolicy::default().with_max_weekly_sessions(5));
        let report = validate_configuration(&config);
        assert!(report.is_valid);
    }

    #[test]
    fn test_large_policy_cap_is_not_truncated() {
        let config = TimetableConfig::new(vec![subject("M", "A", 1)], week()).with_policy(
            crate::models::SchedulingPolicy::default().with_max_weekly_sessions(1usize << 32),
        );
        let report = validate_configuration(&config);
        assert!(report.is_valid);
        assert!(!report.has_error(ValidationIssueKind::WorkloadExceeded));
        assert!(!report.has_warning(ValidationIssueKind::WorkloadAtCapacity));
    }

    #[test]
    fn test_workload_keyed_by_trimmed_teacher() {
        let config =
            TimetableConfig::new(vec![subject("M", "A", 2), subject("P", " A ", 2)], week());
        let report = validate_configuration(&config);
        assert!(report.has_error(ValidationIssueKind::WorkloadExceeded));
        assert!(report.errors[0].message.contains("Teacher A is assigned 4"));
    }

    #[test]
    fn test_duration_mismatch() {
        let config = TimetableConfig::new(vec![subject("LAB", "A", 1).with_duration(90)], week());
        let report = validate_configuration(&config);
        assert!(report.has_error(ValidationIssueKind::DurationMismatch));
        assert!(report.errors[0].message.contains("50 min"));
    }

    #[test]
    fn test_scheduling_risk_warning() {
        let slots = vec![
            slot("a", Weekday::Monday, "08:30", "09:20"),
            slot("b", Weekday::Monday, "09:20", "10:10"),
        ];
        let config = TimetableConfig::new(vec![subject("M", "A", 2)], slots);
        let report = validate_configuration(&config);
        assert!(report.is_valid);
        assert!(report.has_warning(ValidationIssueKind::SchedulingRisk));
    }

    #[test]
    fn test_room_conflict_risk() {
        // One day with two slots → supply 2; shared room demand 3
        let slots = vec![
            slot("a", Weekday::Monday, "08:30", "09:20"),
            slot("b", Weekday::Monday, "09:20", "10:10"),
        ];
        let config = TimetableConfig::new(
            vec![
                subject("M", "A", 2).with_room("LAB"),
                subject("P", "B", 1).with_room("LAB"),
            ],
            slots,
        );
        let report = validate_configuration(&config);
        assert!(report.has_warning(ValidationIssueKind::RoomConflictRisk));
        assert!(report.is_valid);
    }

    #[test]
    fn test_single_subject_room_not_checked() {
        let slots = vec![slot("a", Weekday::Monday, "08:30", "09:20")];
        let config = TimetableConfig::new(vec![subject("M", "A", 2).with_room("LAB")], slots);
        let report = validate_configuration(&config);
        assert!(!report.has_warning(ValidationIssueKind::RoomConflictRisk));
    }

    #[test]
    fn test_structural_errors() {
        let slots = vec![
            slot("a", Weekday::Monday, "08:30", "09:20"),
            slot("a", Weekday::Monday, "10:00", "09:00"),
        ];
        let config = TimetableConfig::new(
            vec![subject("M", "A", 1), subject("M", "B", 0)],
            slots,
        );
        let report = validate_configuration(&config);
        assert!(report.has_error(ValidationIssueKind::DuplicateId));
        assert!(report.has_error(ValidationIssueKind::InvalidTimeSlot));
        assert!(report.has_error(ValidationIssueKind::InvalidFrequency));
        assert!(report.errors.len() >= 4);
    }
}
