//! Greedy day-distributing timetable generator.
//!
//! # Algorithm
//!
//! 1. Order subjects once with the rule engine (default: day distribution).
//! 2. For each subject, make `frequency` independent placement attempts.
//! 3. Each attempt filters compatible slots, moves slots on days the
//!    teacher has not used yet to the front, and commits the first slot
//!    with no detected conflict.
//! 4. An attempt with no usable slot records one conflict and is dropped.
//!    Earlier decisions are never revisited.
//!
//! # Complexity
//! O(s * f * t * e) where s=subjects, f=frequency, t=slots, e=committed entries.

use tracing::{debug, info, warn};

use super::conflicts::{order_by_day_distribution, teacher_days, ConflictDetector};
use super::report;
use crate::error::{Result, TimetableError};
use crate::models::{
    Conflict, GeneratedTimetable, SlotRejection, Subject, TimetableConfig, TimetableEntry,
};
use crate::priority::{PriorityContext, RuleEngine};
use crate::validation::validate_configuration;

/// Greedy single-pass timetable generator.
///
/// Holds only the ordering strategy; every call to [`generate`](Self::generate)
/// starts from empty scratch state, so repeated calls on the same
/// configuration produce the same placements.
///
/// # Example
///
/// ```
/// use u_timetable::models::{Subject, TimeSlot, TimetableConfig, Weekday};
/// use u_timetable::scheduler::TimetableGenerator;
///
/// let config = TimetableConfig::new(
///     vec![Subject::new("MATH").with_name("Math").with_teacher("A").with_duration(50)],
///     vec![TimeSlot::parse("mon-1", Weekday::Monday, "08:30", "09:20").unwrap()],
/// );
///
/// let timetable = TimetableGenerator::new().generate(&config);
/// assert_eq!(timetable.entry_count(), 1);
/// assert_eq!(timetable.entries[0].teacher_id, "A");
/// assert!(timetable.success);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TimetableGenerator {
    rule_engine: RuleEngine,
}

/// Scratch state of one generation run.
#[derive(Debug, Default)]
struct GenerationState {
    entries: Vec<TimetableEntry>,
    conflicts: Vec<Conflict>,
}

impl TimetableGenerator {
    /// Creates a generator with the day-distribution ordering.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the subject ordering strategy.
    pub fn with_rule_engine(mut self, engine: RuleEngine) -> Self {
        self.rule_engine = engine;
        self
    }

    /// The active ordering strategy.
    pub fn rule_engine(&self) -> &RuleEngine {
        &self.rule_engine
    }

    /// Generates a timetable without validating the configuration first.
    pub fn generate(&self, config: &TimetableConfig) -> GeneratedTimetable {
        info!(
            subjects = config.subjects.len(),
            time_slots = config.time_slots.len(),
            required = config.total_occurrences(),
            "generating timetable"
        );

        let order = self.subject_order(config);
        let detector = ConflictDetector::new(config);
        let mut state = GenerationState::default();

        for idx in order {
            let subject = &config.subjects[idx];
            for occurrence in 1..=subject.frequency {
                state.place_occurrence(subject, occurrence, config, &detector);
            }
        }

        let timetable = GeneratedTimetable::from_parts(
            state.entries,
            state.conflicts,
            config.total_occurrences(),
        );
        info!(
            entries = timetable.entries.len(),
            conflicts = timetable.conflicts.len(),
            completion_rate = timetable.completion_rate,
            success = timetable.success,
            "timetable generated"
        );
        timetable
    }

    /// Validates the configuration, then generates.
    ///
    /// # Errors
    /// [`TimetableError::InvalidConfiguration`] carrying the full report when
    /// validation finds any error. Warnings do not block generation.
    pub fn generate_validated(&self, config: &TimetableConfig) -> Result<GeneratedTimetable> {
        let report = validate_configuration(config);
        if !report.is_valid {
            warn!(errors = report.errors.len(), "configuration rejected");
            return Err(TimetableError::InvalidConfiguration(report));
        }
        for warning in &report.warnings {
            debug!(kind = ?warning.kind, "{}", warning.message);
        }
        Ok(self.generate(config))
    }

    /// Subject indices in visiting order, computed once against an empty
    /// assignment.
    fn subject_order(&self, config: &TimetableConfig) -> Vec<usize> {
        let context = PriorityContext::new(config, &[]);
        self.rule_engine.sort_indices(&config.subjects, &context)
    }
}

impl GenerationState {
    fn place_occurrence(
        &mut self,
        subject: &Subject,
        occurrence: u32,
        config: &TimetableConfig,
        detector: &ConflictDetector<'_>,
    ) {
        let teacher = subject.teacher_id().unwrap_or_default();
        let candidates = order_by_day_distribution(
            subject.compatible_slots(&config.time_slots),
            teacher,
            &self.entries,
        );

        let mut rejections = Vec::new();
        for slot in candidates {
            let violations = detector.detect(subject, slot, &self.entries);
            if violations.is_empty() {
                debug!(
                    subject = %subject.id,
                    occurrence,
                    slot = %slot.id,
                    "occurrence placed"
                );
                self.entries.push(TimetableEntry::place(subject, slot));
                return;
            }
            rejections.push(SlotRejection {
                slot_id: slot.id.clone(),
                slot_label: slot.label(),
                violations,
            });
        }

        let conflict = report::unplaced_occurrence(
            subject,
            occurrence,
            teacher_days(teacher, &self.entries),
            rejections,
        );
        warn!(
            subject = %subject.id,
            occurrence,
            kind = %conflict.kind,
            "occurrence could not be placed"
        );
        self.conflicts.push(conflict);
    }
}
