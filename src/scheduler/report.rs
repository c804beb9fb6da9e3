//! Conflict records for unplaced occurrences.
//!
//! Picks the dominant category and the remedies to suggest from the
//! violation categories seen across all rejected candidate slots.

use std::collections::BTreeSet;

use crate::models::{Conflict, ConflictType, SlotRejection, SlotViolation, Subject, Suggestion, Weekday};

/// Builds the conflict for one occurrence that found no usable slot.
pub fn unplaced_occurrence(
    subject: &Subject,
    occurrence: u32,
    teacher_days: BTreeSet<Weekday>,
    rejections: Vec<SlotRejection>,
) -> Conflict {
    Conflict {
        kind: dominant_kind(&rejections),
        subject_id: subject.id.clone(),
        subject_name: subject.display_name().to_string(),
        teacher: subject.teacher_id().unwrap_or_default().to_string(),
        occurrence,
        required: subject.frequency,
        teacher_days: teacher_days.into_iter().collect(),
        suggestions: suggestions(subject, &rejections),
        rejections,
        affected_entries: Vec::new(),
    }
}

/// Workload beats teacher clashes beats room clashes beats plain occupancy.
fn dominant_kind(rejections: &[SlotRejection]) -> ConflictType {
    const PRECEDENCE: [ConflictType; 4] = [
        ConflictType::WorkloadViolation,
        ConflictType::TeacherConflict,
        ConflictType::RoomConflict,
        ConflictType::TimeConflict,
    ];

    let seen: Vec<ConflictType> = rejections
        .iter()
        .flat_map(|r| r.violations.iter())
        .map(SlotViolation::category)
        .collect();

    PRECEDENCE
        .into_iter()
        .find(|kind| seen.contains(kind))
        .unwrap_or(ConflictType::NoCompatibleSlot)
}

fn suggestions(subject: &Subject, rejections: &[SlotRejection]) -> Vec<Suggestion> {
    let mut out: Vec<Suggestion> = Vec::new();
    let mut push = |s: Suggestion| {
        if !out.contains(&s) {
            out.push(s);
        }
    };

    if rejections.is_empty() {
        if !subject.preferred_slots.is_empty() {
            push(Suggestion::RelaxPreferredSlots);
        }
        push(Suggestion::ExtendSlotDuration);
        return out;
    }

    let has = |kind: ConflictType| {
        rejections
            .iter()
            .flat_map(|r| r.violations.iter())
            .any(|v| v.category() == kind)
    };

    if has(ConflictType::WorkloadViolation) {
        push(Suggestion::RebalanceTeachers);
        push(Suggestion::AssignDifferentTeacher);
    }
    if has(ConflictType::TeacherConflict) {
        push(Suggestion::AssignDifferentTeacher);
    }
    if has(ConflictType::NoCompatibleSlot) {
        push(Suggestion::ExtendSlotDuration);
    }
    if has(ConflictType::TimeConflict) || has(ConflictType::RoomConflict) {
        push(Suggestion::AddTimeSlots);
        if subject.frequency > 1 {
            push(Suggestion::ReduceFrequency);
        }
    }
    if !subject.preferred_slots.is_empty() {
        push(Suggestion::RelaxPreferredSlots);
    }
    out
}
