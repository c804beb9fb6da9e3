//! Built-in priority rules.
//!
//! # Categories
//!
//! - **Teacher spread**: TEACHER_DAYS_USED, TEACHER_LOAD, FRESH_DAY_SLOTS
//! - **Constrainedness**: COMPATIBLE_SLOTS
//! - **Demand**: FREQUENCY
//!
//! # Score Convention
//! All rules return lower scores for higher priority subjects.

use super::{PriorityContext, PriorityRule, RuleScore};
use crate::models::Subject;

// ======================== Teacher spread ========================

/// Fewest days already used by the subject's teacher.
///
/// Teachers who have not been placed anywhere yet go first, so their
/// sessions can claim distinct days.
#[derive(Debug, Clone, Copy)]
pub struct TeacherDaysUsed;

impl PriorityRule for TeacherDaysUsed {
    fn name(&self) -> &'static str {
        "TEACHER_DAYS_USED"
    }

    fn evaluate(&self, subject: &Subject, context: &PriorityContext) -> RuleScore {
        context.days_used(subject.teacher_id().unwrap_or_default()) as f64
    }

    fn description(&self) -> &'static str {
        "Fewest Teacher Days Used"
    }
}

/// Lowest declared weekly load of the subject's teacher.
#[derive(Debug, Clone, Copy)]
pub struct TeacherLoad;

impl PriorityRule for TeacherLoad {
    fn name(&self) -> &'static str {
        "TEACHER_LOAD"
    }

    fn evaluate(&self, subject: &Subject, context: &PriorityContext) -> RuleScore {
        context.load_of(subject.teacher_id().unwrap_or_default()) as f64
    }

    fn description(&self) -> &'static str {
        "Lowest Teacher Load"
    }
}

/// Most compatible slots on days the teacher has not used yet.
#[derive(Debug, Clone, Copy)]
pub struct FreshDaySlots;

impl PriorityRule for FreshDaySlots {
    fn name(&self) -> &'static str {
        "FRESH_DAY_SLOTS"
    }

    fn evaluate(&self, subject: &Subject, context: &PriorityContext) -> RuleScore {
        let fresh = context
            .compatible_slots(subject)
            .iter()
            .filter(|slot| !context.uses_day(subject.teacher_id().unwrap_or_default(), slot.day))
            .count();
        -(fresh as f64)
    }

    fn description(&self) -> &'static str {
        "Most Slots On Unused Days"
    }
}

// ======================== Constrainedness ========================

/// Fewest compatible slots (most constrained subject first).
#[derive(Debug, Clone, Copy)]
pub struct CompatibleSlots;

impl PriorityRule for CompatibleSlots {
    fn name(&self) -> &'static str {
        "COMPATIBLE_SLOTS"
    }

    fn evaluate(&self, subject: &Subject, context: &PriorityContext) -> RuleScore {
        context.compatible_slots(subject).len() as f64
    }

    fn description(&self) -> &'static str {
        "Fewest Compatible Slots"
    }
}

// ======================== Demand ========================

/// Highest weekly frequency.
#[derive(Debug, Clone, Copy)]
pub struct Frequency;

impl PriorityRule for Frequency {
    fn name(&self) -> &'static str {
        "FREQUENCY"
    }

    fn evaluate(&self, subject: &Subject, _context: &PriorityContext) -> RuleScore {
        -(subject.frequency as f64)
    }

    fn description(&self) -> &'static str {
        "Highest Frequency"
    }
}
