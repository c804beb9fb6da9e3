//! Subject prioritization rules and rule engine.
//!
//! Decides the order in which the generator visits subjects. The default
//! chain favours teachers with few used days and light declared load, then
//! subjects with many free-day slots, then the most constrained subjects,
//! then the most frequent ones.
//!
//! # Usage
//!
//! ```
//! use u_timetable::priority::{rules, PriorityContext, RuleEngine};
//! use u_timetable::models::{Subject, TimetableConfig};
//!
//! let config = TimetableConfig::with_default_slots(vec![
//!     Subject::new("M").with_teacher("A").with_frequency(1),
//!     Subject::new("P").with_teacher("B").with_frequency(2),
//! ]);
//!
//! let engine = RuleEngine::new()
//!     .with_rule(rules::TeacherLoad)
//!     .with_tie_breaker(rules::Frequency);
//!
//! let context = PriorityContext::new(&config, &[]);
//! let order = engine.sort_indices(&config.subjects, &context);
//! assert_eq!(order, vec![0, 1]);
//! ```
//!
//! Any other ordering strategy can be plugged into the generator by
//! building a different [`RuleEngine`] or implementing [`PriorityRule`].

mod context;
mod engine;
pub mod rules;

pub use context::PriorityContext;
pub use engine::{EvaluationMode, RuleEngine, TieBreaker};

use crate::models::Subject;
use std::fmt::Debug;

/// Score returned by a priority rule.
///
/// Lower scores = higher priority (placed first).
pub type RuleScore = f64;

/// A rule that scores how urgently a subject should be placed.
///
/// # Score Convention
/// **Lower score = higher priority.** Rules return smaller values for
/// subjects that should be visited first.
pub trait PriorityRule: Send + Sync + Debug {
    /// Short rule name.
    fn name(&self) -> &'static str;

    /// Scores a subject against the current assignment state.
    fn evaluate(&self, subject: &Subject, context: &PriorityContext) -> RuleScore;

    /// Rule description.
    fn description(&self) -> &'static str {
        self.name()
    }
}
