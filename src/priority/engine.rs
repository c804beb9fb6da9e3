//! Rule engine for multi-key subject prioritization.
//!
//! Composes priority rules either lexicographically (primary rule, then
//! tie-breakers) or as a weighted sum.

use std::cmp::Ordering;
use std::sync::Arc;

use super::{rules, PriorityContext, PriorityRule, RuleScore};
use crate::models::Subject;

/// How subject scores from several rules are combined.
#[derive(Debug, Clone, Default)]
pub enum EvaluationMode {
    /// Compare rule by rule; later rules only split ties.
    #[default]
    Sequential,
    /// Order by the weighted sum of rule scores.
    Weighted,
}

/// Ordering of subjects that tie on every rule.
#[derive(Debug, Clone, Default)]
pub enum TieBreaker {
    /// Keep the configuration order (stable sort).
    #[default]
    InputOrder,
    /// Deterministic by subject ID (lexicographic).
    ById,
}

#[derive(Clone)]
struct WeightedRule {
    rule: Arc<dyn PriorityRule>,
    weight: f64,
}

/// A composable rule engine for subject ordering.
///
/// # Example
/// ```
/// use u_timetable::priority::{rules, RuleEngine};
///
/// let engine = RuleEngine::new()
///     .with_rule(rules::CompatibleSlots)
///     .with_tie_breaker(rules::Frequency);
/// assert_eq!(engine.rule_names(), vec!["COMPATIBLE_SLOTS", "FREQUENCY"]);
/// ```
#[derive(Clone)]
pub struct RuleEngine {
    rules: Vec<WeightedRule>,
    mode: EvaluationMode,
    tie_breaker: TieBreaker,
    epsilon: f64,
}

impl RuleEngine {
    /// Creates an engine with no rules (input order).
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            mode: EvaluationMode::Sequential,
            tie_breaker: TieBreaker::InputOrder,
            epsilon: 1e-9,
        }
    }

    /// The day-distribution chain used by the generator by default:
    ///
    /// 1. fewer days already used by the teacher
    /// 2. lower declared teacher load
    /// 3. more compatible slots on days the teacher has not used
    /// 4. fewer compatible slots overall
    /// 5. higher frequency
    pub fn day_distribution() -> Self {
        Self::new()
            .with_rule(rules::TeacherDaysUsed)
            .with_tie_breaker(rules::TeacherLoad)
            .with_tie_breaker(rules::FreshDaySlots)
            .with_tie_breaker(rules::CompatibleSlots)
            .with_tie_breaker(rules::Frequency)
    }

    /// Appends a rule with weight 1.0.
    pub fn with_rule<R: PriorityRule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(WeightedRule {
            rule: Arc::new(rule),
            weight: 1.0,
        });
        self
    }

    /// Appends a rule with an explicit weight.
    pub fn with_weighted_rule<R: PriorityRule + 'static>(mut self, rule: R, weight: f64) -> Self {
        self.rules.push(WeightedRule {
            rule: Arc::new(rule),
            weight,
        });
        self
    }

    /// Appends a rule that only splits ties (ignored in Weighted mode).
    pub fn with_tie_breaker<R: PriorityRule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(WeightedRule {
            rule: Arc::new(rule),
            weight: 0.0,
        });
        self
    }

    /// Chooses sequential or weighted combination.
    pub fn with_mode(mut self, mode: EvaluationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Chooses how subjects tying on every rule are ordered.
    pub fn with_final_tie_breaker(mut self, tie_breaker: TieBreaker) -> Self {
        self.tie_breaker = tie_breaker;
        self
    }

    /// Names of the configured rules, in evaluation order.
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.rule.name()).collect()
    }

    /// Sorts subjects by priority (highest priority first).
    ///
    /// Returns indices into the original slice. The sort is stable.
    pub fn sort_indices(&self, subjects: &[Subject], context: &PriorityContext) -> Vec<usize> {
        if subjects.is_empty() {
            return Vec::new();
        }

        let mut indices: Vec<usize> = (0..subjects.len()).collect();

        match &self.mode {
            EvaluationMode::Sequential => {
                indices.sort_by(|&a, &b| self.compare_sequential(&subjects[a], &subjects[b], context));
            }
            EvaluationMode::Weighted => {
                let scores: Vec<f64> = subjects
                    .iter()
                    .map(|s| self.weighted_score(s, context))
                    .collect();
                indices.sort_by(|&a, &b| {
                    scores[a]
                        .partial_cmp(&scores[b])
                        .unwrap_or(Ordering::Equal)
                        .then_with(|| self.final_tie(&subjects[a], &subjects[b]))
                });
            }
        }

        indices
    }

    /// Returns the index of the highest-priority subject.
    pub fn select_best(&self, subjects: &[Subject], context: &PriorityContext) -> Option<usize> {
        self.sort_indices(subjects, context).first().copied()
    }

    /// Evaluates a single subject and returns the weighted score of each rule.
    pub fn evaluate(&self, subject: &Subject, context: &PriorityContext) -> Vec<RuleScore> {
        self.rules
            .iter()
            .map(|wr| wr.rule.evaluate(subject, context) * wr.weight)
            .collect()
    }

    fn compare_sequential(&self, a: &Subject, b: &Subject, context: &PriorityContext) -> Ordering {
        for wr in &self.rules {
            let score_a = wr.rule.evaluate(a, context);
            let score_b = wr.rule.evaluate(b, context);

            if (score_a - score_b).abs() > self.epsilon {
                return score_a.partial_cmp(&score_b).unwrap_or(Ordering::Equal);
            }
        }

        self.final_tie(a, b)
    }

    fn final_tie(&self, a: &Subject, b: &Subject) -> Ordering {
        match &self.tie_breaker {
            TieBreaker::InputOrder => Ordering::Equal,
            TieBreaker::ById => a.id.cmp(&b.id),
        }
    }

    fn weighted_score(&self, subject: &Subject, context: &PriorityContext) -> f64 {
        self.rules
            .iter()
            .map(|wr| wr.rule.evaluate(subject, context) * wr.weight)
            .sum()
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::day_distribution()
    }
}

impl std::fmt::Debug for RuleEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleEngine")
            .field(
                "rules",
                &self
                    .rules
                    .iter()
                    .map(|r| format!("{}(w={})", r.rule.name(), r.weight))
                    .collect::<Vec<_>>(),
            )
            .field("mode", &self.mode)
            .field("tie_breaker", &self.tie_breaker)
            .finish()
    }
}
