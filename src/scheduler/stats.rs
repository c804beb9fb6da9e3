//! Timetable quality metrics.
//!
//! Computes summary indicators from a generated timetable and the
//! configuration it was generated from.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Required | Σ subject frequency |
//! | Placed | Committed entries |
//! | Dropped | Recorded conflicts |
//! | Sessions per teacher | Entries grouped by entry teacher (blank skipped) |
//! | Days per teacher | Distinct days per entry teacher |
//! | Sessions per day | Entries grouped by weekday |
//! | Slot utilization | Slots hosting an entry / configured slots |

use std::collections::{BTreeMap, BTreeSet};

use crate::models::{GeneratedTimetable, TimetableConfig, Weekday};

/// Timetable performance indicators.
#[derive(Debug, Clone, PartialEq)]
pub struct TimetableStats {
    /// Required occurrences.
    pub required: u32,
    /// Placed occurrences.
    pub placed: usize,
    /// Dropped occurrences (one per conflict).
    pub dropped: usize,
    /// Sessions per teacher.
    pub sessions_by_teacher: BTreeMap<String, usize>,
    /// Distinct teaching days per teacher.
    pub days_by_teacher: BTreeMap<String, usize>,
    /// Sessions per weekday (every weekday present, possibly 0).
    pub sessions_by_day: BTreeMap<Weekday, usize>,
    /// Fraction of configured slots hosting at least one entry (0.0..1.0).
    pub slot_utilization: f64,
}

impl TimetableStats {
    /// Computes statistics for `timetable` against `config`.
    pub fn calculate(timetable: &GeneratedTimetable, config: &TimetableConfig) -> Self {
        let mut sessions_by_teacher: BTreeMap<String, usize> = BTreeMap::new();
        let mut teacher_days: BTreeMap<String, BTreeSet<Weekday>> = BTreeMap::new();
        let mut sessions_by_day: BTreeMap<Weekday, usize> =
            Weekday::ALL.iter().map(|&d| (d, 0)).collect();

        for entry in &timetable.entries {
            if let Some(teacher) = entry.teacher() {
                *sessions_by_teacher.entry(teacher.to_string()).or_insert(0) += 1;
                teacher_days
                    .entry(teacher.to_string())
                    .or_default()
                    .insert(entry.day);
            }
            *sessions_by_day.entry(entry.day).or_insert(0) += 1;
        }

        let used_slots = config
            .time_slots
            .iter()
            .filter(|slot| {
                timetable
                    .entries
                    .iter()
                    .any(|e| e.day == slot.day && e.start_time == slot.start_time)
            })
            .count();
        let slot_utilization = if config.time_slots.is_empty() {
            0.0
        } else {
            used_slots as f64 / config.time_slots.len() as f64
        };

        Self {
            required: config.total_occurrences(),
            placed: timetable.entries.len(),
            dropped: timetable.conflicts.len(),
            sessions_by_teacher,
            days_by_teacher: teacher_days
                .into_iter()
                .map(|(teacher, days)| (teacher, days.len()))
                .collect(),
            sessions_by_day,
            slot_utilization,
        }
    }

    /// Whether every teacher with ≥ `min_sessions` sessions teaches on
    /// as many distinct days as sessions.
    pub fn fully_spread(&self, min_sessions: usize) -> bool {
        self.sessions_by_teacher
            .iter()
            .filter(|(_, &n)| n >= min_sessions)
            .all(|(t, &n)| self.days_by_teacher.get(t).copied().unwrap_or(0) == n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Subject;
    use crate::scheduler::TimetableGenerator;

    #[test]
    fn test_stats_after_generation() {
        let config = TimetableConfig::with_default_slots(vec![
            Subject::new("M").with_teacher("A").with_frequency(3),
            Subject::new("P").with_teacher("B").with_frequency(2),
        ]);
        let t = TimetableGenerator::new().generate(&config);
        let stats = TimetableStats::calculate(&t, &config);

        assert_eq!(stats.required, 5);
        assert_eq!(stats.placed, 5);
        assert_eq!(stats.dropped, 0);
        assert_eq!(stats.sessions_by_teacher["A"], 3);
        assert_eq!(stats.days_by_teacher["A"], 3);
        assert_eq!(stats.sessions_by_day.len(), 5);
        assert_eq!(stats.sessions_by_day.values().sum::<usize>(), 5);
        assert!((stats.slot_utilization - 5.0 / 40.0).abs() < 1e-10);
        assert!(stats.fully_spread(1));
    }

    #[test]
    fn test_stats_skip_blank_teacher() {
        let config = TimetableConfig::with_default_slots(vec![
            Subject::new("M").with_teacher(" ").with_frequency(4),
            Subject::new("P").with_teacher("B"),
        ]);
        let t = TimetableGenerator::new().generate(&config);
        let stats = TimetableStats::calculate(&t, &config);

        assert_eq!(stats.placed, 5);
        assert_eq!(stats.sessions_by_teacher.len(), 1);
        assert_eq!(stats.sessions_by_teacher["B"], 1);
        assert_eq!(stats.sessions_by_day.values().sum::<usize>(), 5);
    }

    #[test]
    fn test_stats_empty() {
        let config = TimetableConfig::default();
        let t = GeneratedTimetable::from_parts(Vec::new(), Vec::new(), 0);
        let stats = TimetableStats::calculate(&t, &config);
        assert_eq!(stats.placed, 0);
        assert!((stats.slot_utilization - 0.0).abs() < 1e-10);
        assert!(stats.sessions_by_teacher.is_empty());
    }
}
