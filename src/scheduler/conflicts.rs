//! Per-slot conflict detection and day-distribution ordering.
//!
//! Both are pure functions of the committed entries, so the generator and
//! any alternative strategy can share them.

use std::collections::{BTreeSet, HashMap};

use crate::models::{
    SchedulingPolicy, SlotViolation, Subject, TimeSlot, TimetableConfig, TimetableEntry, Weekday,
};

/// Checks candidate `(subject, slot)` pairs against committed entries.
#[derive(Debug, Clone)]
pub struct ConflictDetector<'a> {
    names: HashMap<&'a str, &'a str>,
    policy: SchedulingPolicy,
}

impl<'a> ConflictDetector<'a> {
    /// Creates a detector for a configuration.
    pub fn new(config: &'a TimetableConfig) -> Self {
        Self {
            names: config
                .subjects
                .iter()
                .map(|s| (s.id.as_str(), s.display_name()))
                .collect(),
            policy: config.policy,
        }
    }

    /// Lists every reason `slot` cannot host `subject`. Empty = usable.
    ///
    /// All checks run; none short-circuits:
    /// - slot shorter than the session
    /// - any overlapping entry on the same day
    /// - the teacher already teaching at an overlapping time
    /// - the teacher already at the workload cap (any day/time)
    /// - the room already used at an overlapping time
    pub fn detect(
        &self,
        subject: &Subject,
        slot: &TimeSlot,
        committed: &[TimetableEntry],
    ) -> Vec<SlotViolation> {
        let mut violations = Vec::new();

        if !slot.fits(subject.duration) {
            violations.push(SlotViolation::SlotTooShort {
                slot_minutes: slot.duration_minutes(),
                required_minutes: subject.duration,
            });
        }

        let overlapping: Vec<&TimetableEntry> = committed
            .iter()
            .filter(|e| e.overlaps(slot.day, slot.start_time, slot.end_time))
            .collect();

        if !overlapping.is_empty() {
            violations.push(SlotViolation::SlotOccupied {
                subjects: self.names_of(overlapping.iter().copied()),
            });
        }

        if let Some(teacher) = subject.teacher_id() {
            let clashes: Vec<&TimetableEntry> = overlapping
                .iter()
                .copied()
                .filter(|e| e.teacher() == Some(teacher))
                .collect();
            if !clashes.is_empty() {
                violations.push(SlotViolation::TeacherDoubleBooked {
                    teacher: teacher.to_string(),
                    subjects: self.names_of(clashes.into_iter()),
                });
            }

            let sessions = committed.iter().filter(|e| e.teacher() == Some(teacher)).count();
            if sessions >= self.policy.max_weekly_sessions {
                violations.push(SlotViolation::TeacherOverloaded {
                    teacher: teacher.to_string(),
                    sessions,
                    cap: self.policy.max_weekly_sessions,
                });
            }
        }

        if let Some(room) = subject.room() {
            let clashes: Vec<&TimetableEntry> = overlapping
                .iter()
                .copied()
                .filter(|e| e.room() == Some(room))
                .collect();
            if !clashes.is_empty() {
                violations.push(SlotViolation::RoomDoubleBooked {
                    room: room.to_string(),
                    subjects: self.names_of(clashes.into_iter()),
                });
            }
        }

        violations
    }

    fn names_of<'e>(&self, entries: impl Iterator<Item = &'e TimetableEntry>) -> Vec<String> {
        entries
            .map(|e| {
                self.names
                    .get(e.subject_id.as_str())
                    .copied()
                    .unwrap_or(e.subject_id.as_str())
                    .to_string()
            })
            .collect()
    }
}

/// Days on which `teacher` already has committed entries. Empty for a
/// blank teacher.
pub fn teacher_days(teacher: &str, committed: &[TimetableEntry]) -> BTreeSet<Weekday> {
    committed
        .iter()
        .filter(|e| e.teacher() == Some(teacher))
        .map(|e| e.day)
        .collect()
}

/// Reorders candidates so slots on days the teacher has not used yet come
/// first. Stable within each group.
pub fn order_by_day_distribution<'s>(
    candidates: Vec<&'s TimeSlot>,
    teacher: &str,
    committed: &[TimetableEntry],
) -> Vec<&'s TimeSlot> {
    let used = teacher_days(teacher, committed);
    let (fresh, used_days): (Vec<&TimeSlot>, Vec<&TimeSlot>) =
        candidates.into_iter().partition(|slot| !used.contains(&slot.day));
    fresh.into_iter().chain(used_days).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ConflictType, Weekday};

    fn slot(id: &str, day: Weekday, start: &str, end: &str) -> TimeSlot {
        TimeSlot::parse(id, day, start, end).unwrap()
    }

    fn entry_in(subject: &Subject, slot: &TimeSlot) -> TimetableEntry {
        TimetableEntry::place(subject, slot)
    }

    fn config(subjects: Vec<Subject>) -> TimetableConfig {
        TimetableConfig::new(subjects, TimeSlot::default_week())
    }

    #[test]
    fn test_free_slot_has_no_violations() {
        let math = Subject::new("M").with_name("Math").with_teacher("A");
        let cfg = config(vec![math.clone()]);
        let detector = ConflictDetector::new(&cfg);
        let s = slot("s", Weekday::Monday, "08:30", "09:20");
        assert!(detector.detect(&math, &s, &[]).is_empty());
    }

    #[test]
    fn test_occupied_and_teacher_double_booked() {
        let physics = Subject::new("P").with_name("Physics").with_teacher("A");
        let chem = Subject::new("C").with_name("Chemistry").with_teacher("A");
        let cfg = config(vec![physics.clone(), chem.clone()]);
        let detector = ConflictDetector::new(&cfg);
        let s = slot("s", Weekday::Monday, "08:30", "09:20");
        let committed = vec![entry_in(&physics, &s)];

        let v = detector.detect(&chem, &s, &committed);
        assert_eq!(v.len(), 2);
        assert_eq!(
            v[0],
            SlotViolation::SlotOccupied {
                subjects: vec!["Physics".into()]
            }
        );
        assert_eq!(v[1].category(), ConflictType::TeacherConflict);
    }

    #[test]
    fn test_partial_overlap_counts() {
        let physics = Subject::new("P").with_teacher("B").with_duration(90);
        let math = Subject::new("M").with_teacher("A");
        let cfg = config(vec![physics.clone(), math.clone()]);
        let detector = ConflictDetector::new(&cfg);
        let long = slot("long", Weekday::Monday, "08:00", "09:30");
        let committed = vec![entry_in(&physics, &long)];

        let overlapping = slot("s", Weekday::Monday, "09:20", "10:10");
        let v = detector.detect(&math, &overlapping, &committed);
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].category(), ConflictType::TimeConflict);

        let touching = slot("t", Weekday::Monday, "09:30", "10:20");
        assert!(detector.detect(&math, &touching, &committed).is_empty());
    }

    #[test]
    fn test_workload_cap_any_day() {
        let math = Subject::new("M").with_teacher("A").with_frequency(3);
        let cfg = config(vec![math.clone()]);
        let detector = ConflictDetector::new(&cfg);
        let committed: Vec<TimetableEntry> = [Weekday::Monday, Weekday::Tuesday, Weekday::Wednesday]
            .into_iter()
            .map(|d| entry_in(&math, &slot("x", d, "08:30", "09:20")))
            .collect();

        let v = detector.detect(&math, &slot("f", Weekday::Friday, "08:30", "09:20"), &committed);
        assert_eq!(
            v,
            vec![SlotViolation::TeacherOverloaded {
                teacher: "A".into(),
                sessions: 3,
                cap: 3
            }]
        );
    }

    #[test]
    fn test_room_double_booked_and_too_short() {
        let lab1 = Subject::new("L1").with_name("Lab 1").with_teacher("A").with_room("LAB");
        let lab2 = Subject::new("L2").with_teacher("B").with_room("LAB").with_duration(60);
        let cfg = config(vec![lab1.clone(), lab2.clone()]);
        let detector = ConflictDetector::new(&cfg);
        let s = slot("s", Weekday::Monday, "08:30", "09:20");
        let committed = vec![entry_in(&lab1, &s)];

        let v = detector.detect(&lab2, &s, &committed);
        let kinds: Vec<ConflictType> = v.iter().map(|x| x.category()).collect();
        assert_eq!(
            kinds,
            vec![
                ConflictType::NoCompatibleSlot,
                ConflictType::TimeConflict,
                ConflictType::RoomConflict
            ]
        );
    }

    #[test]
    fn test_teacherless_subject_skips_teacher_checks() {
        let a = Subject::new("A");
        let cfg = config(vec![a.clone()]);
        let detector = ConflictDetector::new(&cfg);
        let committed: Vec<TimetableEntry> = (0..5)
            .map(|i| entry_in(&a, &slot("x", Weekday::ALL[i], "08:30", "09:20")))
            .collect();
        assert!(detector
            .detect(&a, &slot("y", Weekday::Monday, "10:30", "11:20"), &committed)
            .is_empty());
    }

    #[test]
    fn test_whitespace_teacher_is_teacherless() {
        let a = Subject::new("A").with_teacher("  ");
        let cfg = config(vec![a.clone()]);
        let detector = ConflictDetector::new(&cfg);
        let committed: Vec<TimetableEntry> = (0..5)
            .map(|i| entry_in(&a, &slot("x", Weekday::ALL[i], "08:30", "09:20")))
            .collect();
        assert!(committed.iter().all(|e| e.teacher_id.is_empty()));
        assert!(detector
            .detect(&a, &slot("y", Weekday::Monday, "10:30", "11:20"), &committed)
            .is_empty());
        assert!(teacher_days("", &committed).is_empty());
    }

    #[test]
    fn test_padded_teacher_matches_committed_entries() {
        let plain = Subject::new("M").with_teacher("A");
        let padded = Subject::new("P").with_teacher(" A ");
        let cfg = config(vec![plain.clone(), padded.clone()]);
        let detector = ConflictDetector::new(&cfg);
        let mon = slot("mon", Weekday::Monday, "08:30", "09:20");
        let committed = vec![entry_in(&plain, &mon)];
        let v = detector.detect(&padded, &mon, &committed);
        assert!(v.iter().any(|x| matches!(
            x,
            SlotViolation::TeacherDoubleBooked { teacher, .. } if teacher == "A"
        )));
    }

    #[test]
    fn test_day_distribution_order() {
        let math = Subject::new("M").with_teacher("A");
        let mon1 = slot("mon1", Weekday::Monday, "08:30", "09:20");
        let mon2 = slot("mon2", Weekday::Monday, "09:20", "10:10");
        let tue1 = slot("tue1", Weekday::Tuesday, "08:30", "09:20");
        let wed1 = slot("wed1", Weekday::Wednesday, "08:30", "09:20");
        let committed = vec![entry_in(&math, &mon1)];

        let ordered = order_by_day_distribution(vec![&mon1, &mon2, &tue1, &wed1], "A", &committed);
        let ids: Vec<&str> = ordered.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["tue1", "wed1", "mon1", "mon2"]);

        // Other teachers' days do not matter
        let ordered = order_by_day_distribution(vec![&mon1, &tue1], "B", &committed);
        assert_eq!(ordered[0].id, "mon1");
    }
}
