//! Invariants of generation, validation and editing over random configurations.

use std::collections::HashMap;

use chrono::NaiveTime;
use proptest::prelude::*;
use u_timetable::editing::{EntryUpdate, TimetableEditor};
use u_timetable::models::{
    intervals_overlap, ConflictType, Subject, TimeSlot, TimetableConfig, Weekday,
    DEFAULT_MAX_WEEKLY_SESSIONS,
};
use u_timetable::validation::ValidationIssueKind;
use u_timetable::{validate_configuration, TimetableError, TimetableGenerator};

fn time(minutes: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0).unwrap()
}

fn arb_slot() -> impl Strategy<Value = (usize, u32, u32)> {
    (0..5usize, 0..48u32, prop::sample::select(vec![40u32, 50, 60, 90]))
}

fn arb_subject() -> impl Strategy<Value = (usize, u32, i64, Option<usize>)> {
    (
        0..6usize,
        1..5u32,
        prop::sample::select(vec![40i64, 50, 60, 100]),
        prop::option::of(0..2usize),
    )
}

/// Teachers 0..4 are named; 4 and 5 are blank and whitespace-only.
fn teacher_name(teacher: usize) -> String {
    match teacher {
        4 => String::new(),
        5 => "  ".to_string(),
        n if n % 2 == 1 => format!(" T{n} "),
        n => format!("T{n}"),
    }
}

fn build_config(
    subjects: Vec<(usize, u32, i64, Option<usize>)>,
    slots: Option<Vec<(usize, u32, u32)>>,
) -> TimetableConfig {
    let subjects = subjects
        .into_iter()
        .enumerate()
        .map(|(i, (teacher, frequency, duration, room))| {
            let s = Subject::new(format!("S{i}"))
                .with_teacher(teacher_name(teacher))
                .with_frequency(frequency)
                .with_duration(duration);
            match room {
                Some(r) => s.with_room(format!("R{r}")),
                None => s,
            }
        })
        .collect();
    let slots = match slots {
        Some(raw) => raw
            .into_iter()
            .enumerate()
            .map(|(i, (day, step, len))| {
                let start = 8 * 60 + step * 10;
                TimeSlot::new(format!("s{i}"), Weekday::ALL[day], time(start), time(start + len))
            })
            .collect(),
        None => TimeSlot::default_week(),
    };
    TimetableConfig::new(subjects, slots)
}

fn arb_config() -> impl Strategy<Value = TimetableConfig> {
    (
        prop::collection::vec(arb_subject(), 1..8),
        prop::option::of(prop::collection::vec(arb_slot(), 1..30)),
    )
        .prop_map(|(subjects, slots)| build_config(subjects, slots))
}

proptest! {
    #[test]
    fn prop_no_overlapping_entries(config in arb_config()) {
        let t = TimetableGenerator::new().generate(&config);
        for (i, a) in t.entries.iter().enumerate() {
            for b in &t.entries[i + 1..] {
                prop_assert!(
                    a.day != b.day || !intervals_overlap(a.start_time, a.end_time, b.start_time, b.end_time),
                    "{:?} overlaps {:?}", a, b
                );
            }
        }
    }

    #[test]
    fn prop_workload_cap_respected(config in arb_config()) {
        let t = TimetableGenerator::new().generate(&config);
        let mut per_teacher: HashMap<&str, usize> = HashMap::new();
        for e in &t.entries {
            prop_assert_eq!(e.teacher_id.trim(), e.teacher_id.as_str());
            if !e.teacher_id.is_empty() {
                *per_teacher.entry(e.teacher_id.as_str()).or_insert(0) += 1;
            }
        }
        for (teacher, n) in per_teacher {
            prop_assert!(n <= DEFAULT_MAX_WEEKLY_SESSIONS, "teacher {} has {}", teacher, n);
        }
    }

    #[test]
    fn prop_completion_rate_and_success(config in arb_config()) {
        let t = TimetableGenerator::new().generate(&config);
        let required = config.total_occurrences() as usize;

        prop_assert_eq!(t.entries.len() + t.conflicts.len(), required);
        let expected = 100.0 * t.entries.len() as f64 / required as f64;
        prop_assert!((t.completion_rate - expected).abs() < 1e-9);
        prop_assert!((0.0..=100.0).contains(&t.completion_rate));
        prop_assert_eq!(t.success, t.conflicts.is_empty() && t.completion_rate == 100.0);
        prop_assert!(t.conflicts.iter().all(|c| c.affected_entries.is_empty()));
    }

    #[test]
    fn prop_entries_fit_their_subject(config in arb_config()) {
        let t = TimetableGenerator::new().generate(&config);
        for e in &t.entries {
            let subject = config.subject(&e.subject_id).unwrap();
            prop_assert!(e.duration_minutes() >= subject.duration);
            prop_assert_eq!(e.teacher_id.as_str(), subject.teacher_id().unwrap_or_default());
            prop_assert_eq!(e.room(), subject.room());
        }
    }

    #[test]
    fn prop_generation_is_repeatable(config in arb_config()) {
        let generator = TimetableGenerator::new();
        let key = |config: &TimetableConfig| {
            generator
                .generate(config)
                .entries
                .into_iter()
                .map(|e| (e.day, e.start_time, e.subject_id))
                .collect::<Vec<_>>()
        };
        prop_assert_eq!(key(&config), key(&config));
    }

    #[test]
    fn prop_overloaded_teacher_is_fatal(config in arb_config()) {
        let report = validate_configuration(&config);
        let mut load: HashMap<&str, u32> = HashMap::new();
        for s in &config.subjects {
            if let Some(teacher) = s.teacher_id() {
                *load.entry(teacher).or_insert(0) += s.frequency;
            }
        }
        for (teacher, total) in load {
            let expected = format!("Teacher {teacher} is assigned {total} sessions per week");
            let named = report.errors.iter().any(|e| {
                e.kind == ValidationIssueKind::WorkloadExceeded && e.message.contains(&expected)
            });
            prop_assert_eq!(named, total > 3);
        }
        let blank = config.subjects.iter().any(|s| !s.has_teacher());
        prop_assert_eq!(report.has_error(ValidationIssueKind::MissingTeacher), blank);
        if !report.errors.is_empty() {
            prop_assert!(!report.is_valid);
        }
    }
}

#[test]
fn test_empty_inputs_short_circuit() {
    let no_subjects = TimetableConfig::new(Vec::new(), TimeSlot::default_week());
    let report = validate_configuration(&no_subjects);
    assert!(!report.is_valid);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].kind, ValidationIssueKind::NoSubjects);
    assert!(report.warnings.is_empty());

    let no_slots = TimetableConfig::new(vec![Subject::new("M")], Vec::new());
    let report = validate_configuration(&no_slots);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].kind, ValidationIssueKind::NoTimeSlots);
}

#[test]
fn test_overloaded_teacher_blocks_generation() {
    let config = TimetableConfig::with_default_slots(vec![Subject::new("X")
        .with_teacher("T1")
        .with_frequency(4)
        .with_duration(50)]);
    match TimetableGenerator::new().generate_validated(&config) {
        Err(TimetableError::InvalidConfiguration(report)) => {
            assert!(report.errors[0].message.contains("Teacher T1"));
            assert!(report.errors[0].message.contains("exceed 3 slots/week"));
        }
        other => panic!("expected invalid configuration, got {other:?}"),
    }
}

#[test]
fn test_json_configuration_end_to_end() {
    let json = r#"{
        "subjects": [
            {"id": "math", "name": "Math", "duration": 50, "frequency": 1, "teacher": "A"}
        ],
        "timeSlots": [
            {"id": "mon-1", "day": "Monday", "startTime": "08:30", "endTime": "09:20"}
        ]
    }"#;
    let config = TimetableConfig::from_json(json).unwrap();
    let t = TimetableGenerator::new().generate_validated(&config).unwrap();
    assert_eq!(t.entries.len(), 1);
    assert_eq!(t.entries[0].day, Weekday::Monday);
    assert_eq!(t.entries[0].start_time, time(8 * 60 + 30));
    assert_eq!(t.entries[0].end_time, time(9 * 60 + 20));
    assert_eq!(t.entries[0].teacher_id, "A");
    assert!(t.conflicts.is_empty());
    assert!((t.completion_rate - 100.0).abs() < 1e-10);
}

#[test]
fn test_shared_slot_half_completion() {
    let config = TimetableConfig::new(
        vec![
            Subject::new("P").with_teacher("A"),
            Subject::new("C").with_teacher("A"),
        ],
        vec![TimeSlot::new("mon-1", Weekday::Monday, time(510), time(560))],
    );
    let t = TimetableGenerator::new().generate(&config);
    assert_eq!(t.entries.len(), 1);
    assert_eq!(t.conflicts.len(), 1);
    assert_eq!(t.conflicts[0].kind, ConflictType::TeacherConflict);
    assert!((t.completion_rate - 50.0).abs() < 1e-10);
}

#[test]
fn test_edit_move_onto_occupied_slot() {
    let config = TimetableConfig::with_default_slots(vec![
        Subject::new("M").with_teacher("A"),
        Subject::new("P").with_teacher("B"),
        Subject::new("C").with_teacher("C"),
    ]);
    let generated = TimetableGenerator::new().generate(&config);
    let mut editor = TimetableEditor::for_timetable(&generated, &config);
    let before = editor.entries().to_vec();

    let target = before[0].clone();
    let mover = before[2].id.clone();
    let update = EntryUpdate::new()
        .with_day(target.day)
        .with_start_time(target.start_time);

    let err = editor.update_entry(&mover, &update).unwrap_err();
    assert!(err
        .violations()
        .iter()
        .any(|v| v.to_string().starts_with("TIME_CONFLICT: ")));
    assert_eq!(editor.entries(), before.as_slice());
    assert!(!editor.differs_from(&generated.entries));
}
