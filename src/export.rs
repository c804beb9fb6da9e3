//! Renderings of saved timetables.
//!
//! Exporters receive a fully populated [`SavedTimetable`] and return bytes
//! ready to be written or downloaded.

use std::collections::BTreeSet;

use chrono::NaiveTime;
use tracing::debug;

use crate::error::Result;
use crate::models::{format_time, TimetableEntry, Weekday};
use crate::persistence::SavedTimetable;

/// Turns a saved timetable into a downloadable document.
pub trait TimetableExporter {
    /// Renders the timetable.
    fn export(&self, timetable: &SavedTimetable) -> Result<Vec<u8>>;

    /// MIME type of the output.
    fn content_type(&self) -> &'static str;

    /// File extension of the output, without the dot.
    fn file_extension(&self) -> &'static str;

    /// Suggested file name derived from the timetable name.
    fn file_name(&self, timetable: &SavedTimetable) -> String {
        let stem: String = timetable
            .name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
            .collect();
        let stem = stem.trim_matches('-');
        let stem = if stem.is_empty() { "timetable" } else { stem };
        format!("{stem}.{}", self.file_extension())
    }
}

/// Plain-text weekly grid: one row per start time, one column per day.
///
/// ```text
/// Time        | Monday          | Tuesday | ...
/// 08:30-09:20 | Math (A, R1)    | -       |
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct GridExporter;

impl GridExporter {
    fn cell(timetable: &SavedTimetable, entries: &[&TimetableEntry]) -> String {
        if entries.is_empty() {
            return "-".to_string();
        }
        entries
            .iter()
            .map(|e| {
                let name = timetable.subject_name(&e.subject_id);
                match e.room() {
                    Some(room) => format!("{name} ({}, {room})", e.teacher_id),
                    None => format!("{name} ({})", e.teacher_id),
                }
            })
            .collect::<Vec<_>>()
            .join(" / ")
    }

    /// Builds the grid as rows of cells, header first.
    fn rows(timetable: &SavedTimetable) -> Vec<Vec<String>> {
        let entries = &timetable.generated_timetable.entries;
        let starts: BTreeSet<(NaiveTime, NaiveTime)> =
            entries.iter().map(|e| (e.start_time, e.end_time)).collect();

        let mut header = vec!["Time".to_string()];
        header.extend(Weekday::ALL.iter().map(|d| d.to_string()));
        let mut rows = vec![header];

        for (start, end) in starts {
            let mut row = vec![format!("{}-{}", format_time(start), format_time(end))];
            for day in Weekday::ALL {
                let here: Vec<&TimetableEntry> = entries
                    .iter()
                    .filter(|e| e.day == day && e.start_time == start && e.end_time == end)
                    .collect();
                row.push(Self::cell(timetable, &here));
            }
            rows.push(row);
        }
        rows
    }
}

impl TimetableExporter for GridExporter {
    fn export(&self, timetable: &SavedTimetable) -> Result<Vec<u8>> {
        let rows = Self::rows(timetable);
        let columns = rows.first().map_or(0, Vec::len);
        let widths: Vec<usize> = (0..columns)
            .map(|c| rows.iter().map(|r| r[c].chars().count()).max().unwrap_or(0))
            .collect();

        let mut out = String::new();
        out.push_str(&timetable.name);
        out.push('\n');
        if !timetable.description.is_empty() {
            out.push_str(&timetable.description);
            out.push('\n');
        }
        out.push('\n');

        for (i, row) in rows.iter().enumerate() {
            let line: Vec<String> = row
                .iter()
                .zip(&widths)
                .map(|(cell, &w)| format!("{cell:<w$}"))
                .collect();
            out.push_str(line.join(" | ").trim_end());
            out.push('\n');
            if i == 0 {
                let rule: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
                out.push_str(&rule.join("-+-"));
                out.push('\n');
            }
        }

        let generated = &timetable.generated_timetable;
        out.push_str(&format!(
            "\nCompletion: {:.1}% ({} conflicts)\n",
            generated.completion_rate,
            generated.conflicts.len()
        ));

        debug!(id = %timetable.id, rows = rows.len() - 1, "grid exported");
        Ok(out.into_bytes())
    }

    fn content_type(&self) -> &'static str {
        "text/plain; charset=utf-8"
    }

    fn file_extension(&self) -> &'static str {
        "txt"
    }
}

/// Pretty-printed JSON of the whole record.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonExporter;

impl TimetableExporter for JsonExporter {
    fn export(&self, timetable: &SavedTimetable) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(timetable)?)
    }

    fn content_type(&self) -> &'static str {
        "application/json"
    }

    fn file_extension(&self) -> &'static str {
        "json"
    }
}
