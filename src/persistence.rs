//! Storage of generated timetables.
//!
//! The core only needs four operations from storage (save, update,
//! delete, load) so they are expressed as the [`TimetableRepository`]
//! trait. Two implementations ship with the crate:
//!
//! - [`InMemoryRepository`]: shared in-process map, for tests and embedding
//! - [`JsonFileRepository`]: one pretty-printed JSON file per timetable

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{Result, TimetableError};
use crate::models::{GeneratedTimetable, Subject, TimeSlot, TimetableConfig};

/// Data handed to a repository on save or update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRequest {
    /// Display name.
    pub name: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Subjects the timetable was generated from.
    pub subjects: Vec<Subject>,
    /// Time slots the timetable was generated from.
    pub time_slots: Vec<TimeSlot>,
    /// Generated (and possibly edited) timetable.
    pub generated_timetable: GeneratedTimetable,
}

impl SaveRequest {
    /// Bundles a configuration and its generated timetable.
    pub fn new(name: impl Into<String>, config: &TimetableConfig, timetable: GeneratedTimetable) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            subjects: config.subjects.clone(),
            time_slots: config.time_slots.clone(),
            generated_timetable: timetable,
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// A stored timetable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedTimetable {
    /// Repository-assigned id (UUID v4).
    pub id: String,
    /// Display name.
    pub name: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Subjects the timetable was generated from.
    pub subjects: Vec<Subject>,
    /// Time slots the timetable was generated from.
    pub time_slots: Vec<TimeSlot>,
    /// Stored timetable.
    pub generated_timetable: GeneratedTimetable,
    /// First save.
    pub created_at: DateTime<Utc>,
    /// Last update; equals `created_at` until updated.
    pub updated_at: DateTime<Utc>,
}

impl SavedTimetable {
    fn create(id: String, request: SaveRequest, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: request.name,
            description: request.description,
            subjects: request.subjects,
            time_slots: request.time_slots,
            generated_timetable: request.generated_timetable,
            created_at: now,
            updated_at: now,
        }
    }

    fn replace(&mut self, request: SaveRequest, now: DateTime<Utc>) {
        self.name = request.name;
        self.description = request.description;
        self.subjects = request.subjects;
        self.time_slots = request.time_slots;
        self.generated_timetable = request.generated_timetable;
        self.updated_at = now;
    }

    /// Subject display name by id, falling back to the id.
    pub fn subject_name<'a>(&'a self, subject_id: &'a str) -> &'a str {
        self.subjects
            .iter()
            .find(|s| s.id == subject_id)
            .map_or(subject_id, Subject::display_name)
    }
}

/// Persistence seam for saved timetables.
pub trait TimetableRepository: Send + Sync {
    /// Stores a new timetable and returns its id.
    fn save(&self, request: SaveRequest) -> Result<String>;

    /// Replaces the content of an existing timetable.
    fn update(&self, id: &str, request: SaveRequest) -> Result<SavedTimetable>;

    /// Removes a timetable.
    fn delete(&self, id: &str) -> Result<()>;

    /// All stored timetables, oldest first.
    fn load_all(&self) -> Result<Vec<SavedTimetable>>;

    /// One timetable by id.
    fn load(&self, id: &str) -> Result<SavedTimetable>;
}

fn sort_oldest_first(records: &mut [SavedTimetable]) {
    records.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
}

// ======================== In-memory ========================

/// In-memory repository. Clones share the same storage.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    data: Arc<RwLock<HashMap<String, SavedTimetable>>>,
}

impl InMemoryRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored timetables.
    pub fn len(&self) -> Result<usize> {
        Ok(self.read()?.len())
    }

    /// Whether nothing is stored.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.read()?.is_empty())
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, HashMap<String, SavedTimetable>>> {
        self.data
            .read()
            .map_err(|_| TimetableError::Storage("in-memory repository lock poisoned".into()))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, HashMap<String, SavedTimetable>>> {
        self.data
            .write()
            .map_err(|_| TimetableError::Storage("in-memory repository lock poisoned".into()))
    }
}

impl TimetableRepository for InMemoryRepository {
    fn save(&self, request: SaveRequest) -> Result<String> {
        let id = Uuid::new_v4().to_string();
        let record = SavedTimetable::create(id.clone(), request, Utc::now());
        self.write()?.insert(id.clone(), record);
        info!(id = %id, "timetable saved");
        Ok(id)
    }

    fn update(&self, id: &str, request: SaveRequest) -> Result<SavedTimetable> {
        let mut data = self.write()?;
        let record = data
            .get_mut(id)
            .ok_or_else(|| TimetableError::TimetableNotFound(id.to_string()))?;
        record.replace(request, Utc::now());
        info!(id, "timetable updated");
        Ok(record.clone())
    }

    fn delete(&self, id: &str) -> Result<()> {
        self.write()?
            .remove(id)
            .ok_or_else(|| TimetableError::TimetableNotFound(id.to_string()))?;
        info!(id, "timetable deleted");
        Ok(())
    }

    fn load_all(&self) -> Result<Vec<SavedTimetable>> {
        let mut records: Vec<SavedTimetable> = self.read()?.values().cloned().collect();
        sort_oldest_first(&mut records);
        debug!(count = records.len(), "timetables loaded");
        Ok(records)
    }

    fn load(&self, id: &str) -> Result<SavedTimetable> {
        self.read()?
            .get(id)
            .cloned()
            .ok_or_else(|| TimetableError::TimetableNotFound(id.to_string()))
    }
}

// ======================== JSON files ========================

/// Repository storing each timetable as `<dir>/<id>.json`.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    dir: PathBuf,
}

impl JsonFileRepository {
    /// Opens (and creates if needed) a storage directory.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Storage directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_of(&self, id: &str) -> Result<PathBuf> {
        // Only generated UUID ids map to files.
        if Uuid::parse_str(id).is_err() {
            return Err(TimetableError::TimetableNotFound(id.to_string()));
        }
        Ok(self.dir.join(format!("{id}.json")))
    }

    fn write_record(&self, record: &SavedTimetable) -> Result<()> {
        let path = self.path_of(&record.id)?;
        let json = serde_json::to_string_pretty(record)?;
        fs::write(&path, json)?;
        debug!(path = %path.display(), "timetable written");
        Ok(())
    }
}

impl TimetableRepository for JsonFileRepository {
    fn save(&self, request: SaveRequest) -> Result<String> {
        let id = Uuid::new_v4().to_string();
        let record = SavedTimetable::create(id.clone(), request, Utc::now());
        self.write_record(&record)?;
        info!(id = %id, "timetable saved");
        Ok(id)
    }

    fn update(&self, id: &str, request: SaveRequest) -> Result<SavedTimetable> {
        let mut record = self.load(id)?;
        record.replace(request, Utc::now());
        self.write_record(&record)?;
        info!(id, "timetable updated");
        Ok(record)
    }

    fn delete(&self, id: &str) -> Result<()> {
        let path = self.path_of(id)?;
        if !path.exists() {
            return Err(TimetableError::TimetableNotFound(id.to_string()));
        }
        fs::remove_file(&path)?;
        info!(id, "timetable deleted");
        Ok(())
    }

    fn load_all(&self) -> Result<Vec<SavedTimetable>> {
        let mut records = Vec::new();
        for dir_entry in fs::read_dir(&self.dir)? {
            let path = dir_entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let raw = fs::read_to_string(&path)?;
            records.push(serde_json::from_str::<SavedTimetable>(&raw)?);
        }
        sort_oldest_first(&mut records);
        debug!(count = records.len(), dir = %self.dir.display(), "timetables loaded");
        Ok(records)
    }

    fn load(&self, id: &str) -> Result<SavedTimetable> {
        let path = self.path_of(id)?;
        if !path.exists() {
            return Err(TimetableError::TimetableNotFound(id.to_string()));
        }
        let raw = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}
