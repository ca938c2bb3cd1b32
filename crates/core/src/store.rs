//! Patient record persistence.
//!
//! [`PatientStore`] is the narrow interface the record service needs from a backing store. Two
//! implementations ship with the crate:
//!
//! - [`InMemoryPatientStore`] keeps records in a mutex-guarded map.
//! - [`FilePatientStore`] keeps one YAML file per patient:
//!
//! ```text
//! patient_data/
//!   patients/
//!     1.yaml
//!     2.yaml
//! ```
//!
//! Ids are allocated by the store, start at 1 and increase monotonically.
//!
//! Record files are written to a temporary file in the same directory and renamed into place, so
//! readers never see a partly written record. New records are linked in without replacing an
//! existing file; if another process took the id first, the store rescans the directory and moves
//! past it.

use crate::constants::PATIENT_FILE_EXTENSION;
use crate::error::{PatientError, PatientResult};
use crate::patient::{NewRecord, PatientId, PatientRecord};
use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tempfile::NamedTempFile;

/// In-place edit applied by [`PatientStore::modify`].
pub type RecordChange<'a> = Box<dyn FnOnce(&mut PatientRecord) + 'a>;

/// Storage operations required by [`crate::PatientService`].
pub trait PatientStore: Send + Sync {
    /// Allocates an id and stores the record.
    fn create(&self, record: NewRecord) -> PatientResult<PatientRecord>;

    fn get(&self, id: PatientId) -> PatientResult<Option<PatientRecord>>;

    /// Reads a record, applies `change` and writes it back, holding the store's writer lock
    /// throughout. Returns the stored result. The record keeps its id whatever `change` does.
    ///
    /// # Errors
    ///
    /// Returns `PatientError::NotFound` if no record has `id`.
    fn modify(&self, id: PatientId, change: RecordChange<'_>) -> PatientResult<PatientRecord>;

    /// Deletes a record, returning whether it existed.
    fn delete(&self, id: PatientId) -> PatientResult<bool>;

    /// All stored records in ascending id order.
    fn list(&self) -> PatientResult<Vec<PatientRecord>>;
}

// ============================================================================
// IN-MEMORY STORE
// ============================================================================

#[derive(Debug, Default)]
struct MemoryState {
    next_id: u64,
    records: BTreeMap<PatientId, PatientRecord>,
}

/// Process-local store. Contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct InMemoryPatientStore {
    state: Mutex<MemoryState>,
}

impl InMemoryPatientStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> PatientResult<MutexGuard<'_, MemoryState>> {
        self.state.lock().map_err(|_| PatientError::StoreLockPoisoned)
    }
}

impl PatientStore for InMemoryPatientStore {
    fn create(&self, record: NewRecord) -> PatientResult<PatientRecord> {
        let mut state = self.lock()?;
        state.next_id += 1;
        let record = record.into_record(PatientId(state.next_id));
        state.records.insert(record.id, record.clone());
        Ok(record)
    }

    fn get(&self, id: PatientId) -> PatientResult<Option<PatientRecord>> {
        Ok(self.lock()?.records.get(&id).cloned())
    }

    fn modify(&self, id: PatientId, change: RecordChange<'_>) -> PatientResult<PatientRecord> {
        let mut state = self.lock()?;
        let record = state
            .records
            .get_mut(&id)
            .ok_or(PatientError::NotFound(id))?;
        change(&mut *record);
        record.id = id;
        Ok(record.clone())
    }

    fn delete(&self, id: PatientId) -> PatientResult<bool> {
        Ok(self.lock()?.records.remove(&id).is_some())
    }

    fn list(&self) -> PatientResult<Vec<PatientRecord>> {
        Ok(self.lock()?.records.values().cloned().collect())
    }
}

// ============================================================================
// FILE STORE
// ============================================================================

/// YAML-file store rooted at a single directory.
///
/// A mutex serialises writers within the process. The next id starts one past the highest id on
/// disk and only moves forward, so a live store never reuses an id. Several stores (or processes)
/// may share a directory: a create that collides with a file written elsewhere skips ahead
/// instead of overwriting it. Edits from different processes are not serialised against each
/// other.
#[derive(Debug)]
pub struct FilePatientStore {
    dir: PathBuf,
    next_id: Mutex<u64>,
}

impl FilePatientStore {
    /// Opens (creating if needed) a store rooted at `dir`.
    ///
    /// # Errors
    ///
    /// Returns `PatientError::StorageDirCreation` if the directory cannot be created, or
    /// `PatientError::FileRead` if it cannot be scanned.
    pub fn open(dir: impl Into<PathBuf>) -> PatientResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(PatientError::StorageDirCreation)?;

        let highest = highest_stored_id(&dir)?;

        Ok(Self {
            dir,
            next_id: Mutex::new(highest + 1),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn record_path(&self, id: PatientId) -> PathBuf {
        self.dir.join(format!("{id}.{PATIENT_FILE_EXTENSION}"))
    }

    /// Serialises `record` into a temporary file next to the record files.
    fn stage_record(&self, record: &PatientRecord) -> PatientResult<NamedTempFile> {
        let yaml = serde_yaml::to_string(record).map_err(PatientError::YamlSerialization)?;
        let mut staged = NamedTempFile::new_in(&self.dir).map_err(PatientError::FileWrite)?;
        staged
            .write_all(yaml.as_bytes())
            .map_err(PatientError::FileWrite)?;
        staged.as_file().sync_all().map_err(PatientError::FileWrite)?;
        Ok(staged)
    }

    fn read_record(path: &Path) -> PatientResult<PatientRecord> {
        let contents = fs::read_to_string(path).map_err(PatientError::FileRead)?;
        serde_yaml::from_str(&contents).map_err(PatientError::YamlDeserialization)
    }

    fn lock(&self) -> PatientResult<MutexGuard<'_, u64>> {
        self.next_id.lock().map_err(|_| PatientError::StoreLockPoisoned)
    }
}

/// Ids of every `<id>.yaml` file in `dir`. Other entries are ignored.
fn stored_ids(dir: &Path) -> PatientResult<Vec<PatientId>> {
    let mut ids = Vec::new();
    for entry in fs::read_dir(dir).map_err(PatientError::FileRead)? {
        let path = entry.map_err(PatientError::FileRead)?.path();
        if !path.is_file() {
            continue;
        }
        if path.extension().and_then(|e| e.to_str()) != Some(PATIENT_FILE_EXTENSION) {
            continue;
        }
        if let Some(id) = path
            .file_stem()
            .and_then(|s| s.to_str())
            .and_then(|s| s.parse::<u64>().ok())
        {
            ids.push(PatientId(id));
        }
    }
    ids.sort();
    Ok(ids)
}

fn highest_stored_id(dir: &Path) -> PatientResult<u64> {
    Ok(stored_ids(dir)?.last().map_or(0, |id| id.0))
}

impl PatientStore for FilePatientStore {
    fn create(&self, record: NewRecord) -> PatientResult<PatientRecord> {
        let mut next_id = self.lock()?;
        let mut record = record.into_record(PatientId(*next_id));

        loop {
            let staged = self.stage_record(&record)?;
            match staged.persist_noclobber(self.record_path(record.id)) {
                Ok(_) => break,
                Err(e) if e.error.kind() == ErrorKind::AlreadyExists => {
                    let taken = record.id;
                    record.id = PatientId(taken.0.max(highest_stored_id(&self.dir)?) + 1);
                    tracing::debug!(%taken, next = %record.id, "patient id already on disk");
                }
                Err(e) => return Err(PatientError::FileWrite(e.error)),
            }
        }

        *next_id = record.id.0 + 1;
        Ok(record)
    }

    fn get(&self, id: PatientId) -> PatientResult<Option<PatientRecord>> {
        match fs::read_to_string(self.record_path(id)) {
            Ok(contents) => serde_yaml::from_str(&contents)
                .map(Some)
                .map_err(PatientError::YamlDeserialization),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PatientError::FileRead(e)),
        }
    }

    fn modify(&self, id: PatientId, change: RecordChange<'_>) -> PatientResult<PatientRecord> {
        let _guard = self.lock()?;
        let mut record = self.get(id)?.ok_or(PatientError::NotFound(id))?;
        change(&mut record);
        record.id = id;

        self.stage_record(&record)?
            .persist(self.record_path(id))
            .map_err(|e| PatientError::FileWrite(e.error))?;
        Ok(record)
    }

    fn delete(&self, id: PatientId) -> PatientResult<bool> {
        let _guard = self.lock()?;
        match fs::remove_file(self.record_path(id)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(PatientError::FileDelete(e)),
        }
    }

    fn list(&self) -> PatientResult<Vec<PatientRecord>> {
        let mut records = Vec::new();
        for id in stored_ids(&self.dir)? {
            let path = self.record_path(id);
            match Self::read_record(&path) {
                Ok(record) => records.push(record),
                Err(e) => {
                    tracing::warn!("failed to parse patient record: {} - {}", path.display(), e);
                }
            }
        }
        Ok(records)
    }
}
