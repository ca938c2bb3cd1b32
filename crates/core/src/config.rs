//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into core services as an
//! `Arc<CoreConfig>`. Core code never reads environment variables during request handling; the
//! binaries translate the environment into a `CoreConfig` before serving anything.

use crate::constants::PATIENTS_DIR_NAME;
use crate::store::{FilePatientStore, InMemoryPatientStore, PatientStore};
use crate::{PatientError, PatientResult};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Which `PatientStore` implementation backs the record service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum StoreKind {
    /// YAML files under `<patient_data_dir>/patients/`.
    #[default]
    File,
    /// Process-local map, lost on exit.
    Memory,
}

impl std::str::FromStr for StoreKind {
    type Err = PatientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "file" => Ok(StoreKind::File),
            "memory" => Ok(StoreKind::Memory),
            other => Err(PatientError::InvalidInput(format!(
                "unknown store kind '{other}' (expected 'file' or 'memory')"
            ))),
        }
    }
}

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    patient_data_dir: PathBuf,
    store_kind: StoreKind,
    api_key: Option<String>,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// An empty or whitespace-only `api_key` is treated as "no key configured".
    pub fn new(patient_data_dir: PathBuf, store_kind: StoreKind, api_key: Option<String>) -> Self {
        let api_key = api_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());

        Self {
            patient_data_dir,
            store_kind,
            api_key,
        }
    }

    pub fn patient_data_dir(&self) -> &Path {
        &self.patient_data_dir
    }

    pub fn patients_dir(&self) -> PathBuf {
        self.patient_data_dir.join(PATIENTS_DIR_NAME)
    }

    pub fn store_kind(&self) -> StoreKind {
        self.store_kind
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    /// Builds the patient store selected by this configuration.
    ///
    /// # Errors
    ///
    /// Returns `PatientError::StorageDirCreation` if the file store directory cannot be created.
    pub fn open_store(&self) -> PatientResult<Arc<dyn PatientStore>> {
        match self.store_kind {
            StoreKind::File => Ok(Arc::new(FilePatientStore::open(self.patients_dir())?)),
            StoreKind::Memory => Ok(Arc::new(InMemoryPatientStore::new())),
        }
    }
}

/// Parse the store kind from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns [`StoreKind::File`].
pub fn store_kind_from_env_value(value: Option<String>) -> PatientResult<StoreKind> {
    let value = value
        .map(|v| v.trim().to_ascii_lowercase())
        .filter(|v| !v.is_empty());
    let parsed = value.map(|v| v.parse::<StoreKind>()).transpose()?;

    Ok(parsed.unwrap_or_default())
}
