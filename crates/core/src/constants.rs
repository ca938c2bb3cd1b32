//! Constants used throughout the triage core crate.

/// Default directory for patient data storage when no explicit directory is configured.
pub const DEFAULT_PATIENT_DATA_DIR: &str = "patient_data";

/// Directory name (under the patient data directory) holding one YAML file per patient.
pub const PATIENTS_DIR_NAME: &str = "patients";

/// File extension for stored patient records.
pub const PATIENT_FILE_EXTENSION: &str = "yaml";

/// Format used when a time of death is displayed or printed on a report.
pub const TIME_OF_DEATH_FORMAT: &str = "%d-%m-%Y %H:%M:%S";

/// Returned by the advisor when a patient has no clinical notes.
pub const NO_NOTES_RECOMMENDATION: &str = "No recommendation";

/// Returned by the advisor when no keyword matches the notes.
pub const NO_MATCH_RECOMMENDATION: &str = "No recommendation available";
