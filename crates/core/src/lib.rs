//! # Triage Core
//!
//! Core logic for the emergency-department patient tracker.
//!
//! This crate contains:
//! - Priority classification of vital signs ([`classify`])
//! - Keyword-based care recommendations ([`recommend`])
//! - Patient record operations, worklist ordering and analytics ([`PatientService`])
//! - The storage and report-rendering seams ([`PatientStore`], [`ReportRenderer`])
//!
//! **No API concerns**: authentication and HTTP servers belong in `api-rest` and `api-shared`.

pub mod config;
pub mod constants;
pub mod error;
pub mod patient;
pub mod priority;
pub mod recommendation;
pub mod report;
pub mod store;
pub mod worklist;

pub use config::{store_kind_from_env_value, CoreConfig, StoreKind};
pub use constants::DEFAULT_PATIENT_DATA_DIR;
pub use error::{PatientError, PatientResult};
pub use patient::{
    NewPatient, PatientId, PatientRecord, PatientService, PatientUpdate, WorklistEntry,
};
pub use priority::{classify, PriorityTier, VitalSigns};
pub use recommendation::{recommend, Recommendation, RECOMMENDATION_TABLE};
pub use report::{
    JsonReportRenderer, PatientReport, RenderedReport, ReportRenderer, TextReportRenderer,
};
pub use store::{FilePatientStore, InMemoryPatientStore, PatientStore, RecordChange};
pub use triage_types::{NonEmptyText, TextError};
