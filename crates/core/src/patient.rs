//! Patient records and the record service.
//!
//! [`PatientService`] is the only place the classifier and the advisor are composed. It derives
//! the stored priority tier whenever vitals are written and attaches a fresh recommendation
//! whenever records are read for display.

use crate::error::{PatientError, PatientResult};
use crate::priority::{PriorityTier, VitalSigns};
use crate::recommendation::{recommend, Recommendation};
use crate::report::{PatientReport, RenderedReport, ReportRenderer};
use crate::store::PatientStore;
use crate::worklist::{priority_counts, sort_worklist};
use crate::NonEmptyText;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Store-allocated patient identifier. Higher ids were admitted later.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatientId(pub u64);

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PatientId {
    type Err = PatientError;

    fn from_str(s: &str) -> PatientResult<Self> {
        s.trim()
            .parse::<u64>()
            .map(PatientId)
            .map_err(|_| PatientError::InvalidInput(format!("invalid patient id '{s}'")))
    }
}

/// A stored patient record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PatientRecord {
    pub id: PatientId,
    pub name: NonEmptyText,
    pub vitals: VitalSigns,
    pub priority: PriorityTier,
    #[serde(default)]
    pub time_of_death: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub surgery_required: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PatientRecord {
    /// Display-time recommendation for this record's notes.
    pub fn recommendation(&self) -> Recommendation {
        recommend(self.notes.as_deref())
    }
}

/// A record ready to be stored, before the store has allocated an id.
#[derive(Clone, Debug, PartialEq)]
pub struct NewRecord {
    pub name: NonEmptyText,
    pub vitals: VitalSigns,
    pub priority: PriorityTier,
    pub time_of_death: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub surgery_required: bool,
    pub created_at: DateTime<Utc>,
}

impl NewRecord {
    pub fn into_record(self, id: PatientId) -> PatientRecord {
        PatientRecord {
            id,
            name: self.name,
            vitals: self.vitals,
            priority: self.priority,
            time_of_death: self.time_of_death,
            notes: self.notes,
            surgery_required: self.surgery_required,
            created_at: self.created_at,
            updated_at: self.created_at,
        }
    }
}

/// Caller-supplied details for a newly arrived patient.
#[derive(Clone, Debug, PartialEq)]
pub struct NewPatient {
    pub name: NonEmptyText,
    pub vitals: VitalSigns,
    pub notes: Option<String>,
    pub surgery_required: bool,
}

/// Replacement details for an existing patient. Every field overwrites the stored value.
pub type PatientUpdate = NewPatient;

/// A record paired with its display-time recommendation.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WorklistEntry {
    pub record: PatientRecord,
    pub recommendation: Recommendation,
}

impl From<PatientRecord> for WorklistEntry {
    fn from(record: PatientRecord) -> Self {
        let recommendation = record.recommendation();
        Self {
            record,
            recommendation,
        }
    }
}

/// Empty notes are stored as absent.
fn normalise_notes(notes: Option<String>) -> Option<String> {
    notes.filter(|n| !n.is_empty())
}

/// Time-of-death stamp after a re-classification.
///
/// Newly deceased patients are stamped with `now`; patients who were already deceased keep their
/// original stamp; anyone else has no stamp.
pub fn next_time_of_death(
    previous_priority: PriorityTier,
    previous_time_of_death: Option<DateTime<Utc>>,
    new_priority: PriorityTier,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    match (previous_priority, new_priority) {
        (PriorityTier::Deceased, PriorityTier::Deceased) => previous_time_of_death.or(Some(now)),
        (_, PriorityTier::Deceased) => Some(now),
        _ => None,
    }
}

/// Pure patient record operations - no API concerns
#[derive(Clone)]
pub struct PatientService {
    store: Arc<dyn PatientStore>,
}

impl PatientService {
    pub fn new(store: Arc<dyn PatientStore>) -> Self {
        Self { store }
    }

    /// Records a newly arrived patient and derives their priority tier.
    ///
    /// A patient classified as `Deceased` on arrival gets a time of death of now.
    ///
    /// # Errors
    ///
    /// Returns a `PatientError` if the store fails to persist the record.
    pub fn admit(&self, patient: NewPatient) -> PatientResult<PatientRecord> {
        let now = Utc::now();
        let priority = patient.vitals.priority();
        let time_of_death = (priority == PriorityTier::Deceased).then_some(now);

        let record = self.store.create(NewRecord {
            name: patient.name,
            vitals: patient.vitals,
            priority,
            time_of_death,
            notes: normalise_notes(patient.notes),
            surgery_required: patient.surgery_required,
            created_at: now,
        })?;

        tracing::info!(id = %record.id, priority = %record.priority, "patient admitted");
        Ok(record)
    }

    /// Replaces a patient's details and re-derives their priority tier.
    ///
    /// # Errors
    ///
    /// Returns `PatientError::NotFound` for an unknown id, or a store error.
    pub fn update(&self, id: PatientId, update: PatientUpdate) -> PatientResult<PatientRecord> {
        let priority = update.vitals.priority();

        // Applied under the store writer lock.
        let record = self.store.modify(
            id,
            Box::new(move |record: &mut PatientRecord| {
                let now = Utc::now();
                record.time_of_death =
                    next_time_of_death(record.priority, record.time_of_death, priority, now);
                record.name = update.name;
                record.vitals = update.vitals;
                record.priority = priority;
                record.notes = normalise_notes(update.notes);
                record.surgery_required = update.surgery_required;
                record.updated_at = now;
            }),
        )?;

        tracing::info!(id = %record.id, priority = %record.priority, "patient updated");
        Ok(record)
    }

    /// # Errors
    ///
    /// Returns `PatientError::NotFound` for an unknown id, or a store error.
    pub fn get(&self, id: PatientId) -> PatientResult<PatientRecord> {
        self.store.get(id)?.ok_or(PatientError::NotFound(id))
    }

    /// Removes a patient from the worklist.
    ///
    /// # Errors
    ///
    /// Returns `PatientError::NotFound` for an unknown id, or a store error.
    pub fn discharge(&self, id: PatientId) -> PatientResult<()> {
        if !self.store.delete(id)? {
            return Err(PatientError::NotFound(id));
        }
        tracing::info!(%id, "patient discharged");
        Ok(())
    }

    /// Every patient with a recommendation, most urgent first.
    pub fn worklist(&self) -> PatientResult<Vec<WorklistEntry>> {
        let mut records = self.store.list()?;
        sort_worklist(&mut records);
        Ok(records.into_iter().map(WorklistEntry::from).collect())
    }

    /// Number of patients in each tier that currently has patients.
    pub fn priority_counts(&self) -> PatientResult<BTreeMap<PriorityTier, usize>> {
        Ok(priority_counts(&self.store.list()?))
    }

    /// Renders a summary report for one patient.
    ///
    /// # Errors
    ///
    /// Returns `PatientError::NotFound` for an unknown id, or a renderer error.
    pub fn report(
        &self,
        id: PatientId,
        renderer: &dyn ReportRenderer,
    ) -> PatientResult<RenderedReport> {
        let record = self.get(id)?;
        let report = PatientReport::from_record(&record);
        Ok(RenderedReport {
            file_name: renderer.file_name(id),
            content_type: renderer.content_type(),
            body: renderer.render(&report)?,
        })
    }
}
