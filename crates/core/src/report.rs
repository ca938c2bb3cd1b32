//! Per-patient summary reports.
//!
//! A [`PatientReport`] is the renderer-neutral content of a summary: identity, vitals, tier,
//! notes and a freshly computed recommendation. A [`ReportRenderer`] turns it into bytes for
//! download. PDF output would be another renderer behind the same trait.

use crate::constants::TIME_OF_DEATH_FORMAT;
use crate::error::{PatientError, PatientResult};
use crate::patient::{PatientId, PatientRecord};
use crate::priority::PriorityTier;
use serde::Serialize;

/// Content of a patient summary.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PatientReport {
    pub id: PatientId,
    pub name: String,
    pub heart_rate: i32,
    pub blood_pressure: i32,
    pub oxygen_saturation: i32,
    pub temperature: f64,
    pub priority: PriorityTier,
    pub surgery_required: bool,
    pub notes: String,
    pub recommendation: String,
    /// Formatted time of death, or `-`.
    pub time_of_death: String,
}

impl PatientReport {
    pub fn from_record(record: &PatientRecord) -> Self {
        Self {
            id: record.id,
            name: record.name.to_string(),
            heart_rate: record.vitals.heart_rate,
            blood_pressure: record.vitals.blood_pressure,
            oxygen_saturation: record.vitals.oxygen_saturation,
            temperature: record.vitals.temperature,
            priority: record.priority,
            surgery_required: record.surgery_required,
            notes: record.notes.clone().unwrap_or_default(),
            recommendation: record.recommendation().to_string(),
            time_of_death: record
                .time_of_death
                .map(|t| t.format(TIME_OF_DEATH_FORMAT).to_string())
                .unwrap_or_else(|| "-".to_string()),
        }
    }

    /// Label/value pairs in print order.
    pub fn lines(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Name", self.name.clone()),
            ("Heart Rate", self.heart_rate.to_string()),
            ("Blood Pressure", self.blood_pressure.to_string()),
            ("Oxygen Level", self.oxygen_saturation.to_string()),
            ("Temperature", format!("{:?}", self.temperature)),
            ("Priority", self.priority.to_string()),
            (
                "Surgery Required",
                if self.surgery_required { "Yes" } else { "No" }.to_string(),
            ),
            ("Notes", self.notes.clone()),
            ("Recommendation", self.recommendation.clone()),
            ("Time of Death", self.time_of_death.clone()),
        ]
    }
}

/// A rendered report ready to be sent or written to disk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedReport {
    pub file_name: String,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

/// Output format for patient reports.
pub trait ReportRenderer: Send + Sync {
    fn content_type(&self) -> &'static str;

    fn file_name(&self, id: PatientId) -> String;

    /// # Errors
    ///
    /// Returns a `PatientError` if the report cannot be encoded.
    fn render(&self, report: &PatientReport) -> PatientResult<Vec<u8>>;
}

/// Plain-text report, one `Label: value` line per field.
#[derive(Clone, Copy, Debug, Default)]
pub struct TextReportRenderer;

impl ReportRenderer for TextReportRenderer {
    fn content_type(&self) -> &'static str {
        "text/plain; charset=utf-8"
    }

    fn file_name(&self, id: PatientId) -> String {
        format!("patient_{id}_report.txt")
    }

    fn render(&self, report: &PatientReport) -> PatientResult<Vec<u8>> {
        let body: String = report
            .lines()
            .iter()
            .map(|(label, value)| format!("{label}: {value}\n"))
            .collect();
        Ok(format!("Patient Report - ID: {}\n\n{body}", report.id).into_bytes())
    }
}

/// Pretty-printed JSON report.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonReportRenderer;

impl ReportRenderer for JsonReportRenderer {
    fn content_type(&self) -> &'static str {
        "application/json"
    }

    fn file_name(&self, id: PatientId) -> String {
        format!("patient_{id}_report.json")
    }

    fn render(&self, report: &PatientReport) -> PatientResult<Vec<u8>> {
        serde_json::to_vec_pretty(report).map_err(PatientError::ReportSerialization)
    }
}
