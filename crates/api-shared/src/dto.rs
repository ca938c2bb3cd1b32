//! Wire types for the REST API.
//!
//! These are deliberately flat and string-typed at the edges (priority, timestamps) so the
//! OpenAPI schema stays simple. Priority values are always one of `Deceased`, `Critical`,
//! `High`, `Medium`, `Low`.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// Four vital-sign readings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct VitalSignsReq {
    pub heart_rate: i32,
    /// Systolic, mmHg.
    pub blood_pressure: i32,
    /// Percent.
    pub oxygen_saturation: i32,
    /// Degrees Celsius.
    pub temperature: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ClassifyRes {
    pub priority: String,
    /// Summed sub-scores; absent for `Deceased`.
    pub score: Option<u8>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RecommendReq {
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RecommendRes {
    pub recommendation: String,
}

/// Body for admitting or updating a patient.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PatientReq {
    pub name: String,
    pub heart_rate: i32,
    pub blood_pressure: i32,
    pub oxygen_saturation: i32,
    pub temperature: f64,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub surgery_required: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PatientRes {
    pub id: u64,
    pub name: String,
    pub heart_rate: i32,
    pub blood_pressure: i32,
    pub oxygen_saturation: i32,
    pub temperature: f64,
    pub priority: String,
    /// RFC 3339 timestamp, present only for deceased patients.
    pub time_of_death: Option<String>,
    pub notes: Option<String>,
    pub surgery_required: bool,
    /// Computed when the response is built; never stored.
    pub recommendation: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct WorklistRes {
    pub patients: Vec<PatientRes>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PriorityCount {
    pub priority: String,
    pub count: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PriorityCountsRes {
    pub counts: Vec<PriorityCount>,
}
