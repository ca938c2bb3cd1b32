//! # API REST
//!
//! REST API implementation for the triage tracker.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI documentation generated by utoipa
//! - REST-specific concerns (JSON serialization, CORS, API-key checks)
//!
//! Uses `api-shared` for wire types and `triage-core` for all domain work.

#![warn(rust_2018_idioms)]

use axum::{
    extract::{Path as AxumPath, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;

use api_shared::{
    validate_api_key, AuthError, ClassifyRes, HealthRes, HealthService, PatientReq, PatientRes,
    PriorityCount, PriorityCountsRes, RecommendReq, RecommendRes, VitalSignsReq, WorklistRes,
    API_KEY_HEADER,
};
use triage_core::{
    recommend, store_kind_from_env_value, CoreConfig, NewPatient, NonEmptyText, PatientError,
    PatientId, PatientService, ReportRenderer, TextReportRenderer, VitalSigns, WorklistEntry,
    DEFAULT_PATIENT_DATA_DIR,
};

/// Application state shared across REST API handlers
#[derive(Clone)]
pub struct AppState {
    cfg: Arc<CoreConfig>,
    patient_service: PatientService,
    renderer: Arc<dyn ReportRenderer>,
}

impl AppState {
    /// Builds state from a resolved configuration, opening the configured patient store.
    ///
    /// # Errors
    ///
    /// Returns a `PatientError` if the patient store cannot be opened.
    pub fn new(cfg: Arc<CoreConfig>) -> Result<Self, PatientError> {
        let store = cfg.open_store()?;
        Ok(Self {
            cfg,
            patient_service: PatientService::new(store),
            renderer: Arc::new(TextReportRenderer),
        })
    }

    pub fn with_renderer(mut self, renderer: Arc<dyn ReportRenderer>) -> Self {
        self.renderer = renderer;
        self
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        classify_vitals,
        recommend_care,
        list_patients,
        admit_patient,
        get_patient,
        update_patient,
        discharge_patient,
        patient_report,
        priority_counts,
    ),
    components(schemas(
        HealthRes,
        VitalSignsReq,
        ClassifyRes,
        RecommendReq,
        RecommendRes,
        PatientReq,
        PatientRes,
        WorklistRes,
        PriorityCount,
        PriorityCountsRes,
    ))
)]
pub struct ApiDoc;

/// Resolves the core configuration from process environment variables.
///
/// # Environment Variables
/// - `PATIENT_DATA_DIR`: Directory for patient data storage (default: "patient_data")
/// - `TRIAGE_STORE`: `file` or `memory` (default: "file")
/// - `API_KEY`: Key required in the `x-api-key` header; unset disables the check
///
/// # Errors
/// Returns an error if `TRIAGE_STORE` holds an unknown value.
pub fn config_from_env() -> anyhow::Result<CoreConfig> {
    let patient_data_dir =
        std::env::var("PATIENT_DATA_DIR").unwrap_or_else(|_| DEFAULT_PATIENT_DATA_DIR.into());
    let store_kind = store_kind_from_env_value(std::env::var("TRIAGE_STORE").ok())?;
    let api_key = std::env::var("API_KEY").ok();

    Ok(CoreConfig::new(
        PathBuf::from(patient_data_dir),
        store_kind,
        api_key,
    ))
}

/// Builds the REST router.
///
/// `/health` and `/api-docs/openapi.json` are open; every other route passes through the API-key
/// check.
pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/triage/classify", post(classify_vitals))
        .route("/triage/recommend", post(recommend_care))
        .route("/patients", get(list_patients).post(admit_patient))
        .route(
            "/patients/:id",
            get(get_patient).put(update_patient).delete(discharge_patient),
        )
        .route("/patients/:id/report", get(patient_report))
        .route("/analytics/priorities", get(priority_counts))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_api_key,
        ));

    Router::new()
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_json))
        .merge(protected)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serves `router(state)` on `addr` until the server stops.
///
/// # Errors
/// Returns an error if the address is blank, cannot be bound, or the server fails while running.
pub async fn serve(addr: &str, state: AppState) -> anyhow::Result<()> {
    if addr.trim().is_empty() {
        anyhow::bail!("REST address must not be empty");
    }
    if state.cfg.api_key().is_none() {
        tracing::warn!("API_KEY not set; REST API is open to unauthenticated requests");
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn require_api_key(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, (StatusCode, &'static str)> {
    let provided = req
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok());

    match validate_api_key(state.cfg.api_key(), provided) {
        Ok(()) => Ok(next.run(req).await),
        Err(AuthError::MissingKey) => {
            Err((StatusCode::UNAUTHORIZED, "Missing x-api-key header"))
        }
        Err(AuthError::InvalidKey) => Err((StatusCode::UNAUTHORIZED, "Invalid API key")),
    }
}

/// Maps a core error onto a response, logging the detail.
fn patient_error(context: &str, e: PatientError) -> (StatusCode, &'static str) {
    match &e {
        PatientError::NotFound(id) => {
            tracing::info!("{context}: patient {id} not found");
            (StatusCode::NOT_FOUND, "Patient not found")
        }
        PatientError::InvalidInput(_) | PatientError::Text(_) => {
            tracing::info!("{context}: {e}");
            (StatusCode::BAD_REQUEST, "Bad request")
        }
        _ => {
            tracing::error!("{context} error: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
        }
    }
}

fn vital_signs(req: &VitalSignsReq) -> VitalSigns {
    VitalSigns::new(
        req.heart_rate,
        req.blood_pressure,
        req.oxygen_saturation,
        req.temperature,
    )
}

fn new_patient(req: PatientReq) -> Result<NewPatient, PatientError> {
    Ok(NewPatient {
        name: NonEmptyText::new(&req.name)?,
        vitals: VitalSigns::new(
            req.heart_rate,
            req.blood_pressure,
            req.oxygen_saturation,
            req.temperature,
        ),
        notes: req.notes,
        surgery_required: req.surgery_required,
    })
}

fn patient_res(entry: WorklistEntry) -> PatientRes {
    let WorklistEntry {
        record,
        recommendation,
    } = entry;

    PatientRes {
        id: record.id.0,
        name: record.name.into_inner(),
        heart_rate: record.vitals.heart_rate,
        blood_pressure: record.vitals.blood_pressure,
        oxygen_saturation: record.vitals.oxygen_saturation,
        temperature: record.vitals.temperature,
        priority: record.priority.to_string(),
        time_of_death: record.time_of_death.map(|t| t.to_rfc3339()),
        notes: record.notes,
        surgery_required: record.surgery_required,
        recommendation: recommendation.to_string(),
        created_at: record.created_at.to_rfc3339(),
        updated_at: record.updated_at.to_rfc3339(),
    }
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
#[axum::debug_handler]
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    post,
    path = "/triage/classify",
    request_body = VitalSignsReq,
    responses(
        (status = 200, description = "Priority tier for the readings", body = ClassifyRes),
        (status = 401, description = "Missing or invalid API key")
    )
)]
/// Classify a set of vital signs without storing anything
#[axum::debug_handler]
async fn classify_vitals(
    State(_state): State<AppState>,
    Json(req): Json<VitalSignsReq>,
) -> Json<ClassifyRes> {
    let vitals = vital_signs(&req);
    Json(ClassifyRes {
        priority: vitals.priority().to_string(),
        score: vitals.severity_score(),
    })
}

#[utoipa::path(
    post,
    path = "/triage/recommend",
    request_body = RecommendReq,
    responses(
        (status = 200, description = "Care recommendation for the notes", body = RecommendRes),
        (status = 401, description = "Missing or invalid API key")
    )
)]
/// Look up care advice for free-text notes
#[axum::debug_handler]
async fn recommend_care(
    State(_state): State<AppState>,
    Json(req): Json<RecommendReq>,
) -> Json<RecommendRes> {
    Json(RecommendRes {
        recommendation: recommend(req.notes.as_deref()).to_string(),
    })
}

#[utoipa::path(
    get,
    path = "/patients",
    responses(
        (status = 200, description = "Worklist, most urgent first", body = WorklistRes),
        (status = 401, description = "Missing or invalid API key"),
        (status = 500, description = "Internal server error")
    )
)]
/// List every patient, ordered Deceased, Critical, High, Medium, Low and newest first within
/// a tier
///
/// # Errors
/// Returns `500 Internal Server Error` if the patient store cannot be read.
#[axum::debug_handler]
async fn list_patients(
    State(state): State<AppState>,
) -> Result<Json<WorklistRes>, (StatusCode, &'static str)> {
    let worklist = state
        .patient_service
        .worklist()
        .map_err(|e| patient_error("List patients", e))?;

    Ok(Json(WorklistRes {
        patients: worklist.into_iter().map(patient_res).collect(),
    }))
}

#[utoipa::path(
    post,
    path = "/patients",
    request_body = PatientReq,
    responses(
        (status = 201, description = "Patient admitted", body = PatientRes),
        (status = 400, description = "Bad request"),
        (status = 401, description = "Missing or invalid API key"),
        (status = 500, description = "Internal server error")
    )
)]
/// Admit a patient and derive their priority
///
/// # Errors
/// Returns `400 Bad Request` for a blank name and `500 Internal Server Error` if storing fails.
#[axum::debug_handler]
async fn admit_patient(
    State(state): State<AppState>,
    Json(req): Json<PatientReq>,
) -> Result<(StatusCode, Json<PatientRes>), (StatusCode, &'static str)> {
    let patient = new_patient(req).map_err(|e| patient_error("Admit patient", e))?;
    let record = state
        .patient_service
        .admit(patient)
        .map_err(|e| patient_error("Admit patient", e))?;

    Ok((StatusCode::CREATED, Json(patient_res(record.into()))))
}

#[utoipa::path(
    get,
    path = "/patients/{id}",
    params(("id" = u64, Path, description = "Patient id")),
    responses(
        (status = 200, description = "Patient record", body = PatientRes),
        (status = 401, description = "Missing or invalid API key"),
        (status = 404, description = "Patient not found")
    )
)]
/// Fetch one patient with a fresh recommendation
#[axum::debug_handler]
async fn get_patient(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<u64>,
) -> Result<Json<PatientRes>, (StatusCode, &'static str)> {
    let record = state
        .patient_service
        .get(PatientId(id))
        .map_err(|e| patient_error("Get patient", e))?;

    Ok(Json(patient_res(record.into())))
}

#[utoipa::path(
    put,
    path = "/patients/{id}",
    params(("id" = u64, Path, description = "Patient id")),
    request_body = PatientReq,
    responses(
        (status = 200, description = "Patient updated", body = PatientRes),
        (status = 400, description = "Bad request"),
        (status = 401, description = "Missing or invalid API key"),
        (status = 404, description = "Patient not found"),
        (status = 500, description = "Internal server error")
    )
)]
/// Replace a patient's details and re-derive their priority
#[axum::debug_handler]
async fn update_patient(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<u64>,
    Json(req): Json<PatientReq>,
) -> Result<Json<PatientRes>, (StatusCode, &'static str)> {
    let update = new_patient(req).map_err(|e| patient_error("Update patient", e))?;
    let record = state
        .patient_service
        .update(PatientId(id), update)
        .map_err(|e| patient_error("Update patient", e))?;

    Ok(Json(patient_res(record.into())))
}

#[utoipa::path(
    delete,
    path = "/patients/{id}",
    params(("id" = u64, Path, description = "Patient id")),
    responses(
        (status = 204, description = "Patient discharged"),
        (status = 401, description = "Missing or invalid API key"),
        (status = 404, description = "Patient not found")
    )
)]
/// Remove a patient from the worklist
#[axum::debug_handler]
async fn discharge_patient(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<u64>,
) -> Result<StatusCode, (StatusCode, &'static str)> {
    state
        .patient_service
        .discharge(PatientId(id))
        .map_err(|e| patient_error("Discharge patient", e))?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/patients/{id}/report",
    params(("id" = u64, Path, description = "Patient id")),
    responses(
        (status = 200, description = "Rendered patient report, sent as an attachment"),
        (status = 401, description = "Missing or invalid API key"),
        (status = 404, description = "Patient not found")
    )
)]
/// Download a summary report for one patient
#[axum::debug_handler]
async fn patient_report(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<u64>,
) -> Result<Response, (StatusCode, &'static str)> {
    let rendered = state
        .patient_service
        .report(PatientId(id), state.renderer.as_ref())
        .map_err(|e| patient_error("Patient report", e))?;

    let headers = [
        (header::CONTENT_TYPE, rendered.content_type.to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", rendered.file_name),
        ),
    ];
    Ok((headers, rendered.body).into_response())
}

#[utoipa::path(
    get,
    path = "/analytics/priorities",
    responses(
        (status = 200, description = "Patients per priority tier", body = PriorityCountsRes),
        (status = 401, description = "Missing or invalid API key"),
        (status = 500, description = "Internal server error")
    )
)]
/// Count patients per priority tier, most urgent tier first
#[axum::debug_handler]
async fn priority_counts(
    State(state): State<AppState>,
) -> Result<Json<PriorityCountsRes>, (StatusCode, &'static str)> {
    let counts = state
        .patient_service
        .priority_counts()
        .map_err(|e| patient_error("Priority counts", e))?;

    Ok(Json(PriorityCountsRes {
        counts: counts
            .into_iter()
            .map(|(tier, count)| PriorityCount {
                priority: tier.to_string(),
                count: count as u64,
            })
            .collect(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request as HttpRequest;
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use tower::ServiceExt;
    use triage_core::StoreKind;

    const KEY: &str = "test-key";

    fn memory_app(api_key: Option<&str>) -> Router {
        let cfg = CoreConfig::new(
            PathBuf::from("unused"),
            StoreKind::Memory,
            api_key.map(str::to_string),
        );
        router(AppState::new(Arc::new(cfg)).expect("state should build"))
    }

    fn request(method: &str, uri: &str, body: Option<Value>) -> HttpRequest<Body> {
        let builder = HttpRequest::builder()
            .method(method)
            .uri(uri)
            .header(API_KEY_HEADER, KEY);
        match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn send(app: &Router, req: HttpRequest<Body>) -> (StatusCode, Vec<u8>) {
        let response = app.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    async fn send_json(app: &Router, req: HttpRequest<Body>) -> (StatusCode, Value) {
        let (status, body) = send(app, req).await;
        let value = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap()
        };
        (status, value)
    }

    fn patient_body(name: &str, hr: i32, bp: i32, ox: i32, temp: f64, notes: &str) -> Value {
        json!({
            "name": name,
            "heart_rate": hr,
            "blood_pressure": bp,
            "oxygen_saturation": ox,
            "temperature": temp,
            "notes": notes,
        })
    }

    #[tokio::test]
    async fn health_is_open() {
        let app = memory_app(Some(KEY));
        let req = HttpRequest::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let (status, body) = send_json(&app, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], true);
    }

    #[tokio::test]
    async fn protected_routes_require_the_api_key() {
        let app = memory_app(Some(KEY));

        let missing = HttpRequest::builder()
            .uri("/patients")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(&app, missing).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let wrong = HttpRequest::builder()
            .uri("/patients")
            .header(API_KEY_HEADER, "nope")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(&app, wrong).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send(&app, request("GET", "/patients", None)).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn no_configured_key_leaves_routes_open() {
        let app = memory_app(None);
        let req = HttpRequest::builder()
            .uri("/analytics/priorities")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send_json(&app, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["counts"], json!([]));
    }

    #[tokio::test]
    async fn classify_endpoint_returns_tier_and_score() {
        let app = memory_app(Some(KEY));
        let body = json!({
            "heart_rate": 150,
            "blood_pressure": 200,
            "oxygen_saturation": 85,
            "temperature": 40.0
        });

        let (status, res) = send_json(&app, request("POST", "/triage/classify", Some(body))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(res["priority"], "Critical");
        assert_eq!(res["score"], 11);

        let dead = json!({
            "heart_rate": 0,
            "blood_pressure": 0,
            "oxygen_saturation": 0,
            "temperature": 37.0
        });
        let (_, res) = send_json(&app, request("POST", "/triage/classify", Some(dead))).await;
        assert_eq!(res["priority"], "Deceased");
        assert_eq!(res["score"], Value::Null);
    }

    #[tokio::test]
    async fn recommend_endpoint_distinguishes_sentinels() {
        let app = memory_app(Some(KEY));

        let (_, res) = send_json(&app, request("POST", "/triage/recommend", Some(json!({})))).await;
        assert_eq!(res["recommendation"], "No recommendation");

        let (_, res) = send_json(
            &app,
            request("POST", "/triage/recommend", Some(json!({"notes": "all good"}))),
        )
        .await;
        assert_eq!(res["recommendation"], "No recommendation available");

        let (_, res) = send_json(
            &app,
            request(
                "POST",
                "/triage/recommend",
                Some(json!({"notes": "Fever and infection noted"})),
            ),
        )
        .await;
        assert_eq!(
            res["recommendation"],
            "Give paracetamol and monitor temperature."
        );
    }

    #[tokio::test]
    async fn patient_lifecycle() {
        let app = memory_app(Some(KEY));

        let (status, created) = send_json(
            &app,
            request(
                "POST",
                "/patients",
                Some(patient_body("Ann", 80, 120, 98, 36.9, "mild cold")),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["id"], 1);
        assert_eq!(created["priority"], "Low");
        assert_eq!(created["recommendation"], "Prescribe antihistamines and rest.");
        assert_eq!(created["time_of_death"], Value::Null);

        let (status, updated) = send_json(
            &app,
            request(
                "PUT",
                "/patients/1",
                Some(patient_body("Ann", 0, 0, 0, 35.5, "")),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["priority"], "Deceased");
        assert!(updated["time_of_death"].is_string());
        assert_eq!(updated["recommendation"], "No recommendation");

        let (status, fetched) = send_json(&app, request("GET", "/patients/1", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched, updated);

        let (status, _) = send(&app, request("DELETE", "/patients/1", None)).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send(&app, request("GET", "/patients/1", None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, request("DELETE", "/patients/1", None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn admit_rejects_blank_name() {
        let app = memory_app(Some(KEY));
        let (status, _) = send(
            &app,
            request(
                "POST",
                "/patients",
                Some(patient_body("   ", 80, 120, 98, 36.9, "")),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn worklist_and_analytics_follow_priority_order() {
        let app = memory_app(Some(KEY));
        for body in [
            patient_body("Low", 80, 120, 98, 36.9, ""),
            patient_body("Critical", 150, 200, 85, 40.0, "stroke"),
            patient_body("Low newer", 75, 125, 99, 37.1, ""),
            patient_body("Dead", 0, 0, 0, 30.0, ""),
        ] {
            let (status, _) = send(&app, request("POST", "/patients", Some(body))).await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let (status, worklist) = send_json(&app, request("GET", "/patients", None)).await;
        assert_eq!(status, StatusCode::OK);
        let names: Vec<&str> = worklist["patients"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Dead", "Critical", "Low newer", "Low"]);

        let (_, analytics) = send_json(&app, request("GET", "/analytics/priorities", None)).await;
        assert_eq!(
            analytics["counts"],
            json!([
                {"priority": "Deceased", "count": 1},
                {"priority": "Critical", "count": 1},
                {"priority": "Low", "count": 2},
            ])
        );
    }

    #[tokio::test]
    async fn report_is_sent_as_attachment() {
        let app = memory_app(Some(KEY));
        send(
            &app,
            request(
                "POST",
                "/patients",
                Some(patient_body("Rae", 80, 120, 98, 36.9, "bleeding")),
            ),
        )
        .await;

        let response = app
            .clone()
            .oneshot(request("GET", "/patients/1/report", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"patient_1_report.txt\""
        );

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(text.starts_with("Patient Report - ID: 1"));
        assert!(text.contains("Recommendation: Apply pressure dressing and evaluate for transfusion."));
    }

    #[tokio::test]
    async fn report_renderer_is_swappable() {
        let cfg = CoreConfig::new(PathBuf::from("unused"), StoreKind::Memory, None);
        let state = AppState::new(Arc::new(cfg))
            .unwrap()
            .with_renderer(Arc::new(triage_core::JsonReportRenderer));
        let app = router(state);
        send(
            &app,
            request(
                "POST",
                "/patients",
                Some(patient_body("Uma", 120, 170, 92, 39.5, "asthma")),
            ),
        )
        .await;

        let response = app
            .clone()
            .oneshot(request("GET", "/patients/1/report", None))
            .await
            .unwrap();
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let report: Value = serde_json::from_slice(&body).unwrap();
        // hr 120 -> 2, bp 170 -> 1, oxygen 92 -> 2, temp 39.5 -> 2
        assert_eq!(report["priority"], "High");
        assert_eq!(report["time_of_death"], "-");
    }

    #[tokio::test]
    async fn file_store_backs_the_api() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let cfg = CoreConfig::new(temp_dir.path().to_path_buf(), StoreKind::File, None);
        let app = router(AppState::new(Arc::new(cfg.clone())).unwrap());

        let (status, _) = send(
            &app,
            request(
                "POST",
                "/patients",
                Some(patient_body("Sam", 50, 85, 97, 37.0, "")),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert!(cfg.patients_dir().join("1.yaml").is_file());
    }

    #[tokio::test]
    async fn openapi_document_lists_routes() {
        let app = memory_app(Some(KEY));
        let req = HttpRequest::builder()
            .uri("/api-docs/openapi.json")
            .body(Body::empty())
            .unwrap();
        let (status, doc) = send_json(&app, req).await;
        assert_eq!(status, StatusCode::OK);
        assert!(doc["paths"]["/patients/{id}/report"].is_object());
        assert!(doc["paths"]["/triage/classify"].is_object());
    }
}
