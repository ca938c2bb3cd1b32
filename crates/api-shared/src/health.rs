use crate::dto::HealthRes;

/// Simple health service backing the REST `/health` route.
#[derive(Clone, Default)]
pub struct HealthService;

impl HealthService {
    /// Returns a `HealthRes` indicating the service is healthy.
    pub fn check_health() -> HealthRes {
        HealthRes {
            ok: true,
            message: "Triage is alive".into(),
        }
    }
}
