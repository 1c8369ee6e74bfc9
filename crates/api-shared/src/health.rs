use crate::dto::HealthRes;

/// Liveness reporting for the Nirogya API.
#[derive(Clone, Default)]
pub struct HealthService;

impl HealthService {
    /// Reports the API process as alive.
    ///
    /// This says nothing about the external prediction service; that has its own health
    /// endpoint.
    pub fn check_health() -> HealthRes {
        HealthRes {
            ok: true,
            message: "Nirogya is alive".into(),
        }
    }
}
