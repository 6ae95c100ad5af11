//! Readiness check.

/// `GET /api/healthz`: always `200 OK` with a plain-text body.
pub async fn healthz() -> &'static str {
    "OK"
}
