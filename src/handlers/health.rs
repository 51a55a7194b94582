use axum::{http::StatusCode, Json};
use crate::types::responses::{HealthResponse, ServiceInfo};

/// Service banner. Exempt from authentication and does no database work.
pub async fn index() -> (StatusCode, Json<ServiceInfo>) {
    (
        StatusCode::OK,
        Json(ServiceInfo {
            service: "MongoDB HTTP Bridge".to_string(),
            status: "running".to_string(),
            auth_required: true,
            endpoints: vec![
                "GET  /databases".to_string(),
                "GET  /databases/<db>/collections".to_string(),
                "POST /query".to_string(),
                "POST /aggregate".to_string(),
                "POST /insert".to_string(),
                "POST /update".to_string(),
                "POST /delete".to_string(),
                "POST /command".to_string(),
                "POST /sample".to_string(),
                "GET  /collection/<db>/<collection>/count".to_string(),
                "GET  /collection/<db>/<collection>/indexes".to_string(),
            ],
        }),
    )
}

pub async fn health_check() -> (StatusCode, Json<HealthResponse>) {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}
