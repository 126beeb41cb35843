use actix_web::{get, web, HttpResponse, Responder};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::StorageBackend;

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub version: &'static str,
    /// Absent when the app was assembled without a configured backend.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage: Option<StorageBackend>,
    pub timestamp: DateTime<Utc>,
}

/// Liveness probe. Unauthenticated and mounted outside `/api/v1`.
#[get("/health")]
pub async fn health(storage: Option<web::Data<StorageBackend>>) -> impl Responder {
    HttpResponse::Ok().json(HealthReport {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        storage: storage.map(|backend| *backend.get_ref()),
        timestamp: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};

    #[actix_rt::test]
    async fn test_health_reports_backend() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(StorageBackend::Memory))
                .service(health),
        )
        .await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let json: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(json["status"], "ok");
        assert_eq!(json["storage"], "memory");
        assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
        assert!(json["timestamp"].is_string());
    }

    #[actix_rt::test]
    async fn test_health_without_backend() {
        let app = test::init_service(App::new().service(health)).await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);

        let json: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(json["status"], "ok");
        assert!(json.get("storage").is_none());
    }
}
