use actix_web::{web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};

use crate::core::{LedgerStore, UnitOfWork};
use crate::modules::lending::services::LoanLedgerService;

/// Health check response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

/// Readiness probe response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    pub store: bool,
}

/// GET /health - Liveness probe, no dependency checks
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// GET /ready - Readiness probe
/// Opens and rolls back a unit of work against the ledger store
pub async fn readiness_check<S: LedgerStore>(
    service: web::Data<LoanLedgerService<S>>,
) -> impl Responder {
    let store = match service.store().begin().await {
        Ok(uow) => match uow.rollback().await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(error = %e, "Store readiness rollback failed");
                false
            }
        },
        Err(e) => {
            tracing::error!(error = %e, "Store readiness check failed");
            false
        }
    };

    let response = ReadinessResponse {
        ready: store,
        store,
    };

    if store {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}

/// Configure health check routes
pub fn configure<S: LedgerStore>(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/ready", web::get().to(readiness_check::<S>));
}
