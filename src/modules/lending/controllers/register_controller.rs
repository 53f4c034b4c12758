use actix_web::{web, HttpResponse};

use crate::core::{LedgerStore, Result};
use crate::middleware::AgentIdentity;
use crate::modules::lending::models::{RecordExpenseRequest, TransferCashRequest};
use crate::modules::lending::services::LoanLedgerService;

/// POST /api/registers/transfers
pub async fn transfer_cash<S: LedgerStore>(
    service: web::Data<LoanLedgerService<S>>,
    identity: AgentIdentity,
    request: web::Json<TransferCashRequest>,
) -> Result<HttpResponse> {
    let entries = service
        .transfer_cash(&identity.user_id, request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(entries))
}

/// POST /api/registers/{register_id}/expenses
pub async fn record_expense<S: LedgerStore>(
    service: web::Data<LoanLedgerService<S>>,
    identity: AgentIdentity,
    register_id: web::Path<String>,
    request: web::Json<RecordExpenseRequest>,
) -> Result<HttpResponse> {
    let entry = service
        .record_expense(&register_id, &identity.user_id, request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(entry))
}

/// POST /api/registers/{register_id}/shifts
pub async fn open_shift<S: LedgerStore>(
    service: web::Data<LoanLedgerService<S>>,
    identity: AgentIdentity,
    register_id: web::Path<String>,
) -> Result<HttpResponse> {
    let shift = service.open_shift(&register_id, &identity.user_id).await?;
    Ok(HttpResponse::Created().json(shift))
}

/// POST /api/registers/{register_id}/shifts/close
pub async fn close_shift<S: LedgerStore>(
    service: web::Data<LoanLedgerService<S>>,
    _identity: AgentIdentity,
    register_id: web::Path<String>,
) -> Result<HttpResponse> {
    let shift = service.close_shift(&register_id).await?;
    Ok(HttpResponse::Ok().json(shift))
}

/// GET /api/registers/{register_id}/verify
///
/// 200 when the ledger replays to the stored balance, 500 otherwise.
pub async fn verify_register<S: LedgerStore>(
    service: web::Data<LoanLedgerService<S>>,
    register_id: web::Path<String>,
) -> Result<HttpResponse> {
    let report = service.verify_register(&register_id).await?;
    Ok(HttpResponse::Ok().json(report))
}

pub fn configure<S: LedgerStore>(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/registers")
            .route("/transfers", web::post().to(transfer_cash::<S>))
            .route("/{register_id}/expenses", web::post().to(record_expense::<S>))
            .route("/{register_id}/shifts", web::post().to(open_shift::<S>))
            .route("/{register_id}/shifts/close", web::post().to(close_shift::<S>))
            .route("/{register_id}/verify", web::get().to(verify_register::<S>)),
    );
}
