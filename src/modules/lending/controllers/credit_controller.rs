use actix_web::{web, HttpResponse};

use crate::core::{LedgerStore, Result};
use crate::middleware::AgentIdentity;
use crate::modules::lending::models::{OriginateCreditRequest, RecordPaymentRequest};
use crate::modules::lending::services::LoanLedgerService;

/// POST /api/credits
///
/// Originates and disburses a credit. Returns 201 with the credit, its schedule and the
/// disbursement entry; 422 with the failing rule otherwise.
pub async fn originate_credit<S: LedgerStore>(
    service: web::Data<LoanLedgerService<S>>,
    identity: AgentIdentity,
    request: web::Json<OriginateCreditRequest>,
) -> Result<HttpResponse> {
    let application = request.into_inner().into_application(identity.user_id);
    let receipt = service.originate_credit(application).await?;

    Ok(HttpResponse::Created().json(receipt))
}

/// GET /api/credits/{credit_id}
pub async fn get_credit<S: LedgerStore>(
    service: web::Data<LoanLedgerService<S>>,
    credit_id: web::Path<String>,
) -> Result<HttpResponse> {
    let detail = service.credit_detail(&credit_id).await?;
    Ok(HttpResponse::Ok().json(detail))
}

/// POST /api/credits/{credit_id}/payments
///
/// A zero amount records a visit.
pub async fn record_payment<S: LedgerStore>(
    service: web::Data<LoanLedgerService<S>>,
    identity: AgentIdentity,
    credit_id: web::Path<String>,
    request: web::Json<RecordPaymentRequest>,
) -> Result<HttpResponse> {
    let receipt = service
        .record_payment(&credit_id, &identity.user_id, request.into_inner())
        .await?;

    Ok(HttpResponse::Created().json(receipt))
}

pub fn configure<S: LedgerStore>(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/credits")
            .route("", web::post().to(originate_credit::<S>))
            .route("/{credit_id}", web::get().to(get_credit::<S>))
            .route("/{credit_id}/payments", web::post().to(record_payment::<S>)),
    );
}
