pub mod credit_controller;
pub mod register_controller;

use actix_web::web;

use crate::core::LedgerStore;

/// Mount every ledger endpoint for the given store backend
pub fn configure<S: LedgerStore>(cfg: &mut web::ServiceConfig) {
    credit_controller::configure::<S>(cfg);
    register_controller::configure::<S>(cfg);
}
