use serde::Serialize;

use crate::modules::credits::models::{Credit, Installment};
use crate::modules::payments::models::{Payment, PaymentAllocation};
use crate::modules::registers::models::LedgerEntry;

/// Everything written by a successful origination
#[derive(Debug, Clone, Serialize)]
pub struct OriginationReceipt {
    pub credit: Credit,
    pub installments: Vec<Installment>,
    pub disbursement: LedgerEntry,
}

/// Everything written by a successful payment or visit
#[derive(Debug, Clone, Serialize)]
pub struct PaymentReceipt {
    pub payment: Payment,
    pub allocations: Vec<PaymentAllocation>,
    /// Credit state after the payment
    pub credit: Credit,
    pub collection: LedgerEntry,
}

/// Read-only view of a credit and its history
#[derive(Debug, Clone, Serialize)]
pub struct CreditDetail {
    pub credit: Credit,
    pub installments: Vec<Installment>,
    pub allocations: Vec<PaymentAllocation>,
}
