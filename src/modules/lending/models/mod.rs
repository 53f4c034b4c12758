pub mod receipts;
pub mod requests;

pub use receipts::{CreditDetail, OriginationReceipt, PaymentReceipt};
pub use requests::{
    OriginateCreditRequest, RecordExpenseRequest, RecordPaymentRequest, TransferCashRequest,
};
