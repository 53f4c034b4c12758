pub mod cash_register_ledger;

pub use cash_register_ledger::{CashRegisterLedger, RegisterVerification, TransferEntries};
