pub mod loan_ledger_service;

pub use loan_ledger_service::LoanLedgerService;
