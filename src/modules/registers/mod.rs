pub mod models;
pub mod repositories;
pub mod services;

pub use models::{CashRegister, EntryCategory, EntryKind, EntryMeta, LedgerEntry, Shift};
pub use repositories::RegisterRepository;
pub use services::{CashRegisterLedger, RegisterVerification, TransferEntries};
