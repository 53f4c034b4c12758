pub mod cash_register;
pub mod ledger_entry;
pub mod shift;

pub use cash_register::{CashRegister, RegisterStatus};
pub use ledger_entry::{EntryCategory, EntryKind, EntryMeta, LedgerEntry};
pub use shift::Shift;
