//! Field-lending loan ledger engine.
//!
//! Credit origination, installment scheduling and payment allocation, all coupled to
//! a cash-register ledger whose balances never move without a paired entry.

pub mod config;
pub mod core;
pub mod middleware;
pub mod modules;
pub mod store;

pub use crate::core::{AppError, BusinessClock, LedgerStore, Result, UnitOfWork};
pub use modules::lending::LoanLedgerService;
pub use store::{MemoryStore, MySqlStore};
