pub mod models;
pub mod repositories;
pub mod services;

pub use models::{Credit, CreditApplication, CreditStatus, Installment, InstallmentStatus};
pub use repositories::{CreditRepository, InstallmentRepository};
pub use services::{CreditOriginationValidator, InstallmentScheduler};
