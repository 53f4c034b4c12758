pub mod credit;
pub mod credit_application;
pub mod installment;

pub use credit::{interest_for, Credit, CreditStatus, NewCredit};
pub use credit_application::CreditApplication;
pub use installment::{Installment, InstallmentStatus};
