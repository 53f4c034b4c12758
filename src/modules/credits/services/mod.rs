pub mod installment_scheduler;
pub mod origination_validator;

pub use installment_scheduler::{InstallmentScheduler, ScheduledInstallment};
pub use origination_validator::{CreditOriginationValidator, ValidatedOrigination};
