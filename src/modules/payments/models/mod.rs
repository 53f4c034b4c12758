pub mod payment;
pub mod payment_allocation;

pub use payment::{Payment, PaymentType, PAYMENT_STATUS_APPROVED};
pub use payment_allocation::{PaymentAllocation, PlannedAllocation};
