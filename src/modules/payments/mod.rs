pub mod models;
pub mod repositories;
pub mod services;

pub use models::{Payment, PaymentAllocation, PaymentType, PlannedAllocation};
pub use repositories::PaymentRepository;
pub use services::{AllocationOutcome, PaymentAllocationEngine};
