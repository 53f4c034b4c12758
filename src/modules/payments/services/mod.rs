pub mod allocation_engine;

pub use allocation_engine::{AllocationOutcome, PaymentAllocationEngine};
