pub mod route_credit_policy;

pub use route_credit_policy::{Frequency, LendingSettings, RouteCreditPolicy};
