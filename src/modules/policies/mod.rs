pub mod models;
pub mod repositories;

pub use models::{Frequency, LendingSettings, RouteCreditPolicy};
pub use repositories::PolicyRepository;
