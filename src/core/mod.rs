pub mod clock;
pub mod error;
pub mod money;
pub mod traits;

pub use clock::BusinessClock;
pub use error::{AppError, ConfigurationError, Result, ValidationError};
pub use traits::{LedgerStore, UnitOfWork};
