pub mod models;
pub mod repositories;

pub use models::Calendar;
pub use repositories::CalendarRepository;
