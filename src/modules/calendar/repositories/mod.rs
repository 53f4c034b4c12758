pub mod calendar_repository;

pub use calendar_repository::CalendarRepository;
