pub mod calendar;
pub mod clients;
pub mod credits;
pub mod health;
pub mod lending;
pub mod payments;
pub mod policies;
pub mod registers;
