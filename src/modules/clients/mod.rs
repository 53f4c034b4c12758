pub mod models;
pub mod repositories;

pub use models::ClientRecord;
pub use repositories::ClientRepository;
