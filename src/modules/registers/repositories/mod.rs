pub mod register_repository;

pub use register_repository::RegisterRepository;
