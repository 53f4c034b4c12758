pub mod credit_repository;
pub mod installment_repository;

pub use credit_repository::CreditRepository;
pub use installment_repository::InstallmentRepository;
