//! Repository implementations for Fresco

pub mod catalog_repo;
pub mod cleaner_repo;
pub mod order_repo;

pub use catalog_repo::PgCatalogRepository;
pub use cleaner_repo::PgCleanerRepository;
pub use order_repo::PgOrderRepository;
