pub mod database;
pub mod price_repository;

pub use database::Database;
pub use price_repository::SqlitePriceStore;
