pub mod market_data;
pub mod persistence;
pub mod repositories;

pub use market_data::CsvPriceStore;
pub use persistence::{Database, SqlitePriceStore};
pub use repositories::InMemoryPriceStore;
