pub mod csv_prices;

pub use csv_prices::CsvPriceStore;
