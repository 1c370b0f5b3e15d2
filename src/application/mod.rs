// Startup wiring
pub mod bootstrap;

// Price series decomposition
pub mod market_data;

// Model artifacts, inference and prediction service
pub mod ml;
