// Price series and decomposition records
pub mod market;

// Model input schema and prediction records
pub mod ml;

// Port interfaces
pub mod ports;

// Domain-specific error types
pub mod errors;
