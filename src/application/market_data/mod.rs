pub mod decomposition;

pub use decomposition::{DecompositionService, DecompositionSettings};
