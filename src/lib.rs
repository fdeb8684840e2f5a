// Public modules
pub mod algorithms;
pub mod config;
pub mod error;
pub mod models;
pub mod utils;

// Re-exports for convenience
pub use algorithms::basket_splitter::{BasketSplitter, SearchStats};
pub use algorithms::BasketSplitSolver;
pub use config::SplitterConfig;
pub use error::{CatalogError, FlowError, SplitError};
pub use models::{BasketSplit, DeliveryCatalog};
