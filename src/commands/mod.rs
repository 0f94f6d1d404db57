pub mod classifier;
pub mod enhance;
pub mod metadata;
pub mod stats;
