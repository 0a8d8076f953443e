pub mod classifier;
pub mod context;
pub mod report;
pub mod signals;
