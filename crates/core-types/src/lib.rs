//! # Storefront Core Types
//!
//! The shared vocabulary of the workspace: the joined order row, the inclusive
//! date range used to filter it, and the policy enums that make the
//! aggregation layer's implicit choices explicit.
//!
//! This is a Layer 0 crate. It has no knowledge of files, configuration or
//! presentation.

pub mod enums;
pub mod error;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::{BucketFill, RecencyReference};
pub use error::CoreError;
pub use structs::{AnalysisSettings, DateRange, OrderRecord};
