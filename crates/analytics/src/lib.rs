//! # Storefront Analytics Engine
//!
//! This crate turns the filtered order table into the eleven derived tables the
//! dashboard displays, plus the headline metrics computed over them.
//!
//! ## Architectural Principles
//!
//! - **Pure Transforms:** Every function in `transforms` takes a slice of
//!   `OrderRecord`s and returns a freshly built table. Nothing is cached and
//!   nothing is shared between transforms, so any subset can run in any order.
//! - **Empty Is Valid:** An empty slice produces empty tables. Means over empty
//!   tables are `None`, sums are zero. Nothing in here treats "no data" as an
//!   error.
//! - **Deterministic Output:** Groups are collected in ordered maps and every
//!   ranking breaks ties by ascending key, so the same input always serializes
//!   to the same bytes.
//!
//! ## Public API
//!
//! - `AnalyticsEngine`: Filters a `Dataset` and builds a `Dashboard`.
//! - `transforms`: The eleven individual aggregations.
//! - `ranking`: Alternate orderings and head-N helpers used for display.
//! - `Dashboard`, `SummaryMetrics` and the row types in `tables`.
//! - `AnalyticsError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod error;
pub mod ranking;
pub mod summary;
pub mod tables;
pub mod transforms;

// Re-export the key components to create a clean, public-facing API.
pub use engine::AnalyticsEngine;
pub use error::AnalyticsError;
pub use summary::SummaryMetrics;
pub use tables::{
    CategorySummary, CustomerCityCount, CustomerStateCount, Dashboard, OrderBucket,
    PaymentTypeOrders, ProductSales, RfmScore, SellerCityCount, SellerOrders, SellerStateCount,
};
