//! # Storefront Dataset Crate
//!
//! This crate is the system's only contact with the outside world: it reads the
//! joined e-commerce export once at startup and holds it as an immutable,
//! chronologically ordered table.
//!
//! ## Architectural Principles
//!
//! - **Layer 3 Adapter:** All knowledge of the file format (delimiter, column
//!   names, how the export writes blanks and floats) lives here. The rest of the
//!   workspace only ever sees `OrderRecord`s.
//! - **Fail Loudly at Load Time:** An unreadable file, a missing column or an
//!   unparseable value aborts the load with a `DatasetError` that names the line
//!   and column. Nothing downstream has to re-validate.
//! - **Read-Only After Load:** `Dataset` is never mutated. Filtering returns a
//!   borrowed `FilteredView` over a contiguous slice of the sorted rows.
//!
//! ## Public API
//!
//! - `load_csv` / `read_csv`: Parse a file or any reader into a `Dataset`.
//! - `Dataset`: The loaded rows plus their date bounds.
//! - `FilteredView`: The rows inside an inclusive `DateRange`.
//! - `DatasetError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod error;
pub mod loader;
mod row;
pub mod store;

// Re-export the key components to create a clean, public-facing API.
pub use error::DatasetError;
pub use loader::{load_csv, read_csv, LoadOptions, REQUIRED_COLUMNS};
pub use store::{Dataset, FilteredView};
