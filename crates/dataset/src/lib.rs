//! # Listings Dataset Crate
//!
//! Read-only access to the apartment listings the analyzer works on.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Adapter:** This crate owns every detail of the CSV format. The rest of
//!   the workspace only ever sees validated `Listing` values.
//! - **Immutable Snapshot:** Listings are loaded once per source and shared behind an
//!   `Arc<[Listing]>`. Queries borrow from the snapshot and never modify it.
//!
//! ## Public API
//!
//! - `load`: Reads and validates a CSV file into listings.
//! - `filter_by_city`, `find_by_id`, `cities`: Pure queries over a listing set.
//! - `DatasetCache`: Memoises `load` per source for the session.
//! - `DatasetError`: The specific error types that can be returned from this crate.

pub mod cache;
pub mod error;
pub mod loader;
pub mod query;

pub use cache::DatasetCache;
pub use error::DatasetError;
pub use loader::load;
pub use query::{cities, filter_by_city, find_by_id};
