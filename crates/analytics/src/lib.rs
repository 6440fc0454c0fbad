//! # Flip Investment Analytics
//!
//! This crate turns a selected listing and a handful of cost inputs into the numbers a
//! buy-renovate-resell decision rests on: costs, profit, taxes, returns, and the
//! nearby competition.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** Everything here is a pure function of its arguments. There is
//!   no I/O and no ambient state; the caller passes the current selection explicitly.
//! - **No Caching Across Selections:** Competitor distances are always measured from
//!   the listing passed in, every time.
//!
//! ## Public API
//!
//! - `InvestmentAnalyzer`: Runs the full pipeline for one `AnalysisInput`.
//! - `compute_metrics`, `find_competitors`: The two core calculations.
//! - `geodesic::distance_meters`: WGS-84 distance between two coordinates.
//! - `stats`: Median and quantiles over decimal samples.
//! - `AnalysisResult` and friends: The serializable report structs.

pub mod competitors;
pub mod engine;
pub mod error;
pub mod geodesic;
pub mod report;
pub mod stats;

pub use competitors::{find_competitors, find_competitors_ordered, DEFAULT_RADIUS_METERS};
pub use engine::{
    compute_metrics, compute_metrics_with, location_score, CostInputs, InvestmentAnalyzer,
};
pub use error::AnalyticsError;
pub use report::{AnalysisResult, Competitor, InvestmentMetrics, MarketSummary, Profitability};
