use core_types::Listing;
use rust_decimal::Decimal;
use serde::Serialize;

/// The cost and profit arithmetic for one listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvestmentMetrics {
    /// Entry price after the negotiated bargain.
    pub purchase_price: Decimal,
    pub renovation_cost: Decimal,
    pub commission: Decimal,
    pub expected_sale_price: Decimal,
    /// Purchase price plus renovation plus commission.
    pub total_expense: Decimal,
    /// Expected sale price minus total expense. Negative for a losing flip.
    pub profit: Decimal,
}

/// Taxes and return ratios derived from `InvestmentMetrics`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Profitability {
    pub personal_income_tax: Decimal,
    pub simplified_tax: Decimal,
    /// Profit after both taxes are deducted.
    pub net_profit: Decimal,
    pub roi_pct: Option<Decimal>, // None when nothing beyond the purchase is spent
    pub annualised_return_pct: Option<Decimal>,
    /// Expected sale price over entry price.
    pub gap: Option<Decimal>, // None for a zero entry price
}

/// A nearby listing in the same city.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Competitor {
    pub listing: Listing,
    pub distance_meters: f64,
    /// Competitor price per area minus the reference's.
    pub price_difference: Decimal,
}

/// Descriptive statistics of competitor price per area, the reference excluded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketSummary {
    pub sample_size: usize,
    pub median_price_per_area: Decimal,
    pub lower_quartile: Decimal,
    pub upper_quartile: Decimal,
    /// How far the reference sits above (+) or below (-) the median, in percent.
    pub reference_premium_pct: Option<Decimal>,
}

/// Everything computed for one `AnalysisInput`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub listing: Listing,
    pub metrics: InvestmentMetrics,
    pub profitability: Profitability,
    pub competitors: Vec<Competitor>,
    pub market: Option<MarketSummary>,
    pub location_score: Option<Decimal>,
}
