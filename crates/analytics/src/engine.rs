use crate::competitors::find_competitors_ordered;
use crate::error::AnalyticsError;
use crate::report::{AnalysisResult, Competitor, InvestmentMetrics, MarketSummary, Profitability};
use crate::stats::{median, quantile};
use configuration::TaxSettings;
use core_types::{AnalysisInput, Listing, LocationRating};
use dataset::{filter_by_city, find_by_id};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Per-request cost inputs for `compute_metrics_with`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostInputs {
    pub renovation_cost_per_area: Decimal,
    /// Flat agent/transaction fee.
    pub commission: Decimal,
    /// Negotiated discount off the entry price.
    pub bargain: Decimal,
}

/// Renovation cost, total expense and profit for a listing bought at its
/// entry price.
pub fn compute_metrics(
    listing: &Listing,
    renovation_cost_per_area: Decimal,
    commission: Decimal,
) -> Result<InvestmentMetrics, AnalyticsError> {
    compute_metrics_with(
        listing,
        &CostInputs {
            renovation_cost_per_area,
            commission,
            bargain: Decimal::ZERO,
        },
    )
}

/// `compute_metrics` with a negotiated bargain taken off the entry price.
pub fn compute_metrics_with(
    listing: &Listing,
    inputs: &CostInputs,
) -> Result<InvestmentMetrics, AnalyticsError> {
    if listing.area < Decimal::ZERO {
        return Err(AnalyticsError::invalid(
            "area",
            format!("listing {} has a negative area ({})", listing.id, listing.area),
        ));
    }
    for (field, value) in [
        ("renovation_cost_per_area", inputs.renovation_cost_per_area),
        ("commission", inputs.commission),
        ("bargain", inputs.bargain),
    ] {
        if value < Decimal::ZERO {
            return Err(AnalyticsError::invalid(field, format!("{value} is negative")));
        }
    }
    if inputs.bargain > listing.entry_price {
        return Err(AnalyticsError::invalid(
            "bargain",
            format!("{} exceeds the entry price {}", inputs.bargain, listing.entry_price),
        ));
    }

    let purchase_price = listing.entry_price - inputs.bargain;
    let renovation_cost = listing
        .area
        .checked_mul(inputs.renovation_cost_per_area)
        .ok_or_else(|| AnalyticsError::overflow("renovation_cost"))?;
    let total_expense = purchase_price
        .checked_add(renovation_cost)
        .and_then(|sum| sum.checked_add(inputs.commission))
        .ok_or_else(|| AnalyticsError::overflow("total_expense"))?;
    let profit = listing
        .expected_sale_price
        .checked_sub(total_expense)
        .ok_or_else(|| AnalyticsError::overflow("profit"))?;

    Ok(InvestmentMetrics {
        purchase_price,
        renovation_cost,
        commission: inputs.commission,
        expected_sale_price: listing.expected_sale_price,
        total_expense,
        profit,
    })
}

/// Mean of the 1..=10 location ratings, or `None` when none were given.
pub fn location_score(ratings: &[LocationRating]) -> Result<Option<Decimal>, AnalyticsError> {
    if let Some(bad) = ratings.iter().find(|r| !(1..=10).contains(&r.score)) {
        return Err(AnalyticsError::invalid(
            "location_rating",
            format!("'{}' scored {}, expected 1 to 10", bad.name, bad.score),
        ));
    }
    if ratings.is_empty() {
        return Ok(None);
    }
    let total: Decimal = ratings.iter().map(|r| Decimal::from(r.score)).sum();
    Ok(Some(total / Decimal::from(ratings.len())))
}

/// Runs the complete analysis for one request.
///
/// The analyzer holds only the tax configuration. Each call receives the
/// dataset snapshot and the current selection, so nothing carries over from
/// one selection to the next.
#[derive(Debug, Clone)]
pub struct InvestmentAnalyzer {
    taxes: TaxSettings,
}

impl InvestmentAnalyzer {
    /// Creates a new `InvestmentAnalyzer` with the given tax rates.
    pub fn new(taxes: TaxSettings) -> Result<Self, AnalyticsError> {
        for (field, rate) in [
            ("personal_income_rate", taxes.personal_income_rate),
            ("simplified_rate", taxes.simplified_rate),
        ] {
            if rate < Decimal::ZERO || rate > Decimal::ONE {
                return Err(AnalyticsError::invalid(field, "must be between 0 and 1"));
            }
        }
        Ok(Self { taxes })
    }

    /// The main entry point: filter by city, resolve the selected listing once,
    /// then derive every figure from it.
    #[tracing::instrument(
        name = "analyze",
        skip(self, listings, input),
        fields(city = %input.city, listing = %input.listing_id)
    )]
    pub fn analyze(
        &self,
        listings: &[Listing],
        input: &AnalysisInput,
    ) -> Result<AnalysisResult, AnalyticsError> {
        let in_city = filter_by_city(listings, &input.city);
        let listing = find_by_id(in_city.iter().copied(), &input.listing_id)?;

        let metrics = compute_metrics_with(
            listing,
            &CostInputs {
                renovation_cost_per_area: input.renovation_cost_per_area,
                commission: input.commission,
                bargain: input.bargain,
            },
        )?;
        let profitability = self.profitability(&metrics, input.project_months)?;
        let location_score = location_score(&input.location_ratings)?;

        let competitors = find_competitors_ordered(
            in_city.iter().copied(),
            listing,
            input.radius_meters,
            input.order,
        )?;
        let market = market_summary(listing, &competitors)?;

        tracing::debug!(
            profit = %metrics.profit,
            competitors = competitors.len(),
            "Analysis complete."
        );

        Ok(AnalysisResult {
            listing: listing.clone(),
            metrics,
            profitability,
            competitors,
            market,
            location_score,
        })
    }

    /// Taxes, net profit and return ratios.
    ///
    /// Both taxes are charged on positive profit only and both are deducted
    /// from it. ROI is measured against the money spent beyond the purchase
    /// (renovation plus commission) and is annualised over `project_months`.
    pub fn profitability(
        &self,
        metrics: &InvestmentMetrics,
        project_months: u32,
    ) -> Result<Profitability, AnalyticsError> {
        if project_months == 0 {
            return Err(AnalyticsError::invalid("project_months", "must be at least 1"));
        }

        // Rates are within [0, 1], so the taxes never exceed the profit.
        let taxable = metrics.profit.max(Decimal::ZERO);
        let personal_income_tax = taxable * self.taxes.personal_income_rate;
        let simplified_tax = taxable * self.taxes.simplified_rate;
        let net_profit = metrics
            .profit
            .checked_sub(personal_income_tax)
            .and_then(|p| p.checked_sub(simplified_tax))
            .ok_or_else(|| AnalyticsError::overflow("net_profit"))?;

        let invested = metrics
            .renovation_cost
            .checked_add(metrics.commission)
            .ok_or_else(|| AnalyticsError::overflow("invested"))?;
        let roi_pct = if invested.is_zero() {
            None
        } else {
            let roi = net_profit
                .checked_div(invested)
                .and_then(|ratio| ratio.checked_mul(dec!(100)))
                .ok_or_else(|| AnalyticsError::overflow("roi"))?;
            Some(roi)
        };
        let annualised_return_pct = roi_pct
            .map(|roi| {
                roi.checked_mul(Decimal::from(12))
                    .and_then(|r| r.checked_div(Decimal::from(project_months)))
                    .ok_or_else(|| AnalyticsError::overflow("annualised_return"))
            })
            .transpose()?;
        let gap = if metrics.purchase_price.is_zero() {
            None
        } else {
            let gap = metrics
                .expected_sale_price
                .checked_div(metrics.purchase_price)
                .ok_or_else(|| AnalyticsError::overflow("gap"))?;
            Some(gap)
        };

        Ok(Profitability {
            personal_income_tax,
            simplified_tax,
            net_profit,
            roi_pct,
            annualised_return_pct,
            gap,
        })
    }
}

/// Price-per-area statistics of the competitors other than the reference.
fn market_summary(
    reference: &Listing,
    competitors: &[Competitor],
) -> Result<Option<MarketSummary>, AnalyticsError> {
    let prices: Vec<Decimal> = competitors
        .iter()
        .filter(|c| c.listing.id != reference.id)
        .map(|c| c.listing.price_per_area)
        .collect();

    let Some(median_price_per_area) = median(&prices) else {
        return Ok(None);
    };
    let lower_quartile = quantile(&prices, dec!(0.25))?.unwrap_or(median_price_per_area);
    let upper_quartile = quantile(&prices, dec!(0.75))?.unwrap_or(median_price_per_area);
    // An unrepresentable premium is left out rather than failing the analysis.
    let reference_premium_pct = reference
        .price_per_area
        .checked_sub(median_price_per_area)
        .and_then(|spread| spread.checked_div(median_price_per_area))
        .and_then(|ratio| ratio.checked_mul(dec!(100)));

    Ok(Some(MarketSummary {
        sample_size: prices.len(),
        median_price_per_area,
        lower_quartile,
        upper_quartile,
        reference_premium_pct,
    }))
}
