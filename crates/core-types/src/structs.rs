use crate::enums::CompetitorOrder;
use crate::error::CoreError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A validated latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Builds a coordinate pair, rejecting values outside the valid degree ranges.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoreError> {
        if !latitude.is_finite() || latitude.abs() > 90.0 {
            return Err(CoreError::InvalidInput(
                "latitude".to_string(),
                format!("{latitude} is outside [-90, 90]"),
            ));
        }
        if !longitude.is_finite() || longitude.abs() > 180.0 {
            return Err(CoreError::InvalidInput(
                "longitude".to_string(),
                format!("{longitude} is outside [-180, 180]"),
            ));
        }
        Ok(Self { latitude, longitude })
    }
}

/// Descriptive attributes carried through untouched for display.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListingDetails {
    pub rooms: Option<i64>,
    pub floor: Option<i64>,
    pub floors_total: Option<i64>,
    pub year_built: Option<i64>,
    pub wall_material: Option<String>,
    pub kitchen_area: Option<f64>,
    pub passenger_elevators: Option<i64>,
    pub cargo_elevators: Option<i64>,
    pub bathroom: Option<String>,
    pub metro: Option<String>,
    pub metro_minutes: Option<i64>,
}

/// One apartment from the dataset.
///
/// Listings are loaded once and never mutated afterwards. `expected_sale_price`
/// is always a total price for the whole unit, whatever basis the source used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: String,
    pub city: String,
    pub coordinates: Coordinates,
    /// Total area in square metres.
    pub area: Decimal,
    pub price_per_area: Decimal,
    /// Listed purchase price.
    pub entry_price: Decimal,
    pub expected_sale_price: Decimal,
    #[serde(default)]
    pub details: ListingDetails,
}

/// A single user request against the dataset.
///
/// The caller owns the selection and passes it in whole; nothing downstream
/// reads ambient state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisInput {
    pub city: String,
    pub listing_id: String,
    pub renovation_cost_per_area: Decimal,
    pub commission: Decimal,
    /// Negotiated discount off the entry price.
    pub bargain: Decimal,
    pub project_months: u32,
    pub radius_meters: f64,
    pub order: CompetitorOrder,
    /// Subjective 1..=10 scores of the neighbourhood, e.g. transit or infrastructure.
    #[serde(default)]
    pub location_ratings: Vec<LocationRating>,
}

/// A named 1..=10 score for one aspect of a location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationRating {
    pub name: String,
    pub score: u8,
}

impl AnalysisInput {
    /// Creates a request with no bargain, a 12 month horizon and a 1500 m radius.
    pub fn new(
        city: impl Into<String>,
        listing_id: impl Into<String>,
        renovation_cost_per_area: Decimal,
        commission: Decimal,
    ) -> Self {
        Self {
            city: city.into(),
            listing_id: listing_id.into(),
            renovation_cost_per_area,
            commission,
            bargain: Decimal::ZERO,
            project_months: 12,
            radius_meters: 1500.0,
            order: CompetitorOrder::Input,
            location_ratings: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn coordinates_reject_out_of_range_values() {
        assert!(Coordinates::new(55.75, 37.61).is_ok());
        assert!(Coordinates::new(90.0, -180.0).is_ok());
        assert!(matches!(
            Coordinates::new(91.0, 0.0),
            Err(CoreError::InvalidInput(field, _)) if field == "latitude"
        ));
        assert!(matches!(
            Coordinates::new(0.0, 180.5),
            Err(CoreError::InvalidInput(field, _)) if field == "longitude"
        ));
        assert!(Coordinates::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn analysis_input_defaults() {
        let input = AnalysisInput::new("Moscow", "42", dec!(1000), dec!(50000));
        assert_eq!(input.bargain, Decimal::ZERO);
        assert_eq!(input.project_months, 12);
        assert_eq!(input.radius_meters, 1500.0);
        assert_eq!(input.order, CompetitorOrder::Input);
        assert!(input.location_ratings.is_empty());
    }
}
