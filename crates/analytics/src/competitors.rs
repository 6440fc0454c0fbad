use crate::error::AnalyticsError;
use crate::geodesic::distance_meters;
use crate::report::Competitor;
use core_types::{CompetitorOrder, Listing};

/// Competitor search radius used when the caller has no preference.
pub const DEFAULT_RADIUS_METERS: f64 = 1500.0;

/// Listings in the reference's city within `radius_meters` of it, in input order.
///
/// Candidates from other cities are skipped whatever their distance. The
/// reference itself is part of the result (at distance 0) when it is among
/// the candidates.
pub fn find_competitors<'a, I>(
    listings: I,
    reference: &Listing,
    radius_meters: f64,
) -> Result<Vec<Competitor>, AnalyticsError>
where
    I: IntoIterator<Item = &'a Listing>,
{
    find_competitors_ordered(listings, reference, radius_meters, CompetitorOrder::Input)
}

/// Like `find_competitors`, with an explicit ordering of the result.
pub fn find_competitors_ordered<'a, I>(
    listings: I,
    reference: &Listing,
    radius_meters: f64,
    order: CompetitorOrder,
) -> Result<Vec<Competitor>, AnalyticsError>
where
    I: IntoIterator<Item = &'a Listing>,
{
    if !radius_meters.is_finite() || radius_meters < 0.0 {
        return Err(AnalyticsError::invalid(
            "radius_meters",
            format!("{radius_meters} is not a non-negative distance"),
        ));
    }

    let mut competitors = Vec::new();
    for candidate in listings {
        if candidate.city != reference.city {
            continue;
        }
        let distance = distance_meters(reference.coordinates, candidate.coordinates);
        if distance > radius_meters {
            continue;
        }
        let price_difference = candidate
            .price_per_area
            .checked_sub(reference.price_per_area)
            .ok_or_else(|| AnalyticsError::overflow("price_difference"))?;
        competitors.push(Competitor {
            listing: candidate.clone(),
            distance_meters: distance,
            price_difference,
        });
    }

    if order == CompetitorOrder::Distance {
        // `sort_by` is stable, so equal distances keep their input order.
        competitors.sort_by(|a, b| a.distance_meters.total_cmp(&b.distance_meters));
    }

    tracing::debug!(
        reference = %reference.id,
        radius_meters,
        found = competitors.len(),
        "Competitor search complete."
    );
    Ok(competitors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::{Coordinates, ListingDetails};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn listing(id: &str, city: &str, lat: f64, lon: f64, price_per_area: Decimal) -> Listing {
        Listing {
            id: id.to_string(),
            city: city.to_string(),
            coordinates: Coordinates::new(lat, lon).unwrap(),
            area: dec!(50),
            price_per_area,
            entry_price: dec!(5000000),
            expected_sale_price: dec!(5500000),
            details: ListingDetails::default(),
        }
    }

    fn neighbourhood() -> Vec<Listing> {
        vec![
            listing("far", "X", 55.80, 37.61, dec!(900)),
            listing("ref", "X", 55.75, 37.61, dec!(1000)),
            listing("near-800", "X", 55.757, 37.61, dec!(1200)),
            listing("near-100", "X", 55.7509, 37.61, dec!(950)),
            listing("other-city", "Y", 55.7501, 37.61, dec!(500)),
        ]
    }

    fn ids(competitors: &[Competitor]) -> Vec<&str> {
        competitors.iter().map(|c| c.listing.id.as_str()).collect()
    }

    #[test]
    fn keeps_input_order_and_excludes_other_cities() {
        let listings = neighbourhood();
        let reference = &listings[1];
        let found = find_competitors(&listings, reference, DEFAULT_RADIUS_METERS).unwrap();
        assert_eq!(ids(&found), ["ref", "near-800", "near-100"]);
        assert!(found.iter().all(|c| c.listing.city == reference.city));
    }

    #[test]
    fn distance_order_is_opt_in() {
        let listings = neighbourhood();
        let found = find_competitors_ordered(
            &listings,
            &listings[1],
            DEFAULT_RADIUS_METERS,
            CompetitorOrder::Distance,
        )
        .unwrap();
        assert_eq!(ids(&found), ["ref", "near-100", "near-800"]);
        assert!(found.windows(2).all(|w| w[0].distance_meters <= w[1].distance_meters));
    }

    #[test]
    fn annotates_price_difference_against_reference() {
        let listings = neighbourhood();
        let found = find_competitors(&listings, &listings[1], DEFAULT_RADIUS_METERS).unwrap();
        let diffs: Vec<Decimal> = found.iter().map(|c| c.price_difference).collect();
        assert_eq!(diffs, [dec!(0), dec!(200), dec!(-50)]);
    }

    #[test]
    fn zero_radius_returns_only_the_reference() {
        let listings = neighbourhood();
        let found = find_competitors(&listings, &listings[1], 0.0).unwrap();
        assert_eq!(ids(&found), ["ref"]);
        assert_eq!(found[0].distance_meters, 0.0);

        // Without the reference among the candidates nothing is left.
        let without_ref: Vec<&Listing> = listings.iter().filter(|l| l.id != "ref").collect();
        let found = find_competitors(without_ref.iter().copied(), &listings[1], 0.0).unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn negative_or_nan_radius_is_invalid() {
        let listings = neighbourhood();
        for radius in [-1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                find_competitors(&listings, &listings[1], radius),
                Err(AnalyticsError::InvalidInput(..))
            ));
        }
    }
}
