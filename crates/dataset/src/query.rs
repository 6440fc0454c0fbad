use crate::error::DatasetError;
use core_types::Listing;

/// Returns the listings of `city` in their original order.
pub fn filter_by_city<'a>(listings: &'a [Listing], city: &str) -> Vec<&'a Listing> {
    listings.iter().filter(|l| l.city == city).collect()
}

/// Looks up a listing by identifier within the given set.
///
/// Accepts either a full slice (`&listings`) or an already filtered subset
/// (`subset.iter().copied()`), so a lookup can be scoped to the current city.
pub fn find_by_id<'a, I>(listings: I, id: &str) -> Result<&'a Listing, DatasetError>
where
    I: IntoIterator<Item = &'a Listing>,
{
    listings
        .into_iter()
        .find(|l| l.id == id)
        .ok_or_else(|| DatasetError::NotFound { id: id.to_string() })
}

/// Distinct city names in order of first appearance.
pub fn cities(listings: &[Listing]) -> Vec<String> {
    let mut cities: Vec<String> = Vec::new();
    for listing in listings {
        if !cities.iter().any(|c| *c == listing.city) {
            cities.push(listing.city.clone());
        }
    }
    cities
}
