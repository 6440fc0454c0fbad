use core_types::Coordinates;
use geo::{Distance, Geodesic, Point};

/// Geodesic distance in metres between two points on the WGS-84 ellipsoid.
///
/// Karney's algorithm through `geo`, which converges for every pair,
/// antipodal points included. Identical points are exactly 0 apart.
pub fn distance_meters(from: Coordinates, to: Coordinates) -> f64 {
    if from == to {
        return 0.0;
    }
    // geo points are (x, y), i.e. (longitude, latitude).
    Geodesic::distance(
        Point::new(from.longitude, from.latitude),
        Point::new(to.longitude, to.latitude),
    )
}
