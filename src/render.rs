//! Terminal tables for listings and analysis results.

use analytics::{AnalysisResult, Competitor, MarketSummary};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};
use core_types::Listing;
use rust_decimal::Decimal;

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn money(value: Decimal) -> String {
    format!("{:.2}", value)
}

fn number(value: Decimal) -> Cell {
    Cell::new(money(value)).set_alignment(CellAlignment::Right)
}

fn optional<T: ToString>(value: &Option<T>) -> String {
    value.as_ref().map_or_else(|| "-".to_string(), ToString::to_string)
}

fn optional_pct(value: Option<Decimal>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.2}%", v))
}

pub fn cities_table(cities: &[String], listings: &[Listing]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["City", "Listings"]);
    for city in cities {
        let count = listings.iter().filter(|l| &l.city == city).count();
        table.add_row(vec![
            Cell::new(city),
            Cell::new(count).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

pub fn listings_table(listings: &[&Listing]) -> Table {
    let mut table = new_table();
    table.set_header(vec![
        "ID",
        "Rooms",
        "Area, m²",
        "Price",
        "Price / m²",
        "Predicted sale",
        "Metro",
    ]);
    for listing in listings {
        table.add_row(vec![
            Cell::new(&listing.id),
            Cell::new(optional(&listing.details.rooms)),
            number(listing.area),
            number(listing.entry_price),
            number(listing.price_per_area),
            number(listing.expected_sale_price),
            Cell::new(optional(&listing.details.metro)),
        ]);
    }
    table
}

/// Two-column attribute view of a single listing.
pub fn listing_table(listing: &Listing) -> Table {
    let d = &listing.details;
    let metro = match (&d.metro, d.metro_minutes) {
        (Some(name), Some(minutes)) => format!("{name}, {minutes} min"),
        (Some(name), None) => name.clone(),
        (None, Some(minutes)) => format!("{minutes} min"),
        (None, None) => "-".to_string(),
    };

    let rows: Vec<(&str, String)> = vec![
        ("ID", listing.id.clone()),
        ("City", listing.city.clone()),
        (
            "Coordinates",
            format!(
                "{:.6}, {:.6}",
                listing.coordinates.latitude, listing.coordinates.longitude
            ),
        ),
        ("Area, m²", money(listing.area)),
        ("Kitchen, m²", optional(&d.kitchen_area)),
        ("Rooms", optional(&d.rooms)),
        ("Floor", format!("{} / {}", optional(&d.floor), optional(&d.floors_total))),
        ("Year built", optional(&d.year_built)),
        ("Walls", optional(&d.wall_material)),
        (
            "Elevators",
            format!(
                "{} passenger, {} cargo",
                optional(&d.passenger_elevators),
                optional(&d.cargo_elevators)
            ),
        ),
        ("Bathroom", optional(&d.bathroom)),
        ("Metro", metro),
        ("Price", money(listing.entry_price)),
        ("Price / m²", money(listing.price_per_area)),
        ("Predicted sale", money(listing.expected_sale_price)),
    ];

    let mut table = new_table();
    table.set_header(vec!["Attribute", "Value"]);
    for (name, value) in rows {
        table.add_row(vec![name.to_string(), value]);
    }
    table
}

pub fn metrics_table(result: &AnalysisResult) -> Table {
    let m = &result.metrics;
    let p = &result.profitability;

    let mut table = new_table();
    table.set_header(vec!["Metric", "Value"]);
    let rows = vec![
        ("Purchase price", money(m.purchase_price)),
        ("Renovation cost", money(m.renovation_cost)),
        ("Commission", money(m.commission)),
        ("Total expense", money(m.total_expense)),
        ("Expected sale price", money(m.expected_sale_price)),
        ("Profit before taxes", money(m.profit)),
        ("Personal income tax", money(p.personal_income_tax)),
        ("Simplified tax", money(p.simplified_tax)),
        ("Net profit", money(p.net_profit)),
        ("ROI", optional_pct(p.roi_pct)),
        ("Annualised return", optional_pct(p.annualised_return_pct)),
        (
            "GAP (sale / purchase)",
            p.gap.map_or_else(|| "-".to_string(), |g| format!("{:.3}", g)),
        ),
        (
            "Location score",
            result
                .location_score
                .map_or_else(|| "-".to_string(), |s| format!("{:.1}", s)),
        ),
    ];
    for (name, value) in rows {
        table.add_row(vec![Cell::new(name), Cell::new(value).set_alignment(CellAlignment::Right)]);
    }
    table
}

pub fn competitors_table(competitors: &[Competitor]) -> Table {
    let mut table = new_table();
    table.set_header(vec![
        "ID",
        "Distance, m",
        "Area, m²",
        "Price",
        "Price / m²",
        "Δ Price / m²",
        "Latitude",
        "Longitude",
    ]);
    for c in competitors {
        table.add_row(vec![
            Cell::new(&c.listing.id),
            Cell::new(format!("{:.0}", c.distance_meters)).set_alignment(CellAlignment::Right),
            number(c.listing.area),
            number(c.listing.entry_price),
            number(c.listing.price_per_area),
            number(c.price_difference),
            Cell::new(format!("{:.6}", c.listing.coordinates.latitude)),
            Cell::new(format!("{:.6}", c.listing.coordinates.longitude)),
        ]);
    }
    table
}

pub fn market_table(market: &MarketSummary) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Market (price / m²)", "Value"]);
    table.add_row(vec![Cell::new("Competitors"), Cell::new(market.sample_size)]);
    table.add_row(vec![Cell::new("25th percentile"), number(market.lower_quartile)]);
    table.add_row(vec![Cell::new("Median"), number(market.median_price_per_area)]);
    table.add_row(vec![Cell::new("75th percentile"), number(market.upper_quartile)]);
    table.add_row(vec![
        Cell::new("Selected vs median"),
        Cell::new(optional_pct(market.reference_premium_pct)).set_alignment(CellAlignment::Right),
    ]);
    table
}
