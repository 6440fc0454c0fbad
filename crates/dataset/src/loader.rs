use crate::error::DatasetError;
use core_types::{Coordinates, Listing, ListingDetails, PredictionBasis};
use polars::prelude::*;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use std::collections::HashSet;
use std::path::Path;

// Required columns. Financial and distance computations cannot run without them.
pub const COL_ID: &str = "id";
pub const COL_CITY: &str = "city";
pub const COL_LATITUDE: &str = "lat";
pub const COL_LONGITUDE: &str = "lon";
pub const COL_AREA: &str = "area";
pub const COL_PRICE_PER_AREA: &str = "price_per_area";
pub const COL_ENTRY_PRICE: &str = "price";
pub const COL_PREDICTED_PRICE: &str = "predicted_price";

// Optional descriptive columns, passed through for display only.
pub const COL_ROOMS: &str = "rooms";
pub const COL_FLOOR: &str = "floor";
pub const COL_FLOORS_TOTAL: &str = "floors_total";
pub const COL_YEAR_BUILT: &str = "year_built";
pub const COL_WALL_MATERIAL: &str = "wall_material";
pub const COL_KITCHEN_AREA: &str = "kitchen_area";
pub const COL_PASSENGER_ELEVATORS: &str = "passenger_elevators";
pub const COL_CARGO_ELEVATORS: &str = "cargo_elevators";
pub const COL_BATHROOM: &str = "bathroom";
pub const COL_METRO: &str = "metro";
pub const COL_METRO_MINUTES: &str = "metro_minutes";

/// Reads the listings CSV at `source`.
///
/// Every required column must be present and every required cell must parse.
/// Descriptive columns may be absent or contain nulls. Identifiers must be
/// unique. With `PredictionBasis::PerArea` the predicted price is multiplied
/// by the area so that `Listing::expected_sale_price` is always a total.
pub fn load(source: &Path, basis: PredictionBasis) -> Result<Vec<Listing>, DatasetError> {
    if !source.is_file() {
        return Err(DatasetError::unavailable(source, "file does not exist"));
    }

    // No type inference: every column arrives as text and is converted per
    // column below. Identifiers keep leading zeros and a stray word in a
    // descriptive column only blanks that cell.
    let frame = CsvReader::from_path(source)
        .and_then(|reader| reader.has_header(true).infer_schema(Some(0)).finish())
        .map_err(|e| DatasetError::unavailable(source, e.to_string()))?;

    let listings = listings_from_frame(&frame, basis)
        .map_err(|reason| DatasetError::unavailable(source, reason))?;

    tracing::info!(
        path = %source.display(),
        rows = listings.len(),
        ?basis,
        "Loaded listings dataset."
    );
    Ok(listings)
}

/// The typed columns of one frame, extracted once before walking the rows.
struct Columns {
    id: StringChunked,
    city: StringChunked,
    latitude: Float64Chunked,
    longitude: Float64Chunked,
    area: Float64Chunked,
    price_per_area: Float64Chunked,
    entry_price: Float64Chunked,
    predicted_price: Float64Chunked,
    rooms: Option<Int64Chunked>,
    floor: Option<Int64Chunked>,
    floors_total: Option<Int64Chunked>,
    year_built: Option<Int64Chunked>,
    wall_material: Option<StringChunked>,
    kitchen_area: Option<Float64Chunked>,
    passenger_elevators: Option<Int64Chunked>,
    cargo_elevators: Option<Int64Chunked>,
    bathroom: Option<StringChunked>,
    metro: Option<StringChunked>,
    metro_minutes: Option<Int64Chunked>,
}

impl Columns {
    fn extract(frame: &DataFrame) -> Result<Self, String> {
        Ok(Self {
            id: required_text(frame, COL_ID)?,
            city: required_text(frame, COL_CITY)?,
            latitude: required_float(frame, COL_LATITUDE)?,
            longitude: required_float(frame, COL_LONGITUDE)?,
            area: required_float(frame, COL_AREA)?,
            price_per_area: required_float(frame, COL_PRICE_PER_AREA)?,
            entry_price: required_float(frame, COL_ENTRY_PRICE)?,
            predicted_price: required_float(frame, COL_PREDICTED_PRICE)?,
            rooms: optional_int(frame, COL_ROOMS)?,
            floor: optional_int(frame, COL_FLOOR)?,
            floors_total: optional_int(frame, COL_FLOORS_TOTAL)?,
            year_built: optional_int(frame, COL_YEAR_BUILT)?,
            wall_material: optional_text(frame, COL_WALL_MATERIAL)?,
            kitchen_area: optional_float(frame, COL_KITCHEN_AREA)?,
            passenger_elevators: optional_int(frame, COL_PASSENGER_ELEVATORS)?,
            cargo_elevators: optional_int(frame, COL_CARGO_ELEVATORS)?,
            bathroom: optional_text(frame, COL_BATHROOM)?,
            metro: optional_text(frame, COL_METRO)?,
            metro_minutes: optional_int(frame, COL_METRO_MINUTES)?,
        })
    }
}

fn listings_from_frame(frame: &DataFrame, basis: PredictionBasis) -> Result<Vec<Listing>, String> {
    let columns = Columns::extract(frame)?;
    let mut seen_ids = HashSet::with_capacity(frame.height());
    let mut listings = Vec::with_capacity(frame.height());

    for row in 0..frame.height() {
        // Row numbers in messages are 1-based and skip the header, like a spreadsheet.
        let line = row + 2;

        let id = text_cell(&columns.id, row, COL_ID, line)?;
        if !seen_ids.insert(id.clone()) {
            return Err(format!("line {line}: duplicate {COL_ID} '{id}'"));
        }
        let city = text_cell(&columns.city, row, COL_CITY, line)?;

        let coordinates = Coordinates::new(
            float_cell(&columns.latitude, row, COL_LATITUDE, line)?,
            float_cell(&columns.longitude, row, COL_LONGITUDE, line)?,
        )
        .map_err(|e| format!("line {line}: {e}"))?;

        let area = decimal_cell(&columns.area, row, COL_AREA, line)?;
        if area <= Decimal::ZERO {
            return Err(format!("line {line}: {COL_AREA} must be positive, got {area}"));
        }
        let price_per_area = decimal_cell(&columns.price_per_area, row, COL_PRICE_PER_AREA, line)?;
        let entry_price = decimal_cell(&columns.entry_price, row, COL_ENTRY_PRICE, line)?;
        let predicted = decimal_cell(&columns.predicted_price, row, COL_PREDICTED_PRICE, line)?;
        let expected_sale_price = match basis {
            PredictionBasis::Total => predicted,
            PredictionBasis::PerArea => predicted.checked_mul(area).ok_or_else(|| {
                format!("line {line}: {COL_PREDICTED_PRICE} {predicted} times {COL_AREA} {area} overflows")
            })?,
        };

        let details = ListingDetails {
            rooms: optional_int_cell(&columns.rooms, row),
            floor: optional_int_cell(&columns.floor, row),
            floors_total: optional_int_cell(&columns.floors_total, row),
            year_built: optional_int_cell(&columns.year_built, row),
            wall_material: optional_text_cell(&columns.wall_material, row),
            kitchen_area: columns.kitchen_area.as_ref().and_then(|c| c.get(row)),
            passenger_elevators: optional_int_cell(&columns.passenger_elevators, row),
            cargo_elevators: optional_int_cell(&columns.cargo_elevators, row),
            bathroom: optional_text_cell(&columns.bathroom, row),
            metro: optional_text_cell(&columns.metro, row),
            metro_minutes: optional_int_cell(&columns.metro_minutes, row),
        };

        listings.push(Listing {
            id,
            city,
            coordinates,
            area,
            price_per_area,
            entry_price,
            expected_sale_price,
            details,
        });
    }

    Ok(listings)
}

// --- Column extraction ---

fn required_column<'a>(frame: &'a DataFrame, name: &str) -> Result<&'a Series, String> {
    frame
        .column(name)
        .map_err(|_| format!("required column '{name}' is missing"))
}

fn cast(series: &Series, dtype: &DataType) -> Result<Series, String> {
    series
        .cast(dtype)
        .map_err(|e| format!("column '{}' cannot be read as {dtype}: {e}", series.name()))
}

fn required_float(frame: &DataFrame, name: &str) -> Result<Float64Chunked, String> {
    as_float(&cast(required_column(frame, name)?, &DataType::Float64)?)
}

fn required_text(frame: &DataFrame, name: &str) -> Result<StringChunked, String> {
    as_text(&cast(required_column(frame, name)?, &DataType::String)?)
}

fn optional_float(frame: &DataFrame, name: &str) -> Result<Option<Float64Chunked>, String> {
    frame
        .column(name)
        .ok()
        .map(|series| as_float(&cast(series, &DataType::Float64)?))
        .transpose()
}

fn optional_int(frame: &DataFrame, name: &str) -> Result<Option<Int64Chunked>, String> {
    frame
        .column(name)
        .ok()
        .map(|series| {
            // Through Float64 so that "2.0" still reads as 2.
            cast(&cast(series, &DataType::Float64)?, &DataType::Int64)?
                .i64()
                .cloned()
                .map_err(|e| e.to_string())
        })
        .transpose()
}

fn optional_text(frame: &DataFrame, name: &str) -> Result<Option<StringChunked>, String> {
    frame
        .column(name)
        .ok()
        .map(|series| as_text(&cast(series, &DataType::String)?))
        .transpose()
}

fn as_float(series: &Series) -> Result<Float64Chunked, String> {
    series.f64().cloned().map_err(|e| e.to_string())
}

fn as_text(series: &Series) -> Result<StringChunked, String> {
    series.str().cloned().map_err(|e| e.to_string())
}

// --- Cell access ---

fn float_cell(column: &Float64Chunked, row: usize, name: &str, line: usize) -> Result<f64, String> {
    match column.get(row) {
        Some(value) if value.is_finite() => Ok(value),
        Some(value) => Err(format!("line {line}: {name} is not a finite number ({value})")),
        None => Err(format!("line {line}: {name} is empty or not numeric")),
    }
}

fn decimal_cell(
    column: &Float64Chunked,
    row: usize,
    name: &str,
    line: usize,
) -> Result<Decimal, String> {
    let value = float_cell(column, row, name, line)?;
    Decimal::from_f64(value)
        .ok_or_else(|| format!("line {line}: {name} value {value} is out of range"))
}

fn text_cell(column: &StringChunked, row: usize, name: &str, line: usize) -> Result<String, String> {
    match column.get(row).map(str::trim) {
        Some(value) if !value.is_empty() => Ok(value.to_string()),
        _ => Err(format!("line {line}: {name} is empty")),
    }
}

fn optional_int_cell(column: &Option<Int64Chunked>, row: usize) -> Option<i64> {
    column.as_ref().and_then(|c| c.get(row))
}

fn optional_text_cell(column: &Option<StringChunked>, row: usize) -> Option<String> {
    column
        .as_ref()
        .and_then(|c| c.get(row))
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
