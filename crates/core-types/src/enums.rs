use serde::{Deserialize, Serialize};

/// How the `predicted_price` column of a dataset should be read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionBasis {
    /// The column already holds the full expected sale price of the unit.
    #[default]
    Total,
    /// The column holds a price per square metre and is multiplied by the area.
    PerArea,
}

/// Ordering applied to a competitor list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompetitorOrder {
    /// Keep the dataset order.
    #[default]
    Input,
    /// Nearest first. Ties keep the dataset order.
    Distance,
}
