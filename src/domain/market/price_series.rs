use chrono::NaiveDate;
use serde::{Serialize, Serializer};

/// One daily close for a symbol, as returned by a price store.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub close: f64,
}

impl PriceBar {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }
}

/// Trend / noise / volatility for a single trading day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecompositionPoint {
    #[serde(serialize_with = "serialize_iso_date")]
    pub date: NaiveDate,
    pub close: f64,
    pub trend: f64,
    pub noise: f64,
    pub volatility: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecompositionSeries {
    pub symbol: String,
    pub data: Vec<DecompositionPoint>,
}

fn serialize_iso_date<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&date.format("%Y-%m-%d").to_string())
}
