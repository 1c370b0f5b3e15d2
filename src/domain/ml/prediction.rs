use super::feature_registry::{FEATURE_SCHEMA, schema_field};
use crate::domain::errors::{FieldViolation, ValidationError};
use serde::{Deserialize, Deserializer, Serialize, de};

/// One prediction request as received on the wire.
///
/// Fields not listed here are ignored during deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionInput {
    #[serde(rename = "Return_1d")]
    pub return_1d: f64,
    #[serde(rename = "Return_5d")]
    pub return_5d: f64,
    #[serde(rename = "Return_10d")]
    pub return_10d: f64,
    #[serde(rename = "SMA_Cross_5_20", deserialize_with = "integral")]
    pub sma_cross_5_20: i64,
    #[serde(rename = "SMA_Cross_10_50", deserialize_with = "integral")]
    pub sma_cross_10_50: i64,
    #[serde(rename = "RSI_14")]
    pub rsi_14: f64,
    #[serde(rename = "BB_Position")]
    pub bb_position: f64,
    #[serde(rename = "MACD_Diff")]
    pub macd_diff: f64,
    #[serde(rename = "Volume_Ratio")]
    pub volume_ratio: f64,
    #[serde(rename = "Volatility_5d")]
    pub volatility_5d: f64,
    #[serde(rename = "Volatility_20d")]
    pub volatility_20d: f64,
    #[serde(rename = "Daily_Range")]
    pub daily_range: f64,
    #[serde(rename = "Daily_Range_MA")]
    pub daily_range_ma: f64,
    #[serde(rename = "Trend", deserialize_with = "integral")]
    pub trend: i64,
    #[serde(rename = "Noise")]
    pub noise: f64,
    #[serde(rename = "Volatility")]
    pub volatility: f64,
}

impl PredictionInput {
    /// Field values keyed by their schema name, in schema order.
    pub fn named_values(&self) -> [(&'static str, f64); 16] {
        [
            ("Return_1d", self.return_1d),
            ("Return_5d", self.return_5d),
            ("Return_10d", self.return_10d),
            ("SMA_Cross_5_20", self.sma_cross_5_20 as f64),
            ("SMA_Cross_10_50", self.sma_cross_10_50 as f64),
            ("RSI_14", self.rsi_14),
            ("BB_Position", self.bb_position),
            ("MACD_Diff", self.macd_diff),
            ("Volume_Ratio", self.volume_ratio),
            ("Volatility_5d", self.volatility_5d),
            ("Volatility_20d", self.volatility_20d),
            ("Daily_Range", self.daily_range),
            ("Daily_Range_MA", self.daily_range_ma),
            ("Trend", self.trend as f64),
            ("Noise", self.noise),
            ("Volatility", self.volatility),
        ]
    }

    /// Checks every field against its schema bound. All violations are reported, not just the first.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let violations: Vec<FieldViolation> = self
            .named_values()
            .iter()
            .filter_map(|(name, value)| {
                let def = schema_field(name)?;
                def.bound
                    .check(*value)
                    .map(|message| FieldViolation::new(*name, message))
            })
            .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(violations))
        }
    }
}

/// Integer fields also accept integral floats such as `1.0`; `1.5` is rejected.
fn integral<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    if value.fract() != 0.0 || value < i64::MIN as f64 || value >= i64::MAX as f64 {
        return Err(de::Error::custom(format!(
            "expected an integer, got {}",
            value
        )));
    }
    Ok(value as i64)
}

// `named_values` returns a fixed-size array; keep it in step with the schema.
const _: () = assert!(FEATURE_SCHEMA.len() == 16);

/// Predicted market direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "Desce")]
    Down,
    #[serde(rename = "Sobe")]
    Up,
}

impl Direction {
    pub fn from_class(class: u8) -> Self {
        if class == 1 { Direction::Up } else { Direction::Down }
    }

    pub fn class(self) -> u8 {
        match self {
            Direction::Down => 0,
            Direction::Up => 1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Direction::Down => "Desce",
            Direction::Up => "Sobe",
        }
    }
}

/// Rounded, labelled classifier output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub prediction: u8,
    pub prediction_label: Direction,
    pub probability_up: f64,
    pub probability_down: f64,
    pub confidence: f64,
}

impl PredictionResult {
    pub fn new(class: u8, probability_up: f64) -> Self {
        let direction = Direction::from_class(class);
        let probability_down = 1.0 - probability_up;
        Self {
            prediction: direction.class(),
            prediction_label: direction,
            probability_up: round_to(probability_up, 4),
            probability_down: round_to(probability_down, 4),
            confidence: round_to(probability_up.max(probability_down), 4),
        }
    }
}

/// Rounds half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
