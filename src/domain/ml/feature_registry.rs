use crate::domain::errors::StartupError;
use std::collections::HashSet;

/// Numeric kind of a model input field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureKind {
    Continuous,
    /// Integer flag (e.g. a crossover indicator encoded as 0/1)
    Integer,
}

/// Validation bound applied to a single field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound {
    None,
    /// Closed interval [min, max]
    Range { min: f64, max: f64 },
    /// value >= min
    AtLeast(f64),
    /// value > min
    GreaterThan(f64),
}

impl Bound {
    /// Returns a description of the violated constraint, or `None` when `value` satisfies it.
    pub fn check(&self, value: f64) -> Option<String> {
        if !value.is_finite() {
            return Some("must be a finite number".to_string());
        }
        match *self {
            Bound::None => None,
            Bound::Range { min, max } if value < min || value > max => {
                Some(format!("must be between {} and {}", min, max))
            }
            Bound::AtLeast(min) if value < min => {
                Some(format!("must be greater than or equal to {}", min))
            }
            Bound::GreaterThan(min) if value <= min => Some(format!("must be greater than {}", min)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FeatureDef {
    pub name: &'static str,
    pub kind: FeatureKind,
    pub bound: Bound,
}

const fn def(name: &'static str, kind: FeatureKind, bound: Bound) -> FeatureDef {
    FeatureDef { name, kind, bound }
}

/// Fields accepted by the prediction endpoint, in wire order.
/// Names must match the column names the classifier was trained on.
pub const FEATURE_SCHEMA: &[FeatureDef] = &[
    def("Return_1d", FeatureKind::Continuous, Bound::None),
    def("Return_5d", FeatureKind::Continuous, Bound::None),
    def("Return_10d", FeatureKind::Continuous, Bound::None),
    def("SMA_Cross_5_20", FeatureKind::Integer, Bound::None),
    def("SMA_Cross_10_50", FeatureKind::Integer, Bound::None),
    def(
        "RSI_14",
        FeatureKind::Continuous,
        Bound::Range {
            min: 0.0,
            max: 100.0,
        },
    ),
    def("BB_Position", FeatureKind::Continuous, Bound::None),
    def("MACD_Diff", FeatureKind::Continuous, Bound::None),
    def("Volume_Ratio", FeatureKind::Continuous, Bound::GreaterThan(0.0)),
    def("Volatility_5d", FeatureKind::Continuous, Bound::AtLeast(0.0)),
    def("Volatility_20d", FeatureKind::Continuous, Bound::AtLeast(0.0)),
    def("Daily_Range", FeatureKind::Continuous, Bound::AtLeast(0.0)),
    def("Daily_Range_MA", FeatureKind::Continuous, Bound::AtLeast(0.0)),
    def("Trend", FeatureKind::Integer, Bound::None),
    def("Noise", FeatureKind::Continuous, Bound::AtLeast(0.0)),
    def("Volatility", FeatureKind::Continuous, Bound::AtLeast(0.0)),
];

pub fn schema_field(name: &str) -> Option<&'static FeatureDef> {
    FEATURE_SCHEMA.iter().find(|f| f.name == name)
}

/// Ordered feature list the loaded model was trained on.
///
/// Built once from the metadata artifact. Order is significant: slot `i` of every
/// feature vector corresponds to `names()[i]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureSpec {
    names: Vec<String>,
}

impl FeatureSpec {
    pub fn new(names: Vec<String>) -> Result<Self, StartupError> {
        let mut seen = HashSet::with_capacity(names.len());
        for name in &names {
            if !seen.insert(name.as_str()) {
                return Err(StartupError::DuplicateFeature { name: name.clone() });
            }
        }
        Ok(Self { names })
    }

    /// Feature list covering every schema field, in schema order.
    pub fn from_schema() -> Self {
        Self {
            names: FEATURE_SCHEMA.iter().map(|f| f.name.to_string()).collect(),
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Features listed by the model that the input schema can never populate.
    pub fn unknown_to_schema(&self) -> Vec<&str> {
        self.names
            .iter()
            .filter(|n| schema_field(n).is_none())
            .map(String::as_str)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_has_sixteen_unique_fields() {
        assert_eq!(FEATURE_SCHEMA.len(), 16);
        let unique: HashSet<_> = FEATURE_SCHEMA.iter().map(|f| f.name).collect();
        assert_eq!(unique.len(), 16);
    }

    #[test]
    fn test_integer_fields() {
        let integers: Vec<_> = FEATURE_SCHEMA
            .iter()
            .filter(|f| f.kind == FeatureKind::Integer)
            .map(|f| f.name)
            .collect();
        assert_eq!(integers, vec!["SMA_Cross_5_20", "SMA_Cross_10_50", "Trend"]);
    }

    #[test]
    fn test_bounds() {
        let rsi = schema_field("RSI_14").unwrap();
        assert!(rsi.bound.check(0.0).is_none());
        assert!(rsi.bound.check(100.0).is_none());
        assert!(rsi.bound.check(150.0).is_some());
        assert!(rsi.bound.check(-0.1).is_some());

        let volume = schema_field("Volume_Ratio").unwrap();
        assert!(volume.bound.check(0.0).is_some());
        assert!(volume.bound.check(0.01).is_none());

        let noise = schema_field("Noise").unwrap();
        assert!(noise.bound.check(0.0).is_none());
        assert!(noise.bound.check(-1e-9).is_some());

        assert!(Bound::None.check(f64::NAN).is_some());
    }

    #[test]
    fn test_feature_spec_rejects_duplicates() {
        let result = FeatureSpec::new(vec!["RSI_14".to_string(), "RSI_14".to_string()]);
        assert!(matches!(
            result,
            Err(StartupError::DuplicateFeature { ref name }) if name == "RSI_14"
        ));
    }

    #[test]
    fn test_unknown_to_schema() {
        let spec = FeatureSpec::new(vec!["RSI_14".to_string(), "Sentiment".to_string()]).unwrap();
        assert_eq!(spec.unknown_to_schema(), vec!["Sentiment"]);
        assert_eq!(spec.position("Sentiment"), Some(1));
        assert!(FeatureSpec::from_schema().unknown_to_schema().is_empty());
    }
}
