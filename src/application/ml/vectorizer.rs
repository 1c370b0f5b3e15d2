use crate::domain::ml::feature_registry::FeatureSpec;

/// Dense feature values aligned to a `FeatureSpec`.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector(Vec<f64>);

impl FeatureVector {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Maps a named-field record onto the model's feature order.
///
/// Every slot starts at 0. Fields whose name matches a model feature overwrite
/// that slot; fields the model does not know are ignored. Model features absent
/// from the record stay at 0, so partial records are accepted.
pub fn vectorize<'a, I>(fields: I, spec: &FeatureSpec) -> FeatureVector
where
    I: IntoIterator<Item = (&'a str, f64)>,
{
    let mut values = vec![0.0; spec.len()];
    for (name, value) in fields {
        if let Some(slot) = spec.position(name) {
            values[slot] = value;
        }
    }
    FeatureVector(values)
}
