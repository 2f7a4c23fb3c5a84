use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One priceable item: a mapping from feature name to numeric value.
///
/// Backed by a `BTreeMap` so iteration order is stable. The model aligns
/// values against its fitted schema by name, never by insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureVector(BTreeMap<String, f64>);

impl FeatureVector {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        self.0.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.0.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Feature names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl FromIterator<(String, f64)> for FeatureVector {
    fn from_iter<T: IntoIterator<Item = (String, f64)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_sorted_regardless_of_insertion_order() {
        let mut fv = FeatureVector::new();
        fv.insert("rooms", 3.0);
        fv.insert("area", 72.5);

        let names: Vec<&str> = fv.names().collect();
        assert_eq!(names, vec!["area", "rooms"]);
    }

    #[test]
    fn deserializes_from_plain_json_object() {
        let fv: FeatureVector =
            serde_json::from_str(r#"{"area": 72.5, "rooms": 3}"#).unwrap();

        assert_eq!(fv.get("area"), Some(72.5));
        assert_eq!(fv.get("rooms"), Some(3.0));
        assert_eq!(fv.len(), 2);
    }
}
