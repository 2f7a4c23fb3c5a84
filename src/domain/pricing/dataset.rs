use crate::domain::errors::PricingError;
use std::collections::BTreeMap;

/// Labeled tabular training data: one target column plus one or more
/// numeric feature columns.
///
/// Column order is the sorted feature-name order; every row must cover
/// the full schema with finite values.
#[derive(Debug, Clone)]
pub struct Dataset {
    feature_names: Vec<String>,
    rows: Vec<Vec<f64>>,
    targets: Vec<f64>,
}

impl Dataset {
    /// Build a dataset from name -> value records, extracting `target`
    /// as the label column.
    pub fn from_records(
        records: &[BTreeMap<String, f64>],
        target: &str,
    ) -> Result<Self, PricingError> {
        let Some(first) = records.first() else {
            return Err(PricingError::Dataset {
                reason: "dataset contains no rows".to_string(),
            });
        };

        if !first.contains_key(target) {
            return Err(PricingError::Dataset {
                reason: format!("missing target column '{target}'"),
            });
        }

        let feature_names: Vec<String> = first
            .keys()
            .filter(|name| name.as_str() != target)
            .cloned()
            .collect();

        if feature_names.is_empty() {
            return Err(PricingError::Dataset {
                reason: "dataset has no feature columns".to_string(),
            });
        }

        let mut rows = Vec::with_capacity(records.len());
        let mut targets = Vec::with_capacity(records.len());

        for (index, record) in records.iter().enumerate() {
            if record.len() != feature_names.len() + 1 {
                return Err(PricingError::Dataset {
                    reason: format!("row {index} does not match the column schema"),
                });
            }

            let mut row = Vec::with_capacity(feature_names.len());
            for name in &feature_names {
                let value = record.get(name).ok_or_else(|| PricingError::Dataset {
                    reason: format!("row {index} is missing feature '{name}'"),
                })?;
                if !value.is_finite() {
                    return Err(PricingError::Dataset {
                        reason: format!("row {index} has a non-finite value for '{name}'"),
                    });
                }
                row.push(*value);
            }

            let label = record.get(target).ok_or_else(|| PricingError::Dataset {
                reason: format!("row {index} is missing target column '{target}'"),
            })?;
            if !label.is_finite() {
                return Err(PricingError::Dataset {
                    reason: format!("row {index} has a non-finite target"),
                });
            }

            rows.push(row);
            targets.push(*label);
        }

        Ok(Self {
            feature_names,
            rows,
            targets,
        })
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn row(&self, index: usize) -> &[f64] {
        &self.rows[index]
    }

    pub fn target(&self, index: usize) -> f64 {
        self.targets[index]
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
