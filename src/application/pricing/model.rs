//! Pricing model lifecycle: fit, apply and persist a gradient-boosted
//! regression from a tabular feature set to a scalar price.

use gbdt::config::Config as GbdtConfig;
use gbdt::decision_tree::{Data, DataVec};
use gbdt::gradient_boost::GBDT;
use rand::seq::SliceRandom;
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use tracing::{info, warn};

use super::artifact::ModelArtifact;
use crate::domain::errors::PricingError;
use crate::domain::pricing::{Dataset, FeatureVector};

/// Hyperparameters for one training run.
#[derive(Debug, Clone)]
pub struct TrainingParams {
    /// Number of boosting iterations (trees).
    pub trees: usize,
    pub max_depth: u32,
    /// Learning rate applied to each tree's contribution.
    pub shrinkage: f32,
    /// Fraction of rows withheld for evaluation only.
    pub holdout_fraction: f64,
}

impl Default for TrainingParams {
    fn default() -> Self {
        Self {
            trees: 100,
            max_depth: 6,
            shrinkage: 0.1,
            holdout_fraction: 0.2,
        }
    }
}

/// Holdout evaluation summary. Advisory only; nothing gates on it.
#[derive(Debug, Clone, Serialize)]
pub struct TrainingReport {
    pub train_rows: usize,
    pub holdout_rows: usize,
    /// Root-mean-squared-error on the holdout partition, when one exists.
    pub rmse: Option<f64>,
    pub mae: Option<f64>,
}

/// Owns at most one fitted estimator together with the feature schema it
/// was fit on. Created empty; populated by [`train`](Self::train) or
/// [`load`](Self::load).
pub struct PricingModel {
    estimator: Option<GBDT>,
    schema: Vec<String>,
}

impl PricingModel {
    pub fn new() -> Self {
        Self {
            estimator: None,
            schema: Vec::new(),
        }
    }

    pub fn is_trained(&self) -> bool {
        self.estimator.is_some()
    }

    /// Feature names the current estimator was fit on, in column order.
    pub fn schema(&self) -> &[String] {
        &self.schema
    }

    /// Fit a fresh gradient-boosted ensemble, replacing any previous
    /// estimator.
    ///
    /// Rows are split into randomized train/holdout partitions; the
    /// holdout is used only to compute the RMSE/MAE reported back.
    pub fn train(
        &mut self,
        dataset: &Dataset,
        params: &TrainingParams,
    ) -> Result<TrainingReport, PricingError> {
        let n = dataset.len();

        let mut indices: Vec<usize> = (0..n).collect();
        indices.shuffle(&mut rand::rng());

        let holdout_len = ((n as f64) * params.holdout_fraction).round() as usize;
        // Always keep at least one training row.
        let holdout_len = holdout_len.min(n.saturating_sub(1));
        let (holdout_idx, train_idx) = indices.split_at(holdout_len);

        let mut train_data: DataVec = train_idx
            .iter()
            .map(|&i| {
                Data::new_training_data(
                    to_f32(dataset.row(i)),
                    1.0,
                    dataset.target(i) as f32,
                    None,
                )
            })
            .collect();

        let mut cfg = GbdtConfig::new();
        cfg.set_feature_size(dataset.feature_names().len());
        cfg.set_max_depth(params.max_depth);
        cfg.set_iterations(params.trees);
        cfg.set_shrinkage(params.shrinkage);
        cfg.set_loss("SquaredError");
        cfg.set_debug(false);

        let mut estimator = GBDT::new(&cfg);
        estimator.fit(&mut train_data);

        let (rmse, mae) = if holdout_idx.is_empty() {
            (None, None)
        } else {
            let holdout: DataVec = holdout_idx
                .iter()
                .map(|&i| Data::new_test_data(to_f32(dataset.row(i)), None))
                .collect();
            let predictions = estimator.predict(&holdout);

            let mut squared = 0.0;
            let mut absolute = 0.0;
            for (&i, &predicted) in holdout_idx.iter().zip(predictions.iter()) {
                let err = f64::from(predicted) - dataset.target(i);
                squared += err * err;
                absolute += err.abs();
            }
            let m = holdout_idx.len() as f64;
            (Some((squared / m).sqrt()), Some(absolute / m))
        };

        let report = TrainingReport {
            train_rows: train_idx.len(),
            holdout_rows: holdout_idx.len(),
            rmse,
            mae,
        };

        if let (Some(rmse), Some(mae)) = (report.rmse, report.mae) {
            info!(
                train_rows = report.train_rows,
                holdout_rows = report.holdout_rows,
                rmse,
                mae,
                "pricing model trained"
            );
        } else {
            warn!(
                train_rows = report.train_rows,
                "pricing model trained without a holdout partition"
            );
        }

        self.schema = dataset.feature_names().to_vec();
        self.estimator = Some(estimator);
        Ok(report)
    }

    /// Predict one price for a single feature vector.
    pub fn predict(&self, features: &FeatureVector) -> Result<f64, PricingError> {
        let predictions = self.predict_batch(std::slice::from_ref(features))?;
        predictions
            .into_iter()
            .next()
            .ok_or_else(|| PricingError::Prediction {
                reason: "estimator returned no prediction".to_string(),
            })
    }

    /// Predict one price per row, in input order.
    pub fn predict_batch(&self, rows: &[FeatureVector]) -> Result<Vec<f64>, PricingError> {
        let estimator = self.estimator.as_ref().ok_or(PricingError::NotTrained)?;

        let mut batch: DataVec = Vec::with_capacity(rows.len());
        for row in rows {
            batch.push(Data::new_test_data(self.align(row)?, None));
        }

        let predictions = estimator.predict(&batch);
        if predictions.len() != rows.len() {
            return Err(PricingError::Prediction {
                reason: format!(
                    "expected {} predictions, got {}",
                    rows.len(),
                    predictions.len()
                ),
            });
        }

        Ok(predictions.into_iter().map(f64::from).collect())
    }

    /// Write the fitted estimator to `path` as a versioned artifact,
    /// creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), PricingError> {
        let estimator = self.estimator.as_ref().ok_or(PricingError::NotTrained)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let artifact =
            ModelArtifact::new(self.schema.clone(), serde_json::to_value(estimator)?);
        let file = File::create(path)?;
        serde_json::to_writer(BufWriter::new(file), &artifact)?;

        info!(path = %path.display(), features = self.schema.len(), "pricing model saved");
        Ok(())
    }

    /// Replace the current estimator with one read back from `path`.
    pub fn load(&mut self, path: &Path) -> Result<(), PricingError> {
        let file = File::open(path)?;
        let artifact: ModelArtifact = serde_json::from_reader(BufReader::new(file))?;
        artifact.validate()?;

        let estimator: GBDT = serde_json::from_value(artifact.estimator)?;
        self.schema = artifact.schema;
        self.estimator = Some(estimator);

        info!(path = %path.display(), features = self.schema.len(), "pricing model loaded");
        Ok(())
    }

    /// Order a feature vector's values by the fitted schema, rejecting
    /// missing or extraneous names.
    fn align(&self, features: &FeatureVector) -> Result<Vec<f32>, PricingError> {
        let matches = features.len() == self.schema.len()
            && self.schema.iter().all(|name| features.get(name).is_some());

        if !matches {
            return Err(PricingError::SchemaMismatch {
                expected: self.schema.join(", "),
                actual: features.names().collect::<Vec<_>>().join(", "),
            });
        }

        Ok(self
            .schema
            .iter()
            .map(|name| features.get(name).unwrap_or_default() as f32)
            .collect())
    }
}

impl Default for PricingModel {
    fn default() -> Self {
        Self::new()
    }
}

fn to_f32(row: &[f64]) -> Vec<f32> {
    row.iter().map(|&v| v as f32).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    // price = 1500 * area + 9000 * rooms, no noise
    fn synthetic_dataset(rows: usize) -> Dataset {
        let records: Vec<BTreeMap<String, f64>> = (0..rows)
            .map(|i| {
                let area = 40.0 + (i % 60) as f64;
                let rooms = (i % 5) as f64 + 1.0;
                let mut record = BTreeMap::new();
                record.insert("area".to_string(), area);
                record.insert("rooms".to_string(), rooms);
                record.insert("price".to_string(), 1500.0 * area + 9000.0 * rooms);
                record
            })
            .collect();
        Dataset::from_records(&records, "price").unwrap()
    }

    fn features(area: f64, rooms: f64) -> FeatureVector {
        let mut fv = FeatureVector::new();
        fv.insert("area", area);
        fv.insert("rooms", rooms);
        fv
    }

    fn temp_artifact_path(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "pricepulse-model-{tag}-{}.json",
            std::process::id()
        ))
    }

    #[test]
    fn train_then_predict_returns_finite_prices() {
        let dataset = synthetic_dataset(60);
        let mut model = PricingModel::new();

        let report = model.train(&dataset, &TrainingParams::default()).unwrap();
        assert_eq!(report.train_rows + report.holdout_rows, dataset.len());
        assert!(report.rmse.unwrap().is_finite());

        let batch = vec![features(55.0, 2.0), features(80.0, 4.0)];
        let predictions = model.predict_batch(&batch).unwrap();
        assert_eq!(predictions.len(), 2);
        assert!(predictions.iter().all(|p| p.is_finite()));
    }

    #[test]
    fn untrained_model_refuses_to_predict() {
        let model = PricingModel::new();
        let err = model.predict(&features(55.0, 2.0)).unwrap_err();
        assert!(matches!(err, PricingError::NotTrained));
    }

    #[test]
    fn mismatched_schema_is_rejected() {
        let dataset = synthetic_dataset(40);
        let mut model = PricingModel::new();
        model.train(&dataset, &TrainingParams::default()).unwrap();

        let mut wrong = FeatureVector::new();
        wrong.insert("area", 55.0);
        wrong.insert("floors", 2.0);

        let err = model.predict(&wrong).unwrap_err();
        assert!(matches!(err, PricingError::SchemaMismatch { .. }));

        let mut partial = FeatureVector::new();
        partial.insert("area", 55.0);
        assert!(model.predict(&partial).is_err());
    }

    #[test]
    fn save_then_load_preserves_predictions() {
        let dataset = synthetic_dataset(60);
        let mut model = PricingModel::new();
        model.train(&dataset, &TrainingParams::default()).unwrap();

        let input = features(63.0, 3.0);
        let before = model.predict(&input).unwrap();

        let path = temp_artifact_path("roundtrip");
        model.save(&path).unwrap();

        let mut restored = PricingModel::new();
        restored.load(&path).unwrap();
        let after = restored.predict(&input).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(restored.schema(), model.schema());
        assert!(
            (before - after).abs() < 1e-6,
            "prediction drifted across save/load: {before} vs {after}"
        );
    }

    #[test]
    fn saving_an_untrained_model_fails() {
        let model = PricingModel::new();
        let err = model.save(&temp_artifact_path("untrained")).unwrap_err();
        assert!(matches!(err, PricingError::NotTrained));
    }

    #[test]
    fn load_rejects_unknown_format_version() {
        let dataset = synthetic_dataset(40);
        let mut model = PricingModel::new();
        model.train(&dataset, &TrainingParams::default()).unwrap();

        let path = temp_artifact_path("badversion");
        model.save(&path).unwrap();

        let mut artifact: serde_json::Value =
            serde_json::from_reader(File::open(&path).unwrap()).unwrap();
        artifact["format_version"] = serde_json::json!(99);
        serde_json::to_writer(File::create(&path).unwrap(), &artifact).unwrap();

        let mut restored = PricingModel::new();
        let err = restored.load(&path).unwrap_err();
        std::fs::remove_file(&path).ok();

        assert!(matches!(err, PricingError::FormatVersion { found: 99, .. }));
        assert!(!restored.is_trained());
    }

    #[test]
    fn load_rejects_corrupted_schema() {
        let dataset = synthetic_dataset(40);
        let mut model = PricingModel::new();
        model.train(&dataset, &TrainingParams::default()).unwrap();

        let path = temp_artifact_path("badschema");
        model.save(&path).unwrap();

        let mut artifact: serde_json::Value =
            serde_json::from_reader(File::open(&path).unwrap()).unwrap();
        artifact["schema"] = serde_json::json!(["area", "bedrooms"]);
        serde_json::to_writer(File::create(&path).unwrap(), &artifact).unwrap();

        let mut restored = PricingModel::new();
        let err = restored.load(&path).unwrap_err();
        std::fs::remove_file(&path).ok();

        assert!(matches!(err, PricingError::FingerprintMismatch));
    }

    #[test]
    fn tiny_dataset_trains_without_holdout_metrics() {
        let dataset = synthetic_dataset(2);
        let mut model = PricingModel::new();

        let report = model.train(&dataset, &TrainingParams::default()).unwrap();
        assert_eq!(report.holdout_rows, 0);
        assert!(report.rmse.is_none());
        assert!(model.is_trained());
    }
}
