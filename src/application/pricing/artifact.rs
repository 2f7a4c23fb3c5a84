use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::domain::errors::PricingError;

/// Current on-disk artifact layout. Bump when the container changes shape.
pub const FORMAT_VERSION: u32 = 1;

/// Versioned container around the serialized estimator.
///
/// The fingerprint ties the estimator to the feature schema it was fit
/// on, so a renamed or reordered schema is rejected at load time instead
/// of producing silently misaligned predictions. The estimator itself
/// stays opaque JSON produced by the boosting library.
#[derive(Debug, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub format_version: u32,
    pub schema: Vec<String>,
    pub schema_fingerprint: String,
    pub trained_at: DateTime<Utc>,
    pub estimator: serde_json::Value,
}

impl ModelArtifact {
    pub fn new(schema: Vec<String>, estimator: serde_json::Value) -> Self {
        let schema_fingerprint = fingerprint(&schema);
        Self {
            format_version: FORMAT_VERSION,
            schema,
            schema_fingerprint,
            trained_at: Utc::now(),
            estimator,
        }
    }

    /// Check the container invariants after deserialization.
    pub fn validate(&self) -> Result<(), PricingError> {
        if self.format_version != FORMAT_VERSION {
            return Err(PricingError::FormatVersion {
                found: self.format_version,
                expected: FORMAT_VERSION,
            });
        }
        if fingerprint(&self.schema) != self.schema_fingerprint {
            return Err(PricingError::FingerprintMismatch);
        }
        Ok(())
    }
}

/// SHA-256 over the newline-joined schema, hex encoded.
pub fn fingerprint(schema: &[String]) -> String {
    let mut hasher = Sha256::new();
    for name in schema {
        hasher.update(name.as_bytes());
        hasher.update(b"\n");
    }
    hex::encode(hasher.finalize())
}
