use thiserror::Error;

/// Errors from the pricing model lifecycle: training, inference and
/// artifact persistence.
#[derive(Debug, Error)]
pub enum PricingError {
    #[error("model has not been trained or loaded")]
    NotTrained,

    #[error("feature schema mismatch: expected [{expected}], got [{actual}]")]
    SchemaMismatch { expected: String, actual: String },

    #[error("invalid dataset: {reason}")]
    Dataset { reason: String },

    #[error("prediction failed: {reason}")]
    Prediction { reason: String },

    #[error("model artifact I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("model artifact serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("unsupported model artifact version {found} (expected {expected})")]
    FormatVersion { found: u32, expected: u32 },

    #[error("model artifact schema fingerprint mismatch")]
    FingerprintMismatch,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_mismatch_formatting() {
        let err = PricingError::SchemaMismatch {
            expected: "area, rooms".to_string(),
            actual: "area".to_string(),
        };

        let msg = err.to_string();
        assert!(msg.contains("area, rooms"));
        assert!(msg.contains("got [area]"));
    }

    #[test]
    fn test_format_version_formatting() {
        let err = PricingError::FormatVersion {
            found: 7,
            expected: 1,
        };

        let msg = err.to_string();
        assert!(msg.contains('7'));
        assert!(msg.contains('1'));
    }
}
