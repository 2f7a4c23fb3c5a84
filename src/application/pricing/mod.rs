pub mod artifact;
pub mod model;

pub use model::{PricingModel, TrainingParams, TrainingReport};
