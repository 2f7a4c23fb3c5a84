//! Offline training CLI for the pricing model.
//!
//! Reads a labeled CSV (one target column, the rest numeric features),
//! fits the gradient-boosted ensemble, reports holdout metrics and
//! writes the versioned model artifact the server loads at startup.

use clap::Parser;
use pricepulse::application::pricing::{PricingModel, TrainingParams};
use pricepulse::domain::pricing::Dataset;
use std::collections::BTreeMap;
use std::error::Error;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to labeled training data CSV
    #[arg(long, default_value = "data/training_data.csv")]
    input: PathBuf,

    /// Path to output model artifact
    #[arg(long, default_value = "data/models/pricing.json")]
    output: PathBuf,

    /// Name of the target column
    #[arg(long, default_value = "price")]
    target: String,

    /// Number of boosting iterations (trees)
    #[arg(long, default_value_t = 100)]
    trees: usize,

    /// Maximum depth of each tree
    #[arg(long, default_value_t = 6)]
    max_depth: u32,

    /// Learning rate (shrinkage)
    #[arg(long, default_value_t = 0.1)]
    shrinkage: f32,

    /// Fraction of rows withheld for evaluation
    #[arg(long, default_value_t = 0.2)]
    holdout: f64,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    if !args.input.exists() {
        println!("Training data not found at {:?}.", args.input);
        return Ok(());
    }

    println!("Loading training data from {:?}", args.input);
    let file = File::open(&args.input)?;
    let mut rdr = csv::Reader::from_reader(BufReader::new(file));
    let headers = rdr.headers()?.clone();

    let mut records: Vec<BTreeMap<String, f64>> = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let mut row = BTreeMap::new();
        for (name, value) in headers.iter().zip(record.iter()) {
            row.insert(name.to_string(), value.trim().parse::<f64>()?);
        }
        records.push(row);
    }

    let dataset = Dataset::from_records(&records, &args.target)?;
    println!(
        "Training on {} rows x {} features (target: {})...",
        dataset.len(),
        dataset.feature_names().len(),
        args.target
    );

    let params = TrainingParams {
        trees: args.trees,
        max_depth: args.max_depth,
        shrinkage: args.shrinkage,
        holdout_fraction: args.holdout,
    };

    let mut model = PricingModel::new();
    let report = model.train(&dataset, &params)?;

    match (report.rmse, report.mae) {
        (Some(rmse), Some(mae)) => println!(
            "Holdout (n={}): RMSE={:.6}, MAE={:.6}",
            report.holdout_rows, rmse, mae
        ),
        _ => println!("Holdout partition empty; no evaluation metrics."),
    }

    println!("Saving model to {:?}", args.output);
    model.save(&args.output)?;

    println!("Done. Model saved successfully.");
    Ok(())
}
