pub mod vader;

pub use vader::SentimentAnalyzer;
