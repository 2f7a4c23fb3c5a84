//! Local NLP-based sentiment analysis using VADER
//!
//! VADER (Valence Aware Dictionary and sEntiment Reasoner) is a
//! lexicon/rule-based analyzer tuned for social media and review text.
//! It carries no learned state and no training step; every call is a
//! pure function of its input.
//!
//! # Example
//! ```rust,ignore
//! use pricepulse::infrastructure::sentiment::SentimentAnalyzer;
//!
//! let analyzer = SentimentAnalyzer::new();
//! let scores = analyzer.analyze("I love this product");
//! assert!(scores.compound > 0.05);
//! ```

use vader_sentiment::SentimentIntensityAnalyzer;

use crate::domain::sentiment::SentimentScores;

/// Wraps the pre-built VADER lexicon behind the domain score tuple.
pub struct SentimentAnalyzer {
    analyzer: SentimentIntensityAnalyzer<'static>,
}

impl SentimentAnalyzer {
    /// Create a new analyzer instance. The lexicon is built once here.
    pub fn new() -> Self {
        Self {
            analyzer: SentimentIntensityAnalyzer::new(),
        }
    }

    /// Score a piece of text.
    ///
    /// Blank input short-circuits to all-zero scores (neutral label)
    /// without consulting the lexicon.
    pub fn analyze(&self, text: &str) -> SentimentScores {
        if text.trim().is_empty() {
            return SentimentScores::zero();
        }

        let scores = self.analyzer.polarity_scores(text);
        SentimentScores {
            positive: scores.get("pos").copied().unwrap_or(0.0),
            negative: scores.get("neg").copied().unwrap_or(0.0),
            neutral: scores.get("neu").copied().unwrap_or(0.0),
            compound: scores.get("compound").copied().unwrap_or(0.0),
        }
    }
}

impl Default for SentimentAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
