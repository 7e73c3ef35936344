//! Sentiment/momentum divergence classification
//!
//! Flags tickers whose headline sentiment disagrees with their momentum
//! exposure strongly enough to be worth a second look.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Risk insight attached to every overlay row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Insight {
    /// Bad news while the stock still carries strong momentum
    #[serde(rename = "Watchlist: Negative sentiment despite high momentum")]
    NegativeSentimentHighMomentum,
    /// Good news while momentum is rolling over
    #[serde(rename = "Watchlist: Positive sentiment but losing momentum")]
    PositiveSentimentLosingMomentum,
    /// No divergence
    Normal,
}

impl Insight {
    /// Report label, as written to the overlay table
    pub fn label(&self) -> &'static str {
        match self {
            Insight::NegativeSentimentHighMomentum => {
                "Watchlist: Negative sentiment despite high momentum"
            }
            Insight::PositiveSentimentLosingMomentum => {
                "Watchlist: Positive sentiment but losing momentum"
            }
            Insight::Normal => "Normal",
        }
    }

    /// True for either watchlist category
    pub fn is_watchlist(&self) -> bool {
        !matches!(self, Insight::Normal)
    }
}

impl fmt::Display for Insight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Cut-offs for [`classify`]. Every comparison is strict.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Sentiment must be below this for the negative watchlist
    pub negative_sentiment: f64,
    /// Momentum must be above this for the negative watchlist
    pub high_momentum: f64,
    /// Sentiment must be above this for the positive watchlist
    pub positive_sentiment: f64,
    /// Momentum must be below this for the positive watchlist
    pub losing_momentum: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            negative_sentiment: -0.3,
            high_momentum: 0.5,
            positive_sentiment: 0.3,
            losing_momentum: -0.5,
        }
    }
}

/// Classify one ticker. The negative watchlist is checked first.
pub fn classify(sentiment: f64, momentum: f64, thresholds: &Thresholds) -> Insight {
    if sentiment < thresholds.negative_sentiment && momentum > thresholds.high_momentum {
        Insight::NegativeSentimentHighMomentum
    } else if sentiment > thresholds.positive_sentiment && momentum < thresholds.losing_momentum {
        Insight::PositiveSentimentLosingMomentum
    } else {
        Insight::Normal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_watchlist_cases() {
        let t = Thresholds::default();
        assert_eq!(classify(-0.5, 0.6, &t), Insight::NegativeSentimentHighMomentum);
        assert_eq!(classify(0.5, -0.6, &t), Insight::PositiveSentimentLosingMomentum);
        assert_eq!(classify(0.0, 0.0, &t), Insight::Normal);
    }

    #[test]
    fn test_classify_boundaries_are_strict() {
        let t = Thresholds::default();
        assert_eq!(classify(-0.3, 0.5, &t), Insight::Normal);
        assert_eq!(classify(-0.3, 0.9, &t), Insight::Normal);
        assert_eq!(classify(-0.9, 0.5, &t), Insight::Normal);
        assert_eq!(classify(0.3, -0.5, &t), Insight::Normal);
        assert_eq!(classify(0.3, -0.9, &t), Insight::Normal);
        assert_eq!(classify(0.9, -0.5, &t), Insight::Normal);
        assert_eq!(classify(-0.301, 0.501, &t), Insight::NegativeSentimentHighMomentum);
        assert_eq!(classify(0.301, -0.501, &t), Insight::PositiveSentimentLosingMomentum);
    }

    #[test]
    fn test_aligned_signals_are_normal() {
        let t = Thresholds::default();
        assert_eq!(classify(0.8, 0.8, &t), Insight::Normal);
        assert_eq!(classify(-0.8, -0.8, &t), Insight::Normal);
    }

    #[test]
    fn test_negative_branch_takes_precedence() {
        // Overlapping thresholds make both branches true; the first one wins
        let t = Thresholds {
            negative_sentiment: 1.0,
            high_momentum: -1.0,
            positive_sentiment: -1.0,
            losing_momentum: 1.0,
        };
        assert_eq!(classify(0.0, 0.0, &t), Insight::NegativeSentimentHighMomentum);
    }

    #[test]
    fn test_labels() {
        assert_eq!(
            Insight::NegativeSentimentHighMomentum.to_string(),
            "Watchlist: Negative sentiment despite high momentum"
        );
        assert_eq!(
            Insight::PositiveSentimentLosingMomentum.label(),
            "Watchlist: Positive sentiment but losing momentum"
        );
        assert_eq!(Insight::Normal.label(), "Normal");
        assert!(!Insight::Normal.is_watchlist());
        assert!(Insight::PositiveSentimentLosingMomentum.is_watchlist());
    }
}
