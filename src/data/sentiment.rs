//! Headline sentiment scoring
//!
//! Per-headline scores come from the VADER compound polarity. Aggregation
//! across a ticker's headlines is defined independently of the scorer so
//! tests can swap in a fixed oracle.

use vader_sentiment::SentimentIntensityAnalyzer;

use super::Headline;

/// Decimal places kept on an aggregate sentiment score
pub const SENTIMENT_DECIMALS: i32 = 3;

/// Round half away from zero to `decimals` places, folding -0.0 into 0.0.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    let rounded = (value * factor).round() / factor;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Maps a headline to a compound polarity in [-1, 1]
pub trait PolarityScorer: Send + Sync {
    /// Compound polarity of a single headline.
    fn score_headline(&self, text: &str) -> f64;

    /// Mean compound polarity of `headlines`, rounded once to three decimals.
    ///
    /// Returns exactly `0.0` for an empty list. Scores that come back
    /// non-finite count as neutral rather than poisoning the mean.
    fn aggregate(&self, headlines: &[Headline]) -> f64 {
        if headlines.is_empty() {
            return 0.0;
        }

        let mut scores: Vec<f64> = headlines
            .iter()
            .map(|h| sanitize(self.score_headline(h)))
            .collect();

        // Summation order is fixed so permutations of the same headlines agree bit-for-bit
        scores.sort_by(f64::total_cmp);
        let mean = scores.iter().sum::<f64>() / scores.len() as f64;

        round_to(mean, SENTIMENT_DECIMALS)
    }
}

fn sanitize(score: f64) -> f64 {
    if score.is_finite() {
        score.clamp(-1.0, 1.0)
    } else {
        tracing::debug!("Non-finite headline score replaced with neutral");
        0.0
    }
}

/// VADER-backed scorer. The lexicon is loaded once and shared for the
/// lifetime of the pipeline.
pub struct VaderScorer {
    analyzer: SentimentIntensityAnalyzer<'static>,
}

impl VaderScorer {
    pub fn new() -> Self {
        Self {
            analyzer: SentimentIntensityAnalyzer::new(),
        }
    }
}

impl Default for VaderScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl PolarityScorer for VaderScorer {
    fn score_headline(&self, text: &str) -> f64 {
        if text.trim().is_empty() {
            return 0.0;
        }

        let scores = self.analyzer.polarity_scores(text);
        scores.get("compound").copied().unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// Fixed oracle: known headlines map to preset scores, everything else is neutral
    struct TableScorer(HashMap<&'static str, f64>);

    impl PolarityScorer for TableScorer {
        fn score_headline(&self, text: &str) -> f64 {
            self.0.get(text).copied().unwrap_or(0.0)
        }
    }

    fn table() -> TableScorer {
        TableScorer(HashMap::from([
            ("beats estimates", 0.4404),
            ("guidance cut", -0.2732),
            ("record revenue", 0.0001),
            ("broken", f64::NAN),
            ("off the charts", 3.5),
        ]))
    }

    fn headlines(items: &[&str]) -> Vec<Headline> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_aggregate_is_exactly_zero() {
        let score = table().aggregate(&[]);
        assert_eq!(score, 0.0);
        assert!(score.is_sign_positive());

        let vader = VaderScorer::new();
        assert_eq!(vader.aggregate(&[]), 0.0);
    }

    #[test]
    fn test_single_headline_rounds_once() {
        let scorer = table();
        assert_eq!(scorer.aggregate(&headlines(&["beats estimates"])), 0.44);
        assert_eq!(scorer.aggregate(&headlines(&["guidance cut"])), -0.273);
    }

    #[test]
    fn test_mean_is_rounded_at_the_end() {
        let scorer = table();
        let score = scorer.aggregate(&headlines(&["beats estimates", "guidance cut", "record revenue"]));
        assert_eq!(score, round_to((0.4404 - 0.2732 + 0.0001) / 3.0, 3));
        assert_eq!(score, 0.056);
    }

    #[test]
    fn test_sub_precision_scores_survive_until_the_mean() {
        // Rounding each score first would average 0.000, 0.000, 0.001 down to 0.0
        let scorer = TableScorer(HashMap::from([("a", 0.0004), ("b", 0.0004), ("c", 0.0010)]));
        assert_eq!(scorer.aggregate(&headlines(&["a", "b", "c"])), 0.001);
        assert_eq!(scorer.aggregate(&headlines(&["a"])), 0.0);
    }

    #[test]
    fn test_aggregate_is_order_independent() {
        let scorer = table();
        let forward = headlines(&["beats estimates", "guidance cut", "record revenue", "unknown"]);
        let mut reversed = forward.clone();
        reversed.reverse();
        let rotated = headlines(&["record revenue", "unknown", "beats estimates", "guidance cut"]);

        let expected = scorer.aggregate(&forward);
        assert_eq!(scorer.aggregate(&reversed), expected);
        assert_eq!(scorer.aggregate(&rotated), expected);
    }

    #[test]
    fn test_malformed_scores_are_neutralized() {
        let scorer = table();
        assert_eq!(scorer.aggregate(&headlines(&["broken"])), 0.0);
        assert_eq!(scorer.aggregate(&headlines(&["broken", "beats estimates"])), 0.22);
        assert_eq!(scorer.aggregate(&headlines(&["off the charts"])), 1.0);
    }

    #[test]
    fn test_round_to_folds_negative_zero() {
        let rounded = round_to(-0.0001, 3);
        assert_eq!(rounded, 0.0);
        assert!(rounded.is_sign_positive());
        assert_eq!(round_to(0.12345, 2), 0.12);
    }

    #[test]
    fn test_vader_polarity_direction() {
        let scorer = VaderScorer::new();
        assert!(scorer.score_headline("great quarter") > 0.0);
        assert!(scorer.score_headline("terrible losses and a lawsuit") < 0.0);
        assert_eq!(scorer.score_headline("   "), 0.0);
    }

    #[test]
    fn test_vader_single_headline_aggregate_matches_score() {
        let scorer = VaderScorer::new();
        let h = "Apple posts great quarter, beats estimates".to_string();
        let expected = round_to(scorer.score_headline(&h), 3);
        assert_eq!(scorer.aggregate(&[h]), expected);
    }

    #[test]
    fn test_vader_scores_are_bounded() {
        let scorer = VaderScorer::new();
        for text in ["amazing wonderful fantastic excellent superb!!!", "horrible awful disaster fraud crash!!!"] {
            let s = scorer.score_headline(text);
            assert!((-1.0..=1.0).contains(&s), "{} out of range for {}", s, text);
        }
    }
}
