//! Overlay builder
//!
//! Joins factor exposures with aggregate headline sentiment and tags each
//! ticker with an [`Insight`]. The join is an inner join on the ticker:
//! a ticker missing from either side is left out of the overlay and
//! reported in [`JoinDiff`] instead. A partial universe never fails the run.

pub mod insight;

pub use insight::{classify, Insight, Thresholds};

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, warn};

use crate::data::{FactorVector, Ticker};

/// One joined and classified ticker
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayRow {
    pub ticker: Ticker,
    #[serde(flatten)]
    pub factors: FactorVector,
    pub sentiment: f64,
    pub insight: Insight,
}

/// Tickers excluded by the inner join
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct JoinDiff {
    /// Had exposures but no sentiment score
    pub missing_sentiment: Vec<Ticker>,
    /// Had a sentiment score but no exposures
    pub missing_exposures: Vec<Ticker>,
}

impl JoinDiff {
    pub fn is_empty(&self) -> bool {
        self.missing_sentiment.is_empty() && self.missing_exposures.is_empty()
    }

    pub fn dropped_count(&self) -> usize {
        self.missing_sentiment.len() + self.missing_exposures.len()
    }
}

/// Overlay rows sorted by ticker, plus what the join left out
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OverlayTable {
    pub rows: Vec<OverlayRow>,
    pub diff: JoinDiff,
}

impl OverlayTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, ticker: &str) -> Option<&OverlayRow> {
        self.rows
            .binary_search_by(|row| row.ticker.as_str().cmp(ticker))
            .ok()
            .map(|idx| &self.rows[idx])
    }

    /// Rows flagged for either watchlist
    pub fn watchlist(&self) -> impl Iterator<Item = &OverlayRow> {
        self.rows.iter().filter(|row| row.insight.is_watchlist())
    }

    /// Row count per insight category
    pub fn insight_counts(&self) -> BTreeMap<Insight, usize> {
        let mut counts = BTreeMap::new();
        for row in &self.rows {
            *counts.entry(row.insight).or_insert(0) += 1;
        }
        counts
    }
}

/// Builds the overlay table. Pure: the same inputs always give the same
/// table.
#[derive(Debug, Clone, Copy, Default)]
pub struct OverlayBuilder {
    thresholds: Thresholds,
}

impl OverlayBuilder {
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Inner-join `exposures` with `sentiment` and classify each row
    pub fn build(
        &self,
        exposures: &BTreeMap<Ticker, FactorVector>,
        sentiment: &BTreeMap<Ticker, f64>,
    ) -> OverlayTable {
        let mut rows = Vec::with_capacity(exposures.len().min(sentiment.len()));
        let mut diff = JoinDiff::default();

        // BTreeMap iteration keeps rows sorted by ticker
        for (ticker, factors) in exposures {
            match sentiment.get(ticker) {
                Some(&score) => rows.push(OverlayRow {
                    ticker: ticker.clone(),
                    factors: *factors,
                    sentiment: score,
                    insight: classify(score, factors.momentum, &self.thresholds),
                }),
                None => diff.missing_sentiment.push(ticker.clone()),
            }
        }

        diff.missing_exposures = sentiment
            .keys()
            .filter(|ticker| !exposures.contains_key(*ticker))
            .cloned()
            .collect();

        if !diff.is_empty() {
            warn!(
                dropped = diff.dropped_count(),
                missing_sentiment = ?diff.missing_sentiment,
                missing_exposures = ?diff.missing_exposures,
                "Tickers excluded from overlay by inner join"
            );
        }

        debug!(rows = rows.len(), "Overlay built");
        OverlayTable { rows, diff }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vector(momentum: f64) -> FactorVector {
        FactorVector {
            size: 0.1,
            value: -0.2,
            momentum,
            quality: 0.0,
            volatility: 0.3,
        }
    }

    fn exposures(items: &[(&str, f64)]) -> BTreeMap<Ticker, FactorVector> {
        items.iter().map(|(t, m)| (t.to_string(), vector(*m))).collect()
    }

    fn scores(items: &[(&str, f64)]) -> BTreeMap<Ticker, f64> {
        items.iter().map(|(t, s)| (t.to_string(), *s)).collect()
    }

    #[test]
    fn test_inner_join_drops_one_sided_tickers() {
        let table = OverlayBuilder::default().build(
            &exposures(&[("A", 0.1), ("B", 0.6), ("C", -0.6)]),
            &scores(&[("B", -0.4), ("C", 0.4), ("D", 0.9)]),
        );

        let tickers: Vec<_> = table.rows.iter().map(|r| r.ticker.as_str()).collect();
        assert_eq!(tickers, vec!["B", "C"]);

        let b = table.get("B").unwrap();
        assert_eq!(b.factors, vector(0.6));
        assert_eq!(b.sentiment, -0.4);
        assert_eq!(b.insight, Insight::NegativeSentimentHighMomentum);

        let c = table.get("C").unwrap();
        assert_eq!(c.factors, vector(-0.6));
        assert_eq!(c.sentiment, 0.4);
        assert_eq!(c.insight, Insight::PositiveSentimentLosingMomentum);

        assert!(table.get("A").is_none());
        assert!(table.get("D").is_none());
        assert_eq!(table.diff.missing_sentiment, vec!["A"]);
        assert_eq!(table.diff.missing_exposures, vec!["D"]);
        assert_eq!(table.diff.dropped_count(), 2);
    }

    #[test]
    fn test_rows_sorted_by_ticker() {
        let table = OverlayBuilder::default().build(
            &exposures(&[("TSLA", 0.0), ("AAPL", 0.0), ("JNJ", 0.0)]),
            &scores(&[("JNJ", 0.0), ("TSLA", 0.0), ("AAPL", 0.0)]),
        );
        let tickers: Vec<_> = table.rows.iter().map(|r| r.ticker.as_str()).collect();
        assert_eq!(tickers, vec!["AAPL", "JNJ", "TSLA"]);
        assert!(table.diff.is_empty());
    }

    #[test]
    fn test_build_is_deterministic() {
        let e = exposures(&[("A", 0.7), ("B", -0.7), ("C", 0.0)]);
        let s = scores(&[("A", -0.5), ("B", 0.5), ("C", 0.0)]);
        let builder = OverlayBuilder::default();
        assert_eq!(builder.build(&e, &s), builder.build(&e, &s));
    }

    #[test]
    fn test_empty_inputs_give_empty_overlay() {
        let table = OverlayBuilder::default().build(&BTreeMap::new(), &BTreeMap::new());
        assert!(table.is_empty());
        assert!(table.diff.is_empty());

        let table = OverlayBuilder::default().build(&exposures(&[("A", 0.9)]), &BTreeMap::new());
        assert!(table.is_empty());
        assert_eq!(table.diff.missing_sentiment, vec!["A"]);
    }

    #[test]
    fn test_custom_thresholds_flow_through() {
        let builder = OverlayBuilder::new(Thresholds {
            negative_sentiment: 0.0,
            high_momentum: 0.0,
            ..Thresholds::default()
        });
        let table = builder.build(&exposures(&[("A", 0.1)]), &scores(&[("A", -0.1)]));
        assert_eq!(table.rows[0].insight, Insight::NegativeSentimentHighMomentum);
    }

    #[test]
    fn test_watchlist_and_counts() {
        let table = OverlayBuilder::default().build(
            &exposures(&[("A", 0.6), ("B", -0.6), ("C", 0.0), ("D", 0.0)]),
            &scores(&[("A", -0.5), ("B", 0.5), ("C", 0.0), ("D", 0.9)]),
        );
        let flagged: Vec<_> = table.watchlist().map(|r| r.ticker.as_str()).collect();
        assert_eq!(flagged, vec!["A", "B"]);

        let counts = table.insight_counts();
        assert_eq!(counts[&Insight::Normal], 2);
        assert_eq!(counts[&Insight::NegativeSentimentHighMomentum], 1);
        assert_eq!(counts[&Insight::PositiveSentimentLosingMomentum], 1);
    }

    #[test]
    fn test_row_serializes_flat() {
        let table = OverlayBuilder::default().build(&exposures(&[("A", 0.6)]), &scores(&[("A", 0.0)]));
        let json = serde_json::to_value(&table.rows[0]).unwrap();
        assert_eq!(json["ticker"], "A");
        assert_eq!(json["momentum"], 0.6);
        assert_eq!(json["insight"], "Normal");
    }
}
