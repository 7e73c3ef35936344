// Sentiment Overlay - Daily Sentiment-Risk Overlay
// Joins factor exposures with headline sentiment for an equity universe and
// flags tickers whose sentiment and momentum diverge.

#![deny(clippy::unwrap_used)]

pub mod config;
pub mod data;
pub mod orchestrator;
pub mod overlay;
pub mod report;

// Re-export commonly used items
pub use config::Config;
pub use data::{FactorVector, Headline, Ticker};
pub use orchestrator::{DailyOrchestrator, DailyRun};
pub use overlay::{classify, Insight, OverlayBuilder, OverlayRow, OverlayTable, Thresholds};
pub use report::{ReportArtifacts, ReportSink};
