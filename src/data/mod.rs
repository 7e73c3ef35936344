//! Data collaborators for the overlay: headline feeds, headline sentiment
//! and factor exposures. Fetch failures are absorbed here and never reach
//! the overlay builder.

pub mod errors;
pub mod factors;
pub mod news;
pub mod retry;
pub mod sentiment;

// Re-export commonly used types
pub use errors::{DataError, DataResult};
pub use factors::{CsvFactorProvider, FactorProvider, MockFactorProvider, StaticFactorProvider};
pub use news::{HeadlineSource, RssHeadlineSource, StaticHeadlineSource};
pub use sentiment::{PolarityScorer, VaderScorer};

use serde::{Deserialize, Serialize};

/// Equity symbol; the join key for every per-ticker collection
pub type Ticker = String;

/// Plain headline text, no structure enforced
pub type Headline = String;

/// Factor exposures for one ticker, conventionally in [-1, 1] but not clamped
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactorVector {
    pub size: f64,
    pub value: f64,
    pub momentum: f64,
    pub quality: f64,
    pub volatility: f64,
}

/// Validation helpers
pub mod validation {
    use super::*;

    /// Validate a stock symbol. Letters and digits plus `-` and `.` for
    /// share classes such as BRK-B.
    pub fn validate_symbol(symbol: &str) -> DataResult<()> {
        if symbol.is_empty() {
            return Err(DataError::validation_error("symbol", "Symbol cannot be empty"));
        }

        if symbol.len() > 10 {
            return Err(DataError::InvalidSymbol(format!("{} (max 10 chars)", symbol)));
        }

        if !symbol.chars().next().is_some_and(|c| c.is_ascii_alphabetic()) {
            return Err(DataError::InvalidSymbol(format!("{} (must start with a letter)", symbol)));
        }

        if !symbol
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.')
        {
            return Err(DataError::InvalidSymbol(symbol.to_string()));
        }

        Ok(())
    }

    /// Trim, upper-case and de-duplicate a ticker universe, keeping first
    /// occurrence order. Fails on the first invalid symbol.
    pub fn normalize_universe<I, S>(symbols: I) -> DataResult<Vec<Ticker>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut universe: Vec<Ticker> = Vec::new();
        for raw in symbols {
            let symbol = raw.as_ref().trim().to_ascii_uppercase();
            if symbol.is_empty() {
                continue;
            }
            validate_symbol(&symbol)?;
            if !universe.contains(&symbol) {
                universe.push(symbol);
            }
        }
        Ok(universe)
    }
}
