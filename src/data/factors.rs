//! Factor exposure providers
//!
//! The overlay only needs one [`FactorVector`] per ticker; where it comes
//! from is up to the provider. The mock generator stands in for a real
//! factor model.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;

use super::sentiment::round_to;
use super::{DataError, DataResult, FactorVector, Ticker};

/// Decimal places kept on mock exposures
const MOCK_DECIMALS: i32 = 2;

/// Supplies factor exposures for a ticker universe
pub trait FactorProvider: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// One exposure vector per ticker the provider knows about
    fn exposures(&self, tickers: &[Ticker]) -> DataResult<BTreeMap<Ticker, FactorVector>>;
}

/// Uniform random exposures in [-1, 1], rounded to two decimals
#[derive(Debug, Clone, Default)]
pub struct MockFactorProvider {
    seed: Option<u64>,
}

impl MockFactorProvider {
    pub fn new(seed: Option<u64>) -> Self {
        Self { seed }
    }

    fn draw(rng: &mut StdRng) -> f64 {
        round_to(rng.gen_range(-1.0..=1.0), MOCK_DECIMALS)
    }
}

impl FactorProvider for MockFactorProvider {
    fn name(&self) -> &str {
        "mock"
    }

    fn exposures(&self, tickers: &[Ticker]) -> DataResult<BTreeMap<Ticker, FactorVector>> {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let exposures = tickers
            .iter()
            .map(|ticker| {
                let vector = FactorVector {
                    size: Self::draw(&mut rng),
                    value: Self::draw(&mut rng),
                    momentum: Self::draw(&mut rng),
                    quality: Self::draw(&mut rng),
                    volatility: Self::draw(&mut rng),
                };
                (ticker.clone(), vector)
            })
            .collect();

        Ok(exposures)
    }
}

/// Fixed exposures held in memory. Tickers outside the table are absent
/// from the result.
#[derive(Debug, Clone, Default)]
pub struct StaticFactorProvider {
    table: BTreeMap<Ticker, FactorVector>,
}

impl StaticFactorProvider {
    pub fn new(table: BTreeMap<Ticker, FactorVector>) -> Self {
        Self { table }
    }
}

impl FactorProvider for StaticFactorProvider {
    fn name(&self) -> &str {
        "static"
    }

    fn exposures(&self, tickers: &[Ticker]) -> DataResult<BTreeMap<Ticker, FactorVector>> {
        Ok(tickers
            .iter()
            .filter_map(|t| self.table.get(t).map(|v| (t.clone(), *v)))
            .collect())
    }
}

#[derive(Debug, Deserialize)]
struct FactorRecord {
    #[serde(rename = "Ticker")]
    ticker: String,
    #[serde(rename = "Size")]
    size: f64,
    #[serde(rename = "Value")]
    value: f64,
    #[serde(rename = "Momentum")]
    momentum: f64,
    #[serde(rename = "Quality")]
    quality: f64,
    #[serde(rename = "Volatility")]
    volatility: f64,
}

/// Exposures loaded from a CSV export with columns
/// `Ticker,Size,Value,Momentum,Quality,Volatility`
#[derive(Debug, Clone)]
pub struct CsvFactorProvider {
    path: PathBuf,
}

impl CsvFactorProvider {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl FactorProvider for CsvFactorProvider {
    fn name(&self) -> &str {
        "csv"
    }

    fn exposures(&self, tickers: &[Ticker]) -> DataResult<BTreeMap<Ticker, FactorVector>> {
        let wanted: HashSet<&str> = tickers.iter().map(String::as_str).collect();
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(&self.path)?;

        let mut exposures = BTreeMap::new();
        for record in reader.deserialize::<FactorRecord>() {
            let record = record?;
            let ticker = record.ticker.to_ascii_uppercase();
            if !wanted.contains(ticker.as_str()) {
                continue;
            }

            let vector = FactorVector {
                size: record.size,
                value: record.value,
                momentum: record.momentum,
                quality: record.quality,
                volatility: record.volatility,
            };
            if exposures.insert(ticker.clone(), vector).is_some() {
                return Err(DataError::validation_error(
                    "Ticker".to_string(),
                    format!("duplicate exposure row for {} in {}", ticker, self.path.display()),
                ));
            }
        }

        let missing = tickers.len() - exposures.len();
        if missing > 0 {
            tracing::warn!(
                path = %self.path.display(),
                missing,
                "Factor file does not cover the whole universe"
            );
        }

        Ok(exposures)
    }
}
