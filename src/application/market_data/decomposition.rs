//! Trend / noise / volatility decomposition of a daily close series.
//!
//! - Trend: rolling mean of the close over `window` bars
//! - Noise: close minus trend
//! - Volatility: rolling sample std-dev of daily percent returns over `window`
//!   returns, expressed in percent
//!
//! Rows where any of the three is undefined (not enough trailing history, or a
//! non-finite input inside the window) are dropped.

use crate::domain::errors::DecompositionError;
use crate::domain::market::{DecompositionPoint, DecompositionSeries, PriceBar};
use crate::domain::ml::prediction::round_to;
use crate::domain::ports::PriceStore;
use statrs::statistics::{Data, Distribution};
use std::sync::Arc;
use tracing::{debug, error};

pub const DEFAULT_LOOKBACK: usize = 726;
pub const DEFAULT_WINDOW: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecompositionSettings {
    /// Number of most recent bars fetched per request (~2 years of trading days)
    pub lookback: usize,
    pub window: usize,
}

impl Default for DecompositionSettings {
    fn default() -> Self {
        Self {
            lookback: DEFAULT_LOOKBACK,
            window: DEFAULT_WINDOW,
        }
    }
}

/// Computes the decomposition for bars ordered by date ascending.
pub fn decompose_bars(
    bars: &[PriceBar],
    window: usize,
) -> Result<Vec<DecompositionPoint>, DecompositionError> {
    if window < 2 {
        return Err(DecompositionError::Computation(format!(
            "window must be at least 2, got {}",
            window
        )));
    }

    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let returns: Vec<Option<f64>> = (0..closes.len())
        .map(|i| {
            if i == 0 {
                return None;
            }
            let r = closes[i] / closes[i - 1] - 1.0;
            r.is_finite().then_some(r)
        })
        .collect();

    let mut points = Vec::with_capacity(bars.len().saturating_sub(window));
    // The first return is at index 1, so a full return window ends at `window` at the earliest
    for i in window..bars.len() {
        let Some(trend) = rolling_mean(&closes[i + 1 - window..=i]) else {
            continue;
        };
        let Some(volatility) = rolling_std(&returns[i + 1 - window..=i]) else {
            continue;
        };

        let close = closes[i];
        let noise = close - trend;
        points.push(DecompositionPoint {
            date: bars[i].date,
            close: round_to(close, 2),
            trend: round_to(trend, 2),
            noise: round_to(noise, 2),
            volatility: round_to(volatility * 100.0, 2),
        });
    }

    if points.is_empty() {
        return Err(DecompositionError::Computation(format!(
            "not enough usable history: {} bars, need more than {}",
            bars.len(),
            window
        )));
    }

    Ok(points)
}

fn rolling_mean(window: &[f64]) -> Option<f64> {
    if window.iter().any(|v| !v.is_finite()) {
        return None;
    }
    Data::new(window.to_vec()).mean().filter(|m| m.is_finite())
}

fn rolling_std(window: &[Option<f64>]) -> Option<f64> {
    let values: Vec<f64> = window.iter().copied().collect::<Option<Vec<f64>>>()?;
    Data::new(values).std_dev().filter(|s| s.is_finite())
}

/// Fetches history from the injected price store and decomposes it.
#[derive(Clone)]
pub struct DecompositionService {
    store: Arc<dyn PriceStore>,
    settings: DecompositionSettings,
}

impl DecompositionService {
    pub fn new(store: Arc<dyn PriceStore>, settings: DecompositionSettings) -> Self {
        Self { store, settings }
    }

    pub fn settings(&self) -> DecompositionSettings {
        self.settings
    }

    pub async fn decompose(&self, symbol: &str) -> Result<DecompositionSeries, DecompositionError> {
        let bars = self
            .store
            .fetch_recent(symbol, self.settings.lookback)
            .await
            .map_err(|e| {
                error!("Price store fetch failed for {}: {:#}", symbol, e);
                DecompositionError::Store(e.to_string())
            })?;

        if bars.is_empty() {
            return Err(DecompositionError::NotFound {
                symbol: symbol.to_string(),
            });
        }

        let data = decompose_bars(&bars, self.settings.window)?;
        debug!(
            "Decomposed {}: {} bars -> {} points",
            symbol,
            bars.len(),
            data.len()
        );

        Ok(DecompositionSeries {
            symbol: symbol.to_string(),
            data,
        })
    }
}
