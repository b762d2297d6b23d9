//! Tornado Chart Builder - Deviation-from-mean ordering of variable values.

use serde::Serialize;
use thiserror::Error;

/// Names and values were not aligned one-to-one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Input mismatch: {names} names but {values} values")]
pub struct InputMismatchError {
    pub names: usize,
    pub values: usize,
}

/// One bar of the tornado chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartEntry {
    pub name: String,
    pub value: f64,
    /// Absolute distance from the mean of all values.
    pub deviation: f64,
}

/// Chart-ready bars, ordered by ascending deviation.
///
/// A renderer that inverts its category axis shows the largest deviation at
/// the top. Renderers drawing top-down use [`ChartSeries::display_order`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub entries: Vec<ChartEntry>,
    /// Mean of all values (0 for an empty series).
    pub mean: f64,
}

impl ChartSeries {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// (name, value) pairs in build order.
    pub fn pairs(&self) -> Vec<(&str, f64)> {
        self.entries
            .iter()
            .map(|e| (e.name.as_str(), e.value))
            .collect()
    }

    /// Entries with the largest deviation first.
    pub fn display_order(&self) -> impl Iterator<Item = &ChartEntry> {
        self.entries.iter().rev()
    }
}

/// Builds tornado chart series.
pub struct TornadoChartBuilder;

impl TornadoChartBuilder {
    /// Orders `(names[i], values[i])` pairs by `|values[i] - mean|` ascending.
    ///
    /// # Edge Cases
    /// - Length mismatch: `InputMismatchError`, never truncated or padded
    /// - Empty input: empty series
    /// - Equal deviations: input order is preserved (stable sort)
    pub fn build<S: AsRef<str>>(
        names: &[S],
        values: &[f64],
    ) -> Result<ChartSeries, InputMismatchError> {
        if names.len() != values.len() {
            return Err(InputMismatchError {
                names: names.len(),
                values: values.len(),
            });
        }

        if values.is_empty() {
            return Ok(ChartSeries {
                entries: Vec::new(),
                mean: 0.0,
            });
        }

        let mean = mean_of(values);

        let mut entries: Vec<ChartEntry> = names
            .iter()
            .zip(values)
            .map(|(name, &value)| ChartEntry {
                name: name.as_ref().to_string(),
                value,
                deviation: (value - mean).abs(),
            })
            .collect();

        entries.sort_by(|a, b| a.deviation.total_cmp(&b.deviation));

        Ok(ChartSeries { entries, mean })
    }
}

/// Arithmetic mean that stays finite for finite inputs near `f64::MAX`.
fn mean_of(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let sum = values.iter().sum::<f64>();
    if sum.is_finite() {
        sum / n
    } else {
        values.iter().map(|v| v / n).sum()
    }
}
