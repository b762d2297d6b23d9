//! Sensitivity Module - Tornado chart ordering.
//!
//! Pure functions over slider values; no I/O, no rendering.

mod chart;

pub use chart::{ChartEntry, ChartSeries, InputMismatchError, TornadoChartBuilder};
