//! BuildChartHandler - tornado chart for a session's slider values.

use std::sync::Arc;

use tracing::debug;

use crate::application::AnalysisError;
use crate::domain::foundation::SessionId;
use crate::domain::sensitivity::{ChartSeries, TornadoChartBuilder};
use crate::ports::SessionStore;

/// Query for a session's chart.
#[derive(Debug, Clone)]
pub struct BuildChartQuery {
    pub session_id: SessionId,
    /// Slider values aligned with the session's variables; defaults when `None`.
    pub values: Option<Vec<f64>>,
}

/// Handler that charts clamped slider values against variable names.
pub struct BuildChartHandler {
    store: Arc<dyn SessionStore>,
}

impl BuildChartHandler {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, query: BuildChartQuery) -> Result<ChartSeries, AnalysisError> {
        let session = self.store.load(&query.session_id).await?;

        let values = session.resolve_values(query.values.as_deref())?;
        let series = TornadoChartBuilder::build(&session.variable_names(), &values)?;

        debug!(
            session_id = %query.session_id,
            bars = series.len(),
            mean = series.mean,
            "Built tornado chart"
        );
        Ok(series)
    }
}
