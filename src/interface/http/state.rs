use std::sync::Arc;

use crate::application::context::AppContext;
use crate::config::Settings;
use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub struct AppState {
    pub ctx: Arc<AppContext>,
    pub settings: Settings,
    /// Present when the Prometheus recorder is installed.
    pub metrics: Option<PrometheusHandle>,
}
