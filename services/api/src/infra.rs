use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use wikicred::config::WikiConfig;
use wikicred::error::AppError;
use wikicred::{AnalysisError, MediaWikiClient, ReliabilityService};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) type LiveService = ReliabilityService<MediaWikiClient>;

/// Analysis service backed by the live MediaWiki API.
pub(crate) fn build_service(config: &WikiConfig) -> Result<Arc<LiveService>, AppError> {
    let client = MediaWikiClient::new(config.clone()).map_err(AnalysisError::from)?;
    Ok(Arc::new(ReliabilityService::from_config(
        Arc::new(client),
        config,
    )))
}
