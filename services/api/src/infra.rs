use guia_saude::config::CatalogConfig;
use guia_saude::workflows::triage::{HttpCatalogSource, PolicyCatalogSource};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Live upstream catalog guarded by the configured failure policy.
pub(crate) type LiveCatalog = PolicyCatalogSource<HttpCatalogSource>;

pub(crate) fn build_catalog_source(config: &CatalogConfig) -> LiveCatalog {
    let http = HttpCatalogSource::new(config.base_url.clone());
    PolicyCatalogSource::new(http, config.failure_policy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use guia_saude::workflows::triage::FailurePolicy;

    #[test]
    fn source_carries_configured_policy_and_url() {
        let config = CatalogConfig {
            base_url: "http://catalog.local/api/".parse().expect("url"),
            failure_policy: FailurePolicy::FailClosed,
            degraded_retry: std::time::Duration::from_secs(30),
        };

        let source = build_catalog_source(&config);

        assert_eq!(source.policy(), FailurePolicy::FailClosed);
        assert_eq!(source.primary().base_url().as_str(), "http://catalog.local/api/");
    }
}
