use metrics_exporter_prometheus::PrometheusHandle;
use mutafriches::config::EngineConfig;
use mutafriches::error::AppError;
use mutafriches::friches::{
    AnalyticsError, AnalyticsSink, EvaluationEvent, EvaluationId, EvaluationRecord,
    EvaluationRepository, EvaluationRequest, MutabiliteService, MutabilityEngine,
    RepositoryError,
};
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) type AppService = MutabiliteService<InMemoryEvaluationRepository, LoggingAnalytics>;

/// Insertion-ordered store; evaluations live for the lifetime of the process.
#[derive(Default, Clone)]
pub(crate) struct InMemoryEvaluationRepository {
    records: Arc<Mutex<Vec<EvaluationRecord>>>,
}

impl EvaluationRepository for InMemoryEvaluationRepository {
    fn insert(&self, record: EvaluationRecord) -> Result<EvaluationRecord, RepositoryError> {
        let mut guard = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))?;
        if guard.iter().any(|stored| stored.id == record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &EvaluationId) -> Result<Option<EvaluationRecord>, RepositoryError> {
        let guard = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))?;
        Ok(guard.iter().find(|record| &record.id == id).cloned())
    }

    fn recent(&self, limit: usize) -> Result<Vec<EvaluationRecord>, RepositoryError> {
        let guard = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))?;
        Ok(guard.iter().rev().take(limit).cloned().collect())
    }
}

/// Analytics sink that logs each event and keeps it in memory.
#[derive(Default, Clone)]
pub(crate) struct LoggingAnalytics {
    events: Arc<Mutex<Vec<EvaluationEvent>>>,
}

impl AnalyticsSink for LoggingAnalytics {
    fn record(&self, event: EvaluationEvent) -> Result<(), AnalyticsError> {
        info!(
            evaluation_id = %event.evaluation_id,
            meilleur_usage = event.meilleur_usage.code(),
            fiabilite = event.fiabilite,
            "evaluation recorded"
        );
        self.events
            .lock()
            .map_err(|_| AnalyticsError::Transport("analytics mutex poisoned".to_string()))?
            .push(event);
        Ok(())
    }
}

impl LoggingAnalytics {
    #[cfg(test)]
    pub(crate) fn events(&self) -> Vec<EvaluationEvent> {
        self.events.lock().expect("analytics mutex poisoned").clone()
    }
}

/// Service over in-memory adapters, wired from the engine settings.
pub(crate) fn build_service(engine_config: &EngineConfig) -> Result<AppService, AppError> {
    let source = engine_config.catalog_source();
    let catalog = source.load()?;
    let engine = MutabilityEngine::new(catalog, engine_config.evaluation_config())?;

    Ok(MutabiliteService::new(
        Arc::new(InMemoryEvaluationRepository::default()),
        Arc::new(LoggingAnalytics::default()),
        engine,
    )
    .with_catalog_source(source)
    .with_strict_input(engine_config.strict_input))
}

pub(crate) fn read_request(path: &Path) -> Result<EvaluationRequest, AppError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}
