use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::friches::catalog::{Catalog, IMPACTS_FILE, WEIGHTS_FILE};
use crate::friches::evaluation::{EvaluationConfig, MutabilityEngine};
use crate::friches::guard::InputGuard;
use crate::friches::repository::{
    AnalyticsError, AnalyticsSink, EvaluationEvent, EvaluationId, EvaluationRecord,
    EvaluationRepository, RepositoryError,
};
use crate::friches::service::{EvaluationRequest, MutabiliteService};
use crate::friches::{friches_router, CatalogSource};

pub(super) const EMBEDDED_WEIGHTS: &str = include_str!("../catalog/data/poids.csv");
pub(super) const EMBEDDED_IMPACTS: &str = include_str!("../catalog/data/impacts.csv");

pub(super) fn catalog() -> Catalog {
    Catalog::embedded().expect("embedded catalog is consistent")
}

pub(super) fn engine() -> MutabilityEngine {
    MutabilityEngine::new(catalog(), EvaluationConfig::default()).expect("default policy is valid")
}

pub(super) fn guard() -> InputGuard {
    InputGuard::default()
}

pub(super) fn fields(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

/// Serviced urban site: every usage but renewable energy and renaturation scores 100.
pub(super) fn urban_site_fields() -> BTreeMap<String, String> {
    fields(&[
        ("surfaceSite", "de-1-a-5ha"),
        ("siteEnCentreVille", "oui"),
        ("distanceTransportCommun", "moins-de-500m"),
        ("proximiteCommercesServices", "oui"),
        ("zonageReglementaire", "zone-urbaine"),
        ("etatBatiInfrastructure", "degradation-moyenne"),
        ("presencePollution", "deja-geree"),
        ("typeProprietaire", "public"),
        ("zoneHumide", "non"),
    ])
}

pub(super) fn urban_request() -> EvaluationRequest {
    EvaluationRequest {
        identifiant_parcelle: Some("25056000HZ0346".to_string()),
        criteres: urban_site_fields(),
        mesures: None,
        details: false,
    }
}

pub(super) fn build_service() -> (
    MutabiliteService<MemoryRepository, MemoryAnalytics>,
    Arc<MemoryRepository>,
    Arc<MemoryAnalytics>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let analytics = Arc::new(MemoryAnalytics::default());
    let service = MutabiliteService::new(repository.clone(), analytics.clone(), engine());
    (service, repository, analytics)
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<Vec<EvaluationRecord>>>,
}

impl EvaluationRepository for MemoryRepository {
    fn insert(&self, record: EvaluationRecord) -> Result<EvaluationRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.iter().any(|stored| stored.id == record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &EvaluationId) -> Result<Option<EvaluationRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.iter().find(|record| &record.id == id).cloned())
    }

    fn recent(&self, limit: usize) -> Result<Vec<EvaluationRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.iter().rev().take(limit).cloned().collect())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryAnalytics {
    events: Arc<Mutex<Vec<EvaluationEvent>>>,
}

impl MemoryAnalytics {
    pub(super) fn events(&self) -> Vec<EvaluationEvent> {
        self.events.lock().expect("analytics mutex poisoned").clone()
    }
}

impl AnalyticsSink for MemoryAnalytics {
    fn record(&self, event: EvaluationEvent) -> Result<(), AnalyticsError> {
        self.events
            .lock()
            .expect("analytics mutex poisoned")
            .push(event);
        Ok(())
    }
}

pub(super) struct OfflineAnalytics;

impl AnalyticsSink for OfflineAnalytics {
    fn record(&self, _event: EvaluationEvent) -> Result<(), AnalyticsError> {
        Err(AnalyticsError::Transport("collector offline".to_string()))
    }
}

pub(super) struct ConflictRepository;

impl EvaluationRepository for ConflictRepository {
    fn insert(&self, _record: EvaluationRecord) -> Result<EvaluationRecord, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn fetch(&self, _id: &EvaluationId) -> Result<Option<EvaluationRecord>, RepositoryError> {
        Ok(None)
    }

    fn recent(&self, _limit: usize) -> Result<Vec<EvaluationRecord>, RepositoryError> {
        Ok(Vec::new())
    }
}

pub(super) struct UnavailableRepository;

impl EvaluationRepository for UnavailableRepository {
    fn insert(&self, _record: EvaluationRecord) -> Result<EvaluationRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &EvaluationId) -> Result<Option<EvaluationRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn recent(&self, _limit: usize) -> Result<Vec<EvaluationRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// Fresh directory under the system temp dir holding the given catalog tables.
pub(super) fn catalog_dir(weights: &str, impacts: &str) -> PathBuf {
    static SEQUENCE: AtomicU64 = AtomicU64::new(0);
    let dir = std::env::temp_dir().join(format!(
        "mutafriches-catalog-{}-{}",
        std::process::id(),
        SEQUENCE.fetch_add(1, Ordering::Relaxed)
    ));
    std::fs::create_dir_all(&dir).expect("create catalog dir");
    std::fs::write(dir.join(WEIGHTS_FILE), weights).expect("write weights");
    std::fs::write(dir.join(IMPACTS_FILE), impacts).expect("write impacts");
    dir
}

/// Embedded weights with every weight of `critere` replaced by `weight`.
pub(super) fn weights_with(critere: &str, weight: &str) -> String {
    EMBEDDED_WEIGHTS
        .lines()
        .map(|line| {
            if line.split(',').next() == Some(critere) {
                let cells = vec![weight; 7].join(",");
                format!("{critere},{cells}")
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn router_with_service(
    service: MutabiliteService<MemoryRepository, MemoryAnalytics>,
) -> axum::Router {
    friches_router(Arc::new(service))
}

pub(super) fn directory_source(dir: PathBuf) -> CatalogSource {
    CatalogSource::Directory(dir)
}
