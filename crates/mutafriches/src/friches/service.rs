use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::catalog::{CatalogError, CatalogSource, CriterionView};
use super::evaluation::{MutabiliteError, MutabilityEngine};
use super::guard::InputGuard;
use super::measurements::SiteMeasurements;
use super::repository::{
    AnalyticsSink, EvaluationEvent, EvaluationId, EvaluationRecord, EvaluationRepository,
    EvaluationSummary, RepositoryError,
};

/// Inbound evaluation payload as sent by HTTP and CLI callers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EvaluationRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifiant_parcelle: Option<String>,
    #[serde(default)]
    pub criteres: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mesures: Option<SiteMeasurements>,
    #[serde(default)]
    pub details: bool,
}

/// Service composing the input guard, engine, repository and analytics hook.
pub struct MutabiliteService<R, A> {
    guard: Arc<InputGuard>,
    engine: Arc<MutabilityEngine>,
    repository: Arc<R>,
    analytics: Arc<A>,
    catalog_source: CatalogSource,
}

static EVALUATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_evaluation_id() -> EvaluationId {
    let id = EVALUATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    EvaluationId(format!("eval-{id:06}"))
}

impl<R, A> MutabiliteService<R, A>
where
    R: EvaluationRepository + 'static,
    A: AnalyticsSink + 'static,
{
    pub fn new(repository: Arc<R>, analytics: Arc<A>, engine: MutabilityEngine) -> Self {
        Self {
            guard: Arc::new(InputGuard::default()),
            engine: Arc::new(engine),
            repository,
            analytics,
            catalog_source: CatalogSource::Embedded,
        }
    }

    /// Source used by [`MutabiliteService::reload`].
    pub fn with_catalog_source(mut self, source: CatalogSource) -> Self {
        self.catalog_source = source;
        self
    }

    /// Reject requests that omit a catalog criterion instead of treating it as unknown.
    pub fn with_strict_input(mut self, strict: bool) -> Self {
        self.guard = Arc::new(InputGuard::new(strict));
        self
    }

    pub fn is_strict(&self) -> bool {
        self.guard.is_strict()
    }

    pub fn catalog_source(&self) -> &CatalogSource {
        &self.catalog_source
    }

    pub fn engine(&self) -> &MutabilityEngine {
        &self.engine
    }

    /// Validate, score and persist one request.
    pub fn evaluate(
        &self,
        request: EvaluationRequest,
    ) -> Result<EvaluationRecord, MutabiliteServiceError> {
        let mut input = self.guard.site_from_fields(&request.criteres)?;
        if let Some(mesures) = &request.mesures {
            mesures.apply_to(&mut input)?;
        }

        let mutabilite = if request.details {
            self.engine.evaluer_detaille(&input)?
        } else {
            self.engine.evaluer(&input)?
        };

        let record = EvaluationRecord {
            id: next_evaluation_id(),
            identifiant_parcelle: request.identifiant_parcelle,
            mutabilite,
        };
        let stored = self.repository.insert(record)?;

        // The record is committed; analytics never turns it into a failure.
        if let Some(best) = stored.mutabilite.meilleur_usage() {
            let event = EvaluationEvent {
                evaluation_id: stored.id.clone(),
                meilleur_usage: best.usage,
                fiabilite: stored.mutabilite.fiabilite.note,
            };
            if let Err(error) = self.analytics.record(event) {
                warn!(evaluation_id = %stored.id, %error, "analytics event dropped");
            }
        }

        info!(evaluation_id = %stored.id, "evaluation stored");
        Ok(stored)
    }

    pub fn get(&self, id: &EvaluationId) -> Result<EvaluationRecord, MutabiliteServiceError> {
        let record = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    pub fn recent(&self, limit: usize) -> Result<Vec<EvaluationSummary>, MutabiliteServiceError> {
        let records = self.repository.recent(limit)?;
        Ok(records.iter().map(EvaluationRecord::summary).collect())
    }

    pub fn criteria(&self, usage: &str) -> Result<Vec<CriterionView>, MutabiliteServiceError> {
        Ok(self.engine.criteria_for_code(usage)?)
    }

    /// Reload the tables from `source` and swap them in. Returns the criteria count.
    ///
    /// A failed load leaves the current catalog in place.
    pub fn reload_catalog(&self, source: &CatalogSource) -> Result<usize, MutabiliteServiceError> {
        let catalog = source.load().inspect_err(|error| {
            warn!(%error, "catalog reload rejected, keeping current tables");
        })?;
        let criteria = catalog.len();
        self.engine.catalog().replace(catalog);
        Ok(criteria)
    }

    /// Reload from the configured source.
    pub fn reload(&self) -> Result<usize, MutabiliteServiceError> {
        self.reload_catalog(&self.catalog_source)
    }
}

/// Error raised by the evaluation service.
#[derive(Debug, thiserror::Error)]
pub enum MutabiliteServiceError {
    #[error(transparent)]
    Evaluation(#[from] MutabiliteError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl MutabiliteServiceError {
    pub fn is_input_error(&self) -> bool {
        matches!(self, MutabiliteServiceError::Evaluation(error) if error.is_input_error())
    }
}
