use serde::{Deserialize, Serialize};

use super::domain::{Mutabilite, Usage};

/// Identifier wrapper for stored evaluations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EvaluationId(pub String);

impl std::fmt::Display for EvaluationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Persisted evaluation: identifiers plus the engine output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationRecord {
    pub id: EvaluationId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifiant_parcelle: Option<String>,
    pub mutabilite: Mutabilite,
}

impl EvaluationRecord {
    pub fn summary(&self) -> EvaluationSummary {
        let best = self.mutabilite.meilleur_usage();
        EvaluationSummary {
            id: self.id.clone(),
            identifiant_parcelle: self.identifiant_parcelle.clone(),
            meilleur_usage: best.map(|resultat| resultat.usage),
            indice_mutabilite: best.map(|resultat| resultat.indice_mutabilite),
            fiabilite: self.mutabilite.fiabilite.note,
        }
    }
}

/// Compact listing row for recent evaluations.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationSummary {
    pub id: EvaluationId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifiant_parcelle: Option<String>,
    pub meilleur_usage: Option<Usage>,
    pub indice_mutabilite: Option<u8>,
    pub fiabilite: f64,
}

/// Storage abstraction so the service can be exercised in isolation.
pub trait EvaluationRepository: Send + Sync {
    fn insert(&self, record: EvaluationRecord) -> Result<EvaluationRecord, RepositoryError>;
    fn fetch(&self, id: &EvaluationId) -> Result<Option<EvaluationRecord>, RepositoryError>;
    /// Most recent first.
    fn recent(&self, limit: usize) -> Result<Vec<EvaluationRecord>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Outbound hook notified after each stored evaluation.
pub trait AnalyticsSink: Send + Sync {
    fn record(&self, event: EvaluationEvent) -> Result<(), AnalyticsError>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationEvent {
    pub evaluation_id: EvaluationId,
    pub meilleur_usage: Usage,
    pub fiabilite: f64,
}

#[derive(Debug, thiserror::Error)]
pub enum AnalyticsError {
    #[error("analytics transport unavailable: {0}")]
    Transport(String),
}
