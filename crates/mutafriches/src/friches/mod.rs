//! Brownfield ("friche") mutability scoring.
//!
//! A site is described by one categorical value per criterion. The engine turns those
//! values into weighted favorable/unfavorable sums for each of the seven candidate usages,
//! derives a 0–100 mutability index per usage, ranks the usages and grades how reliable the
//! result is given how many criteria were known.

pub mod catalog;
pub mod criteria;
pub mod domain;
pub mod evaluation;
pub(crate) mod guard;
pub mod measurements;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use catalog::{
    parse_usage, Catalog, CatalogError, CatalogSource, CriterionView, SharedCatalog,
    UnknownUsageType, ValueImpact,
};
pub use criteria::{CriterionKey, SiteInput, UNKNOWN_CODE};
pub use domain::{
    Contribution, Fiabilite, ImpactLevel, Mutabilite, Usage, UsageDetail, UsageResultat,
    VERSION_ALGORITHME,
};
pub use evaluation::{
    EvaluationConfig, FiabiliteTier, MutabiliteError, MutabilityEngine, PolicyError,
    PotentielBand, ReliabilityError, UsageScore,
};
pub use guard::InputGuard;
pub use measurements::SiteMeasurements;
pub use repository::{
    AnalyticsError, AnalyticsSink, EvaluationEvent, EvaluationId, EvaluationRecord,
    EvaluationRepository, EvaluationSummary, RepositoryError,
};
pub use router::friches_router;
pub use service::{EvaluationRequest, MutabiliteService, MutabiliteServiceError};
