mod config;
mod impact;
mod policy;
mod ranking;
mod reliability;
mod rules;

pub use config::{EvaluationConfig, FiabiliteTier, PotentielBand};
pub use impact::{resolve, Resolution};
pub use policy::PolicyError;
pub use reliability::ReliabilityError;
pub use rules::{mutability_index, UsageScore, NEUTRAL_INDEX};

use chrono::{DateTime, Utc};
use tracing::info;

use super::catalog::{
    parse_usage, Catalog, CatalogError, CriterionView, SharedCatalog, UnknownUsageType,
};
use super::criteria::{CriterionKey, SiteInput};
use super::domain::{Fiabilite, Mutabilite, Usage, UsageResultat, VERSION_ALGORITHME};

/// Failures of a single evaluation. Input errors name the offending field.
#[derive(Debug, thiserror::Error)]
pub enum MutabiliteError {
    #[error("invalid value '{value}' for criterion '{key}'")]
    InvalidInputValue { key: String, value: String },
    #[error("unknown criterion '{key}'")]
    UnknownCriterion { key: String },
    #[error("missing value for criterion '{key}'")]
    MissingInputField { key: String },
    #[error("invalid measurement {field} = {value}: expected a finite, non-negative number")]
    InvalidMeasurement { field: &'static str, value: f64 },
    #[error("value '{value}' of '{}' has no impact for usage '{}'", .key.key(), .usage.code())]
    UnmappedValue {
        key: CriterionKey,
        usage: Usage,
        value: String,
    },
    #[error(transparent)]
    UnknownUsageType(#[from] UnknownUsageType),
    #[error(transparent)]
    Reliability(#[from] ReliabilityError),
    #[error(transparent)]
    Policy(#[from] PolicyError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl MutabiliteError {
    /// Whether the caller supplied bad data, as opposed to a configuration fault.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            MutabiliteError::InvalidInputValue { .. }
                | MutabiliteError::UnknownCriterion { .. }
                | MutabiliteError::MissingInputField { .. }
                | MutabiliteError::InvalidMeasurement { .. }
                | MutabiliteError::UnknownUsageType(_)
        )
    }

    /// Input field the error refers to, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            MutabiliteError::InvalidInputValue { key, .. }
            | MutabiliteError::UnknownCriterion { key }
            | MutabiliteError::MissingInputField { key } => Some(key.as_str()),
            MutabiliteError::InvalidMeasurement { field, .. } => Some(*field),
            MutabiliteError::UnmappedValue { key, .. } => Some(key.key()),
            _ => None,
        }
    }
}

/// Stateless façade scoring a site against the shared catalog.
///
/// Each call takes one catalog snapshot and uses it throughout, so a concurrent catalog swap
/// affects only later evaluations.
#[derive(Debug, Clone)]
pub struct MutabilityEngine {
    catalog: SharedCatalog,
    config: EvaluationConfig,
}

impl MutabilityEngine {
    pub fn new(
        catalog: impl Into<SharedCatalog>,
        config: EvaluationConfig,
    ) -> Result<Self, PolicyError> {
        policy::validate(&config)?;
        Ok(Self {
            catalog: catalog.into(),
            config,
        })
    }

    /// Engine over the embedded tables and default policy.
    pub fn standard() -> Result<Self, MutabiliteError> {
        let catalog = Catalog::embedded()?;
        Ok(Self::new(catalog, EvaluationConfig::default())?)
    }

    pub fn catalog(&self) -> &SharedCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &EvaluationConfig {
        &self.config
    }

    /// Evaluate a site, stamping the current time.
    pub fn evaluer(&self, input: &SiteInput) -> Result<Mutabilite, MutabiliteError> {
        self.evaluer_a(input, Utc::now(), false)
    }

    /// Evaluate a site and attach the per-usage contribution breakdown.
    pub fn evaluer_detaille(&self, input: &SiteInput) -> Result<Mutabilite, MutabiliteError> {
        self.evaluer_a(input, Utc::now(), true)
    }

    pub fn evaluer_a(
        &self,
        input: &SiteInput,
        date_calcul: DateTime<Utc>,
        details: bool,
    ) -> Result<Mutabilite, MutabiliteError> {
        let catalog = self.catalog.snapshot();
        validate_input(&catalog, input)?;

        let fiabilite =
            reliability::compute_fiabilite(&catalog, input, &self.config.fiabilite_tiers)?;
        let scores = ranking::ranked_scores(&catalog, input)?;
        let resultats = ranking::build_resultats(&scores, &self.config)?;
        let details = details.then(|| scores.iter().map(UsageScore::detail).collect());

        if let Some(best) = resultats.first() {
            info!(
                best_usage = best.usage.code(),
                best_index = best.indice_mutabilite,
                note = fiabilite.note,
                "mutability evaluated"
            );
        }

        Ok(Mutabilite {
            fiabilite,
            resultats,
            date_calcul,
            version_algorithme: VERSION_ALGORITHME.to_string(),
            details,
        })
    }

    /// Criteria with their weight and impacts for one usage.
    pub fn criteria(&self, usage: Usage) -> Vec<CriterionView> {
        self.catalog.snapshot().criteria(usage)
    }

    pub fn criteria_for_code(&self, usage: &str) -> Result<Vec<CriterionView>, MutabiliteError> {
        let usage = parse_usage(usage)?;
        Ok(self.criteria(usage))
    }

    pub fn score(&self, usage: Usage, input: &SiteInput) -> Result<UsageScore, MutabiliteError> {
        rules::score_usage(&self.catalog.snapshot(), usage, input)
    }

    pub fn fiabilite(&self, input: &SiteInput) -> Result<Fiabilite, MutabiliteError> {
        let catalog = self.catalog.snapshot();
        Ok(reliability::compute_fiabilite(
            &catalog,
            input,
            &self.config.fiabilite_tiers,
        )?)
    }

    pub fn classement(&self, input: &SiteInput) -> Result<Vec<UsageResultat>, MutabiliteError> {
        let catalog = self.catalog.snapshot();
        let scores = ranking::ranked_scores(&catalog, input)?;
        ranking::build_resultats(&scores, &self.config)
    }
}

/// Every value must be legal for its criterion and mapped in this catalog snapshot.
fn validate_input(catalog: &Catalog, input: &SiteInput) -> Result<(), MutabiliteError> {
    for key in catalog.keys() {
        if !input.is_known(key) {
            continue;
        }
        let code = input.code(key);
        if catalog.impact(key, Usage::Residentiel, code).is_none() {
            return Err(MutabiliteError::InvalidInputValue {
                key: key.key().to_string(),
                value: code.to_string(),
            });
        }
    }
    Ok(())
}
