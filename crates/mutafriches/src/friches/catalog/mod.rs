//! Criterion catalog: weights and qualitative impacts per usage.
//!
//! The values come from two declarative tables (`poids.csv`, `impacts.csv`) so domain experts
//! can tune them without touching code. A catalog only exists once it has passed the
//! completeness self-check run at load time; evaluations therefore never observe a
//! criterion lacking a weight or an impact for one of the seven usages.

mod table;

use std::collections::BTreeMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use serde::Serialize;
use tracing::info;

use super::criteria::{CriterionKey, UNKNOWN_CODE};
use super::domain::{ImpactLevel, Usage};
use table::{ImpactRecord, WeightRecord};

pub const WEIGHTS_FILE: &str = "poids.csv";
pub const IMPACTS_FILE: &str = "impacts.csv";

/// Configuration errors raised while loading the catalog tables.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("unable to read catalog table: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid catalog table: {0}")]
    Csv(#[from] csv::Error),
    #[error("catalog references unknown criterion '{critere}'")]
    UnknownCriterion { critere: String },
    #[error("catalog references value '{valeur}' outside the domain of '{critere}'")]
    UnknownValue { critere: String, valeur: String },
    #[error("catalog assigns an impact to the unknown value of '{critere}'")]
    SentinelRow { critere: String },
    #[error("criterion '{critere}' has more than one weight row")]
    DuplicateWeights { critere: String },
    #[error("value '{valeur}' of '{critere}' has more than one impact row")]
    DuplicateImpact { critere: String, valeur: String },
    #[error("weight {value} of '{critere}' for usage '{}' must be positive and finite", .usage.code())]
    InvalidWeight {
        critere: String,
        usage: Usage,
        value: f64,
    },
    #[error("impact token '{token}' for '{critere}' = '{valeur}' and usage '{}' is not one of --, -, 0, +, ++", .usage.code())]
    InvalidImpactToken {
        critere: String,
        valeur: String,
        usage: Usage,
        token: String,
    },
    #[error("criterion '{critere}' has no weight row")]
    MissingWeights { critere: String },
    #[error("value '{valeur}' of '{critere}' has no impact row")]
    MissingImpact { critere: String, valeur: String },
}

/// Raised when a usage code is not one of the seven supported use-types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown usage type '{0}'")]
pub struct UnknownUsageType(pub String);

pub fn parse_usage(code: &str) -> Result<Usage, UnknownUsageType> {
    Usage::from_code(code).ok_or_else(|| UnknownUsageType(code.to_string()))
}

/// Where a catalog is loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    Embedded,
    Directory(PathBuf),
}

impl CatalogSource {
    pub fn from_dir(dir: Option<PathBuf>) -> Self {
        match dir {
            Some(path) => Self::Directory(path),
            None => Self::Embedded,
        }
    }

    pub fn load(&self) -> Result<Catalog, CatalogError> {
        let catalog = match self {
            CatalogSource::Embedded => Catalog::embedded()?,
            CatalogSource::Directory(dir) => Catalog::from_dir(dir)?,
        };
        info!(source = ?self, criteria = catalog.len(), "criterion catalog loaded");
        Ok(catalog)
    }
}

#[derive(Debug, Clone)]
struct CriterionRecord {
    key: CriterionKey,
    weights: [f64; 7],
    /// Known values in domain declaration order.
    impacts: Vec<(&'static str, [ImpactLevel; 7])>,
}

/// Immutable table of every scored criterion, indexed by criterion then usage.
#[derive(Debug, Clone)]
pub struct Catalog {
    criteria: Vec<CriterionRecord>,
}

/// Read-only projection of one criterion for one usage.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CriterionView {
    pub key: CriterionKey,
    pub label: &'static str,
    pub weight: f64,
    pub impacts: Vec<ValueImpact>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueImpact {
    pub valeur: &'static str,
    pub label: &'static str,
    pub impact: ImpactLevel,
}

impl Catalog {
    /// Catalog built from the tables compiled into the crate.
    pub fn embedded() -> Result<Self, CatalogError> {
        Self::from_readers(
            table::EMBEDDED_WEIGHTS.as_bytes(),
            table::EMBEDDED_IMPACTS.as_bytes(),
        )
    }

    /// Catalog read from `poids.csv` and `impacts.csv` inside `dir`.
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<Self, CatalogError> {
        let dir = dir.as_ref();
        let weights = std::fs::File::open(dir.join(WEIGHTS_FILE))?;
        let impacts = std::fs::File::open(dir.join(IMPACTS_FILE))?;
        Self::from_readers(weights, impacts)
    }

    pub fn from_readers<W: Read, I: Read>(weights: W, impacts: I) -> Result<Self, CatalogError> {
        let weights = table::parse_weights(weights)?;
        let impacts = table::parse_impacts(impacts)?;
        Self::from_tables(weights, impacts)
    }

    fn from_tables(
        weight_rows: Vec<WeightRecord>,
        impact_rows: Vec<ImpactRecord>,
    ) -> Result<Self, CatalogError> {
        let mut weights: BTreeMap<CriterionKey, [f64; 7]> = BTreeMap::new();
        for row in weight_rows {
            let key = criterion_key(&row.critere)?;
            for usage in Usage::ordered() {
                let value = row.weights[usage.index()];
                if !value.is_finite() || value <= 0.0 {
                    return Err(CatalogError::InvalidWeight {
                        critere: row.critere,
                        usage,
                        value,
                    });
                }
            }
            if weights.insert(key, row.weights).is_some() {
                return Err(CatalogError::DuplicateWeights {
                    critere: row.critere,
                });
            }
        }

        let mut impacts: BTreeMap<(CriterionKey, String), [ImpactLevel; 7]> = BTreeMap::new();
        for row in impact_rows {
            let key = criterion_key(&row.critere)?;
            if row.valeur == UNKNOWN_CODE {
                return Err(CatalogError::SentinelRow {
                    critere: row.critere,
                });
            }
            if !key.known_codes().contains(&row.valeur.as_str()) {
                return Err(CatalogError::UnknownValue {
                    critere: row.critere,
                    valeur: row.valeur,
                });
            }

            let mut levels = [ImpactLevel::Neutre; 7];
            for usage in Usage::ordered() {
                let token = &row.tokens[usage.index()];
                levels[usage.index()] = ImpactLevel::from_token(token).ok_or_else(|| {
                    CatalogError::InvalidImpactToken {
                        critere: row.critere.clone(),
                        valeur: row.valeur.clone(),
                        usage,
                        token: token.clone(),
                    }
                })?;
            }

            if impacts.insert((key, row.valeur.clone()), levels).is_some() {
                return Err(CatalogError::DuplicateImpact {
                    critere: row.critere,
                    valeur: row.valeur,
                });
            }
        }

        let mut criteria = Vec::with_capacity(CriterionKey::ALL.len());
        for key in CriterionKey::ALL.iter().copied() {
            let weights = weights
                .remove(&key)
                .ok_or_else(|| CatalogError::MissingWeights {
                    critere: key.key().to_string(),
                })?;

            let mut values = Vec::new();
            for code in key.known_codes() {
                let levels = impacts.remove(&(key, code.to_string())).ok_or_else(|| {
                    CatalogError::MissingImpact {
                        critere: key.key().to_string(),
                        valeur: code.to_string(),
                    }
                })?;
                values.push((code, levels));
            }

            criteria.push(CriterionRecord {
                key,
                weights,
                impacts: values,
            });
        }

        Ok(Self { criteria })
    }

    /// Number of distinct criteria across all usages.
    pub fn len(&self) -> usize {
        self.criteria.len()
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    /// Criterion keys in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = CriterionKey> + '_ {
        self.criteria.iter().map(|record| record.key)
    }

    pub fn weight(&self, key: CriterionKey, usage: Usage) -> Option<f64> {
        self.record(key).map(|record| record.weights[usage.index()])
    }

    /// Impact of a known value. `None` when the value has no row in the catalog.
    pub fn impact(&self, key: CriterionKey, usage: Usage, code: &str) -> Option<ImpactLevel> {
        self.record(key).and_then(|record| {
            record
                .impacts
                .iter()
                .find(|(valeur, _)| *valeur == code)
                .map(|(_, levels)| levels[usage.index()])
        })
    }

    /// Ordered criterion views for one usage.
    pub fn criteria(&self, usage: Usage) -> Vec<CriterionView> {
        self.criteria
            .iter()
            .map(|record| CriterionView {
                key: record.key,
                label: record.key.label(),
                weight: record.weights[usage.index()],
                impacts: record
                    .impacts
                    .iter()
                    .map(|(valeur, levels)| ValueImpact {
                        valeur: *valeur,
                        label: record.key.value_label(valeur).unwrap_or(*valeur),
                        impact: levels[usage.index()],
                    })
                    .collect(),
            })
            .collect()
    }

    pub fn criteria_for_code(&self, usage: &str) -> Result<Vec<CriterionView>, UnknownUsageType> {
        parse_usage(usage).map(|usage| self.criteria(usage))
    }

    fn record(&self, key: CriterionKey) -> Option<&CriterionRecord> {
        self.criteria.iter().find(|record| record.key == key)
    }
}

fn criterion_key(raw: &str) -> Result<CriterionKey, CatalogError> {
    CriterionKey::from_key(raw).ok_or_else(|| CatalogError::UnknownCriterion {
        critere: raw.to_string(),
    })
}

/// Process-wide catalog reference. Replacement swaps the whole table at once, so an
/// evaluation holding a snapshot never sees a half-updated set of weights.
#[derive(Debug, Clone)]
pub struct SharedCatalog {
    current: Arc<RwLock<Arc<Catalog>>>,
}

impl SharedCatalog {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(catalog))),
        }
    }

    pub fn snapshot(&self) -> Arc<Catalog> {
        let guard = self
            .current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(&guard)
    }

    pub fn replace(&self, catalog: Catalog) {
        let mut guard = self
            .current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = Arc::new(catalog);
        info!(criteria = guard.len(), "criterion catalog swapped");
    }
}

impl From<Catalog> for SharedCatalog {
    fn from(catalog: Catalog) -> Self {
        Self::new(catalog)
    }
}
