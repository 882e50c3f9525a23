use super::super::catalog::Catalog;
use super::super::criteria::{CriterionKey, UNKNOWN_CODE};
use super::super::domain::{ImpactLevel, Usage};
use super::MutabiliteError;

/// Numeric reading of one criterion value for one usage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    /// `weight × impact`, zero when the value is unknown.
    pub score: f64,
    pub known: bool,
    pub impact: Option<ImpactLevel>,
    pub weight: f64,
}

impl Resolution {
    const UNKNOWN: Self = Self {
        score: 0.0,
        known: false,
        impact: None,
        weight: 0.0,
    };
}

/// Translate a raw value code into its weighted score.
///
/// Unknown values resolve to a non-contributing zero. Known values missing from the catalog
/// are a data-integrity failure and never silently skipped.
pub fn resolve(
    catalog: &Catalog,
    key: CriterionKey,
    usage: Usage,
    code: &str,
) -> Result<Resolution, MutabiliteError> {
    if code.is_empty() || code == UNKNOWN_CODE {
        return Ok(Resolution::UNKNOWN);
    }

    let unmapped = || MutabiliteError::UnmappedValue {
        key,
        usage,
        value: code.to_string(),
    };
    let impact = catalog.impact(key, usage, code).ok_or_else(unmapped)?;
    let weight = catalog.weight(key, usage).ok_or_else(unmapped)?;

    Ok(Resolution {
        score: weight * impact.value(),
        known: true,
        impact: Some(impact),
        weight,
    })
}
