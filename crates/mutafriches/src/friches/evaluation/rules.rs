use tracing::debug;

use super::super::catalog::Catalog;
use super::super::criteria::SiteInput;
use super::super::domain::{Contribution, Usage, UsageDetail};
use super::impact::resolve;
use super::MutabiliteError;

/// Index assigned when no criterion is known for a usage.
pub const NEUTRAL_INDEX: u8 = 50;

/// Aggregated favorable/unfavorable contributions for one usage.
#[derive(Debug, Clone, PartialEq)]
pub struct UsageScore {
    pub usage: Usage,
    /// Sum of the positive weighted scores, neutral impacts included.
    pub sum_favorable: f64,
    /// Sum of the negative weighted scores; zero or below.
    pub sum_unfavorable: f64,
    pub index: u8,
    /// Known criteria in catalog order.
    pub contributions: Vec<Contribution>,
}

impl UsageScore {
    /// `sum_favorable − |sum_unfavorable|`.
    pub fn balance(&self) -> f64 {
        self.sum_favorable - self.sum_unfavorable.abs()
    }

    pub fn detail(&self) -> UsageDetail {
        UsageDetail {
            usage: self.usage,
            somme_favorable: self.sum_favorable,
            somme_defavorable: self.sum_unfavorable,
            contributions: self.contributions.clone(),
        }
    }
}

pub(crate) fn score_usage(
    catalog: &Catalog,
    usage: Usage,
    input: &SiteInput,
) -> Result<UsageScore, MutabiliteError> {
    let mut sum_favorable = 0.0;
    let mut sum_unfavorable = 0.0;
    let mut contributions = Vec::new();

    for key in catalog.keys() {
        let code = input.code(key);
        let resolution = resolve(catalog, key, usage, code)?;
        let Some(impact) = resolution.impact else {
            continue;
        };

        if resolution.score > 0.0 {
            sum_favorable += resolution.score;
        } else {
            sum_unfavorable += resolution.score;
        }

        contributions.push(Contribution {
            critere: key,
            valeur: code.to_string(),
            impact,
            poids: resolution.weight,
            score: resolution.score,
        });
    }

    let index = mutability_index(sum_favorable, sum_unfavorable);
    debug!(
        usage = usage.code(),
        sum_favorable,
        sum_unfavorable,
        index,
        known = contributions.len(),
        "usage scored"
    );

    Ok(UsageScore {
        usage,
        sum_favorable,
        sum_unfavorable,
        index,
        contributions,
    })
}

/// Map the two sums onto 0..=100, 50 meaning balanced or undetermined.
pub fn mutability_index(sum_favorable: f64, sum_unfavorable: f64) -> u8 {
    let unfavorable = sum_unfavorable.abs();
    let total = sum_favorable + unfavorable;
    if total <= 0.0 {
        return NEUTRAL_INDEX;
    }

    let raw = 50.0 + 50.0 * (sum_favorable - unfavorable) / total;
    raw.round().clamp(0.0, 100.0) as u8
}
