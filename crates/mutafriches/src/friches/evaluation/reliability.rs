use super::super::catalog::Catalog;
use super::super::criteria::SiteInput;
use super::super::domain::Fiabilite;
use super::config::FiabiliteTier;
use super::policy::fiabilite_tier;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ReliabilityError {
    #[error("catalog declares no criteria, reliability is undefined")]
    NoCriteria,
    #[error("no reliability tier covers note {note}")]
    NoMatchingTier { note: f64 },
}

/// Share of catalog criteria carrying a known value, as a 0–10 note with a tier label.
pub(crate) fn compute_fiabilite(
    catalog: &Catalog,
    input: &SiteInput,
    tiers: &[FiabiliteTier],
) -> Result<Fiabilite, ReliabilityError> {
    let criteres_total = catalog.len();
    if criteres_total == 0 {
        return Err(ReliabilityError::NoCriteria);
    }

    let criteres_renseignes = catalog.keys().filter(|key| input.is_known(*key)).count();
    let note = round_one_decimal(10.0 * criteres_renseignes as f64 / criteres_total as f64);
    let tier = fiabilite_tier(note, tiers).ok_or(ReliabilityError::NoMatchingTier { note })?;

    Ok(Fiabilite {
        note,
        text: tier.text.clone(),
        description: tier.description.clone(),
        criteres_renseignes,
        criteres_total,
    })
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
