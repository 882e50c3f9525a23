use super::config::{EvaluationConfig, FiabiliteTier, PotentielBand};

/// Inconsistent policy tables, detected when the engine is built.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PolicyError {
    #[error("{table} table is empty")]
    EmptyTable { table: &'static str },
    #[error("{table} table needs a threshold at zero so every value is labelled")]
    MissingZeroThreshold { table: &'static str },
    #[error("{table} table declares threshold {threshold} more than once")]
    DuplicateThreshold { table: &'static str, threshold: f64 },
    #[error("{table} threshold {threshold} is outside the score range")]
    OutOfRange { table: &'static str, threshold: f64 },
}

const POTENTIEL_TABLE: &str = "potentiel";
const FIABILITE_TABLE: &str = "fiabilite";

pub(crate) fn validate(config: &EvaluationConfig) -> Result<(), PolicyError> {
    let bands: Vec<f64> = config
        .potentiel_bands
        .iter()
        .map(|band| f64::from(band.min_index))
        .collect();
    check_thresholds(POTENTIEL_TABLE, &bands, 100.0)?;

    let tiers: Vec<f64> = config
        .fiabilite_tiers
        .iter()
        .map(|tier| tier.min_note)
        .collect();
    check_thresholds(FIABILITE_TABLE, &tiers, 10.0)
}

fn check_thresholds(table: &'static str, thresholds: &[f64], max: f64) -> Result<(), PolicyError> {
    if thresholds.is_empty() {
        return Err(PolicyError::EmptyTable { table });
    }

    for (position, threshold) in thresholds.iter().enumerate() {
        if !threshold.is_finite() || *threshold < 0.0 || *threshold > max {
            return Err(PolicyError::OutOfRange {
                table,
                threshold: *threshold,
            });
        }
        if thresholds[..position].contains(threshold) {
            return Err(PolicyError::DuplicateThreshold {
                table,
                threshold: *threshold,
            });
        }
    }

    if !thresholds.contains(&0.0) {
        return Err(PolicyError::MissingZeroThreshold { table });
    }

    Ok(())
}

/// Label of the highest band whose threshold does not exceed `index`.
pub(crate) fn potentiel_label(index: u8, bands: &[PotentielBand]) -> Option<&str> {
    bands
        .iter()
        .filter(|band| band.min_index <= index)
        .max_by_key(|band| band.min_index)
        .map(|band| band.label.as_str())
}

/// Highest tier whose threshold does not exceed `note`.
pub(crate) fn fiabilite_tier(note: f64, tiers: &[FiabiliteTier]) -> Option<&FiabiliteTier> {
    tiers
        .iter()
        .filter(|tier| tier.min_note <= note)
        .max_by(|a, b| a.min_note.total_cmp(&b.min_note))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn potentiel_bands_pick_highest_reached_threshold() {
        let config = EvaluationConfig::default();

        assert_eq!(potentiel_label(100, &config.potentiel_bands), Some("Favorable"));
        assert_eq!(potentiel_label(60, &config.potentiel_bands), Some("Favorable"));
        assert_eq!(potentiel_label(59, &config.potentiel_bands), Some("Modéré"));
        assert_eq!(potentiel_label(40, &config.potentiel_bands), Some("Modéré"));
        assert_eq!(potentiel_label(39, &config.potentiel_bands), Some("Défavorable"));
        assert_eq!(potentiel_label(0, &config.potentiel_bands), Some("Défavorable"));
    }

    #[test]
    fn fiabilite_tiers_pick_highest_reached_threshold() {
        let config = EvaluationConfig::default();

        let tier = |note| {
            fiabilite_tier(note, &config.fiabilite_tiers)
                .map(|tier| tier.text.as_str())
                .expect("tier exists")
        };
        assert_eq!(tier(10.0), "Très fiable");
        assert_eq!(tier(9.0), "Très fiable");
        assert_eq!(tier(8.9), "Fiable");
        assert_eq!(tier(5.0), "Moyennement fiable");
        assert_eq!(tier(2.9), "Très peu fiable");
        assert_eq!(tier(0.0), "Très peu fiable");
    }

    #[test]
    fn default_policy_is_valid() {
        assert_eq!(validate(&EvaluationConfig::default()), Ok(()));
    }

    #[test]
    fn rejects_tables_without_zero_threshold() {
        let mut config = EvaluationConfig::default();
        config.potentiel_bands.retain(|band| band.min_index > 0);

        assert_eq!(
            validate(&config),
            Err(PolicyError::MissingZeroThreshold { table: "potentiel" })
        );
    }

    #[test]
    fn rejects_duplicate_and_out_of_range_thresholds() {
        let mut config = EvaluationConfig::default();
        config.fiabilite_tiers[1].min_note = 9.0;
        assert!(matches!(
            validate(&config),
            Err(PolicyError::DuplicateThreshold { table: "fiabilite", .. })
        ));

        let mut config = EvaluationConfig::default();
        config.fiabilite_tiers[0].min_note = 12.0;
        assert!(matches!(
            validate(&config),
            Err(PolicyError::OutOfRange { table: "fiabilite", .. })
        ));
    }

    #[test]
    fn rejects_empty_tables() {
        let mut config = EvaluationConfig::default();
        config.potentiel_bands.clear();
        assert_eq!(
            validate(&config),
            Err(PolicyError::EmptyTable { table: "potentiel" })
        );
    }
}
