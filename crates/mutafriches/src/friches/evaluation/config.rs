use serde::{Deserialize, Serialize};

/// Tunable policy applied on top of the raw scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationConfig {
    /// Potential labels keyed by minimum mutability index.
    pub potentiel_bands: Vec<PotentielBand>,
    /// Reliability tiers keyed by minimum note.
    pub fiabilite_tiers: Vec<FiabiliteTier>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PotentielBand {
    pub min_index: u8,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FiabiliteTier {
    pub min_note: f64,
    pub text: String,
    pub description: String,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            potentiel_bands: vec![
                band(60, "Favorable"),
                band(40, "Modéré"),
                band(0, "Défavorable"),
            ],
            fiabilite_tiers: vec![
                tier(
                    9.0,
                    "Très fiable",
                    "Les données sont quasi complètes : l'analyse de mutabilité est robuste.",
                ),
                tier(
                    7.0,
                    "Fiable",
                    "La majorité des critères est renseignée : les résultats sont exploitables.",
                ),
                tier(
                    5.0,
                    "Moyennement fiable",
                    "Plusieurs critères restent inconnus : les résultats sont à confirmer.",
                ),
                tier(
                    3.0,
                    "Peu fiable",
                    "De nombreux critères sont inconnus : les résultats sont indicatifs.",
                ),
                tier(
                    0.0,
                    "Très peu fiable",
                    "Trop peu de critères sont renseignés pour une analyse pertinente.",
                ),
            ],
        }
    }
}

fn band(min_index: u8, label: &str) -> PotentielBand {
    PotentielBand {
        min_index,
        label: label.to_string(),
    }
}

fn tier(min_note: f64, text: &str, description: &str) -> FiabiliteTier {
    FiabiliteTier {
        min_note,
        text: text.to_string(),
        description: description.to_string(),
    }
}
