use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::criteria::CriterionKey;

/// Revision of the scoring algorithm stamped on every evaluation.
pub const VERSION_ALGORITHME: &str = "1.0.0";

/// Candidate future use of a friche.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Usage {
    Residentiel,
    Equipements,
    Culture,
    Tertiaire,
    Industrie,
    Renaturation,
    Photovoltaique,
}

impl Usage {
    /// Declaration order. Equal indices are ranked in this order.
    pub const fn ordered() -> [Self; 7] {
        [
            Self::Residentiel,
            Self::Equipements,
            Self::Culture,
            Self::Tertiaire,
            Self::Industrie,
            Self::Renaturation,
            Self::Photovoltaique,
        ]
    }

    pub const fn code(self) -> &'static str {
        match self {
            Self::Residentiel => "residentiel",
            Self::Equipements => "equipements",
            Self::Culture => "culture",
            Self::Tertiaire => "tertiaire",
            Self::Industrie => "industrie",
            Self::Renaturation => "renaturation",
            Self::Photovoltaique => "photovoltaique",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Residentiel => "Résidentiel ou mixte",
            Self::Equipements => "Équipements publics",
            Self::Culture => "Culture, tourisme",
            Self::Tertiaire => "Tertiaire",
            Self::Industrie => "Industrie",
            Self::Renaturation => "Renaturation",
            Self::Photovoltaique => "Photovoltaïque au sol",
        }
    }

    /// Column position in the catalog tables.
    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ordered()
            .into_iter()
            .find(|usage| usage.code() == code)
    }
}

/// Qualitative effect of a criterion value on one usage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImpactLevel {
    TresNegatif,
    Negatif,
    Neutre,
    Positif,
    TresPositif,
}

impl ImpactLevel {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::TresNegatif,
            Self::Negatif,
            Self::Neutre,
            Self::Positif,
            Self::TresPositif,
        ]
    }

    /// Numeric score. Neutral is +0.5, not zero.
    pub const fn value(self) -> f64 {
        match self {
            Self::TresNegatif => -2.0,
            Self::Negatif => -1.0,
            Self::Neutre => 0.5,
            Self::Positif => 1.0,
            Self::TresPositif => 2.0,
        }
    }

    /// Token used in the impacts table.
    pub const fn token(self) -> &'static str {
        match self {
            Self::TresNegatif => "--",
            Self::Negatif => "-",
            Self::Neutre => "0",
            Self::Positif => "+",
            Self::TresPositif => "++",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::TresNegatif => "très défavorable",
            Self::Negatif => "défavorable",
            Self::Neutre => "neutre",
            Self::Positif => "favorable",
            Self::TresPositif => "très favorable",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        Self::ordered()
            .into_iter()
            .find(|level| level.token() == token)
    }
}

/// Confidence in an evaluation, derived from how many criteria were known.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fiabilite {
    pub note: f64,
    pub text: String,
    pub description: String,
    pub criteres_renseignes: usize,
    pub criteres_total: usize,
}

/// Ranked outcome for one usage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageResultat {
    pub rang: u8,
    pub usage: Usage,
    pub indice_mutabilite: u8,
    pub potentiel: String,
    pub explication: String,
}

/// Weighted contribution of one known criterion, exposed in detailed mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contribution {
    pub critere: CriterionKey,
    pub valeur: String,
    pub impact: ImpactLevel,
    pub poids: f64,
    pub score: f64,
}

/// Per-usage breakdown of the favorable and unfavorable sums.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageDetail {
    pub usage: Usage,
    pub somme_favorable: f64,
    pub somme_defavorable: f64,
    pub contributions: Vec<Contribution>,
}

/// Complete mutability assessment of one friche.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mutabilite {
    pub fiabilite: Fiabilite,
    /// Best usage first; `rang` 7 is the best.
    pub resultats: Vec<UsageResultat>,
    pub date_calcul: DateTime<Utc>,
    pub version_algorithme: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<UsageDetail>>,
}

impl Mutabilite {
    pub fn meilleur_usage(&self) -> Option<&UsageResultat> {
        self.resultats.iter().find(|resultat| resultat.rang == 7)
    }

    pub fn resultat(&self, usage: Usage) -> Option<&UsageResultat> {
        self.resultats.iter().find(|resultat| resultat.usage == usage)
    }
}
