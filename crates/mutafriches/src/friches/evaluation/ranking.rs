use super::super::catalog::Catalog;
use super::super::criteria::SiteInput;
use super::super::domain::{Contribution, Usage, UsageResultat};
use super::config::EvaluationConfig;
use super::policy::{potentiel_label, PolicyError};
use super::rules::{score_usage, UsageScore};
use super::MutabiliteError;

const NO_KNOWN_CRITERIA: &str =
    "Aucun critère renseigné pour cet usage : indice neutre par défaut.";

/// Scores for every usage, best first. Equal indices keep `Usage::ordered()` order.
pub(crate) fn ranked_scores(
    catalog: &Catalog,
    input: &SiteInput,
) -> Result<Vec<UsageScore>, MutabiliteError> {
    let mut scores = Usage::ordered()
        .into_iter()
        .map(|usage| score_usage(catalog, usage, input))
        .collect::<Result<Vec<_>, _>>()?;

    scores.sort_by(|a, b| b.index.cmp(&a.index).then_with(|| a.usage.cmp(&b.usage)));
    Ok(scores)
}

/// Turn best-first scores into results, the best receiving `rang` 7.
pub(crate) fn build_resultats(
    scores: &[UsageScore],
    config: &EvaluationConfig,
) -> Result<Vec<UsageResultat>, MutabiliteError> {
    let total = scores.len();
    scores
        .iter()
        .enumerate()
        .map(|(position, score)| -> Result<UsageResultat, MutabiliteError> {
            let potentiel = potentiel_label(score.index, &config.potentiel_bands).ok_or(
                PolicyError::MissingZeroThreshold { table: "potentiel" },
            )?;

            Ok(UsageResultat {
                rang: (total - position) as u8,
                usage: score.usage,
                indice_mutabilite: score.index,
                potentiel: potentiel.to_string(),
                explication: explain(score),
            })
        })
        .collect()
}

/// Name the one or two criteria weighing most on the score.
pub(crate) fn explain(score: &UsageScore) -> String {
    let mut dominant: Vec<&Contribution> = score.contributions.iter().collect();
    // stable sort: equal weights keep catalog order
    dominant.sort_by(|a, b| b.score.abs().total_cmp(&a.score.abs()));

    match dominant.as_slice() {
        [] => NO_KNOWN_CRITERIA.to_string(),
        [only] => format!("Critère déterminant : {}.", describe(only)),
        [first, second, ..] => format!(
            "Critères déterminants : {} et {}.",
            describe(first),
            describe(second)
        ),
    }
}

fn describe(contribution: &Contribution) -> String {
    let valeur = contribution
        .critere
        .value_label(&contribution.valeur)
        .unwrap_or(contribution.valeur.as_str());
    format!(
        "{} ({}, {})",
        contribution.critere.label(),
        valeur,
        contribution.impact.label()
    )
}
