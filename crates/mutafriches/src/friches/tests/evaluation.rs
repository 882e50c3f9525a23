use chrono::{TimeZone, Utc};

use super::common::*;
use crate::friches::criteria::{EtatBatiInfrastructure, SiteInput};
use crate::friches::domain::{Usage, VERSION_ALGORITHME};
use crate::friches::evaluation::{
    EvaluationConfig, MutabilityEngine, PolicyError, PotentielBand, NEUTRAL_INDEX,
};

fn ranking(resultats: &[crate::friches::domain::UsageResultat]) -> Vec<(Usage, u8, u8)> {
    resultats
        .iter()
        .map(|resultat| (resultat.usage, resultat.rang, resultat.indice_mutabilite))
        .collect()
}

#[test]
fn urban_site_favours_built_usages() {
    let input = guard()
        .site_from_fields(&urban_site_fields())
        .expect("valid input");

    let mutabilite = engine().evaluer(&input).expect("evaluation succeeds");

    assert_eq!(
        ranking(&mutabilite.resultats),
        vec![
            (Usage::Residentiel, 7, 100),
            (Usage::Equipements, 6, 100),
            (Usage::Culture, 5, 100),
            (Usage::Tertiaire, 4, 100),
            (Usage::Industrie, 3, 86),
            (Usage::Renaturation, 2, 85),
            (Usage::Photovoltaique, 1, 42),
        ]
    );
    let photovoltaique = mutabilite
        .resultat(Usage::Photovoltaique)
        .expect("every usage ranked");
    assert_eq!(photovoltaique.potentiel, "Modéré");
    assert_eq!(mutabilite.fiabilite.criteres_renseignes, 9);
    assert_eq!(mutabilite.fiabilite.note, 3.5);
    assert_eq!(mutabilite.fiabilite.text, "Peu fiable");
    assert_eq!(mutabilite.version_algorithme, VERSION_ALGORITHME);
    assert!(mutabilite.details.is_none());
}

#[test]
fn single_degraded_building_penalises_each_usage_by_its_own_weight() {
    let input = SiteInput {
        etat_bati_infrastructure: EtatBatiInfrastructure::DegradationTresImportante,
        ..SiteInput::default()
    };
    let engine = engine();

    let mutabilite = engine.evaluer_detaille(&input).expect("evaluation succeeds");

    assert_eq!(mutabilite.fiabilite.criteres_renseignes, 1);
    assert_eq!(mutabilite.fiabilite.note, 0.4);
    let residentiel = mutabilite
        .resultat(Usage::Residentiel)
        .expect("residentiel ranked");
    assert!(residentiel.indice_mutabilite < NEUTRAL_INDEX);
    assert_eq!(mutabilite.meilleur_usage().map(|best| best.usage), Some(Usage::Renaturation));

    let details = mutabilite.details.expect("detailed mode");
    let sums: Vec<(Usage, f64)> = details
        .iter()
        .map(|detail| (detail.usage, detail.somme_defavorable))
        .collect();
    assert!(sums.contains(&(Usage::Residentiel, -4.0)));
    assert!(sums.contains(&(Usage::Equipements, -4.0)));
    assert!(sums.contains(&(Usage::Culture, -2.0)));
    assert!(sums.contains(&(Usage::Industrie, -1.0)));
    assert!(sums.contains(&(Usage::Renaturation, 0.0)));
    assert!(details.iter().all(|detail| detail.contributions.len() == 1));
}

#[test]
fn unknown_site_is_neutral_and_least_reliable() {
    let mutabilite = engine()
        .evaluer(&SiteInput::default())
        .expect("evaluation succeeds");

    assert!(mutabilite
        .resultats
        .iter()
        .all(|resultat| resultat.indice_mutabilite == NEUTRAL_INDEX
            && resultat.potentiel == "Modéré"));
    let order: Vec<Usage> = mutabilite
        .resultats
        .iter()
        .map(|resultat| resultat.usage)
        .collect();
    assert_eq!(order, Usage::ordered().to_vec());
    assert_eq!(mutabilite.fiabilite.note, 0.0);
}

#[test]
fn evaluation_is_deterministic_for_a_fixed_date() {
    let input = guard()
        .site_from_fields(&urban_site_fields())
        .expect("valid input");
    let date = Utc.with_ymd_and_hms(2025, 3, 14, 9, 30, 0).unwrap();
    let engine = engine();

    let first = engine.evaluer_a(&input, date, true).expect("first run");
    let second = engine.evaluer_a(&input, date, true).expect("second run");

    assert_eq!(first, second);
    assert_eq!(first.date_calcul, date);
}

#[test]
fn serialised_output_uses_camel_case_and_omits_details() {
    let input = guard()
        .site_from_fields(&urban_site_fields())
        .expect("valid input");
    let mutabilite = engine().evaluer(&input).expect("evaluation succeeds");

    let payload = serde_json::to_value(&mutabilite).expect("serialises");

    assert_eq!(payload["fiabilite"]["criteresRenseignes"], 9);
    assert_eq!(payload["resultats"][0]["indiceMutabilite"], 100);
    assert_eq!(payload["resultats"][0]["usage"], "residentiel");
    assert_eq!(payload["versionAlgorithme"], VERSION_ALGORITHME);
    assert!(payload.get("details").is_none());
}

#[test]
fn score_and_classement_agree_with_full_evaluation() {
    let input = guard()
        .site_from_fields(&urban_site_fields())
        .expect("valid input");
    let engine = engine();

    let score = engine
        .score(Usage::Photovoltaique, &input)
        .expect("scores");
    assert_eq!(score.index, 42);
    assert_eq!(score.sum_unfavorable, -4.5);

    let classement = engine.classement(&input).expect("ranks");
    let full = engine.evaluer(&input).expect("evaluates");
    assert_eq!(classement, full.resultats);
    assert_eq!(engine.fiabilite(&input).expect("grades"), full.fiabilite);
}

#[test]
fn engine_rejects_inconsistent_policy_tables() {
    let mut config = EvaluationConfig::default();
    config.potentiel_bands = vec![PotentielBand {
        min_index: 50,
        label: "Moyen".to_string(),
    }];
    assert_eq!(
        MutabilityEngine::new(catalog(), config).err(),
        Some(PolicyError::MissingZeroThreshold { table: "potentiel" })
    );

    let mut config = EvaluationConfig::default();
    config.fiabilite_tiers.clear();
    assert_eq!(
        MutabilityEngine::new(catalog(), config).err(),
        Some(PolicyError::EmptyTable { table: "fiabilite" })
    );
}

#[test]
fn custom_bands_relabel_results() {
    let mut config = EvaluationConfig::default();
    config.potentiel_bands = vec![
        PotentielBand {
            min_index: 0,
            label: "Bas".to_string(),
        },
        PotentielBand {
            min_index: 90,
            label: "Haut".to_string(),
        },
    ];
    let engine = MutabilityEngine::new(catalog(), config).expect("valid policy");
    let input = guard()
        .site_from_fields(&urban_site_fields())
        .expect("valid input");

    let resultats = engine.classement(&input).expect("ranks");

    assert_eq!(resultats[0].potentiel, "Haut");
    assert_eq!(resultats[6].potentiel, "Bas");
}

#[test]
fn catalog_swap_applies_to_later_evaluations() {
    let engine = engine();
    let input = SiteInput {
        etat_bati_infrastructure: EtatBatiInfrastructure::DegradationTresImportante,
        ..SiteInput::default()
    };
    let before = engine.score(Usage::Culture, &input).expect("scores");

    let heavier = crate::friches::catalog::Catalog::from_readers(
        weights_with("etatBatiInfrastructure", "3").as_bytes(),
        EMBEDDED_IMPACTS.as_bytes(),
    )
    .expect("valid tables");
    engine.catalog().replace(heavier);
    let after = engine.score(Usage::Culture, &input).expect("scores");

    assert_eq!(before.sum_unfavorable, -2.0);
    assert_eq!(after.sum_unfavorable, -3.0);
}

#[test]
fn criteria_for_code_surfaces_unknown_usage() {
    let engine = engine();

    assert_eq!(engine.criteria(Usage::Industrie).len(), 26);
    let error = engine
        .criteria_for_code("aeroport")
        .expect_err("unknown usage");
    assert!(error.is_input_error());
    assert_eq!(error.to_string(), "unknown usage type 'aeroport'");
}
