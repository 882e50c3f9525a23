use std::sync::Arc;

use super::common::*;
use crate::friches::criteria::CriterionKey;
use crate::friches::domain::Usage;
use crate::friches::evaluation::MutabiliteError;
use crate::friches::measurements::SiteMeasurements;
use crate::friches::repository::{EvaluationId, EvaluationRepository, RepositoryError};
use crate::friches::service::{EvaluationRequest, MutabiliteService, MutabiliteServiceError};
use crate::friches::CatalogError;

#[test]
fn evaluate_persists_and_notifies_analytics() {
    let (service, repository, analytics) = build_service();

    let record = service.evaluate(urban_request()).expect("evaluation stored");

    assert!(record.id.0.starts_with("eval-"));
    assert_eq!(record.id.0.len(), "eval-000000".len());
    assert_eq!(record.identifiant_parcelle.as_deref(), Some("25056000HZ0346"));
    let stored = repository
        .fetch(&record.id)
        .expect("fetch succeeds")
        .expect("record present");
    assert_eq!(stored.mutabilite, record.mutabilite);

    let events = analytics.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].evaluation_id, record.id);
    assert_eq!(events[0].meilleur_usage, Usage::Residentiel);
    assert_eq!(events[0].fiabilite, 3.5);
}

#[test]
fn evaluate_applies_measurements_and_details() {
    let (service, _, _) = build_service();
    let request = EvaluationRequest {
        mesures: Some(SiteMeasurements {
            surface_bati: Some(0.0),
            taux_logements_vacants: Some(12.5),
            ..SiteMeasurements::default()
        }),
        details: true,
        ..urban_request()
    };

    let record = service.evaluate(request).expect("evaluation stored");

    assert_eq!(record.mutabilite.fiabilite.criteres_renseignes, 11);
    let details = record.mutabilite.details.expect("details requested");
    assert_eq!(details.len(), 7);
    assert!(details[0]
        .contributions
        .iter()
        .any(|contribution| contribution.critere == CriterionKey::TauxLogementsVacants
            && contribution.valeur == "plus-de-10"));
}

#[test]
fn evaluate_propagates_input_errors() {
    let (service, repository, analytics) = build_service();
    let mut request = urban_request();
    request
        .criteres
        .insert("zoneHumide".to_string(), "parfois".to_string());

    match service.evaluate(request) {
        Err(
            error @ MutabiliteServiceError::Evaluation(MutabiliteError::InvalidInputValue {
                ..
            }),
        ) => assert!(error.is_input_error()),
        other => panic!("expected invalid input value, got {other:?}"),
    }
    assert!(repository.records.lock().expect("lock").is_empty());
    assert!(analytics.events().is_empty());
}

#[test]
fn evaluate_rejects_invalid_measurements() {
    let (service, _, _) = build_service();
    let request = EvaluationRequest {
        mesures: Some(SiteMeasurements {
            distance_autoroute: Some(-3.0),
            ..SiteMeasurements::default()
        }),
        ..urban_request()
    };

    match service.evaluate(request) {
        Err(MutabiliteServiceError::Evaluation(MutabiliteError::InvalidMeasurement {
            field,
            ..
        })) => assert_eq!(field, "distanceAutoroute"),
        other => panic!("expected invalid measurement, got {other:?}"),
    }
}

#[test]
fn strict_service_requires_complete_input() {
    let service = MutabiliteService::new(
        Arc::new(MemoryRepository::default()),
        Arc::new(MemoryAnalytics::default()),
        engine(),
    )
    .with_strict_input(true);
    assert!(service.is_strict());

    assert!(matches!(
        service.evaluate(urban_request()),
        Err(MutabiliteServiceError::Evaluation(
            MutabiliteError::MissingInputField { .. }
        ))
    ));
}

#[test]
fn evaluate_surfaces_repository_failures() {
    let service = MutabiliteService::new(
        Arc::new(UnavailableRepository),
        Arc::new(MemoryAnalytics::default()),
        engine(),
    );

    match service.evaluate(urban_request()) {
        Err(MutabiliteServiceError::Repository(RepositoryError::Unavailable(reason))) => {
            assert_eq!(reason, "database offline");
        }
        other => panic!("expected unavailable repository, got {other:?}"),
    }
}

#[test]
fn evaluate_succeeds_when_analytics_is_offline() {
    let repository = Arc::new(MemoryRepository::default());
    let service = MutabiliteService::new(repository.clone(), Arc::new(OfflineAnalytics), engine());

    let record = service
        .evaluate(urban_request())
        .expect("stored evaluation is returned");

    assert_eq!(repository.records.lock().expect("lock").len(), 1);
    let fetched = service.get(&record.id).expect("stored record is fetchable");
    assert_eq!(fetched.id, record.id);
    assert_eq!(
        fetched.mutabilite.meilleur_usage().map(|r| r.usage),
        Some(Usage::Residentiel)
    );
}

#[test]
fn get_propagates_not_found() {
    let (service, _, _) = build_service();

    match service.get(&EvaluationId("eval-999999".to_string())) {
        Err(MutabiliteServiceError::Repository(RepositoryError::NotFound)) => {}
        other => panic!("expected not found, got {other:?}"),
    }
}

#[test]
fn recent_lists_newest_first() {
    let (service, _, _) = build_service();
    let first = service.evaluate(urban_request()).expect("first stored");
    let second = service
        .evaluate(EvaluationRequest::default())
        .expect("second stored");

    let summaries = service.recent(10).expect("recent listing");

    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].id, second.id);
    assert_eq!(summaries[0].fiabilite, 0.0);
    assert_eq!(summaries[1].id, first.id);
    assert_eq!(summaries[1].meilleur_usage, Some(Usage::Residentiel));
    assert_eq!(service.recent(1).expect("limited").len(), 1);
}

#[test]
fn reload_swaps_catalog_and_keeps_it_on_failure() {
    let (service, _, _) = build_service();
    let dir = catalog_dir(&weights_with("zoneHumide", "5"), EMBEDDED_IMPACTS);
    let service = service.with_catalog_source(directory_source(dir.clone()));

    assert_eq!(service.reload().expect("reload succeeds"), 26);
    assert_eq!(
        service
            .engine()
            .catalog()
            .snapshot()
            .weight(CriterionKey::ZoneHumide, Usage::Industrie),
        Some(5.0)
    );

    std::fs::write(
        dir.join(crate::friches::catalog::WEIGHTS_FILE),
        "critere,residentiel\nzoneHumide,beaucoup\n",
    )
    .expect("corrupt weights");
    assert!(matches!(
        service.reload(),
        Err(MutabiliteServiceError::Catalog(CatalogError::Csv(_)))
    ));
    assert_eq!(
        service
            .engine()
            .catalog()
            .snapshot()
            .weight(CriterionKey::ZoneHumide, Usage::Industrie),
        Some(5.0)
    );

    std::fs::remove_dir_all(dir).ok();
}

#[test]
fn conflict_repository_reports_conflict() {
    let service = MutabiliteService::new(
        Arc::new(ConflictRepository),
        Arc::new(MemoryAnalytics::default()),
        engine(),
    );

    assert!(matches!(
        service.evaluate(urban_request()),
        Err(MutabiliteServiceError::Repository(RepositoryError::Conflict))
    ));
}
