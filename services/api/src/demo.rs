use crate::infra::{build_service, read_request};
use clap::Args;
use mutafriches::config::AppConfig;
use mutafriches::error::AppError;
use mutafriches::friches::{CriterionView, EvaluationRecord, EvaluationRequest, SiteMeasurements};
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct EvaluerArgs {
    /// JSON file holding an evaluation request (criteres, mesures, identifiantParcelle)
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Include per-criterion contributions for every usage
    #[arg(long)]
    pub(crate) details: bool,
    /// Print the stored evaluation as JSON instead of a table
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct CatalogueArgs {
    /// Usage code, e.g. `residentiel` or `photovoltaique`
    #[arg(long)]
    pub(crate) usage: String,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Include per-criterion contributions in the output
    #[arg(long)]
    pub(crate) details: bool,
    /// Print the evaluation as JSON instead of a table
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_evaluer(args: EvaluerArgs) -> Result<(), AppError> {
    let mut request = read_request(&args.input)?;
    request.details |= args.details;
    evaluate_and_print(request, args.json)
}

pub(crate) fn run_catalogue(args: CatalogueArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let service = build_service(&config.engine)?;
    let criteria = service.criteria(&args.usage)?;
    print!("{}", render_criteria(&args.usage, &criteria));
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let mut request = demo_request();
    request.details = args.details;
    evaluate_and_print(request, args.json)
}

fn evaluate_and_print(request: EvaluationRequest, json: bool) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let service = build_service(&config.engine)?;
    let record = service.evaluate(request)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        print!("{}", render_evaluation(&record));
    }
    Ok(())
}

/// Former urban industrial site, partly described by raw measurements.
fn demo_request() -> EvaluationRequest {
    let criteres: BTreeMap<String, String> = [
        ("siteEnCentreVille", "oui"),
        ("proximiteCommercesServices", "oui"),
        ("zonageReglementaire", "zone-urbaine"),
        ("etatBatiInfrastructure", "degradation-moyenne"),
        ("presencePollution", "deja-geree"),
        ("typeProprietaire", "public"),
        ("zoneHumide", "non"),
    ]
    .into_iter()
    .map(|(key, value)| (key.to_string(), value.to_string()))
    .collect();

    EvaluationRequest {
        identifiant_parcelle: Some("25056000HZ0346".to_string()),
        criteres,
        mesures: Some(SiteMeasurements {
            surface_site: Some(32_000.0),
            distance_transport_commun: Some(350.0),
            ..SiteMeasurements::default()
        }),
        details: false,
    }
}

fn render_evaluation(record: &EvaluationRecord) -> String {
    let mutabilite = &record.mutabilite;
    let mut out = format!("Evaluation {}", record.id);
    if let Some(parcelle) = &record.identifiant_parcelle {
        out.push_str(&format!(" (parcelle {parcelle})"));
    }
    out.push('\n');
    out.push_str(&format!(
        "Fiabilite: {:.1}/10 {} ({}/{} criteres renseignes)\n",
        mutabilite.fiabilite.note,
        mutabilite.fiabilite.text,
        mutabilite.fiabilite.criteres_renseignes,
        mutabilite.fiabilite.criteres_total
    ));
    out.push_str(&format!(
        "Algorithme {} calcule le {}\n\n",
        mutabilite.version_algorithme,
        mutabilite.date_calcul.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    for resultat in &mutabilite.resultats {
        out.push_str(&format!(
            "{}  {:<16} {:>3}/100  {:<10} {}\n",
            resultat.rang,
            resultat.usage.code(),
            resultat.indice_mutabilite,
            resultat.potentiel,
            resultat.explication
        ));
    }

    for detail in mutabilite.details.iter().flatten() {
        out.push_str(&format!(
            "\n{}: favorable {:+.1}, defavorable {:+.1}\n",
            detail.usage.code(),
            detail.somme_favorable,
            detail.somme_defavorable
        ));
        for contribution in &detail.contributions {
            out.push_str(&format!(
                "  {:<32} {:<28} {:>4.1} x {:>4.1} = {:+.1}\n",
                contribution.critere.key(),
                contribution.valeur,
                contribution.poids,
                contribution.impact.value(),
                contribution.score
            ));
        }
    }
    out
}

fn render_criteria(usage: &str, criteria: &[CriterionView]) -> String {
    let mut out = format!("Criteres appliques a l'usage {usage}\n");
    for view in criteria {
        out.push_str(&format!(
            "\n{} ({}) poids {:.1}\n",
            view.key.key(),
            view.label,
            view.weight
        ));
        for impact in &view.impacts {
            out.push_str(&format!(
                "  {:<32} {}\n",
                impact.valeur,
                impact.impact.label()
            ));
        }
    }
    out
}
