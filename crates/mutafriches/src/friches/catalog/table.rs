use serde::Deserialize;
use std::io::Read;

pub(crate) const EMBEDDED_WEIGHTS: &str = include_str!("data/poids.csv");
pub(crate) const EMBEDDED_IMPACTS: &str = include_str!("data/impacts.csv");

/// One row of `poids.csv`, weights ordered like `Usage::ordered()`.
#[derive(Debug)]
pub(crate) struct WeightRecord {
    pub(crate) critere: String,
    pub(crate) weights: [f64; 7],
}

/// One row of `impacts.csv`, raw tokens ordered like `Usage::ordered()`.
#[derive(Debug)]
pub(crate) struct ImpactRecord {
    pub(crate) critere: String,
    pub(crate) valeur: String,
    pub(crate) tokens: [String; 7],
}

pub(crate) fn parse_weights<R: Read>(reader: R) -> Result<Vec<WeightRecord>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();

    for record in csv_reader.deserialize::<WeightRow>() {
        let row = record?;
        records.push(WeightRecord {
            weights: [
                row.residentiel,
                row.equipements,
                row.culture,
                row.tertiaire,
                row.industrie,
                row.renaturation,
                row.photovoltaique,
            ],
            critere: row.critere,
        });
    }

    Ok(records)
}

pub(crate) fn parse_impacts<R: Read>(reader: R) -> Result<Vec<ImpactRecord>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();

    for record in csv_reader.deserialize::<ImpactRow>() {
        let row = record?;
        records.push(ImpactRecord {
            critere: row.critere,
            valeur: row.valeur,
            tokens: [
                row.residentiel,
                row.equipements,
                row.culture,
                row.tertiaire,
                row.industrie,
                row.renaturation,
                row.photovoltaique,
            ],
        });
    }

    Ok(records)
}

#[derive(Debug, Deserialize)]
struct WeightRow {
    critere: String,
    residentiel: f64,
    equipements: f64,
    culture: f64,
    tertiaire: f64,
    industrie: f64,
    renaturation: f64,
    photovoltaique: f64,
}

#[derive(Debug, Deserialize)]
struct ImpactRow {
    critere: String,
    valeur: String,
    residentiel: String,
    equipements: String,
    culture: String,
    tertiaire: String,
    industrie: String,
    renaturation: String,
    photovoltaique: String,
}
