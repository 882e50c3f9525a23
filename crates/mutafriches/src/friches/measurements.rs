//! Raw enrichment measurements and their bucketing into criterion values.

use serde::{Deserialize, Serialize};

use super::criteria::{
    DistanceAutoroute, DistanceRaccordementElectrique, DistanceTransportCommun, SiteInput,
    SurfaceBati, SurfaceSite, TauxLogementsVacants,
};
use super::evaluation::MutabiliteError;

/// Optional numbers supplied by the enrichment layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct SiteMeasurements {
    /// Square metres.
    pub surface_site: Option<f64>,
    /// Square metres.
    pub surface_bati: Option<f64>,
    /// Kilometres.
    pub distance_autoroute: Option<f64>,
    /// Metres.
    pub distance_transport_commun: Option<f64>,
    /// Kilometres.
    pub distance_raccordement_electrique: Option<f64>,
    /// Percent.
    pub taux_logements_vacants: Option<f64>,
}

impl SiteMeasurements {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Fill the bucketed criteria the caller left unknown. Explicit values are kept.
    pub fn apply_to(&self, input: &mut SiteInput) -> Result<(), MutabiliteError> {
        if let Some(value) = checked("surfaceSite", self.surface_site)? {
            if !input.surface_site.is_known() {
                input.surface_site = bucket_surface_site(value);
            }
        }
        if let Some(value) = checked("surfaceBati", self.surface_bati)? {
            if !input.surface_bati.is_known() {
                input.surface_bati = bucket_surface_bati(value);
            }
        }
        if let Some(value) = checked("distanceAutoroute", self.distance_autoroute)? {
            if !input.distance_autoroute.is_known() {
                input.distance_autoroute = bucket_distance_autoroute(value);
            }
        }
        if let Some(value) = checked("distanceTransportCommun", self.distance_transport_commun)? {
            if !input.distance_transport_commun.is_known() {
                input.distance_transport_commun = bucket_distance_transport(value);
            }
        }
        if let Some(value) = checked(
            "distanceRaccordementElectrique",
            self.distance_raccordement_electrique,
        )? {
            if !input.distance_raccordement_electrique.is_known() {
                input.distance_raccordement_electrique = bucket_raccordement(value);
            }
        }
        if let Some(value) = checked("tauxLogementsVacants", self.taux_logements_vacants)? {
            if !input.taux_logements_vacants.is_known() {
                input.taux_logements_vacants = bucket_logements_vacants(value);
            }
        }
        Ok(())
    }
}

fn checked(field: &'static str, value: Option<f64>) -> Result<Option<f64>, MutabiliteError> {
    match value {
        Some(value) if !value.is_finite() || value < 0.0 => {
            Err(MutabiliteError::InvalidMeasurement { field, value })
        }
        other => Ok(other),
    }
}

pub fn bucket_surface_site(square_metres: f64) -> SurfaceSite {
    if square_metres < 10_000.0 {
        SurfaceSite::MoinsDe1Ha
    } else if square_metres < 50_000.0 {
        SurfaceSite::De1A5Ha
    } else if square_metres < 150_000.0 {
        SurfaceSite::De5A15Ha
    } else {
        SurfaceSite::PlusDe15Ha
    }
}

pub fn bucket_surface_bati(square_metres: f64) -> SurfaceBati {
    if square_metres == 0.0 {
        SurfaceBati::PasDeBati
    } else if square_metres < 1_000.0 {
        SurfaceBati::MoinsDe1000M2
    } else if square_metres <= 10_000.0 {
        SurfaceBati::De1000A10000M2
    } else {
        SurfaceBati::PlusDe10000M2
    }
}

pub fn bucket_distance_autoroute(km: f64) -> DistanceAutoroute {
    if km < 1.0 {
        DistanceAutoroute::MoinsDe1Km
    } else if km < 2.0 {
        DistanceAutoroute::De1A2Km
    } else if km < 5.0 {
        DistanceAutoroute::De2A5Km
    } else {
        DistanceAutoroute::PlusDe5Km
    }
}

pub fn bucket_distance_transport(metres: f64) -> DistanceTransportCommun {
    if metres < 500.0 {
        DistanceTransportCommun::MoinsDe500M
    } else {
        DistanceTransportCommun::PlusDe500M
    }
}

pub fn bucket_raccordement(km: f64) -> DistanceRaccordementElectrique {
    if km < 1.0 {
        DistanceRaccordementElectrique::MoinsDe1Km
    } else if km < 5.0 {
        DistanceRaccordementElectrique::De1A5Km
    } else {
        DistanceRaccordementElectrique::PlusDe5Km
    }
}

pub fn bucket_logements_vacants(percent: f64) -> TauxLogementsVacants {
    if percent < 4.0 {
        TauxLogementsVacants::MoinsDe4
    } else if percent <= 10.0 {
        TauxLogementsVacants::De4A10
    } else {
        TauxLogementsVacants::PlusDe10
    }
}
