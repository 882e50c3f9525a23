//! Closed value domains for every scored criterion.
//!
//! Each criterion is a dedicated enum whose variants are the only legal inputs, plus the
//! `NeSaitPas` sentinel that every domain carries. The `criteria!` invocation below is the
//! single place where a criterion, its wire key, its label and its values are declared; the
//! weights and impacts live in the catalog tables.

use serde::{Deserialize, Serialize};

/// Wire code of the unknown sentinel shared by every domain.
pub const UNKNOWN_CODE: &str = "ne-sait-pas";
const UNKNOWN_LABEL: &str = "Ne sait pas";

macro_rules! criteria {
    ($(
        $(#[$doc:meta])*
        $key:ident($field:ident, $wire:literal, $label:literal) {
            $($variant:ident = $code:literal => $vlabel:literal,)+
        }
    )+) => {
        $(
            $(#[$doc])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
            pub enum $key {
                $(
                    #[serde(rename = $code)]
                    $variant,
                )+
                #[default]
                #[serde(rename = "ne-sait-pas")]
                NeSaitPas,
            }

            impl $key {
                /// Every value except the unknown sentinel, in declaration order.
                pub const KNOWN: &'static [Self] = &[$(Self::$variant),+];

                pub const fn code(self) -> &'static str {
                    match self {
                        $(Self::$variant => $code,)+
                        Self::NeSaitPas => UNKNOWN_CODE,
                    }
                }

                pub const fn label(self) -> &'static str {
                    match self {
                        $(Self::$variant => $vlabel,)+
                        Self::NeSaitPas => UNKNOWN_LABEL,
                    }
                }

                pub const fn is_known(self) -> bool {
                    !matches!(self, Self::NeSaitPas)
                }

                pub fn from_code(code: &str) -> Option<Self> {
                    match code {
                        $($code => Some(Self::$variant),)+
                        UNKNOWN_CODE => Some(Self::NeSaitPas),
                        _ => None,
                    }
                }
            }
        )+

        /// Stable identifier of a scored criterion.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum CriterionKey {
            $(
                #[serde(rename = $wire)]
                $key,
            )+
        }

        impl CriterionKey {
            /// Catalog declaration order; explanations break ties in this order.
            pub const ALL: &'static [Self] = &[$(Self::$key),+];

            pub const fn key(self) -> &'static str {
                match self {
                    $(Self::$key => $wire,)+
                }
            }

            pub const fn label(self) -> &'static str {
                match self {
                    $(Self::$key => $label,)+
                }
            }

            pub fn from_key(raw: &str) -> Option<Self> {
                match raw {
                    $($wire => Some(Self::$key),)+
                    _ => None,
                }
            }

            /// Codes of the known values, in declaration order.
            pub fn known_codes(self) -> Vec<&'static str> {
                match self {
                    $(Self::$key => $key::KNOWN.iter().map(|value| value.code()).collect(),)+
                }
            }

            /// Whether `code` belongs to the domain, unknown sentinel included.
            pub fn accepts(self, code: &str) -> bool {
                self.value_label(code).is_some()
            }

            pub fn value_label(self, code: &str) -> Option<&'static str> {
                match self {
                    $(Self::$key => $key::from_code(code).map($key::label),)+
                }
            }
        }

        /// Bucketed description of one friche, one field per criterion.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
        #[serde(default, deny_unknown_fields)]
        pub struct SiteInput {
            $(
                #[serde(rename = $wire)]
                pub $field: $key,
            )+
        }

        impl SiteInput {
            /// Wire code currently held for `key`.
            pub fn code(&self, key: CriterionKey) -> &'static str {
                match key {
                    $(CriterionKey::$key => self.$field.code(),)+
                }
            }

            pub fn is_known(&self, key: CriterionKey) -> bool {
                match key {
                    $(CriterionKey::$key => self.$field.is_known(),)+
                }
            }

            /// Assign `key` from a wire code. Returns `false` when the code is outside the domain.
            pub fn set_code(&mut self, key: CriterionKey, code: &str) -> bool {
                match key {
                    $(
                        CriterionKey::$key => match $key::from_code(code) {
                            Some(value) => {
                                self.$field = value;
                                true
                            }
                            None => false,
                        },
                    )+
                }
            }
        }
    };
}

criteria! {
    /// Parcel surface, bucketed from square metres.
    SurfaceSite(surface_site, "surfaceSite", "Surface du site") {
        MoinsDe1Ha = "moins-de-1ha" => "Moins de 1 ha",
        De1A5Ha = "de-1-a-5ha" => "De 1 à 5 ha",
        De5A15Ha = "de-5-a-15ha" => "De 5 à 15 ha",
        PlusDe15Ha = "plus-de-15ha" => "Plus de 15 ha",
    }
    /// Built footprint, bucketed from square metres.
    SurfaceBati(surface_bati, "surfaceBati", "Surface bâtie") {
        PasDeBati = "pas-de-bati" => "Pas de bâti",
        MoinsDe1000M2 = "moins-de-1000m2" => "Moins de 1 000 m²",
        De1000A10000M2 = "de-1000-a-10000m2" => "De 1 000 à 10 000 m²",
        PlusDe10000M2 = "plus-de-10000m2" => "Plus de 10 000 m²",
    }
    SiteEnCentreVille(site_en_centre_ville, "siteEnCentreVille", "Site en centre-ville") {
        Oui = "oui" => "Oui",
        Non = "non" => "Non",
    }
    DistanceAutoroute(distance_autoroute, "distanceAutoroute", "Distance à une entrée d'autoroute") {
        MoinsDe1Km = "moins-de-1km" => "Moins de 1 km",
        De1A2Km = "de-1-a-2km" => "De 1 à 2 km",
        De2A5Km = "de-2-a-5km" => "De 2 à 5 km",
        PlusDe5Km = "plus-de-5km" => "Plus de 5 km",
    }
    DistanceTransportCommun(distance_transport_commun, "distanceTransportCommun", "Distance à un arrêt de transport en commun") {
        MoinsDe500M = "moins-de-500m" => "Moins de 500 m",
        PlusDe500M = "plus-de-500m" => "Plus de 500 m",
    }
    ProximiteCommercesServices(proximite_commerces_services, "proximiteCommercesServices", "Proximité des commerces et services") {
        Oui = "oui" => "Oui",
        Non = "non" => "Non",
    }
    DistanceRaccordementElectrique(distance_raccordement_electrique, "distanceRaccordementElectrique", "Distance au raccordement électrique") {
        MoinsDe1Km = "moins-de-1km" => "Moins de 1 km",
        De1A5Km = "de-1-a-5km" => "De 1 à 5 km",
        PlusDe5Km = "plus-de-5km" => "Plus de 5 km",
    }
    /// Share of vacant dwellings in the municipality, in percent.
    TauxLogementsVacants(taux_logements_vacants, "tauxLogementsVacants", "Taux de logements vacants") {
        MoinsDe4 = "moins-de-4" => "Moins de 4 %",
        De4A10 = "de-4-a-10" => "De 4 à 10 %",
        PlusDe10 = "plus-de-10" => "Plus de 10 %",
    }
    PresenceRisquesTechnologiques(presence_risques_technologiques, "presenceRisquesTechnologiques", "Présence de risques technologiques") {
        Oui = "oui" => "Oui",
        Non = "non" => "Non",
    }
    PresenceRisquesNaturels(presence_risques_naturels, "presenceRisquesNaturels", "Présence de risques naturels") {
        Aucun = "aucun" => "Aucun",
        Faible = "faible" => "Faible",
        Moyen = "moyen" => "Moyen",
        Fort = "fort" => "Fort",
    }
    ZonageEnvironnemental(zonage_environnemental, "zonageEnvironnemental", "Zonage environnemental") {
        HorsZone = "hors-zone" => "Hors zone",
        Natura2000 = "natura-2000" => "Natura 2000",
        Znieff = "znieff" => "ZNIEFF",
        ParcNaturel = "parc-naturel" => "Parc naturel",
        ReserveNaturelle = "reserve-naturelle" => "Réserve naturelle",
    }
    ZonageReglementaire(zonage_reglementaire, "zonageReglementaire", "Zonage réglementaire") {
        ZoneUrbaine = "zone-urbaine" => "Zone urbaine (U)",
        ZoneAUrbaniser = "zone-a-urbaniser" => "Zone à urbaniser (AU)",
        ZoneActivites = "zone-activites" => "Zone d'activités",
        ZoneAgricole = "zone-agricole" => "Zone agricole (A)",
        ZoneNaturelle = "zone-naturelle" => "Zone naturelle (N)",
    }
    ZonagePatrimonial(zonage_patrimonial, "zonagePatrimonial", "Zonage patrimonial") {
        NonConcerne = "non-concerne" => "Non concerné",
        MonumentHistorique = "monument-historique" => "Périmètre de monument historique",
        SiteInscritClasse = "site-inscrit-classe" => "Site inscrit ou classé",
    }
    /// Position relative to the green and blue ecological network.
    TrameVerteEtBleue(trame_verte_et_bleue, "trameVerteEtBleue", "Trame verte et bleue") {
        HorsTrame = "hors-trame" => "Hors trame",
        ReservoirBiodiversite = "reservoir-biodiversite" => "Réservoir de biodiversité",
        CorridorARestaurer = "corridor-a-restaurer" => "Corridor à restaurer",
        CorridorAPreserver = "corridor-a-preserver" => "Corridor à préserver",
    }
    PresenceEspeceProtegee(presence_espece_protegee, "presenceEspeceProtegee", "Présence d'espèces protégées") {
        Oui = "oui" => "Oui",
        Non = "non" => "Non",
    }
    ZoneHumide(zone_humide, "zoneHumide", "Zone humide") {
        Oui = "oui" => "Oui",
        Non = "non" => "Non",
    }
    TypeProprietaire(type_proprietaire, "typeProprietaire", "Type de propriétaire") {
        Public = "public" => "Public",
        Prive = "prive" => "Privé",
        Mixte = "mixte" => "Mixte",
        CoproIndivision = "copro-indivision" => "Copropriété ou indivision",
    }
    RaccordementEau(raccordement_eau, "raccordementEau", "Raccordement aux réseaux d'eau") {
        Oui = "oui" => "Oui",
        Non = "non" => "Non",
    }
    EtatBatiInfrastructure(etat_bati_infrastructure, "etatBatiInfrastructure", "État du bâti et des infrastructures") {
        DegradationInexistante = "degradation-inexistante" => "Dégradation inexistante ou faible",
        DegradationMoyenne = "degradation-moyenne" => "Dégradation moyenne",
        DegradationHeterogene = "degradation-heterogene" => "Dégradation hétérogène",
        DegradationTresImportante = "degradation-tres-importante" => "Dégradation très importante",
    }
    PresencePollution(presence_pollution, "presencePollution", "Présence de pollution") {
        Non = "non" => "Non",
        DejaGeree = "deja-geree" => "Oui, déjà gérée",
        OuiComposesVolatils = "oui-composes-volatils" => "Oui, composés volatils",
        OuiAutresComposes = "oui-autres-composes" => "Oui, autres composés",
    }
    ValeurArchitecturaleHistorique(valeur_architecturale_historique, "valeurArchitecturaleHistorique", "Valeur architecturale et historique") {
        SansInteret = "sans-interet" => "Sans intérêt",
        Ordinaire = "ordinaire" => "Ordinaire",
        InteretRemarquable = "interet-remarquable" => "Intérêt remarquable",
    }
    QualitePaysage(qualite_paysage, "qualitePaysage", "Qualité du paysage") {
        SansInteret = "sans-interet" => "Sans intérêt",
        Ordinaire = "ordinaire" => "Ordinaire",
        InteretRemarquable = "interet-remarquable" => "Intérêt remarquable",
    }
    QualiteVoieDesserte(qualite_voie_desserte, "qualiteVoieDesserte", "Qualité de la voie de desserte") {
        Accessible = "accessible" => "Accessible",
        Degradee = "degradee" => "Dégradée",
        PeuAccessible = "peu-accessible" => "Peu accessible",
    }
    /// Listed in the national registry of polluted sites.
    SiteReferencePollue(site_reference_pollue, "siteReferencePollue", "Site référencé pollué") {
        Oui = "oui" => "Oui",
        Non = "non" => "Non",
    }
    /// Renewable-energy acceleration zone.
    ZoneAccelerationEnr(zone_acceleration_enr, "zoneAccelerationEnr", "Zone d'accélération des énergies renouvelables") {
        Oui = "oui" => "Oui",
        Non = "non" => "Non",
    }
    CouvertureVegetale(couverture_vegetale, "couvertureVegetale", "Couverture végétale") {
        SolImpermeabilise = "sol-impermeabilise" => "Sol imperméabilisé",
        VegetationRase = "vegetation-rase" => "Végétation rase",
        VegetationArbustive = "vegetation-arbustive" => "Végétation arbustive",
        VegetationArboree = "vegetation-arboree" => "Végétation arborée",
    }
}

impl SiteInput {
    /// Number of criteria holding a non-unknown value.
    pub fn known_count(&self) -> usize {
        CriterionKey::ALL
            .iter()
            .filter(|key| self.is_known(**key))
            .count()
    }
}
