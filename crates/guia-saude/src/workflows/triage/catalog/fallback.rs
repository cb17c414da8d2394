use async_trait::async_trait;

use super::super::domain::{GuidanceSet, HealthUnit, Symptom, SymptomId, UnitType};
use super::{CatalogError, CatalogSource};

struct SymptomSeed {
    id: &'static str,
    name: &'static str,
    weight: u32,
    category: &'static str,
}

const SYMPTOMS: &[SymptomSeed] = &[
    SymptomSeed {
        id: "febre",
        name: "Febre",
        weight: 2,
        category: "Geral",
    },
    SymptomSeed {
        id: "tosse",
        name: "Tosse",
        weight: 1,
        category: "Respiratório",
    },
    SymptomSeed {
        id: "dor_garganta",
        name: "Dor de garganta",
        weight: 1,
        category: "Respiratório",
    },
    SymptomSeed {
        id: "dor_cabeca",
        name: "Dor de cabeça",
        weight: 1,
        category: "Geral",
    },
    SymptomSeed {
        id: "vomitos",
        name: "Vômitos persistentes",
        weight: 2,
        category: "Gastro",
    },
    SymptomSeed {
        id: "diarreia",
        name: "Diarreia",
        weight: 1,
        category: "Gastro",
    },
    SymptomSeed {
        id: "dor_abdominal_intensa",
        name: "Dor abdominal intensa",
        weight: 3,
        category: "Gastro",
    },
    SymptomSeed {
        id: "falta_ar",
        name: "Falta de ar",
        weight: 5,
        category: "Alerta",
    },
    SymptomSeed {
        id: "dor_peito",
        name: "Dor forte no peito",
        weight: 6,
        category: "Alerta",
    },
    SymptomSeed {
        id: "desmaio_confusao",
        name: "Desmaio/confusão",
        weight: 6,
        category: "Alerta",
    },
];

const ALERT_SIGNALS: &[&str] = &["falta_ar", "dor_peito", "desmaio_confusao"];

const MESSAGES: &[(&str, &str)] = &[
    (
        "emergencia",
        "Procure atendimento imediato (UPA/Hospital). Se possível, peça ajuda e não dirija se estiver mal.",
    ),
    (
        "upa",
        "Procure uma UPA/atendimento de urgência para avaliação em tempo curto.",
    ),
    (
        "ubs",
        "Procure uma UBS/atenção primária para avaliação e orientações.",
    ),
];

const GENERAL_TIPS: &[&str] = &[
    "Mantenha hidratação (se tolerado).",
    "Descanse e observe evolução dos sintomas.",
    "Se piorar, procure atendimento.",
];

const WEEKDAY_HOURS: &str = "SEGUNDA À QUINTA: 7:30–11:30 / 13:30–17:30; SEXTA: 7:30–13:30";

struct UnitSeed {
    id: &'static str,
    name: &'static str,
    unit_type: UnitType,
    address: &'static str,
    neighborhood: &'static str,
    hours: &'static str,
    email: Option<&'static str>,
}

const UNITS: &[UnitSeed] = &[
    UnitSeed {
        id: "13",
        name: "Hospital Municipal Dr. Eudásio Barroso",
        unit_type: UnitType::Hospital,
        address: "RUA DOUTOR EUDASIO BARROSO, 2324 - CENTRO - EM FRENTE A PRAÇA - QUIXADÁ",
        neighborhood: "Centro",
        hours: "24 H",
        email: None,
    },
    UnitSeed {
        id: "97",
        name: "UPA 24H de Quixadá",
        unit_type: UnitType::Upa,
        address: "RUA DOS VOLUNTARIOS, SN - PLANALTO RENASCER - QUIXADÁ",
        neighborhood: "Planalto Renascer",
        hours: "SEMPRE ABERTO",
        email: None,
    },
    UnitSeed {
        id: "17",
        name: "Posto de Saúde do Centro",
        unit_type: UnitType::Ubs,
        address: "RUA EPITACIO PESSOA, S/N - CENTRO - ZONA URBANA - QUIXADÁ",
        neighborhood: "Centro",
        hours: WEEKDAY_HOURS,
        email: None,
    },
    UnitSeed {
        id: "18",
        name: "Posto de Saúde do Combate",
        unit_type: UnitType::Ubs,
        address: "RUA JOSÉ ENEAS MONTEIRO LESSA, S/N - COMBATE - ZONA URBANA - QUIXADÁ",
        neighborhood: "Combate",
        hours: WEEKDAY_HOURS,
        email: None,
    },
    UnitSeed {
        id: "92",
        name: "UBS de Carrascal",
        unit_type: UnitType::Ubs,
        address: "RUA JOSE DE QUEIROZ PESSOA, 3641 - CARRASCAL - QUIXADÁ",
        neighborhood: "Carrascal",
        hours: WEEKDAY_HOURS,
        email: None,
    },
    UnitSeed {
        id: "1",
        name: "UBS Eliezer Fortes Magalhães (Cipó dos Anjos)",
        unit_type: UnitType::Ubs,
        address: "DISTRITO CIPÓ DOS ANJOS, SN - CIPÓ DOS ANJOS - QUIXADÁ",
        neighborhood: "Cipó dos Anjos",
        hours: "07:30 AS 17:00",
        email: Some("cipodosanjosubs@gmail.com"),
    },
];

const SOURCE_URL_PREFIX: &str = "https://quixada.ce.gov.br/unidadesaude.php?id=";

/// Bundled dataset of the Quixadá municipal network, used when the live catalog is down.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackCatalog;

impl FallbackCatalog {
    pub fn symptoms(&self) -> Vec<Symptom> {
        SYMPTOMS
            .iter()
            .map(|seed| Symptom {
                id: SymptomId::from(seed.id),
                name: seed.name.to_string(),
                weight: seed.weight,
                category: seed.category.to_string(),
            })
            .collect()
    }

    pub fn guidance(&self) -> GuidanceSet {
        GuidanceSet {
            alert_signal_ids: ALERT_SIGNALS.iter().copied().map(SymptomId::from).collect(),
            messages: MESSAGES
                .iter()
                .map(|(key, text)| (key.to_string(), text.to_string()))
                .collect(),
            general_tips: GENERAL_TIPS.iter().map(|tip| tip.to_string()).collect(),
        }
    }

    /// Bundled units, restricted to `unit_type` when given.
    pub fn units(&self, unit_type: Option<UnitType>) -> Vec<HealthUnit> {
        UNITS
            .iter()
            .filter(|seed| unit_type.map_or(true, |wanted| seed.unit_type == wanted))
            .map(|seed| HealthUnit {
                id: seed.id.to_string(),
                name: seed.name.to_string(),
                unit_type: seed.unit_type,
                address: seed.address.to_string(),
                neighborhood: seed.neighborhood.to_string(),
                hours: seed.hours.to_string(),
                phone: None,
                email: seed.email.map(str::to_string),
                source_url: Some(format!("{SOURCE_URL_PREFIX}{}", seed.id)),
                lat: None,
                lng: None,
            })
            .collect()
    }
}

#[async_trait]
impl CatalogSource for FallbackCatalog {
    async fn fetch_symptoms(&self) -> Result<Vec<Symptom>, CatalogError> {
        Ok(self.symptoms())
    }

    async fn fetch_guidance(&self) -> Result<GuidanceSet, CatalogError> {
        Ok(self.guidance())
    }

    async fn fetch_units(
        &self,
        unit_type: Option<UnitType>,
    ) -> Result<Vec<HealthUnit>, CatalogError> {
        Ok(self.units(unit_type))
    }
}
