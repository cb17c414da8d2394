use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Identifier wrapper for catalog symptoms.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymptomId(pub String);

impl SymptomId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SymptomId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for SymptomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub const DEFAULT_SYMPTOM_WEIGHT: u32 = 1;
pub const DEFAULT_SYMPTOM_CATEGORY: &str = "Geral";

/// Reportable symptom with the severity weight used by the scoring engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symptom {
    pub id: SymptomId,
    pub name: String,
    pub weight: u32,
    pub category: String,
}

/// Key selecting one of the guidance messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKey {
    Emergencia,
    Upa,
    Ubs,
}

impl MessageKey {
    pub const fn as_str(self) -> &'static str {
        match self {
            MessageKey::Emergencia => "emergencia",
            MessageKey::Upa => "upa",
            MessageKey::Ubs => "ubs",
        }
    }
}

pub const DEFAULT_GUIDANCE_MESSAGE: &str = "Procure atendimento se necessário.";

/// Alert signals, destination messages and general tips published alongside the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GuidanceSet {
    pub alert_signal_ids: BTreeSet<SymptomId>,
    pub messages: BTreeMap<String, String>,
    pub general_tips: Vec<String>,
}

impl GuidanceSet {
    pub fn is_alert_signal(&self, id: &SymptomId) -> bool {
        self.alert_signal_ids.contains(id)
    }

    /// Message for the key, or the generic advice when the set does not carry it.
    pub fn message(&self, key: MessageKey) -> &str {
        self.messages
            .get(key.as_str())
            .map(String::as_str)
            .unwrap_or(DEFAULT_GUIDANCE_MESSAGE)
    }
}

/// Facility category; doubles as the destination type of a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitType {
    Hospital,
    Upa,
    Ubs,
}

impl UnitType {
    pub const ALL: [UnitType; 3] = [UnitType::Hospital, UnitType::Upa, UnitType::Ubs];

    pub const fn as_str(self) -> &'static str {
        match self {
            UnitType::Hospital => "hospital",
            UnitType::Upa => "upa",
            UnitType::Ubs => "ubs",
        }
    }

    /// Label shown next to a recommendation; the hospital tier also points at urgent care.
    pub const fn destination_label(self) -> &'static str {
        match self {
            UnitType::Hospital => "UPA/Hospital",
            UnitType::Upa => "UPA",
            UnitType::Ubs => "UBS",
        }
    }
}

impl fmt::Display for UnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown unit type '{0}' (expected hospital, upa or ubs)")]
pub struct UnknownUnitType(pub String);

impl FromStr for UnitType {
    type Err = UnknownUnitType;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "hospital" => Ok(UnitType::Hospital),
            "upa" => Ok(UnitType::Upa),
            "ubs" => Ok(UnitType::Ubs),
            _ => Err(UnknownUnitType(value.to_string())),
        }
    }
}

/// Public-health facility listed by the municipal directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthUnit {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub unit_type: UnitType,
    pub address: String,
    pub neighborhood: String,
    pub hours: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
}

const MAPS_SEARCH_URL: &str = "https://www.google.com/maps/search/";

impl HealthUnit {
    pub fn has_coordinates(&self) -> bool {
        self.lat.is_some() && self.lng.is_some()
    }

    /// Map search link for the unit, keyed on the address and falling back to the name.
    pub fn maps_url(&self) -> String {
        let query = if self.address.trim().is_empty() {
            self.name.as_str()
        } else {
            self.address.as_str()
        };

        match reqwest::Url::parse_with_params(MAPS_SEARCH_URL, &[("api", "1"), ("query", query)]) {
            Ok(url) => url.to_string(),
            Err(_) => MAPS_SEARCH_URL.to_string(),
        }
    }
}

/// Symptom ids chosen during one interaction session.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectionSet {
    ids: BTreeSet<SymptomId>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip membership of `id`, returning whether it is selected afterwards.
    pub fn toggle(&mut self, id: SymptomId) -> bool {
        if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }

    pub fn select(&mut self, id: SymptomId) -> bool {
        self.ids.insert(id)
    }

    pub fn deselect(&mut self, id: &SymptomId) -> bool {
        self.ids.remove(id)
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn contains(&self, id: &SymptomId) -> bool {
        self.ids.contains(id)
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SymptomId> {
        self.ids.iter()
    }
}

impl<I: Into<SymptomId>> FromIterator<I> for SelectionSet {
    fn from_iter<T: IntoIterator<Item = I>>(iter: T) -> Self {
        Self {
            ids: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<String> for SymptomId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Urgency tier of a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UrgencyLevel {
    High,
    Moderate,
    Low,
}

impl UrgencyLevel {
    pub const fn label(self) -> &'static str {
        match self {
            UrgencyLevel::High => "Alta urgência",
            UrgencyLevel::Moderate => "Urgência moderada",
            UrgencyLevel::Low => "Baixa urgência",
        }
    }
}

/// Classification derived from a score and alert flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub urgency_level: UrgencyLevel,
    pub destination_type: UnitType,
    pub message_key: MessageKey,
}

impl Recommendation {
    pub const EMERGENCY: Recommendation = Recommendation {
        urgency_level: UrgencyLevel::High,
        destination_type: UnitType::Hospital,
        message_key: MessageKey::Emergencia,
    };

    pub const URGENT_CARE: Recommendation = Recommendation {
        urgency_level: UrgencyLevel::Moderate,
        destination_type: UnitType::Upa,
        message_key: MessageKey::Upa,
    };

    pub const PRIMARY_CARE: Recommendation = Recommendation {
        urgency_level: UrgencyLevel::Low,
        destination_type: UnitType::Ubs,
        message_key: MessageKey::Ubs,
    };
}
