//! Cotisation Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Due type entity (cotisation). `nom` is unique across the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Cotisation {
    pub id: Uuid,
    pub nom: String,
    pub description: String,
    pub date_creation: DateTime<Utc>,
    pub actif: bool,
}

impl Cotisation {
    /// Build a new active cotisation with a fresh id; text fields are trimmed.
    pub fn new(nom: &str, description: Option<&str>) -> Self {
        Self {
            id: Uuid::new_v4(),
            nom: nom.trim().to_string(),
            description: description.map(|d| d.trim().to_string()).unwrap_or_default(),
            date_creation: Utc::now(),
            actif: true,
        }
    }
}

/// Create cotisation payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CotisationCreate {
    pub nom: String,
    pub description: Option<String>,
}

/// Update cotisation payload (only supplied fields are applied)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CotisationUpdate {
    pub nom: Option<String>,
    pub description: Option<String>,
    pub actif: Option<bool>,
}

impl CotisationUpdate {
    /// Merge the supplied fields into an existing cotisation.
    pub fn apply(&self, cotisation: &mut Cotisation) {
        if let Some(nom) = &self.nom {
            cotisation.nom = nom.trim().to_string();
        }
        if let Some(description) = &self.description {
            cotisation.description = description.trim().to_string();
        }
        if let Some(actif) = self.actif {
            cotisation.actif = actif;
        }
    }
}
