//! Adherent Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Member entity (adhérent)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Adherent {
    pub id: Uuid,
    pub nom: String,
    pub prenom: String,
    pub date_creation: DateTime<Utc>,
    pub actif: bool,
}

impl Adherent {
    /// Build a new active adherent with a fresh id; names are trimmed.
    pub fn new(nom: &str, prenom: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            nom: nom.trim().to_string(),
            prenom: prenom.trim().to_string(),
            date_creation: Utc::now(),
            actif: true,
        }
    }
}

/// Create adherent payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdherentCreate {
    pub nom: String,
    pub prenom: String,
}

/// Update adherent payload (only supplied fields are applied)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AdherentUpdate {
    pub nom: Option<String>,
    pub prenom: Option<String>,
    pub actif: Option<bool>,
}

impl AdherentUpdate {
    /// Merge the supplied fields into an existing adherent.
    pub fn apply(&self, adherent: &mut Adherent) {
        if let Some(nom) = &self.nom {
            adherent.nom = nom.trim().to_string();
        }
        if let Some(prenom) = &self.prenom {
            adherent.prenom = prenom.trim().to_string();
        }
        if let Some(actif) = self.actif {
            adherent.actif = actif;
        }
    }
}
