//! Cotisation Mensuelle Model
//!
//! One member's twelve-month payment record for one due type in one year.
//! The four derived totals are always recomputed through
//! [`crate::calculations`] before a record is persisted or returned.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculations;

/// Calendar month, serialized as the lowercase French key used in `mois`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Month {
    Janvier,
    Fevrier,
    Mars,
    Avril,
    Mai,
    Juin,
    Juillet,
    Aout,
    Septembre,
    Octobre,
    Novembre,
    Decembre,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::Janvier,
        Month::Fevrier,
        Month::Mars,
        Month::Avril,
        Month::Mai,
        Month::Juin,
        Month::Juillet,
        Month::Aout,
        Month::Septembre,
        Month::Octobre,
        Month::Novembre,
        Month::Decembre,
    ];

    /// Lowercase key as stored in the `mois` object.
    pub fn key(self) -> &'static str {
        match self {
            Month::Janvier => "janvier",
            Month::Fevrier => "fevrier",
            Month::Mars => "mars",
            Month::Avril => "avril",
            Month::Mai => "mai",
            Month::Juin => "juin",
            Month::Juillet => "juillet",
            Month::Aout => "aout",
            Month::Septembre => "septembre",
            Month::Octobre => "octobre",
            Month::Novembre => "novembre",
            Month::Decembre => "decembre",
        }
    }

    /// Display label for reports (accented French).
    pub fn label(self) -> &'static str {
        match self {
            Month::Janvier => "Janvier",
            Month::Fevrier => "Février",
            Month::Mars => "Mars",
            Month::Avril => "Avril",
            Month::Mai => "Mai",
            Month::Juin => "Juin",
            Month::Juillet => "Juillet",
            Month::Aout => "Août",
            Month::Septembre => "Septembre",
            Month::Octobre => "Octobre",
            Month::Novembre => "Novembre",
            Month::Decembre => "Décembre",
        }
    }
}

/// Twelve monthly payment amounts. Missing keys deserialize as 0.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Mois {
    pub janvier: f64,
    pub fevrier: f64,
    pub mars: f64,
    pub avril: f64,
    pub mai: f64,
    pub juin: f64,
    pub juillet: f64,
    pub aout: f64,
    pub septembre: f64,
    pub octobre: f64,
    pub novembre: f64,
    pub decembre: f64,
}

impl Mois {
    pub fn get(&self, month: Month) -> f64 {
        match month {
            Month::Janvier => self.janvier,
            Month::Fevrier => self.fevrier,
            Month::Mars => self.mars,
            Month::Avril => self.avril,
            Month::Mai => self.mai,
            Month::Juin => self.juin,
            Month::Juillet => self.juillet,
            Month::Aout => self.aout,
            Month::Septembre => self.septembre,
            Month::Octobre => self.octobre,
            Month::Novembre => self.novembre,
            Month::Decembre => self.decembre,
        }
    }

    pub fn set(&mut self, month: Month, amount: f64) {
        match month {
            Month::Janvier => self.janvier = amount,
            Month::Fevrier => self.fevrier = amount,
            Month::Mars => self.mars = amount,
            Month::Avril => self.avril = amount,
            Month::Mai => self.mai = amount,
            Month::Juin => self.juin = amount,
            Month::Juillet => self.juillet = amount,
            Month::Aout => self.aout = amount,
            Month::Septembre => self.septembre = amount,
            Month::Octobre => self.octobre = amount,
            Month::Novembre => self.novembre = amount,
            Month::Decembre => self.decembre = amount,
        }
    }

    /// All twelve amounts in calendar order.
    pub fn values(&self) -> [f64; 12] {
        let mut out = [0.0; 12];
        for (slot, month) in out.iter_mut().zip(Month::ALL) {
            *slot = self.get(month);
        }
        out
    }
}

/// Partial update of the `mois` map; only supplied months are overwritten.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MoisPatch {
    pub janvier: Option<f64>,
    pub fevrier: Option<f64>,
    pub mars: Option<f64>,
    pub avril: Option<f64>,
    pub mai: Option<f64>,
    pub juin: Option<f64>,
    pub juillet: Option<f64>,
    pub aout: Option<f64>,
    pub septembre: Option<f64>,
    pub octobre: Option<f64>,
    pub novembre: Option<f64>,
    pub decembre: Option<f64>,
}

impl MoisPatch {
    pub fn get(&self, month: Month) -> Option<f64> {
        match month {
            Month::Janvier => self.janvier,
            Month::Fevrier => self.fevrier,
            Month::Mars => self.mars,
            Month::Avril => self.avril,
            Month::Mai => self.mai,
            Month::Juin => self.juin,
            Month::Juillet => self.juillet,
            Month::Aout => self.aout,
            Month::Septembre => self.septembre,
            Month::Octobre => self.octobre,
            Month::Novembre => self.novembre,
            Month::Decembre => self.decembre,
        }
    }

    pub fn apply(&self, mois: &mut Mois) {
        for month in Month::ALL {
            if let Some(amount) = self.get(month) {
                mois.set(month, amount);
            }
        }
    }
}

/// Monthly due record entity (cotisation mensuelle)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CotisationMensuelle {
    pub id: Uuid,
    pub adherent_id: Uuid,
    pub cotisation_id: Uuid,
    pub annee: i32,
    pub moyenne_cotisation: f64,
    pub mois: Mois,
    pub total_attendu: f64,
    pub total_versee: f64,
    pub retard: f64,
    pub avance: f64,
}

impl CotisationMensuelle {
    /// Build a new record with a fresh id and computed totals.
    pub fn new(
        adherent_id: Uuid,
        cotisation_id: Uuid,
        annee: i32,
        moyenne_cotisation: f64,
        mois: Mois,
    ) -> Self {
        let mut record = Self {
            id: Uuid::new_v4(),
            adherent_id,
            cotisation_id,
            annee,
            moyenne_cotisation,
            mois,
            total_attendu: 0.0,
            total_versee: 0.0,
            retard: 0.0,
            avance: 0.0,
        };
        record.recompute();
        record
    }

    /// Recompute the four derived totals from the current average and months.
    pub fn recompute(&mut self) {
        let attendu = calculations::total_attendu(self.moyenne_cotisation);
        let versee = calculations::total_versee(&self.mois);
        self.total_attendu = attendu;
        self.total_versee = versee;
        self.retard = calculations::retard(attendu, versee);
        self.avance = calculations::avance(attendu, versee);
    }

    /// Merge the supplied fields of an update, then recompute the totals.
    pub fn apply_update(&mut self, update: &CotisationMensuelleUpdate) {
        if let Some(moyenne) = update.moyenne_cotisation {
            self.moyenne_cotisation = moyenne;
        }
        if let Some(patch) = &update.mois {
            patch.apply(&mut self.mois);
        }
        self.recompute();
    }
}

/// Create monthly record payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CotisationMensuelleCreate {
    pub adherent_id: Uuid,
    pub cotisation_id: Uuid,
    pub annee: i32,
    pub moyenne_cotisation: f64,
    #[serde(default)]
    pub mois: Mois,
}

/// Update monthly record payload (partial patch, totals are derived)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CotisationMensuelleUpdate {
    pub moyenne_cotisation: Option<f64>,
    pub mois: Option<MoisPatch>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mois_deserializes_missing_months_as_zero() {
        let mois: Mois = serde_json::from_str(r#"{"janvier": 50.0, "juin": 25.5}"#).unwrap();
        assert_eq!(mois.janvier, 50.0);
        assert_eq!(mois.juin, 25.5);
        assert_eq!(mois.decembre, 0.0);
    }

    #[test]
    fn patch_overwrites_only_supplied_months() {
        let mut mois = Mois {
            janvier: 10.0,
            fevrier: 20.0,
            ..Default::default()
        };
        let patch = MoisPatch {
            fevrier: Some(0.0),
            mars: Some(30.0),
            ..Default::default()
        };
        patch.apply(&mut mois);
        assert_eq!(mois.janvier, 10.0);
        assert_eq!(mois.fevrier, 0.0);
        assert_eq!(mois.mars, 30.0);
    }

    #[test]
    fn update_keeps_moyenne_when_only_months_supplied() {
        let mut record = CotisationMensuelle::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            2024,
            100.0,
            Mois::default(),
        );
        let id = record.id;
        record.apply_update(&CotisationMensuelleUpdate {
            moyenne_cotisation: None,
            mois: Some(MoisPatch {
                janvier: Some(100.0),
                ..Default::default()
            }),
        });
        assert_eq!(record.id, id);
        assert_eq!(record.moyenne_cotisation, 100.0);
        assert_eq!(record.total_versee, 100.0);
        assert_eq!(record.retard, 1100.0);
    }

    #[test]
    fn wire_format_uses_french_camel_case() {
        let record = CotisationMensuelle::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            2024,
            50.0,
            Mois::default(),
        );
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("adherentId").is_some());
        assert!(json.get("moyenneCotisation").is_some());
        assert!(json.get("totalAttendu").is_some());
        assert_eq!(json["totalAttendu"], serde_json::json!(600.0));
    }
}
