//! JSON-file storage backend
//!
//! Legacy fallback used when no `DATABASE_URL` is configured. Each entity
//! lives in one JSON document under the data directory:
//!
//! - `adherents.json` — `{"adherents": [...]}`
//! - `cotisations.json` — `{"cotisations": [...]}`
//! - `cotisations-mensuelles.json` — `{"cotisationsMensuelles": [...]}`
//!
//! Every mutation is a whole-file read/modify/write serialized through an
//! in-process mutex, so concurrent requests within one server cannot lose
//! each other's writes. A missing file reads as the empty document.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use tokio::sync::Mutex;
use uuid::Uuid;

use shared::{Adherent, AdherentUpdate, Cotisation, CotisationMensuelle, CotisationUpdate};

use super::{MensuelleFilter, Store, StoreError, StoreResult};

const ADHERENTS_FILE: &str = "adherents.json";
const COTISATIONS_FILE: &str = "cotisations.json";
const MENSUELLES_FILE: &str = "cotisations-mensuelles.json";

#[derive(Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
struct AdherentsDoc {
    adherents: Vec<Adherent>,
}

#[derive(Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
struct CotisationsDoc {
    cotisations: Vec<Cotisation>,
}

#[derive(Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct MensuellesDoc {
    cotisations_mensuelles: Vec<CotisationMensuelle>,
}

/// File-based store over three JSON documents.
pub struct JsonFileStore {
    data_dir: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Open (and create if needed) the data directory.
    pub fn new(data_dir: impl AsRef<Path>) -> std::io::Result<Self> {
        let data_dir = data_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&data_dir)?;
        Ok(Self {
            data_dir,
            write_lock: Mutex::new(()),
        })
    }

    async fn read_doc<T: DeserializeOwned + Default>(&self, filename: &str) -> StoreResult<T> {
        let path = self.data_dir.join(filename);
        match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                StoreError::Storage(format!("Corrupt document {filename}: {e}"))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(T::default()),
            Err(e) => Err(StoreError::Storage(format!("Failed to read {filename}: {e}"))),
        }
    }

    async fn write_doc<T: Serialize>(&self, filename: &str, doc: &T) -> StoreResult<()> {
        let path = self.data_dir.join(filename);
        let json = serde_json::to_string_pretty(doc)
            .map_err(|e| StoreError::Storage(format!("Failed to serialize {filename}: {e}")))?;
        tokio::fs::write(&path, json)
            .await
            .map_err(|e| StoreError::Storage(format!("Failed to write {filename}: {e}")))?;
        Ok(())
    }
}

#[async_trait]
impl Store for JsonFileStore {
    // ── Adherents ───────────────────────────────────────────────────

    async fn list_adherents(&self) -> StoreResult<Vec<Adherent>> {
        let doc: AdherentsDoc = self.read_doc(ADHERENTS_FILE).await?;
        Ok(doc.adherents)
    }

    async fn find_adherent(&self, id: Uuid) -> StoreResult<Option<Adherent>> {
        let doc: AdherentsDoc = self.read_doc(ADHERENTS_FILE).await?;
        Ok(doc.adherents.into_iter().find(|a| a.id == id))
    }

    async fn create_adherent(&self, adherent: Adherent) -> StoreResult<Adherent> {
        let _guard = self.write_lock.lock().await;
        let mut doc: AdherentsDoc = self.read_doc(ADHERENTS_FILE).await?;
        doc.adherents.push(adherent.clone());
        self.write_doc(ADHERENTS_FILE, &doc).await?;
        Ok(adherent)
    }

    async fn update_adherent(&self, id: Uuid, patch: AdherentUpdate) -> StoreResult<Adherent> {
        let _guard = self.write_lock.lock().await;
        let mut doc: AdherentsDoc = self.read_doc(ADHERENTS_FILE).await?;
        let adherent = doc
            .adherents
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("Adherent {id} not found")))?;
        patch.apply(adherent);
        let updated = adherent.clone();
        self.write_doc(ADHERENTS_FILE, &doc).await?;
        Ok(updated)
    }

    async fn delete_adherent(&self, id: Uuid) -> StoreResult<bool> {
        let _guard = self.write_lock.lock().await;
        let mut doc: AdherentsDoc = self.read_doc(ADHERENTS_FILE).await?;
        let before = doc.adherents.len();
        doc.adherents.retain(|a| a.id != id);
        if doc.adherents.len() == before {
            return Ok(false);
        }
        self.write_doc(ADHERENTS_FILE, &doc).await?;
        Ok(true)
    }

    // ── Cotisations ─────────────────────────────────────────────────

    async fn list_cotisations(&self) -> StoreResult<Vec<Cotisation>> {
        let doc: CotisationsDoc = self.read_doc(COTISATIONS_FILE).await?;
        Ok(doc.cotisations)
    }

    async fn find_cotisation(&self, id: Uuid) -> StoreResult<Option<Cotisation>> {
        let doc: CotisationsDoc = self.read_doc(COTISATIONS_FILE).await?;
        Ok(doc.cotisations.into_iter().find(|c| c.id == id))
    }

    async fn create_cotisation(&self, cotisation: Cotisation) -> StoreResult<Cotisation> {
        let _guard = self.write_lock.lock().await;
        let mut doc: CotisationsDoc = self.read_doc(COTISATIONS_FILE).await?;
        if doc.cotisations.iter().any(|c| c.nom == cotisation.nom) {
            return Err(StoreError::Duplicate(format!(
                "Cotisation '{}' already exists",
                cotisation.nom
            )));
        }
        doc.cotisations.push(cotisation.clone());
        self.write_doc(COTISATIONS_FILE, &doc).await?;
        Ok(cotisation)
    }

    async fn update_cotisation(
        &self,
        id: Uuid,
        patch: CotisationUpdate,
    ) -> StoreResult<Cotisation> {
        let _guard = self.write_lock.lock().await;
        let mut doc: CotisationsDoc = self.read_doc(COTISATIONS_FILE).await?;

        if let Some(new_nom) = &patch.nom {
            let new_nom = new_nom.trim();
            if doc
                .cotisations
                .iter()
                .any(|c| c.id != id && c.nom == new_nom)
            {
                return Err(StoreError::Duplicate(format!(
                    "Cotisation '{new_nom}' already exists"
                )));
            }
        }

        let cotisation = doc
            .cotisations
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("Cotisation {id} not found")))?;
        patch.apply(cotisation);
        let updated = cotisation.clone();
        self.write_doc(COTISATIONS_FILE, &doc).await?;
        Ok(updated)
    }

    async fn delete_cotisation(&self, id: Uuid) -> StoreResult<bool> {
        let _guard = self.write_lock.lock().await;
        let mut doc: CotisationsDoc = self.read_doc(COTISATIONS_FILE).await?;
        let before = doc.cotisations.len();
        doc.cotisations.retain(|c| c.id != id);
        if doc.cotisations.len() == before {
            return Ok(false);
        }
        self.write_doc(COTISATIONS_FILE, &doc).await?;
        Ok(true)
    }

    // ── Cotisations mensuelles ──────────────────────────────────────

    async fn list_mensuelles(
        &self,
        filter: &MensuelleFilter,
    ) -> StoreResult<Vec<CotisationMensuelle>> {
        let doc: MensuellesDoc = self.read_doc(MENSUELLES_FILE).await?;
        let records = doc
            .cotisations_mensuelles
            .into_iter()
            .filter(|r| filter.annee.is_none_or(|annee| r.annee == annee))
            .filter(|r| filter.adherent_id.is_none_or(|id| r.adherent_id == id))
            .filter(|r| filter.cotisation_id.is_none_or(|id| r.cotisation_id == id))
            .filter(|r| filter.mois.is_none_or(|m| r.mois.get(m) > 0.0))
            .collect();
        Ok(records)
    }

    async fn find_mensuelle(&self, id: Uuid) -> StoreResult<Option<CotisationMensuelle>> {
        let doc: MensuellesDoc = self.read_doc(MENSUELLES_FILE).await?;
        Ok(doc.cotisations_mensuelles.into_iter().find(|r| r.id == id))
    }

    async fn create_mensuelle(
        &self,
        record: CotisationMensuelle,
    ) -> StoreResult<CotisationMensuelle> {
        let _guard = self.write_lock.lock().await;

        if self.find_adherent(record.adherent_id).await?.is_none() {
            return Err(StoreError::InvalidReference(format!(
                "Adherent {} not found",
                record.adherent_id
            )));
        }
        if self.find_cotisation(record.cotisation_id).await?.is_none() {
            return Err(StoreError::InvalidReference(format!(
                "Cotisation {} not found",
                record.cotisation_id
            )));
        }

        let mut doc: MensuellesDoc = self.read_doc(MENSUELLES_FILE).await?;
        let exists = doc.cotisations_mensuelles.iter().any(|r| {
            r.adherent_id == record.adherent_id
                && r.cotisation_id == record.cotisation_id
                && r.annee == record.annee
        });
        if exists {
            return Err(StoreError::Duplicate(format!(
                "A monthly record already exists for this adherent/cotisation/year ({})",
                record.annee
            )));
        }

        doc.cotisations_mensuelles.push(record.clone());
        self.write_doc(MENSUELLES_FILE, &doc).await?;
        Ok(record)
    }

    async fn save_mensuelle(
        &self,
        record: CotisationMensuelle,
    ) -> StoreResult<CotisationMensuelle> {
        let _guard = self.write_lock.lock().await;
        let mut doc: MensuellesDoc = self.read_doc(MENSUELLES_FILE).await?;
        let slot = doc
            .cotisations_mensuelles
            .iter_mut()
            .find(|r| r.id == record.id)
            .ok_or_else(|| {
                StoreError::NotFound(format!("Cotisation mensuelle {} not found", record.id))
            })?;
        *slot = record.clone();
        self.write_doc(MENSUELLES_FILE, &doc).await?;
        Ok(record)
    }

    async fn delete_mensuelle(&self, id: Uuid) -> StoreResult<bool> {
        let _guard = self.write_lock.lock().await;
        let mut doc: MensuellesDoc = self.read_doc(MENSUELLES_FILE).await?;
        let before = doc.cotisations_mensuelles.len();
        doc.cotisations_mensuelles.retain(|r| r.id != id);
        if doc.cotisations_mensuelles.len() == before {
            return Ok(false);
        }
        self.write_doc(MENSUELLES_FILE, &doc).await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{Mois, Month};

    fn store(dir: &tempfile::TempDir) -> JsonFileStore {
        JsonFileStore::new(dir.path()).unwrap()
    }

    #[tokio::test]
    async fn adherent_crud_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);

        let created = store
            .create_adherent(Adherent::new("Dupont", "Marie"))
            .await
            .unwrap();
        assert!(created.actif);

        let found = store.find_adherent(created.id).await.unwrap().unwrap();
        assert_eq!(found.nom, "Dupont");

        let updated = store
            .update_adherent(
                created.id,
                AdherentUpdate {
                    prenom: Some("  Jeanne ".into()),
                    actif: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.prenom, "Jeanne");
        assert!(!updated.actif);
        assert_eq!(updated.nom, "Dupont");

        assert!(store.delete_adherent(created.id).await.unwrap());
        assert!(!store.delete_adherent(created.id).await.unwrap());
        assert!(store.find_adherent(created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn data_survives_store_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let id = {
            let store = store(&dir);
            store
                .create_adherent(Adherent::new("Martin", "Paul"))
                .await
                .unwrap()
                .id
        };
        let reopened = JsonFileStore::new(dir.path()).unwrap();
        assert!(reopened.find_adherent(id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn duplicate_cotisation_name_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);

        store
            .create_cotisation(Cotisation::new("Adhésion annuelle", None))
            .await
            .unwrap();
        let err = store
            .create_cotisation(Cotisation::new("Adhésion annuelle", Some("bis")))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(_)));
    }

    #[tokio::test]
    async fn rename_onto_existing_cotisation_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);

        store
            .create_cotisation(Cotisation::new("Cotisation A", None))
            .await
            .unwrap();
        let b = store
            .create_cotisation(Cotisation::new("Cotisation B", None))
            .await
            .unwrap();

        let err = store
            .update_cotisation(
                b.id,
                CotisationUpdate {
                    nom: Some("Cotisation A".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(_)));
    }

    #[tokio::test]
    async fn mensuelle_requires_existing_parents_and_unique_triple() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);

        let adherent = store
            .create_adherent(Adherent::new("Durand", "Luc"))
            .await
            .unwrap();
        let cotisation = store
            .create_cotisation(Cotisation::new("Mensuelle", None))
            .await
            .unwrap();

        // Unknown adherent
        let orphan =
            CotisationMensuelle::new(Uuid::new_v4(), cotisation.id, 2024, 50.0, Mois::default());
        assert!(matches!(
            store.create_mensuelle(orphan).await.unwrap_err(),
            StoreError::InvalidReference(_)
        ));

        let record =
            CotisationMensuelle::new(adherent.id, cotisation.id, 2024, 50.0, Mois::default());
        store.create_mensuelle(record).await.unwrap();

        // Same triple again
        let duplicate =
            CotisationMensuelle::new(adherent.id, cotisation.id, 2024, 75.0, Mois::default());
        assert!(matches!(
            store.create_mensuelle(duplicate).await.unwrap_err(),
            StoreError::Duplicate(_)
        ));

        // Another year is fine
        let other_year =
            CotisationMensuelle::new(adherent.id, cotisation.id, 2025, 50.0, Mois::default());
        store.create_mensuelle(other_year).await.unwrap();
    }

    #[tokio::test]
    async fn list_filters_apply() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);

        let adherent = store
            .create_adherent(Adherent::new("Petit", "Anne"))
            .await
            .unwrap();
        let cotisation = store
            .create_cotisation(Cotisation::new("Standard", None))
            .await
            .unwrap();

        let paid = Mois {
            janvier: 50.0,
            ..Default::default()
        };
        store
            .create_mensuelle(CotisationMensuelle::new(
                adherent.id,
                cotisation.id,
                2024,
                50.0,
                paid,
            ))
            .await
            .unwrap();
        store
            .create_mensuelle(CotisationMensuelle::new(
                adherent.id,
                cotisation.id,
                2025,
                50.0,
                Mois::default(),
            ))
            .await
            .unwrap();

        let by_year = store
            .list_mensuelles(&MensuelleFilter {
                annee: Some(2024),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_year.len(), 1);

        let by_month = store
            .list_mensuelles(&MensuelleFilter {
                mois: Some(Month::Janvier),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_month.len(), 1);
        assert_eq!(by_month[0].annee, 2024);

        let by_adherent = store
            .list_mensuelles(&MensuelleFilter::for_adherent(adherent.id, 2025))
            .await
            .unwrap();
        assert_eq!(by_adherent.len(), 1);
        assert_eq!(by_adherent[0].annee, 2025);
    }

    #[tokio::test]
    async fn save_mensuelle_requires_existing_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);

        let ghost =
            CotisationMensuelle::new(Uuid::new_v4(), Uuid::new_v4(), 2024, 50.0, Mois::default());
        assert!(matches!(
            store.save_mensuelle(ghost).await.unwrap_err(),
            StoreError::NotFound(_)
        ));
    }
}
