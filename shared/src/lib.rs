//! Shared domain types for the dues management backend.
//!
//! - `models`: wire-format entities (adherents, cotisations, monthly records)
//! - `calculations`: pure dues arithmetic and the accounting-identity check

pub mod calculations;
pub mod models;

pub use calculations::ValidationError;
pub use models::{
    Adherent, AdherentCreate, AdherentUpdate, Cotisation, CotisationCreate, CotisationMensuelle,
    CotisationMensuelleCreate, CotisationMensuelleUpdate, CotisationUpdate, Mois, MoisPatch, Month,
};
