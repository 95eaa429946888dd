//! Wire-format domain models.
//!
//! Field names keep the original French camelCase JSON representation so
//! existing clients and exported data stay compatible.

mod adherent;
mod cotisation;
mod cotisation_mensuelle;

pub use adherent::{Adherent, AdherentCreate, AdherentUpdate};
pub use cotisation::{Cotisation, CotisationCreate, CotisationUpdate};
pub use cotisation_mensuelle::{
    CotisationMensuelle, CotisationMensuelleCreate, CotisationMensuelleUpdate, Mois, MoisPatch,
    Month,
};
