//! Adoption listings: the record model, the `adopts` filter and its mapping table,
//! the store seam and the two query operations.

mod filter;
mod model;
mod query;
mod store;

pub use filter::{AdoptsFilter, adopt_mapping};
pub use model::{Adopt, AuthUser, UserLocation};
pub use query::{adopts_conditions, adopts_conditions_from_doc, get_adoption_by_id, list_adoptions};
pub use store::{ADOPT_COLLECTION, AdoptModel, AdoptStore};
