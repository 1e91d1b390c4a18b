use super::filter::{AdoptsFilter, adopt_mapping};
use super::model::{Adopt, AuthUser};
use super::store::AdoptStore;
use crate::conditions::build_conditions_from_filters;
use crate::errors::DbError;
use crate::query::FindOptions;
use crate::types::DocumentId;
use bson::{Bson, Document as BsonDocument, doc};

/// Kilometers to meters. Non-numeric input is passed on unchanged so the query layer
/// rejects it as an invalid `$maxDistance`.
fn distance_to_meters(distance: &Bson) -> Bson {
    match distance {
        Bson::Int32(km) => Bson::Int64(i64::from(*km).saturating_mul(1000)),
        Bson::Int64(km) => Bson::Int64(km.saturating_mul(1000)),
        Bson::Double(km) => Bson::Double(km * 1000.0),
        other => other.clone(),
    }
}

/// Builds the listing query from a raw filter document keyed like `AdoptsFilter`.
///
/// The owner exclusion and the adoption-status condition are written after the
/// filter-derived conditions, so no filter content can replace them. Without a
/// `distance` the proximity clause has no upper bound but still orders by distance.
///
/// # Errors
/// Returns `DbError::QueryError` for malformed `OR`/`AND` lists.
pub fn adopts_conditions_from_doc(filter: &BsonDocument, user: &AuthUser) -> Result<BsonDocument, DbError> {
    let mut conditions = build_conditions_from_filters(user, filter, adopt_mapping())?.conditions;
    conditions.insert("user", doc! { "$ne": user.id });

    let mut near = BsonDocument::new();
    match filter.get("distance") {
        None | Some(Bson::Null) => {}
        Some(d) => {
            near.insert("$maxDistance", distance_to_meters(d));
        }
    }
    near.insert("$geometry", doc! { "type": "Point", "coordinates": user.coordinates_bson() });
    conditions.insert("location", doc! { "$near": near });
    conditions.insert("adopted", false);
    Ok(conditions)
}

/// Builds the listing query for a typed filter. An absent filter behaves like an empty one.
///
/// # Errors
/// See [`adopts_conditions_from_doc`].
pub fn adopts_conditions(filter: Option<&AdoptsFilter>, user: &AuthUser) -> Result<BsonDocument, DbError> {
    let raw = filter.map(AdoptsFilter::to_document).unwrap_or_default();
    adopts_conditions_from_doc(&raw, user)
}

/// Adoption listings near `user`, nearest first, excluding the user's own and adopted ones.
///
/// `first` and `skip` are forwarded to the store as given.
///
/// # Errors
/// - `DbError::InvalidGeometry` if the user has no usable location or `distance` is not a number.
/// - Whatever the store reports for the pagination values (e.g. a negative `skip`).
pub async fn list_adoptions(
    store: &dyn AdoptStore,
    filter: Option<&AdoptsFilter>,
    first: Option<i64>,
    skip: Option<i64>,
    user: &AuthUser,
) -> Result<Vec<Adopt>, DbError> {
    let conditions = adopts_conditions(filter, user)?;
    log::debug!("adopts query for user {}: {conditions}", user.id.to_hex());
    let opts = FindOptions { limit: first, skip, ..FindOptions::default() };
    let docs = store.find(conditions, opts).await?;
    Ok(docs.iter().map(Adopt::from_document).collect())
}

/// One listing by id, with no ownership or status filtering.
///
/// # Errors
/// Returns `DbError::InvalidDocumentId` when `id` is not an ObjectId string; an unknown
/// but well-formed id yields `Ok(None)`.
pub async fn get_adoption_by_id(store: &dyn AdoptStore, id: &str) -> Result<Option<Adopt>, DbError> {
    let id = DocumentId::parse(id)?;
    Ok(store.find_by_id(&id).await?.as_ref().map(Adopt::from_document))
}
