//! GraphQL schema for adoption listings.
//!
//! The store is schema data (`Arc<dyn AdoptStore>`); the authenticated user is
//! request data (`AuthUser`), attached per request by the session layer.

use crate::adopt::{Adopt, AdoptStore, AdoptsFilter, AuthUser, get_adoption_by_id, list_adoptions};
use crate::errors::DbError;
use async_graphql::{Context, EmptyMutation, EmptySubscription, ID, Object, Request, Response, Schema, SimpleObject};
use std::sync::Arc;

pub type AdoptSchema = Schema<QueryRoot, EmptyMutation, EmptySubscription>;

/// GeoJSON point of a listing.
#[derive(SimpleObject, Clone, Debug, PartialEq)]
pub struct Location {
    #[graphql(name = "type")]
    pub kind: String,
    pub coordinates: Vec<f64>,
}

#[Object(name = "Adopt")]
impl Adopt {
    async fn id(&self) -> ID {
        ID(self.id.to_hex())
    }

    async fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    async fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[graphql(name = "type")]
    async fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    async fn size(&self) -> Option<&str> {
        self.size.as_deref()
    }

    async fn gender(&self) -> Option<&str> {
        self.gender.as_deref()
    }

    async fn age(&self) -> Option<i32> {
        self.age.and_then(|a| i32::try_from(a).ok())
    }

    async fn adopted(&self) -> bool {
        self.adopted
    }

    /// Owner of the listing
    async fn user(&self) -> Option<ID> {
        self.user.map(|u| ID(u.to_hex()))
    }

    async fn location(&self) -> Option<Location> {
        self.location.map(|p| Location { kind: "Point".into(), coordinates: vec![p.lng, p.lat] })
    }

    /// RFC 3339 creation time
    async fn created_at(&self) -> Option<String> {
        self.created_at.map(|t| t.to_rfc3339())
    }
}

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// Take all adoptions near authenticated user
    async fn adopts(
        &self,
        ctx: &Context<'_>,
        filter: Option<AdoptsFilter>,
        first: Option<i32>,
        skip: Option<i32>,
    ) -> async_graphql::Result<Option<Vec<Option<Adopt>>>> {
        let user = ctx.data_opt::<AuthUser>().ok_or(DbError::Unauthenticated)?;
        let store = ctx.data::<Arc<dyn AdoptStore>>()?;
        let found = list_adoptions(
            store.as_ref(),
            filter.as_ref(),
            first.map(i64::from),
            skip.map(i64::from),
            user,
        )
        .await?;
        Ok(Some(found.into_iter().map(Some).collect()))
    }

    /// Take specific adopt by id
    async fn adopt(&self, ctx: &Context<'_>, id: ID) -> async_graphql::Result<Option<Adopt>> {
        let store = ctx.data::<Arc<dyn AdoptStore>>()?;
        Ok(get_adoption_by_id(store.as_ref(), id.as_str()).await?)
    }
}

/// Builds the schema over `store`.
#[must_use]
pub fn build_schema(store: Arc<dyn AdoptStore>) -> AdoptSchema {
    Schema::build(QueryRoot, EmptyMutation, EmptySubscription).data(store).finish()
}

/// Runs one request on behalf of `user` (anonymous when `None`).
pub async fn execute_as(schema: &AdoptSchema, request: impl Into<Request>, user: Option<AuthUser>) -> Response {
    let mut request = request.into();
    if let Some(user) = user {
        request = request.data(user);
    }
    schema.execute(request).await
}

/// The schema in SDL form.
#[must_use]
pub fn sdl(schema: &AdoptSchema) -> String {
    schema.sdl()
}
