use super::super::support::fixture;
use adoptlite::adopt::get_adoption_by_id;
use adoptlite::errors::DbError;
use adoptlite::types::DocumentId;

#[tokio::test]
async fn existing_id_returns_that_listing() {
    let fx = fixture();
    let found = get_adoption_by_id(&fx.model, &fx.near.to_hex()).await.unwrap().unwrap();
    assert_eq!(found.id, fx.near);
    assert_eq!(found.name.as_deref(), Some("Near"));
    assert_eq!(found.age, Some(2));
}

#[tokio::test]
async fn lookup_ignores_ownership_and_status() {
    let fx = fixture();
    let mine = get_adoption_by_id(&fx.model, &fx.mine.to_hex()).await.unwrap();
    let taken = get_adoption_by_id(&fx.model, &fx.taken.to_hex()).await.unwrap();
    assert_eq!(mine.map(|a| a.user), Some(Some(fx.me.id)));
    assert!(taken.is_some_and(|a| a.adopted));
}

#[tokio::test]
async fn unknown_id_is_none_and_malformed_id_errors() {
    let fx = fixture();
    let unknown = DocumentId::new().to_hex();
    assert!(get_adoption_by_id(&fx.model, &unknown).await.unwrap().is_none());
    let err = get_adoption_by_id(&fx.model, "not-an-id").await.unwrap_err();
    assert!(matches!(err, DbError::InvalidDocumentId(_)), "{err:?}");
}
