use super::super::support::fixture;
use adoptlite::adopt::{AdoptsFilter, AuthUser, list_adoptions};
use adoptlite::errors::DbError;
use bson::oid::ObjectId;

fn within(km: i32) -> AdoptsFilter {
    AdoptsFilter { distance: Some(km), ..AdoptsFilter::default() }
}

#[tokio::test]
async fn first_ten_returns_all_three_matches_nearest_first() {
    let fx = fixture();
    let found = list_adoptions(&fx.model, Some(&within(5)), Some(10), Some(0), &fx.me).await.unwrap();
    let ids: Vec<_> = found.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![fx.near, fx.middle, fx.edge]);
}

#[tokio::test]
async fn own_and_adopted_listings_never_appear() {
    let fx = fixture();
    let found = list_adoptions(&fx.model, None, None, None, &fx.me).await.unwrap();
    assert!(found.iter().all(|a| a.id != fx.mine && a.id != fx.taken));
    assert!(found.iter().all(|a| a.user != Some(fx.me.id) && !a.adopted));
    // No distance means no radius: the far listing comes back last.
    assert_eq!(found.last().map(|a| a.id), Some(fx.far));
    assert_eq!(found.len(), 4);
}

#[tokio::test]
async fn radius_excludes_distant_listings() {
    let fx = fixture();
    let found = list_adoptions(&fx.model, Some(&within(2)), None, None, &fx.me).await.unwrap();
    let ids: Vec<_> = found.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![fx.near]);
}

#[tokio::test]
async fn attribute_filters_and_empty_strings() {
    let fx = fixture();
    let filter = AdoptsFilter {
        size: Some(String::new()),
        gender: Some("male".into()),
        kind: Some(String::new()),
        age_gte: Some(2),
        distance: Some(5),
    };
    let found = list_adoptions(&fx.model, Some(&filter), None, None, &fx.me).await.unwrap();
    let ids: Vec<_> = found.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![fx.near]);

    let cats = AdoptsFilter { kind: Some("cat".into()), ..within(5) };
    let found = list_adoptions(&fx.model, Some(&cats), None, None, &fx.me).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].kind.as_deref(), Some("cat"));
}

#[tokio::test]
async fn pagination_windows() {
    let fx = fixture();
    let page = list_adoptions(&fx.model, Some(&within(5)), Some(1), Some(1), &fx.me).await.unwrap();
    assert_eq!(page.iter().map(|a| a.id).collect::<Vec<_>>(), vec![fx.middle]);

    let past_end = list_adoptions(&fx.model, Some(&within(5)), Some(10), Some(3), &fx.me).await.unwrap();
    assert!(past_end.is_empty());

    let negative_first = list_adoptions(&fx.model, Some(&within(5)), Some(-2), None, &fx.me).await.unwrap();
    assert_eq!(negative_first.len(), 2);

    let zero_first = list_adoptions(&fx.model, Some(&within(5)), Some(0), None, &fx.me).await.unwrap();
    assert_eq!(zero_first.len(), 3);
}

#[tokio::test]
async fn negative_skip_is_a_store_error() {
    let fx = fixture();
    let err = list_adoptions(&fx.model, Some(&within(5)), Some(10), Some(-1), &fx.me).await.unwrap_err();
    match err {
        DbError::QueryError(msg) => assert!(msg.contains("skip"), "{msg}"),
        other => panic!("unexpected: {other:?}"),
    }
}

#[tokio::test]
async fn user_without_location_is_rejected() {
    let fx = fixture();
    let nowhere = AuthUser::new(ObjectId::new());
    let err = list_adoptions(&fx.model, Some(&within(5)), None, None, &nowhere).await.unwrap_err();
    assert!(matches!(err, DbError::InvalidGeometry(_)), "{err:?}");

    let off_map = AuthUser::new(ObjectId::new()).at(200.0, 20.0);
    let err = list_adoptions(&fx.model, None, None, None, &off_map).await.unwrap_err();
    assert!(matches!(err, DbError::InvalidGeometry(_)), "{err:?}");
}
