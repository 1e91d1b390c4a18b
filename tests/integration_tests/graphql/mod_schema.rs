use super::super::support::fixture;
use adoptlite::graphql::{build_schema, execute_as};
use async_graphql::{Request, Variables};
use serde_json::json;
use std::sync::Arc;

#[tokio::test]
async fn adopts_query_resolves_for_the_session_user() {
    let fx = fixture();
    let schema = build_schema(Arc::new(fx.model.clone()));
    let query = r#"
        query Near($filter: AdoptsFilter) {
            adopts(filter: $filter, first: 10, skip: 0) { id name type location { type coordinates } }
        }
    "#;
    let request = Request::new(query).variables(Variables::from_json(json!({
        "filter": {"size": "", "gender": "male", "type": "", "age_gte": 2, "distance": 5}
    })));
    let resp = execute_as(&schema, request, Some(fx.me.clone())).await;
    assert!(resp.errors.is_empty(), "{:?}", resp.errors);
    let data = resp.data.into_json().unwrap();
    let list = data["adopts"].as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["id"], fx.near.to_hex());
    assert_eq!(list[0]["type"], "dog");
    assert_eq!(list[0]["location"]["coordinates"], json!([10.01, 20.0]));
}

#[tokio::test]
async fn adopt_by_id_and_missing_user() {
    let fx = fixture();
    let schema = build_schema(Arc::new(fx.model.clone()));

    let q = format!(r#"{{ adopt(id: "{}") {{ name adopted }} }}"#, fx.taken.to_hex());
    let resp = execute_as(&schema, q, None).await;
    assert!(resp.errors.is_empty(), "{:?}", resp.errors);
    assert_eq!(resp.data.into_json().unwrap(), json!({"adopt": {"name": "Taken", "adopted": true}}));

    let resp = execute_as(&schema, r#"{ adopt(id: "000000000000000000000000") { name } }"#, None).await;
    assert_eq!(resp.data.into_json().unwrap(), json!({"adopt": null}));

    let resp = execute_as(&schema, "{ adopts { id } }", None).await;
    assert_eq!(resp.errors.len(), 1);
    assert_eq!(resp.errors[0].message, "unauthenticated");
}

#[tokio::test]
async fn resolver_errors_surface_as_graphql_errors() {
    let fx = fixture();
    let schema = build_schema(Arc::new(fx.model.clone()));
    let resp = execute_as(&schema, "{ adopts(skip: -1) { id } }", Some(fx.me.clone())).await;
    assert_eq!(resp.errors.len(), 1);
    assert!(resp.errors[0].message.contains("skip value must be non-negative"));
    // The failed field is nulled on its own; the rest of the response survives.
    assert_eq!(resp.data.into_json().unwrap(), json!({"adopts": null}));

    let resp = execute_as(&schema, r#"{ adopt(id: "xyz") { id } }"#, None).await;
    assert!(resp.errors[0].message.contains("Invalid document ID"));
}
