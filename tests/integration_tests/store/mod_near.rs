use super::super::support::fixture;
use adoptlite::Database;
use adoptlite::adopt::ADOPT_COLLECTION;
use adoptlite::document::Document;
use adoptlite::errors::DbError;
use adoptlite::query::{FindOptions, Order, SortSpec, telemetry};
use adoptlite::utils::devlog;
use bson::doc;

#[test]
fn near_without_geo_index_is_refused() {
    let db = Database::new();
    db.create_collection("plain");
    db.insert_document("plain", Document::new(doc! {"location": {"type": "Point", "coordinates": [0.0, 0.0]}}))
        .unwrap();
    let q = doc! {"location": {"$near": {"$geometry": {"type": "Point", "coordinates": [0.0, 0.0]}}}};
    let err = db.find_doc("plain", &q, &FindOptions::default()).unwrap_err();
    assert!(matches!(err, DbError::QueryError(ref m) if m.contains("geoNear")), "{err:?}");
}

#[test]
fn equal_distances_keep_insertion_order() {
    let db = Database::new();
    db.create_collection("ties").create_geo_index("location");
    let ids: Vec<_> = (0..4)
        .map(|i| {
            let d = Document::new(doc! {"n": i, "location": {"type": "Point", "coordinates": [1.0, 1.0]}});
            db.insert_document("ties", d).unwrap()
        })
        .collect();
    let q = doc! {"location": {"$near": {"$geometry": {"type": "Point", "coordinates": [0.0, 0.0]}}}};
    let got: Vec<_> = db.find_doc("ties", &q, &FindOptions::default()).unwrap().map(|d| d.id).collect();
    assert_eq!(got, ids);
}

#[test]
fn explicit_sort_and_projection_still_apply() {
    let fx = fixture();
    let opts = FindOptions {
        projection: Some(vec!["name".into()]),
        sort: Some(vec![SortSpec { field: "name".into(), order: Order::Asc }]),
        ..FindOptions::default()
    };
    let docs = fx.db.find_doc(ADOPT_COLLECTION, &doc! {"adopted": false, "gender": "male"}, &opts).unwrap().to_vec();
    let names: Vec<_> = docs.iter().map(|d| d.data.get_str("name").unwrap().to_string()).collect();
    assert_eq!(names, vec!["Far", "Middle", "Mine", "Near"]);
    assert!(docs.iter().all(|d| d.data.len() == 2));
}

#[test]
fn per_collection_cap_limits_results_and_queries_are_traced() {
    let db = Database::new();
    db.create_collection("capped_adopts");
    for i in 0..5 {
        db.insert_document("capped_adopts", Document::new(doc! {"i": i})).unwrap();
    }
    telemetry::set_max_result_limit_for("capped_adopts", 2);
    let trace = devlog::capture();
    let n = db.find_doc("capped_adopts", &doc! {}, &FindOptions { limit: Some(100), ..FindOptions::default() })
        .unwrap()
        .remaining();
    assert_eq!(n, 2);
    let lines = trace.take();
    assert!(lines.iter().any(|l| l.contains("\"collection\":\"capped_adopts\"") && l.contains("\"result_count\":2")));
    assert!(lines.iter().any(|l| l.contains("\"event\":\"result_capped\"") && l.contains("\"cap\":2")));
    assert!(telemetry::metrics_text().contains("queries_total"));

    // A window that `first` already keeps under the cap is not reported.
    let n = db.find_doc("capped_adopts", &doc! {}, &FindOptions { limit: Some(1), ..FindOptions::default() })
        .unwrap()
        .remaining();
    assert_eq!(n, 1);
    // Neither is a capped query whose skip leaves fewer hits than the cap.
    let n = db.find_doc("capped_adopts", &doc! {}, &FindOptions { skip: Some(4), ..FindOptions::default() })
        .unwrap()
        .remaining();
    assert_eq!(n, 1);
    assert!(!trace.take().iter().any(|l| l.contains("result_capped")));
}
