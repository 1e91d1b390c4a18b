use adoptlite::Database;
use adoptlite::document::Document;
use adoptlite::query::{FindOptions, GeoPoint};
use bson::doc;
use proptest::prelude::*;

fn point() -> impl Strategy<Value = (f64, f64)> {
    (-1.0f64..1.0, -1.0f64..1.0)
}

proptest! {
    #![proptest_config(proptest::test_runner::Config {
        failure_persistence: Some(Box::new(proptest::test_runner::FileFailurePersistence::WithSource("proptest-regressions"))),
        cases: 64,
        .. proptest::test_runner::Config::default()
    })]

    // Results come back nearest first and never beyond $maxDistance.
    #[test]
    fn prop_near_orders_and_bounds(points in proptest::collection::vec(point(), 0..20), max_km in 1i64..150) {
        let db = Database::new();
        db.create_collection("geo").create_geo_index("location");
        for (lng, lat) in &points {
            db.insert_document("geo", Document::new(doc! {"location": {"type": "Point", "coordinates": [*lng, *lat]}})).unwrap();
        }
        let q = doc! {"location": {"$near": {
            "$maxDistance": max_km * 1000,
            "$geometry": {"type": "Point", "coordinates": [0.0, 0.0]}
        }}};
        let center = GeoPoint { lng: 0.0, lat: 0.0 };
        let dists: Vec<f64> = db.find_doc("geo", &q, &FindOptions::default()).unwrap()
            .filter_map(|d| d.data.get("location").and_then(GeoPoint::from_stored))
            .map(|p| center.distance_m(&p))
            .collect();
        #[allow(clippy::cast_precision_loss)]
        let bound = (max_km * 1000) as f64;
        prop_assert!(dists.windows(2).all(|w| w[0] <= w[1]));
        prop_assert!(dists.iter().all(|d| *d <= bound));
        let expected = points.iter()
            .filter(|(lng, lat)| center.distance_m(&GeoPoint { lng: *lng, lat: *lat }) <= bound)
            .count();
        prop_assert_eq!(dists.len(), expected);
    }
}
