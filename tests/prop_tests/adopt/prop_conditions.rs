use adoptlite::adopt::{AdoptsFilter, AuthUser, adopts_conditions};
use bson::oid::ObjectId;
use bson::{Bson, doc};
use proptest::prelude::*;

fn text() -> impl Strategy<Value = Option<String>> {
    prop_oneof![Just(None), Just(Some(String::new())), "[a-z]{1,8}".prop_map(Some)]
}

fn filters() -> impl Strategy<Value = AdoptsFilter> {
    (text(), text(), text(), proptest::option::of(0i32..30), proptest::option::of(0i32..20_000)).prop_map(
        |(size, gender, kind, age_gte, distance)| AdoptsFilter { size, gender, kind, age_gte, distance },
    )
}

proptest! {
    #![proptest_config(proptest::test_runner::Config {
        failure_persistence: Some(Box::new(proptest::test_runner::FileFailurePersistence::WithSource("proptest-regressions"))),
        .. proptest::test_runner::Config::default()
    })]

    // Empty strings never constrain; non-empty strings require exact equality.
    #[test]
    fn prop_text_fields(f in filters()) {
        let user = AuthUser::new(ObjectId::new()).at(10.0, 20.0);
        let c = adopts_conditions(Some(&f), &user).unwrap();
        for (key, value) in [("size", &f.size), ("gender", &f.gender), ("type", &f.kind)] {
            match value.as_deref() {
                None | Some("") => prop_assert!(!c.contains_key(key)),
                Some(s) => prop_assert_eq!(c.get_str(key).unwrap(), s),
            }
        }
        prop_assert_eq!(c.get_document("age").ok().cloned(), f.age_gte.map(|a| doc! {"$gte": a}));
    }

    // Exclusions are always present and the radius is the distance in meters.
    #[test]
    fn prop_exclusions_and_radius(f in filters(), lng in -180.0f64..180.0, lat in -90.0f64..90.0) {
        let user = AuthUser::new(ObjectId::new()).at(lng, lat);
        let c = adopts_conditions(Some(&f), &user).unwrap();
        prop_assert_eq!(c.get_document("user").unwrap(), &doc! {"$ne": user.id});
        prop_assert_eq!(c.get_bool("adopted").unwrap(), false);
        let near = c.get_document("location").unwrap().get_document("$near").unwrap();
        prop_assert_eq!(near.get("$maxDistance").cloned(), f.distance.map(|d| Bson::Int64(i64::from(d) * 1000)));
        let coords = near.get_document("$geometry").unwrap().get_array("coordinates").unwrap();
        prop_assert_eq!(coords, &vec![Bson::Double(lng), Bson::Double(lat)]);
    }
}
