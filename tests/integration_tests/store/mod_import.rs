use adoptlite::Database;
use adoptlite::adopt::{AdoptModel, AuthUser, get_adoption_by_id, list_adoptions};
use adoptlite::config::AppConfig;
use bson::oid::ObjectId;
use std::io::Write;
use std::sync::Arc;

const OWNER: &str = "5f1d7a2b9c3e4d5f6a7b8c9d";
const LISTING: &str = "64b7f0c2a1b2c3d4e5f60718";

#[tokio::test]
async fn seed_file_feeds_the_resolvers() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("adopts.ndjson");
    let mut f = std::fs::File::create(&path).unwrap();
    writeln!(
        f,
        r#"{{"_id":"{LISTING}","name":"Bolt","user":"{OWNER}","adopted":false,"gender":"male","location":{{"type":"Point","coordinates":[10.01,20.0]}}}}"#
    )
    .unwrap();
    writeln!(f, "garbage").unwrap();
    writeln!(
        f,
        r#"{{"name":"Mine","user":"{OWNER}","adopted":false,"location":{{"type":"Point","coordinates":[10.0,20.0]}}}}"#
    )
    .unwrap();
    drop(f);

    let cfg = AppConfig { data_files: vec![path], ..AppConfig::default() };
    let db = Arc::new(Database::open(cfg.engine_options()).unwrap());
    let model = AdoptModel::with_collection(Arc::clone(&db), cfg.collection_name());
    assert_eq!(model.collection_name(), "adopts");
    assert_eq!(db.get_collection("adopts").map(|c| c.len()), Some(2));

    let stranger = AuthUser::new(ObjectId::new()).at(10.0, 20.0);
    let found = list_adoptions(&model, None, None, None, &stranger).await.unwrap();
    assert_eq!(found.iter().filter_map(|a| a.name.as_deref()).collect::<Vec<_>>(), vec!["Mine", "Bolt"]);

    let owner = AuthUser::new(ObjectId::parse_str(OWNER).unwrap()).at(10.0, 20.0);
    assert!(list_adoptions(&model, None, None, None, &owner).await.unwrap().is_empty());

    let bolt = get_adoption_by_id(&model, LISTING).await.unwrap().unwrap();
    assert_eq!(bolt.user.map(|u| u.to_hex()).as_deref(), Some(OWNER));
}
