use adoptlite::Database;
use adoptlite::adopt::{ADOPT_COLLECTION, AdoptModel, AuthUser};
use adoptlite::document::Document;
use adoptlite::types::DocumentId;
use bson::doc;
use bson::oid::ObjectId;
use std::sync::Arc;

/// A seeded `adopts` collection around a user standing at `[10, 20]`.
pub struct Fixture {
    pub db: Arc<Database>,
    pub model: AdoptModel,
    pub me: AuthUser,
    pub near: DocumentId,
    pub middle: DocumentId,
    pub edge: DocumentId,
    pub mine: DocumentId,
    pub taken: DocumentId,
    pub far: DocumentId,
}

fn listing(name: &str, owner: ObjectId, lng: f64, lat: f64, adopted: bool, extra: bson::Document) -> Document {
    let mut data = doc! {
        "name": name,
        "user": owner,
        "adopted": adopted,
        "location": {"type": "Point", "coordinates": [lng, lat]},
    };
    for (k, v) in extra {
        data.insert(k, v);
    }
    Document::new(data)
}

pub fn fixture() -> Fixture {
    let db = Arc::new(Database::new());
    let model = AdoptModel::new(Arc::clone(&db));
    let me = AuthUser::new(ObjectId::new()).at(10.0, 20.0);
    let other = ObjectId::new();
    let insert = |d: Document| db.insert_document(ADOPT_COLLECTION, d).unwrap();

    // Inserted out of distance order on purpose.
    let edge = insert(listing("Edge", other, 10.0, 20.03, false, doc! {"gender": "female", "size": "large", "type": "cat", "age": 7}));
    let near = insert(listing("Near", other, 10.01, 20.0, false, doc! {"gender": "male", "size": "small", "type": "dog", "age": 2}));
    let middle = insert(listing("Middle", other, 10.02, 20.0, false, doc! {"gender": "male", "size": "medium", "type": "dog", "age": 1}));
    let mine = insert(listing("Mine", me.id, 10.0, 20.0, false, doc! {"gender": "male", "type": "dog", "age": 3}));
    let taken = insert(listing("Taken", other, 10.0, 20.0, true, doc! {"gender": "male", "type": "dog", "age": 3}));
    let far = insert(listing("Far", other, 11.0, 20.0, false, doc! {"gender": "male", "type": "dog", "age": 3}));

    Fixture { db, model, me, near, middle, edge, mine, taken, far }
}
