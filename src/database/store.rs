use std::{collections::BTreeMap, marker::PhantomData};

use async_trait::async_trait;
use mongodb::{
    bson::{self, doc, Bson},
    Collection,
};
use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::Mutex;

use crate::{
    data_types::common::{DocumentId, Entity, ENTITY_IS_NOT_SAVED},
    error::{Error, Result},
    logvbln,
};

use super::mongodb::MongoDatabase;

/// Storage of one entity type. Saving an entity which is not saved yet assigns the next
/// free identity (largest stored identity + 1), otherwise the stored entity is replaced.
#[async_trait]
pub trait EntityStore<T>: Send + Sync
where
    T: Entity + Send + Sync,
{
    async fn save(&self, entity: &mut T) -> Result<DocumentId>;

    async fn get(&self, id: DocumentId) -> Result<Option<T>>;

    /// All entities ordered by identity
    async fn all(&self) -> Result<Vec<T>>;

    /// Entities in which the serialized `field` equals `value`
    async fn find_by(&self, field: &str, value: Bson) -> Result<Vec<T>>;

    /// `false` when no entity had this identity
    async fn delete(&self, id: DocumentId) -> Result<bool>;
}

pub struct MongoStore<T> {
    db_conn: MongoDatabase,
    _entity: PhantomData<T>,
}

impl<T: Entity> MongoStore<T> {
    const CC: &str = "MongoStore";
    const MAX_INSERT_ATTEMPTS: usize = 16;

    pub fn new(db_conn: &MongoDatabase) -> Self {
        Self {
            db_conn: db_conn.clone(),
            _entity: PhantomData,
        }
    }

    fn typed_collection(&self) -> Collection<T> {
        self.db_conn.typed_collection(T::COLL_NAME)
    }
}

#[async_trait]
impl<T> EntityStore<T> for MongoStore<T>
where
    T: Entity + Serialize + DeserializeOwned + Unpin + Send + Sync + 'static,
{
    async fn save(&self, entity: &mut T) -> Result<DocumentId> {
        let collection = self.typed_collection();

        if entity.is_saved() {
            self.db_conn
                .upsert_one(&collection, entity.as_i64(), entity)
                .await?;
        } else {
            // a concurrent save can take the same identity, the insert then fails and the
            // next free identity is tried
            let mut attempt = 0;
            loop {
                let last = self.db_conn.max(&collection, doc! {}, "_id").await?;
                entity.set_id(last.map_or(0, |last| last.as_i64()) + 1);

                if self.db_conn.insert_new(&collection, entity).await? {
                    break;
                }

                attempt += 1;
                if attempt == Self::MAX_INSERT_ATTEMPTS {
                    entity.set_id(ENTITY_IS_NOT_SAVED);
                    return Err(Error::Conflict(format!(
                        "no free identity in {} after {} attempts",
                        T::COLL_NAME,
                        attempt
                    )));
                }

                logvbln!("identity {} in {} taken, retrying", entity.as_i64(), T::COLL_NAME);
            }
        }

        logvbln!("saved {} {}", T::COLL_NAME, entity.as_i64());

        Ok(entity.as_i64())
    }

    async fn get(&self, id: DocumentId) -> Result<Option<T>> {
        self.db_conn
            .find_one(&self.typed_collection(), doc! {"_id": id})
            .await
    }

    async fn all(&self) -> Result<Vec<T>> {
        self.db_conn.find(&self.typed_collection(), doc! {}).await
    }

    async fn find_by(&self, field: &str, value: Bson) -> Result<Vec<T>> {
        self.db_conn
            .find(&self.typed_collection(), doc! {field: value})
            .await
    }

    async fn delete(&self, id: DocumentId) -> Result<bool> {
        self.db_conn.delete_one(&self.typed_collection(), id).await
    }
}

/// Keeps the entities in memory, for tests and when no database is configured.
pub struct MemoryStore<T> {
    entities: Mutex<BTreeMap<DocumentId, T>>,
}

impl<T> Default for MemoryStore<T> {
    fn default() -> Self {
        Self {
            entities: Mutex::new(BTreeMap::new()),
        }
    }
}

impl<T> MemoryStore<T> {
    pub fn new() -> Self {
        Default::default()
    }
}

#[async_trait]
impl<T> EntityStore<T> for MemoryStore<T>
where
    T: Entity + Serialize + Clone + Send + Sync + 'static,
{
    async fn save(&self, entity: &mut T) -> Result<DocumentId> {
        let mut entities = self.entities.lock().await;

        if !entity.is_saved() {
            let last_id = entities.keys().next_back().copied().unwrap_or(0);
            entity.set_id(last_id + 1);
        }

        entities.insert(entity.as_i64(), entity.clone());

        Ok(entity.as_i64())
    }

    async fn get(&self, id: DocumentId) -> Result<Option<T>> {
        Ok(self.entities.lock().await.get(&id).cloned())
    }

    async fn all(&self) -> Result<Vec<T>> {
        Ok(self.entities.lock().await.values().cloned().collect())
    }

    async fn find_by(&self, field: &str, value: Bson) -> Result<Vec<T>> {
        let entities = self.entities.lock().await;
        let mut found = Vec::new();

        for entity in entities.values() {
            if bson::to_document(entity)?.get(field) == Some(&value) {
                found.push(entity.clone());
            }
        }

        Ok(found)
    }

    async fn delete(&self, id: DocumentId) -> Result<bool> {
        Ok(self.entities.lock().await.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_types::{beverage::TourBeverageContainer, timer_pause::TourTimerPause};

    #[tokio::test]
    async fn identities_start_at_one() {
        let store: MemoryStore<TourBeverageContainer> = MemoryStore::new();

        let mut bottle = TourBeverageContainer::new("Bottle", 0.75);
        let mut bladder = TourBeverageContainer::new("Bladder", 2.);

        assert_eq!(store.save(&mut bottle).await.unwrap(), 1);
        assert_eq!(store.save(&mut bladder).await.unwrap(), 2);
        assert!(bottle.is_saved());
        assert_eq!(bladder.container_id, 2);
    }

    #[tokio::test]
    async fn saved_entity_is_replaced() {
        let store: MemoryStore<TourBeverageContainer> = MemoryStore::new();

        let mut bottle = TourBeverageContainer::new("Bottle", 0.75);
        store.save(&mut bottle).await.unwrap();

        bottle.capacity = 1.;
        store.save(&mut bottle).await.unwrap();

        let all = store.all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].capacity, 1.);
        assert_eq!(store.get(1).await.unwrap(), Some(bottle));
    }

    #[tokio::test]
    async fn find_by_field_and_delete() {
        let store: MemoryStore<TourTimerPause> = MemoryStore::new();

        for (tour_id, start_time) in [(7, 1_000), (8, 2_000), (7, 3_000)] {
            let mut pause = TourTimerPause::new(tour_id, start_time, start_time + 500).unwrap();
            store.save(&mut pause).await.unwrap();
        }

        let found = store.find_by("tour_id", Bson::Int64(7)).await.unwrap();
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|pause| pause.tour_id == 7));

        assert!(store.delete(2).await.unwrap());
        assert!(!store.delete(2).await.unwrap());
        assert_eq!(store.get(2).await.unwrap(), None);
        assert_eq!(store.all().await.unwrap().len(), 2);
    }

    async fn save_concurrently(store: &dyn EntityStore<TourBeverageContainer>) -> Vec<DocumentId> {
        let saves = (0..8).map(|index| async move {
            let mut container = TourBeverageContainer::new(format!("Bottle {index}"), 0.5);
            store.save(&mut container).await.unwrap()
        });

        let mut ids = futures_util::future::join_all(saves).await;
        ids.sort_unstable();
        ids
    }

    #[tokio::test]
    async fn concurrent_saves_get_distinct_identities() {
        let store: MemoryStore<TourBeverageContainer> = MemoryStore::new();

        assert_eq!(save_concurrently(&store).await, (1..=8).collect::<Vec<_>>());
        assert_eq!(store.all().await.unwrap().len(), 8);
    }

    #[tokio::test]
    #[ignore = "needs a MongoDB server at 127.0.0.1:27017"]
    async fn concurrent_mongo_saves_get_distinct_identities() {
        let client = mongodb::Client::with_uri_str("mongodb://127.0.0.1:27017")
            .await
            .unwrap();
        let db = client.database("tour_book_store_test");
        db.drop(None).await.unwrap();

        let store: MongoStore<TourBeverageContainer> = MongoStore::new(&MongoDatabase::new(&db));
        let ids = save_concurrently(&store).await;

        let mut unique = ids.clone();
        unique.dedup();
        assert_eq!(unique.len(), 8);
        assert_eq!(store.all().await.unwrap().len(), 8);

        db.drop(None).await.unwrap();
    }
}
