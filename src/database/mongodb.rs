use futures_util::TryStreamExt;
use mongodb::{
    bson::{doc, Document},
    error::{ErrorKind, WriteFailure},
    options::{FindOneOptions, FindOptions, ReplaceOptions},
    Collection, Database,
};
use serde::{de::DeserializeOwned, Serialize};

use crate::{data_types::common::DocumentId, error::Result};

#[derive(Debug, Clone)]
pub struct MongoDatabase {
    database: Database,
}

impl MongoDatabase {
    pub fn new(db: &Database) -> Self {
        Self {
            database: db.clone(),
        }
    }

    pub fn name(&self) -> &str {
        self.database.name()
    }

    pub fn typed_collection<T>(&self, name: &str) -> Collection<T> {
        self.database.collection(name)
    }

    // Return T in which 'field' has largest value
    pub async fn max<T: DeserializeOwned + Unpin + Send + Sync>(
        &self,
        collection: &Collection<T>,
        query: Document,
        field: &str,
    ) -> Result<Option<T>> {
        let found = collection
            .find_one(
                query,
                FindOneOptions::builder().sort(doc! {field: -1}).build(),
            )
            .await?;

        Ok(found)
    }

    // Inserts doc_id if it doesn't exist, otherwise it replaces it
    pub async fn upsert_one<T: Serialize>(
        &self,
        collection: &Collection<T>,
        doc_id: DocumentId,
        doc: &T,
    ) -> Result<()> {
        collection
            .replace_one(
                doc! {"_id": doc_id},
                doc,
                ReplaceOptions::builder().upsert(true).build(),
            )
            .await?;

        Ok(())
    }

    // Returns false when a document with the same _id already exists
    pub async fn insert_new<T: Serialize>(
        &self,
        collection: &Collection<T>,
        doc: &T,
    ) -> Result<bool> {
        match collection.insert_one(doc, None).await {
            Ok(_) => Ok(true),
            Err(err) if Self::is_duplicate_key(&err) => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
        const DUPLICATE_KEY: i32 = 11000;

        matches!(
            err.kind.as_ref(),
            ErrorKind::Write(WriteFailure::WriteError(write_error))
                if write_error.code == DUPLICATE_KEY
        )
    }

    pub async fn find_one<T: DeserializeOwned + Unpin + Send + Sync>(
        &self,
        collection: &Collection<T>,
        query: Document,
    ) -> Result<Option<T>> {
        Ok(collection.find_one(query, None).await?)
    }

    // Sorted by id
    pub async fn find<T: DeserializeOwned + Unpin + Send + Sync>(
        &self,
        collection: &Collection<T>,
        query: Document,
    ) -> Result<Vec<T>> {
        let cursor = collection
            .find(query, FindOptions::builder().sort(doc! {"_id": 1}).build())
            .await?;

        Ok(cursor.try_collect().await?)
    }

    pub async fn delete_one<T>(&self, collection: &Collection<T>, doc_id: DocumentId) -> Result<bool> {
        let result = collection.delete_one(doc! {"_id": doc_id}, None).await?;

        Ok(result.deleted_count == 1)
    }
}
