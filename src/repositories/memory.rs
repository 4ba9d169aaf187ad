//! In-memory store used by tests and local runs without PostgreSQL.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{DocumentStore, StoreError, StoreResult, UserStore};
use crate::models::{Collection, Document, DocumentId, Fields, NewUser, UserRecord};

/// Keeps users keyed by email and documents in insertion order per collection.
#[derive(Clone, Default)]
pub struct MemoryStore {
    users: Arc<RwLock<HashMap<String, UserRecord>>>,
    documents: Arc<RwLock<HashMap<Collection, Vec<Document>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents currently held in a collection.
    pub async fn len(&self, collection: Collection) -> usize {
        self.documents
            .read()
            .await
            .get(&collection)
            .map_or(0, Vec::len)
    }

    /// All user records, for inspecting what was persisted.
    pub async fn users(&self) -> Vec<UserRecord> {
        self.users.read().await.values().cloned().collect()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<UserRecord>> {
        Ok(self.users.read().await.get(email).cloned())
    }

    async fn insert(&self, user: NewUser) -> StoreResult<UserRecord> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.email) {
            return Err(StoreError::Duplicate);
        }
        let record = UserRecord {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            created_at: Utc::now(),
        };
        users.insert(record.email.clone(), record.clone());
        Ok(record)
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find_all(&self, collection: Collection) -> StoreResult<Vec<Document>> {
        Ok(self
            .documents
            .read()
            .await
            .get(&collection)
            .cloned()
            .unwrap_or_default())
    }

    async fn find_one(
        &self,
        collection: Collection,
        id: DocumentId,
    ) -> StoreResult<Option<Document>> {
        Ok(self
            .documents
            .read()
            .await
            .get(&collection)
            .and_then(|docs| docs.iter().find(|d| d.id == id).cloned()))
    }

    async fn insert(&self, collection: Collection, fields: Fields) -> StoreResult<Document> {
        let doc = Document::new(DocumentId::new(), fields);
        self.documents
            .write()
            .await
            .entry(collection)
            .or_default()
            .push(doc.clone());
        Ok(doc)
    }

    async fn set_fields(
        &self,
        collection: Collection,
        id: DocumentId,
        fields: Fields,
    ) -> StoreResult<u64> {
        let mut documents = self.documents.write().await;
        let Some(doc) = documents
            .get_mut(&collection)
            .and_then(|docs| docs.iter_mut().find(|d| d.id == id))
        else {
            return Ok(0);
        };

        let mut modified = false;
        for (key, value) in fields {
            if doc.fields.get(&key) != Some(&value) {
                doc.fields.insert(key, value);
                modified = true;
            }
        }
        Ok(u64::from(modified))
    }

    async fn delete(&self, collection: Collection, id: DocumentId) -> StoreResult<u64> {
        let mut documents = self.documents.write().await;
        let Some(docs) = documents.get_mut(&collection) else {
            return Ok(0);
        };
        let before = docs.len();
        docs.retain(|d| d.id != id);
        Ok((before - docs.len()) as u64)
    }
}
