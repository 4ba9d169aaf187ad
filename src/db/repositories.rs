//! PostgreSQL-backed credential and document stores.

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use super::DbPool;
use crate::models::{Collection, Document, DocumentId, Fields, NewUser, UserRecord};
use crate::repositories::{DocumentStore, StoreError, StoreResult, UserStore};

#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_unique(e: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            return StoreError::Duplicate;
        }
    }
    StoreError::Db(e)
}

// ---- Users ----

#[async_trait]
impl UserStore for PgStore {
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<UserRecord>> {
        let row = sqlx::query_as::<_, UserRecord>(
            "SELECT id, name, email, password_hash, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn insert(&self, user: NewUser) -> StoreResult<UserRecord> {
        let row = sqlx::query_as::<_, UserRecord>(
            r#"
            INSERT INTO users (id, name, email, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, password_hash, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(map_unique)?;
        Ok(row)
    }
}

// ---- Documents ----

#[derive(Debug, FromRow)]
struct DocumentRow {
    id: Uuid,
    doc: Json<Fields>,
}

impl From<DocumentRow> for Document {
    fn from(row: DocumentRow) -> Self {
        Document::new(row.id.into(), row.doc.0)
    }
}

#[async_trait]
impl DocumentStore for PgStore {
    async fn find_all(&self, collection: Collection) -> StoreResult<Vec<Document>> {
        let sql = format!(
            "SELECT id, doc FROM {} ORDER BY created_at, id",
            collection.name()
        );
        let rows = sqlx::query_as::<_, DocumentRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Document::from).collect())
    }

    async fn find_one(
        &self,
        collection: Collection,
        id: DocumentId,
    ) -> StoreResult<Option<Document>> {
        let sql = format!("SELECT id, doc FROM {} WHERE id = $1", collection.name());
        let row = sqlx::query_as::<_, DocumentRow>(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Document::from))
    }

    async fn insert(&self, collection: Collection, fields: Fields) -> StoreResult<Document> {
        let doc = Document::new(DocumentId::new(), fields);
        let sql = format!("INSERT INTO {} (id, doc) VALUES ($1, $2)", collection.name());
        sqlx::query(&sql)
            .bind(doc.id.as_uuid())
            .bind(Json(&doc.fields))
            .execute(&self.pool)
            .await?;
        Ok(doc)
    }

    async fn set_fields(
        &self,
        collection: Collection,
        id: DocumentId,
        fields: Fields,
    ) -> StoreResult<u64> {
        // Rows whose merged document equals the stored one are untouched and report 0.
        let sql = format!(
            "UPDATE {} SET doc = doc || $2 WHERE id = $1 AND (doc || $2) IS DISTINCT FROM doc",
            collection.name()
        );
        let r = sqlx::query(&sql)
            .bind(id.as_uuid())
            .bind(Json(&fields))
            .execute(&self.pool)
            .await?;
        Ok(r.rows_affected())
    }

    async fn delete(&self, collection: Collection, id: DocumentId) -> StoreResult<u64> {
        let sql = format!("DELETE FROM {} WHERE id = $1", collection.name());
        let r = sqlx::query(&sql)
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;
        Ok(r.rows_affected())
    }
}
