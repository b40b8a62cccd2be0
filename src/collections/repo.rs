use anyhow::Context;
use async_trait::async_trait;
use sqlx::{types::Json, PgPool};
use tracing::{debug, instrument};
use uuid::Uuid;

use super::types::{Collection, Document, Fields, UpsertOutcome};

/// Single-document operations over the resource collections.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn insert(&self, collection: Collection, fields: Fields) -> anyhow::Result<Uuid>;
    /// All documents in insertion order.
    async fn find_all(&self, collection: Collection) -> anyhow::Result<Vec<Document>>;
    async fn find_by_id(&self, collection: Collection, id: Uuid)
        -> anyhow::Result<Option<Document>>;
    /// Sets `fields` on the document, creating it under `id` if absent.
    async fn upsert(
        &self,
        collection: Collection,
        id: Uuid,
        fields: Fields,
    ) -> anyhow::Result<UpsertOutcome>;
    /// Number of documents removed (0 or 1).
    async fn delete(&self, collection: Collection, id: Uuid) -> anyhow::Result<u64>;
}

/// One table per collection: `(seq BIGSERIAL, id UUID PRIMARY KEY, doc JSONB)`.
#[derive(Clone)]
pub struct PgDocumentStore {
    db: PgPool,
}

impl PgDocumentStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    #[instrument(skip(self, fields))]
    async fn insert(&self, collection: Collection, fields: Fields) -> anyhow::Result<Uuid> {
        let id = Uuid::new_v4();
        let sql = format!("INSERT INTO {} (id, doc) VALUES ($1, $2)", collection.table());
        sqlx::query(&sql)
            .bind(id)
            .bind(Json(fields))
            .execute(&self.db)
            .await
            .with_context(|| format!("insert into {collection}"))?;
        debug!(%id, "document inserted");
        Ok(id)
    }

    #[instrument(skip(self))]
    async fn find_all(&self, collection: Collection) -> anyhow::Result<Vec<Document>> {
        let sql = format!("SELECT id, doc FROM {} ORDER BY seq ASC", collection.table());
        let rows = sqlx::query_as::<_, (Uuid, Json<Fields>)>(&sql)
            .fetch_all(&self.db)
            .await
            .with_context(|| format!("list {collection}"))?;
        Ok(rows
            .into_iter()
            .map(|(id, Json(fields))| Document { id, fields })
            .collect())
    }

    #[instrument(skip(self))]
    async fn find_by_id(
        &self,
        collection: Collection,
        id: Uuid,
    ) -> anyhow::Result<Option<Document>> {
        let sql = format!("SELECT id, doc FROM {} WHERE id = $1", collection.table());
        let row = sqlx::query_as::<_, (Uuid, Json<Fields>)>(&sql)
            .bind(id)
            .fetch_optional(&self.db)
            .await
            .with_context(|| format!("get {collection} {id}"))?;
        Ok(row.map(|(id, Json(fields))| Document { id, fields }))
    }

    #[instrument(skip(self, fields))]
    async fn upsert(
        &self,
        collection: Collection,
        id: Uuid,
        fields: Fields,
    ) -> anyhow::Result<UpsertOutcome> {
        // No row back means the conflict update was skipped: nothing changed.
        // xmax = 0 only for a freshly inserted tuple.
        let table = collection.table();
        let sql = format!(
            r#"
            INSERT INTO {table} (id, doc) VALUES ($1, $2)
            ON CONFLICT (id) DO UPDATE
                SET doc = {table}.doc || EXCLUDED.doc
                WHERE {table}.doc || EXCLUDED.doc IS DISTINCT FROM {table}.doc
            RETURNING (xmax = 0) AS inserted
            "#
        );
        let row = sqlx::query_as::<_, (bool,)>(&sql)
            .bind(id)
            .bind(Json(fields))
            .fetch_optional(&self.db)
            .await
            .with_context(|| format!("upsert {collection} {id}"))?;

        Ok(match row {
            Some((true,)) => UpsertOutcome::Inserted,
            Some((false,)) => UpsertOutcome::Modified,
            None => UpsertOutcome::Unchanged,
        })
    }

    #[instrument(skip(self))]
    async fn delete(&self, collection: Collection, id: Uuid) -> anyhow::Result<u64> {
        let sql = format!("DELETE FROM {} WHERE id = $1", collection.table());
        let res = sqlx::query(&sql)
            .bind(id)
            .execute(&self.db)
            .await
            .with_context(|| format!("delete {collection} {id}"))?;
        Ok(res.rows_affected())
    }
}

#[cfg(test)]
pub use in_memory::InMemoryDocumentStore;
