//! `PostgreSQL` implementation of the `StoryRepository` trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use tracing::instrument;

use adventure_core::error::DomainError;
use adventure_core::repository::StoryRepository;
use adventure_core::story::{FlatNode, StoredNode, StoredOption, StoryRecord};
use adventure_story::bind_ids;

/// PostgreSQL-backed story repository.
///
/// Options are stored as an embedded ordered JSON list per node row, which
/// keeps `flatten`/`hydrate` symmetric with the storage shape.
#[derive(Debug, Clone)]
pub struct PgStoryRepository {
    pool: PgPool,
}

impl PgStoryRepository {
    /// Creates a new `PgStoryRepository`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn persistence(err: sqlx::Error) -> DomainError {
    DomainError::Persistence(err.to_string())
}

#[async_trait]
impl StoryRepository for PgStoryRepository {
    /// Nodes are inserted in pre-order with empty option lists first, so
    /// the database assigns every identifier before options are rebound
    /// to them. The whole save is one transaction: no partial story tree
    /// is ever visible to readers.
    #[instrument(skip_all, fields(node_count = nodes.len()))]
    async fn save_story(
        &self,
        title: &str,
        session_id: &str,
        created_at: DateTime<Utc>,
        nodes: &[FlatNode],
    ) -> Result<i64, DomainError> {
        let mut tx = self.pool.begin().await.map_err(persistence)?;

        let story_id: i64 = sqlx::query_scalar(
            "INSERT INTO stories (title, session_id, created_at)
             VALUES ($1, $2, $3)
             RETURNING id",
        )
        .bind(title)
        .bind(session_id)
        .bind(created_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(persistence)?;

        let mut ids = Vec::with_capacity(nodes.len());
        for (index, node) in nodes.iter().enumerate() {
            let id: i64 = sqlx::query_scalar(
                "INSERT INTO story_nodes
                     (story_id, content, is_root, is_ending, is_winning, options_json)
                 VALUES ($1, $2, $3, $4, $5, '[]'::jsonb)
                 RETURNING id",
            )
            .bind(story_id)
            .bind(&node.content)
            .bind(index == 0)
            .bind(node.is_ending)
            .bind(node.is_winning_ending)
            .fetch_one(&mut *tx)
            .await
            .map_err(persistence)?;
            ids.push(id);
        }

        let stored = bind_ids(nodes, &ids)?;
        for node in &stored {
            if node.options.is_empty() {
                continue;
            }
            // Serialization of derived Serialize types to Value is infallible.
            let options = serde_json::to_value(&node.options)
                .expect("StoredOption serialization is infallible");
            sqlx::query("UPDATE story_nodes SET options_json = $1 WHERE id = $2")
                .bind(options)
                .bind(node.id)
                .execute(&mut *tx)
                .await
                .map_err(persistence)?;
        }

        tx.commit().await.map_err(persistence)?;
        Ok(story_id)
    }

    #[instrument(skip(self))]
    async fn load_story(
        &self,
        story_id: i64,
    ) -> Result<(StoryRecord, Vec<StoredNode>), DomainError> {
        let header = sqlx::query(
            "SELECT id, title, session_id, created_at FROM stories WHERE id = $1",
        )
        .bind(story_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(persistence)?;

        let Some(header) = header else {
            return Err(DomainError::story_not_found(story_id));
        };

        let record = StoryRecord {
            id: header.get("id"),
            title: header.get("title"),
            session_id: header.get("session_id"),
            created_at: header.get("created_at"),
        };

        let rows = sqlx::query(
            "SELECT id, content, is_root, is_ending, is_winning, options_json
             FROM story_nodes
             WHERE story_id = $1
             ORDER BY id",
        )
        .bind(story_id)
        .fetch_all(&self.pool)
        .await
        .map_err(persistence)?;

        let nodes = rows
            .into_iter()
            .map(|row| {
                let options: Vec<StoredOption> =
                    serde_json::from_value(row.get::<serde_json::Value, _>("options_json"))
                        .map_err(|e| {
                            DomainError::Integrity(format!(
                                "undecodable options on a node of story {story_id}: {e}"
                            ))
                        })?;
                Ok(StoredNode {
                    id: row.get("id"),
                    content: row.get("content"),
                    is_root: row.get("is_root"),
                    is_ending: row.get("is_ending"),
                    is_winning_ending: row.get("is_winning"),
                    options,
                })
            })
            .collect::<Result<Vec<_>, DomainError>>()?;

        Ok((record, nodes))
    }
}
