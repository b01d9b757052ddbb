use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::FromRow;
use sqlx::PgPool;

use crate::tag::models::Tag;
use crate::tag::models::TagId;
use crate::tag::models::TagName;
use crate::tag::ports::TagRepository;
use crate::task::errors::TaskError;
use crate::task::models::TaskId;
use crate::task::models::UserId;

pub struct PostgresTagRepository {
    pool: PgPool,
}

impl PostgresTagRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct TagRow {
    id: i64,
    name: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<TagRow> for Tag {
    type Error = TaskError;

    fn try_from(row: TagRow) -> Result<Self, Self::Error> {
        Ok(Tag {
            id: TagId(row.id),
            name: TagName::new(row.name)?,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl TagRepository for PostgresTagRepository {
    async fn find_by_task(&self, task_id: TaskId) -> Result<Vec<Tag>, TaskError> {
        sqlx::query_as::<_, TagRow>(
            r#"
            SELECT g.id, g.name, g.created_at
            FROM tags g
            JOIN task_tags tt ON tt.tag_id = g.id
            WHERE tt.task_id = $1
            ORDER BY g.name
            "#,
        )
        .bind(task_id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| TaskError::DatabaseError(e.to_string()))?
        .into_iter()
        .map(Tag::try_from)
        .collect()
    }

    async fn find_by_owner(&self, owner: UserId) -> Result<Vec<Tag>, TaskError> {
        sqlx::query_as::<_, TagRow>(
            r#"
            SELECT DISTINCT g.id, g.name, g.created_at
            FROM tags g
            JOIN task_tags tt ON tt.tag_id = g.id
            JOIN tasks t ON t.id = tt.task_id
            WHERE t.user_id = $1
            ORDER BY g.name
            "#,
        )
        .bind(owner.0)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| TaskError::DatabaseError(e.to_string()))?
        .into_iter()
        .map(Tag::try_from)
        .collect()
    }

    async fn find_or_create(&self, name: &TagName) -> Result<Tag, TaskError> {
        // The no-op update makes RETURNING yield the existing row on conflict.
        let row = sqlx::query_as::<_, TagRow>(
            r#"
            INSERT INTO tags (name)
            VALUES ($1)
            ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
            RETURNING id, name, created_at
            "#,
        )
        .bind(name.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| TaskError::DatabaseError(e.to_string()))?;

        row.try_into()
    }
}
