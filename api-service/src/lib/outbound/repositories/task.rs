use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::FromRow;
use sqlx::PgPool;
use sqlx::Postgres;
use sqlx::QueryBuilder;

use crate::tag::models::TagId;
use crate::task::errors::TaskError;
use crate::task::models::NewTask;
use crate::task::models::Task;
use crate::task::models::TaskFilter;
use crate::task::models::TaskId;
use crate::task::models::TaskTitle;
use crate::task::models::UserId;
use crate::task::ports::TaskRepository;

const TASK_COLUMNS: &str =
    "t.id, t.title, t.description, t.status, t.priority, t.due_date, t.user_id, t.created_at, t.updated_at";

pub struct PostgresTaskRepository {
    pool: PgPool,
}

impl PostgresTaskRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct TaskRow {
    id: i64,
    title: String,
    description: Option<String>,
    status: String,
    priority: String,
    due_date: Option<DateTime<Utc>>,
    user_id: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<TaskRow> for Task {
    type Error = TaskError;

    fn try_from(row: TaskRow) -> Result<Self, Self::Error> {
        Ok(Task {
            id: TaskId(row.id),
            title: TaskTitle::new(row.title)?,
            description: row.description,
            status: row.status.parse()?,
            priority: row.priority.parse()?,
            due_date: row.due_date,
            user_id: UserId(row.user_id),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn database_error(e: sqlx::Error) -> TaskError {
    TaskError::DatabaseError(e.to_string())
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn find_by_owner(
        &self,
        owner: UserId,
        filter: &TaskFilter,
    ) -> Result<Vec<Task>, TaskError> {
        let mut query = QueryBuilder::<Postgres>::new(format!("SELECT {} FROM tasks t", TASK_COLUMNS));

        // Tag names are unique, so the join yields at most one row per task.
        if let Some(tag_name) = &filter.tag_name {
            query
                .push(" JOIN task_tags tt ON tt.task_id = t.id")
                .push(" JOIN tags g ON g.id = tt.tag_id AND g.name = ")
                .push_bind(tag_name.as_str());
        }

        query.push(" WHERE t.user_id = ").push_bind(owner.0);

        if let Some(status) = filter.status {
            query.push(" AND t.status = ").push_bind(status.as_str());
        }
        if let Some(priority) = filter.priority {
            query.push(" AND t.priority = ").push_bind(priority.as_str());
        }
        if let Some(before) = filter.due_before {
            query.push(" AND t.due_date <= ").push_bind(before);
        }
        if let Some(after) = filter.due_after {
            query.push(" AND t.due_date >= ").push_bind(after);
        }

        query.push(" ORDER BY t.id");

        let rows = query
            .build_query_as::<TaskRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(database_error)?;

        rows.into_iter().map(Task::try_from).collect()
    }

    async fn find_by_id(&self, id: TaskId, owner: UserId) -> Result<Option<Task>, TaskError> {
        let row = sqlx::query_as::<_, TaskRow>(&format!(
            "SELECT {} FROM tasks t WHERE t.id = $1 AND t.user_id = $2",
            TASK_COLUMNS
        ))
        .bind(id.0)
        .bind(owner.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?;

        row.map(Task::try_from).transpose()
    }

    async fn create(&self, task: NewTask) -> Result<Task, TaskError> {
        let row = sqlx::query_as::<_, TaskRow>(
            r#"
            INSERT INTO tasks AS t (title, description, status, priority, due_date, user_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING t.id, t.title, t.description, t.status, t.priority, t.due_date,
                      t.user_id, t.created_at, t.updated_at
            "#,
        )
        .bind(task.title.as_str())
        .bind(task.description.as_deref())
        .bind(task.status.as_str())
        .bind(task.priority.as_str())
        .bind(task.due_date)
        .bind(task.user_id.0)
        .fetch_one(&self.pool)
        .await
        .map_err(database_error)?;

        row.try_into()
    }

    async fn update(&self, task: Task) -> Result<Task, TaskError> {
        let row = sqlx::query_as::<_, TaskRow>(
            r#"
            UPDATE tasks AS t
            SET title = $3, description = $4, status = $5, priority = $6, due_date = $7,
                updated_at = NOW()
            WHERE t.id = $1 AND t.user_id = $2
            RETURNING t.id, t.title, t.description, t.status, t.priority, t.due_date,
                      t.user_id, t.created_at, t.updated_at
            "#,
        )
        .bind(task.id.0)
        .bind(task.user_id.0)
        .bind(task.title.as_str())
        .bind(task.description.as_deref())
        .bind(task.status.as_str())
        .bind(task.priority.as_str())
        .bind(task.due_date)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?;

        row.ok_or(TaskError::NotFound(task.id.to_string()))?
            .try_into()
    }

    async fn delete(&self, id: TaskId, owner: UserId) -> Result<bool, TaskError> {
        // task_tags rows go with the task through ON DELETE CASCADE.
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
            .bind(id.0)
            .bind(owner.0)
            .execute(&self.pool)
            .await
            .map_err(database_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn attach_tag(&self, task_id: TaskId, tag_id: TagId) -> Result<(), TaskError> {
        sqlx::query(
            "INSERT INTO task_tags (task_id, tag_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(task_id.0)
        .bind(tag_id.0)
        .execute(&self.pool)
        .await
        .map_err(database_error)?;

        Ok(())
    }

    async fn detach_all_tags(&self, task_id: TaskId) -> Result<(), TaskError> {
        sqlx::query("DELETE FROM task_tags WHERE task_id = $1")
            .bind(task_id.0)
            .execute(&self.pool)
            .await
            .map_err(database_error)?;

        Ok(())
    }
}
