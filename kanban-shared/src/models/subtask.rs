/// Subtask model and database operations
///
/// Subtasks are the checklist items of a task. They are created together
/// with their task (see `Task::create`) and afterwards only updated or
/// deleted individually.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE subtasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     task_id UUID NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
///     title VARCHAR(200) NOT NULL,
///     is_completed BOOLEAN NOT NULL DEFAULT FALSE,
///     "order" INTEGER NOT NULL DEFAULT 0,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use super::{group_by_parent, DataError, DataResult, Resource};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};
use std::collections::HashMap;
use uuid::Uuid;

/// Checklist item within a task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Subtask {
    pub id: Uuid,

    /// Owning task
    pub task_id: Uuid,

    pub title: String,

    pub is_completed: bool,

    /// Position among the task's subtasks
    pub order: i32,

    pub created_at: DateTime<Utc>,
}

/// Subtask supplied inline with a new task
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewSubtask {
    pub title: String,

    /// Defaults to `false`
    pub is_completed: Option<bool>,

    /// Defaults to the subtask's position in the list
    pub order: Option<i32>,
}

impl NewSubtask {
    /// Incomplete subtask with a positional order
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }
}

/// Partial update; `None` fields are left untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateSubtask {
    pub title: Option<String>,
    pub is_completed: Option<bool>,
}

const SUBTASK_COLUMNS: &str = r#"id, task_id, title, is_completed, "order", created_at"#;

impl Subtask {
    /// Finds a subtask by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Subtask>(&format!(
            "SELECT {SUBTASK_COLUMNS} FROM subtasks WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Lists a task's subtasks in display order
    ///
    /// Fails with `NotFound(Task)` if the task does not exist.
    pub async fn list_by_task(pool: &PgPool, task_id: Uuid) -> DataResult<Vec<Self>> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM tasks WHERE id = $1)")
            .bind(task_id)
            .fetch_one(pool)
            .await?;

        if !exists {
            return Err(DataError::NotFound(Resource::Task));
        }

        let mut groups = Self::load_for_tasks(pool, &[task_id]).await?;
        Ok(groups.remove(&task_id).unwrap_or_default())
    }

    /// Loads the subtasks of many tasks at once, grouped by task id
    pub(crate) async fn load_for_tasks(
        pool: &PgPool,
        task_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<Self>>, sqlx::Error> {
        if task_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, Subtask>(&format!(
            r#"
            SELECT {SUBTASK_COLUMNS}
            FROM subtasks
            WHERE task_id = ANY($1)
            ORDER BY "order" ASC, created_at ASC, id ASC
            "#
        ))
        .bind(task_ids)
        .fetch_all(pool)
        .await?;

        Ok(group_by_parent(rows, |subtask| subtask.task_id))
    }

    /// Inserts one subtask inside an open transaction
    pub(crate) async fn insert(
        conn: &mut PgConnection,
        task_id: Uuid,
        data: &NewSubtask,
        order: i32,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Subtask>(&format!(
            r#"
            INSERT INTO subtasks (task_id, title, is_completed, "order")
            VALUES ($1, $2, $3, $4)
            RETURNING {SUBTASK_COLUMNS}
            "#
        ))
        .bind(task_id)
        .bind(&data.title)
        .bind(data.is_completed.unwrap_or(false))
        .bind(order)
        .fetch_one(conn)
        .await
    }

    /// Applies a partial update
    ///
    /// Fails with `NotFound(Subtask)` if no row matches.
    pub async fn update(pool: &PgPool, id: Uuid, data: UpdateSubtask) -> DataResult<Self> {
        sqlx::query_as::<_, Subtask>(&format!(
            r#"
            UPDATE subtasks
            SET title = COALESCE($2, title),
                is_completed = COALESCE($3, is_completed)
            WHERE id = $1
            RETURNING {SUBTASK_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(data.title)
        .bind(data.is_completed)
        .fetch_optional(pool)
        .await?
        .ok_or(DataError::NotFound(Resource::Subtask))
    }

    /// Deletes a subtask, returning whether a row was removed
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM subtasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_subtask_defaults() {
        let subtask = NewSubtask::titled("Sign up page");
        assert_eq!(subtask.title, "Sign up page");
        assert_eq!(subtask.is_completed, None);
        assert_eq!(subtask.order, None);
    }

    #[test]
    fn test_subtask_serializes_camel_case() {
        let subtask = Subtask {
            id: Uuid::new_v4(),
            task_id: Uuid::new_v4(),
            title: "Internal testing".to_string(),
            is_completed: true,
            order: 2,
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&subtask).unwrap();
        assert_eq!(json["isCompleted"], true);
        assert_eq!(json["order"], 2);
        assert!(json["taskId"].is_string());
        assert!(json["createdAt"].is_string());
    }
}
