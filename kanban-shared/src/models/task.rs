/// Task model and database operations
///
/// A task is a unit of work inside a column. It carries an optional
/// description and an ordered checklist of subtasks.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     column_id UUID NOT NULL REFERENCES columns(id) ON DELETE CASCADE,
///     title VARCHAR(200) NOT NULL,
///     description VARCHAR(1000),
///     "order" INTEGER NOT NULL DEFAULT 0,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Moving tasks
///
/// Reassigning a task to another column locks the target column row
/// (`FOR SHARE`) in the same transaction as the update. A concurrent delete
/// of that column waits for the move to commit and then cascades over the
/// moved task, so a task can never end up pointing at a deleted column.
///
/// # Example
///
/// ```no_run
/// use kanban_shared::models::task::{Task, CreateTask, UpdateTask};
/// use kanban_shared::models::subtask::NewSubtask;
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, todo: Uuid, doing: Uuid) -> Result<(), Box<dyn std::error::Error>> {
/// let task = Task::create(&pool, CreateTask {
///     column_id: todo,
///     title: "Build settings UI".to_string(),
///     description: None,
///     order: None,
///     subtasks: vec![NewSubtask::titled("Account page")],
/// }).await?;
///
/// // Move it to another column
/// Task::update(&pool, task.id, UpdateTask {
///     column_id: Some(doing),
///     ..Default::default()
/// }).await?;
/// # Ok(())
/// # }
/// ```

use super::subtask::{NewSubtask, Subtask};
use super::{group_by_parent, order_or_index, DataError, DataResult, Resource};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};
use std::collections::HashMap;
use uuid::Uuid;

/// Task with its subtasks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,

    /// Owning column
    pub column_id: Uuid,

    pub title: String,

    pub description: Option<String>,

    /// Position among the column's tasks
    pub order: i32,

    pub created_at: DateTime<Utc>,

    /// Checklist, ordered by `order`
    pub subtasks: Vec<Subtask>,

    /// Owning column's id and name; only filled in by `find_by_id`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<ColumnRef>,
}

/// Minimal view of a task's column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ColumnRef {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, sqlx::FromRow)]
struct TaskRow {
    id: Uuid,
    column_id: Uuid,
    title: String,
    description: Option<String>,
    order: i32,
    created_at: DateTime<Utc>,
}

impl TaskRow {
    fn into_task(self, subtasks: Vec<Subtask>) -> Task {
        Task {
            id: self.id,
            column_id: self.column_id,
            title: self.title,
            description: self.description,
            order: self.order,
            created_at: self.created_at,
            subtasks,
            column: None,
        }
    }
}

/// Input for creating a task
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateTask {
    /// Column the task is created in; must exist
    pub column_id: Uuid,

    pub title: String,

    /// Empty descriptions are stored as NULL
    pub description: Option<String>,

    /// Defaults to 0
    pub order: Option<i32>,

    /// Created in the same transaction as the task
    pub subtasks: Vec<NewSubtask>,
}

/// Partial update; `None` fields are left untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateTask {
    pub title: Option<String>,

    /// `Some("")` clears the description
    pub description: Option<String>,

    /// Moves the task; the target column must exist
    pub column_id: Option<Uuid>,

    pub order: Option<i32>,
}

impl Task {
    /// Number of completed subtasks
    pub fn completed_subtasks(&self) -> usize {
        self.subtasks.iter().filter(|s| s.is_completed).count()
    }
}

const TASK_COLUMNS: &str = r#"id, column_id, title, description, "order", created_at"#;

impl Task {
    /// Finds a task by ID, with subtasks and its column's id and name
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let row = sqlx::query_as::<_, TaskRow>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let column = sqlx::query_as::<_, ColumnRef>("SELECT id, name FROM columns WHERE id = $1")
            .bind(row.column_id)
            .fetch_optional(pool)
            .await?;

        let mut task = Self::assemble(pool, vec![row]).await?.remove(0);
        task.column = column;
        Ok(Some(task))
    }

    /// Lists a column's tasks in display order, each with its subtasks
    ///
    /// Fails with `NotFound(Column)` if the column does not exist.
    pub async fn list_by_column(pool: &PgPool, column_id: Uuid) -> DataResult<Vec<Self>> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM columns WHERE id = $1)")
                .bind(column_id)
                .fetch_one(pool)
                .await?;

        if !exists {
            return Err(DataError::NotFound(Resource::Column));
        }

        let mut groups = Self::load_for_columns(pool, &[column_id]).await?;
        Ok(groups.remove(&column_id).unwrap_or_default())
    }

    /// Loads the tasks (with subtasks) of many columns, grouped by column id
    pub(crate) async fn load_for_columns(
        pool: &PgPool,
        column_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<Self>>, sqlx::Error> {
        if column_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, TaskRow>(&format!(
            r#"
            SELECT {TASK_COLUMNS}
            FROM tasks
            WHERE column_id = ANY($1)
            ORDER BY "order" ASC, created_at ASC, id ASC
            "#
        ))
        .bind(column_ids)
        .fetch_all(pool)
        .await?;

        let tasks = Self::assemble(pool, rows).await?;
        Ok(group_by_parent(tasks, |task| task.column_id))
    }

    /// Attaches subtasks to already-ordered task rows
    async fn assemble(pool: &PgPool, rows: Vec<TaskRow>) -> Result<Vec<Self>, sqlx::Error> {
        let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
        let mut subtasks = Subtask::load_for_tasks(pool, &ids).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let children = subtasks.remove(&row.id).unwrap_or_default();
                row.into_task(children)
            })
            .collect())
    }

    /// Creates a task and its subtasks atomically
    ///
    /// Subtasks without an explicit order get their list position. Fails with
    /// `NotFound(Column)` if the column does not exist.
    pub async fn create(pool: &PgPool, data: CreateTask) -> DataResult<Self> {
        let mut tx = pool.begin().await?;

        lock_column(&mut tx, data.column_id).await?;

        let row = sqlx::query_as::<_, TaskRow>(&format!(
            r#"
            INSERT INTO tasks (column_id, title, description, "order")
            VALUES ($1, $2, NULLIF($3, ''), $4)
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(data.column_id)
        .bind(&data.title)
        .bind(&data.description)
        .bind(data.order.unwrap_or(0))
        .fetch_one(&mut *tx)
        .await?;

        let mut subtasks = Vec::with_capacity(data.subtasks.len());
        for (index, subtask) in data.subtasks.iter().enumerate() {
            let order = order_or_index(subtask.order, index);
            subtasks.push(Subtask::insert(&mut tx, row.id, subtask, order).await?);
        }

        tx.commit().await?;

        subtasks.sort_by_key(|subtask| subtask.order);
        Ok(row.into_task(subtasks))
    }

    /// Applies a partial update, moving the task if `column_id` is set
    ///
    /// Fails with `NotFound(Column)` if the target column does not exist, or
    /// `NotFound(Task)` if the task does not.
    pub async fn update(pool: &PgPool, id: Uuid, data: UpdateTask) -> DataResult<Self> {
        let mut tx = pool.begin().await?;

        if let Some(column_id) = data.column_id {
            lock_column(&mut tx, column_id).await?;
        }

        let row = sqlx::query_as::<_, TaskRow>(&format!(
            r#"
            UPDATE tasks
            SET title = COALESCE($2, title),
                description = CASE WHEN $3 THEN NULLIF($4, '') ELSE description END,
                column_id = COALESCE($5, column_id),
                "order" = COALESCE($6, "order")
            WHERE id = $1
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(data.title)
        .bind(data.description.is_some())
        .bind(data.description)
        .bind(data.column_id)
        .bind(data.order)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(DataError::NotFound(Resource::Task))?;

        tx.commit().await?;

        Ok(Self::assemble(pool, vec![row]).await?.remove(0))
    }

    /// Deletes a task and, by cascade, its subtasks
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Share-locks a column row for the rest of the transaction
async fn lock_column(conn: &mut PgConnection, column_id: Uuid) -> DataResult<()> {
    let locked: Option<Uuid> = sqlx::query_scalar("SELECT id FROM columns WHERE id = $1 FOR SHARE")
        .bind(column_id)
        .fetch_optional(conn)
        .await?;

    locked.map(|_| ()).ok_or(DataError::NotFound(Resource::Column))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subtask(task_id: Uuid, done: bool) -> Subtask {
        Subtask {
            id: Uuid::new_v4(),
            task_id,
            title: "step".to_string(),
            is_completed: done,
            order: 0,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_completed_subtasks() {
        let id = Uuid::new_v4();
        let task = Task {
            id,
            column_id: Uuid::new_v4(),
            title: "Build UI for onboarding flow".to_string(),
            description: None,
            order: 0,
            created_at: Utc::now(),
            subtasks: vec![subtask(id, true), subtask(id, false), subtask(id, true)],
            column: None,
        };

        assert_eq!(task.completed_subtasks(), 2);
    }

    #[test]
    fn test_column_ref_only_serialized_when_present() {
        let mut task = Task {
            id: Uuid::new_v4(),
            column_id: Uuid::new_v4(),
            title: "Build UI for search".to_string(),
            description: Some("Filters".to_string()),
            order: 1,
            created_at: Utc::now(),
            subtasks: vec![],
            column: None,
        };

        let json = serde_json::to_value(&task).unwrap();
        assert!(json.get("column").is_none());
        assert!(json["columnId"].is_string());

        task.column = Some(ColumnRef {
            id: task.column_id,
            name: "TODO".to_string(),
        });
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["column"]["name"], "TODO");
    }
}
