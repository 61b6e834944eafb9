/// Board model and database operations
///
/// Boards are the roots of the data tree. Every read returns the whole tree
/// (columns → tasks → subtasks), since the board view renders all of it.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE boards (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(100) NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use super::column::Column;
use super::{order_or_index, DataError, DataResult, Resource};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Board with its full column tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: Uuid,

    pub name: String,

    pub created_at: DateTime<Utc>,

    /// Columns ordered by `order`
    pub columns: Vec<Column>,
}

#[derive(Debug, sqlx::FromRow)]
struct BoardRow {
    id: Uuid,
    name: String,
    created_at: DateTime<Utc>,
}

impl BoardRow {
    fn into_board(self, columns: Vec<Column>) -> Board {
        Board {
            id: self.id,
            name: self.name,
            created_at: self.created_at,
            columns,
        }
    }
}

/// Column supplied inline with a new board
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewColumn {
    pub name: String,

    /// Defaults to the standard accent color
    pub color: Option<String>,

    /// Defaults to the column's position in the list
    pub order: Option<i32>,
}

impl NewColumn {
    /// Column with default color and positional order
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Input for creating a board
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateBoard {
    pub name: String,

    /// Created in the same transaction as the board
    pub columns: Vec<NewColumn>,
}

/// Partial update; `None` fields are left untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateBoard {
    pub name: Option<String>,
}

impl Board {
    /// Total number of tasks across all columns
    pub fn task_count(&self) -> usize {
        self.columns.iter().map(|column| column.tasks.len()).sum()
    }

    /// Column holding the given task, if it is on this board
    pub fn column_of_task(&self, task_id: Uuid) -> Option<&Column> {
        self.columns
            .iter()
            .find(|column| column.tasks.iter().any(|task| task.id == task_id))
    }
}

impl Board {
    /// Lists every board, newest first, each with its full tree
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let rows = sqlx::query_as::<_, BoardRow>(
            "SELECT id, name, created_at FROM boards ORDER BY created_at DESC, id ASC",
        )
        .fetch_all(pool)
        .await?;

        let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
        let mut columns = Column::load_for_boards(pool, &ids).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let children = columns.remove(&row.id).unwrap_or_default();
                row.into_board(children)
            })
            .collect())
    }

    /// Finds a board by ID, with its full tree
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let row = sqlx::query_as::<_, BoardRow>(
            "SELECT id, name, created_at FROM boards WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        match row {
            Some(row) => Ok(Some(Self::with_columns(pool, row).await?)),
            None => Ok(None),
        }
    }

    async fn with_columns(pool: &PgPool, row: BoardRow) -> Result<Self, sqlx::Error> {
        let mut columns = Column::load_for_boards(pool, &[row.id]).await?;
        let children = columns.remove(&row.id).unwrap_or_default();
        Ok(row.into_board(children))
    }

    /// Creates a board and its initial columns atomically
    ///
    /// Columns without an explicit order get their list position.
    pub async fn create(pool: &PgPool, data: CreateBoard) -> DataResult<Self> {
        let mut tx = pool.begin().await?;

        let row = sqlx::query_as::<_, BoardRow>(
            "INSERT INTO boards (name) VALUES ($1) RETURNING id, name, created_at",
        )
        .bind(&data.name)
        .fetch_one(&mut *tx)
        .await?;

        let mut columns = Vec::with_capacity(data.columns.len());
        for (index, column) in data.columns.iter().enumerate() {
            let inserted = Column::insert(
                &mut tx,
                row.id,
                &column.name,
                column.color.as_deref(),
                order_or_index(column.order, index),
            )
            .await?;
            columns.push(inserted.into_column(Vec::new()));
        }

        tx.commit().await?;

        columns.sort_by_key(|column| column.order);
        Ok(row.into_board(columns))
    }

    /// Applies a partial update
    ///
    /// Fails with `NotFound(Board)` if no row matches.
    pub async fn update(pool: &PgPool, id: Uuid, data: UpdateBoard) -> DataResult<Self> {
        let row = sqlx::query_as::<_, BoardRow>(
            r#"
            UPDATE boards
            SET name = COALESCE($2, name)
            WHERE id = $1
            RETURNING id, name, created_at
            "#,
        )
        .bind(id)
        .bind(data.name)
        .fetch_optional(pool)
        .await?
        .ok_or(DataError::NotFound(Resource::Board))?;

        Ok(Self::with_columns(pool, row).await?)
    }

    /// Deletes a board and, by cascade, everything under it
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM boards WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
