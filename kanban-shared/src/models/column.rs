/// Column model and database operations
///
/// Columns are the colored lanes of a board. Each column holds an ordered
/// list of tasks.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE columns (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     board_id UUID NOT NULL REFERENCES boards(id) ON DELETE CASCADE,
///     name VARCHAR(50) NOT NULL,
///     color VARCHAR(7) NOT NULL DEFAULT '#635FC7',
///     "order" INTEGER NOT NULL DEFAULT 0,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use super::task::Task;
use super::{group_by_parent, DataError, DataResult, Resource};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};
use std::collections::HashMap;
use uuid::Uuid;

/// Accent color used when a column is created without one
pub const DEFAULT_COLUMN_COLOR: &str = "#635FC7";

/// Column with its tasks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub id: Uuid,

    /// Owning board
    pub board_id: Uuid,

    pub name: String,

    /// `#RRGGBB`
    pub color: String,

    /// Position among the board's columns
    pub order: i32,

    pub created_at: DateTime<Utc>,

    /// Tasks ordered by `order`, each with subtasks
    pub tasks: Vec<Task>,
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ColumnRow {
    id: Uuid,
    board_id: Uuid,
    name: String,
    color: String,
    order: i32,
    created_at: DateTime<Utc>,
}

impl ColumnRow {
    pub(crate) fn into_column(self, tasks: Vec<Task>) -> Column {
        Column {
            id: self.id,
            board_id: self.board_id,
            name: self.name,
            color: self.color,
            order: self.order,
            created_at: self.created_at,
            tasks,
        }
    }
}

/// Input for creating a column on an existing board
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateColumn {
    pub board_id: Uuid,
    pub name: String,

    /// Defaults to [`DEFAULT_COLUMN_COLOR`]
    pub color: Option<String>,

    /// Defaults to 0
    pub order: Option<i32>,
}

/// Partial update; `None` fields are left untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateColumn {
    pub name: Option<String>,
    pub color: Option<String>,
    pub order: Option<i32>,
}

const COLUMN_COLUMNS: &str = r#"id, board_id, name, color, "order", created_at"#;

impl Column {
    /// Finds a column by ID, with tasks and subtasks
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let row = sqlx::query_as::<_, ColumnRow>(&format!(
            "SELECT {COLUMN_COLUMNS} FROM columns WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        match row {
            Some(row) => Ok(Some(Self::with_tasks(pool, row).await?)),
            None => Ok(None),
        }
    }

    /// Lists a board's columns in display order, with tasks and subtasks
    ///
    /// Fails with `NotFound(Board)` if the board does not exist.
    pub async fn list_by_board(pool: &PgPool, board_id: Uuid) -> DataResult<Vec<Self>> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM boards WHERE id = $1)")
            .bind(board_id)
            .fetch_one(pool)
            .await?;

        if !exists {
            return Err(DataError::NotFound(Resource::Board));
        }

        let mut groups = Self::load_for_boards(pool, &[board_id]).await?;
        Ok(groups.remove(&board_id).unwrap_or_default())
    }

    /// Loads the full column trees of many boards, grouped by board id
    pub(crate) async fn load_for_boards(
        pool: &PgPool,
        board_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<Self>>, sqlx::Error> {
        if board_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, ColumnRow>(&format!(
            r#"
            SELECT {COLUMN_COLUMNS}
            FROM columns
            WHERE board_id = ANY($1)
            ORDER BY "order" ASC, created_at ASC, id ASC
            "#
        ))
        .bind(board_ids)
        .fetch_all(pool)
        .await?;

        let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
        let mut tasks = Task::load_for_columns(pool, &ids).await?;

        let columns = rows
            .into_iter()
            .map(|row| {
                let children = tasks.remove(&row.id).unwrap_or_default();
                row.into_column(children)
            })
            .collect();

        Ok(group_by_parent(columns, |column: &Column| column.board_id))
    }

    async fn with_tasks(pool: &PgPool, row: ColumnRow) -> Result<Self, sqlx::Error> {
        let mut tasks = Task::load_for_columns(pool, &[row.id]).await?;
        let children = tasks.remove(&row.id).unwrap_or_default();
        Ok(row.into_column(children))
    }

    /// Inserts one column inside an open transaction
    pub(crate) async fn insert(
        conn: &mut PgConnection,
        board_id: Uuid,
        name: &str,
        color: Option<&str>,
        order: i32,
    ) -> Result<ColumnRow, sqlx::Error> {
        sqlx::query_as::<_, ColumnRow>(&format!(
            r#"
            INSERT INTO columns (board_id, name, color, "order")
            VALUES ($1, $2, $3, $4)
            RETURNING {COLUMN_COLUMNS}
            "#
        ))
        .bind(board_id)
        .bind(name)
        .bind(color.unwrap_or(DEFAULT_COLUMN_COLOR))
        .bind(order)
        .fetch_one(conn)
        .await
    }

    /// Creates an empty column on an existing board
    ///
    /// The board row is share-locked until the insert commits. Fails with
    /// `NotFound(Board)` if the board does not exist.
    pub async fn create(pool: &PgPool, data: CreateColumn) -> DataResult<Self> {
        let mut tx = pool.begin().await?;

        let board: Option<Uuid> =
            sqlx::query_scalar("SELECT id FROM boards WHERE id = $1 FOR SHARE")
                .bind(data.board_id)
                .fetch_optional(&mut *tx)
                .await?;

        if board.is_none() {
            return Err(DataError::NotFound(Resource::Board));
        }

        let row = Self::insert(
            &mut tx,
            data.board_id,
            &data.name,
            data.color.as_deref(),
            data.order.unwrap_or(0),
        )
        .await?;

        tx.commit().await?;

        Ok(row.into_column(Vec::new()))
    }

    /// Applies a partial update
    ///
    /// Fails with `NotFound(Column)` if no row matches.
    pub async fn update(pool: &PgPool, id: Uuid, data: UpdateColumn) -> DataResult<Self> {
        let row = sqlx::query_as::<_, ColumnRow>(&format!(
            r#"
            UPDATE columns
            SET name = COALESCE($2, name),
                color = COALESCE($3, color),
                "order" = COALESCE($4, "order")
            WHERE id = $1
            RETURNING {COLUMN_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(data.name)
        .bind(data.color)
        .bind(data.order)
        .fetch_optional(pool)
        .await?
        .ok_or(DataError::NotFound(Resource::Column))?;

        Ok(Self::with_tasks(pool, row).await?)
    }

    /// Deletes a column and, by cascade, its tasks and subtasks
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM columns WHERE id = $1")
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
    fn test_default_color_is_hex() {
        assert_eq!(DEFAULT_COLUMN_COLOR.len(), 7);
        assert!(DEFAULT_COLUMN_COLOR.starts_with('#'));
        assert!(DEFAULT_COLUMN_COLOR[1..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_column_serializes_camel_case() {
        let column = Column {
            id: Uuid::new_v4(),
            board_id: Uuid::new_v4(),
            name: "DOING".to_string(),
            color: "#8471F2".to_string(),
            order: 1,
            created_at: Utc::now(),
            tasks: vec![],
        };

        let json = serde_json::to_value(&column).unwrap();
        assert!(json["boardId"].is_string());
        assert_eq!(json["color"], "#8471F2");
        assert_eq!(json["tasks"], serde_json::json!([]));
    }
}
