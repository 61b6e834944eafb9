/// Database models for the kanban service
///
/// Boards own columns, columns own tasks, tasks own subtasks. Every child
/// table has an `ON DELETE CASCADE` foreign key to its parent, so deleting a
/// row removes its whole subtree in one statement.
///
/// Read operations return fully assembled trees: a board carries its columns,
/// each column its tasks, each task its subtasks. Sibling sets are always
/// ordered by `order` ascending; ties fall back to creation time and id.
///
/// # Models
///
/// - `board`: Top-level boards
/// - `column`: Ordered, colored lanes within a board
/// - `task`: Units of work within a column
/// - `subtask`: Checklist items within a task
///
/// # Example
///
/// ```no_run
/// use kanban_shared::models::board::{Board, CreateBoard, NewColumn};
/// use kanban_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let board = Board::create(&pool, CreateBoard {
///     name: "Launch".to_string(),
///     columns: vec![NewColumn::named("TODO"), NewColumn::named("DOING")],
/// }).await?;
///
/// assert_eq!(board.columns.len(), 2);
/// # Ok(())
/// # }
/// ```

pub mod board;
pub mod column;
pub mod subtask;
pub mod task;

use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

/// Entity kinds, used to say which row was missing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Board,
    Column,
    Task,
    Subtask,
}

impl Resource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Board => "Board",
            Resource::Column => "Column",
            Resource::Task => "Task",
            Resource::Subtask => "Subtask",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Data-access errors
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    /// The target row, or the parent it must attach to, does not exist
    #[error("{0} not found")]
    NotFound(Resource),

    /// Any other database failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Result alias for model operations
pub type DataResult<T> = Result<T, DataError>;

/// Buckets already-ordered rows by parent id, keeping their relative order
pub(crate) fn group_by_parent<T>(
    rows: Vec<T>,
    parent_of: impl Fn(&T) -> Uuid,
) -> HashMap<Uuid, Vec<T>> {
    let mut groups: HashMap<Uuid, Vec<T>> = HashMap::new();
    for row in rows {
        groups.entry(parent_of(&row)).or_default().push(row);
    }
    groups
}

/// Order used for the `index`-th element of a nested create when the caller
/// gave none
pub(crate) fn order_or_index(order: Option<i32>, index: usize) -> i32 {
    order.unwrap_or_else(|| i32::try_from(index).unwrap_or(i32::MAX))
}
