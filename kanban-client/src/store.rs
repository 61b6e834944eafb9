/// Client-side board state
///
/// [`BoardStore`] keeps the board list and one active board. The server is
/// the source of truth: every mutation is followed by a re-fetch of the board
/// it touched. The one exception is [`BoardStore::toggle_subtask`], which
/// patches the active board before the request goes out and reverts the patch
/// if the request fails.
///
/// Failed mutations return the error and leave the stored boards as they
/// were. Only [`BoardStore::fetch_all`] records its failure in
/// [`BoardStore::error`].
///
/// # Example
///
/// ```no_run
/// use kanban_client::{api::HttpBoardApi, store::BoardStore};
///
/// # async fn example() -> kanban_client::error::ClientResult<()> {
/// let mut store = BoardStore::new(HttpBoardApi::new("http://localhost:5100"));
/// store.fetch_all().await?;
/// if let Some(board) = store.current() {
///     println!("Active board: {}", board.name);
/// }
/// # Ok(())
/// # }
/// ```

use crate::{
    api::BoardApi,
    error::{ClientError, ClientResult},
};
use kanban_shared::{
    models::{board::Board, column::Column, subtask::Subtask, task::Task},
    validation::requests::{
        CreateBoardRequest, CreateColumnRequest, CreateTaskRequest, UpdateBoardRequest,
        UpdateColumnRequest, UpdateSubtaskRequest, UpdateTaskRequest,
    },
};
use uuid::Uuid;

/// Board list plus the active board
pub struct BoardStore<A> {
    api: A,
    boards: Vec<Board>,
    current: Option<Board>,
    loading: bool,
    error: Option<String>,
}

impl<A: BoardApi> BoardStore<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            boards: Vec::new(),
            current: None,
            loading: false,
            error: None,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Boards as of the last fetch, newest first
    pub fn boards(&self) -> &[Board] {
        &self.boards
    }

    /// Active board
    pub fn current(&self) -> Option<&Board> {
        self.current.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Message of the last failed `fetch_all`
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Loads the board list
    ///
    /// Selects the first board when none is active; otherwise swaps the
    /// active board for its refreshed copy, or for the first board when it
    /// no longer exists. On failure the previous data is kept.
    pub async fn fetch_all(&mut self) -> ClientResult<()> {
        self.loading = true;
        self.error = None;

        let result = self.api.list_boards().await;
        self.loading = false;

        let boards = match result {
            Ok(boards) => boards,
            Err(err) => {
                tracing::warn!("Failed to load boards: {}", err);
                self.error = Some(err.to_string());
                return Err(err);
            }
        };

        let current_id = self.current.as_ref().map(|board| board.id);
        self.current = current_id
            .and_then(|id| boards.iter().find(|board| board.id == id))
            .or_else(|| boards.first())
            .cloned();
        self.boards = boards;

        tracing::debug!(boards = self.boards.len(), "Boards loaded");
        Ok(())
    }

    /// Makes a loaded board active; unknown ids leave the selection alone
    pub fn select(&mut self, id: Uuid) -> Option<&Board> {
        let board = self.boards.iter().find(|board| board.id == id)?.clone();
        self.current = Some(board);
        self.current.as_ref()
    }

    /// Re-fetches the active board only
    pub async fn refresh_current(&mut self) -> ClientResult<()> {
        let id = self.current_id().ok_or(ClientError::NoBoardSelected)?;
        self.refresh_board(id).await
    }

    /// Re-fetches one board, updating the list entry and the active board
    pub async fn refresh_board(&mut self, id: Uuid) -> ClientResult<()> {
        let board = self.api.get_board(id).await?;

        if let Some(slot) = self.boards.iter_mut().find(|b| b.id == id) {
            *slot = board.clone();
        }
        if self.current_id() == Some(id) {
            self.current = Some(board);
        }
        Ok(())
    }

    /// Creates a board and makes it active
    pub async fn create_board(&mut self, req: &CreateBoardRequest) -> ClientResult<Board> {
        let board = self.api.create_board(req).await?;
        tracing::info!(board_id = %board.id, "Board created");

        self.fetch_all().await?;
        self.select(board.id);
        Ok(board)
    }

    pub async fn update_board(&mut self, id: Uuid, req: &UpdateBoardRequest) -> ClientResult<Board> {
        let board = self.api.update_board(id, req).await?;
        self.fetch_all().await?;
        Ok(board)
    }

    /// Deletes a board; if it was active, the first remaining board becomes
    /// active (or none)
    pub async fn delete_board(&mut self, id: Uuid) -> ClientResult<()> {
        self.api.delete_board(id).await?;
        tracing::info!(board_id = %id, "Board deleted");

        self.boards.retain(|board| board.id != id);
        if self.current_id() == Some(id) {
            self.current = self.boards.first().cloned();
        }

        self.fetch_all().await
    }

    pub async fn create_column(&mut self, req: &CreateColumnRequest) -> ClientResult<Column> {
        let column = self.api.create_column(req).await?;
        self.refresh_board(column.board_id).await?;
        Ok(column)
    }

    pub async fn update_column(&mut self, id: Uuid, req: &UpdateColumnRequest) -> ClientResult<Column> {
        let column = self.api.update_column(id, req).await?;
        self.refresh_board(column.board_id).await?;
        Ok(column)
    }

    pub async fn delete_column(&mut self, id: Uuid) -> ClientResult<()> {
        let board_id = self.find_board(|board| board.columns.iter().any(|c| c.id == id));

        self.api.delete_column(id).await?;
        self.refresh_affected(board_id).await
    }

    pub async fn create_task(&mut self, req: &CreateTaskRequest) -> ClientResult<Task> {
        let task = self.api.create_task(req).await?;
        let board_id = self.board_of_column(task.column_id);

        self.refresh_affected(board_id).await?;
        Ok(task)
    }

    /// Edits a task; moving it to a column of another board refreshes both
    pub async fn update_task(&mut self, id: Uuid, req: &UpdateTaskRequest) -> ClientResult<Task> {
        let before = self.find_board(|board| board.column_of_task(id).is_some());

        let task = self.api.update_task(id, req).await?;
        let after = self.board_of_column(task.column_id);

        self.refresh_affected(after.or(before)).await?;
        if let (Some(before), Some(after)) = (before, after) {
            if before != after {
                self.refresh_board(before).await?;
            }
        }
        Ok(task)
    }

    pub async fn delete_task(&mut self, id: Uuid) -> ClientResult<()> {
        let board_id = self.find_board(|board| board.column_of_task(id).is_some());

        self.api.delete_task(id).await?;
        self.refresh_affected(board_id).await
    }

    pub async fn update_subtask(
        &mut self,
        id: Uuid,
        req: &UpdateSubtaskRequest,
    ) -> ClientResult<Subtask> {
        let subtask = self.api.update_subtask(id, req).await?;
        let board_id = self.find_board(|board| board.column_of_task(subtask.task_id).is_some());

        self.refresh_affected(board_id).await?;
        Ok(subtask)
    }

    pub async fn delete_subtask(&mut self, id: Uuid) -> ClientResult<()> {
        let board_id = self.find_board(|board| subtask_in(board, id).is_some());

        self.api.delete_subtask(id).await?;
        self.refresh_affected(board_id).await
    }

    /// Sets a subtask's completion on the active board
    ///
    /// The active board shows the new state before the request completes;
    /// a failed request restores the previous state.
    pub async fn toggle_subtask(&mut self, id: Uuid, is_completed: bool) -> ClientResult<Subtask> {
        let board_id = self.current_id().ok_or(ClientError::NoBoardSelected)?;
        let previous = self.patch_subtask(id, is_completed);

        let req = UpdateSubtaskRequest {
            is_completed: Some(is_completed),
            ..Default::default()
        };

        let subtask = match self.api.update_subtask(id, &req).await {
            Ok(subtask) => subtask,
            Err(err) => {
                if let Some(previous) = previous {
                    self.patch_subtask(id, previous);
                }
                tracing::warn!(subtask_id = %id, "Subtask toggle failed: {}", err);
                return Err(err);
            }
        };

        self.refresh_board(board_id).await?;
        Ok(subtask)
    }

    fn current_id(&self) -> Option<Uuid> {
        self.current.as_ref().map(|board| board.id)
    }

    /// Active board first, then the list
    fn find_board<F>(&self, matches: F) -> Option<Uuid>
    where
        F: Fn(&Board) -> bool,
    {
        self.current
            .iter()
            .chain(self.boards.iter())
            .find(|board| matches(*board))
            .map(|board| board.id)
    }

    fn board_of_column(&self, column_id: Uuid) -> Option<Uuid> {
        self.find_board(|board| board.columns.iter().any(|c| c.id == column_id))
    }

    /// Refreshes `board_id`, or the active board when the owner is unknown
    async fn refresh_affected(&mut self, board_id: Option<Uuid>) -> ClientResult<()> {
        match board_id.or_else(|| self.current_id()) {
            Some(id) => self.refresh_board(id).await,
            None => Ok(()),
        }
    }

    /// Sets completion on the active board's copy, returning the old value
    fn patch_subtask(&mut self, id: Uuid, is_completed: bool) -> Option<bool> {
        let subtask = self
            .current
            .as_mut()?
            .columns
            .iter_mut()
            .flat_map(|column| column.tasks.iter_mut())
            .flat_map(|task| task.subtasks.iter_mut())
            .find(|subtask| subtask.id == id)?;

        Some(std::mem::replace(&mut subtask.is_completed, is_completed))
    }
}

fn subtask_in(board: &Board, id: Uuid) -> Option<&Subtask> {
    board
        .columns
        .iter()
        .flat_map(|column| column.tasks.iter())
        .flat_map(|task| task.subtasks.iter())
        .find(|subtask| subtask.id == id)
}
