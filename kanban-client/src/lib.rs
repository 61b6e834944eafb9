//! # Kanban Client
//!
//! Typed access to the kanban API and the client-side board store.
//!
//! - `api`: `BoardApi` trait and its HTTP implementation
//! - `error`: Client error types
//! - `store`: `BoardStore`, the active-board state container

pub mod api;
pub mod error;
pub mod store;

pub use api::{BoardApi, HttpBoardApi};
pub use error::{ClientError, ClientResult};
pub use store::BoardStore;
