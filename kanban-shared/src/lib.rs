//! # Kanban Shared Library
//!
//! Types and data access shared by the kanban API server and client.
//!
//! ## Module Organization
//!
//! - `db`: Connection pool and embedded migrations
//! - `models`: Boards, columns, tasks, subtasks and their queries
//! - `validation`: Write-request types and their field rules

pub mod db;
pub mod models;
pub mod validation;

/// Current version of the kanban shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
