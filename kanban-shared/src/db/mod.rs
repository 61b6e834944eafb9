/// Database layer for the kanban service
///
/// # Modules
///
/// - `pool`: PostgreSQL connection pool with health check
/// - `migrations`: Embedded schema migrations
///
/// Models and their queries live in the `models` module at the crate root.

pub mod migrations;
pub mod pool;
