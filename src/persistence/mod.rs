//! Persistence layer modules.

pub mod db;
pub mod schema;
pub mod task_repo;
