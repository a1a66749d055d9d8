pub mod goal_service;
pub mod task_service;

pub use goal_service::GoalService;
pub use task_service::TaskService;

use thiserror::Error;

use crate::database::manager::DatabaseError;

/// Errors shared by the resource services. `NotFound` deliberately does
/// not distinguish "no such id" from "owned by someone else".
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}
