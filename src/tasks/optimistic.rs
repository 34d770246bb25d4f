//! Optimistic task updates
//!
//! A [`TaskCommand`] is applied to a local task list first, yielding its
//! inverse. The remote write then runs; when it fails the inverse is applied
//! so the local list matches the store again.

use std::future::Future;
use thiserror::Error;
use tracing::{debug, warn};

use super::models::{Task, UpdateTaskRequest};
use super::services::TasksService;
use crate::common::ApiError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskCommand {
    SetCompleted { task_id: String, completed: bool },
    Remove { task_id: String },
    /// Put a removed task back at its old position
    Restore { index: usize, task: Task },
}

#[derive(Debug, Error)]
pub enum OptimisticError<E> {
    #[error("task {0} is not in the local list")]
    UnknownTask(String),
    #[error("remote write failed, local change reverted: {0}")]
    Reverted(E),
}

impl TaskCommand {
    pub fn toggle(task: &Task) -> Self {
        TaskCommand::SetCompleted {
            task_id: task.id.clone(),
            completed: !task.completed,
        }
    }

    pub fn remove(task: &Task) -> Self {
        TaskCommand::Remove {
            task_id: task.id.clone(),
        }
    }

    /// Apply to `tasks` and return the command that undoes it.
    /// `None` when the command does not fit the list (unknown task id).
    pub fn apply(&self, tasks: &mut Vec<Task>) -> Option<TaskCommand> {
        match self {
            TaskCommand::SetCompleted { task_id, completed } => {
                let task = tasks.iter_mut().find(|t| &t.id == task_id)?;
                let previous = task.completed;
                task.completed = *completed;
                Some(TaskCommand::SetCompleted {
                    task_id: task_id.clone(),
                    completed: previous,
                })
            }
            TaskCommand::Remove { task_id } => {
                let index = tasks.iter().position(|t| &t.id == task_id)?;
                let task = tasks.remove(index);
                Some(TaskCommand::Restore { index, task })
            }
            TaskCommand::Restore { index, task } => {
                if tasks.iter().any(|t| t.id == task.id) {
                    return None;
                }
                tasks.insert((*index).min(tasks.len()), task.clone());
                Some(TaskCommand::Remove {
                    task_id: task.id.clone(),
                })
            }
        }
    }

    /// Write the command through to the store on behalf of `user_id`
    pub async fn persist(&self, service: &TasksService, user_id: &str) -> Result<(), ApiError> {
        match self {
            TaskCommand::SetCompleted { task_id, completed } => {
                service
                    .update_task(
                        user_id,
                        task_id,
                        UpdateTaskRequest {
                            completed: Some(*completed),
                        },
                    )
                    .await?;
            }
            TaskCommand::Remove { task_id } => service.delete_task(user_id, task_id).await?,
            TaskCommand::Restore { task, .. } => service.restore_task(user_id, task).await?,
        }
        Ok(())
    }
}

/// Apply `command` locally, run `write`, and roll back on failure
pub async fn execute<F, Fut, E>(
    tasks: &mut Vec<Task>,
    command: TaskCommand,
    write: F,
) -> Result<(), OptimisticError<E>>
where
    F: FnOnce(TaskCommand) -> Fut,
    Fut: Future<Output = Result<(), E>>,
    E: std::fmt::Display,
{
    let inverse = match command.apply(tasks) {
        Some(inverse) => inverse,
        None => {
            let id = match &command {
                TaskCommand::SetCompleted { task_id, .. } | TaskCommand::Remove { task_id } => {
                    task_id.clone()
                }
                TaskCommand::Restore { task, .. } => task.id.clone(),
            };
            return Err(OptimisticError::UnknownTask(id));
        }
    };

    match write(command).await {
        Ok(()) => {
            debug!("Optimistic task update confirmed");
            Ok(())
        }
        Err(e) => {
            warn!(error = %e, "Remote task write failed, reverting");
            inverse.apply(tasks);
            Err(OptimisticError::Reverted(e))
        }
    }
}
