//! # Tasks Module
//!
//! Task documents owned by a single user, optionally attached to a project:
//! - Direct creation and batch creation (from the smart breakdown flow)
//! - Completion toggling and deletion by the owner
//! - Command/inverse pairs for optimistic client updates

pub mod handlers;
pub mod models;
pub mod optimistic;
pub mod routes;
pub mod services;
pub mod validators;


pub use models::Task;
pub use routes::tasks_routes;
pub use services::TasksService;
