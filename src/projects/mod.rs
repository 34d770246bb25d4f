//! # Projects Module
//!
//! Project documents owned by a single user:
//! - Creation with name / description / status validation
//! - Listing and lookup scoped to the owner
//! - Status changes
//! - The starter project seeded on first sign-in

pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod validators;


pub use models::Project;
pub use routes::projects_routes;
pub use services::ProjectsService;
