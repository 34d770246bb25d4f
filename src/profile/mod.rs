//! # Profile Module
//!
//! User profile documents:
//! - Creation on first sign-in (upsert keyed on the identity subject)
//! - Profile edits (display name, avatar reference)
//! - Session revocation watermark

pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod validators;


pub use routes::profile_routes;
pub use services::UsersService;
