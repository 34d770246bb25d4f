//! # Dashboard Module
//!
//! Read-side views:
//! - `GET /api/summaries`: an AI status summary per project with tasks
//! - JSON view-models for the page routes behind the route guard
//! - `GET /health`

pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

#[cfg(test)]
mod tests;

pub use routes::dashboard_routes;
