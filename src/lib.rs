// src/lib.rs
//! projectpilot: project and task tracking behind a session-cookie bridge,
//! with model-backed helpers for planning and status summaries.
//!
//! The binary in `main.rs` wires configuration and clients and serves
//! [`app::build_router`]. Clients that keep a local task list can drive
//! optimistic updates through [`tasks::optimistic`].

pub mod ai;
pub mod app;
pub mod auth;
pub mod common;
pub mod dashboard;
pub mod guard_middleware;
pub mod logging_middleware;
pub mod profile;
pub mod projects;
pub mod services;
pub mod tasks;

#[cfg(test)]
mod e2e_tests;
