//! # AI Module
//!
//! Typed wrappers around the hosted language model:
//! - One generic pipeline (validate input, render prompt, call model, validate output)
//! - Five flows: task extraction, smart breakdown, risk, summarization, question answering
//! - HTTP handlers under `/api/ai`

pub mod flows;
pub mod handlers;
pub mod pipeline;
pub mod routes;

#[cfg(test)]
mod tests;

pub use pipeline::{run_flow, AiError, ModelClient, ModelRequest};
pub use routes::ai_routes;
