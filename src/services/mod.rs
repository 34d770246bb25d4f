// src/services/mod.rs
//
// Process-wide clients for external services

pub mod monitoring;
pub mod openai;

pub use openai::OpenAIService;
