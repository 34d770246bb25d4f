//! # Auth Module
//!
//! This module handles all authentication-related functionality including:
//! - Identity token verification against the identity provider
//! - The session bridge (signed `session` cookie minting and verification)
//! - The route guard policy for page requests
//! - AuthedUser extractor for protected API routes

pub mod extractors;
pub mod guard;
pub mod handlers;
pub mod identity;
pub mod models;
pub mod routes;
pub mod session;


pub use extractors::AuthedUser;
pub use identity::{DevIdentityProvider, IdentityProvider, TokenInfoIdentityProvider};
pub use routes::auth_routes;
pub use session::{SessionBridge, SessionSigner};
