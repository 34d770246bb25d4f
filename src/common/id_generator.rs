// src/common/id_generator.rs
//! Crockford Base32 ID Generator
//!
//! Generates human-readable, prefixed IDs using Crockford Base32 encoding.
//! Format: PREFIX_XXXXXXXX (e.g., P_K7NP3XY2 for projects)
//!
//! The alphabet excludes I, L, O and U, so IDs survive being read aloud
//! or retyped from a screenshot.

use rand::Rng;

/// Crockford Base32 alphabet (excludes I, L, O, U to avoid confusion)
const CROCKFORD_ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

/// Random characters after the prefix. 32^8 keeps collisions negligible
/// for per-user task lists.
const ID_LENGTH: usize = 8;

/// Entity type prefixes for ID generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityPrefix {
    /// Project (P_)
    Project,
    /// Task (T_)
    Task,
}

impl EntityPrefix {
    /// Get the string prefix for this entity type
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityPrefix::Project => "P",
            EntityPrefix::Task => "T",
        }
    }
}

/// Generate a random Crockford Base32 string of specified length
fn generate_crockford_string(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| {
            let idx = rng.gen_range(0..32);
            CROCKFORD_ALPHABET[idx] as char
        })
        .collect()
}

/// Generate a prefixed ID using Crockford Base32 encoding
///
/// # Example
/// ```ignore
/// let project_id = generate_id(EntityPrefix::Project);
/// // Returns something like "P_K7NP3XY2"
/// ```
pub fn generate_id(prefix: EntityPrefix) -> String {
    format!("{}_{}", prefix.as_str(), generate_crockford_string(ID_LENGTH))
}

/// Generate a Project ID (P_XXXXXXXX)
pub fn generate_project_id() -> String {
    generate_id(EntityPrefix::Project)
}

/// Generate a Task ID (T_XXXXXXXX)
pub fn generate_task_id() -> String {
    generate_id(EntityPrefix::Task)
}
