// src/common/id_generator.rs
//! Crockford Base32 ID generator.
//!
//! Profile sub-records and activity entries get human-readable prefixed ids
//! in the format PREFIX_XXXXXX (e.g. E_K7NP3X for an education entry).
//! The alphabet excludes I, L, O and U, so ids are unambiguous to read,
//! type, and communicate verbally.

use rand::Rng;

/// Crockford Base32 alphabet (excludes I, L, O, U to avoid confusion)
const CROCKFORD_ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

/// Entity type prefixes for ID generation
#[derive(Debug, Clone, Copy)]
pub enum EntityPrefix {
    /// Education entry (E_)
    Education,
    /// Experience entry (X_)
    Experience,
    /// Applied-job record (A_)
    Application,
    /// Interview attempt (I_)
    Interview,
}

impl EntityPrefix {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityPrefix::Education => "E",
            EntityPrefix::Experience => "X",
            EntityPrefix::Application => "A",
            EntityPrefix::Interview => "I",
        }
    }
}

fn generate_crockford_string(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| {
            let idx = rng.gen_range(0..32);
            CROCKFORD_ALPHABET[idx] as char
        })
        .collect()
}

/// Generate a prefixed ID, e.g. `generate_id(EntityPrefix::Education)`
/// returns something like "E_8MWQT2".
pub fn generate_id(prefix: EntityPrefix) -> String {
    format!("{}_{}", prefix.as_str(), generate_crockford_string(6))
}

// ============================================================================
// Convenience functions for each entity type
// ============================================================================

/// Generate an Education ID (E_XXXXXX)
pub fn generate_education_id() -> String {
    generate_id(EntityPrefix::Education)
}

/// Generate an Experience ID (X_XXXXXX)
pub fn generate_experience_id() -> String {
    generate_id(EntityPrefix::Experience)
}

/// Generate an Application ID (A_XXXXXX)
pub fn generate_application_id() -> String {
    generate_id(EntityPrefix::Application)
}

/// Generate an Interview ID (I_XXXXXX)
pub fn generate_interview_id() -> String {
    generate_id(EntityPrefix::Interview)
}
