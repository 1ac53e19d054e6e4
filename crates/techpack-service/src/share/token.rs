//! Share token generation.

use rand::RngCore;

/// Generates opaque share tokens.
///
/// Tokens are 32 bytes of OS-seeded randomness rendered as lowercase
/// hex, so they are unguessable and safe to place in a URL path.
#[derive(Debug, Clone, Default)]
pub struct TokenGenerator;

impl TokenGenerator {
    /// Creates a new token generator.
    pub fn new() -> Self {
        Self
    }

    /// Produces a fresh 64-character hex token.
    pub fn generate(&self) -> String {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        hex::encode(bytes)
    }
}
