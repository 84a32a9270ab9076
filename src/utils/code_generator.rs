//! Short code generation.

use base64::Engine as _;

/// Random bytes per code; 5 bytes encode to exactly 7 base64 characters.
const CODE_LENGTH_BYTES: usize = 5;

/// Length of a generated short code.
pub const CODE_LENGTH: usize = 7;

/// Generates a random 7-character short code.
///
/// Uses `getrandom` for entropy and URL-safe base64 without padding, so the
/// alphabet is `A-Z a-z 0-9 - _`. 40 bits of entropy makes random collisions
/// negligible but not impossible; callers must treat a store uniqueness
/// violation as retryable and regenerate.
///
/// # Panics
///
/// Panics if the system random number generator fails (extremely rare).
pub fn generate_code() -> String {
    let mut buffer = [0u8; CODE_LENGTH_BYTES];

    getrandom::fill(&mut buffer).expect("Failed to generate random bytes");

    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buffer)
}
