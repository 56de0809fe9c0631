//! Token derivation for pool keys.

use data_encoding::BASE64_NOPAD;
use rand::RngCore;
use sha2::{Digest, Sha256};
use zeroize::Zeroize;

use crate::error::{KeyPoolError, Result};

/// Random bytes drawn per derivation (256 bits).
pub const ENTROPY_LEN: usize = 32;

/// Length of a derived token: a 32-byte digest in unpadded base64.
pub const TOKEN_LEN: usize = 43;

/// Derive one opaque token from fresh OS entropy.
///
/// Draws 256 bits from the operating system CSPRNG, hashes them with
/// SHA-256, and encodes the digest with the standard base64 alphabet,
/// padding stripped. Nothing is carried between calls, so collisions are
/// bounded only by the birthday paradox over the digest space.
///
/// # Errors
/// `EntropySourceUnavailable` when the platform cannot supply secure
/// randomness. Never retried internally.
pub fn derive_token() -> Result<String> {
    let mut entropy = [0u8; ENTROPY_LEN];
    rand::rngs::OsRng
        .try_fill_bytes(&mut entropy)
        .map_err(|e| KeyPoolError::EntropySourceUnavailable(e.to_string()))?;

    let digest = Sha256::digest(&entropy);

    // The preimage is secret material; clear it once hashed.
    entropy.zeroize();

    Ok(BASE64_NOPAD.encode(digest.as_slice()))
}
