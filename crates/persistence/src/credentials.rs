// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Password hashing and session token minting.
//!
//! Passwords are derived with PBKDF2-HMAC-SHA512 over a per-user random
//! salt. Salts, hashes and tokens are stored as lowercase hex text.

use sha2::Sha512;
use subtle::ConstantTimeEq;

/// PBKDF2 iteration count.
pub const PBKDF2_ITERATIONS: u32 = 10_000;

/// Length of the derived key in bytes.
const HASH_LENGTH: usize = 64;

/// Generates a random 16-byte salt, hex-encoded.
#[must_use]
pub fn generate_salt() -> String {
    hex::encode(rand::random::<[u8; 16]>())
}

/// Derives the stored hash for `password` under `salt`.
///
/// The salt participates as its hex text, not as the decoded bytes.
#[must_use]
pub fn hash_password(password: &str, salt: &str) -> String {
    let mut derived: [u8; HASH_LENGTH] = [0u8; HASH_LENGTH];
    pbkdf2::pbkdf2_hmac::<Sha512>(
        password.as_bytes(),
        salt.as_bytes(),
        PBKDF2_ITERATIONS,
        &mut derived,
    );
    hex::encode(derived)
}

/// Checks `password` against a stored salt and hash.
///
/// The comparison touches every byte regardless of where the first
/// mismatch occurs.
#[must_use]
pub fn verify_password(password: &str, salt: &str, stored_hash: &str) -> bool {
    let computed: String = hash_password(password, salt);
    computed.as_bytes().ct_eq(stored_hash.as_bytes()).into()
}

/// Generates an opaque 32-byte session token, hex-encoded.
#[must_use]
pub fn generate_token() -> String {
    hex::encode(rand::random::<[u8; 32]>())
}
