//! Store payload obfuscation codec
//!
//! When a passphrase is configured, the serialized collection is XOR'd with a
//! keystream cycled from the passphrase bytes and base64-encoded before it
//! hits disk. This is obfuscation against casual inspection, NOT
//! cryptography; anyone with the file and a little patience can recover the
//! plaintext. A wrong passphrase is reported as a recoverable error so the
//! caller can prompt for re-entry.

use crate::store::error::{StoreError, StoreResult};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

/// Marker prefix identifying an obfuscated payload
const OBFUSCATION_HEADER: &str = "moodlog-obf-v1\n";

/// Check whether raw file contents are an obfuscated payload
pub fn is_obfuscated(raw: &str) -> bool {
    raw.starts_with(OBFUSCATION_HEADER)
}

/// Obfuscate a serialized payload with a passphrase
pub fn encode(plain: &[u8], passphrase: &str) -> String {
    let mixed = xor_keystream(plain, passphrase.as_bytes());
    format!("{}{}", OBFUSCATION_HEADER, BASE64.encode(mixed))
}

/// Recover a payload previously produced by [`encode`]
///
/// Any decoding failure (bad base64, or the XOR'd bytes not forming valid
/// UTF-8) maps to [`StoreError::WrongPassphrase`]: with an incorrect key the
/// keystream produces garbage, and the caller should prompt again rather
/// than crash.
pub fn decode(raw: &str, passphrase: &str) -> StoreResult<String> {
    let body = raw
        .strip_prefix(OBFUSCATION_HEADER)
        .ok_or(StoreError::WrongPassphrase)?;

    let mixed = BASE64
        .decode(body.trim())
        .map_err(|_| StoreError::WrongPassphrase)?;

    let plain = xor_keystream(&mixed, passphrase.as_bytes());
    String::from_utf8(plain).map_err(|_| StoreError::WrongPassphrase)
}

fn xor_keystream(data: &[u8], key: &[u8]) -> Vec<u8> {
    if key.is_empty() {
        return data.to_vec();
    }
    data.iter()
        .zip(key.iter().cycle())
        .map(|(b, k)| b ^ k)
        .collect()
}
