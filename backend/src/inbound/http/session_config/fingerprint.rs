//! Short, loggable fingerprint of the session key.
//!
//! Operators compare fingerprints across instances to confirm they share one
//! key without the key itself reaching the logs.

use actix_web::cookie::Key;
use sha2::{Digest, Sha256};

const FINGERPRINT_BYTES: usize = 8;

/// First 8 bytes of SHA-256 over the signing half, as lowercase hex.
///
/// # Examples
///
/// ```rust
/// use actix_web::cookie::Key;
/// use ecoactions::inbound::http::session_config::fingerprint::key_fingerprint;
///
/// let fp = key_fingerprint(&Key::derive_from(&[7; 64]));
/// assert_eq!(fp.len(), 16);
/// ```
#[must_use]
pub fn key_fingerprint(key: &Key) -> String {
    let digest = Sha256::digest(key.signing());
    hex::encode(&digest[..FINGERPRINT_BYTES])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn same_material_gives_same_fingerprint() {
        let first = key_fingerprint(&Key::derive_from(&[b'k'; 64]));
        let second = key_fingerprint(&Key::derive_from(&[b'k'; 64]));
        assert_eq!(first, second);
    }

    #[rstest]
    fn fingerprint_is_sixteen_lowercase_hex_digits() {
        let fp = key_fingerprint(&Key::generate());
        assert_eq!(fp.len(), FINGERPRINT_BYTES * 2);
        assert!(fp.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')));
    }

    #[rstest]
    fn distinct_keys_are_distinguishable() {
        let a = key_fingerprint(&Key::derive_from(&[b'a'; 64]));
        let b = key_fingerprint(&Key::derive_from(&[b'b'; 64]));
        assert_ne!(a, b);
    }
}
