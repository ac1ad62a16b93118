//! Asset identifiers for backends that don't report an object key.

use rand::Rng;

/// URL-safe alphabet (64 symbols).
const ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_-";
const LENGTH: usize = 10;

/// Generate a random, URL-safe, 10-character identifier.
pub fn generate() -> String {
    let mut rng = rand::thread_rng();
    (0..LENGTH).map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char).collect()
}
