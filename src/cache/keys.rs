//! Cache key generation and matching.

use sha2::{Digest, Sha256};
use serde::Serialize;

use crate::cache::MAX_KEY_LENGTH;

/// Hex characters of the digest kept in a key.
const HASH_LEN: usize = 16;
/// Longest base kept verbatim; room is left for `:` and the digest.
const MAX_BASE_LEN: usize = MAX_KEY_LENGTH - HASH_LEN - 1;

/// Derive a deterministic cache key from a base name and request parameters.
///
/// The parameters are hashed as JSON; maps with ordered keys (`BTreeMap`)
/// give the same key regardless of insertion order.
///
/// Keys never exceed [`MAX_KEY_LENGTH`]. A base too long to keep whole is
/// cut to a prefix and folded into the digest, so distinct long bases still
/// get distinct keys.
pub fn generate_key<P: Serialize + ?Sized>(base: &str, params: &P) -> String {
    // Serializing a BTreeMap or plain struct cannot fail; fall back to an
    // empty payload rather than panicking on exotic inputs.
    let payload = serde_json::to_vec(params).unwrap_or_default();

    let mut hasher = Sha256::new();
    let prefix = if base.len() > MAX_BASE_LEN {
        hasher.update(base.as_bytes());
        truncate_at_char_boundary(base, MAX_BASE_LEN)
    } else {
        base
    };
    hasher.update(&payload);
    let hash = hasher.finalize();

    format!("{}:{}", prefix, hex::encode(&hash[..HASH_LEN / 2]))
}

fn truncate_at_char_boundary(s: &str, max: usize) -> &str {
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Glob match where `*` matches any run of characters and `?` exactly one.
pub fn matches_pattern(pattern: &str, key: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let key: Vec<char> = key.chars().collect();

    let (mut p, mut k) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;

    while k < key.len() {
        match pattern.get(p) {
            Some('*') => {
                backtrack = Some((p, k));
                p += 1;
            }
            Some(&c) if c == '?' || c == key[k] => {
                p += 1;
                k += 1;
            }
            _ => match backtrack {
                // Let the last star swallow one more character
                Some((star, matched)) => {
                    p = star + 1;
                    k = matched + 1;
                    backtrack = Some((star, matched + 1));
                }
                None => return false,
            },
        }
    }

    pattern[p..].iter().all(|&c| c == '*')
}
