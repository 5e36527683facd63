use std::collections::HashSet;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{Rng, distr::Alphanumeric, seq::SliceRandom};
use sha2::{Digest, Sha256};

use crate::types::Track;

pub fn generate_code_verifier() -> String {
    random_alphanumeric(128)
}

pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// Opaque OAuth `state` value for the authorization request.
pub fn generate_oauth_state() -> String {
    random_alphanumeric(32)
}

/// Record identifier for library entries.
pub fn generate_id() -> String {
    random_alphanumeric(25).to_lowercase()
}

fn random_alphanumeric(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Track URIs in first-seen order, without duplicates.
pub fn unique_track_uris(tracks: &[Track]) -> Vec<String> {
    let mut seen = HashSet::new();
    tracks
        .iter()
        .filter(|t| seen.insert(t.uri.as_str()))
        .map(|t| t.uri.clone())
        .collect()
}

/// Shuffles and keeps at most `limit` items.
pub fn pick_random<T>(mut items: Vec<T>, limit: usize) -> Vec<T> {
    items.shuffle(&mut rand::rng());
    items.truncate(limit);
    items
}

/// Current time as epoch milliseconds.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
