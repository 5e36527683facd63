use moodlist::types::{Track, TrackArtist};
use moodlist::utils::*;
use std::collections::HashSet;

// Helper function to create a test track
fn create_test_track(id: &str, uri: &str) -> Track {
    Track {
        id: id.to_string(),
        name: format!("Track {}", id),
        uri: uri.to_string(),
        artists: vec![TrackArtist {
            name: "Artist".to_string(),
        }],
        album: None,
    }
}

#[test]
fn test_generate_code_verifier() {
    let verifier = generate_code_verifier();

    // Should be exactly 128 characters
    assert_eq!(verifier.len(), 128);

    // Should contain only alphanumeric characters
    assert!(verifier.chars().all(|c| c.is_ascii_alphanumeric()));

    let verifier2 = generate_code_verifier();
    assert_ne!(verifier, verifier2);
}

#[test]
fn test_generate_code_challenge() {
    let verifier = "test_verifier_123";
    let challenge = generate_code_challenge(verifier);

    // SHA-256 digest is 32 bytes, 43 chars unpadded
    assert_eq!(challenge.len(), 43);
    assert_eq!(challenge, generate_code_challenge(verifier));
    assert_ne!(challenge, generate_code_challenge("different_verifier"));

    assert!(
        challenge
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    );
}

#[test]
fn test_generate_code_challenge_known_vector() {
    // RFC 7636, appendix B
    let verifier = "dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk";
    assert_eq!(
        generate_code_challenge(verifier),
        "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM"
    );
}

#[test]
fn test_generate_oauth_state_and_ids() {
    let state = generate_oauth_state();
    assert_eq!(state.len(), 32);
    assert_ne!(state, generate_oauth_state());

    let id = generate_id();
    assert_eq!(id.len(), 25);
    assert!(
        id.chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
    );
}

#[test]
fn test_unique_track_uris_keeps_first_occurrence() {
    let tracks = vec![
        create_test_track("1", "spotify:track:a"),
        create_test_track("2", "spotify:track:b"),
        create_test_track("3", "spotify:track:a"),
        create_test_track("4", "spotify:track:c"),
        create_test_track("5", "spotify:track:b"),
    ];

    assert_eq!(
        unique_track_uris(&tracks),
        vec!["spotify:track:a", "spotify:track:b", "spotify:track:c"]
    );
}

#[test]
fn test_unique_track_uris_empty() {
    assert!(unique_track_uris(&[]).is_empty());
}

#[test]
fn test_pick_random_limits_and_preserves_members() {
    let items: Vec<u32> = (0..100).collect();
    let picked = pick_random(items.clone(), 30);

    assert_eq!(picked.len(), 30);

    let unique: HashSet<_> = picked.iter().collect();
    assert_eq!(unique.len(), 30);
    assert!(picked.iter().all(|i| items.contains(i)));
}

#[test]
fn test_pick_random_with_fewer_items_than_limit() {
    let mut picked = pick_random(vec![3, 1, 2], 30);
    picked.sort();
    assert_eq!(picked, vec![1, 2, 3]);

    assert!(pick_random(Vec::<u32>::new(), 30).is_empty());
}

#[test]
fn test_now_millis_is_epoch_millis() {
    let now = now_millis();
    // after 2020-01-01 in milliseconds
    assert!(now > 1_577_836_800_000);
}
