use axum::{Json, extract::State};
use serde_json::{Value, json};

use crate::{error::ApiError, server::AppState, types::TrackSummary};

/// Track details for a list of ids, using an app-level token.
///
/// No session is needed. `trackIds` must be an array of strings.
pub async fn get_tracks(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let ids = track_ids(&body)
        .ok_or_else(|| ApiError::BadRequest("Track IDs are required.".into()))?;

    if ids.is_empty() {
        return Ok(Json(json!({ "tracks": [] })));
    }

    let token = state.spotify.client_credentials_token().await?;
    let tracks: Vec<TrackSummary> = state
        .spotify
        .several_tracks(&token, &ids)
        .await?
        .into_iter()
        .map(TrackSummary::from)
        .collect();

    Ok(Json(json!({ "tracks": tracks })))
}

fn track_ids(body: &Value) -> Option<Vec<String>> {
    body.get("trackIds")?
        .as_array()?
        .iter()
        .map(|id| id.as_str().map(str::to_string))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_ids_parsing() {
        assert_eq!(
            track_ids(&json!({ "trackIds": ["a", "b"] })),
            Some(vec!["a".to_string(), "b".to_string()])
        );
        assert_eq!(track_ids(&json!({ "trackIds": [] })), Some(vec![]));
        assert_eq!(track_ids(&json!({ "trackIds": "a" })), None);
        assert_eq!(track_ids(&json!({ "trackIds": [1, 2] })), None);
        assert_eq!(track_ids(&json!({})), None);
    }
}
