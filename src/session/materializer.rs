use crate::{types::TokenResponse, utils};

use super::{Refresher, Session, TokenState};

/// Where the token state for this request comes from.
#[derive(Debug, Clone)]
pub enum TokenSource {
    /// The account link just happened; the issued tokens are adopted as-is.
    SignIn {
        grant: TokenResponse,
        fallback_refresh_token: Option<String>,
    },
    /// State carried over from an earlier request.
    Stored(TokenState),
}

/// Result of one materialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Materialized {
    pub state: TokenState,
    pub session: Session,
    /// The state differs from what was stored and must be written back.
    pub changed: bool,
}

/// Turns token state into a [`Session`], refreshing stale tokens on the way.
///
/// Evaluated on every request that needs the session; there is no background
/// timer. The only blocking point is the refresh call itself.
#[derive(Debug, Clone)]
pub struct SessionMaterializer<R> {
    refresher: R,
}

impl<R: Refresher> SessionMaterializer<R> {
    pub fn new(refresher: R) -> Self {
        Self { refresher }
    }

    pub async fn materialize(&self, source: TokenSource, identity: Option<String>) -> Materialized {
        self.materialize_at(source, identity, utils::now_millis())
            .await
    }

    /// Same as [`materialize`](Self::materialize) with an explicit clock.
    ///
    /// A caller never gets back an access token known to be expired at `now_ms`
    /// unless a refresh was attempted and flagged as failed.
    pub async fn materialize_at(
        &self,
        source: TokenSource,
        identity: Option<String>,
        now_ms: i64,
    ) -> Materialized {
        let (state, changed) = match source {
            TokenSource::SignIn {
                grant,
                fallback_refresh_token,
            } => (
                TokenState::from_grant(&grant, fallback_refresh_token.as_deref(), now_ms),
                true,
            ),
            TokenSource::Stored(state) if state.is_fresh_at(now_ms) => (state, false),
            TokenSource::Stored(state) => {
                tracing::debug!(expires_at = state.expires_at, "Access token expired, refreshing");
                (self.refresher.refresh(state).await, true)
            }
        };

        let session = Session::project(&state, identity);
        Materialized {
            state,
            session,
            changed,
        }
    }
}
