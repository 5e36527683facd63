use std::sync::Arc;

use axum::{
    Router,
    extract::FromRef,
    middleware,
    routing::{get, post},
};
use axum_extra::extract::cookie::Key;

use crate::{
    Res, api,
    config::AppConfig,
    management::Library,
    session::{self, SessionMaterializer, SpotifyRefresher},
    spotify::SpotifyClient,
    weather::WeatherClient,
};

/// Shared state for all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub cookie_key: Key,
    pub materializer: Arc<SessionMaterializer<SpotifyRefresher>>,
    pub library: Arc<Library>,
    pub spotify: Arc<SpotifyClient>,
    pub weather: Arc<WeatherClient>,
}

impl AppState {
    pub fn new(config: AppConfig, library: Library) -> Self {
        Self {
            cookie_key: session::derive_key(&config.session_secret),
            materializer: Arc::new(SessionMaterializer::new(SpotifyRefresher::from_config(
                &config,
            ))),
            spotify: Arc::new(SpotifyClient::from_config(&config)),
            weather: Arc::new(WeatherClient::from_config(&config)),
            library: Arc::new(library),
            config: Arc::new(config),
        }
    }
}

// PrivateCookieJar requires Key to be extractable from state
impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

/// Builds the application router.
///
/// Routes that need the session sit behind the session layer, which
/// materializes (and if needed refreshes) the token state per request.
pub fn router(state: AppState) -> Router {
    let with_session = Router::new()
        .route("/api/auth/session", get(api::session))
        .route("/api/create-playlist", post(api::create_playlist))
        .route("/api/save-playlist", post(api::save_playlist))
        .route("/api/get-saved-playlists", get(api::get_saved_playlists))
        .route("/api/delete-playlist", post(api::delete_playlist))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            session::cookie::session_layer,
        ));

    Router::new()
        .route("/health", get(api::health))
        .route("/api/auth/login", get(api::login))
        .route("/api/auth/callback", get(api::callback))
        .route("/api/auth/logout", get(api::logout).post(api::logout))
        .route("/api/get-tracks", post(api::get_tracks))
        .merge(with_session)
        .with_state(state)
}

/// Opens the library and serves the application until the process stops.
pub async fn serve(config: AppConfig) -> Res<()> {
    let library = Library::open(&config.database_path).await?;
    let addr = config.server_addr;
    let app = router(AppState::new(config, library));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "moodlist listening");
    axum::serve(listener, app).await?;
    Ok(())
}
