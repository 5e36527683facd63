use crate::{config::AppConfig, error, info, server, success, warning};

/// Runs the web server, optionally opening the sign-in page in a browser.
pub async fn serve(config: AppConfig, open: bool) {
    let login_url = format!("{}/api/auth/login", config.public_url.trim_end_matches('/'));
    info!("Serving moodlist on http://{}", config.server_addr);

    if open {
        match webbrowser::open(&login_url) {
            Ok(()) => success!("Opened {} in the browser", login_url),
            Err(e) => warning!("Cannot open browser: {}. Visit {} manually.", e, login_url),
        }
    }

    if let Err(e) = server::serve(config).await {
        error!("Server stopped. Err: {}", e);
    }
}
