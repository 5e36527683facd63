use reqwest::Client;
use thiserror::Error;

use crate::{config::AppConfig, mood::Mood, types::WeatherResponse};

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("OPENWEATHER_API_KEY is not configured")]
    NotConfigured,

    #[error("latitude and longitude are required")]
    MissingLocation,

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("weather service returned no conditions")]
    NoConditions,
}

/// Current-weather lookup against OpenWeather.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    http: Client,
    api_url: String,
    api_key: Option<String>,
}

impl WeatherClient {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            http: config.http_client(),
            api_url: config.openweather_api_url.clone(),
            api_key: config.openweather_api_key.clone(),
        }
    }

    /// Main condition ("Rain", "Clear", ...) at the given coordinates.
    pub async fn current_condition(
        &self,
        latitude: Option<f64>,
        longitude: Option<f64>,
    ) -> Result<String, WeatherError> {
        let api_key = self.api_key.as_deref().ok_or(WeatherError::NotConfigured)?;
        let (Some(lat), Some(lon)) = (latitude, longitude) else {
            return Err(WeatherError::MissingLocation);
        };

        let res = self
            .http
            .get(&self.api_url)
            .query(&[
                ("lat", lat.to_string()),
                ("lon", lon.to_string()),
                ("appid", api_key.to_string()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let weather = res.json::<WeatherResponse>().await?;
        weather
            .weather
            .into_iter()
            .next()
            .map(|c| c.main)
            .ok_or(WeatherError::NoConditions)
    }

    pub async fn current_mood(
        &self,
        latitude: Option<f64>,
        longitude: Option<f64>,
    ) -> Result<Mood, WeatherError> {
        let condition = self.current_condition(latitude, longitude).await?;
        let mood = Mood::for_weather(&condition);
        tracing::debug!(%condition, %mood, "Mood derived from weather");
        Ok(mood)
    }
}
