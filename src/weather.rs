// Weather client: current conditions from OpenWeatherMap

use crate::client::{fetch_json, ApiError, ClientConfig, ClientError};
use crate::geo::Coordinates;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub const OPENWEATHER_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WeatherCondition {
    Clear,
    Rain,
    Snow,
    Other(String),
}

impl WeatherCondition {
    pub fn from_label(label: &str) -> Self {
        match label {
            "Clear" => WeatherCondition::Clear,
            "Rain" => WeatherCondition::Rain,
            "Snow" => WeatherCondition::Snow,
            other => WeatherCondition::Other(other.to_string()),
        }
    }
}

/// Current weather at a point, used once to derive recommendations.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSnapshot {
    pub condition: WeatherCondition,
    // Provider label as shown to the user, e.g. "Clouds"
    pub summary: String,
    pub city: String,
    pub temp_celsius: f64,
    pub icon_id: String,
}

#[async_trait]
pub trait WeatherClient: Send + Sync + 'static {
    async fn current_weather(&self, at: Coordinates) -> Result<WeatherSnapshot, ApiError>;
}

// Wire format of /weather
#[derive(Debug, Deserialize, Serialize)]
pub struct OwmResponse {
    pub weather: Vec<OwmCondition>,
    pub main: OwmMain,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct OwmCondition {
    pub main: String,
    #[serde(default)]
    pub icon: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct OwmMain {
    pub temp: f64,
}

impl TryFrom<OwmResponse> for WeatherSnapshot {
    type Error = ApiError;

    fn try_from(response: OwmResponse) -> Result<Self, Self::Error> {
        let first = response
            .weather
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::MalformedResponse("empty weather list".to_string()))?;

        Ok(WeatherSnapshot {
            condition: WeatherCondition::from_label(&first.main),
            summary: first.main,
            city: response.name,
            temp_celsius: response.main.temp,
            icon_id: first.icon,
        })
    }
}

pub struct OpenWeatherClient {
    config: ClientConfig,
    http: reqwest::Client,
}

impl OpenWeatherClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let http = config.build_http_client()?;
        Ok(Self { config, http })
    }
}

#[async_trait]
impl WeatherClient for OpenWeatherClient {
    async fn current_weather(&self, at: Coordinates) -> Result<WeatherSnapshot, ApiError> {
        let request = self.http.get(self.config.endpoint("weather")).query(&[
            ("lat", at.lat.to_string()),
            ("lon", at.lng.to_string()),
            ("appid", self.config.api_key.clone()),
            ("units", "metric".to_string()),
        ]);

        let response: OwmResponse = fetch_json(request).await?;
        WeatherSnapshot::try_from(response)
    }
}
