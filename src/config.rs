// Widget configuration: API keys, initial map options and transport settings

use crate::client::ClientConfig;
use crate::geo::Coordinates;
use crate::hotel_client::LITEAPI_BASE_URL;
use crate::weather::OPENWEATHER_BASE_URL;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const ENV_ENGINE_KEY: &str = "HOTEL_MAP_ENGINE_KEY";
pub const ENV_HOTEL_KEY: &str = "HOTEL_MAP_HOTEL_KEY";
pub const ENV_WEATHER_KEY: &str = "HOTEL_MAP_WEATHER_KEY";
pub const ENV_TIMEOUT_MS: &str = "HOTEL_MAP_TIMEOUT_MS";

pub const MAX_ZOOM: f64 = 24.0;

const WESTMINSTER: Coordinates = Coordinates {
    lat: 51.50076763943303,
    lng: -0.12461437233456225,
};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Missing environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid config value: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MapOptions {
    pub center: Coordinates,
    pub zoom: f64,
    pub show_marker_controls: bool,
    pub style: Option<String>,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            center: WESTMINSTER,
            zoom: 10.0,
            show_marker_controls: true,
            style: Some("mapbox://styles/mapbox/standard".to_string()),
        }
    }
}

impl MapOptions {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.center
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        if !(0.0..=MAX_ZOOM).contains(&self.zoom) {
            return Err(ConfigError::Invalid(format!(
                "zoom must be within 0..={}, got {}",
                MAX_ZOOM, self.zoom
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TransportConfig {
    pub hotel_base_url: String,
    pub weather_base_url: String,
    pub timeout_ms: Option<u64>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            hotel_base_url: LITEAPI_BASE_URL.to_string(),
            weather_base_url: OPENWEATHER_BASE_URL.to_string(),
            timeout_ms: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetConfig {
    pub map_engine_api_key: String,
    pub hotel_api_key: String,
    pub weather_api_key: String,
    #[serde(default)]
    pub options: MapOptions,
    #[serde(default)]
    pub transport: TransportConfig,
}

impl WidgetConfig {
    pub fn new(
        map_engine_api_key: impl Into<String>,
        hotel_api_key: impl Into<String>,
        weather_api_key: impl Into<String>,
    ) -> Self {
        Self {
            map_engine_api_key: map_engine_api_key.into(),
            hotel_api_key: hotel_api_key.into(),
            weather_api_key: weather_api_key.into(),
            options: MapOptions::default(),
            transport: TransportConfig::default(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: WidgetConfig = serde_json::from_str(json)?;
        config.options.validate()?;
        Ok(config)
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let read = |name: &'static str| {
            std::env::var(name).map_err(|_| ConfigError::MissingVar(name))
        };

        let mut config = Self::new(
            read(ENV_ENGINE_KEY)?,
            read(ENV_HOTEL_KEY)?,
            read(ENV_WEATHER_KEY)?,
        );
        if let Ok(raw) = std::env::var(ENV_TIMEOUT_MS) {
            let timeout_ms = raw
                .parse::<u64>()
                .map_err(|e| ConfigError::Invalid(format!("{}={}: {}", ENV_TIMEOUT_MS, raw, e)))?;
            config.transport.timeout_ms = Some(timeout_ms);
        }
        Ok(config)
    }

    pub fn hotel_client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.transport.hotel_base_url.clone(),
            api_key: self.hotel_api_key.clone(),
            timeout_ms: self.transport.timeout_ms,
        }
    }

    pub fn weather_client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.transport.weather_base_url.clone(),
            api_key: self.weather_api_key.clone(),
            timeout_ms: self.transport.timeout_ms,
        }
    }
}
