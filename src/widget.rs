// Widget facade: the operations exposed to the embedding page

use crate::booking::BookingDraft;
use crate::client::ClientError;
use crate::config::WidgetConfig;
use crate::coordinator::{RefreshCoordinator, RefreshOutcome};
use crate::geo::Coordinates;
use crate::hotel_client::{HotelDataClient, LiteApiClient};
use crate::map_engine::{InMemoryEngine, MapEngine, MapError, ViewTarget};
use crate::recommendation::RecommendationPanel;
use crate::weather::{OpenWeatherClient, WeatherClient};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

pub struct HotelMapWidget {
    config: WidgetConfig,
    engine: Arc<dyn MapEngine>,
    coordinator: RefreshCoordinator,
    weather: Arc<dyn WeatherClient>,
    panels: Mutex<Vec<RecommendationPanel>>,
    next_panel_id: AtomicU64,
}

impl HotelMapWidget {
    /// Headless engine with the LiteAPI and OpenWeatherMap clients.
    pub fn new(config: WidgetConfig) -> Result<Self, ClientError> {
        if config.map_engine_api_key.trim().is_empty() {
            return Err(ClientError::ConfigError(
                "Map engine API key must not be empty".to_string(),
            ));
        }
        let hotels = Arc::new(LiteApiClient::new(config.hotel_client_config())?);
        let weather = Arc::new(OpenWeatherClient::new(config.weather_client_config())?);
        Ok(Self::with_components(
            config,
            Arc::new(InMemoryEngine::new()),
            hotels,
            weather,
        ))
    }

    pub fn with_components(
        config: WidgetConfig,
        engine: Arc<dyn MapEngine>,
        hotels: Arc<dyn HotelDataClient>,
        weather: Arc<dyn WeatherClient>,
    ) -> Self {
        Self {
            coordinator: RefreshCoordinator::new(engine.clone(), hotels),
            config,
            engine,
            weather,
            panels: Mutex::new(Vec::new()),
            next_panel_id: AtomicU64::new(1),
        }
    }

    pub fn initialize(&self, container: &str) -> Result<(), MapError> {
        self.engine.initialize(container, &self.config.options)
    }

    pub fn engine(&self) -> &Arc<dyn MapEngine> {
        &self.engine
    }

    pub fn coordinator(&self) -> &RefreshCoordinator {
        &self.coordinator
    }

    pub fn set_view(&self, target: ViewTarget) {
        self.engine.set_view(target);
    }

    pub async fn show_hotels(
        &self,
        coordinates: Option<Coordinates>,
        booking: Option<BookingDraft>,
    ) -> RefreshOutcome {
        self.coordinator.refresh_hotels(coordinates, booking).await
    }

    /// Presents a recommendation panel for the given point (or the map center) and returns
    /// the suggestions. `None` when the weather lookup failed; the failure is logged.
    pub async fn show_weather_recommendations(
        &self,
        coordinates: Option<Coordinates>,
    ) -> Option<Vec<String>> {
        let at = coordinates.unwrap_or_else(|| self.engine.center());
        let snapshot = match self.weather.current_weather(at).await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                tracing::error!(
                    error = %err,
                    retryable = err.is_retryable(),
                    "Error fetching weather data"
                );
                return None;
            }
        };

        let id = self.next_panel_id.fetch_add(1, Ordering::SeqCst);
        let panel = RecommendationPanel::from_snapshot(id, &snapshot);
        let recommendations = panel.recommendations.clone();
        tracing::info!(panel = id, city = %panel.city, "{}", panel.message());
        self.panels.lock().push(panel);
        Some(recommendations)
    }

    /// Hotels and suggestions for the current map center, fetched concurrently.
    pub async fn explore_area(&self) -> (RefreshOutcome, Option<Vec<String>>) {
        let center = self.engine.center();
        futures::join!(
            self.show_hotels(Some(center), None),
            self.show_weather_recommendations(Some(center))
        )
    }

    pub fn open_panels(&self) -> Vec<RecommendationPanel> {
        self.panels.lock().clone()
    }

    /// Closing is the only way a panel goes away. False for unknown or already closed panels.
    pub fn close_panel(&self, id: u64) -> bool {
        let mut panels = self.panels.lock();
        let before = panels.len();
        panels.retain(|p| p.id != id);
        panels.len() < before
    }
}
