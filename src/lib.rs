// Headless core of the hotel map widget: area-based hotel refresh and weather suggestions

pub mod booking;
pub mod client;
pub mod config;
pub mod coordinator;
pub mod geo;
pub mod hotel_client;
pub mod map_engine;
pub mod popup;
pub mod recommendation;
pub mod weather;
pub mod widget;

#[cfg(test)]
pub mod testing;

// Re-export key types for convenience
pub use booking::{BookingDraft, BookingError, BookingOptions, BookingStore};
pub use client::{ApiError, ClientConfig, ClientError};
pub use config::{ConfigError, MapOptions, TransportConfig, WidgetConfig};
pub use coordinator::{RefreshCoordinator, RefreshOutcome};
pub use geo::{Coordinates, GeoError, ViewBounds};
pub use hotel_client::{HotelDataClient, HotelQuery, HotelRecord, LiteApiClient};
pub use map_engine::{
    BoundsMode, InMemoryEngine, MapEngine, MapError, Marker, MarkerHandle, ViewTarget,
};
pub use recommendation::{recommend, RecommendationPanel};
pub use weather::{OpenWeatherClient, WeatherClient, WeatherCondition, WeatherSnapshot};
pub use widget::HotelMapWidget;
