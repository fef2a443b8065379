// Drives a headless widget the way the embedding page would

use anyhow::Context;
use hotel_map_widget::{
    BookingDraft, Coordinates, HotelMapWidget, RefreshOutcome, ViewTarget, WidgetConfig,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = WidgetConfig::from_env().context("Failed to load widget config")?;
    let widget = HotelMapWidget::new(config).context("Failed to build widget")?;
    widget.initialize("map").context("Failed to initialize map")?;

    let westminster = Coordinates::new(51.50076763943303, -0.12461437233456225)?;
    widget.set_view(ViewTarget {
        center: westminster,
        label: Some("Westminster, London".to_string()),
        zoom: 14.0,
    });

    let booking = BookingDraft {
        checkin: Some("2022-01-01".parse()?),
        checkout: Some("2022-01-02".parse()?),
        adults: Some(2),
        children: Some(0),
    };
    match widget.show_hotels(None, Some(booking)).await {
        RefreshOutcome::Applied { markers, radius_m, .. } => {
            println!("{} hotels within {:.0} m", markers, radius_m)
        }
        RefreshOutcome::Kept { error } => println!("Hotels unavailable: {}", error),
    }

    if let Some(recommendations) = widget.show_weather_recommendations(None).await {
        for panel in widget.open_panels() {
            println!("{}", panel.message());
        }
        println!("Suggestions: {}", recommendations.join(", "));
    }

    Ok(())
}
