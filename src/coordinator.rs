// Refresh coordinator: re-queries hotels for the current viewport and swaps the marker set

use crate::booking::{BookingDraft, BookingOptions, BookingStore};
use crate::client::ApiError;
use crate::geo::Coordinates;
use crate::hotel_client::{HotelDataClient, HotelQuery, HotelRecord};
use crate::map_engine::{MapEngine, MarkerHandle};
use crate::popup::hotel_popup;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// What a refresh did. Failures are reported here instead of being returned as `Err`.
#[derive(Debug)]
pub enum RefreshOutcome {
    Applied {
        markers: usize,
        radius_m: f64,
        generation: u64,
    },
    Kept {
        error: ApiError,
    },
}

impl RefreshOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, RefreshOutcome::Applied { .. })
    }
}

/// Owns the hotel markers on the map.
///
/// Overlapping refreshes are neither queued nor cancelled: each one fetches independently and
/// the swap applied last determines what is on the map. The generation counter in
/// [`RefreshOutcome::Applied`] makes the ordering observable.
pub struct RefreshCoordinator {
    engine: Arc<dyn MapEngine>,
    hotels: Arc<dyn HotelDataClient>,
    booking: BookingStore,
    markers: Mutex<Vec<MarkerHandle>>,
    generation: AtomicU64,
}

impl RefreshCoordinator {
    pub fn new(engine: Arc<dyn MapEngine>, hotels: Arc<dyn HotelDataClient>) -> Self {
        Self {
            engine,
            hotels,
            booking: BookingStore::new(),
            markers: Mutex::new(Vec::new()),
            generation: AtomicU64::new(0),
        }
    }

    pub fn booking(&self) -> Option<Arc<BookingOptions>> {
        self.booking.current()
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    pub fn marker_count(&self) -> usize {
        self.markers.lock().len()
    }

    #[tracing::instrument(skip_all, fields(explicit = explicit.is_some()))]
    pub async fn refresh_hotels(
        &self,
        explicit: Option<Coordinates>,
        booking: Option<BookingDraft>,
    ) -> RefreshOutcome {
        let center = match explicit {
            Some(point) => match point.validate() {
                Ok(()) => point,
                Err(err) => {
                    tracing::warn!(error = %err, "Ignoring invalid search point; using map center");
                    self.engine.center()
                }
            },
            None => self.engine.center(),
        };

        let (booking, rejected) = self.booking.merge(booking.as_ref());
        if let Some(err) = rejected {
            tracing::warn!(error = %err, "Ignoring incomplete booking options");
        }
        if booking.is_none() {
            tracing::warn!(
                "Missing required hotel search booking options \
                 (checkin, checkout, adults, children); searching with defaults"
            );
        }

        let bounds = self.engine.view_bounds();
        if bounds.is_none() {
            tracing::debug!("No viewport bounds; searching at a single point");
        }
        let radius_m = self.engine.radius(bounds.as_ref());

        let query = HotelQuery {
            center,
            radius_m,
            booking,
        };
        match self.hotels.fetch_hotels(&query).await {
            Ok(hotels) => {
                let (markers, generation) = self.swap_markers(&hotels);
                tracing::info!(markers, radius_m, generation, "Hotel markers refreshed");
                RefreshOutcome::Applied {
                    markers,
                    radius_m,
                    generation,
                }
            }
            Err(error) => {
                tracing::error!(
                    error = %error,
                    retryable = error.is_retryable(),
                    "Error fetching hotels; keeping current markers"
                );
                RefreshOutcome::Kept { error }
            }
        }
    }

    // Runs without awaiting so a concurrent refresh can't interleave with it
    fn swap_markers(&self, hotels: &[HotelRecord]) -> (usize, u64) {
        let mut markers = self.markers.lock();
        for handle in markers.drain(..) {
            self.engine.remove_marker(handle);
        }
        let stray = self.engine.clear_all_markers();
        if stray > 0 {
            tracing::debug!(stray, "Cleared markers not owned by the coordinator");
        }

        markers.extend(
            hotels
                .iter()
                .map(|hotel| self.engine.add_marker(hotel.coordinates, &hotel_popup(hotel))),
        );
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        (markers.len(), generation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MapOptions;
    use crate::geo::ViewBounds;
    use crate::map_engine::{BoundsMode, InMemoryEngine, ViewTarget};
    use crate::testing::{hotel, StubHotelClient};
    use std::time::Duration;

    fn setup() -> (Arc<InMemoryEngine>, Arc<StubHotelClient>, RefreshCoordinator) {
        let engine = Arc::new(InMemoryEngine::new());
        engine.initialize("map", &MapOptions::default()).unwrap();
        let client = Arc::new(StubHotelClient::new());
        let coordinator = RefreshCoordinator::new(engine.clone(), client.clone());
        (engine, client, coordinator)
    }

    fn booking_draft() -> BookingDraft {
        BookingDraft {
            checkin: Some("2022-01-01".parse().unwrap()),
            checkout: Some("2022-01-02".parse().unwrap()),
            adults: Some(2),
            children: Some(0),
        }
    }

    #[tokio::test]
    async fn test_refresh_renders_one_marker_per_hotel() {
        let (engine, client, coordinator) = setup();
        client.push_ok(vec![hotel("Hotel Test", 51.5, -0.12)]);

        let outcome = coordinator
            .refresh_hotels(None, Some(booking_draft()))
            .await;

        assert!(outcome.is_applied());
        let markers = engine.markers();
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].coordinates, Coordinates::new(51.5, -0.12).unwrap());
        assert!(markers[0].label.contains("Hotel Test"));

        let query = client.last_query().unwrap();
        let booking = query.booking.unwrap();
        assert_eq!(booking.adults(), 2);
        assert_eq!(booking.children(), 0);
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_markers() {
        let (engine, client, coordinator) = setup();
        client.push_ok(vec![hotel("A", 51.5, -0.12), hotel("B", 51.49, -0.13)]);
        client.push_err(ApiError::NetworkError("connection reset".to_string()));

        assert!(coordinator.refresh_hotels(None, None).await.is_applied());
        let before = engine.markers();

        let outcome = coordinator.refresh_hotels(None, None).await;
        assert!(matches!(
            outcome,
            RefreshOutcome::Kept {
                error: ApiError::NetworkError(_)
            }
        ));
        assert_eq!(engine.markers(), before);
        assert_eq!(coordinator.marker_count(), 2);
        assert_eq!(coordinator.generation(), 1);
    }

    #[tokio::test]
    async fn test_missing_bounds_degrade_to_point_query() {
        let (engine, client, coordinator) = setup();
        engine.set_bounds_mode(BoundsMode::Unavailable);
        client.push_ok(vec![]);

        let outcome = coordinator.refresh_hotels(None, None).await;
        match outcome {
            RefreshOutcome::Applied { radius_m, .. } => assert_eq!(radius_m, 0.0),
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(client.last_query().unwrap().radius_m, 0.0);
    }

    #[tokio::test]
    async fn test_radius_is_half_the_viewport_diagonal() {
        let (engine, client, coordinator) = setup();
        engine.set_bounds_mode(BoundsMode::Fixed(
            ViewBounds::new(
                Coordinates::new(51.5, -0.12).unwrap(),
                Coordinates::new(51.0, -0.15).unwrap(),
            )
            .unwrap(),
        ));
        client.push_ok(vec![]);

        coordinator.refresh_hotels(None, None).await;
        let radius = client.last_query().unwrap().radius_m;
        assert!((radius - 27_818.366).abs() < 1.0, "radius was {}", radius);
    }

    #[tokio::test]
    async fn test_center_defaults_to_viewport() {
        let (engine, client, coordinator) = setup();
        client.push_ok(vec![]);
        client.push_ok(vec![]);

        coordinator.refresh_hotels(None, None).await;
        assert_eq!(client.last_query().unwrap().center, engine.center());

        let explicit = Coordinates::new(52.52, 13.405).unwrap();
        coordinator.refresh_hotels(Some(explicit), None).await;
        assert_eq!(client.last_query().unwrap().center, explicit);
    }

    #[tokio::test]
    async fn test_invalid_search_point_falls_back_to_center() {
        let (engine, client, coordinator) = setup();
        client.push_ok(vec![]);

        let bogus = Coordinates { lat: 200.0, lng: -0.12 };
        assert!(coordinator.refresh_hotels(Some(bogus), None).await.is_applied());
        assert_eq!(client.last_query().unwrap().center, engine.center());
    }

    #[tokio::test]
    async fn test_incomplete_booking_does_not_replace_stored() {
        let (_engine, client, coordinator) = setup();
        client.push_ok(vec![]);
        client.push_ok(vec![]);

        coordinator.refresh_hotels(None, Some(booking_draft())).await;
        let partial = BookingDraft {
            children: None,
            adults: Some(5),
            ..booking_draft()
        };
        coordinator.refresh_hotels(None, Some(partial)).await;

        let sent = client.last_query().unwrap().booking.unwrap();
        assert_eq!(sent.adults(), 2);
        assert_eq!(coordinator.booking().unwrap().adults(), 2);
    }

    #[tokio::test]
    async fn test_refresh_clears_view_pins() {
        let (engine, client, coordinator) = setup();
        engine.set_view(ViewTarget {
            center: Coordinates::new(51.5, -0.12).unwrap(),
            label: Some("Westminster".to_string()),
            zoom: 14.0,
        });
        client.push_ok(vec![hotel("Only", 51.501, -0.121)]);

        coordinator.refresh_hotels(None, None).await;
        let markers = engine.markers();
        assert_eq!(markers.len(), 1);
        assert!(markers[0].label.contains("Only"));
    }

    #[tokio::test]
    async fn test_overlapping_refreshes_last_applied_wins() {
        let (engine, client, coordinator) = setup();
        client.push_delayed(
            Duration::from_millis(80),
            Ok(vec![hotel("Slow", 51.0, 0.0)]),
        );
        client.push_ok(vec![hotel("Fast", 52.0, 0.0)]);

        let (slow, fast) = futures::join!(
            coordinator.refresh_hotels(None, None),
            coordinator.refresh_hotels(None, None)
        );

        let generation_of = |outcome: &RefreshOutcome| match outcome {
            RefreshOutcome::Applied { generation, .. } => *generation,
            RefreshOutcome::Kept { .. } => 0,
        };
        assert_eq!(generation_of(&fast), 1);
        assert_eq!(generation_of(&slow), 2);

        let markers = engine.markers();
        assert_eq!(markers.len(), 1);
        assert!(markers[0].label.contains("Slow"));
    }
}
