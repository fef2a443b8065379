// Map engine adapter: the capability set the widget needs from a rendering engine,
// plus a headless in-memory engine that keeps marker and viewport state.

use crate::config::{MapOptions, MAX_ZOOM};
use crate::geo::{Coordinates, GeoError, ViewBounds};
use dashmap::DashMap;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

const TILE_SIZE_PX: f64 = 256.0;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MapError {
    #[error("Container id must not be empty")]
    EmptyContainer,

    #[error("Invalid map options: {0}")]
    InvalidOptions(String),

    #[error("Invalid view target: {0}")]
    InvalidTarget(#[from] GeoError),

    #[error("Zoom {0} outside 0..={max}", max = MAX_ZOOM)]
    InvalidZoom(f64),
}

/// Opaque reference to a rendered marker. Must be handed back to
/// [`MapEngine::remove_marker`]; dropping it leaves the marker on the map.
#[derive(Debug, PartialEq, Eq, Hash)]
#[must_use = "a marker handle must be released with remove_marker"]
pub struct MarkerHandle(u64);

impl MarkerHandle {
    pub fn id(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewTarget {
    pub center: Coordinates,
    pub label: Option<String>,
    pub zoom: f64,
}

impl ViewTarget {
    pub fn validate(&self) -> Result<(), MapError> {
        self.center.validate()?;
        if !(0.0..=MAX_ZOOM).contains(&self.zoom) {
            return Err(MapError::InvalidZoom(self.zoom));
        }
        Ok(())
    }
}

pub trait MapEngine: Send + Sync + 'static {
    fn initialize(&self, container: &str, options: &MapOptions) -> Result<(), MapError>;

    fn add_marker(&self, coordinates: Coordinates, label: &str) -> MarkerHandle;

    /// Returns false when the marker was already gone.
    fn remove_marker(&self, handle: MarkerHandle) -> bool;

    /// Removes every marker, whoever created it. Returns how many were removed.
    fn clear_all_markers(&self) -> usize;

    fn center(&self) -> Coordinates;

    fn view_bounds(&self) -> Option<ViewBounds>;

    fn radius(&self, bounds: Option<&ViewBounds>) -> f64 {
        bounds.map(ViewBounds::covering_radius).unwrap_or(0.0)
    }

    /// Moves the view and drops a pin at the new center. Invalid targets are ignored.
    fn set_view(&self, target: ViewTarget);
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub id: u64,
    pub coordinates: Coordinates,
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoundsMode {
    // Derived from center, zoom and viewport size
    Computed,
    Fixed(ViewBounds),
    Unavailable,
}

#[derive(Debug)]
struct ViewState {
    container: Option<String>,
    center: Coordinates,
    zoom: f64,
    style: Option<String>,
    bounds_mode: BoundsMode,
}

/// Headless engine: no rendering, just the state a rendering engine would hold.
pub struct InMemoryEngine {
    markers: DashMap<u64, Marker>,
    next_id: AtomicU64,
    view: RwLock<ViewState>,
    viewport_px: (f64, f64),
}

impl InMemoryEngine {
    pub fn new() -> Self {
        Self::with_viewport(800.0, 600.0)
    }

    pub fn with_viewport(width_px: f64, height_px: f64) -> Self {
        let defaults = MapOptions::default();
        Self {
            markers: DashMap::new(),
            next_id: AtomicU64::new(1),
            view: RwLock::new(ViewState {
                container: None,
                center: defaults.center,
                zoom: defaults.zoom,
                style: defaults.style,
                bounds_mode: BoundsMode::Computed,
            }),
            viewport_px: (width_px, height_px),
        }
    }

    pub fn set_bounds_mode(&self, mode: BoundsMode) {
        self.view.write().bounds_mode = mode;
    }

    pub fn is_initialized(&self) -> bool {
        self.view.read().container.is_some()
    }

    pub fn zoom(&self) -> f64 {
        self.view.read().zoom
    }

    pub fn style(&self) -> Option<String> {
        self.view.read().style.clone()
    }

    /// Snapshot of the rendered markers, oldest first.
    pub fn markers(&self) -> Vec<Marker> {
        let mut markers: Vec<Marker> = self.markers.iter().map(|m| m.value().clone()).collect();
        markers.sort_by_key(|m| m.id);
        markers
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    fn computed_bounds(&self, center: Coordinates, zoom: f64) -> Option<ViewBounds> {
        let (width, height) = self.viewport_px;
        let world_px = TILE_SIZE_PX * 2f64.powf(zoom);
        let lng_half = (width * 360.0 / world_px / 2.0).min(180.0);
        let lat_half = height * 360.0 * center.lat.to_radians().cos() / world_px / 2.0;

        let north_east = Coordinates {
            lat: (center.lat + lat_half).min(90.0),
            lng: (center.lng + lng_half).min(180.0),
        };
        let south_west = Coordinates {
            lat: (center.lat - lat_half).max(-90.0),
            lng: (center.lng - lng_half).max(-180.0),
        };
        ViewBounds::new(north_east, south_west).ok()
    }
}

impl Default for InMemoryEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MapEngine for InMemoryEngine {
    fn initialize(&self, container: &str, options: &MapOptions) -> Result<(), MapError> {
        if container.trim().is_empty() {
            return Err(MapError::EmptyContainer);
        }
        options
            .validate()
            .map_err(|e| MapError::InvalidOptions(e.to_string()))?;

        let mut view = self.view.write();
        view.container = Some(container.to_string());
        view.center = options.center;
        view.zoom = options.zoom;
        view.style = options.style.clone();
        tracing::info!(container, zoom = options.zoom, "Map initialized");
        Ok(())
    }

    fn add_marker(&self, coordinates: Coordinates, label: &str) -> MarkerHandle {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.markers.insert(
            id,
            Marker {
                id,
                coordinates,
                label: label.to_string(),
            },
        );
        MarkerHandle(id)
    }

    fn remove_marker(&self, handle: MarkerHandle) -> bool {
        self.markers.remove(&handle.0).is_some()
    }

    fn clear_all_markers(&self) -> usize {
        let removed = self.markers.len();
        self.markers.clear();
        removed
    }

    fn center(&self) -> Coordinates {
        self.view.read().center
    }

    fn view_bounds(&self) -> Option<ViewBounds> {
        let view = self.view.read();
        if view.container.is_none() {
            return None;
        }
        match view.bounds_mode {
            BoundsMode::Computed => self.computed_bounds(view.center, view.zoom),
            BoundsMode::Fixed(bounds) => Some(bounds),
            BoundsMode::Unavailable => None,
        }
    }

    fn set_view(&self, target: ViewTarget) {
        if let Err(err) = target.validate() {
            tracing::warn!(error = %err, "Ignoring invalid view target");
            return;
        }
        {
            let mut view = self.view.write();
            view.center = target.center;
            view.zoom = target.zoom;
        }
        let label = target.label.as_deref().unwrap_or("");
        // Pin is engine-owned; it goes away with the next clear_all_markers
        let pin = self.add_marker(target.center, label);
        tracing::debug!(marker = pin.id(), "Added view pin");
    }
}
