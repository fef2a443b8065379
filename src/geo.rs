// Geographic primitives shared by the map engine, the coordinator and the clients

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Mean earth radius in metres, the value used by the mapping engines we target.
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeoError {
    #[error("Coordinates out of range: lat={lat}, lng={lng}")]
    OutOfRange { lat: f64, lng: f64 },

    #[error("Inverted bounds: north-east lat {north} is below south-west lat {south}")]
    InvertedBounds { north: f64, south: f64 },
}

/// WGS-84 point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Result<Self, GeoError> {
        let coordinates = Self { lat, lng };
        coordinates.validate()?;
        Ok(coordinates)
    }

    pub fn validate(&self) -> Result<(), GeoError> {
        let lat_ok = (-90.0..=90.0).contains(&self.lat);
        let lng_ok = (-180.0..=180.0).contains(&self.lng);
        if lat_ok && lng_ok {
            Ok(())
        } else {
            Err(GeoError::OutOfRange {
                lat: self.lat,
                lng: self.lng,
            })
        }
    }

    /// Great-circle (haversine) distance in metres.
    pub fn distance_to(&self, other: &Coordinates) -> f64 {
        let phi1 = self.lat.to_radians();
        let phi2 = other.lat.to_radians();
        let d_phi = (other.lat - self.lat).to_radians();
        let d_lambda = (other.lng - self.lng).to_radians();

        let a = (d_phi / 2.0).sin().powi(2)
            + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_M * a.sqrt().atan2((1.0 - a).sqrt())
    }
}

/// The rectangle currently visible on the map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewBounds {
    north_east: Coordinates,
    south_west: Coordinates,
}

impl ViewBounds {
    pub fn new(north_east: Coordinates, south_west: Coordinates) -> Result<Self, GeoError> {
        north_east.validate()?;
        south_west.validate()?;
        if north_east.lat < south_west.lat {
            return Err(GeoError::InvertedBounds {
                north: north_east.lat,
                south: south_west.lat,
            });
        }
        Ok(Self {
            north_east,
            south_west,
        })
    }

    pub fn north_east(&self) -> Coordinates {
        self.north_east
    }

    pub fn south_west(&self) -> Coordinates {
        self.south_west
    }

    /// Half the corner-to-corner distance: the radius of a circle that roughly covers the view.
    pub fn covering_radius(&self) -> f64 {
        self.north_east.distance_to(&self.south_west) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_out_of_range_coordinates() {
        assert!(Coordinates::new(91.0, 0.0).is_err());
        assert!(Coordinates::new(0.0, -180.5).is_err());
        assert!(Coordinates::new(-90.0, 180.0).is_ok());
    }

    #[test]
    fn test_one_degree_of_longitude_at_equator() {
        let a = Coordinates::new(0.0, 0.0).unwrap();
        let b = Coordinates::new(0.0, 1.0).unwrap();
        assert!((a.distance_to(&b) - 111_195.08).abs() < 1.0);
    }

    #[test]
    fn test_covering_radius_london_viewport() {
        let bounds = ViewBounds::new(
            Coordinates::new(51.5, -0.12).unwrap(),
            Coordinates::new(51.0, -0.15).unwrap(),
        )
        .unwrap();

        let expected = 27_818.366;
        assert!(
            (bounds.covering_radius() - expected).abs() < 1.0,
            "radius was {}",
            bounds.covering_radius()
        );
    }

    #[test]
    fn test_inverted_bounds_are_rejected() {
        let result = ViewBounds::new(
            Coordinates::new(51.0, -0.12).unwrap(),
            Coordinates::new(51.5, -0.15).unwrap(),
        );
        assert_eq!(
            result,
            Err(GeoError::InvertedBounds {
                north: 51.0,
                south: 51.5
            })
        );
    }
}
