use geo::Coord;
use thiserror::Error;

/// A validated WGS84 position.
///
/// Stored as a [`Coord`] with `x = longitude` and `y = latitude`, matching the
/// axis order used by PostGIS `ST_MakePoint`. `(0, 0)` is an ordinary position
/// in the Gulf of Guinea and carries no special meaning.
///
/// # Examples
/// ```
/// use geomarker_core::Coordinates;
///
/// # fn main() -> Result<(), geomarker_core::CoordinatesError> {
/// let london = Coordinates::new(51.5, -0.12)?;
/// assert_eq!(london.latitude(), 51.5);
/// assert_eq!(london.longitude(), -0.12);
/// assert_eq!(london.as_coord().x, -0.12);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates(Coord<f64>);

impl Coordinates {
    /// Validate and construct a position from latitude and longitude degrees.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinatesError> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(CoordinatesError::NonFinite {
                latitude,
                longitude,
            });
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordinatesError::LatitudeOutOfRange { latitude });
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordinatesError::LongitudeOutOfRange { longitude });
        }
        Ok(Self(Coord {
            x: longitude,
            y: latitude,
        }))
    }

    /// Latitude in degrees.
    #[must_use]
    pub fn latitude(&self) -> f64 {
        self.0.y
    }

    /// Longitude in degrees.
    #[must_use]
    pub fn longitude(&self) -> f64 {
        self.0.x
    }

    /// The underlying `geo` coordinate (`x = longitude`, `y = latitude`).
    #[must_use]
    pub fn as_coord(&self) -> Coord<f64> {
        self.0
    }
}

/// Errors returned by [`Coordinates::new`].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CoordinatesError {
    /// Either component was NaN or infinite.
    #[error("coordinates must be finite (lat {latitude}, lon {longitude})")]
    NonFinite { latitude: f64, longitude: f64 },
    /// Latitude fell outside `[-90, 90]`.
    #[error("latitude {latitude} is outside [-90, 90]")]
    LatitudeOutOfRange { latitude: f64 },
    /// Longitude fell outside `[-180, 180]`.
    #[error("longitude {longitude} is outside [-180, 180]")]
    LongitudeOutOfRange { longitude: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn accepts_null_island() {
        let origin = Coordinates::new(0.0, 0.0).expect("origin is a valid position");
        assert_eq!(origin.latitude(), 0.0);
        assert_eq!(origin.longitude(), 0.0);
    }

    #[rstest]
    #[case(90.0, 180.0)]
    #[case(-90.0, -180.0)]
    fn accepts_boundaries(#[case] latitude: f64, #[case] longitude: f64) {
        assert!(Coordinates::new(latitude, longitude).is_ok());
    }

    #[rstest]
    #[case(f64::NAN, 0.0)]
    #[case(0.0, f64::INFINITY)]
    fn rejects_non_finite(#[case] latitude: f64, #[case] longitude: f64) {
        let err = Coordinates::new(latitude, longitude).expect_err("non-finite must fail");
        assert!(matches!(err, CoordinatesError::NonFinite { .. }));
    }

    #[rstest]
    fn rejects_latitude_out_of_range() {
        let err = Coordinates::new(91.0, 0.0).expect_err("latitude too large");
        assert_eq!(err, CoordinatesError::LatitudeOutOfRange { latitude: 91.0 });
    }

    #[rstest]
    fn rejects_longitude_out_of_range() {
        let err = Coordinates::new(0.0, -180.5).expect_err("longitude too small");
        assert_eq!(
            err,
            CoordinatesError::LongitudeOutOfRange { longitude: -180.5 }
        );
    }
}
