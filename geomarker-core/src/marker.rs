use crate::{Article, Coordinates};

/// Provenance tag recorded with every marker sourced from Wikipedia.
pub const WIKIPEDIA_SOURCE: &str = "wikipedia";

/// EPSG code of the WGS84 geographic reference system.
pub const WGS84_SRID: i32 = 4326;

/// An article paired with its resolved position, ready to be stored.
///
/// # Examples
/// ```
/// use geomarker_core::{Article, Coordinates, Marker, WIKIPEDIA_SOURCE};
///
/// # fn main() -> Result<(), geomarker_core::CoordinatesError> {
/// let marker = Marker::from_article(Article::new(7, "London"), Coordinates::new(51.5, -0.12)?);
/// assert_eq!(marker.source, WIKIPEDIA_SOURCE);
/// assert_eq!(marker.ewkt(), "SRID=4326;POINT(-0.12 51.5)");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    /// Page identifier; the storage key.
    pub page_id: u64,
    /// Article title.
    pub title: String,
    /// Resolved position.
    pub coordinates: Coordinates,
    /// Provenance tag.
    pub source: &'static str,
}

impl Marker {
    /// Build a Wikipedia marker from an article and its resolved position.
    #[must_use]
    pub fn from_article(article: Article, coordinates: Coordinates) -> Self {
        Self {
            page_id: article.page_id,
            title: article.title,
            coordinates,
            source: WIKIPEDIA_SOURCE,
        }
    }

    /// Latitude in degrees.
    #[must_use]
    pub fn latitude(&self) -> f64 {
        self.coordinates.latitude()
    }

    /// Longitude in degrees.
    #[must_use]
    pub fn longitude(&self) -> f64 {
        self.coordinates.longitude()
    }

    /// Extended WKT for the marker's point, longitude first.
    ///
    /// Derived from the same coordinates that feed the scalar columns so the
    /// two representations never disagree.
    #[must_use]
    pub fn ewkt(&self) -> String {
        format!(
            "SRID={WGS84_SRID};POINT({} {})",
            self.longitude(),
            self.latitude()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn marker(lat: f64, lon: f64) -> Marker {
        Marker::from_article(
            Article::new(7, "Somewhere"),
            Coordinates::new(lat, lon).expect("valid coordinates"),
        )
    }

    #[rstest]
    #[case(51.5, -0.12, "SRID=4326;POINT(-0.12 51.5)")]
    #[case(0.0, 0.0, "SRID=4326;POINT(0 0)")]
    #[case(-33.8688, 151.2093, "SRID=4326;POINT(151.2093 -33.8688)")]
    fn ewkt_puts_longitude_first(#[case] lat: f64, #[case] lon: f64, #[case] expected: &str) {
        assert_eq!(marker(lat, lon).ewkt(), expected);
    }

    #[rstest]
    fn from_article_keeps_identity() {
        let marker = marker(1.0, 2.0);
        assert_eq!(marker.page_id, 7);
        assert_eq!(marker.title, "Somewhere");
        assert_eq!(marker.source, WIKIPEDIA_SOURCE);
        assert_eq!(marker.latitude(), 1.0);
        assert_eq!(marker.longitude(), 2.0);
    }
}
