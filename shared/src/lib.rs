use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn is_valid(self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

/// Distance unit sent verbatim to the distance-matrix endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    #[default]
    Metric,
    Imperial,
}

impl Unit {
    pub fn toggled(self) -> Self {
        match self {
            Unit::Metric => Unit::Imperial,
            Unit::Imperial => Unit::Metric,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Unit::Metric => "metric",
            Unit::Imperial => "imperial",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Unit::Metric => "Metric",
            Unit::Imperial => "Imperial",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw autosuggest hit as served by `GET /search`.
///
/// Unknown fields are ignored; only the label and the lat/lng pair are read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub city: String,
    pub lat: f64,
    pub lng: f64,
}

/// A validated location candidate offered to the user.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub label: String,
    pub coordinate: Coordinate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidHit {
    EmptyLabel,
    CoordinateOutOfRange,
}

impl fmt::Display for InvalidHit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidHit::EmptyLabel => f.write_str("search hit has an empty label"),
            InvalidHit::CoordinateOutOfRange => {
                f.write_str("search hit coordinate is out of range")
            }
        }
    }
}

impl std::error::Error for InvalidHit {}

impl TryFrom<SearchHit> for Candidate {
    type Error = InvalidHit;

    fn try_from(hit: SearchHit) -> Result<Self, Self::Error> {
        let label = hit.city.trim();
        if label.is_empty() {
            return Err(InvalidHit::EmptyLabel);
        }
        let coordinate = Coordinate {
            lat: hit.lat,
            lon: hit.lng,
        };
        if !coordinate.is_valid() {
            return Err(InvalidHit::CoordinateOutOfRange);
        }
        Ok(Candidate {
            label: label.to_string(),
            coordinate,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceMatrixRequest {
    pub latitudes: Vec<f64>,
    pub longitudes: Vec<f64>,
    #[serde(default = "default_unit")]
    pub unit: Unit,
}

impl DistanceMatrixRequest {
    pub fn from_coordinates(coords: &[Coordinate], unit: Unit) -> Self {
        Self {
            latitudes: coords.iter().map(|c| c.lat).collect(),
            longitudes: coords.iter().map(|c| c.lon).collect(),
            unit,
        }
    }

    /// Pairs latitudes with longitudes, `None` when the arrays disagree in length.
    pub fn coordinates(&self) -> Option<Vec<Coordinate>> {
        if self.latitudes.len() != self.longitudes.len() {
            return None;
        }
        Some(
            self.latitudes
                .iter()
                .zip(&self.longitudes)
                .map(|(&lat, &lon)| Coordinate { lat, lon })
                .collect(),
        )
    }
}

/// The service defaults to imperial when no unit is given.
pub fn default_unit() -> Unit {
    Unit::Imperial
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl Bounds {
    pub fn enclosing(coords: &[Coordinate]) -> Option<Self> {
        let (first, rest) = coords.split_first()?;
        let seed = Bounds {
            min_lat: first.lat,
            max_lat: first.lat,
            min_lon: first.lon,
            max_lon: first.lon,
        };
        Some(rest.iter().fold(seed, |b, c| Bounds {
            min_lat: b.min_lat.min(c.lat),
            max_lat: b.max_lat.max(c.lat),
            min_lon: b.min_lon.min(c.lon),
            max_lon: b.max_lon.max(c.lon),
        }))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub message: String,
}

/// Renders a distance the way the distance panel shows it, e.g. `12.40 metric`.
pub fn format_distance(value: f64, unit: Unit) -> String {
    format!("{value:.2} {unit}")
}
