//! # Stop zone calibration

/// Named calibration point along the horizontal axis.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
pub struct Zone {
    pub x: f32,
    pub name: String,
}

impl Zone {
    pub fn new(x: f32, name: impl Into<String>) -> Self {
        Self {
            x,
            name: name.into(),
        }
    }
}

/// Maps a stopped x coordinate to a configured zone.
///
/// The zone set is immutable for the process lifetime.
pub struct ZoneMatcher {
    zones: Vec<Zone>,
    location_tolerance: f32,
}

impl ZoneMatcher {
    pub fn new(zones: Vec<Zone>, location_tolerance: f32) -> Self {
        Self {
            zones,
            location_tolerance,
        }
    }

    /// Get the first zone in list order within the location tolerance of `x`, if any.
    pub fn match_x(&self, x: f32) -> Option<&str> {
        self.zones
            .iter()
            .find(|zone| (zone.x - x).abs() < self.location_tolerance)
            .map(|zone| zone.name.as_str())
    }
}
