use std::path::Path;

use serde_derive::{Deserialize, Serialize};

use crate::{error::Result, processors::break_time::BreakTimeConfig};

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub name: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "mongodb://127.0.0.1:27017".to_string(),
            name: "tour_db".to_string(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ElevationConfig {
    /// Douglas-Peucker tolerance in meters
    pub dp_tolerance: f32,
    /// Used when a tour has no distance serie
    pub min_altitude_diff: f32,
    /// Spans with an absolute gradient up to this percentage are flat
    pub flat_gradient: f32,
}

impl Default for ElevationConfig {
    fn default() -> Self {
        Self {
            dp_tolerance: 7.,
            min_altitude_diff: 5.,
            flat_gradient: 1.,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GeoConfig {
    /// Scale for latitude/longitude integers, 10_000 is about 11 m
    pub accuracy: i32,
    /// Meters between normalized points
    pub distance_interval: f32,
}

impl Default for GeoConfig {
    fn default() -> Self {
        Self {
            accuracy: 10_000,
            distance_interval: 100.,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub elevation: ElevationConfig,
    pub break_time: BreakTimeConfig,
    pub geo: GeoConfig,
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;

        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}
