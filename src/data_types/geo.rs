use geo_types::Coord;
use serde_derive::{Deserialize, Serialize};

use super::common::DocumentId;

/// A tour part resampled to a reduced number of points. Latitude and longitude are
/// stored as integers scaled with the accuracy they were normalized with.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct NormalizedGeoData {
    pub tour_id: Option<DocumentId>,

    /// Range in the original series which was normalized
    pub first_index: usize,
    pub last_index: usize,

    pub accuracy: i32,

    pub normalized_lat: Vec<i32>,
    pub normalized_lon: Vec<i32>,

    /// For every normalized point the index in the original series
    pub normalized_to_original_indices: Vec<usize>,
}

impl NormalizedGeoData {
    pub fn new(
        tour_id: Option<DocumentId>,
        first_index: usize,
        last_index: usize,
        accuracy: i32,
    ) -> Self {
        Self {
            tour_id,
            first_index,
            last_index,
            accuracy,
            ..Default::default()
        }
    }

    pub fn len(&self) -> usize {
        self.normalized_lat.len()
    }

    pub fn is_empty(&self) -> bool {
        self.normalized_lat.is_empty()
    }

    pub fn push(&mut self, lat: i32, lon: i32, original_index: usize) {
        self.normalized_lat.push(lat);
        self.normalized_lon.push(lon);
        self.normalized_to_original_indices.push(original_index);
    }

    /// Moves the last point to a later original index, the point itself is unchanged.
    pub fn move_last_index(&mut self, original_index: usize) {
        if let Some(last) = self.normalized_to_original_indices.last_mut() {
            *last = original_index;
        }
    }

    pub fn last_point(&self) -> Option<(i32, i32)> {
        Some((*self.normalized_lat.last()?, *self.normalized_lon.last()?))
    }

    pub fn to_lat(&self, normalized: i32) -> f64 {
        normalized as f64 / self.accuracy as f64 - 90.
    }

    pub fn to_lon(&self, normalized: i32) -> f64 {
        normalized as f64 / self.accuracy as f64 - 180.
    }

    /// Coordinates with x = longitude and y = latitude
    pub fn coords(&self) -> Vec<Coord> {
        self.normalized_lat
            .iter()
            .zip(self.normalized_lon.iter())
            .map(|(lat, lon)| Coord {
                x: self.to_lon(*lon),
                y: self.to_lat(*lat),
            })
            .collect()
    }

    /// Encodes the normalized track as a polyline with 5 digits precision.
    pub fn to_polyline(&self) -> Result<String, String> {
        polyline::encode_coordinates(self.coords(), 5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coords_are_denormalized() {
        let mut geo = NormalizedGeoData::new(Some(7), 0, 2, 10_000);
        geo.push(
            ((47.5 + 90.) * 10_000_f64).round() as i32,
            ((8.25 + 180.) * 10_000_f64).round() as i32,
            0,
        );

        let coords = geo.coords();
        assert_eq!(coords.len(), 1);
        assert!((coords[0].y - 47.5).abs() < 1e-6);
        assert!((coords[0].x - 8.25).abs() < 1e-6);
    }

    #[test]
    fn polyline_matches_reference_encoding() {
        let mut geo = NormalizedGeoData::new(None, 0, 1, 100_000);
        for (index, (lat, lon)) in [(38.5_f64, -120.2_f64), (40.7, -120.95)].iter().enumerate() {
            geo.push(
                ((lat + 90.) * 100_000.).round() as i32,
                ((lon + 180.) * 100_000.).round() as i32,
                index,
            );
        }

        let encoded = geo.to_polyline().unwrap();
        assert_eq!(encoded, "_p~iF~ps|U_ulLnnqC");
    }
}
