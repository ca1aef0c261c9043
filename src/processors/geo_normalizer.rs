use geo_types::Coord;
use serde_derive::{Deserialize, Serialize};

use crate::{
    data_types::{
        common::{Identifiable, ENTITY_IS_NOT_SAVED},
        geo::NormalizedGeoData,
        tour::TourData,
    },
    logvbln,
    util::{config::GeoConfig, geo::GeoUtils},
};

/// Best position of a reference track within a candidate track.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq)]
pub struct GeoMatch {
    /// Index in the candidate's normalized points where the reference starts
    pub start_index: usize,
    /// Average absolute lat + lon difference per point, in normalized units
    pub avg_diff: f64,
}

pub struct GeoNormalizer {
    accuracy: i32,
    distance_interval: f32,
}

impl From<&GeoConfig> for GeoNormalizer {
    fn from(config: &GeoConfig) -> Self {
        Self::new(config.accuracy, config.distance_interval)
    }
}

impl GeoNormalizer {
    const CC: &str = "GeoNormalizer";

    pub fn new(accuracy: i32, distance_interval: f32) -> Self {
        Self {
            accuracy: accuracy.max(1),
            distance_interval,
        }
    }

    /// Resamples the lat/lon series between two serie indices to points which are
    /// `distance_interval` meters apart. The first and the last point are kept, other
    /// points equal to the previous kept point are skipped. When the last point equals
    /// the previous kept point, that point is mapped to `last_index` instead.
    pub fn normalize(
        &self,
        tour: &TourData,
        first_index: usize,
        last_index: usize,
    ) -> Option<NormalizedGeoData> {
        if !tour.has_geo() || first_index > last_index || last_index >= tour.num_slices() {
            return None;
        }

        let tour_id = match tour.as_i64() {
            ENTITY_IS_NOT_SAVED => None,
            id => Some(id),
        };

        let lat = &tour.latitude_serie;
        let lon = &tour.longitude_serie;
        let has_distance = tour.has_distance();

        let mut geo = NormalizedGeoData::new(tour_id, first_index, last_index, self.accuracy);
        let mut distance_since_last = 0.;

        for serie_index in first_index..=last_index {
            let point = (
                GeoUtils::normalize_lat(lat[serie_index], self.accuracy),
                GeoUtils::normalize_lon(lon[serie_index], self.accuracy),
            );

            if serie_index == first_index {
                geo.push(point.0, point.1, serie_index);
                continue;
            }

            distance_since_last += if has_distance {
                (tour.distance_serie[serie_index] - tour.distance_serie[serie_index - 1]) as f64
            } else {
                GeoUtils::distance(
                    Coord {
                        x: lon[serie_index - 1],
                        y: lat[serie_index - 1],
                    },
                    Coord {
                        x: lon[serie_index],
                        y: lat[serie_index],
                    },
                )
            };

            let is_last = serie_index == last_index;
            if distance_since_last < self.distance_interval as f64 && !is_last {
                continue;
            }

            if geo.last_point() == Some(point) {
                // the track ends at `last_index` even when it did not move since the last point
                if is_last && geo.len() > 1 {
                    geo.move_last_index(serie_index);
                } else if is_last {
                    geo.push(point.0, point.1, serie_index);
                }
                continue;
            }

            geo.push(point.0, point.1, serie_index);
            distance_since_last = 0.;
        }

        logvbln!(
            "{} of {} points kept",
            geo.len(),
            last_index - first_index + 1
        );

        Some(geo)
    }

    /// Slides `reference` over `candidate` and returns the offset with the smallest
    /// average difference. `None` when the candidate is shorter than the reference or
    /// both were normalized with a different accuracy.
    pub fn compare(reference: &NormalizedGeoData, candidate: &NormalizedGeoData) -> Option<GeoMatch> {
        if reference.is_empty()
            || candidate.len() < reference.len()
            || reference.accuracy != candidate.accuracy
        {
            return None;
        }

        let points = reference.len();

        (0..=candidate.len() - points)
            .map(|offset| {
                let diff_sum: i64 = (0..points)
                    .map(|index| {
                        let lat_diff = candidate.normalized_lat[offset + index] as i64
                            - reference.normalized_lat[index] as i64;
                        let lon_diff = candidate.normalized_lon[offset + index] as i64
                            - reference.normalized_lon[index] as i64;

                        lat_diff.abs() + lon_diff.abs()
                    })
                    .sum();

                GeoMatch {
                    start_index: offset,
                    avg_diff: diff_sum as f64 / points as f64,
                }
            })
            .min_by(|a, b| a.avg_diff.total_cmp(&b.avg_diff))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn northbound_tour(with_distance: bool) -> TourData {
        TourData {
            tour_id: 5,
            time_serie: (0..7).map(|index| index * 10).collect(),
            distance_serie: if with_distance {
                (0..7).map(|index| index as f32 * 50.).collect()
            } else {
                Vec::new()
            },
            latitude_serie: (0..7).map(|index| 47. + index as f64 * 0.0005).collect(),
            longitude_serie: vec![8.; 7],
            ..Default::default()
        }
    }

    #[test]
    fn keeps_a_point_every_interval() {
        let normalizer = GeoNormalizer::new(10_000, 100.);

        let geo = normalizer.normalize(&northbound_tour(true), 0, 6).unwrap();

        assert_eq!(geo.tour_id, Some(5));
        assert_eq!(geo.normalized_to_original_indices, vec![0, 2, 4, 6]);
        assert_eq!(geo.normalized_lat[1], 1_370_010);
        assert_eq!(geo.normalized_lon, vec![1_880_000; 4]);
    }

    #[test]
    fn geo_distance_is_used_without_distance_serie() {
        let tour = TourData {
            time_serie: vec![0, 10, 20, 30],
            latitude_serie: vec![47., 47.001, 47.001, 47.002],
            longitude_serie: vec![8.; 4],
            ..Default::default()
        };

        let geo = GeoNormalizer::new(10_000, 100.).normalize(&tour, 0, 3).unwrap();

        // the repeated point is skipped
        assert_eq!(geo.tour_id, None);
        assert_eq!(geo.normalized_to_original_indices, vec![0, 1, 3]);
    }

    #[test]
    fn track_ends_at_the_last_index() {
        let tour = TourData {
            time_serie: vec![0, 10, 20, 30],
            latitude_serie: vec![47., 47.002, 47.002, 47.002],
            longitude_serie: vec![8.; 4],
            ..Default::default()
        };

        let geo = GeoNormalizer::new(10_000, 100.).normalize(&tour, 0, 3).unwrap();

        assert_eq!(geo.normalized_to_original_indices, vec![0, 3]);
        assert_eq!(geo.len(), 2);

        // standing still, first and last are both kept
        let standing = TourData {
            time_serie: vec![0, 10],
            latitude_serie: vec![47.; 2],
            longitude_serie: vec![8.; 2],
            ..Default::default()
        };
        let geo = GeoNormalizer::new(10_000, 100.).normalize(&standing, 0, 1).unwrap();

        assert_eq!(geo.normalized_to_original_indices, vec![0, 1]);
    }

    #[test]
    fn invalid_range() {
        let normalizer = GeoNormalizer::from(&GeoConfig::default());

        assert!(normalizer.normalize(&northbound_tour(true), 4, 2).is_none());
        assert!(normalizer.normalize(&northbound_tour(true), 0, 7).is_none());
        assert!(normalizer.normalize(&TourData::default(), 0, 0).is_none());
    }

    #[test]
    fn compare_finds_the_offset() {
        let normalizer = GeoNormalizer::new(10_000, 40.);
        let candidate = normalizer.normalize(&northbound_tour(true), 0, 6).unwrap();
        let reference = normalizer.normalize(&northbound_tour(true), 2, 4).unwrap();

        let found = GeoNormalizer::compare(&reference, &candidate).unwrap();

        assert_eq!(found.start_index, 2);
        assert_eq!(found.avg_diff, 0.);

        assert!(GeoNormalizer::compare(&candidate, &reference).is_none());
    }
}
