use geo_types::Coord;

/// Coordinates are x = longitude, y = latitude in degrees.
pub struct GeoUtils;

impl GeoUtils {
    const EARTH_RADIUS: f64 = 6_371_000.;

    /// Great circle distance in meters (haversine).
    pub fn distance(p1: Coord, p2: Coord) -> f64 {
        let lat1 = p1.y.to_radians();
        let lat2 = p2.y.to_radians();
        let delta_lat = (p2.y - p1.y).to_radians();
        let delta_lon = (p2.x - p1.x).to_radians();

        let a = (delta_lat / 2.).sin().powi(2)
            + lat1.cos() * lat2.cos() * (delta_lon / 2.).sin().powi(2);

        2. * Self::EARTH_RADIUS * a.sqrt().atan2((1. - a).sqrt())
    }

    /// Latitude as a positive integer with `accuracy` steps per degree.
    pub fn normalize_lat(lat: f64, accuracy: i32) -> i32 {
        ((lat + 90.) * accuracy as f64).round() as i32
    }

    /// Longitude as a positive integer with `accuracy` steps per degree.
    pub fn normalize_lon(lon: f64, accuracy: i32) -> i32 {
        ((lon + 180.) * accuracy as f64).round() as i32
    }

    /// (south-west, north-east) corners, `None` without coordinates.
    pub fn bounding_box(coords: &[Coord]) -> Option<(Coord, Coord)> {
        let first = coords.first()?;

        let (min, max) = coords.iter().skip(1).fold((*first, *first), |(min, max), coord| {
            (
                Coord {
                    x: min.x.min(coord.x),
                    y: min.y.min(coord.y),
                },
                Coord {
                    x: max.x.max(coord.x),
                    y: max.y.max(coord.y),
                },
            )
        });

        Some((min, max))
    }

    pub fn center_of_bbox(south_west: Coord, north_east: Coord) -> Coord {
        Coord {
            x: (south_west.x + north_east.x) / 2.,
            y: (south_west.y + north_east.y) / 2.,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_degree_of_latitude() {
        let distance = GeoUtils::distance(Coord { x: 8., y: 47. }, Coord { x: 8., y: 48. });

        assert!((distance - 111_195.).abs() < 1.);
    }

    #[test]
    fn normalized_values_are_positive() {
        assert_eq!(GeoUtils::normalize_lat(-90., 10_000), 0);
        assert_eq!(GeoUtils::normalize_lon(8.25, 10_000), 1_882_500);
    }

    #[test]
    fn bounding_box_and_center() {
        let coords = [
            Coord { x: 8., y: 47. },
            Coord { x: 9., y: 46. },
            Coord { x: 8.5, y: 48. },
        ];

        let (south_west, north_east) = GeoUtils::bounding_box(&coords).unwrap();
        assert_eq!(south_west, Coord { x: 8., y: 46. });
        assert_eq!(north_east, Coord { x: 9., y: 48. });
        assert_eq!(
            GeoUtils::center_of_bbox(south_west, north_east),
            Coord { x: 8.5, y: 47. }
        );

        assert!(GeoUtils::bounding_box(&[]).is_none());
    }
}
