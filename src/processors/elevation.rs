use crate::{
    data_types::{
        elevation::{ElevationGainLoss, ElevationMark, FlatGainLoss},
        tour::TourData,
    },
    logvbln,
    util::config::ElevationConfig,
};

use super::douglas_peucker::DouglasPeucker;

pub struct ElevationProcessor {}

impl ElevationProcessor {
    const CC: &str = "Elevation";

    /// Gain/loss with Douglas-Peucker when a distance serie is available, otherwise
    /// with the minimum altitude difference.
    pub fn compute(tour: &TourData, config: &ElevationConfig) -> Option<ElevationGainLoss> {
        if tour.has_distance() {
            Self::by_douglas_peucker(&tour.distance_serie, &tour.altitude_serie, config.dp_tolerance)
        } else {
            Self::by_min_altitude_diff(&tour.altitude_serie, config.min_altitude_diff, None)
        }
    }

    /// Sums the altitude differences between the points which are kept by Douglas-Peucker.
    pub fn by_douglas_peucker(
        distance: &[f32],
        altitude: &[f32],
        tolerance: f32,
    ) -> Option<ElevationGainLoss> {
        if altitude.len() < 2 || distance.len() != altitude.len() {
            return None;
        }

        let kept = DouglasPeucker::new(tolerance).simplify(distance, altitude, &[]);

        let mut gain_loss = ElevationGainLoss::default();
        kept.windows(2)
            .for_each(|pair| gain_loss.add_diff(altitude[pair[1]] - altitude[pair[0]]));

        logvbln!(
            "DP {} kept {} of {} points: {:?}",
            tolerance,
            kept.len(),
            altitude.len(),
            gain_loss
        );

        Some(gain_loss)
    }

    /// A direction change is accepted only after the altitude moved `min_diff` away from
    /// the last extreme, so small alternations are ignored. Every accepted climb or descent
    /// counts from extreme to extreme, the remaining open span is counted at the end.
    ///
    /// This is a hysteresis over extremes, not an accumulated run of same-direction
    /// differences: a run is not counted once it reaches `min_diff`, the whole swing
    /// between two extremes is. So `gain - loss` always equals the last minus the first
    /// altitude.
    ///
    /// When `marks` is set, the start and every counted extreme are recorded.
    pub fn by_min_altitude_diff(
        altitude: &[f32],
        min_diff: f32,
        mut marks: Option<&mut Vec<ElevationMark>>,
    ) -> Option<ElevationGainLoss> {
        if altitude.len() < 2 {
            return None;
        }

        #[derive(PartialEq)]
        enum Direction {
            None,
            Up,
            Down,
        }

        let threshold = min_diff.max(f32::MIN_POSITIVE);

        let mut gain_loss = ElevationGainLoss::default();
        let mut add_span = |serie_index: usize, altitude_diff: f32| {
            gain_loss.add_diff(altitude_diff);

            if let Some(marks) = marks.as_deref_mut() {
                marks.push(ElevationMark {
                    serie_index,
                    altitude_diff,
                });
            }
        };

        add_span(0, 0.);

        // altitude of the last counted extreme
        let mut reference = altitude[0];

        let mut extreme = altitude[0];
        let mut extreme_index = 0;
        let mut direction = Direction::None;

        for (serie_index, altitude) in altitude.iter().copied().enumerate().skip(1) {
            match direction {
                Direction::None => {
                    if altitude - reference >= threshold {
                        direction = Direction::Up;
                    } else if reference - altitude >= threshold {
                        direction = Direction::Down;
                    } else {
                        continue;
                    }

                    extreme = altitude;
                    extreme_index = serie_index;
                }

                Direction::Up => {
                    if altitude > extreme {
                        extreme = altitude;
                        extreme_index = serie_index;
                    } else if extreme - altitude >= threshold {
                        add_span(extreme_index, extreme - reference);

                        reference = extreme;
                        extreme = altitude;
                        extreme_index = serie_index;
                        direction = Direction::Down;
                    }
                }

                Direction::Down => {
                    if altitude < extreme {
                        extreme = altitude;
                        extreme_index = serie_index;
                    } else if altitude - extreme >= threshold {
                        add_span(extreme_index, extreme - reference);

                        reference = extreme;
                        extreme = altitude;
                        extreme_index = serie_index;
                        direction = Direction::Up;
                    }
                }
            }
        }

        if direction != Direction::None {
            add_span(extreme_index, extreme - reference);
            reference = extreme;
        }

        // open span after the last extreme
        let last_index = altitude.len() - 1;
        let tail = altitude[last_index] - reference;
        if tail != 0. {
            add_span(last_index, tail);
        }

        logvbln!("min diff {}: {:?}", min_diff, gain_loss);

        Some(gain_loss)
    }

    /// Splits time, distance and elevation into flat, gain and loss by the gradient
    /// of the spans between the Douglas-Peucker points.
    pub fn flat_gain_loss(
        tour: &TourData,
        dp_tolerance: f32,
        flat_gradient: f32,
    ) -> Option<FlatGainLoss> {
        if !tour.has_distance() || !tour.has_altitude() || tour.num_slices() < 2 {
            return None;
        }

        let time = &tour.time_serie;
        let distance = &tour.distance_serie;
        let altitude = &tour.altitude_serie;

        let kept = DouglasPeucker::new(dp_tolerance).simplify(distance, altitude, &[]);

        let mut buckets = FlatGainLoss::default();

        for pair in kept.windows(2) {
            let (start, end) = (pair[0], pair[1]);

            let time_diff = (time[end] - time[start]) as i64;
            let distance_diff = distance[end] - distance[start];
            let altitude_diff = altitude[end] - altitude[start];

            let gradient = if distance_diff == 0. {
                0.
            } else {
                altitude_diff / distance_diff * 100.
            };

            if gradient.abs() <= flat_gradient {
                buckets.time_flat += time_diff;
                buckets.distance_flat += distance_diff;
            } else if gradient > 0. {
                buckets.time_gain += time_diff;
                buckets.distance_gain += distance_diff;
                buckets.elevation_gain += altitude_diff;
            } else {
                buckets.time_loss += time_diff;
                buckets.distance_loss += distance_diff;
                buckets.elevation_loss -= altitude_diff;
            }
        }

        Some(buckets)
    }
}
