use serde_derive::{Deserialize, Serialize};

use crate::{
    data_types::{elevation::ElevationMark, segment::TourSegment, tour::TourData},
    logln,
};

use super::{
    averages::Averages,
    break_time::{BreakTime, BreakTimeConfig},
    douglas_peucker::DouglasPeucker,
    elevation::ElevationProcessor,
};

/// How the borders of the segments are found.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SegmenterType {
    /// A border every `interval` meters
    ByDistance { interval: f32 },

    /// Borders at the points kept by Douglas-Peucker on the elevation profile
    ByDouglasPeucker { tolerance: f32 },

    /// Borders at the alternations of the minimum altitude difference algorithm
    ByMinAltitudeDiff { min_diff: f32 },
}

impl Default for SegmenterType {
    fn default() -> Self {
        SegmenterType::ByDouglasPeucker { tolerance: 7. }
    }
}

pub struct TourSegmenter {}

impl TourSegmenter {
    const CC: &str = "Segmenter";

    /// Sorted serie indices of the segment borders. Contains the first and the last
    /// index, empty when the tour has not the series the segmenter needs.
    pub fn segment_indices(tour: &TourData, segmenter: &SegmenterType) -> Vec<usize> {
        let num_slices = tour.num_slices();
        if num_slices < 2 {
            return Vec::new();
        }

        let mut indices = match *segmenter {
            SegmenterType::ByDistance { interval } => {
                if !tour.has_distance() {
                    return Vec::new();
                }

                let distance = &tour.distance_serie;
                let mut indices = vec![0];

                if interval > 0. {
                    let mut last_border = distance[0];
                    for (serie_index, value) in distance.iter().enumerate().skip(1) {
                        if value - last_border >= interval {
                            indices.push(serie_index);
                            last_border = *value;
                        }
                    }
                }

                indices
            }

            SegmenterType::ByDouglasPeucker { tolerance } => {
                if !tour.has_distance() || !tour.has_altitude() {
                    return Vec::new();
                }

                DouglasPeucker::new(tolerance).simplify(
                    &tour.distance_serie,
                    &tour.altitude_serie,
                    &[],
                )
            }

            SegmenterType::ByMinAltitudeDiff { min_diff } => {
                if !tour.has_altitude() {
                    return Vec::new();
                }

                let mut marks: Vec<ElevationMark> = Vec::new();
                ElevationProcessor::by_min_altitude_diff(
                    &tour.altitude_serie,
                    min_diff,
                    Some(&mut marks),
                );

                marks.iter().map(|mark| mark.serie_index).collect()
            }
        };

        indices.push(0);
        indices.push(num_slices - 1);
        indices.sort_unstable();
        indices.dedup();

        indices
    }

    /// One segment for each pair of consecutive serie indices and a final total segment.
    pub fn create_segments(
        tour: &TourData,
        serie_indices: &[usize],
        break_config: &BreakTimeConfig,
    ) -> Option<Vec<TourSegment>> {
        if serie_indices.len() < 2 || !tour.has_time() {
            return None;
        }

        let last_serie_index = tour.num_slices() - 1;
        if serie_indices.iter().any(|index| *index > last_serie_index) {
            return None;
        }

        let time = &tour.time_serie;
        let has_distance = tour.has_distance();
        let has_altitude = tour.has_altitude();

        let breaks = BreakTime::serie(tour, break_config);

        // tour values, segments are compared against them
        let tour_moving_time = tour.elapsed_time()
            - tour.paused_time(0, last_serie_index)
            - BreakTime::sum(time, &breaks, 0, last_serie_index);
        let tour_pace = Self::pace(tour_moving_time, tour.distance());

        let tour_pulse = tour.has_pulse().then(|| {
            Averages::time_weighted(&tour.pulse_serie, time, &breaks, 0, last_serie_index)
        });
        let tour_cadence = if tour.has_cadence() {
            Averages::time_weighted(&tour.cadence_serie, time, &breaks, 0, last_serie_index)
        } else {
            0.
        };

        let mut segments = Vec::with_capacity(serie_indices.len());
        let mut total = TourSegment {
            serie_index_start: serie_indices[0],
            serie_index_end: serie_indices[serie_indices.len() - 1],
            is_total: true,
            ..Default::default()
        };

        for pair in serie_indices.windows(2) {
            let (start, end) = (pair[0], pair[1]);

            let mut segment = TourSegment {
                serie_index_start: start,
                serie_index_end: end,
                ..Default::default()
            };

            // time
            segment.time_elapsed = time[end] - time[start];
            segment.time_paused = tour.paused_time(start, end);
            segment.time_recorded = segment.time_elapsed - segment.time_paused;
            segment.time_break = BreakTime::sum(time, &breaks, start, end);
            segment.time_moving = (segment.time_recorded - segment.time_break).max(0);

            total.time_elapsed += segment.time_elapsed;
            total.time_paused += segment.time_paused;
            total.time_recorded += segment.time_recorded;
            total.time_break += segment.time_break;
            total.time_moving += segment.time_moving;
            segment.time_total = total.time_elapsed;

            // distance
            if has_distance {
                segment.distance_diff = tour.distance_serie[end] - tour.distance_serie[start];

                total.distance_diff += segment.distance_diff;
                segment.distance_total = total.distance_diff;

                if segment.distance_diff != 0. {
                    segment.speed = Self::speed(segment.time_moving, segment.distance_diff);
                    segment.pace = Self::pace(segment.time_moving, segment.distance_diff);
                    segment.pace_diff = segment.pace - tour_pace;
                }
            }

            // altitude, down values are negative
            if has_altitude {
                let altitude_diff = tour.altitude_serie[end] - tour.altitude_serie[start];
                segment.altitude_segment_border_diff = altitude_diff;

                if altitude_diff > 0. {
                    segment.altitude_segment_up = altitude_diff;
                    total.altitude_segment_up += altitude_diff;
                } else {
                    segment.altitude_segment_down = altitude_diff;
                    total.altitude_segment_down += altitude_diff;
                }

                segment.altitude_summarized_border_up = total.altitude_segment_up;
                segment.altitude_summarized_border_down = total.altitude_segment_down;

                if segment.time_moving > 0 {
                    segment.altitude_up_down_hour =
                        altitude_diff / segment.time_moving as f32 * 3600.;
                }

                if has_distance && segment.distance_diff != 0. {
                    segment.gradient = altitude_diff * 100. / segment.distance_diff;
                }
            }

            if tour.has_power() {
                segment.power = Averages::power(&tour.power_serie, start, end);
            }

            if let Some(tour_pulse) = tour_pulse {
                segment.pulse =
                    Averages::time_weighted(&tour.pulse_serie, time, &breaks, start, end);
                segment.pulse_diff = Some(segment.pulse - tour_pulse);
            }

            if tour.has_cadence() {
                segment.cadence =
                    Averages::time_weighted(&tour.cadence_serie, time, &breaks, start, end);
            }

            segments.push(segment);
        }

        total.time_total = total.time_elapsed;
        total.distance_total = total.distance_diff;
        total.altitude_segment_border_diff =
            total.altitude_segment_up + total.altitude_segment_down;
        total.altitude_summarized_border_up = total.altitude_segment_up;
        total.altitude_summarized_border_down = total.altitude_segment_down;
        total.speed = Self::speed(total.time_moving, total.distance_diff);
        total.pace = Self::pace(total.time_moving, total.distance_diff);
        total.pulse = tour_pulse.unwrap_or(0.);
        total.cadence = tour_cadence;

        if tour.has_power() {
            total.power = Averages::power(
                &tour.power_serie,
                total.serie_index_start,
                total.serie_index_end,
            );
        }

        if has_distance && total.distance_diff != 0. {
            total.gradient = total.altitude_segment_border_diff * 100. / total.distance_diff;
        }

        logln!(
            "{} segments, {:.0} m in {} s moving",
            segments.len(),
            total.distance_diff,
            total.time_moving
        );

        segments.push(total);

        Some(segments)
    }

    /// km/h
    fn speed(moving_time: i32, distance: f32) -> f32 {
        if moving_time <= 0 {
            0.
        } else {
            distance / moving_time as f32 * 3.6
        }
    }

    /// Seconds per km
    fn pace(moving_time: i32, distance: f32) -> f32 {
        if distance == 0. {
            0.
        } else {
            moving_time as f32 * 1000. / distance
        }
    }
}
