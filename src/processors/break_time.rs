use serde_derive::{Deserialize, Serialize};

use crate::{data_types::tour::TourData, logvbln};

/// How a break, a time slice without moving, is detected.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum BreakTimeConfig {
    /// The distance has not changed within the last `min_slices` time slices
    MinSlices { min_slices: usize },

    /// Speed of the slice is below `min_speed` km/h
    SliceSpeed { min_speed: f32 },

    /// Moved less than `short_distance` meters within the last `short_time` seconds
    TimeDistance { short_time: i32, short_distance: f32 },
}

impl Default for BreakTimeConfig {
    fn default() -> Self {
        BreakTimeConfig::SliceSpeed { min_speed: 1. }
    }
}

pub struct BreakTime {}

impl BreakTime {
    const CC: &str = "BreakTime";

    /// A flag for each time slice, set when the slice ending at this index is a break.
    /// Empty when the tour has no time or distance serie.
    pub fn serie(tour: &TourData, config: &BreakTimeConfig) -> Vec<bool> {
        if !tour.has_time() || !tour.has_distance() {
            return Vec::new();
        }

        let time = &tour.time_serie;
        let distance = &tour.distance_serie;

        let breaks = match *config {
            BreakTimeConfig::MinSlices { min_slices } => {
                let min_slices = min_slices.max(1);

                (0..time.len())
                    .map(|index| {
                        index > 0 && distance[index] == distance[index.saturating_sub(min_slices)]
                    })
                    .collect()
            }

            BreakTimeConfig::SliceSpeed { min_speed } => (0..time.len())
                .map(|index| {
                    if index == 0 {
                        return false;
                    }

                    let time_diff = time[index] - time[index - 1];
                    if time_diff <= 0 {
                        return false;
                    }

                    let speed = (distance[index] - distance[index - 1]) / time_diff as f32 * 3.6;
                    speed < min_speed
                })
                .collect(),

            BreakTimeConfig::TimeDistance {
                short_time,
                short_distance,
            } => {
                let mut breaks = vec![false; time.len()];
                let mut window_start: Option<usize> = None;

                for index in 1..time.len() {
                    // last slice which is at least `short_time` before the current slice
                    let mut next = window_start.map_or(0, |start| start + 1);
                    while next < index && time[index] - time[next] >= short_time {
                        window_start = Some(next);
                        next += 1;
                    }

                    if let Some(start) = window_start {
                        breaks[index] = distance[index] - distance[start] < short_distance;
                    }
                }

                breaks
            }
        };

        logvbln!(
            "{} of {} slices are breaks",
            breaks.iter().filter(|is_break| **is_break).count(),
            breaks.len()
        );

        breaks
    }

    /// Seconds of break between two serie indices.
    pub fn sum(time: &[i32], breaks: &[bool], start_index: usize, end_index: usize) -> i32 {
        if breaks.is_empty() || time.is_empty() {
            return 0;
        }

        let end_index = end_index.min(time.len() - 1).min(breaks.len() - 1);

        (start_index + 1..=end_index)
            .filter(|index| breaks[*index])
            .map(|index| time[index] - time[index - 1])
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tour(time: Vec<i32>, distance: Vec<f32>) -> TourData {
        TourData {
            time_serie: time,
            distance_serie: distance,
            ..Default::default()
        }
    }

    #[test]
    fn min_slices_detects_standing_still() {
        let tour = tour(
            vec![0, 10, 20, 30, 40, 50],
            vec![0., 50., 50., 50., 80., 80.],
        );

        let breaks = BreakTime::serie(&tour, &BreakTimeConfig::MinSlices { min_slices: 1 });

        assert_eq!(breaks, vec![false, false, true, true, false, true]);
        assert_eq!(BreakTime::sum(&tour.time_serie, &breaks, 0, 5), 30);
        assert_eq!(BreakTime::sum(&tour.time_serie, &breaks, 0, 99), 30);
    }

    #[test]
    fn slice_speed_uses_km_per_hour() {
        // 10 m in 10 s is 3.6 km/h, 2 m in 10 s is 0.72 km/h
        let tour = tour(vec![0, 10, 20, 20], vec![0., 10., 12., 12.]);

        let breaks = BreakTime::serie(&tour, &BreakTimeConfig::SliceSpeed { min_speed: 1. });

        assert_eq!(breaks, vec![false, false, true, false]);
    }

    #[test]
    fn time_distance_looks_back_over_window() {
        let tour = tour(
            vec![0, 5, 10, 15, 20, 25],
            vec![0., 20., 40., 42., 44., 70.],
        );

        let breaks = BreakTime::serie(
            &tour,
            &BreakTimeConfig::TimeDistance {
                short_time: 10,
                short_distance: 10.,
            },
        );

        // slice 4 moved 4 m since slice 2, slice 3 moved 22 m since slice 1
        assert_eq!(breaks, vec![false, false, false, false, true, false]);
    }

    #[test]
    fn missing_distance_has_no_breaks() {
        let tour = tour(vec![0, 10, 20], vec![]);

        assert!(BreakTime::serie(&tour, &BreakTimeConfig::default()).is_empty());
        assert_eq!(BreakTime::sum(&tour.time_serie, &[], 0, 2), 0);
    }
}
