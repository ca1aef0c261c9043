use serde_derive::{Deserialize, Serialize};

/// Metrics of one part of a tour between two serie indices. The last segment of a
/// segmenter run has `is_total` set and summarizes all others.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct TourSegment {
    pub serie_index_start: usize,
    pub serie_index_end: usize,
    pub is_total: bool,

    // seconds
    pub time_elapsed: i32,
    pub time_recorded: i32,
    pub time_paused: i32,
    pub time_moving: i32,
    pub time_break: i32,
    pub time_total: i32,

    // meters
    pub distance_diff: f32,
    pub distance_total: f32,

    pub altitude_segment_border_diff: f32,
    pub altitude_segment_up: f32,
    pub altitude_segment_down: f32,
    pub altitude_summarized_border_up: f32,
    pub altitude_summarized_border_down: f32,
    /// meters per hour
    pub altitude_up_down_hour: f32,

    pub cadence: f32,
    /// percent
    pub gradient: f32,
    /// watts
    pub power: f32,
    /// km/h
    pub speed: f32,
    /// seconds per km
    pub pace: f32,
    pub pace_diff: f32,

    pub pulse: f32,
    /// Difference to the tour average, `None` when the tour has no pulse
    pub pulse_diff: Option<f32>,
}
