use serde_derive::{Deserialize, Serialize};

use super::{
    common::{DocumentId, Identifiable, ENTITY_IS_NOT_SAVED},
    custom_track::{CustomTrackDefinition, CustomTrackValue, CustomTracks},
    swim::SwimData,
    timer_pause::TourTimerPause,
};

fn not_saved() -> DocumentId {
    ENTITY_IS_NOT_SAVED
}

/// The recorded series of one tour. A serie which was not recorded is empty, all
/// recorded series have one value per time slice.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct TourData {
    #[serde(rename = "_id", default = "not_saved")]
    pub tour_id: DocumentId,

    /// Epoch milliseconds
    #[serde(default)]
    pub tour_start_time: i64,

    /// Seconds relative to the tour start
    #[serde(default)]
    pub time_serie: Vec<i32>,

    /// Meters from the tour start
    #[serde(default)]
    pub distance_serie: Vec<f32>,

    #[serde(default)]
    pub altitude_serie: Vec<f32>,

    #[serde(default)]
    pub pulse_serie: Vec<f32>,

    #[serde(default)]
    pub cadence_serie: Vec<f32>,

    #[serde(default)]
    pub power_serie: Vec<f32>,

    #[serde(default)]
    pub latitude_serie: Vec<f64>,

    #[serde(default)]
    pub longitude_serie: Vec<f64>,

    #[serde(default)]
    pub timer_pauses: Vec<TourTimerPause>,

    #[serde(default)]
    pub swim_data: Vec<SwimData>,

    /// Custom track values for each time slice
    #[serde(default)]
    pub custom_tracks: Vec<Vec<CustomTrackValue>>,

    #[serde(default)]
    pub custom_track_definitions: Vec<CustomTrackDefinition>,
}

impl TourData {
    pub fn custom_track_definition(&self, id: &str) -> Option<&CustomTrackDefinition> {
        self.custom_track_definitions
            .iter()
            .find(|definition| definition.id == id)
    }

    pub fn num_slices(&self) -> usize {
        self.time_serie.len()
    }

    fn has_serie<T>(&self, serie: &[T]) -> bool {
        !serie.is_empty() && serie.len() == self.time_serie.len()
    }

    pub fn has_time(&self) -> bool {
        !self.time_serie.is_empty()
    }

    pub fn has_distance(&self) -> bool {
        self.has_serie(&self.distance_serie)
    }

    pub fn has_altitude(&self) -> bool {
        self.has_serie(&self.altitude_serie)
    }

    pub fn has_pulse(&self) -> bool {
        self.has_serie(&self.pulse_serie)
    }

    pub fn has_cadence(&self) -> bool {
        self.has_serie(&self.cadence_serie)
    }

    pub fn has_power(&self) -> bool {
        self.has_serie(&self.power_serie)
    }

    pub fn has_geo(&self) -> bool {
        self.has_serie(&self.latitude_serie) && self.has_serie(&self.longitude_serie)
    }

    /// Seconds from the first to the last time slice
    pub fn elapsed_time(&self) -> i32 {
        match (self.time_serie.first(), self.time_serie.last()) {
            (Some(first), Some(last)) => last - first,
            _ => 0,
        }
    }

    pub fn distance(&self) -> f32 {
        match (self.distance_serie.first(), self.distance_serie.last()) {
            (Some(first), Some(last)) => last - first,
            _ => 0.,
        }
    }

    /// Epoch milliseconds of a time slice
    pub fn absolute_time(&self, serie_index: usize) -> i64 {
        self.tour_start_time + self.time_serie[serie_index] as i64 * 1000
    }

    /// Seconds in which the device timer was paused between two time slices
    pub fn paused_time(&self, start_index: usize, end_index: usize) -> i32 {
        let paused_ms = TourTimerPause::paused_time_between(
            &self.timer_pauses,
            self.absolute_time(start_index),
            self.absolute_time(end_index),
        );

        (paused_ms / 1000) as i32
    }

    pub fn custom_track_series(&self) -> CustomTracks {
        CustomTracks::from_slices(&self.custom_tracks)
    }
}

impl Identifiable for TourData {
    fn as_i64(&self) -> DocumentId {
        self.tour_id
    }
}
