use serde_derive::{Deserialize, Serialize};

use crate::error::{Error, Result};

use super::common::{DocumentId, Entity, Identifiable, ENTITY_IS_NOT_SAVED};

fn not_saved() -> DocumentId {
    ENTITY_IS_NOT_SAVED
}

/// An interval during which the device timer was paused. Times are epoch milliseconds.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TourTimerPause {
    #[serde(rename = "_id", default = "not_saved")]
    pub timer_pause_id: DocumentId,
    #[serde(default = "not_saved")]
    pub tour_id: DocumentId,
    pub start_time: i64,
    pub end_time: i64,
}

impl TourTimerPause {
    pub fn new(tour_id: DocumentId, start_time: i64, end_time: i64) -> Result<Self> {
        if end_time < start_time {
            return Err(Error::InvalidInput(format!(
                "timer pause ends at {end_time} before it starts at {start_time}"
            )));
        }

        Ok(Self {
            timer_pause_id: ENTITY_IS_NOT_SAVED,
            tour_id,
            start_time,
            end_time,
        })
    }

    /// Milliseconds
    pub fn duration(&self) -> i64 {
        self.end_time - self.start_time
    }

    /// Milliseconds of this pause which fall into `from..to`.
    pub fn overlap(&self, from: i64, to: i64) -> i64 {
        (self.end_time.min(to) - self.start_time.max(from)).max(0)
    }

    /// Milliseconds of all pauses which fall into `from..to`.
    pub fn paused_time_between(pauses: &[TourTimerPause], from: i64, to: i64) -> i64 {
        pauses.iter().map(|pause| pause.overlap(from, to)).sum()
    }
}

impl Identifiable for TourTimerPause {
    fn as_i64(&self) -> DocumentId {
        self.timer_pause_id
    }
}

impl Entity for TourTimerPause {
    const COLL_NAME: &'static str = "timer_pauses";

    fn set_id(&mut self, id: DocumentId) {
        self.timer_pause_id = id;
    }
}
