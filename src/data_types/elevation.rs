use std::ops::AddAssign;

use serde_derive::{Deserialize, Serialize};

/// Cumulative elevation change over a span, both values are positive meters.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq)]
pub struct ElevationGainLoss {
    pub gain: f32,
    pub loss: f32,
}

impl ElevationGainLoss {
    pub fn new(gain: f32, loss: f32) -> Self {
        Self { gain, loss }
    }

    /// Adds a signed altitude difference to the matching bucket.
    pub fn add_diff(&mut self, altitude_diff: f32) {
        if altitude_diff > 0. {
            self.gain += altitude_diff;
        } else {
            self.loss -= altitude_diff;
        }
    }

    pub fn net(&self) -> f32 {
        self.gain - self.loss
    }
}

impl AddAssign for ElevationGainLoss {
    fn add_assign(&mut self, other: Self) {
        self.gain += other.gain;
        self.loss += other.loss;
    }
}

/// One alternation point found while computing elevation gain/loss with a minimum
/// altitude difference.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq)]
pub struct ElevationMark {
    pub serie_index: usize,
    pub altitude_diff: f32,
}

/// Time, distance and elevation split into flat, uphill and downhill parts of a tour.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq)]
pub struct FlatGainLoss {
    pub time_flat: i64,
    pub time_gain: i64,
    pub time_loss: i64,

    pub distance_flat: f32,
    pub distance_gain: f32,
    pub distance_loss: f32,

    pub elevation_gain: f32,
    pub elevation_loss: f32,
}

impl FlatGainLoss {
    pub fn total_time(&self) -> i64 {
        self.time_flat + self.time_gain + self.time_loss
    }

    pub fn total_distance(&self) -> f32 {
        self.distance_flat + self.distance_gain + self.distance_loss
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_diff_splits_by_sign() {
        let mut gain_loss = ElevationGainLoss::default();
        gain_loss.add_diff(12.5);
        gain_loss.add_diff(-4.0);
        gain_loss.add_diff(0.0);

        assert_eq!(gain_loss, ElevationGainLoss::new(12.5, 4.0));
        assert_eq!(gain_loss.net(), 8.5);
    }

    #[test]
    fn totals_sum_all_buckets() {
        let buckets = FlatGainLoss {
            time_flat: 60,
            time_gain: 120,
            time_loss: 30,
            distance_flat: 500.,
            distance_gain: 800.,
            distance_loss: 700.,
            ..Default::default()
        };

        assert_eq!(buckets.total_time(), 210);
        assert_eq!(buckets.total_distance(), 2000.);
    }
}
