use serde_derive::Serialize;

use crate::data_types::swim::{LengthType, StrokeStyle, SwimData};

/// Builds swim samples from the stroke and turn events of a pool swim.
#[derive(Debug, Default)]
pub struct SwimCollector {
    samples: Vec<SwimData>,
    previous_total_lengths: i32,
}

impl SwimCollector {
    pub fn new() -> Self {
        Default::default()
    }

    /// Counts a stroke for the current length, `false` when no length was started.
    pub fn stroke(&mut self) -> bool {
        match self.samples.last_mut() {
            Some(previous) => {
                previous.strokes = Some(previous.strokes.unwrap_or(0) + 1);
                true
            }
            None => false,
        }
    }

    /// Ends the current length and starts a new one at `absolute_time`. When the total
    /// length count did not change the swimmer rested, the ended length becomes idle.
    pub fn turn(&mut self, absolute_time: i64, total_lengths: i32, style: Option<StrokeStyle>) {
        if let Some(previous) = self.samples.last_mut() {
            if total_lengths > 0 && total_lengths == self.previous_total_lengths {
                previous.length_type = Some(LengthType::Idle);
            }

            if style.is_some() {
                previous.stroke_style = style;
            }
        }

        self.samples.push(SwimData {
            absolute_time,
            strokes: Some(0),
            length_type: Some(LengthType::Active),
            ..Default::default()
        });

        self.previous_total_lengths = total_lengths;
    }

    pub fn samples(&self) -> &[SwimData] {
        &self.samples
    }

    pub fn finish(self) -> Vec<SwimData> {
        self.samples
    }
}

/// Swim samples as parallel series, time relative to the tour start.
#[derive(Debug, Serialize, Clone, Default, PartialEq)]
pub struct SwimSeries {
    /// Seconds
    pub time: Vec<i32>,
    pub length_type: Vec<Option<LengthType>>,
    pub strokes: Vec<Option<i16>>,
    pub stroke_style: Vec<Option<StrokeStyle>>,
    /// Strokes per minute, from the sample or computed from the length duration
    pub cadence: Vec<Option<i16>>,
}

impl SwimSeries {
    /// Samples before the tour start are dropped.
    pub fn from_samples(tour_start_time: i64, samples: &[SwimData]) -> Self {
        let samples: Vec<&SwimData> = samples
            .iter()
            .filter(|sample| sample.absolute_time >= tour_start_time)
            .collect();

        let mut series = SwimSeries::default();

        for (index, sample) in samples.iter().enumerate() {
            let next_time = samples.get(index + 1).map(|next| next.absolute_time);

            let cadence = sample.cadence.or_else(|| {
                let strokes = sample.strokes.filter(|strokes| *strokes > 0)?;
                let duration_ms = next_time? - sample.absolute_time;

                (duration_ms > 0).then(|| {
                    let per_minute = strokes as i64 * 60_000 / duration_ms;
                    i16::try_from(per_minute).unwrap_or(i16::MAX)
                })
            });

            series
                .time
                .push(((sample.absolute_time - tour_start_time) / 1000) as i32);
            series.length_type.push(sample.length_type);
            series.strokes.push(sample.strokes);
            series.stroke_style.push(sample.stroke_style);
            series.cadence.push(cadence);
        }

        series
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Number of active lengths
    pub fn active_lengths(&self) -> usize {
        self.length_type
            .iter()
            .filter(|length_type| **length_type == Some(LengthType::Active))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strokes_need_a_started_length() {
        let mut collector = SwimCollector::new();

        assert!(!collector.stroke());

        collector.turn(1_000, 0, None);
        assert!(collector.stroke());
        assert!(collector.stroke());

        assert_eq!(collector.samples()[0].strokes, Some(2));
    }

    #[test]
    fn unchanged_lengths_mark_a_rest() {
        let mut collector = SwimCollector::new();

        collector.turn(0, 0, None);
        collector.stroke();
        collector.turn(30_000, 1, Some(StrokeStyle::Freestyle));
        collector.turn(60_000, 1, Some(StrokeStyle::Breaststroke));

        let samples = collector.finish();

        assert_eq!(samples.len(), 3);
        assert_eq!(samples[0].stroke_style, Some(StrokeStyle::Freestyle));
        assert_eq!(samples[0].length_type, Some(LengthType::Active));
        assert_eq!(samples[1].length_type, Some(LengthType::Idle));
        assert_eq!(samples[1].stroke_style, Some(StrokeStyle::Breaststroke));
        assert_eq!(samples[2].length_type, Some(LengthType::Active));
    }

    #[test]
    fn series_are_relative_to_tour_start() {
        let mut early = SwimData::new(5_000);
        early.strokes = Some(3);

        let mut first = SwimData::new(10_000);
        first.strokes = Some(20);
        first.length_type = Some(LengthType::Active);

        let mut second = SwimData::new(40_000);
        second.strokes = Some(18);
        second.cadence = Some(33);
        second.length_type = Some(LengthType::Active);

        let series = SwimSeries::from_samples(10_000, &[early, first, second]);

        assert_eq!(series.time, vec![0, 30]);
        assert_eq!(series.strokes, vec![Some(20), Some(18)]);
        // 20 strokes in 30 s, the last length keeps its own cadence
        assert_eq!(series.cadence, vec![Some(40), Some(33)]);
        assert_eq!(series.active_lengths(), 2);
    }

    #[test]
    fn derived_cadence_is_clamped() {
        let mut short = SwimData::new(0);
        short.strokes = Some(100);

        let series = SwimSeries::from_samples(0, &[short, SwimData::new(50)]);

        assert_eq!(series.cadence, vec![Some(i16::MAX), None]);
    }
}
