use std::collections::BTreeMap;

use serde_derive::{Deserialize, Serialize};

/// A user defined track channel, e.g. a sensor the device does not know about.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CustomTrackDefinition {
    pub id: String,
    pub name: String,
    pub unit: String,
}

/// Value of a custom track at one time slice, `id` references a `CustomTrackDefinition`.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CustomTrackValue {
    pub id: String,
    pub value: f32,
}

impl CustomTrackValue {
    pub fn new(id: impl Into<String>, value: f32) -> Self {
        Self {
            id: id.into(),
            value,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq)]
pub struct CustomTrackStatistic {
    pub avg: f32,
    pub min: f32,
    pub max: f32,
}

/// One serie per custom track id, aligned with the tour time slices.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomTracks {
    series: BTreeMap<String, Vec<Option<f32>>>,
}

impl CustomTracks {
    pub fn from_slices(slices: &[Vec<CustomTrackValue>]) -> Self {
        let mut series: BTreeMap<String, Vec<Option<f32>>> = BTreeMap::new();

        for (slice_index, values) in slices.iter().enumerate() {
            for track_value in values {
                let serie = series
                    .entry(track_value.id.clone())
                    .or_insert_with(|| vec![None; slices.len()]);

                serie[slice_index] = Some(track_value.value);
            }
        }

        Self { series }
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(String::as_str)
    }

    pub fn serie(&self, id: &str) -> Option<&[Option<f32>]> {
        self.series.get(id).map(Vec::as_slice)
    }

    pub fn statistic(&self, id: &str) -> Option<CustomTrackStatistic> {
        let mut values = self.series.get(id)?.iter().flatten().copied();

        let first = values.next()?;
        let (mut sum, mut count, mut min, mut max) = (first as f64, 1, first, first);

        for value in values {
            sum += value as f64;
            count += 1;
            min = min.min(value);
            max = max.max(value);
        }

        Some(CustomTrackStatistic {
            avg: (sum / count as f64) as f32,
            min,
            max,
        })
    }
}
