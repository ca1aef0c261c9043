use serde_derive::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StrokeStyle {
    Freestyle,
    Backstroke,
    Breaststroke,
    Butterfly,
    Drill,
    Mixed,
    Im,
}

impl StrokeStyle {
    pub fn code(&self) -> i16 {
        match self {
            StrokeStyle::Freestyle => 0,
            StrokeStyle::Backstroke => 1,
            StrokeStyle::Breaststroke => 2,
            StrokeStyle::Butterfly => 3,
            StrokeStyle::Drill => 4,
            StrokeStyle::Mixed => 5,
            StrokeStyle::Im => 6,
        }
    }

    pub fn from_code(code: i16) -> Option<Self> {
        match code {
            0 => Some(StrokeStyle::Freestyle),
            1 => Some(StrokeStyle::Backstroke),
            2 => Some(StrokeStyle::Breaststroke),
            3 => Some(StrokeStyle::Butterfly),
            4 => Some(StrokeStyle::Drill),
            5 => Some(StrokeStyle::Mixed),
            6 => Some(StrokeStyle::Im),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LengthType {
    Idle,
    Active,
}

impl LengthType {
    pub fn code(&self) -> i16 {
        match self {
            LengthType::Idle => 0,
            LengthType::Active => 1,
        }
    }

    pub fn from_code(code: i16) -> Option<Self> {
        match code {
            0 => Some(LengthType::Idle),
            1 => Some(LengthType::Active),
            _ => None,
        }
    }
}

/// One pool length of a swim activity, unset values are `None`.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq)]
pub struct SwimData {
    /// Epoch milliseconds
    pub absolute_time: i64,

    #[serde(default)]
    pub cadence: Option<i16>,
    #[serde(default)]
    pub strokes: Option<i16>,
    #[serde(default)]
    pub stroke_style: Option<StrokeStyle>,
    #[serde(default)]
    pub length_type: Option<LengthType>,
}

impl SwimData {
    pub fn new(absolute_time: i64) -> Self {
        Self {
            absolute_time,
            ..Default::default()
        }
    }
}
