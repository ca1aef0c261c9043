pub mod averages;
pub mod break_time;
pub mod douglas_peucker;
pub mod elevation;
pub mod geo_normalizer;
pub mod segmenter;
pub mod spline;
pub mod swim;
