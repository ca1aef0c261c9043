pub mod beverage;
pub mod common;
pub mod custom_track;
pub mod elevation;
pub mod geo;
pub mod segment;
pub mod spline;
pub mod swim;
pub mod timer_pause;
pub mod tour;
