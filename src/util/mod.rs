use chrono::{DateTime, Utc};

pub mod config;
pub mod geo;
pub mod logging;
pub mod time;

pub struct DateTimeUtils {}

impl DateTimeUtils {
    pub fn millis_to_str(epoch_millis: i64) -> String {
        match DateTime::<Utc>::from_timestamp_millis(epoch_millis) {
            Some(datetime) => datetime.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => String::new(),
        }
    }

    /// Formats seconds as `h:mm:ss`
    pub fn duration_to_str(seconds: i64) -> String {
        let sign = if seconds < 0 { "-" } else { "" };
        let seconds = seconds.abs();

        format!(
            "{}{}:{:0>2}:{:0>2}",
            sign,
            seconds / 3600,
            (seconds % 3600) / 60,
            seconds % 60
        )
    }
}
