use std::{fmt::Display, time::Instant};

use crate::logln;

/// Prints how long it lived when dropped.
pub struct Benchmark {
    time: Instant,
    label: &'static str,
}

impl Benchmark {
    pub fn start(label: &'static str) -> Self {
        Self {
            label,
            time: Instant::now(),
        }
    }
}

impl Benchmark {
    const CC: &str = "Benchmark";
}

impl Drop for Benchmark {
    fn drop(&mut self) {
        logln!("{}: {}", self.label, self);
    }
}

impl Display for Benchmark {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let duration = self.time.elapsed();

        if duration.as_secs() > 60 {
            write!(f, "{:0>2}:{:0>2}min", duration.as_secs() / 60, duration.as_secs() % 60)
        } else {
            write!(f, "{}ms", duration.as_millis())
        }
    }
}
