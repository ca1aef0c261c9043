use std::{collections::HashMap, sync::RwLock};

use once_cell::sync::Lazy;

static LOGGER_CONFIG: Lazy<RwLock<LoggingConfig>> =
    Lazy::new(|| RwLock::new(LoggingConfig::default()));

#[derive(Copy, Clone, Debug, PartialEq, PartialOrd)]
pub enum LogLevel {
    INFO,
    VERBOSE,
}

/// Prints a line for the component `Self::CC` when it is enabled.
#[macro_export]
macro_rules! logln {
    ($fmt:literal) => {
        if $crate::util::logging::is_enabled(Self::CC) {
            println!("[{}:{}] {}", file!(), line!(), $fmt);
        }
    };
    ($fmt:literal, $($arg:tt)*) => {
        if $crate::util::logging::is_enabled(Self::CC) {
            print!("[{}:{}] ", file!(), line!());
            println!($fmt, $($arg)*);
        }
    };
}

/// Like `logln!` but only at `LogLevel::VERBOSE`.
#[macro_export]
macro_rules! logvbln {
    ($fmt:literal) => {
        if $crate::util::logging::is_verbose(Self::CC) {
            println!("[{}:{}] {}", file!(), line!(), $fmt);
        }
    };
    ($fmt:literal, $($arg:tt)*) => {
        if $crate::util::logging::is_verbose(Self::CC) {
            print!("[{}:{}] ", file!(), line!());
            println!($fmt, $($arg)*);
        }
    };
}

/// Warnings go to stderr and ignore the component flags.
#[macro_export]
macro_rules! logwarn {
    ($fmt:literal) => {
        if $crate::util::logging::is_global_enabled() {
            eprintln!("[{}:{}] WARN {}", file!(), line!(), $fmt);
        }
    };
    ($fmt:literal, $($arg:tt)*) => {
        if $crate::util::logging::is_global_enabled() {
            eprint!("[{}:{}] WARN ", file!(), line!());
            eprintln!($fmt, $($arg)*);
        }
    };
}

fn read<R>(f: impl FnOnce(&LoggingConfig) -> R) -> R {
    match LOGGER_CONFIG.read() {
        Ok(config) => f(&config),
        Err(poisoned) => f(&poisoned.into_inner()),
    }
}

fn write(f: impl FnOnce(&mut LoggingConfig)) {
    match LOGGER_CONFIG.write() {
        Ok(mut config) => f(&mut config),
        Err(poisoned) => f(&mut poisoned.into_inner()),
    }
}

pub fn is_enabled(cc: &'static str) -> bool {
    read(|config| config.cc_enabled(cc))
}

pub fn is_verbose(cc: &'static str) -> bool {
    read(|config| config.cc_enabled(cc) && config.cc_at_level(cc, LogLevel::VERBOSE))
}

pub fn is_global_enabled() -> bool {
    read(|config| config.global_tracing_enabled)
}

pub fn disable_cc(cc: &str) {
    write(|config| config.disable_cc(cc));
}

pub fn enable_cc(cc: &str, level: LogLevel) {
    write(|config| config.enable_cc(cc, level));
}

pub fn set_global_logging(enabled: bool) {
    write(|config| config.global_tracing_enabled = enabled);
}

pub fn set_global_level(level: LogLevel) {
    write(|config| config.global_level = level);
}

pub struct LoggingConfig {
    global_tracing_enabled: bool,
    global_level: LogLevel,
    flags: HashMap<String, (bool, LogLevel)>, // <component, (enabled, level)>
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            global_tracing_enabled: true,
            global_level: LogLevel::INFO,
            flags: Default::default(),
        }
    }
}

impl LoggingConfig {
    pub fn cc_enabled(&self, cc: &str) -> bool {
        if !self.global_tracing_enabled {
            return false;
        }

        self.flags.get(cc).map_or(true, |flag| flag.0)
    }

    pub fn cc_at_level(&self, cc: &str, level: LogLevel) -> bool {
        if self.global_level >= level {
            return true;
        }

        self.flags.get(cc).map_or(false, |flag| flag.1 >= level)
    }

    pub fn enable_cc(&mut self, cc: &str, level: LogLevel) {
        self.flags.insert(cc.to_string(), (true, level));
    }

    pub fn disable_cc(&mut self, cc: &str) {
        self.flags.insert(cc.to_string(), (false, LogLevel::INFO));
    }
}
