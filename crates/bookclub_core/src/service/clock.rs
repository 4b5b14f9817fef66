//! Date/time source for store defaults.

use chrono::Local;

/// Supplies the date and timestamp strings stamped on new entities.
pub trait Clock {
    /// Calendar date, `YYYY-MM-DD`.
    fn today(&self) -> String;
    /// Message timestamp, `YYYY-MM-DD HH:MM:SS`.
    fn timestamp(&self) -> String;
}

/// Local wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> String {
        Local::now().format("%Y-%m-%d").to_string()
    }

    fn timestamp(&self) -> String {
        Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

/// Clock frozen at one instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedClock {
    today: String,
    timestamp: String,
}

impl FixedClock {
    pub fn new(today: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            today: today.into(),
            timestamp: timestamp.into(),
        }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> String {
        self.today.clone()
    }

    fn timestamp(&self) -> String {
        self.timestamp.clone()
    }
}
