//! Wall clock shown in the dashboard header.
//!
//! Independent of the refresh loop: it ticks every second whatever the data
//! sources are doing, and subscribers only ever see the latest reading.

use std::time::Duration;

use chrono::{DateTime, Local, TimeZone};
use serde::Serialize;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

/// Time and date strings as displayed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClockReading {
    /// `HH.MM.SS`
    pub time: String,
    /// `D.M.YYYY` without zero padding.
    pub date: String,
}

impl ClockReading {
    #[must_use]
    pub fn at<Tz>(moment: &DateTime<Tz>) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        Self {
            time: moment.format("%H.%M.%S").to_string(),
            date: moment.format("%-d.%-m.%Y").to_string(),
        }
    }

    #[must_use]
    pub fn now() -> Self {
        Self::at(&Local::now())
    }
}

/// Publishes a fresh [`ClockReading`] every second.
pub struct Clock {
    sender: watch::Sender<ClockReading>,
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock {
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = watch::channel(ClockReading::now());
        Self { sender }
    }

    pub fn subscribe(&self) -> watch::Receiver<ClockReading> {
        self.sender.subscribe()
    }

    #[must_use]
    pub fn latest(&self) -> ClockReading {
        self.sender.borrow().clone()
    }

    /// Publish `reading`, replacing the previous one even without subscribers.
    pub fn tick(&self, reading: ClockReading) {
        self.sender.send_replace(reading);
    }

    /// Tick once a second, forever.
    pub async fn run(&self) {
        let mut ticker = tokio::time::interval(Duration::from_secs(1));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            self.tick(ClockReading::now());
        }
    }
}
