//! Progress tick source, active only while a track is playing.

use std::future::pending;

use tokio::time::{Duration, Interval, MissedTickBehavior, interval};

/// Fixed-period tick gate for the control loop's time reporting.
///
/// While suspended, [`ProgressClock::tick`] never resolves, so the select
/// branch it feeds is effectively cancelled; resuming resets the period so a
/// tick held over from an earlier playing window cannot fire late into a
/// new one.
pub(crate) struct ProgressClock {
    interval: Interval,
    running: bool,
}

impl ProgressClock {
    pub(crate) fn new(period: Duration) -> Self {
        let mut interval = interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Self {
            interval,
            running: false,
        }
    }

    /// Starts or suspends ticking. A full period elapses before the first
    /// tick after a resume.
    pub(crate) fn set_running(&mut self, running: bool) {
        if running && !self.running {
            self.interval.reset();
        }
        self.running = running;
    }

    /// Resolves on the next tick, or never while suspended.
    pub(crate) async fn tick(&mut self) {
        if self.running {
            self.interval.tick().await;
        } else {
            pending::<()>().await;
        }
    }
}
