//! Daily report timing.
//!
//! The schedule is pure state: it computes fire instants, while the
//! async timer that actually sleeps on them lives with the transport.

use chrono::{DateTime, Duration, LocalResult, NaiveDateTime, NaiveTime, TimeZone};
use chrono_tz::Tz;

/// Where the report timer currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleState {
    /// No fire instant computed yet.
    Idle,
    /// Armed to fire at the contained instant.
    Armed {
        /// The next fire instant.
        at: DateTime<Tz>,
    },
}

/// Computes when the daily report fires.
///
/// Arming picks the next wall-clock `hour:minute` in the configured
/// timezone strictly after `now` - today's occurrence when it is still
/// ahead, otherwise tomorrow's. Every subsequent re-arm adds exactly
/// 24 hours to the previous fire instant, which keeps the cadence fixed
/// instead of drifting with however late the timer actually woke up.
#[derive(Debug, Clone)]
pub struct ReportSchedule {
    hour: u32,
    minute: u32,
    tz: Tz,
    state: ScheduleState,
}

impl ReportSchedule {
    /// Creates an idle schedule firing daily at `hour:minute` in `tz`.
    /// Out-of-range components are clamped to the last valid value.
    #[must_use]
    pub fn new(hour: u32, minute: u32, tz: Tz) -> Self {
        Self {
            hour: hour.min(23),
            minute: minute.min(59),
            tz,
            state: ScheduleState::Idle,
        }
    }

    /// Current timer position.
    #[must_use]
    pub const fn state(&self) -> ScheduleState {
        self.state
    }

    /// Arms the schedule from `now` and returns the first fire instant.
    pub fn arm(&mut self, now: DateTime<Tz>) -> DateTime<Tz> {
        let at = self.next_occurrence(now);
        self.state = ScheduleState::Armed { at };
        at
    }

    /// Moves an armed schedule forward by exactly 24 hours and returns
    /// the new fire instant. An idle schedule arms from `now` instead.
    pub fn rearm(&mut self, now: DateTime<Tz>) -> DateTime<Tz> {
        let at = match self.state {
            ScheduleState::Armed { at } => {
                at.checked_add_signed(Duration::hours(24)).unwrap_or(at)
            }
            ScheduleState::Idle => self.next_occurrence(now),
        };
        self.state = ScheduleState::Armed { at };
        at
    }

    fn next_occurrence(&self, now: DateTime<Tz>) -> DateTime<Tz> {
        let time = NaiveTime::from_hms_opt(self.hour, self.minute, 0).unwrap_or(NaiveTime::MIN);
        let today = now.date_naive();
        let candidate = resolve_local(self.tz, today.and_time(time));
        if candidate > now {
            return candidate;
        }
        let tomorrow = today.succ_opt().unwrap_or(today);
        resolve_local(self.tz, tomorrow.and_time(time))
    }
}

/// Maps a local wall-clock time onto the timeline, stepping over DST
/// gaps and taking the earlier side of ambiguous times.
fn resolve_local(tz: Tz, naive: NaiveDateTime) -> DateTime<Tz> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(at) => at,
        LocalResult::Ambiguous(earlier, _) => earlier,
        LocalResult::None => tz
            .from_local_datetime(&(naive + Duration::hours(1)))
            .earliest()
            .unwrap_or_else(|| tz.from_utc_datetime(&naive)),
    }
}
