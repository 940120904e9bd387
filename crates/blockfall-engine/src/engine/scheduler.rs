use std::time::Duration;

/// Periodic timer that fires every `period` of fed time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalTimer {
    period: Duration,
    elapsed: Duration,
}

impl IntervalTimer {
    /// Starts a timer whose first firing is one full `period` away.
    #[must_use]
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            elapsed: Duration::ZERO,
        }
    }

    #[must_use]
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Time left until the next firing.
    #[must_use]
    pub fn remaining(&self) -> Duration {
        self.period.saturating_sub(self.elapsed)
    }
}

/// What fell due when the scheduler was advanced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum Due {
    /// The drop timer fired.
    Tick,
    /// The line-clear delay ran out.
    ClearComplete,
}

/// Timekeeping for the engine's two deferred actions: the periodic drop tick
/// and the one-shot line-clear completion.
///
/// Nothing here reads a clock. The owner feeds elapsed time through
/// [`Self::next_due`], which hands back due events one at a time in the
/// order they fall due, so a long frame replays every tick it covers.
///
/// Changing the drop speed means calling [`Self::restart_drop_timer`], which
/// replaces the timer outright: the next tick is one full new period away,
/// no matter how far the previous period had progressed.
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    drop_timer: Option<IntervalTimer>,
    clear_remaining: Option<Duration>,
}

impl Scheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn drop_timer(&self) -> Option<&IntervalTimer> {
        self.drop_timer.as_ref()
    }

    #[must_use]
    pub fn is_clear_pending(&self) -> bool {
        self.clear_remaining.is_some()
    }

    /// Cancels the drop timer and schedules a new one with `period`.
    ///
    /// # Panics
    ///
    /// Panics if `period` is zero.
    pub fn restart_drop_timer(&mut self, period: Duration) {
        assert!(!period.is_zero(), "drop period must be positive");
        self.drop_timer = Some(IntervalTimer::new(period));
    }

    pub fn stop_drop_timer(&mut self) {
        self.drop_timer = None;
    }

    /// Arms the line-clear completion to fall due after `delay`.
    pub fn schedule_clear(&mut self, delay: Duration) {
        self.clear_remaining = Some(delay);
    }

    /// Drops everything that is scheduled.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Consumes time from `budget` up to the earliest due event and returns it.
    ///
    /// Returns `None` once nothing more falls due within `budget`; the
    /// remaining budget is then spent on all pending timers and set to zero.
    /// When the clear completion and a tick fall due at the same instant the
    /// clear completion is returned first.
    pub fn next_due(&mut self, budget: &mut Duration) -> Option<Due> {
        let until_tick = self.drop_timer.map(|timer| timer.remaining());
        let until_clear = self.clear_remaining;
        let step = match (until_tick, until_clear) {
            (Some(tick), Some(clear)) => tick.min(clear),
            (Some(tick), None) => tick,
            (None, Some(clear)) => clear,
            (None, None) => {
                *budget = Duration::ZERO;
                return None;
            }
        };

        if step > *budget {
            self.consume(*budget);
            *budget = Duration::ZERO;
            return None;
        }

        self.consume(step);
        *budget -= step;

        if self.clear_remaining.is_some_and(|d| d.is_zero()) {
            self.clear_remaining = None;
            return Some(Due::ClearComplete);
        }
        if let Some(timer) = &mut self.drop_timer
            && timer.remaining().is_zero()
        {
            timer.elapsed = Duration::ZERO;
            return Some(Due::Tick);
        }
        None
    }

    fn consume(&mut self, time: Duration) {
        if let Some(timer) = &mut self.drop_timer {
            timer.elapsed += time;
        }
        if let Some(remaining) = &mut self.clear_remaining {
            *remaining = remaining.saturating_sub(time);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn drain(scheduler: &mut Scheduler, elapsed: Duration) -> Vec<Due> {
        let mut budget = elapsed;
        let mut due = Vec::new();
        while let Some(d) = scheduler.next_due(&mut budget) {
            due.push(d);
        }
        assert!(budget.is_zero());
        due
    }

    #[test]
    fn test_idle_scheduler_yields_nothing() {
        let mut scheduler = Scheduler::new();
        assert!(drain(&mut scheduler, ms(10_000)).is_empty());
    }

    #[test]
    fn test_ticks_fire_every_period() {
        let mut scheduler = Scheduler::new();
        scheduler.restart_drop_timer(ms(500));

        assert!(drain(&mut scheduler, ms(499)).is_empty());
        assert_eq!(drain(&mut scheduler, ms(1)), [Due::Tick]);
        assert_eq!(drain(&mut scheduler, ms(1_250)), [Due::Tick, Due::Tick]);
        assert_eq!(scheduler.drop_timer().unwrap().remaining(), ms(250));
    }

    #[test]
    fn test_restart_resets_phase() {
        let mut scheduler = Scheduler::new();
        scheduler.restart_drop_timer(ms(500));
        assert!(drain(&mut scheduler, ms(400)).is_empty());

        scheduler.restart_drop_timer(ms(60));
        assert!(drain(&mut scheduler, ms(59)).is_empty());
        assert_eq!(drain(&mut scheduler, ms(1)), [Due::Tick]);
        assert_eq!(scheduler.drop_timer().unwrap().period(), ms(60));
    }

    #[test]
    fn test_stopped_timer_never_fires() {
        let mut scheduler = Scheduler::new();
        scheduler.restart_drop_timer(ms(60));
        scheduler.stop_drop_timer();
        assert!(drain(&mut scheduler, ms(1_000)).is_empty());
    }

    #[test]
    fn test_clear_fires_once_between_ticks() {
        let mut scheduler = Scheduler::new();
        scheduler.restart_drop_timer(ms(100));
        assert!(drain(&mut scheduler, ms(50)).is_empty());
        scheduler.schedule_clear(ms(300));
        assert!(scheduler.is_clear_pending());

        let due = drain(&mut scheduler, ms(400));
        assert_eq!(
            due,
            [
                Due::Tick,
                Due::Tick,
                Due::Tick,
                Due::ClearComplete,
                Due::Tick
            ]
        );
        assert!(!scheduler.is_clear_pending());
    }

    #[test]
    fn test_clear_wins_a_tie() {
        let mut scheduler = Scheduler::new();
        scheduler.restart_drop_timer(ms(300));
        scheduler.schedule_clear(ms(300));
        assert_eq!(
            drain(&mut scheduler, ms(300)),
            [Due::ClearComplete, Due::Tick]
        );
    }

    #[test]
    fn test_reset_drops_everything() {
        let mut scheduler = Scheduler::new();
        scheduler.restart_drop_timer(ms(100));
        scheduler.schedule_clear(ms(300));
        scheduler.reset();
        assert!(scheduler.drop_timer().is_none());
        assert!(!scheduler.is_clear_pending());
        assert!(drain(&mut scheduler, ms(1_000)).is_empty());
    }
}
