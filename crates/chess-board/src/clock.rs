//! Chess clocks.
//!
//! Time is counted in whole seconds read from a [`TimeSource`]. A clock never
//! reads the time itself, which keeps every transition deterministic under
//! test.

use crate::TimeControl;
use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// Monotonic time in whole seconds.
pub trait TimeSource {
    fn now(&self) -> u64;
}

/// Seconds elapsed since the source was created.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicTime {
    origin: Instant,
}

impl MonotonicTime {
    pub fn new() -> Self {
        MonotonicTime {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicTime {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for MonotonicTime {
    fn now(&self) -> u64 {
        self.origin.elapsed().as_secs()
    }
}

/// Hand-driven time. Clones share the same counter, so a test can keep one
/// handle while a session owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualTime(Rc<Cell<u64>>);

impl ManualTime {
    pub fn new(start: u64) -> Self {
        ManualTime(Rc::new(Cell::new(start)))
    }

    pub fn advance(&self, secs: u64) {
        self.0.set(self.0.get() + secs);
    }

    pub fn set(&self, now: u64) {
        self.0.set(now);
    }
}

impl TimeSource for ManualTime {
    fn now(&self) -> u64 {
        self.0.get()
    }
}

/// One side's countdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clock {
    remaining: i64,
    displayed: i64,
    running_since: Option<u64>,
    increment: i64,
    timed_out: bool,
}

impl Clock {
    pub fn new(initial_secs: i64, increment_secs: i64) -> Self {
        Clock {
            remaining: initial_secs,
            displayed: initial_secs,
            running_since: None,
            increment: increment_secs,
            timed_out: false,
        }
    }

    /// Starts counting down. No-op while running or after a timeout.
    pub fn start(&mut self, now: u64) {
        if self.running_since.is_none() && !self.timed_out {
            self.running_since = Some(now);
        }
    }

    /// Stops the clock and settles the time used.
    ///
    /// A move faster than the increment banks the unused part of it; a slower
    /// one is charged in full, which can leave the clock below zero; the next
    /// update then reports the timeout.
    pub fn stop(&mut self, now: u64) {
        let Some(since) = self.running_since.take() else {
            return;
        };
        let elapsed = now.saturating_sub(since) as i64;
        if elapsed < self.increment {
            self.remaining += self.increment - elapsed;
        } else {
            self.remaining -= elapsed;
        }
        self.displayed = self.remaining;
    }

    /// Recomputes the displayed time. Returns true exactly once, on the update
    /// that finds the clock out of time.
    pub fn update(&mut self, now: u64) -> bool {
        let Some(since) = self.running_since else {
            return false;
        };
        let left = self.remaining - now.saturating_sub(since) as i64;
        if left < 0 {
            self.remaining = 0;
            self.displayed = 0;
            self.running_since = None;
            self.timed_out = true;
            return true;
        }
        self.displayed = left;
        false
    }

    /// Seconds shown on the clock face as of the last update.
    pub fn displayed(&self) -> i64 {
        self.displayed
    }

    /// Seconds banked while stopped, not counting a running turn.
    pub fn remaining(&self) -> i64 {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.running_since.is_some()
    }

    pub fn is_timed_out(&self) -> bool {
        self.timed_out
    }
}

/// Which of the two clocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClockSide {
    Local,
    Opponent,
}

/// The local player's and the opponent's clocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockPair {
    local: Clock,
    opponent: Clock,
}

impl ClockPair {
    pub fn new(control: TimeControl) -> Self {
        let initial = control.initial_seconds();
        let increment = i64::from(control.increment_secs);
        ClockPair {
            local: Clock::new(initial, increment),
            opponent: Clock::new(initial, increment),
        }
    }

    pub fn local(&self) -> &Clock {
        &self.local
    }

    pub fn opponent(&self) -> &Clock {
        &self.opponent
    }

    pub fn get(&self, side: ClockSide) -> &Clock {
        match side {
            ClockSide::Local => &self.local,
            ClockSide::Opponent => &self.opponent,
        }
    }

    /// Stops the clock of the side that just moved and starts the other.
    pub fn handoff(&mut self, local_to_move: bool, now: u64) {
        let (stopping, starting) = if local_to_move {
            (&mut self.opponent, &mut self.local)
        } else {
            (&mut self.local, &mut self.opponent)
        };
        stopping.stop(now);
        starting.start(now);
    }

    /// Updates both clocks and reports the one that ran out, if any.
    pub fn tick(&mut self, now: u64) -> Option<ClockSide> {
        let local_out = self.local.update(now);
        let opponent_out = self.opponent.update(now);
        if local_out {
            Some(ClockSide::Local)
        } else if opponent_out {
            Some(ClockSide::Opponent)
        } else {
            None
        }
    }

    pub fn stop_all(&mut self, now: u64) {
        self.local.stop(now);
        self.opponent.stop(now);
    }

    pub fn running(&self) -> usize {
        [&self.local, &self.opponent]
            .into_iter()
            .filter(|clock| clock.is_running())
            .count()
    }
}

/// Formats seconds as `mm:ss`. Negative values show as zero.
pub fn format_clock(seconds: i64) -> String {
    let seconds = seconds.max(0);
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slow_move_is_charged_in_full() {
        let mut clock = Clock::new(300, 3);
        clock.start(10);
        assert!(clock.is_running());
        clock.stop(25);
        assert!(!clock.is_running());
        assert_eq!(clock.remaining(), 285);
        assert_eq!(clock.displayed(), 285);
    }

    #[test]
    fn fast_move_banks_unused_increment() {
        let mut clock = Clock::new(300, 5);
        clock.start(0);
        clock.stop(2);
        assert_eq!(clock.remaining(), 303);
    }

    #[test]
    fn start_and_stop_are_idempotent() {
        let mut clock = Clock::new(60, 0);
        clock.stop(5);
        assert_eq!(clock.remaining(), 60);
        clock.start(0);
        clock.start(10);
        clock.stop(20);
        assert_eq!(clock.remaining(), 40);
    }

    #[test]
    fn update_signals_timeout_once() {
        let mut clock = Clock::new(10, 0);
        clock.start(0);
        assert!(!clock.update(4));
        assert_eq!(clock.displayed(), 6);
        assert!(!clock.update(10));
        assert_eq!(clock.displayed(), 0);
        assert!(clock.update(11));
        assert!(clock.is_timed_out());
        assert!(!clock.is_running());
        assert!(!clock.update(12));
        clock.start(13);
        assert!(!clock.is_running());
    }

    #[test]
    fn overrun_carries_into_next_turn() {
        let mut clock = Clock::new(10, 0);
        clock.start(0);
        clock.stop(15);
        assert_eq!(clock.remaining(), -5);
        assert_eq!(format_clock(clock.displayed()), "00:00");

        clock.start(15);
        assert!(clock.update(15));
        assert!(clock.is_timed_out());
        assert_eq!(clock.remaining(), 0);
    }

    #[test]
    fn handoff_runs_one_clock() {
        let control = TimeControl::preset("1+0").unwrap();
        let mut clocks = ClockPair::new(control);
        assert_eq!(clocks.running(), 0);

        clocks.handoff(false, 0);
        assert!(clocks.opponent().is_running());
        assert_eq!(clocks.running(), 1);

        clocks.handoff(true, 7);
        assert!(clocks.local().is_running());
        assert_eq!(clocks.running(), 1);
        assert_eq!(clocks.opponent().remaining(), 53);

        clocks.stop_all(9);
        assert_eq!(clocks.running(), 0);
        assert_eq!(clocks.get(ClockSide::Local).remaining(), 58);
    }

    #[test]
    fn tick_reports_flag_fall() {
        let control = TimeControl::preset("1+0").unwrap();
        let mut clocks = ClockPair::new(control);
        clocks.handoff(true, 0);
        assert_eq!(clocks.tick(60), None);
        assert_eq!(clocks.tick(61), Some(ClockSide::Local));
        assert_eq!(clocks.tick(62), None);
    }

    #[test]
    fn manual_time_is_shared() {
        let time = ManualTime::new(5);
        let handle = time.clone();
        handle.advance(3);
        assert_eq!(time.now(), 8);
        handle.set(1);
        assert_eq!(time.now(), 1);
    }

    #[test]
    fn monotonic_time_starts_at_zero() {
        assert_eq!(MonotonicTime::new().now(), 0);
    }

    #[test]
    fn formats_minutes_and_seconds() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(65), "01:05");
        assert_eq!(format_clock(1800), "30:00");
        assert_eq!(format_clock(-4), "00:00");
    }
}
