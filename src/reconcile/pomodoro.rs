//! Pomodoro countdown state machine.
//!
//! A running countdown ticks once per second and alternates between
//! `Session` and `Break` modes. Session and break lengths are adjusted
//! independently, clamped to [1, 60] minutes, and rejected while the
//! timer runs. A session→break transition produces a [`FocusSession`]
//! whose duration is the session length in effect at completion time;
//! a break→session transition produces none. Every expiry raises the
//! chime flag for the caller's audible notification.
//!
//! The machine is clock-free: callers feed it whole elapsed seconds.

use chrono::{DateTime, Utc};

use crate::models::FocusSession;
use crate::time_utils::{day_key, format_utc_rfc3339};

const MIN_MINUTES: u32 = 1;
const MAX_MINUTES: u32 = 60;

/// Countdown mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Session,
    Break,
}

/// One countdown expiry.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    /// Audible notification plays on every expiry.
    pub chime: bool,
    /// Present only on session→break transitions.
    pub completed: Option<FocusSession>,
}

/// Per-user pomodoro timer.
#[derive(Debug, Clone)]
pub struct Pomodoro {
    mode: Mode,
    remaining_secs: u32,
    running: bool,
    session_minutes: u32,
    break_minutes: u32,
    sessions_completed: u32,
}

impl Pomodoro {
    /// New idle timer in session mode.
    pub fn new(session_minutes: u32, break_minutes: u32) -> Self {
        let session_minutes = session_minutes.clamp(MIN_MINUTES, MAX_MINUTES);
        let break_minutes = break_minutes.clamp(MIN_MINUTES, MAX_MINUTES);
        Self {
            mode: Mode::Session,
            remaining_secs: session_minutes * 60,
            running: false,
            session_minutes,
            break_minutes,
            sessions_completed: 0,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn session_minutes(&self) -> u32 {
        self.session_minutes
    }

    pub fn break_minutes(&self) -> u32 {
        self.break_minutes
    }

    /// Sessions completed since this timer was created.
    pub fn sessions_completed(&self) -> u32 {
        self.sessions_completed
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn pause(&mut self) {
        self.running = false;
    }

    /// Stop and rewind to a fresh session interval.
    pub fn reset(&mut self) {
        self.running = false;
        self.mode = Mode::Session;
        self.remaining_secs = self.session_minutes * 60;
    }

    /// Adjust the session length by `delta` minutes.
    ///
    /// Rejected while running; clamped to [1, 60]. When the timer sits
    /// idle in session mode the remaining time follows the new length.
    pub fn adjust_session(&mut self, delta: i32) -> Option<u32> {
        if self.running {
            return None;
        }
        self.session_minutes = clamp_minutes(self.session_minutes, delta);
        if self.mode == Mode::Session {
            self.remaining_secs = self.session_minutes * 60;
        }
        Some(self.session_minutes)
    }

    /// Adjust the break length by `delta` minutes. Same rules.
    pub fn adjust_break(&mut self, delta: i32) -> Option<u32> {
        if self.running {
            return None;
        }
        self.break_minutes = clamp_minutes(self.break_minutes, delta);
        if self.mode == Mode::Break {
            self.remaining_secs = self.break_minutes * 60;
        }
        Some(self.break_minutes)
    }

    /// One second elapses. Returns the transition when the countdown
    /// expires, `None` otherwise. No-op while paused.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Option<Transition> {
        if !self.running {
            return None;
        }
        if self.remaining_secs > 1 {
            self.remaining_secs -= 1;
            return None;
        }

        Some(match self.mode {
            Mode::Session => {
                self.sessions_completed += 1;
                self.mode = Mode::Break;
                self.remaining_secs = self.break_minutes * 60;
                Transition {
                    chime: true,
                    completed: Some(FocusSession {
                        date: day_key(now),
                        duration: self.session_minutes,
                        completed_at: format_utc_rfc3339(now),
                    }),
                }
            }
            Mode::Break => {
                self.mode = Mode::Session;
                self.remaining_secs = self.session_minutes * 60;
                Transition {
                    chime: true,
                    completed: None,
                }
            }
        })
    }

    /// Catch up on `elapsed_secs` whole seconds, collecting every
    /// transition that fired along the way.
    pub fn advance(&mut self, elapsed_secs: u64, now: DateTime<Utc>) -> Vec<Transition> {
        let mut transitions = Vec::new();
        if !self.running {
            return transitions;
        }
        for _ in 0..elapsed_secs {
            if let Some(t) = self.tick(now) {
                transitions.push(t);
            }
        }
        transitions
    }
}

fn clamp_minutes(current: u32, delta: i32) -> u32 {
    (current as i32 + delta).clamp(MIN_MINUTES as i32, MAX_MINUTES as i32) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_session_appends_exactly_one_record() {
        let mut timer = Pomodoro::new(25, 5);
        timer.start();
        let now = Utc::now();

        let transitions = timer.advance(25 * 60, now);

        let records: Vec<_> = transitions.iter().filter_map(|t| t.completed.clone()).collect();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].duration, 25);
        assert!(transitions.iter().all(|t| t.chime));
        assert_eq!(timer.mode(), Mode::Break);
        assert_eq!(timer.remaining_secs(), 5 * 60);
        assert_eq!(timer.sessions_completed(), 1);
    }

    #[test]
    fn test_break_expiry_appends_nothing() {
        let mut timer = Pomodoro::new(25, 5);
        timer.start();
        let now = Utc::now();
        timer.advance(25 * 60, now); // into break

        let transitions = timer.advance(5 * 60, now);

        assert_eq!(transitions.len(), 1);
        assert!(transitions[0].chime);
        assert!(transitions[0].completed.is_none());
        assert_eq!(timer.mode(), Mode::Session);
        assert_eq!(timer.sessions_completed(), 1);
    }

    #[test]
    fn test_adjust_rejected_while_running() {
        let mut timer = Pomodoro::new(25, 5);
        timer.start();

        assert_eq!(timer.adjust_session(5), None);
        assert_eq!(timer.adjust_break(-1), None);
        assert_eq!(timer.session_minutes(), 25);
    }

    #[test]
    fn test_adjust_clamps_to_valid_range() {
        let mut timer = Pomodoro::new(25, 5);

        assert_eq!(timer.adjust_session(100), Some(60));
        assert_eq!(timer.adjust_session(-100), Some(1));
        assert_eq!(timer.adjust_break(-10), Some(1));
        assert_eq!(timer.remaining_secs(), 60); // idle session follows new length
    }

    #[test]
    fn test_duration_reflects_length_at_completion_time() {
        let mut timer = Pomodoro::new(25, 5);
        timer.start();
        let now = Utc::now();
        timer.advance(10 * 60, now);

        // Pause mid-session, stretch the session, resume
        timer.pause();
        timer.adjust_session(5); // 30 minutes, remaining rewinds to 30:00
        timer.start();
        let transitions = timer.advance(30 * 60, now);

        let record = transitions
            .iter()
            .find_map(|t| t.completed.clone())
            .expect("session completed");
        assert_eq!(record.duration, 30);
    }

    #[test]
    fn test_paused_timer_does_not_tick() {
        let mut timer = Pomodoro::new(1, 1);
        assert!(timer.advance(600, Utc::now()).is_empty());
        assert_eq!(timer.remaining_secs(), 60);
    }

    #[test]
    fn test_reset_rewinds_to_session() {
        let mut timer = Pomodoro::new(1, 1);
        timer.start();
        timer.advance(60, Utc::now()); // into break
        timer.reset();

        assert!(!timer.is_running());
        assert_eq!(timer.mode(), Mode::Session);
        assert_eq!(timer.remaining_secs(), 60);
    }

    #[test]
    fn test_long_absence_rolls_through_whole_cycles() {
        let mut timer = Pomodoro::new(1, 1);
        timer.start();
        let now = Utc::now();

        // Two full session+break cycles
        let transitions = timer.advance(4 * 60, now);

        let completions = transitions.iter().filter(|t| t.completed.is_some()).count();
        assert_eq!(completions, 2);
        assert_eq!(timer.sessions_completed(), 2);
    }
}
