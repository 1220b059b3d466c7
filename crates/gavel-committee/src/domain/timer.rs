//! Countdown timers shared by every client.
//!
//! A timer is never stored as a ticking counter. The store holds the
//! remaining time as of the last transition, whether it is running, and when
//! that transition happened; every reader projects the live value from its
//! own clock.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use gavel_core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Phase of a timer at a given instant. Derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerPhase {
    /// Full configured duration remaining, not running.
    Idle,
    /// Counting down.
    Running,
    /// Frozen part way through.
    Paused,
    /// Nothing remaining.
    Expired,
}

impl fmt::Display for TimerPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Paused => "paused",
            Self::Expired => "expired",
        };
        f.write_str(name)
    }
}

/// Which of a caucus's two timers a command addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerKind {
    /// The timer for the caucus as a whole.
    Caucus,
    /// The per-speaker timer.
    Speaker,
}

impl TimerKind {
    /// Field name of this timer inside a caucus.
    #[must_use]
    pub fn field(self) -> &'static str {
        match self {
            Self::Caucus => "caucusTimer",
            Self::Speaker => "speakerTimer",
        }
    }
}

/// Stored timer state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Timer {
    /// Configured duration restored by `reset`.
    pub duration_ms: u64,
    /// Remaining time as of `changed_at`.
    pub remaining_ms: u64,
    /// Whether the countdown is running.
    pub running: bool,
    /// When the timer last changed state.
    pub changed_at: Option<DateTime<Utc>>,
}

/// Read-only projection of a timer at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimerView {
    /// Configured duration in milliseconds.
    pub duration_ms: u64,
    /// Remaining time in milliseconds.
    pub remaining_ms: u64,
    /// Whether the countdown is running. Always false once expired.
    pub running: bool,
    /// Current phase.
    pub phase: TimerPhase,
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

fn elapsed_ms(from: DateTime<Utc>, to: DateTime<Utc>) -> u64 {
    // Clock skew between clients can put `to` before `from`; that counts
    // as no time passed.
    u64::try_from((to - from).num_milliseconds()).unwrap_or(0)
}

impl Timer {
    /// An idle timer with `duration` on the clock.
    #[must_use]
    pub fn idle(duration: Duration, now: DateTime<Utc>) -> Self {
        let duration_ms = millis(duration);
        Self {
            duration_ms,
            remaining_ms: duration_ms,
            running: false,
            changed_at: Some(now),
        }
    }

    /// Remaining time at `now`, clamped at zero.
    #[must_use]
    pub fn remaining_at(&self, now: DateTime<Utc>) -> u64 {
        match (self.running, self.changed_at) {
            (true, Some(changed_at)) => self
                .remaining_ms
                .saturating_sub(elapsed_ms(changed_at, now)),
            _ => self.remaining_ms,
        }
    }

    /// Phase at `now`.
    #[must_use]
    pub fn phase_at(&self, now: DateTime<Utc>) -> TimerPhase {
        if self.remaining_at(now) == 0 {
            TimerPhase::Expired
        } else if self.running {
            TimerPhase::Running
        } else if self.remaining_ms >= self.duration_ms {
            TimerPhase::Idle
        } else {
            TimerPhase::Paused
        }
    }

    /// Projection at `now` for display.
    #[must_use]
    pub fn view_at(&self, now: DateTime<Utc>) -> TimerView {
        let phase = self.phase_at(now);
        TimerView {
            duration_ms: self.duration_ms,
            remaining_ms: self.remaining_at(now),
            running: phase == TimerPhase::Running,
            phase,
        }
    }

    /// Whether `start` would be accepted at `now`. Lets a UI disable the
    /// control instead of issuing a rejected command.
    #[must_use]
    pub fn can_start(&self, now: DateTime<Utc>) -> bool {
        matches!(self.phase_at(now), TimerPhase::Idle | TimerPhase::Paused)
    }

    /// Idle or Paused → Running.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTransition` when the timer is already
    /// running or has expired (expired timers need a `reset` first).
    pub fn start(&self, now: DateTime<Utc>) -> Result<Self, DomainError> {
        let phase = self.phase_at(now);
        if !matches!(phase, TimerPhase::Idle | TimerPhase::Paused) {
            return Err(invalid("start", phase));
        }
        Ok(Self {
            running: true,
            changed_at: Some(now),
            ..self.clone()
        })
    }

    /// Running → Paused, freezing the projected remaining time.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTransition` unless the timer is running.
    pub fn pause(&self, now: DateTime<Utc>) -> Result<Self, DomainError> {
        let phase = self.phase_at(now);
        if phase != TimerPhase::Running {
            return Err(invalid("pause", phase));
        }
        Ok(self.settle(now).halted(now))
    }

    /// Advances a running timer by `elapsed`, clamping at zero. The
    /// last-change timestamp moves forward by the time actually consumed,
    /// so the projection at any later instant is unchanged. No-op when
    /// stopped.
    #[must_use]
    pub fn tick(&self, elapsed: Duration) -> Self {
        if !self.running {
            return self.clone();
        }
        let consumed = millis(elapsed).min(self.remaining_ms);
        let remaining_ms = self.remaining_ms - consumed;
        let changed_at = self.changed_at.map(|at| {
            i64::try_from(consumed)
                .ok()
                .and_then(|ms| at.checked_add_signed(chrono::Duration::milliseconds(ms)))
                .unwrap_or(at)
        });
        Self {
            remaining_ms,
            running: remaining_ms > 0,
            changed_at,
            ..self.clone()
        }
    }

    /// Materializes the projection at `now`. An expired timer comes back
    /// stopped with zero remaining.
    #[must_use]
    pub fn settle(&self, now: DateTime<Utc>) -> Self {
        match (self.running, self.changed_at) {
            (true, Some(changed_at)) => {
                let remaining_ms = self.remaining_at(now);
                Self {
                    remaining_ms,
                    running: remaining_ms > 0,
                    changed_at: Some(if remaining_ms > 0 { now } else { changed_at }),
                    ..self.clone()
                }
            }
            _ => self.clone(),
        }
    }

    /// Any phase → Idle with `duration` configured and remaining.
    #[must_use]
    pub fn reset(&self, duration: Duration, now: DateTime<Utc>) -> Self {
        Self::idle(duration, now)
    }

    fn halted(self, now: DateTime<Utc>) -> Self {
        Self {
            running: false,
            changed_at: Some(now),
            ..self
        }
    }
}

fn invalid(action: &'static str, phase: TimerPhase) -> DomainError {
    DomainError::InvalidTransition {
        action,
        phase: phase.to_string(),
    }
}
