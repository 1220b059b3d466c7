//! Caucuses: the speaker queue and the two timers.
//!
//! Every operation here is a pure reducer. It takes the current caucus and
//! returns the caucus it would become together with the [`ChangeSet`] that
//! gets the store there. Paths in the change set are relative to the caucus;
//! the command handler re-roots them and pins every watched path to the
//! value it read, so a concurrent edit to the same fields is detected
//! instead of overwritten.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use gavel_core::change::ChangeSet;
use gavel_core::error::DomainError;
use gavel_core::path::StorePath;
use serde::{Deserialize, Serialize};

use super::layout::encode;
use super::lenient;
use super::timer::{Timer, TimerKind, TimerView};

const SPEAKING: &str = "speaking";
const QUEUE: &str = "queue";
const HISTORY: &str = "history";

/// Someone took the floor, appended to a caucus history when they yield it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeakerEvent {
    /// Name of the member who spoke.
    pub who: String,
    /// When they yielded the floor.
    pub at: Option<DateTime<Utc>>,
}

/// A caucus as stored under `caucuses/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Caucus {
    /// Display name, e.g. the topic of a moderated caucus.
    pub name: String,
    /// Countdown for the caucus as a whole.
    pub caucus_timer: Timer,
    /// Countdown for the current speaker.
    pub speaker_timer: Timer,
    /// Member holding the floor, if any.
    #[serde(
        deserialize_with = "lenient::optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub speaking: Option<String>,
    /// Members waiting for the floor, head first.
    #[serde(deserialize_with = "lenient::list")]
    pub queue: Vec<String>,
    /// Past speakers keyed by push key. Append-only.
    #[serde(deserialize_with = "lenient::children")]
    pub history: BTreeMap<String, SpeakerEvent>,
}

/// Outcome of a caucus reducer.
#[derive(Debug, Clone, PartialEq)]
pub struct CaucusUpdate {
    /// The caucus after the change.
    pub caucus: Caucus,
    /// What to apply to the store, relative to the caucus path. Empty for a
    /// no-op.
    pub changes: ChangeSet,
}

impl CaucusUpdate {
    fn unchanged(caucus: &Caucus) -> Self {
        Self {
            caucus: caucus.clone(),
            changes: ChangeSet::new(),
        }
    }
}

/// Read-only projection of a caucus at one instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaucusView {
    /// Display name.
    pub name: String,
    /// Caucus timer at the projection instant.
    pub caucus_timer: TimerView,
    /// Speaker timer at the projection instant.
    pub speaker_timer: TimerView,
    /// Member holding the floor.
    pub speaking: Option<String>,
    /// Members waiting, head first.
    pub queue: Vec<String>,
    /// Past speakers, oldest first.
    pub history: Vec<SpeakerEvent>,
}

fn field(name: &str) -> StorePath {
    StorePath::root().child(name)
}

fn is_blank(name: &str) -> bool {
    name.trim().is_empty()
}

impl Caucus {
    /// A fresh caucus with both timers idle.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        caucus_duration: Duration,
        speaker_duration: Duration,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            name: name.into(),
            caucus_timer: Timer::idle(caucus_duration, now),
            speaker_timer: Timer::idle(speaker_duration, now),
            ..Self::default()
        }
    }

    /// The timer of the given kind.
    #[must_use]
    pub fn timer(&self, kind: TimerKind) -> &Timer {
        match kind {
            TimerKind::Caucus => &self.caucus_timer,
            TimerKind::Speaker => &self.speaker_timer,
        }
    }

    fn timer_mut(&mut self, kind: TimerKind) -> &mut Timer {
        match kind {
            TimerKind::Caucus => &mut self.caucus_timer,
            TimerKind::Speaker => &mut self.speaker_timer,
        }
    }

    /// Whether `name` is speaking or waiting.
    #[must_use]
    pub fn has_speaker(&self, name: &str) -> bool {
        self.speaking.as_deref() == Some(name) || self.queue.iter().any(|queued| queued == name)
    }

    /// Appends `name` to the queue. No-op for a blank name or someone who is
    /// already speaking or queued.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the new queue cannot be
    /// encoded.
    pub fn enqueue(&self, name: &str) -> Result<CaucusUpdate, DomainError> {
        if is_blank(name) || self.has_speaker(name) {
            return Ok(CaucusUpdate::unchanged(self));
        }

        let mut next = self.clone();
        next.queue.push(name.to_owned());
        let changes = ChangeSet::new()
            .expect_unchanged(field(SPEAKING))
            .expect_unchanged(field(QUEUE))
            .set(field(QUEUE), encode(&next.queue)?);
        Ok(CaucusUpdate {
            caucus: next,
            changes,
        })
    }

    /// Hands the floor to the head of the queue.
    ///
    /// The current speaker, if any, is recorded in the history under
    /// `history_key`. The speaker timer is reset to its configured duration
    /// and started for the new speaker; when the queue is empty the floor is
    /// left empty and the timer stays idle. The caucus timer is untouched.
    /// No-op when nobody is speaking or waiting.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if a value cannot be encoded.
    pub fn pop_speaker(
        &self,
        now: DateTime<Utc>,
        history_key: &str,
    ) -> Result<CaucusUpdate, DomainError> {
        if self.speaking.is_none() && self.queue.is_empty() {
            return Ok(CaucusUpdate::unchanged(self));
        }

        let mut next = self.clone();
        let mut changes = ChangeSet::new()
            .expect_unchanged(field(SPEAKING))
            .expect_unchanged(field(QUEUE));

        if let Some(who) = self.speaking.clone() {
            let event = SpeakerEvent { who, at: Some(now) };
            changes = changes.set(field(HISTORY).child(history_key), encode(&event)?);
            next.history.insert(history_key.to_owned(), event);
        }

        let mut waiting = self.queue.iter();
        next.speaking = waiting.next().cloned();
        next.queue = waiting
            .filter(|queued| Some(*queued) != next.speaking.as_ref())
            .cloned()
            .collect();

        changes = match &next.speaking {
            Some(name) => changes.set(field(SPEAKING), encode(name)?),
            None => changes.remove(field(SPEAKING)),
        };
        changes = if next.queue.is_empty() {
            changes.remove(field(QUEUE))
        } else {
            changes.set(field(QUEUE), encode(&next.queue)?)
        };

        let duration = Duration::from_millis(self.speaker_timer.duration_ms);
        let reset = self.speaker_timer.reset(duration, now);
        next.speaker_timer = if next.speaking.is_some() {
            reset.start(now).unwrap_or(reset)
        } else {
            reset
        };
        changes = changes.set(
            field(TimerKind::Speaker.field()),
            encode(&next.speaker_timer)?,
        );

        Ok(CaucusUpdate {
            caucus: next,
            changes,
        })
    }

    /// Takes `name` off the queue, or off the floor if they are speaking.
    /// Nobody is promoted in their place. No-op when `name` is absent.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the new queue cannot be
    /// encoded.
    pub fn remove_speaker(&self, name: &str) -> Result<CaucusUpdate, DomainError> {
        if !self.has_speaker(name) {
            return Ok(CaucusUpdate::unchanged(self));
        }

        let mut next = self.clone();
        let mut changes = ChangeSet::new()
            .expect_unchanged(field(SPEAKING))
            .expect_unchanged(field(QUEUE));

        if next.speaking.as_deref() == Some(name) {
            next.speaking = None;
            changes = changes.remove(field(SPEAKING));
        }
        if next.queue.iter().any(|queued| queued == name) {
            next.queue.retain(|queued| queued != name);
            changes = if next.queue.is_empty() {
                changes.remove(field(QUEUE))
            } else {
                changes.set(field(QUEUE), encode(&next.queue)?)
            };
        }

        Ok(CaucusUpdate {
            caucus: next,
            changes,
        })
    }

    /// Starts or resumes one timer.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTransition` if the timer is running or
    /// expired.
    pub fn start_timer(
        &self,
        kind: TimerKind,
        now: DateTime<Utc>,
    ) -> Result<CaucusUpdate, DomainError> {
        let started = self.timer(kind).start(now)?;
        self.replace_timer(kind, started)
    }

    /// Pauses one timer.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTransition` unless the timer is running.
    pub fn pause_timer(
        &self,
        kind: TimerKind,
        now: DateTime<Utc>,
    ) -> Result<CaucusUpdate, DomainError> {
        let paused = self.timer(kind).pause(now)?;
        self.replace_timer(kind, paused)
    }

    /// Resets one timer to idle with `duration`, or with its configured
    /// duration when `None`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the timer cannot be encoded.
    pub fn reset_timer(
        &self,
        kind: TimerKind,
        duration: Option<Duration>,
        now: DateTime<Utc>,
    ) -> Result<CaucusUpdate, DomainError> {
        let timer = self.timer(kind);
        let duration = duration.unwrap_or(Duration::from_millis(timer.duration_ms));
        self.replace_timer(kind, timer.reset(duration, now))
    }

    fn replace_timer(&self, kind: TimerKind, timer: Timer) -> Result<CaucusUpdate, DomainError> {
        let path = field(kind.field());
        let changes = ChangeSet::new()
            .expect_unchanged(path.clone())
            .set(path, encode(&timer)?);
        let mut next = self.clone();
        *next.timer_mut(kind) = timer;
        Ok(CaucusUpdate {
            caucus: next,
            changes,
        })
    }

    /// Projection at `now` for display.
    #[must_use]
    pub fn view_at(&self, now: DateTime<Utc>) -> CaucusView {
        CaucusView {
            name: self.name.clone(),
            caucus_timer: self.caucus_timer.view_at(now),
            speaker_timer: self.speaker_timer.view_at(now),
            speaking: self.speaking.clone(),
            queue: self.queue.clone(),
            history: self.history.values().cloned().collect(),
        }
    }
}
