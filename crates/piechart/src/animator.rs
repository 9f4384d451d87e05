//! Selection animation state machine.
//!
//! At most one slice is selected. Selecting pops the slice outward (and
//! optionally rotates the chart); deselecting pulls it back. Progress advances
//! from elapsed time, so the animation runs at the same speed whatever the
//! refresh rate.
//!
//! Switching the selection from `i` to `j` finishes `i` immediately (its offset
//! drops to zero) and starts `j` from scratch.

use std::f64::consts::TAU;
use std::time::Duration;
use strum::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum Phase {
    #[default]
    Idle,
    Selecting,
    Deselecting,
}

/// Notification produced by a selection transition. `Will*` fire when the
/// transition starts, `Did*` when it settles or is cut short.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionEvent {
    WillSelect(usize),
    DidSelect(usize),
    WillDeselect(usize),
    DidDeselect(usize),
}

/// Interpolates between two values over the current transition.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
struct Track {
    from: f64,
    to: f64,
}

impl Track {
    fn at(&self, eased: f64) -> f64 {
        self.from + (self.to - self.from) * eased
    }

    fn retarget(&mut self, current: f64, to: f64) {
        self.from = current;
        self.to = to;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectionAnimator {
    duration: Duration,
    phase: Phase,
    slice: Option<usize>,
    progress: f64,
    offset: Track,
    rotation: Track,
}

impl Default for SelectionAnimator {
    fn default() -> Self {
        Self::new(Duration::from_millis(500))
    }
}

impl SelectionAnimator {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            phase: Phase::Idle,
            slice: None,
            progress: 1.0,
            offset: Track::default(),
            rotation: Track::default(),
        }
    }

    pub fn set_duration(&mut self, duration: Duration) {
        self.duration = duration;
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn is_animating(&self) -> bool {
        self.phase != Phase::Idle
    }

    /// The slice that is selected or on its way to being selected.
    pub fn selected(&self) -> Option<usize> {
        match self.phase {
            Phase::Deselecting => None,
            _ => self.slice,
        }
    }

    /// Share of the full pop-out distance applied to `index`, in `[0, 1]`.
    pub fn offset_factor(&self, index: usize) -> f64 {
        if self.slice == Some(index) {
            self.offset.at(self.eased())
        } else {
            0.0
        }
    }

    /// Current chart rotation in radians.
    pub fn rotation(&self) -> f64 {
        self.rotation.at(self.eased())
    }

    /// Starts selecting `index`, rotating the chart to `target_rotation`.
    pub fn select(&mut self, index: usize, target_rotation: f64) -> Vec<SelectionEvent> {
        let mut events = Vec::new();

        match (self.slice, self.phase) {
            (Some(current), Phase::Idle | Phase::Selecting) if current == index => {
                return events;
            }
            (Some(current), Phase::Deselecting) if current == index => {
                events.push(SelectionEvent::DidDeselect(current));
            }
            (Some(current), Phase::Deselecting) => {
                events.push(SelectionEvent::DidDeselect(current));
                self.offset = Track::default();
            }
            (Some(current), _) => {
                events.push(SelectionEvent::WillDeselect(current));
                events.push(SelectionEvent::DidDeselect(current));
                self.offset = Track::default();
            }
            (None, _) => {}
        }

        let offset = self.offset_factor(index);
        let rotation = self.rotation();
        events.push(SelectionEvent::WillSelect(index));

        log::debug!("selecting slice {index}");
        self.slice = Some(index);
        self.phase = Phase::Selecting;
        self.offset.retarget(offset, 1.0);
        self.rotation.retarget(rotation, target_rotation);
        self.progress = 0.0;
        events
    }

    /// Starts deselecting `index`. Does nothing unless `index` is the current
    /// selection. The chart turns back to the nearest whole turn.
    pub fn deselect(&mut self, index: usize) -> Vec<SelectionEvent> {
        if self.selected() != Some(index) {
            return Vec::new();
        }

        let offset = self.offset_factor(index);
        let rotation = self.rotation();

        log::debug!("deselecting slice {index}");
        self.phase = Phase::Deselecting;
        self.offset.retarget(offset, 0.0);
        self.rotation
            .retarget(rotation, (rotation / TAU).round() * TAU);
        self.progress = 0.0;
        vec![SelectionEvent::WillDeselect(index)]
    }

    /// Advances the running transition by `dt`.
    pub fn tick(&mut self, dt: Duration) -> Vec<SelectionEvent> {
        if self.phase == Phase::Idle {
            return Vec::new();
        }

        self.progress = if self.duration.is_zero() {
            1.0
        } else {
            (self.progress + dt.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
        };

        if self.progress < 1.0 {
            return Vec::new();
        }

        let phase = std::mem::take(&mut self.phase);
        match (phase, self.slice) {
            (Phase::Selecting, Some(index)) => vec![SelectionEvent::DidSelect(index)],
            (Phase::Deselecting, Some(index)) => {
                self.slice = None;
                vec![SelectionEvent::DidDeselect(index)]
            }
            _ => Vec::new(),
        }
    }

    /// Drops any selection without notifications.
    pub fn reset(&mut self) {
        *self = Self::new(self.duration);
    }

    fn eased(&self) -> f64 {
        ease_out_cubic(self.progress)
    }
}

fn ease_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}
