//! Touch gesture tracking.
//!
//! Touch progress comes from the total finger displacement since
//! `touchstart`, not from per-event deltas.

use crate::gesture::{Direction, Millis};

/// Phase of a touch event, mirroring `touchstart`/`touchmove`/`touchend`.
///
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum TouchPhase {
    Start,
    Move,
    End,
    Cancel,
}

/// A single touch event as delivered by the host.
///
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchInput {
    pub phase: TouchPhase,
    /// Vertical client coordinate of the primary touch point.
    pub y: f64,
    pub timestamp: Millis,
}

impl TouchInput {
    pub fn start(y: f64, timestamp: Millis) -> Self {
        TouchInput {
            phase: TouchPhase::Start,
            y,
            timestamp,
        }
    }

    pub fn moved(y: f64, timestamp: Millis) -> Self {
        TouchInput {
            phase: TouchPhase::Move,
            y,
            timestamp,
        }
    }

    pub fn end(y: f64, timestamp: Millis) -> Self {
        TouchInput {
            phase: TouchPhase::End,
            y,
            timestamp,
        }
    }
}

/// Progress of an active touch sequence.
///
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchProgress {
    pub direction: Direction,
    pub progress: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ActiveTouch {
    start_y: f64,
    progress: f64,
    direction: Option<Direction>,
    reached: bool,
    fired: bool,
}

/// Tracks one touch sequence at a time.
///
#[derive(Debug, Clone, Default)]
pub struct TouchTracker {
    active: Option<ActiveTouch>,
}

impl TouchTracker {
    pub fn new() -> Self {
        TouchTracker::default()
    }

    /// Whether a touch sequence is in progress.
    ///
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn begin(&mut self, y: f64) {
        self.active = Some(ActiveTouch {
            start_y: y,
            progress: 0.0,
            direction: None,
            reached: false,
            fired: false,
        });
    }

    /// Update with the current finger position. Moving the finger up scrolls
    /// content down, so upward displacement maps to `Direction::Down`.
    ///
    pub fn update(&mut self, y: f64, threshold: f64) -> Option<TouchProgress> {
        let touch = self.active.as_mut()?;
        let displacement = touch.start_y - y;
        let direction = Direction::from_delta(displacement)?;
        let progress = if threshold <= 0.0 {
            100.0
        } else {
            (displacement.abs() * 100.0 / threshold).min(100.0)
        };
        // A trigger reached in one direction is not owed to the other.
        if touch.direction != Some(direction) {
            touch.reached = false;
        }
        touch.direction = Some(direction);
        touch.progress = progress;
        if progress >= 100.0 {
            touch.reached = true;
        }
        Some(TouchProgress {
            direction,
            progress,
        })
    }

    /// Claim the trigger for this sequence if progress reached 100% and it
    /// has not fired yet. Returns the direction to navigate.
    ///
    pub fn take_trigger(&mut self) -> Option<Direction> {
        let touch = self.active.as_mut()?;
        if touch.reached && !touch.fired {
            touch.fired = true;
            return touch.direction;
        }
        None
    }

    /// Mark the sequence as already consumed so neither move nor release
    /// can trigger it.
    ///
    pub fn suppress(&mut self) {
        if let Some(touch) = self.active.as_mut() {
            touch.fired = true;
        }
    }

    pub fn progress(&self) -> f64 {
        self.active.map(|t| t.progress).unwrap_or(0.0)
    }

    /// Finish the sequence. Returns the direction if a trigger is still owed.
    ///
    pub fn finish(&mut self) -> Option<Direction> {
        let owed = self.take_trigger();
        self.active = None;
        owed
    }

    pub fn cancel(&mut self) {
        self.active = None;
    }
}
