//! View-transition phases.
//!
//! A transition runs `start -> progress(0..=100) -> complete`, advanced by
//! the host clock rather than by timers of its own.

use super::hooks::TransitionHooks;
use crate::gesture::Millis;
use crate::store::{CanvasStore, View};
use log::*;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Running {
    target: View,
    started_at: Millis,
    duration_ms: Millis,
}

/// Drives the store's transition slice and reports each phase through
/// [`TransitionHooks`].
///
#[derive(Debug, Clone)]
pub struct TransitionDriver {
    duration_ms: Millis,
    running: Option<Running>,
}

impl TransitionDriver {
    pub fn new(duration_ms: Millis) -> Self {
        TransitionDriver {
            duration_ms,
            running: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// Start a transition to `target`. Returns `false` if the store refused
    /// it (already animating or already on `target`). Reduced motion
    /// completes the transition immediately.
    ///
    pub fn start<H: TransitionHooks + ?Sized>(
        &mut self,
        store: &mut CanvasStore,
        target: View,
        now: Millis,
        hooks: &mut H,
    ) -> bool {
        let from = store.current_view();
        if !store.start_view_transition(target) {
            return false;
        }
        let duration_ms = if store.preferences().prefers_reduced_motion {
            0
        } else {
            self.duration_ms
        };
        hooks.on_transition_start(from, target);
        self.running = Some(Running {
            target,
            started_at: now,
            duration_ms,
        });
        if duration_ms == 0 {
            self.advance(store, now, hooks);
        }
        true
    }

    /// Move the running transition forward to `now`. Returns the new view
    /// when this call completes the transition.
    ///
    pub fn advance<H: TransitionHooks + ?Sized>(
        &mut self,
        store: &mut CanvasStore,
        now: Millis,
        hooks: &mut H,
    ) -> Option<View> {
        let running = self.running?;
        let elapsed = now.saturating_sub(running.started_at);
        let progress = if running.duration_ms == 0 {
            100.0
        } else {
            (elapsed as f64 * 100.0 / running.duration_ms as f64).min(100.0)
        };

        if progress < 100.0 {
            store.set_transition_progress(progress);
            hooks.on_transition_progress(progress);
            return None;
        }

        hooks.on_transition_progress(100.0);
        self.running = None;
        let view = store.complete_view_transition().unwrap_or(running.target);
        debug!("Transition to {} finished after {}ms", view.as_str(), elapsed);
        hooks.on_transition_complete(view);
        Some(view)
    }

    /// When the running transition is due to finish.
    ///
    pub fn deadline(&self) -> Option<Millis> {
        self.running.map(|r| r.started_at + r.duration_ms)
    }

    /// Abandon the running transition, finishing it in the store so the
    /// target view is still reached.
    ///
    pub fn cancel(&mut self, store: &mut CanvasStore) {
        if self.running.take().is_some() {
            store.complete_view_transition();
        }
    }
}
