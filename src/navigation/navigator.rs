//! Wheel and touch navigation between canvas views.
//!
//! [`ScrollNavigator`] owns the per-view gesture machinery and writes its
//! outcome into a [`CanvasStore`] passed in by the caller:
//! - Classifies wheel deltas and drops momentum
//! - Gates gestures on the view's exit direction and edge dwell
//! - Accumulates progress and fires a navigation once per gesture
//! - Runs the resulting view transition

use super::accumulator::{
    device_threshold, GestureAccumulator, GestureEffect, GestureInput, GesturePhase, ResetReason,
};
use super::edge::{EdgeDetector, ScrollMetrics};
use super::hooks::NavigationHooks;
use super::touch::{TouchInput, TouchPhase, TouchTracker};
use super::transition::TransitionDriver;
use crate::config::Config;
use crate::config::NavigationConfig;
use crate::gesture::{DeviceType, Direction, GestureClassifier, Millis, PlatformCapabilities, WheelInput};
use crate::store::{CanvasStore, View};
use log::*;

/// Scroll-driven navigator for one mounted canvas view.
///
#[derive(Debug)]
pub struct ScrollNavigator<H: NavigationHooks> {
    classifier: GestureClassifier,
    accumulator: GestureAccumulator,
    touch: TouchTracker,
    edge: EdgeDetector,
    transition: TransitionDriver,
    config: NavigationConfig,
    enabled: bool,
    attached: bool,
    hooks: H,
}

impl<H: NavigationHooks> ScrollNavigator<H> {
    /// Build a navigator. A device class already stored in the preferences
    /// seeds the classifier so no deferral window is needed.
    ///
    pub fn new(config: &Config, capabilities: &PlatformCapabilities, store: &CanvasStore, hooks: H) -> Self {
        let classifier = GestureClassifier::new(config.gesture.clone(), capabilities)
            .with_device(store.preferences().device_type);
        let navigation = config.navigation.clone();
        ScrollNavigator {
            classifier,
            accumulator: GestureAccumulator::new(navigation.clone()),
            touch: TouchTracker::new(),
            edge: EdgeDetector::new(navigation.edge_threshold_px),
            transition: TransitionDriver::new(navigation.transition_duration_ms),
            config: navigation,
            enabled: true,
            attached: true,
            hooks,
        }
    }

    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    pub fn hooks_mut(&mut self) -> &mut H {
        &mut self.hooks
    }

    pub fn device(&self) -> DeviceType {
        self.classifier.device()
    }

    pub fn phase(&self) -> GesturePhase {
        self.accumulator.phase()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled && self.attached
    }

    /// Progress of the in-flight gesture in percent.
    ///
    pub fn progress(&self) -> f64 {
        if self.touch.is_active() {
            return self.touch.progress();
        }
        self.accumulator.progress()
    }

    /// Earliest time the host should call [`ScrollNavigator::tick`].
    ///
    pub fn deadline(&self) -> Option<Millis> {
        if !self.attached {
            return None;
        }
        match (self.accumulator.deadline(), self.transition.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Turn gesture navigation on or off. Disabling drops any in-flight
    /// gesture immediately.
    ///
    pub fn set_enabled(&mut self, store: &mut CanvasStore, enabled: bool, now: Millis) {
        if self.enabled == enabled {
            return;
        }
        self.enabled = enabled;
        if !enabled {
            debug!("Scroll navigation disabled");
            self.touch.cancel();
            self.cancel_gesture(store, ResetReason::Disabled, now);
        }
    }

    /// Stop reacting to input and drop all pending deadlines, as when the
    /// view unmounts. A running transition is finished in the store.
    ///
    pub fn detach(&mut self, store: &mut CanvasStore) {
        self.attached = false;
        self.touch.cancel();
        self.accumulator.clear();
        self.classifier.reset_gesture();
        self.transition.cancel(store);
    }

    /// Resume after [`ScrollNavigator::detach`].
    ///
    pub fn attach(&mut self) {
        self.attached = true;
    }

    /// Handle one wheel event.
    ///
    pub fn on_wheel(&mut self, store: &mut CanvasStore, input: &WheelInput) {
        if !self.is_enabled() {
            return;
        }
        if store.navigation().is_animating {
            self.cancel_gesture(store, ResetReason::Disabled, input.timestamp);
            return;
        }
        // An active touch sequence owns the gesture.
        if self.touch.is_active() {
            return;
        }

        let classification = match self.classifier.classify(input) {
            Some(c) => c,
            None => return,
        };
        if !classification.device.is_resolved() {
            trace!("Deferring wheel delta until the device resolves");
            return;
        }
        store.set_device_type(classification.device);

        // Only a burst in the direction being accumulated was let through.
        if classification.retracted_magnitude > 0.0
            && self.accumulator.direction() == Some(classification.direction)
        {
            debug!(
                "Momentum detected, retracting {:.1}",
                classification.retracted_magnitude
            );
            let effects = self.accumulator.apply(GestureInput::Retract {
                amount: classification.retracted_magnitude,
            });
            self.dispatch(store, effects, input.timestamp);
        }
        if !classification.counts() {
            return;
        }

        let direction = classification.direction;
        if !self.permits(store, direction, input.timestamp) {
            return;
        }

        let effects = self.accumulator.apply(GestureInput::Delta {
            direction,
            magnitude: classification.normalized_magnitude,
            device: classification.device,
            at: input.timestamp,
        });
        self.dispatch(store, effects, input.timestamp);
    }

    /// Handle one touch event. Touch progress is measured from the
    /// displacement since the sequence started.
    ///
    pub fn on_touch(&mut self, store: &mut CanvasStore, input: &TouchInput) {
        if !self.is_enabled() {
            return;
        }
        self.classifier.mark_touch();
        store.set_device_type(DeviceType::Touch);

        match input.phase {
            TouchPhase::Start => {
                self.cancel_gesture(store, ResetReason::Disabled, input.timestamp);
                self.touch.begin(input.y);
                if store.navigation().is_animating {
                    self.touch.suppress();
                }
            }
            TouchPhase::Move => {
                if store.navigation().is_animating {
                    self.touch.suppress();
                    return;
                }
                let threshold = device_threshold(DeviceType::Touch, &self.config);
                let progress = match self.touch.update(input.y, threshold) {
                    Some(p) => p,
                    None => return,
                };
                if !self.permits(store, progress.direction, input.timestamp) {
                    return;
                }
                self.report_progress(progress.progress, progress.direction);
                if let Some(direction) = self.touch.take_trigger() {
                    self.navigate(store, direction, input.timestamp);
                }
            }
            TouchPhase::End => {
                let owed = self.touch.finish();
                if let Some(direction) = owed {
                    if !store.navigation().is_animating
                        && self.permits(store, direction, input.timestamp)
                    {
                        self.navigate(store, direction, input.timestamp);
                        return;
                    }
                    self.hooks.on_progress_change(0.0, direction);
                }
            }
            TouchPhase::Cancel => {
                self.touch.cancel();
            }
        }
    }

    /// Timer upkeep: idle resets, transition frames and the store's scroll
    /// and edge timers.
    ///
    pub fn tick(&mut self, store: &mut CanvasStore, now: Millis) {
        store.tick(now);
        if !self.attached {
            return;
        }
        self.transition.advance(store, now, &mut self.hooks);
        let effects = self.accumulator.apply(GestureInput::Tick { now });
        self.dispatch(store, effects, now);
    }

    /// Feed the active container's scroll metrics. Losing the exit edge
    /// drops an in-flight gesture.
    ///
    pub fn update_edge(&mut self, store: &mut CanvasStore, metrics: &ScrollMetrics, now: Millis) {
        let exit = store.current_view().exit_direction();
        let at_edge = self.edge.evaluate(metrics, exit);
        store.set_is_at_edge(at_edge, now);
        store.update_edge_dwell_time(now);
        if !at_edge && matches!(self.accumulator.phase(), GesturePhase::Accumulating { .. }) {
            self.cancel_gesture(store, ResetReason::EdgeLost, now);
        }
    }

    /// Navigate to `target` directly, as a keyboard shortcut would.
    ///
    pub fn navigate_to(&mut self, store: &mut CanvasStore, target: View, now: Millis) -> bool {
        self.accumulator.clear();
        self.touch.cancel();
        let started = self.transition.start(store, target, now, &mut self.hooks);
        if started {
            store.reset_edge_dwell();
        }
        started
    }

    /// Whether a gesture in `direction` may accumulate right now.
    fn permits(&self, store: &mut CanvasStore, direction: Direction, now: Millis) -> bool {
        let view = store.current_view();
        if self.config.gate_directions && direction != view.exit_direction() {
            trace!("Ignoring {} gesture on {}", direction.as_str(), view.as_str());
            return false;
        }
        store.update_edge_dwell_time(now);
        let nav = store.navigation();
        nav.is_at_edge && nav.edge_dwell_time >= self.config.min_edge_dwell_ms
    }

    fn cancel_gesture(&mut self, store: &mut CanvasStore, reason: ResetReason, at: Millis) {
        let effects = self.accumulator.apply(GestureInput::Cancel { reason, at });
        self.dispatch(store, effects, at);
        self.classifier.reset_gesture();
    }

    fn report_progress(&mut self, progress: f64, direction: Direction) {
        let shown = if progress >= self.config.indicator_min_progress {
            progress
        } else {
            0.0
        };
        self.hooks.on_progress_change(shown, direction);
    }

    fn navigate(&mut self, store: &mut CanvasStore, direction: Direction, now: Millis) {
        let target = store.current_view().other();
        info!(
            "Navigating {} from {} to {}",
            direction.as_str(),
            store.current_view().as_str(),
            target.as_str()
        );
        self.hooks.on_navigate(direction);
        self.hooks.on_progress_change(0.0, direction);
        self.transition.start(store, target, now, &mut self.hooks);
        store.reset_edge_dwell();
        self.classifier.reset_gesture();
    }

    fn dispatch(&mut self, store: &mut CanvasStore, effects: Vec<GestureEffect>, now: Millis) {
        for effect in effects {
            match effect {
                GestureEffect::Progress {
                    progress,
                    direction,
                    visible,
                } => {
                    let shown = if visible { progress } else { 0.0 };
                    self.hooks.on_progress_change(shown, direction);
                }
                GestureEffect::Navigate(direction) => self.navigate(store, direction, now),
                GestureEffect::Reset(reason) => debug!("Gesture reset: {:?}", reason),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::hooks::Recorder;

    const AT_BOTTOM: ScrollMetrics = ScrollMetrics {
        scroll_top: 1200.0,
        client_height: 800.0,
        scroll_height: 2000.0,
    };

    const AT_TOP: ScrollMetrics = ScrollMetrics {
        scroll_top: 0.0,
        client_height: 800.0,
        scroll_height: 2000.0,
    };

    const MIDDLE: ScrollMetrics = ScrollMetrics {
        scroll_top: 600.0,
        client_height: 800.0,
        scroll_height: 2000.0,
    };

    /// A store on `view` with a trackpad already recorded, at the exit edge.
    fn setup(view: View, device: DeviceType) -> (CanvasStore, ScrollNavigator<Recorder>) {
        let mut store = CanvasStore::new();
        store.set_current_view(view);
        store.set_device_type(device);
        let mut nav = ScrollNavigator::new(
            &Config::new(),
            &PlatformCapabilities::default(),
            &store,
            Recorder::default(),
        );
        let metrics = match view {
            View::Library => AT_BOTTOM,
            View::Skills => AT_TOP,
        };
        nav.update_edge(&mut store, &metrics, 0);
        (store, nav)
    }

    fn wheel(nav: &mut ScrollNavigator<Recorder>, store: &mut CanvasStore, deltas: &[f64], start: Millis, step: Millis) {
        for (i, &d) in deltas.iter().enumerate() {
            nav.on_wheel(store, &WheelInput::pixels(d, start + i as Millis * step));
        }
    }

    #[test]
    fn test_trackpad_gesture_fires_once_at_threshold() {
        let (mut store, mut nav) = setup(View::Library, DeviceType::Trackpad);
        wheel(&mut nav, &mut store, &[50.0, 60.0, 70.0, 80.0, 90.0, 50.0], 10, 20);

        let hooks = nav.hooks();
        assert_eq!(hooks.navigations, vec![Direction::Down]);
        assert_eq!(hooks.progress[0], (12.5, Direction::Down));
        assert!(hooks.progress.iter().any(|&(p, _)| p == 100.0));
        assert_eq!(nav.progress(), 0.0);
        assert!(store.navigation().is_animating);
        assert_eq!(store.navigation().transition_target, Some(View::Skills));

        // Further deltas during the transition accumulate nothing.
        wheel(&mut nav, &mut store, &[200.0, 200.0], 200, 20);
        assert_eq!(nav.hooks().navigations.len(), 1);
        assert_eq!(nav.progress(), 0.0);

        nav.tick(&mut store, 130 + 600);
        assert_eq!(store.current_view(), View::Skills);
        assert_eq!(nav.hooks().completed, vec![View::Skills]);
    }

    #[test]
    fn test_momentum_burst_contributes_nothing() {
        let (mut store, mut nav) = setup(View::Library, DeviceType::Trackpad);
        wheel(&mut nav, &mut store, &[120.0, 90.0, 55.0], 10, 20);
        assert_eq!(nav.progress(), 0.0);
        assert_eq!(nav.hooks().progress.last(), Some(&(0.0, Direction::Down)));
        assert!(nav.hooks().navigations.is_empty());

        // The tail of the burst is dropped as well.
        wheel(&mut nav, &mut store, &[40.0, 30.0], 70, 20);
        assert_eq!(nav.progress(), 0.0);
    }

    #[test]
    fn test_reversal_never_fires() {
        let mut config = Config::new();
        config.navigation.gate_directions = false;
        let mut store = CanvasStore::new();
        store.set_current_view(View::Library);
        store.set_device_type(DeviceType::Trackpad);
        let mut nav = ScrollNavigator::new(&config, &PlatformCapabilities::default(), &store, Recorder::default());
        nav.update_edge(&mut store, &AT_BOTTOM, 0);

        wheel(&mut nav, &mut store, &[100.0, 100.0, 100.0], 0, 100);
        assert_eq!(nav.progress(), 75.0);
        nav.on_wheel(&mut store, &WheelInput::pixels(-100.0, 400));
        assert_eq!(nav.progress(), 0.0);
        assert!(nav.hooks().navigations.is_empty());
    }

    #[test]
    fn test_disallowed_direction_is_ignored_entirely() {
        let (mut store, mut nav) = setup(View::Library, DeviceType::Trackpad);
        wheel(&mut nav, &mut store, &[100.0, 100.0], 0, 100);
        assert_eq!(nav.progress(), 50.0);
        // Up is not an exit from the library; it neither counts nor resets.
        nav.on_wheel(&mut store, &WheelInput::pixels(-100.0, 200));
        assert_eq!(nav.progress(), 50.0);
        wheel(&mut nav, &mut store, &[100.0, 100.0], 300, 100);
        assert_eq!(nav.hooks().navigations, vec![Direction::Down]);
    }

    #[test]
    fn test_skills_exits_upward() {
        let (mut store, mut nav) = setup(View::Skills, DeviceType::Trackpad);
        wheel(&mut nav, &mut store, &[200.0, 200.0], 0, 100);
        assert!(nav.hooks().navigations.is_empty());
        wheel(&mut nav, &mut store, &[-200.0, -200.0], 300, 100);
        assert_eq!(nav.hooks().navigations, vec![Direction::Up]);
    }

    #[test]
    fn test_requires_edge() {
        let (mut store, mut nav) = setup(View::Library, DeviceType::Trackpad);
        nav.update_edge(&mut store, &MIDDLE, 0);
        wheel(&mut nav, &mut store, &[200.0, 200.0, 200.0], 0, 100);
        assert_eq!(nav.progress(), 0.0);
        assert!(nav.hooks().navigations.is_empty());
    }

    #[test]
    fn test_leaving_edge_drops_gesture() {
        let (mut store, mut nav) = setup(View::Library, DeviceType::Trackpad);
        wheel(&mut nav, &mut store, &[100.0], 0, 100);
        assert_eq!(nav.progress(), 25.0);
        nav.update_edge(&mut store, &MIDDLE, 50);
        assert_eq!(nav.progress(), 0.0);
        assert!(!store.navigation().is_at_edge);
    }

    #[test]
    fn test_idle_timeout_resets() {
        let (mut store, mut nav) = setup(View::Library, DeviceType::Mouse);
        wheel(&mut nav, &mut store, &[120.0, 120.0], 0, 100);
        assert_eq!(nav.progress(), 40.0);
        assert_eq!(nav.deadline(), Some(600));
        nav.tick(&mut store, 600);
        assert_eq!(nav.progress(), 0.0);
        assert!(nav.hooks().navigations.is_empty());
    }

    #[test]
    fn test_unknown_device_defers_then_persists_class() {
        let mut store = CanvasStore::new();
        store.set_current_view(View::Library);
        let mut nav = ScrollNavigator::new(&Config::new(), &PlatformCapabilities::default(), &store, Recorder::default());
        nav.update_edge(&mut store, &AT_BOTTOM, 0);

        wheel(&mut nav, &mut store, &[120.0, 120.0], 0, 100);
        assert_eq!(nav.progress(), 0.0);
        assert_eq!(store.preferences().device_type, DeviceType::Unknown);

        nav.on_wheel(&mut store, &WheelInput::pixels(120.0, 200));
        assert_eq!(store.preferences().device_type, DeviceType::Mouse);
        assert_eq!(nav.progress(), 20.0);
    }

    #[test]
    fn test_disabling_clears_progress() {
        let (mut store, mut nav) = setup(View::Library, DeviceType::Trackpad);
        wheel(&mut nav, &mut store, &[100.0, 100.0], 0, 100);
        nav.set_enabled(&mut store, false, 150);
        assert_eq!(nav.progress(), 0.0);
        wheel(&mut nav, &mut store, &[100.0, 100.0, 100.0, 100.0], 200, 100);
        assert_eq!(nav.progress(), 0.0);
        assert!(nav.hooks().navigations.is_empty());
    }

    #[test]
    fn test_touch_triggers_from_displacement() {
        let (mut store, mut nav) = setup(View::Library, DeviceType::Trackpad);
        nav.on_touch(&mut store, &TouchInput::start(600.0, 0));
        assert_eq!(nav.device(), DeviceType::Touch);

        // Threshold is 300px for touch; upward finger motion scrolls down.
        nav.on_touch(&mut store, &TouchInput::moved(450.0, 50));
        assert_eq!(nav.progress(), 50.0);
        // Wheel input is ignored while the touch is active.
        nav.on_wheel(&mut store, &WheelInput::pixels(400.0, 60));
        assert!(nav.hooks().navigations.is_empty());

        nav.on_touch(&mut store, &TouchInput::moved(280.0, 100));
        assert_eq!(nav.hooks().navigations, vec![Direction::Down]);
        nav.on_touch(&mut store, &TouchInput::end(280.0, 120));
        assert_eq!(nav.hooks().navigations.len(), 1);
    }

    #[test]
    fn test_momentum_in_blocked_direction_keeps_progress() {
        let (mut store, mut nav) = setup(View::Library, DeviceType::Trackpad);
        wheel(&mut nav, &mut store, &[100.0, 100.0, 100.0], 0, 100);
        assert_eq!(nav.progress(), 75.0);

        wheel(&mut nav, &mut store, &[-120.0, -90.0, -55.0], 300, 16);
        assert_eq!(nav.progress(), 75.0);
        assert!(nav.hooks().navigations.is_empty());

        wheel(&mut nav, &mut store, &[100.0], 500, 100);
        assert_eq!(nav.hooks().navigations, vec![Direction::Down]);
    }

    #[test]
    fn test_blocked_touch_swing_owes_no_trigger() {
        let (mut store, mut nav) = setup(View::Library, DeviceType::Trackpad);
        nav.on_touch(&mut store, &TouchInput::start(300.0, 0));
        // A full drag upward, which the library does not exit through.
        nav.on_touch(&mut store, &TouchInput::moved(700.0, 50));
        nav.on_touch(&mut store, &TouchInput::moved(290.0, 100));
        nav.on_touch(&mut store, &TouchInput::end(290.0, 120));
        assert!(nav.hooks().navigations.is_empty());
        assert!(!store.navigation().is_animating);
    }

    #[test]
    fn test_release_pays_trigger_reached_off_edge() {
        let (mut store, mut nav) = setup(View::Library, DeviceType::Trackpad);
        nav.update_edge(&mut store, &MIDDLE, 0);
        nav.on_touch(&mut store, &TouchInput::start(600.0, 0));
        nav.on_touch(&mut store, &TouchInput::moved(250.0, 50));
        assert_eq!(nav.progress(), 100.0);
        assert!(nav.hooks().navigations.is_empty());

        // Wheel input stays ignored for the rest of the touch.
        nav.on_wheel(&mut store, &WheelInput::pixels(400.0, 60));
        assert_eq!(nav.progress(), 100.0);

        nav.update_edge(&mut store, &AT_BOTTOM, 80);
        nav.on_touch(&mut store, &TouchInput::end(250.0, 100));
        assert_eq!(nav.hooks().navigations, vec![Direction::Down]);
        assert_eq!(store.navigation().transition_target, Some(View::Skills));
    }

    #[test]
    fn test_release_during_transition_drops_owed_trigger() {
        let (mut store, mut nav) = setup(View::Library, DeviceType::Trackpad);
        nav.update_edge(&mut store, &MIDDLE, 0);
        nav.on_touch(&mut store, &TouchInput::start(600.0, 0));
        nav.on_touch(&mut store, &TouchInput::moved(250.0, 50));
        nav.update_edge(&mut store, &AT_BOTTOM, 80);
        assert!(store.start_view_transition(View::Skills));

        nav.on_touch(&mut store, &TouchInput::end(250.0, 100));
        assert!(nav.hooks().navigations.is_empty());
        assert_eq!(nav.hooks().progress.last(), Some(&(0.0, Direction::Down)));
    }

    #[test]
    fn test_detach_drops_deadlines() {
        let (mut store, mut nav) = setup(View::Library, DeviceType::Trackpad);
        wheel(&mut nav, &mut store, &[100.0], 0, 100);
        assert!(nav.deadline().is_some());
        nav.detach(&mut store);
        assert_eq!(nav.deadline(), None);
        wheel(&mut nav, &mut store, &[100.0], 100, 100);
        assert_eq!(nav.progress(), 0.0);
    }

    #[test]
    fn test_navigate_to_runs_transition() {
        let (mut store, mut nav) = setup(View::Skills, DeviceType::Mouse);
        assert!(nav.navigate_to(&mut store, View::Library, 0));
        assert!(!nav.navigate_to(&mut store, View::Library, 10));
        nav.tick(&mut store, 600);
        assert_eq!(store.current_view(), View::Library);
        assert_eq!(nav.hooks().starts, vec![(View::Skills, View::Library)]);
    }
}
