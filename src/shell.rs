//! Terminal shell state.
//!
//! Wires the engine together for the demo binary: one row engine per view,
//! the scroll navigator, session scroll storage and the frame monitor. All
//! input handlers take the current time so the shell can be driven without
//! a terminal.

use crate::config::Config;
use crate::demo::sample_sections;
use crate::gesture::{Direction, Millis, PlatformCapabilities, WheelInput};
use crate::logger::LogBuffer;
use crate::navigation::{NavigationHooks, ScrollNavigator, TransitionHooks};
use crate::store::{CanvasStore, PerformanceMonitor, SessionStore, View};
use crate::virtual_list::{Align, RowHooks, VirtualRowEngine};
use log::*;
use std::collections::HashSet;
use std::time::Instant;

/// Pixels represented by one terminal line.
pub const PX_PER_LINE: u32 = 20;

/// Wheel lines per notch. Each line is `gesture.line_height_px` tall, the
/// same height the classifier converts line deltas with.
pub const LINES_PER_NOTCH: f64 = 3.0;

const SECTIONS_PER_VIEW: usize = 12;
const ITEMS_PER_SECTION: usize = 6;

/// Navigation callbacks captured for the shell.
///
#[derive(Debug, Default)]
pub struct ShellHooks {
    indicator: Option<(f64, Direction)>,
    navigated: bool,
    completed: Option<View>,
    transition_progress: f64,
}

impl TransitionHooks for ShellHooks {
    fn on_transition_start(&mut self, from: View, to: View) {
        debug!("Transition {} -> {} started", from.as_str(), to.as_str());
        self.transition_progress = 0.0;
    }

    fn on_transition_progress(&mut self, progress: f64) {
        self.transition_progress = progress;
    }

    fn on_transition_complete(&mut self, view: View) {
        self.transition_progress = 0.0;
        self.completed = Some(view);
    }
}

impl NavigationHooks for ShellHooks {
    fn on_navigate(&mut self, _direction: Direction) {
        self.navigated = true;
    }

    fn on_progress_change(&mut self, progress: f64, direction: Direction) {
        self.indicator = if progress > 0.0 {
            Some((progress, direction))
        } else {
            None
        };
    }
}

/// Most recent activation of a row engine.
///
#[derive(Debug, Default)]
pub struct LastActivated(Option<String>);

impl RowHooks for LastActivated {
    fn on_item_activate(&mut self, item_id: &str) {
        info!("Activated {}", item_id);
        self.0 = Some(item_id.to_string());
    }
}

/// Everything the terminal shell renders and mutates.
///
#[derive(Debug)]
pub struct Shell {
    store: CanvasStore,
    navigator: ScrollNavigator<ShellHooks>,
    skills: VirtualRowEngine<LastActivated>,
    library: VirtualRowEngine<LastActivated>,
    session: SessionStore,
    monitor: PerformanceMonitor,
    completed: HashSet<String>,
    selected: usize,
    logs: LogBuffer,
    wheel_line_px: f64,
    started: Instant,
}

impl Shell {
    pub fn new(config: &Config, store: CanvasStore, capabilities: PlatformCapabilities, logs: LogBuffer) -> Self {
        let navigator = ScrollNavigator::new(config, &capabilities, &store, ShellHooks::default());
        let mut skills = VirtualRowEngine::with_hooks(View::Skills, &config.virtualization, LastActivated::default());
        skills.set_sections(&sample_sections(View::Skills, SECTIONS_PER_VIEW, ITEMS_PER_SECTION));
        let mut library = VirtualRowEngine::with_hooks(View::Library, &config.virtualization, LastActivated::default());
        library.set_sections(&sample_sections(View::Library, SECTIONS_PER_VIEW, ITEMS_PER_SECTION));

        let mut shell = Shell {
            store,
            navigator,
            skills,
            library,
            session: SessionStore::new(),
            monitor: PerformanceMonitor::new(capabilities),
            completed: HashSet::new(),
            selected: 0,
            logs,
            wheel_line_px: config.gesture.line_height_px,
            started: Instant::now(),
        };
        // Skills exits through its top edge, so it opens at the bottom.
        if shell.store.current_view() == View::Skills {
            let bottom = shell.skills.total_size();
            shell.skills.scroll_to(bottom);
            shell.selected = shell.skills.rows().len().saturating_sub(1);
        }
        shell
    }

    /// Milliseconds since the shell started.
    ///
    pub fn now(&self) -> Millis {
        self.started.elapsed().as_millis() as Millis
    }

    pub fn store(&self) -> &CanvasStore {
        &self.store
    }

    pub fn logs(&self) -> &LogBuffer {
        &self.logs
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn completed(&self) -> &HashSet<String> {
        &self.completed
    }

    /// Navigation indicator, when visible.
    ///
    pub fn indicator(&self) -> Option<(f64, Direction)> {
        self.navigator.hooks().indicator
    }

    pub fn transition_progress(&self) -> f64 {
        self.navigator.hooks().transition_progress
    }

    pub fn last_activated(&self) -> Option<&str> {
        self.active_engine().hooks().0.as_deref()
    }

    pub fn active_engine(&self) -> &VirtualRowEngine<LastActivated> {
        match self.store.current_view() {
            View::Skills => &self.skills,
            View::Library => &self.library,
        }
    }

    pub fn active_engine_mut(&mut self) -> &mut VirtualRowEngine<LastActivated> {
        match self.store.current_view() {
            View::Skills => &mut self.skills,
            View::Library => &mut self.library,
        }
    }

    /// Resize both views to a viewport of `lines` terminal lines.
    ///
    pub fn set_viewport_lines(&mut self, lines: u16, now: Millis) {
        let height = lines as u32 * PX_PER_LINE;
        self.skills.set_viewport_height(height);
        self.library.set_viewport_height(height);
        self.refresh_edge(now);
    }

    /// One wheel notch: positive `notches` scroll down.
    ///
    pub fn scroll_wheel(&mut self, notches: f64, now: Millis) {
        let lines = notches * LINES_PER_NOTCH;
        let pixels = (lines * self.wheel_line_px).round() as i64;
        if !self.store.navigation().is_animating {
            let offset = self.active_engine_mut().scroll_by(pixels);
            self.store.update_scroll_position(0.0, offset as f64, now);
        }
        self.refresh_edge(now);
        self.navigator
            .on_wheel(&mut self.store, &WheelInput::lines(lines, now));
        self.after_navigation_input(now);
    }

    /// Move the selection by `delta` rows, keeping it in view.
    ///
    pub fn move_selection(&mut self, delta: i64, now: Millis) {
        let count = self.active_engine().rows().len();
        if count == 0 {
            return;
        }
        let next = (self.selected as i64 + delta).clamp(0, count as i64 - 1) as usize;
        self.selected = next;
        let offset = self.active_engine_mut().scroll_to_item(next, Align::Auto);
        self.store.update_scroll_position(0.0, offset as f64, now);
        self.refresh_edge(now);
    }

    /// Activate the selected row, marking it completed.
    ///
    pub fn activate_selected(&mut self) -> Option<String> {
        let index = self.selected;
        let engine = match self.store.current_view() {
            View::Skills => &mut self.skills,
            View::Library => &mut self.library,
        };
        let id = engine.activate(index, &self.completed, &mut self.session)?;
        self.completed.insert(id.clone());
        Some(id)
    }

    /// Switch to the other view without a gesture.
    ///
    pub fn toggle_view(&mut self, now: Millis) {
        let target = self.store.current_view().other();
        let leaving = match self.store.current_view() {
            View::Skills => &self.skills,
            View::Library => &self.library,
        };
        leaving.save_scroll_position(&mut self.session);
        if self.navigator.navigate_to(&mut self.store, target, now) {
            self.after_navigation_input(now);
        }
    }

    pub fn toggle_reduced_motion(&mut self) {
        let value = !self.store.preferences().prefers_reduced_motion;
        info!("Reduced motion {}", if value { "on" } else { "off" });
        self.store.set_prefers_reduced_motion(value);
    }

    /// Frame upkeep: timers, transitions and frame sampling.
    ///
    pub fn tick(&mut self, now: Millis) {
        self.navigator.tick(&mut self.store, now);
        self.after_navigation_input(now);
        self.monitor.record_frame(&mut self.store, now);
    }

    /// Record how long the last draw took.
    ///
    pub fn record_render_time(&mut self, duration_ms: f64) {
        self.monitor.record_render_time(duration_ms);
    }

    fn refresh_edge(&mut self, now: Millis) {
        let metrics = self.active_engine_mut().scroll_metrics();
        self.navigator.update_edge(&mut self.store, &metrics, now);
    }

    /// Save the leaving view's offset on a trigger and restore the arriving
    /// view's offset once its transition completes.
    fn after_navigation_input(&mut self, now: Millis) {
        let hooks = self.navigator.hooks_mut();
        let navigated = std::mem::take(&mut hooks.navigated);
        let completed = hooks.completed.take();

        if navigated {
            let leaving = match self.store.navigation().transition_target {
                Some(target) => target.other(),
                None => self.store.current_view(),
            };
            let engine = match leaving {
                View::Skills => &self.skills,
                View::Library => &self.library,
            };
            engine.save_scroll_position(&mut self.session);
        }

        if let Some(view) = completed {
            let session = &mut self.session;
            let engine = match view {
                View::Skills => &mut self.skills,
                View::Library => &mut self.library,
            };
            let restored = engine.restore_scroll_position(session);
            self.selected = match restored {
                Some(_) => engine.visible_range().start,
                None => 0,
            };
            if restored.is_none() {
                engine.scroll_to(0);
            }
            self.refresh_edge(now);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::DeviceType;

    fn shell(view: View) -> Shell {
        let mut store = CanvasStore::new();
        store.set_current_view(view);
        let mut shell = Shell::new(&Config::new(), store, PlatformCapabilities::default(), LogBuffer::new(10));
        shell.set_viewport_lines(20, 0);
        shell
    }

    #[test]
    fn test_wheel_at_library_bottom_navigates_to_skills() {
        let mut shell = shell(View::Library);
        let bottom = shell.library.total_size();
        shell.library.scroll_to(bottom);

        let mut now = 0;
        while shell.store().current_view() == View::Library && now < 5_000 {
            shell.scroll_wheel(1.0, now);
            shell.tick(now + 10);
            now += 20;
        }
        assert_eq!(shell.store().current_view(), View::Skills);
        assert_eq!(shell.store().preferences().device_type, DeviceType::Mouse);
        // Library's offset was saved when the gesture fired.
        assert!(shell.session.peek_scroll_position(View::Library).is_some());
    }

    #[test]
    fn test_wheel_scrolls_by_classifier_line_height() {
        let mut shell = shell(View::Library);
        shell.scroll_wheel(1.0, 0);
        let expected = (LINES_PER_NOTCH * crate::config::LINE_HEIGHT_PX) as u64;
        assert_eq!(shell.library.scroll_offset(), expected);
        assert_eq!(shell.store().scroll().y, expected as f64);
    }

    #[test]
    fn test_toggle_restores_offset_once() {
        let mut shell = shell(View::Library);
        shell.library.scroll_to(734);
        shell.toggle_view(0);
        shell.tick(600);
        assert_eq!(shell.store().current_view(), View::Skills);

        shell.toggle_view(700);
        shell.tick(1300);
        assert_eq!(shell.store().current_view(), View::Library);
        assert_eq!(shell.library.scroll_offset(), 734);
        assert_eq!(shell.session.peek_scroll_position(View::Library), None);
    }

    #[test]
    fn test_activation_unlocks_next_skill() {
        let mut shell = shell(View::Library);
        shell.toggle_view(0);
        shell.tick(600);
        assert_eq!(shell.store().current_view(), View::Skills);
        assert_eq!(shell.selected(), 0);

        // Row 1 is the first hack, row 2 requires it.
        shell.move_selection(2, 700);
        assert_eq!(shell.activate_selected(), None);
        shell.move_selection(-1, 710);
        assert_eq!(shell.activate_selected(), Some("skills-1-1".to_string()));
        shell.move_selection(1, 720);
        assert_eq!(shell.activate_selected(), Some("skills-1-2".to_string()));
        assert_eq!(shell.last_activated(), Some("skills-1-2"));
    }
}
