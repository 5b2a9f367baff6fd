//! Canvas store module.
//!
//! The single source of truth shared by the navigation and virtualization
//! layers. It holds:
//! - Navigation state (current/previous view, transition, edge dwell)
//! - Derived scroll state
//! - Persisted preferences and UI selections
//! - Cached domain collections
//! - Performance counters
//!
//! All mutation goes through the action methods on [`CanvasStore`]; readers
//! get shared references or subscribe to a selector.

mod error;
mod perf;
mod persist;
mod session;
mod state;
mod subscribe;

pub use error::StoreError;
pub use perf::{PerformanceMonitor, DEFAULT_INTERVAL_MS, FRAME_BUDGET_MS};
pub use persist::{
    FileStorage, MemoryStorage, PersistedState, StorageBackend, STORE_KEY, STORE_VERSION,
};
pub use session::{scroll_position_key, SessionStore};
pub use state::{
    CanvasState, DomainCache, NavigationState, PerformanceMetrics, ScrollDirection, ScrollState,
    UiState, UserPreferences, View, DEFAULT_CACHE_TTL_SECS,
};
pub use subscribe::SubscriptionId;

use crate::config::SCROLL_IDLE_MS;
use crate::gesture::{DeviceType, Direction, Millis};
use crate::virtual_list::{Item, Section};
use chrono::{DateTime, Utc};
use log::*;
use subscribe::Subscribers;

/// Observable state container.
///
#[derive(Debug)]
pub struct CanvasStore {
    state: CanvasState,
    subscribers: Subscribers,
    scroll_idle_ms: Millis,
}

impl Default for CanvasStore {
    fn default() -> Self {
        CanvasStore {
            state: CanvasState::default(),
            subscribers: Subscribers::default(),
            scroll_idle_ms: SCROLL_IDLE_MS,
        }
    }
}

impl CanvasStore {
    pub fn new() -> Self {
        CanvasStore::default()
    }

    pub fn with_scroll_idle(mut self, scroll_idle_ms: Millis) -> Self {
        self.scroll_idle_ms = scroll_idle_ms;
        self
    }

    /// Build a store from persisted slices. Anything unreadable is logged
    /// and replaced by defaults.
    ///
    pub fn load_or_default(backend: &dyn StorageBackend) -> Self {
        let mut store = CanvasStore::new();
        if let Err(e) = store.hydrate(backend) {
            warn!("Ignoring persisted store: {}", e);
        }
        store
    }

    // Accessors

    pub fn state(&self) -> &CanvasState {
        &self.state
    }

    pub fn navigation(&self) -> &NavigationState {
        &self.state.navigation
    }

    pub fn scroll(&self) -> &ScrollState {
        &self.state.scroll
    }

    pub fn preferences(&self) -> &UserPreferences {
        &self.state.preferences
    }

    pub fn ui(&self) -> &UiState {
        &self.state.ui
    }

    pub fn cache(&self) -> &DomainCache {
        &self.state.cache
    }

    pub fn performance(&self) -> &PerformanceMetrics {
        &self.state.performance
    }

    pub fn current_view(&self) -> View {
        self.state.navigation.current_view
    }

    // Subscriptions

    /// Register `listener` to run whenever `selector`'s output changes.
    ///
    pub fn subscribe<T, S, L>(&mut self, selector: S, listener: L) -> SubscriptionId
    where
        T: PartialEq + 'static,
        S: Fn(&CanvasState) -> T + 'static,
        L: FnMut(&T) + 'static,
    {
        self.subscribers.add(&self.state, selector, listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.remove(id)
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    fn notify(&mut self) {
        self.subscribers.notify(&self.state);
    }

    // Navigation actions

    /// Jump straight to `view` without a transition.
    ///
    pub fn set_current_view(&mut self, view: View) {
        let nav = &mut self.state.navigation;
        if nav.current_view == view && !nav.is_animating {
            return;
        }
        debug!("Current view set to {}", view.as_str());
        if nav.current_view != view {
            nav.previous_view = Some(nav.current_view);
        }
        nav.current_view = view;
        nav.is_animating = false;
        nav.transition_progress = 0.0;
        nav.transition_target = None;
        nav.is_at_edge = false;
        nav.edge_dwell_time = 0;
        nav.edge_entered_at = None;
        self.notify();
    }

    /// Begin animating toward `target`. Returns `false` if a transition is
    /// already running or `target` is the current view.
    ///
    pub fn start_view_transition(&mut self, target: View) -> bool {
        let nav = &mut self.state.navigation;
        if nav.is_animating || nav.current_view == target {
            return false;
        }
        debug!(
            "Starting view transition {} -> {}",
            nav.current_view.as_str(),
            target.as_str()
        );
        nav.is_animating = true;
        nav.transition_target = Some(target);
        nav.transition_progress = 0.0;
        self.notify();
        true
    }

    /// Update the running transition's progress (0..=100). Ignored when no
    /// transition is running.
    ///
    pub fn set_transition_progress(&mut self, progress: f64) {
        let nav = &mut self.state.navigation;
        if !nav.is_animating {
            return;
        }
        nav.transition_progress = progress.clamp(0.0, 100.0);
        self.notify();
    }

    /// Finish the running transition, making the target view current.
    /// Returns the new view, or `None` if nothing was animating.
    ///
    pub fn complete_view_transition(&mut self) -> Option<View> {
        let nav = &mut self.state.navigation;
        if !nav.is_animating {
            return None;
        }
        let target = nav.transition_target.take().unwrap_or(nav.current_view);
        if target != nav.current_view {
            nav.previous_view = Some(nav.current_view);
        }
        nav.current_view = target;
        nav.is_animating = false;
        nav.transition_progress = 0.0;
        nav.is_at_edge = false;
        nav.edge_dwell_time = 0;
        nav.edge_entered_at = None;
        debug!("View transition complete, now on {}", target.as_str());
        self.notify();
        Some(target)
    }

    // Edge actions

    /// Record whether the active view sits at its exit edge.
    ///
    pub fn set_is_at_edge(&mut self, at_edge: bool, now: Millis) {
        let nav = &mut self.state.navigation;
        if nav.is_at_edge == at_edge {
            return;
        }
        nav.is_at_edge = at_edge;
        nav.edge_dwell_time = 0;
        nav.edge_entered_at = if at_edge { Some(now) } else { None };
        self.notify();
    }

    /// Refresh how long the view has been dwelling at its edge.
    ///
    pub fn update_edge_dwell_time(&mut self, now: Millis) {
        let nav = &mut self.state.navigation;
        let dwell = match (nav.is_at_edge, nav.edge_entered_at) {
            (true, Some(entered)) => now.saturating_sub(entered),
            _ => 0,
        };
        if dwell != nav.edge_dwell_time {
            nav.edge_dwell_time = dwell;
            self.notify();
        }
    }

    pub fn reset_edge_dwell(&mut self) {
        let nav = &mut self.state.navigation;
        if !nav.is_at_edge && nav.edge_dwell_time == 0 && nav.edge_entered_at.is_none() {
            return;
        }
        nav.is_at_edge = false;
        nav.edge_dwell_time = 0;
        nav.edge_entered_at = None;
        self.notify();
    }

    // Scroll actions

    /// Record a new scroll position, deriving direction and velocity from
    /// the previous call.
    ///
    pub fn update_scroll_position(&mut self, x: f64, y: f64, now: Millis) {
        let scroll = &mut self.state.scroll;
        let dy = y - scroll.y;
        if let Some(direction) = Direction::from_delta(dy) {
            scroll.direction = direction.into();
        }
        scroll.velocity = match scroll.last_scroll_time {
            Some(last) if now > last => dy.abs() / (now - last) as f64,
            _ => 0.0,
        };
        scroll.x = x;
        scroll.y = y;
        scroll.is_scrolling = true;
        scroll.last_scroll_time = Some(now);
        self.notify();
    }

    pub fn set_scrolling(&mut self, is_scrolling: bool) {
        let scroll = &mut self.state.scroll;
        if scroll.is_scrolling == is_scrolling {
            return;
        }
        scroll.is_scrolling = is_scrolling;
        if !is_scrolling {
            scroll.velocity = 0.0;
            scroll.direction = ScrollDirection::None;
        }
        self.notify();
    }

    /// Timer upkeep: ends the scrolling flag after a quiet period and keeps
    /// the edge dwell time current.
    ///
    pub fn tick(&mut self, now: Millis) {
        let idle = match self.state.scroll.last_scroll_time {
            Some(last) => self.state.scroll.is_scrolling && now.saturating_sub(last) >= self.scroll_idle_ms,
            None => false,
        };
        if idle {
            self.set_scrolling(false);
        }
        self.update_edge_dwell_time(now);
    }

    // Preference actions

    pub fn set_prefers_reduced_motion(&mut self, value: bool) {
        self.state.preferences.prefers_reduced_motion = value;
        self.notify();
    }

    pub fn mark_onboarding_seen(&mut self) {
        self.state.preferences.has_seen_onboarding = true;
        self.notify();
    }

    pub fn set_preferred_view(&mut self, view: Option<View>) {
        self.state.preferences.preferred_view = view;
        self.notify();
    }

    pub fn set_device_type(&mut self, device: DeviceType) {
        if self.state.preferences.device_type == device {
            return;
        }
        self.state.preferences.device_type = device;
        self.notify();
    }

    pub fn reset_preferences(&mut self) {
        self.state.preferences = UserPreferences::default();
        self.notify();
    }

    // UI actions

    pub fn set_selected_filters<I: IntoIterator<Item = String>>(&mut self, filters: I) {
        self.state.ui.selected_filters = filters.into_iter().collect();
        self.notify();
    }

    /// Flip a section between expanded and collapsed. Returns the new state.
    ///
    pub fn toggle_expanded_section(&mut self, section_id: &str) -> bool {
        let expanded = &mut self.state.ui.expanded_sections;
        let now_expanded = if expanded.remove(section_id) {
            false
        } else {
            expanded.insert(section_id.to_string());
            true
        };
        self.notify();
        now_expanded
    }

    // Cache actions

    pub fn set_hacks(&mut self, hacks: Vec<Item>, fetched_at: DateTime<Utc>) {
        self.state.cache.hacks = hacks;
        self.state.cache.last_fetch = Some(fetched_at);
        self.notify();
    }

    pub fn set_routines(&mut self, routines: Vec<Section>, fetched_at: DateTime<Utc>) {
        self.state.cache.routines = routines;
        self.state.cache.last_fetch = Some(fetched_at);
        self.notify();
    }

    pub fn set_levels(&mut self, levels: Vec<Section>, fetched_at: DateTime<Utc>) {
        self.state.cache.levels = levels;
        self.state.cache.last_fetch = Some(fetched_at);
        self.notify();
    }

    pub fn invalidate_cache(&mut self) {
        self.state.cache = DomainCache::default();
        self.notify();
    }

    // Performance actions

    pub fn update_performance(&mut self, metrics: PerformanceMetrics) {
        self.state.performance = metrics;
        self.notify();
    }

    // Persistence

    /// The slices that survive a reload.
    ///
    pub fn persisted(&self) -> PersistedState {
        PersistedState {
            preferences: self.state.preferences.clone(),
            ui: self.state.ui.clone(),
        }
    }

    /// Write preferences and UI selections to `backend`.
    ///
    pub fn persist(&self, backend: &mut dyn StorageBackend) -> Result<(), StoreError> {
        let raw = persist::encode(&self.persisted())?;
        backend.set(STORE_KEY, &raw)?;
        info!("Persisted canvas store ({} bytes)", raw.len());
        Ok(())
    }

    /// Restore preferences and UI selections from `backend`. Returns whether
    /// anything was found. A preferred view becomes the current view.
    ///
    pub fn hydrate(&mut self, backend: &dyn StorageBackend) -> Result<bool, StoreError> {
        let raw = match backend.get(STORE_KEY)? {
            Some(raw) => raw,
            None => return Ok(false),
        };
        let persisted = persist::decode(&raw)?;
        self.state.preferences = persisted.preferences;
        self.state.ui = persisted.ui;
        if let Some(view) = self.state.preferences.preferred_view {
            self.state.navigation.current_view = view;
        }
        info!("Hydrated canvas store from storage");
        self.notify();
        Ok(true)
    }

    /// Reset the ephemeral slices (navigation, scroll, performance) to a
    /// fresh page load, keeping persisted and cached data.
    ///
    pub fn reset_session(&mut self) {
        let view = self
            .state
            .preferences
            .preferred_view
            .unwrap_or_default();
        self.state.navigation = NavigationState {
            current_view: view,
            ..NavigationState::default()
        };
        self.state.scroll = ScrollState::default();
        self.state.performance = PerformanceMetrics::default();
        self.notify();
    }
}
