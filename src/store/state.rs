//! State slices held by the canvas store.

use crate::gesture::{DeviceType, Direction, Millis};
use crate::virtual_list::{Item, Section};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Conventional freshness window for the domain cache.
pub const DEFAULT_CACHE_TTL_SECS: i64 = 5 * 60;

/// The two canvas views the engine navigates between.
///
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    Skills,
    Library,
}

impl View {
    pub fn as_str(self) -> &'static str {
        match self {
            View::Skills => "skills",
            View::Library => "library",
        }
    }

    /// The view on the other side of the canvas.
    pub fn other(self) -> View {
        match self {
            View::Skills => View::Library,
            View::Library => View::Skills,
        }
    }

    /// The only gesture direction that may leave this view.
    pub fn exit_direction(self) -> Direction {
        match self {
            View::Skills => Direction::Up,
            View::Library => Direction::Down,
        }
    }
}

/// Navigation slice.
///
/// `transition_progress` is non-zero only while `is_animating` is set.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NavigationState {
    pub current_view: View,
    pub previous_view: Option<View>,
    pub is_animating: bool,
    pub transition_progress: f64,
    pub transition_target: Option<View>,
    pub is_at_edge: bool,
    pub edge_dwell_time: Millis,
    pub edge_entered_at: Option<Millis>,
}

/// Scroll direction as observed from consecutive positions.
///
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum ScrollDirection {
    Up,
    Down,
    #[default]
    None,
}

impl From<Direction> for ScrollDirection {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Up => ScrollDirection::Up,
            Direction::Down => ScrollDirection::Down,
        }
    }
}

/// Derived scroll slice. Never persisted.
///
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScrollState {
    pub x: f64,
    pub y: f64,
    pub is_scrolling: bool,
    pub direction: ScrollDirection,
    /// Pixels per millisecond.
    pub velocity: f64,
    pub last_scroll_time: Option<Millis>,
}

/// Preferences that survive across sessions.
///
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserPreferences {
    pub prefers_reduced_motion: bool,
    pub has_seen_onboarding: bool,
    pub preferred_view: Option<View>,
    pub device_type: DeviceType,
}

/// UI filter and expansion selections. Persisted.
///
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UiState {
    pub selected_filters: BTreeSet<String>,
    pub expanded_sections: BTreeSet<String>,
}

/// Cached domain collections. Staleness is the caller's decision.
///
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DomainCache {
    pub hacks: Vec<Item>,
    pub routines: Vec<Section>,
    pub levels: Vec<Section>,
    pub last_fetch: Option<DateTime<Utc>>,
}

impl DomainCache {
    /// Whether the cache is older than `ttl` (or was never filled).
    pub fn is_stale(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        match self.last_fetch {
            Some(fetched) => now - fetched >= ttl,
            None => true,
        }
    }
}

/// Frame-rate and render measurements for the latest interval window.
///
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PerformanceMetrics {
    pub fps: f64,
    pub render_time_ms: f64,
    pub scroll_fps: f64,
    pub dropped_frames: u32,
    pub memory_mb: Option<f64>,
}

/// Everything the store holds.
///
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CanvasState {
    pub navigation: NavigationState,
    pub scroll: ScrollState,
    pub preferences: UserPreferences,
    pub ui: UiState,
    pub cache: DomainCache,
    pub performance: PerformanceMetrics,
}
