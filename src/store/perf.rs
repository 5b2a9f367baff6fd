//! Frame-rate sampling.
//!
//! The host calls [`PerformanceMonitor::record_frame`] once per animation
//! frame. At the end of each interval window the monitor publishes a
//! [`PerformanceMetrics`] snapshot into the store and starts a new window.

use super::state::PerformanceMetrics;
use super::CanvasStore;
use crate::gesture::{Millis, PlatformCapabilities};
use log::*;

/// Length of one measurement window.
pub const DEFAULT_INTERVAL_MS: Millis = 1000;

/// Frame budget at 60 Hz.
pub const FRAME_BUDGET_MS: f64 = 1000.0 / 60.0;

#[derive(Debug, Clone, Default)]
struct Window {
    started_at: Option<Millis>,
    last_frame: Option<Millis>,
    frames: u32,
    scroll_frames: u32,
    scroll_ms: Millis,
    dropped: u32,
    render_total_ms: f64,
    render_count: u32,
    memory_mb: Option<f64>,
}

/// Measurement loop state. Writes to the store, never reads back from it
/// except for the scrolling flag.
///
#[derive(Debug, Clone)]
pub struct PerformanceMonitor {
    interval_ms: Millis,
    capabilities: PlatformCapabilities,
    window: Window,
    warned_memory: bool,
}

impl PerformanceMonitor {
    pub fn new(capabilities: PlatformCapabilities) -> Self {
        PerformanceMonitor {
            interval_ms: DEFAULT_INTERVAL_MS,
            capabilities,
            window: Window::default(),
            warned_memory: false,
        }
    }

    pub fn with_interval(mut self, interval_ms: Millis) -> Self {
        self.interval_ms = interval_ms.max(1);
        self
    }

    /// Record one frame. Returns the published metrics when this frame
    /// closes the window.
    ///
    pub fn record_frame(&mut self, store: &mut CanvasStore, now: Millis) -> Option<PerformanceMetrics> {
        let scrolling = store.scroll().is_scrolling;
        let window = &mut self.window;
        let started_at = *window.started_at.get_or_insert(now);

        if let Some(last) = window.last_frame {
            let delta = now.saturating_sub(last);
            if delta as f64 > FRAME_BUDGET_MS * 1.5 {
                let missed = (delta as f64 / FRAME_BUDGET_MS).round() as u32;
                window.dropped += missed.saturating_sub(1);
            }
            if scrolling {
                window.scroll_ms += delta;
            }
        }
        window.last_frame = Some(now);
        window.frames += 1;
        if scrolling {
            window.scroll_frames += 1;
        }

        let elapsed = now.saturating_sub(started_at);
        if elapsed < self.interval_ms {
            return None;
        }

        let metrics = self.snapshot(elapsed);
        store.update_performance(metrics.clone());
        self.window = Window {
            started_at: Some(now),
            last_frame: Some(now),
            ..Window::default()
        };
        Some(metrics)
    }

    /// Record how long one render pass took.
    ///
    pub fn record_render_time(&mut self, duration_ms: f64) {
        self.window.render_total_ms += duration_ms.max(0.0);
        self.window.render_count += 1;
    }

    /// Record heap usage. Skipped when the platform has no memory API.
    ///
    pub fn record_memory(&mut self, megabytes: f64) {
        if !self.capabilities.memory_api {
            if !self.warned_memory {
                warn!("Memory profiling API unavailable, skipping memory sampling");
                self.warned_memory = true;
            }
            return;
        }
        self.window.memory_mb = Some(megabytes);
    }

    /// Forget the current window, e.g. when the view unmounts.
    ///
    pub fn reset(&mut self) {
        self.window = Window::default();
    }

    fn snapshot(&self, elapsed: Millis) -> PerformanceMetrics {
        let window = &self.window;
        // The first frame only opens the window.
        let counted = window.frames.saturating_sub(1) as f64;
        let fps = if elapsed > 0 {
            counted * 1000.0 / elapsed as f64
        } else {
            0.0
        };
        let scroll_fps = if window.scroll_ms > 0 {
            window.scroll_frames as f64 * 1000.0 / window.scroll_ms as f64
        } else {
            0.0
        };
        let render_time_ms = if window.render_count > 0 {
            window.render_total_ms / window.render_count as f64
        } else {
            0.0
        };
        PerformanceMetrics {
            fps,
            render_time_ms,
            scroll_fps,
            dropped_frames: window.dropped,
            memory_mb: window.memory_mb,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steady_frames_publish_after_interval() {
        let mut store = CanvasStore::new();
        let mut monitor = PerformanceMonitor::new(PlatformCapabilities::default());
        let mut published = None;
        // 20ms frames: 50 fps, no drops.
        for i in 0..=50u64 {
            if let Some(m) = monitor.record_frame(&mut store, i * 20) {
                published = Some(m);
            }
        }
        let metrics = published.unwrap();
        assert_eq!(metrics.fps, 50.0);
        assert_eq!(metrics.dropped_frames, 0);
        assert_eq!(store.performance(), &metrics);
    }

    #[test]
    fn test_long_frames_count_as_dropped() {
        let mut store = CanvasStore::new();
        let mut monitor = PerformanceMonitor::new(PlatformCapabilities::default()).with_interval(100);
        monitor.record_frame(&mut store, 0);
        // One 67ms gap is four frame budgets: three dropped.
        monitor.record_frame(&mut store, 67);
        monitor.record_frame(&mut store, 83);
        let metrics = monitor.record_frame(&mut store, 100).unwrap();
        assert_eq!(metrics.dropped_frames, 3);
    }

    #[test]
    fn test_render_time_is_averaged() {
        let mut store = CanvasStore::new();
        let mut monitor = PerformanceMonitor::new(PlatformCapabilities::default()).with_interval(10);
        monitor.record_render_time(2.0);
        monitor.record_render_time(4.0);
        monitor.record_frame(&mut store, 0);
        let metrics = monitor.record_frame(&mut store, 10).unwrap();
        assert_eq!(metrics.render_time_ms, 3.0);

        // Next window starts clean.
        let metrics = monitor.record_frame(&mut store, 20).unwrap();
        assert_eq!(metrics.render_time_ms, 0.0);
    }

    #[test]
    fn test_memory_sampling_degrades_without_api() {
        let mut store = CanvasStore::new();
        let mut monitor = PerformanceMonitor::new(PlatformCapabilities::default()).with_interval(10);
        monitor.record_memory(64.0);
        monitor.record_frame(&mut store, 0);
        assert_eq!(monitor.record_frame(&mut store, 10).unwrap().memory_mb, None);

        let caps = PlatformCapabilities {
            memory_api: true,
            ..PlatformCapabilities::default()
        };
        let mut monitor = PerformanceMonitor::new(caps).with_interval(10);
        monitor.record_memory(64.0);
        monitor.record_frame(&mut store, 0);
        assert_eq!(monitor.record_frame(&mut store, 10).unwrap().memory_mb, Some(64.0));
    }

    #[test]
    fn test_scroll_fps_only_counts_scrolling_frames() {
        let mut store = CanvasStore::new();
        let mut monitor = PerformanceMonitor::new(PlatformCapabilities::default()).with_interval(100);
        monitor.record_frame(&mut store, 0);
        store.update_scroll_position(0.0, 10.0, 0);
        monitor.record_frame(&mut store, 20);
        monitor.record_frame(&mut store, 40);
        store.set_scrolling(false);
        let metrics = monitor.record_frame(&mut store, 100).unwrap();
        // Two scrolling frames over 40ms.
        assert_eq!(metrics.scroll_fps, 50.0);
    }
}
