//! Gesture classification module.
//!
//! This module turns raw wheel deltas into classified, normalized scroll
//! intent:
//! - Input device inference (mouse, trackpad, touch)
//! - Trackpad momentum detection and suppression
//! - Delta normalization per device class

mod classifier;
mod momentum;

pub use classifier::GestureClassifier;

use serde::{Deserialize, Serialize};

/// Host-supplied monotonic timestamp in milliseconds.
pub type Millis = u64;

/// Scroll direction of a gesture.
///
/// `Down` means content moves toward its end (positive `deltaY`).
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    /// Direction of a signed delta, or `None` for a zero delta.
    pub fn from_delta(delta: f64) -> Option<Direction> {
        if delta > 0.0 {
            Some(Direction::Down)
        } else if delta < 0.0 {
            Some(Direction::Up)
        } else {
            None
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }
}

/// Input device class inferred from the event stream.
///
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    Mouse,
    Trackpad,
    Touch,
    #[default]
    Unknown,
}

impl DeviceType {
    pub fn is_resolved(self) -> bool {
        self != DeviceType::Unknown
    }
}

/// Unit of a wheel delta, mirroring `WheelEvent.deltaMode`.
///
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum DeltaMode {
    #[default]
    Pixel,
    Line,
    Page,
}

/// A single wheel event as delivered by the host.
///
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelInput {
    pub delta_y: f64,
    pub delta_mode: DeltaMode,
    pub timestamp: Millis,
}

impl WheelInput {
    /// Pixel-mode wheel event.
    pub fn pixels(delta_y: f64, timestamp: Millis) -> Self {
        WheelInput {
            delta_y,
            delta_mode: DeltaMode::Pixel,
            timestamp,
        }
    }

    /// Line-mode wheel event, as emitted by discrete mouse wheels.
    pub fn lines(delta_y: f64, timestamp: Millis) -> Self {
        WheelInput {
            delta_y,
            delta_mode: DeltaMode::Line,
            timestamp,
        }
    }
}

/// Platform feature flags probed once by the host.
///
/// Missing features degrade the dependent behaviour instead of failing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlatformCapabilities {
    pub touch: bool,
    pub memory_api: bool,
}

/// Result of classifying one wheel event.
///
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub direction: Direction,
    pub normalized_magnitude: f64,
    pub device: DeviceType,
    pub is_momentum: bool,
    /// Normalized magnitude already let through from the burst that turned
    /// out to be momentum. Non-zero only on the event that first flags it.
    pub retracted_magnitude: f64,
}

impl Classification {
    /// Whether this event should count toward accumulation.
    pub fn counts(&self) -> bool {
        self.device.is_resolved() && !self.is_momentum
    }
}
