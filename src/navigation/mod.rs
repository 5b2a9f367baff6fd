//! Navigation module.
//!
//! Turns classified scroll intent into view changes:
//! - Gesture accumulation state machine
//! - Touch displacement tracking
//! - Edge detection at the container boundary
//! - View-transition phases and callback hooks

mod accumulator;
mod edge;
mod hooks;
mod navigator;
mod touch;
mod transition;

pub use accumulator::{
    device_threshold, idle_timeout, progress_for, transition, GestureAccumulator, GestureEffect,
    GestureInput, GesturePhase, ResetReason,
};
pub use edge::{EdgeDetector, ScrollMetrics};
pub use hooks::{NavigationHooks, TransitionHooks};
pub use navigator::ScrollNavigator;
pub use touch::{TouchInput, TouchPhase, TouchProgress, TouchTracker};
pub use transition::TransitionDriver;
