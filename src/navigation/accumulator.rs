//! Gesture accumulation state machine.
//!
//! Classified deltas accumulate into a bounded progress value for a single
//! direction. The machine is a set of pure transitions over [`GesturePhase`]
//! so every path can be exercised without real timers:
//!
//! ```text
//! Idle -> Accumulating(dir) -> Triggered -> Idle
//!              |      ^
//!              v      |
//!            Resetting (reversal, idle timeout)
//! ```

use crate::config::NavigationConfig;
use crate::gesture::{DeviceType, Direction, Millis};
use log::*;

/// Why an in-flight gesture was discarded.
///
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ResetReason {
    Reversal,
    IdleTimeout,
    Disabled,
    EdgeLost,
}

/// State of the gesture machine.
///
#[derive(Debug, PartialEq, Clone, Copy, Default)]
pub enum GesturePhase {
    #[default]
    Idle,
    Accumulating {
        direction: Direction,
        accumulated: f64,
        device: DeviceType,
        last_event: Millis,
    },
    /// Transient: progress is zero, and the next delta in `direction` (or in
    /// any direction when `None`) starts a fresh accumulation.
    Resetting {
        reason: ResetReason,
        direction: Option<Direction>,
        device: DeviceType,
        since: Millis,
    },
    /// Fired; deltas are swallowed until the stream goes idle.
    Triggered {
        direction: Direction,
        device: DeviceType,
        last_event: Millis,
    },
}

/// Input to the machine.
///
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum GestureInput {
    /// A qualifying, non-momentum delta.
    Delta {
        direction: Direction,
        magnitude: f64,
        device: DeviceType,
        at: Millis,
    },
    /// Remove progress that turned out to come from momentum.
    Retract { amount: f64 },
    /// Timer check.
    Tick { now: Millis },
    /// Externally cancel the gesture.
    Cancel { reason: ResetReason, at: Millis },
}

/// Side effect requested by a transition.
///
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum GestureEffect {
    Progress {
        progress: f64,
        direction: Direction,
        visible: bool,
    },
    Navigate(Direction),
    Reset(ResetReason),
}

/// Threshold a device must accumulate to reach 100%.
///
pub fn device_threshold(device: DeviceType, config: &NavigationConfig) -> f64 {
    let multiplier = match device {
        DeviceType::Mouse => config.mouse_multiplier,
        DeviceType::Trackpad => config.trackpad_multiplier,
        DeviceType::Touch => config.touch_multiplier,
        DeviceType::Unknown => 1.0,
    };
    config.base_threshold * multiplier
}

/// Idle window after which an unfinished gesture is dropped.
///
pub fn idle_timeout(device: DeviceType, config: &NavigationConfig) -> Millis {
    match device {
        DeviceType::Trackpad => config.trackpad_idle_timeout_ms,
        _ => config.idle_timeout_ms,
    }
}

/// Progress percentage for an accumulated amount, capped at 100.
///
pub fn progress_for(accumulated: f64, device: DeviceType, config: &NavigationConfig) -> f64 {
    let threshold = device_threshold(device, config);
    if threshold <= 0.0 {
        return 100.0;
    }
    (accumulated * 100.0 / threshold).clamp(0.0, 100.0)
}

fn progress_effect(progress: f64, direction: Direction, config: &NavigationConfig) -> GestureEffect {
    GestureEffect::Progress {
        progress,
        direction,
        visible: progress >= config.indicator_min_progress,
    }
}

fn hidden(direction: Direction) -> GestureEffect {
    GestureEffect::Progress {
        progress: 0.0,
        direction,
        visible: false,
    }
}

/// Add `magnitude` to `accumulated`, firing when the threshold is reached.
fn accumulate(
    direction: Direction,
    accumulated: f64,
    magnitude: f64,
    device: DeviceType,
    at: Millis,
    config: &NavigationConfig,
    effects: &mut Vec<GestureEffect>,
) -> GesturePhase {
    let accumulated = accumulated + magnitude;
    let progress = progress_for(accumulated, device, config);
    effects.push(progress_effect(progress, direction, config));
    if progress >= 100.0 {
        effects.push(GestureEffect::Navigate(direction));
        return GesturePhase::Triggered {
            direction,
            device,
            last_event: at,
        };
    }
    GesturePhase::Accumulating {
        direction,
        accumulated,
        device,
        last_event: at,
    }
}

/// Pure transition function of the gesture machine.
///
pub fn transition(
    phase: GesturePhase,
    input: GestureInput,
    config: &NavigationConfig,
) -> (GesturePhase, Vec<GestureEffect>) {
    let mut effects = Vec::new();
    let next = match (phase, input) {
        (
            _,
            GestureInput::Cancel { reason, at },
        ) => match phase {
            GesturePhase::Idle => GesturePhase::Idle,
            GesturePhase::Accumulating { direction, device, .. }
            | GesturePhase::Triggered { direction, device, .. } => {
                effects.push(GestureEffect::Reset(reason));
                effects.push(hidden(direction));
                GesturePhase::Resetting {
                    reason,
                    direction: None,
                    device,
                    since: at,
                }
            }
            GesturePhase::Resetting { device, .. } => GesturePhase::Resetting {
                reason,
                direction: None,
                device,
                since: at,
            },
        },

        (GesturePhase::Idle, GestureInput::Delta { direction, magnitude, device, at }) => {
            accumulate(direction, 0.0, magnitude, device, at, config, &mut effects)
        }

        (
            GesturePhase::Accumulating {
                direction: current,
                accumulated,
                ..
            },
            GestureInput::Delta { direction, magnitude, device, at },
        ) => {
            if direction == current {
                accumulate(direction, accumulated, magnitude, device, at, config, &mut effects)
            } else {
                effects.push(GestureEffect::Reset(ResetReason::Reversal));
                effects.push(hidden(direction));
                GesturePhase::Resetting {
                    reason: ResetReason::Reversal,
                    direction: Some(direction),
                    device,
                    since: at,
                }
            }
        }

        (
            GesturePhase::Resetting {
                direction: expected, ..
            },
            GestureInput::Delta { direction, magnitude, device, at },
        ) => match expected {
            Some(expected) if expected != direction => GesturePhase::Resetting {
                reason: ResetReason::Reversal,
                direction: Some(direction),
                device,
                since: at,
            },
            _ => accumulate(direction, 0.0, magnitude, device, at, config, &mut effects),
        },

        (
            GesturePhase::Triggered { direction, device, .. },
            GestureInput::Delta { at, .. },
        ) => GesturePhase::Triggered {
            direction,
            device,
            last_event: at,
        },

        (
            GesturePhase::Accumulating {
                direction,
                accumulated,
                device,
                last_event,
            },
            GestureInput::Retract { amount },
        ) => {
            let accumulated = (accumulated - amount).max(0.0);
            let progress = progress_for(accumulated, device, config);
            effects.push(progress_effect(progress, direction, config));
            GesturePhase::Accumulating {
                direction,
                accumulated,
                device,
                last_event,
            }
        }
        (phase, GestureInput::Retract { .. }) => phase,

        (
            GesturePhase::Accumulating {
                direction,
                device,
                last_event,
                ..
            },
            GestureInput::Tick { now },
        ) => {
            if now.saturating_sub(last_event) >= idle_timeout(device, config) {
                effects.push(GestureEffect::Reset(ResetReason::IdleTimeout));
                effects.push(hidden(direction));
                GesturePhase::Resetting {
                    reason: ResetReason::IdleTimeout,
                    direction: None,
                    device,
                    since: now,
                }
            } else {
                phase
            }
        }
        (GesturePhase::Triggered { device, last_event, .. }, GestureInput::Tick { now })
            if now.saturating_sub(last_event) >= idle_timeout(device, config) =>
        {
            GesturePhase::Idle
        }
        (GesturePhase::Resetting { device, since, .. }, GestureInput::Tick { now })
            if now.saturating_sub(since) >= idle_timeout(device, config) =>
        {
            GesturePhase::Idle
        }
        (phase, GestureInput::Tick { .. }) => phase,
    };
    (next, effects)
}

/// Stateful wrapper around [`transition`].
///
#[derive(Debug, Clone)]
pub struct GestureAccumulator {
    phase: GesturePhase,
    config: NavigationConfig,
}

impl GestureAccumulator {
    pub fn new(config: NavigationConfig) -> Self {
        GestureAccumulator {
            phase: GesturePhase::Idle,
            config,
        }
    }

    pub fn phase(&self) -> GesturePhase {
        self.phase
    }

    pub fn config(&self) -> &NavigationConfig {
        &self.config
    }

    /// Feed one input and return the effects to dispatch.
    ///
    pub fn apply(&mut self, input: GestureInput) -> Vec<GestureEffect> {
        let (next, effects) = transition(self.phase, input, &self.config);
        if std::mem::discriminant(&next) != std::mem::discriminant(&self.phase) {
            debug!("Gesture phase {:?} -> {:?}", self.phase, next);
        }
        self.phase = next;
        effects
    }

    /// Amount accumulated toward the threshold in the current gesture.
    ///
    pub fn accumulated(&self) -> f64 {
        match self.phase {
            GesturePhase::Accumulating { accumulated, .. } => accumulated,
            _ => 0.0,
        }
    }

    /// Current progress in percent.
    ///
    pub fn progress(&self) -> f64 {
        match self.phase {
            GesturePhase::Accumulating {
                accumulated, device, ..
            } => progress_for(accumulated, device, &self.config),
            _ => 0.0,
        }
    }

    /// Direction of the in-flight gesture, if any.
    ///
    pub fn direction(&self) -> Option<Direction> {
        match self.phase {
            GesturePhase::Accumulating { direction, .. }
            | GesturePhase::Triggered { direction, .. } => Some(direction),
            GesturePhase::Resetting { direction, .. } => direction,
            GesturePhase::Idle => None,
        }
    }

    /// When the host should next call `Tick`, if a timer is pending.
    ///
    pub fn deadline(&self) -> Option<Millis> {
        match self.phase {
            GesturePhase::Idle => None,
            GesturePhase::Accumulating {
                device, last_event, ..
            }
            | GesturePhase::Triggered {
                device, last_event, ..
            } => Some(last_event + idle_timeout(device, &self.config)),
            GesturePhase::Resetting { device, since, .. } => {
                Some(since + idle_timeout(device, &self.config))
            }
        }
    }

    /// Drop all state without emitting effects.
    ///
    pub fn clear(&mut self) {
        self.phase = GesturePhase::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delta(direction: Direction, magnitude: f64, at: Millis) -> GestureInput {
        GestureInput::Delta {
            direction,
            magnitude,
            device: DeviceType::Trackpad,
            at,
        }
    }

    fn navigations(effects: &[GestureEffect]) -> Vec<Direction> {
        effects
            .iter()
            .filter_map(|e| match e {
                GestureEffect::Navigate(d) => Some(*d),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_thresholds_scale_per_device() {
        let config = NavigationConfig::default();
        assert_eq!(device_threshold(DeviceType::Trackpad, &config), 400.0);
        assert_eq!(device_threshold(DeviceType::Mouse, &config), 600.0);
        assert_eq!(device_threshold(DeviceType::Touch, &config), 300.0);
        assert_eq!(idle_timeout(DeviceType::Trackpad, &config), 1500);
        assert_eq!(idle_timeout(DeviceType::Mouse, &config), 500);
    }

    #[test]
    fn test_fires_exactly_once_and_resets() {
        let mut acc = GestureAccumulator::new(NavigationConfig::default());
        let mut fired = Vec::new();
        for (i, m) in [50.0, 60.0, 70.0, 80.0, 90.0, 50.0, 40.0].iter().enumerate() {
            let effects = acc.apply(delta(Direction::Down, *m, i as u64 * 20));
            fired.extend(navigations(&effects));
        }
        assert_eq!(fired, vec![Direction::Down]);
        assert_eq!(acc.progress(), 0.0);
        assert_eq!(acc.accumulated(), 0.0);
        assert!(matches!(acc.phase(), GesturePhase::Triggered { .. }));

        // Still swallowed while the stream keeps going.
        let effects = acc.apply(delta(Direction::Down, 500.0, 200));
        assert!(effects.is_empty());
        assert_eq!(acc.progress(), 0.0);
    }

    #[test]
    fn test_cooldown_ends_after_idle() {
        let mut acc = GestureAccumulator::new(NavigationConfig::default());
        acc.apply(delta(Direction::Down, 400.0, 0));
        assert!(matches!(acc.phase(), GesturePhase::Triggered { .. }));
        acc.apply(GestureInput::Tick { now: 1000 });
        assert!(matches!(acc.phase(), GesturePhase::Triggered { .. }));
        acc.apply(GestureInput::Tick { now: 1500 });
        assert_eq!(acc.phase(), GesturePhase::Idle);
        let effects = acc.apply(delta(Direction::Down, 400.0, 1600));
        assert_eq!(navigations(&effects), vec![Direction::Down]);
    }

    #[test]
    fn test_reversal_resets_without_firing() {
        let mut acc = GestureAccumulator::new(NavigationConfig::default());
        acc.apply(delta(Direction::Down, 300.0, 0));
        assert_eq!(acc.progress(), 75.0);

        let effects = acc.apply(delta(Direction::Up, 390.0, 16));
        assert!(navigations(&effects).is_empty());
        assert!(effects.contains(&GestureEffect::Reset(ResetReason::Reversal)));
        assert_eq!(acc.progress(), 0.0);
        assert_eq!(acc.direction(), Some(Direction::Up));

        // Re-seeded with the new direction; indicator hidden below 10%.
        let effects = acc.apply(delta(Direction::Up, 20.0, 32));
        assert_eq!(
            effects,
            vec![GestureEffect::Progress {
                progress: 5.0,
                direction: Direction::Up,
                visible: false
            }]
        );
        let effects = acc.apply(delta(Direction::Up, 30.0, 48));
        assert!(matches!(
            effects[0],
            GestureEffect::Progress { visible: true, .. }
        ));
    }

    #[test]
    fn test_idle_timeout_resets() {
        let mut acc = GestureAccumulator::new(NavigationConfig::default());
        acc.apply(GestureInput::Delta {
            direction: Direction::Up,
            magnitude: 200.0,
            device: DeviceType::Mouse,
            at: 100,
        });
        assert_eq!(acc.deadline(), Some(600));
        assert!(acc.apply(GestureInput::Tick { now: 599 }).is_empty());
        let effects = acc.apply(GestureInput::Tick { now: 600 });
        assert!(effects.contains(&GestureEffect::Reset(ResetReason::IdleTimeout)));
        assert_eq!(acc.progress(), 0.0);
        acc.apply(GestureInput::Tick { now: 1100 });
        assert_eq!(acc.phase(), GesturePhase::Idle);
        assert_eq!(acc.deadline(), None);
    }

    #[test]
    fn test_trackpad_tolerates_longer_gaps() {
        let mut acc = GestureAccumulator::new(NavigationConfig::default());
        acc.apply(delta(Direction::Down, 100.0, 0));
        acc.apply(GestureInput::Tick { now: 1000 });
        assert_eq!(acc.progress(), 25.0);
    }

    #[test]
    fn test_retract_removes_momentum_contribution() {
        let mut acc = GestureAccumulator::new(NavigationConfig::default());
        acc.apply(delta(Direction::Down, 120.0, 0));
        acc.apply(delta(Direction::Down, 90.0, 16));
        acc.apply(GestureInput::Retract { amount: 210.0 });
        assert_eq!(acc.accumulated(), 0.0);
        acc.apply(GestureInput::Retract { amount: 50.0 });
        assert_eq!(acc.accumulated(), 0.0);
    }

    #[test]
    fn test_cancel_clears_in_flight_gesture() {
        let mut acc = GestureAccumulator::new(NavigationConfig::default());
        assert!(acc
            .apply(GestureInput::Cancel {
                reason: ResetReason::Disabled,
                at: 0
            })
            .is_empty());
        acc.apply(delta(Direction::Down, 100.0, 0));
        let effects = acc.apply(GestureInput::Cancel {
            reason: ResetReason::Disabled,
            at: 10,
        });
        assert_eq!(effects[0], GestureEffect::Reset(ResetReason::Disabled));
        assert_eq!(acc.progress(), 0.0);
    }
}
