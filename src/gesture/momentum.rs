//! Trackpad momentum detection.
//!
//! Trackpads keep emitting decaying deltas after the fingers lift. A burst of
//! rapid events whose magnitudes fall off steadily is treated as inertia, and
//! everything after it is dropped until the stream pauses.

use super::{Direction, Millis};
use crate::config::GestureConfig;
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy)]
struct Sample {
    magnitude: f64,
    normalized: f64,
}

/// Verdict for one observed event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct MomentumVerdict {
    pub is_momentum: bool,
    pub retracted: f64,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct MomentumDetector {
    pattern: VecDeque<Sample>,
    last_event: Option<Millis>,
    last_direction: Option<Direction>,
    active: bool,
}

impl MomentumDetector {
    /// Record an event and decide whether it is momentum.
    ///
    /// A gap of at least `momentum_window_ms` or a change of direction starts
    /// a new burst, which clears the pattern buffer and the momentum flag.
    pub fn observe(
        &mut self,
        direction: Direction,
        magnitude: f64,
        normalized: f64,
        now: Millis,
        config: &GestureConfig,
    ) -> MomentumVerdict {
        let rapid = matches!(
            self.last_event,
            Some(prev) if now.saturating_sub(prev) < config.momentum_window_ms
        );
        self.last_event = Some(now);
        let reversed = self.last_direction.map_or(false, |last| last != direction);
        self.last_direction = Some(direction);

        if !rapid || reversed {
            self.pattern.clear();
            self.active = false;
        }
        if self.active {
            return MomentumVerdict {
                is_momentum: true,
                retracted: 0.0,
            };
        }

        self.pattern.push_back(Sample {
            magnitude,
            normalized,
        });
        while self.pattern.len() > config.momentum_pattern_len {
            self.pattern.pop_front();
        }

        if self.pattern.len() >= config.momentum_pattern_len && self.is_decaying(config) {
            self.active = true;
            // Every sample but the current one was already let through.
            let retracted = self
                .pattern
                .iter()
                .take(self.pattern.len() - 1)
                .map(|s| s.normalized)
                .sum();
            self.pattern.clear();
            return MomentumVerdict {
                is_momentum: true,
                retracted,
            };
        }

        MomentumVerdict {
            is_momentum: false,
            retracted: 0.0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn reset(&mut self) {
        self.pattern.clear();
        self.last_event = None;
        self.last_direction = None;
        self.active = false;
    }

    fn is_decaying(&self, config: &GestureConfig) -> bool {
        let (first, last) = match (self.pattern.front(), self.pattern.back()) {
            (Some(first), Some(last)) => (first.magnitude, last.magnitude),
            _ => return false,
        };
        let non_increasing = self
            .pattern
            .iter()
            .zip(self.pattern.iter().skip(1))
            .all(|(prev, next)| next.magnitude <= prev.magnitude * config.momentum_growth_tolerance);
        non_increasing && first > last * config.momentum_decay_ratio
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn observe_all(detector: &mut MomentumDetector, samples: &[(f64, Millis)]) -> Vec<MomentumVerdict> {
        let config = GestureConfig::default();
        samples
            .iter()
            .map(|&(m, t)| {
                let direction = if m < 0.0 { Direction::Up } else { Direction::Down };
                detector.observe(direction, m.abs(), m.abs(), t, &config)
            })
            .collect()
    }

    #[test]
    fn test_decaying_burst_is_momentum() {
        let mut detector = MomentumDetector::default();
        let verdicts = observe_all(&mut detector, &[(120.0, 1000), (90.0, 1016), (55.0, 1032)]);
        assert!(!verdicts[0].is_momentum);
        assert!(!verdicts[1].is_momentum);
        assert!(verdicts[2].is_momentum);
        assert_eq!(verdicts[2].retracted, 210.0);
        assert!(detector.is_active());
    }

    #[test]
    fn test_momentum_sticks_until_gap() {
        let mut detector = MomentumDetector::default();
        observe_all(&mut detector, &[(120.0, 0), (90.0, 16), (55.0, 32)]);
        let verdicts = observe_all(&mut detector, &[(80.0, 48), (30.0, 64)]);
        assert!(verdicts.iter().all(|v| v.is_momentum && v.retracted == 0.0));

        // A pause longer than the window starts a fresh gesture.
        let verdicts = observe_all(&mut detector, &[(40.0, 200)]);
        assert!(!verdicts[0].is_momentum);
        assert!(!detector.is_active());
    }

    #[test]
    fn test_direction_change_starts_new_burst() {
        let mut detector = MomentumDetector::default();
        let verdicts = observe_all(&mut detector, &[(120.0, 0), (-90.0, 16), (55.0, 32)]);
        assert!(verdicts.iter().all(|v| !v.is_momentum));

        // A decaying burst only retracts samples of its own direction.
        let verdicts = observe_all(&mut detector, &[(100.0, 48), (-120.0, 64), (-90.0, 80), (-55.0, 96)]);
        assert!(verdicts[3].is_momentum);
        assert_eq!(verdicts[3].retracted, 210.0);

        // Reversing inside the window ends the momentum run.
        let verdicts = observe_all(&mut detector, &[(-40.0, 112), (60.0, 128)]);
        assert!(verdicts[0].is_momentum);
        assert!(!verdicts[1].is_momentum);
    }

    #[test]
    fn test_slow_events_never_form_a_pattern() {
        let mut detector = MomentumDetector::default();
        let verdicts = observe_all(&mut detector, &[(120.0, 0), (90.0, 100), (55.0, 200)]);
        assert!(verdicts.iter().all(|v| !v.is_momentum));
    }

    #[test]
    fn test_growing_or_flat_bursts_are_intent() {
        let mut detector = MomentumDetector::default();
        let verdicts = observe_all(&mut detector, &[(20.0, 0), (40.0, 16), (60.0, 32)]);
        assert!(verdicts.iter().all(|v| !v.is_momentum));

        let mut detector = MomentumDetector::default();
        // Non-increasing but not a material decay.
        let verdicts = observe_all(&mut detector, &[(50.0, 0), (48.0, 16), (45.0, 32)]);
        assert!(verdicts.iter().all(|v| !v.is_momentum));
    }

    #[test]
    fn test_small_wobble_within_tolerance_still_decays() {
        let mut detector = MomentumDetector::default();
        // 95 is within 1.1x of 90.
        let verdicts = observe_all(&mut detector, &[(90.0, 0), (95.0, 10), (40.0, 20)]);
        assert!(verdicts[2].is_momentum);
    }
}
