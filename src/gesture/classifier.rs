use super::momentum::MomentumDetector;
use super::{
    Classification, DeltaMode, DeviceType, Direction, PlatformCapabilities, WheelInput,
};
use crate::config::GestureConfig;
use log::*;
use std::collections::VecDeque;

/// Infers the input device from wheel deltas and flags momentum.
///
/// Classification is sticky: once the device resolves it never changes for
/// the lifetime of the classifier, and touch cannot be overridden.
#[derive(Debug, Clone)]
pub struct GestureClassifier {
    config: GestureConfig,
    device: DeviceType,
    samples: VecDeque<f64>,
    momentum: MomentumDetector,
}

impl GestureClassifier {
    /// Create a classifier. Touch-capable platforms resolve to touch
    /// immediately, regardless of delta shape.
    ///
    pub fn new(config: GestureConfig, capabilities: &PlatformCapabilities) -> Self {
        let device = if capabilities.touch {
            DeviceType::Touch
        } else {
            DeviceType::Unknown
        };
        GestureClassifier {
            samples: VecDeque::with_capacity(config.classification_window),
            config,
            device,
            momentum: MomentumDetector::default(),
        }
    }

    /// Seed the device class, e.g. from a persisted preference. Ignored once
    /// the device has already resolved.
    ///
    pub fn with_device(mut self, device: DeviceType) -> Self {
        if !self.device.is_resolved() && device.is_resolved() {
            self.device = device;
        }
        self
    }

    pub fn device(&self) -> DeviceType {
        self.device
    }

    /// Record that a touch stream was observed. Touch wins over any earlier
    /// wheel-based classification.
    ///
    pub fn mark_touch(&mut self) {
        if self.device != DeviceType::Touch {
            debug!("Touch input detected, switching device class from {:?}", self.device);
            self.device = DeviceType::Touch;
            self.momentum.reset();
        }
    }

    /// Whether the current burst has been flagged as momentum.
    ///
    pub fn in_momentum(&self) -> bool {
        self.momentum.is_active()
    }

    /// Drop per-gesture state (momentum pattern) while keeping the device.
    ///
    pub fn reset_gesture(&mut self) {
        self.momentum.reset();
    }

    /// Classify one wheel event. Returns `None` for a zero delta, which has
    /// no direction.
    ///
    pub fn classify(&mut self, input: &WheelInput) -> Option<Classification> {
        let pixels = self.to_pixels(input);
        let direction = Direction::from_delta(pixels)?;
        let magnitude = pixels.abs();

        if !self.device.is_resolved() {
            self.observe_sample(magnitude, input.delta_mode);
        }

        let normalized = self.normalize(magnitude, self.device);
        let (is_momentum, retracted_magnitude) = if self.device == DeviceType::Trackpad {
            let verdict = self
                .momentum
                .observe(direction, magnitude, normalized, input.timestamp, &self.config);
            (verdict.is_momentum, verdict.retracted)
        } else {
            (false, 0.0)
        };

        let classification = Classification {
            direction,
            normalized_magnitude: normalized,
            device: self.device,
            is_momentum,
            retracted_magnitude,
        };
        trace!(
            "Classified wheel delta {:.1} as {:?} (momentum: {})",
            pixels,
            classification.device,
            is_momentum
        );
        Some(classification)
    }

    /// Scale a raw magnitude for the given device. Mouse deltas above the
    /// saturation point are compressed so a single high-resolution tick
    /// cannot satisfy the navigation threshold on its own.
    ///
    pub fn normalize(&self, magnitude: f64, device: DeviceType) -> f64 {
        match device {
            DeviceType::Mouse if magnitude > self.config.mouse_saturation => {
                self.config.mouse_saturation
                    + (magnitude - self.config.mouse_saturation) * self.config.mouse_compression
            }
            _ => magnitude,
        }
    }

    fn to_pixels(&self, input: &WheelInput) -> f64 {
        match input.delta_mode {
            DeltaMode::Pixel => input.delta_y,
            DeltaMode::Line => input.delta_y * self.config.line_height_px,
            DeltaMode::Page => input.delta_y * self.config.page_height_px,
        }
    }

    fn observe_sample(&mut self, magnitude: f64, mode: DeltaMode) {
        // Only discrete wheels report line or page deltas.
        if mode != DeltaMode::Pixel {
            self.resolve(DeviceType::Mouse);
            return;
        }

        self.samples.push_back(magnitude);
        while self.samples.len() > self.config.classification_window {
            self.samples.pop_front();
        }
        if self.samples.len() < self.config.min_classification_samples {
            return;
        }

        let average = self.samples.iter().sum::<f64>() / self.samples.len() as f64;
        let consistent = self
            .samples
            .iter()
            .all(|&sample| sample > self.config.mouse_min_sample);
        if average > self.config.mouse_average_threshold && consistent {
            self.resolve(DeviceType::Mouse);
        } else if self.samples.len() >= self.config.classification_window {
            self.resolve(DeviceType::Trackpad);
        }
    }

    fn resolve(&mut self, device: DeviceType) {
        debug!("Input device classified as {:?}", device);
        self.device = device;
        self.samples.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> GestureClassifier {
        GestureClassifier::new(GestureConfig::default(), &PlatformCapabilities::default())
    }

    fn feed(classifier: &mut GestureClassifier, deltas: &[f64], start: u64, step: u64) -> Vec<Classification> {
        deltas
            .iter()
            .enumerate()
            .filter_map(|(i, &d)| classifier.classify(&WheelInput::pixels(d, start + i as u64 * step)))
            .collect()
    }

    #[test]
    fn test_large_consistent_deltas_are_mouse() {
        let mut c = classifier();
        let out = feed(&mut c, &[120.0, 120.0, 120.0], 0, 100);
        assert_eq!(out[0].device, DeviceType::Unknown);
        assert_eq!(out[1].device, DeviceType::Unknown);
        assert_eq!(out[2].device, DeviceType::Mouse);
        assert_eq!(c.device(), DeviceType::Mouse);
    }

    #[test]
    fn test_small_deltas_resolve_to_trackpad_after_full_window() {
        let mut c = classifier();
        let out = feed(&mut c, &[4.0, 9.0, 14.0, 12.0, 8.0], 0, 100);
        assert!(out[..4].iter().all(|o| o.device == DeviceType::Unknown));
        assert_eq!(out[4].device, DeviceType::Trackpad);
    }

    #[test]
    fn test_one_small_sample_prevents_mouse() {
        let mut c = classifier();
        feed(&mut c, &[300.0, 300.0, 10.0, 300.0, 300.0], 0, 100);
        assert_eq!(c.device(), DeviceType::Trackpad);
    }

    #[test]
    fn test_classification_is_sticky() {
        let mut c = classifier();
        feed(&mut c, &[120.0, 120.0, 120.0], 0, 100);
        feed(&mut c, &[2.0, 2.0, 2.0, 2.0, 2.0], 1000, 100);
        assert_eq!(c.device(), DeviceType::Mouse);
    }

    #[test]
    fn test_line_mode_is_mouse() {
        let mut c = classifier();
        let out = c.classify(&WheelInput::lines(3.0, 0)).unwrap();
        assert_eq!(out.device, DeviceType::Mouse);
        assert_eq!(out.normalized_magnitude, 48.0);
        assert_eq!(out.direction, Direction::Down);
    }

    #[test]
    fn test_touch_capability_takes_precedence() {
        let caps = PlatformCapabilities {
            touch: true,
            ..PlatformCapabilities::default()
        };
        let mut c = GestureClassifier::new(GestureConfig::default(), &caps).with_device(DeviceType::Mouse);
        assert_eq!(c.device(), DeviceType::Touch);
        let out = c.classify(&WheelInput::pixels(-500.0, 0)).unwrap();
        assert_eq!(out.device, DeviceType::Touch);
        assert_eq!(out.direction, Direction::Up);
    }

    #[test]
    fn test_mark_touch_overrides_wheel_classification() {
        let mut c = classifier().with_device(DeviceType::Trackpad);
        c.mark_touch();
        assert_eq!(c.device(), DeviceType::Touch);
    }

    #[test]
    fn test_mouse_saturation_compresses_large_ticks() {
        let c = classifier();
        assert_eq!(c.normalize(100.0, DeviceType::Mouse), 100.0);
        assert_eq!(c.normalize(1150.0, DeviceType::Mouse), 150.0 + 1000.0 * 0.25);
        assert_eq!(c.normalize(1150.0, DeviceType::Trackpad), 1150.0);
    }

    #[test]
    fn test_zero_delta_has_no_classification() {
        let mut c = classifier();
        assert!(c.classify(&WheelInput::pixels(0.0, 0)).is_none());
    }

    #[test]
    fn test_trackpad_momentum_burst_is_flagged() {
        let mut c = classifier().with_device(DeviceType::Trackpad);
        let out = feed(&mut c, &[120.0, 90.0, 55.0, 30.0], 0, 16);
        assert!(!out[0].is_momentum);
        assert!(!out[1].is_momentum);
        assert!(out[2].is_momentum);
        assert_eq!(out[2].retracted_magnitude, 210.0);
        assert!(out[3].is_momentum);
        assert!(c.in_momentum());
    }

    #[test]
    fn test_mouse_never_flags_momentum() {
        let mut c = classifier().with_device(DeviceType::Mouse);
        let out = feed(&mut c, &[120.0, 90.0, 55.0], 0, 16);
        assert!(out.iter().all(|o| !o.is_momentum));
    }
}
