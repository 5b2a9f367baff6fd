use crate::gesture::Direction;

/// Scroll container measurements, mirroring `scrollTop`, `clientHeight`
/// and `scrollHeight`.
///
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollMetrics {
    pub scroll_top: f64,
    pub client_height: f64,
    pub scroll_height: f64,
}

/// Decides whether a container sits at the boundary a gesture would leave
/// through.
///
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeDetector {
    threshold: f64,
}

impl EdgeDetector {
    pub fn new(threshold: f64) -> Self {
        EdgeDetector {
            threshold: threshold.max(0.0),
        }
    }

    /// `Up` checks the top edge, `Down` the bottom edge. Content shorter than
    /// the viewport is at both edges.
    ///
    pub fn evaluate(&self, metrics: &ScrollMetrics, direction: Direction) -> bool {
        match direction {
            Direction::Up => metrics.scroll_top <= self.threshold,
            Direction::Down => {
                metrics.scroll_top + metrics.client_height
                    >= metrics.scroll_height - self.threshold
            }
        }
    }
}
