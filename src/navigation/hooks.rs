use crate::gesture::Direction;
use crate::store::View;

/// Callbacks for the phases of a view transition. The rendering layer
/// implements these to drive visuals; every method defaults to a no-op.
///
pub trait TransitionHooks {
    fn on_transition_start(&mut self, _from: View, _to: View) {}
    fn on_transition_progress(&mut self, _progress: f64) {}
    fn on_transition_complete(&mut self, _view: View) {}
}

/// Callbacks emitted by the scroll navigator.
///
pub trait NavigationHooks: TransitionHooks {
    /// A gesture reached its threshold. Called exactly once per trigger.
    fn on_navigate(&mut self, _direction: Direction) {}

    /// Indicator progress changed. `progress` is zero while the indicator
    /// should be hidden.
    fn on_progress_change(&mut self, _progress: f64, _direction: Direction) {}
}

impl TransitionHooks for () {}
impl NavigationHooks for () {}

/// Hooks that record every call, for assertions.
///
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct Recorder {
    pub navigations: Vec<Direction>,
    pub progress: Vec<(f64, Direction)>,
    pub starts: Vec<(View, View)>,
    pub transition_progress: Vec<f64>,
    pub completed: Vec<View>,
}

#[cfg(test)]
impl TransitionHooks for Recorder {
    fn on_transition_start(&mut self, from: View, to: View) {
        self.starts.push((from, to));
    }

    fn on_transition_progress(&mut self, progress: f64) {
        self.transition_progress.push(progress);
    }

    fn on_transition_complete(&mut self, view: View) {
        self.completed.push(view);
    }
}

#[cfg(test)]
impl NavigationHooks for Recorder {
    fn on_navigate(&mut self, direction: Direction) {
        self.navigations.push(direction);
    }

    fn on_progress_change(&mut self, progress: f64, direction: Direction) {
        self.progress.push((progress, direction));
    }
}
