//! Selector-based change notification.

use super::state::CanvasState;

/// Handle returned by [`super::CanvasStore::subscribe`].
///
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&CanvasState)>;

/// Listeners keyed by id. Each one remembers the last value its selector
/// produced and only fires when that value changes.
#[derive(Default)]
pub(crate) struct Subscribers {
    next_id: u64,
    entries: Vec<(SubscriptionId, Listener)>,
}

impl Subscribers {
    pub fn add<T, S, L>(&mut self, state: &CanvasState, selector: S, mut listener: L) -> SubscriptionId
    where
        T: PartialEq + 'static,
        S: Fn(&CanvasState) -> T + 'static,
        L: FnMut(&T) + 'static,
    {
        let mut last = selector(state);
        let entry = move |state: &CanvasState| {
            let next = selector(state);
            if next != last {
                listener(&next);
                last = next;
            }
        };

        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, Box::new(entry)));
        id
    }

    pub fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    pub fn notify(&mut self, state: &CanvasState) {
        for (_, listener) in self.entries.iter_mut() {
            listener(state);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl std::fmt::Debug for Subscribers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscribers")
            .field("count", &self.entries.len())
            .finish()
    }
}
