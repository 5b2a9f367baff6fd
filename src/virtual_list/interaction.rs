use super::item::Item;
use std::collections::HashSet;

/// An item can be activated once every prerequisite is among `completed`.
/// Evaluated on each render pass and never cached.
///
pub fn is_item_clickable(item: &Item, completed: &HashSet<String>) -> bool {
    item.prerequisites.iter().all(|id| completed.contains(id))
}
