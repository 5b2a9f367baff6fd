//! Section flattening.
//!
//! Each section contributes a header row, its items ordered by `position`,
//! and a connector row to the next section (none after the last).

use super::item::{ItemData, Section};
use log::*;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Flatten `sections` into one ordered row list. Items with equal positions
/// keep their input order.
///
pub fn flatten_sections(sections: &[Section]) -> Vec<ItemData> {
    let mut rows = Vec::with_capacity(
        sections.iter().map(|s| s.items.len() + 2).sum::<usize>(),
    );
    for (section_index, section) in sections.iter().enumerate() {
        rows.push(ItemData::SectionHeader {
            section_id: section.id.clone(),
            name: section.name.clone(),
            item_count: section.items.len(),
        });

        let mut items: Vec<_> = section.items.iter().collect();
        items.sort_by_key(|item| item.position);
        let last = items.len().saturating_sub(1);
        for (index, item) in items.into_iter().enumerate() {
            rows.push(ItemData::Item {
                section_id: section.id.clone(),
                item: item.clone(),
                index_in_section: index,
                is_last_in_section: index == last,
            });
        }

        if let Some(next) = sections.get(section_index + 1) {
            rows.push(ItemData::SectionConnector {
                from_section: section.id.clone(),
                to_section: next.id.clone(),
            });
        }
    }
    rows
}

fn fingerprint(sections: &[Section]) -> u64 {
    let mut hasher = DefaultHasher::new();
    sections.hash(&mut hasher);
    hasher.finish()
}

/// Memoized flat list. Recomputes only when the input's fingerprint changes
/// and tracks a generation counter for downstream caches.
///
#[derive(Debug, Clone, Default)]
pub struct FlatList {
    rows: Vec<ItemData>,
    fingerprint: Option<u64>,
    generation: u64,
}

impl FlatList {
    pub fn new() -> Self {
        FlatList::default()
    }

    pub fn rows(&self) -> &[ItemData] {
        &self.rows
    }

    pub fn get(&self, index: usize) -> Option<&ItemData> {
        self.rows.get(index)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Bumped every time the rows change.
    ///
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Refresh from `sections`. Returns the index of the first row that
    /// differs from the previous list, or `None` when nothing changed.
    ///
    pub fn update(&mut self, sections: &[Section]) -> Option<usize> {
        let next_fingerprint = fingerprint(sections);
        if self.fingerprint == Some(next_fingerprint) {
            return None;
        }
        self.fingerprint = Some(next_fingerprint);

        let rows = flatten_sections(sections);
        let first_changed = self
            .rows
            .iter()
            .zip(rows.iter())
            .position(|(old, new)| old != new)
            .or_else(|| {
                if self.rows.len() != rows.len() {
                    Some(self.rows.len().min(rows.len()))
                } else {
                    None
                }
            });

        if let Some(index) = first_changed {
            self.rows = rows;
            self.generation += 1;
            debug!(
                "Flattened {} rows (generation {}, first change at {})",
                self.rows.len(),
                self.generation,
                index
            );
        }
        first_changed
    }
}
