use super::flatten::FlatList;
use super::interaction::is_item_clickable;
use super::item::{ItemData, Section};
use super::sizing::RowSizer;
use super::window::{Align, VariableSizeList};
use crate::config::VirtualizationConfig;
use crate::navigation::ScrollMetrics;
use crate::store::{SessionStore, StorageBackend, View};
use log::*;
use std::collections::HashSet;
use std::ops::Range;

/// Callbacks emitted by the row engine.
///
pub trait RowHooks {
    fn on_item_activate(&mut self, _item_id: &str) {}
}

impl RowHooks for () {}

/// A mounted row with its layout.
///
#[derive(Debug, Clone, PartialEq)]
pub struct VisibleRow<'a> {
    pub index: usize,
    pub offset: u64,
    pub height: u32,
    pub data: &'a ItemData,
}

/// Virtualized rows for one canvas view.
///
#[derive(Debug)]
pub struct VirtualRowEngine<R: RowHooks = ()> {
    view: View,
    rows: FlatList,
    sizer: RowSizer,
    list: VariableSizeList,
    hooks: R,
}

impl VirtualRowEngine<()> {
    pub fn new(view: View, config: &VirtualizationConfig) -> Self {
        VirtualRowEngine::with_hooks(view, config, ())
    }
}

impl<R: RowHooks> VirtualRowEngine<R> {
    pub fn with_hooks(view: View, config: &VirtualizationConfig, hooks: R) -> Self {
        VirtualRowEngine {
            view,
            rows: FlatList::new(),
            sizer: RowSizer::new(config.clone()),
            list: VariableSizeList::new(0, config.overscan),
            hooks,
        }
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn hooks(&self) -> &R {
        &self.hooks
    }

    pub fn hooks_mut(&mut self) -> &mut R {
        &mut self.hooks
    }

    /// Replace the section input. Layout is invalidated from the first row
    /// that changed. Returns whether anything changed.
    ///
    pub fn set_sections(&mut self, sections: &[Section]) -> bool {
        match self.rows.update(sections) {
            Some(first_changed) => {
                self.list.set_item_count(self.rows.len());
                self.list.reset_after_index(first_changed);
                true
            }
            None => false,
        }
    }

    pub fn rows(&self) -> &[ItemData] {
        self.rows.rows()
    }

    pub fn row(&self, index: usize) -> Option<&ItemData> {
        self.rows.get(index)
    }

    pub fn generation(&self) -> u64 {
        self.rows.generation()
    }

    pub fn row_height(&self, index: usize) -> u32 {
        self.sizer.row_height(self.rows.rows(), index)
    }

    pub fn set_viewport_height(&mut self, height: u32) {
        self.list.set_viewport_height(height);
    }

    pub fn scroll_offset(&self) -> u64 {
        self.list.scroll_offset()
    }

    pub fn total_size(&mut self) -> u64 {
        let (rows, sizer) = (self.rows.rows(), &self.sizer);
        self.list.total_size(&|i| sizer.row_height(rows, i))
    }

    pub fn visible_range(&mut self) -> Range<usize> {
        let (rows, sizer) = (self.rows.rows(), &self.sizer);
        self.list.visible_range(&|i| sizer.row_height(rows, i))
    }

    /// Rows to mount, overscan included.
    ///
    pub fn visible_rows(&mut self) -> Vec<VisibleRow<'_>> {
        let (rows, sizer) = (self.rows.rows(), &self.sizer);
        let size = |i| sizer.row_height(rows, i);
        let range = self.list.rendered_range(&size);
        let mut mounted = Vec::with_capacity(range.len());
        for index in range {
            if let (Some((offset, height)), Some(data)) = (self.list.row_bounds(index, &size), rows.get(index)) {
                mounted.push(VisibleRow {
                    index,
                    offset,
                    height,
                    data,
                });
            }
        }
        mounted
    }

    pub fn scroll_to(&mut self, offset: u64) -> u64 {
        let (rows, sizer) = (self.rows.rows(), &self.sizer);
        self.list.scroll_to(offset, &|i| sizer.row_height(rows, i))
    }

    pub fn scroll_by(&mut self, delta: i64) -> u64 {
        let (rows, sizer) = (self.rows.rows(), &self.sizer);
        self.list.scroll_by(delta, &|i| sizer.row_height(rows, i))
    }

    pub fn scroll_to_item(&mut self, index: usize, align: Align) -> u64 {
        let (rows, sizer) = (self.rows.rows(), &self.sizer);
        self.list.scroll_to_item(index, align, &|i| sizer.row_height(rows, i))
    }

    pub fn scroll_metrics(&mut self) -> ScrollMetrics {
        let (rows, sizer) = (self.rows.rows(), &self.sizer);
        self.list.scroll_metrics(&|i| sizer.row_height(rows, i))
    }

    /// Activate the row at `index`. Only item rows whose prerequisites are
    /// all completed respond. The current offset is saved for this view
    /// before the activation is reported, so returning restores it.
    ///
    pub fn activate<B: StorageBackend>(
        &mut self,
        index: usize,
        completed: &HashSet<String>,
        session: &mut SessionStore<B>,
    ) -> Option<String> {
        let item = self.rows.get(index)?.item()?;
        if !is_item_clickable(item, completed) {
            debug!("Item {} is locked", item.id);
            return None;
        }
        let id = item.id.clone();
        session.save_scroll_position(self.view, self.list.scroll_offset());
        self.hooks.on_item_activate(&id);
        Some(id)
    }

    /// Save the current offset, e.g. before a gesture navigates away.
    ///
    pub fn save_scroll_position<B: StorageBackend>(&self, session: &mut SessionStore<B>) {
        session.save_scroll_position(self.view, self.list.scroll_offset());
    }

    /// Apply and clear a saved offset for this view. Returns the applied
    /// offset when one was found.
    ///
    pub fn restore_scroll_position<B: StorageBackend>(&mut self, session: &mut SessionStore<B>) -> Option<u64> {
        let saved = session.take_scroll_position(self.view)?;
        let applied = self.scroll_to(saved);
        debug!(
            "Restored {} scroll offset {} (saved {})",
            self.view.as_str(),
            applied,
            saved
        );
        Some(applied)
    }

    /// Every row is resident, so every index reports as loaded.
    ///
    pub fn is_item_loaded(&self, _index: usize) -> bool {
        true
    }

    /// Hook for incremental population. Nothing to fetch while all sections
    /// are resident.
    ///
    pub fn load_more_items(&mut self, start: usize, stop: usize) {
        trace!("load_more_items({}, {}) ignored, all rows resident", start, stop);
    }
}
