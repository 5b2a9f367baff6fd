//! Variable-size windowing.
//!
//! Row offsets are measured lazily from a size function and cached. The
//! cache is valid up to the last measured index; [`VariableSizeList::reset_after_index`]
//! drops everything from a given index onward when heights change there.

use crate::navigation::ScrollMetrics;
use std::ops::Range;

/// Where to place a row when scrolling to it.
///
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum Align {
    Start,
    Center,
    End,
    /// Scroll as little as possible to make the row fully visible.
    #[default]
    Auto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RowMetadata {
    offset: u64,
    size: u32,
}

/// Scroll position and row layout of a virtualized list.
///
#[derive(Debug, Clone)]
pub struct VariableSizeList {
    item_count: usize,
    viewport_height: u32,
    overscan: usize,
    scroll_offset: u64,
    measured: Vec<RowMetadata>,
}

impl VariableSizeList {
    pub fn new(viewport_height: u32, overscan: usize) -> Self {
        VariableSizeList {
            item_count: 0,
            viewport_height,
            overscan,
            scroll_offset: 0,
            measured: Vec::new(),
        }
    }

    pub fn item_count(&self) -> usize {
        self.item_count
    }

    pub fn viewport_height(&self) -> u32 {
        self.viewport_height
    }

    pub fn scroll_offset(&self) -> u64 {
        self.scroll_offset
    }

    pub fn set_viewport_height(&mut self, height: u32) {
        self.viewport_height = height;
    }

    pub fn set_item_count(&mut self, count: usize) {
        self.item_count = count;
        self.measured.truncate(count);
    }

    /// Forget measurements from `index` onward.
    ///
    pub fn reset_after_index(&mut self, index: usize) {
        self.measured.truncate(index);
    }

    fn measure_through<F: Fn(usize) -> u32>(&mut self, index: usize, size: &F) {
        if index >= self.item_count {
            return;
        }
        while self.measured.len() <= index {
            let next = self.measured.len();
            let offset = self
                .measured
                .last()
                .map(|m| m.offset + m.size as u64)
                .unwrap_or(0);
            self.measured.push(RowMetadata {
                offset,
                size: size(next),
            });
        }
    }

    /// Offset and height of the row at `index`.
    ///
    pub fn row_bounds<F: Fn(usize) -> u32>(&mut self, index: usize, size: &F) -> Option<(u64, u32)> {
        self.measure_through(index, size);
        self.measured.get(index).map(|m| (m.offset, m.size))
    }

    /// Total content height.
    ///
    pub fn total_size<F: Fn(usize) -> u32>(&mut self, size: &F) -> u64 {
        if self.item_count == 0 {
            return 0;
        }
        self.measure_through(self.item_count - 1, size);
        self.measured
            .last()
            .map(|m| m.offset + m.size as u64)
            .unwrap_or(0)
    }

    fn max_offset<F: Fn(usize) -> u32>(&mut self, size: &F) -> u64 {
        self.total_size(size)
            .saturating_sub(self.viewport_height as u64)
    }

    /// Index of the row containing `offset`.
    fn row_at<F: Fn(usize) -> u32>(&mut self, offset: u64, size: &F) -> usize {
        let total = self.total_size(size);
        if offset >= total {
            return self.item_count.saturating_sub(1);
        }
        // `measured` is complete after `total_size`.
        match self.measured.binary_search_by(|m| m.offset.cmp(&offset)) {
            Ok(index) => index,
            Err(insert) => insert.saturating_sub(1),
        }
    }

    /// Rows intersecting the viewport.
    ///
    pub fn visible_range<F: Fn(usize) -> u32>(&mut self, size: &F) -> Range<usize> {
        if self.item_count == 0 {
            return 0..0;
        }
        let start = self.row_at(self.scroll_offset, size);
        let bottom = self.scroll_offset + self.viewport_height as u64;
        let mut stop = start + 1;
        while stop < self.item_count {
            match self.row_bounds(stop, size) {
                Some((offset, _)) if offset < bottom => stop += 1,
                _ => break,
            }
        }
        start..stop
    }

    /// Rows to mount: the visible range widened by the overscan count.
    ///
    pub fn rendered_range<F: Fn(usize) -> u32>(&mut self, size: &F) -> Range<usize> {
        let visible = self.visible_range(size);
        if visible.is_empty() {
            return visible;
        }
        let start = visible.start.saturating_sub(self.overscan);
        let stop = (visible.end + self.overscan).min(self.item_count);
        start..stop
    }

    /// Scroll to `offset`, clamped to the scrollable range. Returns the
    /// applied offset.
    ///
    pub fn scroll_to<F: Fn(usize) -> u32>(&mut self, offset: u64, size: &F) -> u64 {
        self.scroll_offset = offset.min(self.max_offset(size));
        self.scroll_offset
    }

    pub fn scroll_by<F: Fn(usize) -> u32>(&mut self, delta: i64, size: &F) -> u64 {
        let target = if delta < 0 {
            self.scroll_offset.saturating_sub(delta.unsigned_abs())
        } else {
            self.scroll_offset.saturating_add(delta as u64)
        };
        self.scroll_to(target, size)
    }

    /// Bring the row at `index` into view.
    ///
    pub fn scroll_to_item<F: Fn(usize) -> u32>(&mut self, index: usize, align: Align, size: &F) -> u64 {
        if self.item_count == 0 {
            return self.scroll_offset;
        }
        let index = index.min(self.item_count - 1);
        let (offset, height) = match self.row_bounds(index, size) {
            Some(bounds) => bounds,
            None => return self.scroll_offset,
        };
        let viewport = self.viewport_height as u64;
        let height = height as u64;
        let start = offset;
        let end = (offset + height).saturating_sub(viewport);
        let target = match align {
            Align::Start => start,
            Align::End => end,
            Align::Center => (offset + height / 2).saturating_sub(viewport / 2),
            Align::Auto => {
                if self.scroll_offset <= start && self.scroll_offset >= end {
                    self.scroll_offset
                } else if self.scroll_offset > start {
                    start
                } else {
                    end
                }
            }
        };
        self.scroll_to(target, size)
    }

    /// Container measurements for edge detection.
    ///
    pub fn scroll_metrics<F: Fn(usize) -> u32>(&mut self, size: &F) -> ScrollMetrics {
        ScrollMetrics {
            scroll_top: self.scroll_offset as f64,
            client_height: self.viewport_height as f64,
            scroll_height: self.total_size(size) as f64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform(_: usize) -> u32 {
        100
    }

    fn list(count: usize) -> VariableSizeList {
        let mut list = VariableSizeList::new(350, 2);
        list.set_item_count(count);
        list
    }

    #[test]
    fn test_visible_and_rendered_ranges() {
        let mut list = list(50);
        assert_eq!(list.visible_range(&uniform), 0..4);
        assert_eq!(list.rendered_range(&uniform), 0..6);

        list.scroll_to(1050, &uniform);
        assert_eq!(list.visible_range(&uniform), 10..14);
        assert_eq!(list.rendered_range(&uniform), 8..16);
    }

    #[test]
    fn test_scroll_is_clamped() {
        let mut list = list(10);
        assert_eq!(list.total_size(&uniform), 1000);
        assert_eq!(list.scroll_to(5000, &uniform), 650);
        assert_eq!(list.scroll_by(-100, &uniform), 550);
        assert_eq!(list.scroll_by(-1000, &uniform), 0);
        assert_eq!(list.rendered_range(&uniform).end, 6);
    }

    #[test]
    fn test_reset_after_index_remeasures() {
        let mut list = list(10);
        assert_eq!(list.total_size(&uniform), 1000);
        let tall = |i: usize| if i >= 5 { 200 } else { 100 };
        // Cached heights win until invalidated.
        assert_eq!(list.total_size(&tall), 1000);
        list.reset_after_index(5);
        assert_eq!(list.total_size(&tall), 1500);
        assert_eq!(list.row_bounds(6, &tall), Some((700, 200)));
    }

    #[test]
    fn test_scroll_to_item_alignment() {
        let mut list = list(20);
        assert_eq!(list.scroll_to_item(10, Align::Start, &uniform), 1000);
        assert_eq!(list.scroll_to_item(10, Align::End, &uniform), 750);
        assert_eq!(list.scroll_to_item(10, Align::Center, &uniform), 875);
        // Already visible: Auto leaves the offset alone.
        assert_eq!(list.scroll_to_item(9, Align::Auto, &uniform), 875);
        assert_eq!(list.scroll_to_item(2, Align::Auto, &uniform), 200);
        assert_eq!(list.scroll_to_item(19, Align::Auto, &uniform), 1650);
    }

    #[test]
    fn test_empty_list() {
        let mut list = list(0);
        assert_eq!(list.visible_range(&uniform), 0..0);
        assert_eq!(list.total_size(&uniform), 0);
        assert_eq!(list.scroll_to(100, &uniform), 0);
    }
}
