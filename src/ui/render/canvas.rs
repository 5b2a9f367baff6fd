use super::Frame;
use crate::shell::{Shell, PX_PER_LINE};
use crate::store::View;
use crate::ui::widgets::styling;
use crate::virtual_list::{is_item_clickable, ItemData};
use ratatui::{
    layout::Rect,
    style::Style,
    text::Span,
    widgets::{Block, Borders, Paragraph},
};
use std::collections::HashSet;

/// Render the active canvas view from its virtualized window.
///
pub fn canvas(frame: &mut Frame, size: Rect, shell: &mut Shell) {
    let title = match shell.store().current_view() {
        View::Skills => " Skills ",
        View::Library => " Library ",
    };
    let block = Block::default()
        .title(Span::styled(title, styling::active_block_title_style()))
        .borders(Borders::ALL)
        .border_style(styling::active_block_border_style());
    let inner = block.inner(size);
    frame.render_widget(block, size);

    let now = shell.now();
    shell.set_viewport_lines(inner.height, now);
    let selected = shell.selected();
    let completed = shell.completed().clone();

    let engine = shell.active_engine_mut();
    let scroll = engine.scroll_offset() as i64;
    for row in engine.visible_rows() {
        let (top, bottom) = row_lines(row.offset, row.height, scroll);
        let start = top.max(0);
        let end = bottom.min(inner.height as i64);
        if start >= end {
            continue;
        }
        let area = Rect {
            x: inner.x,
            y: inner.y + start as u16,
            width: inner.width,
            height: (end - start) as u16,
        };
        let (text, style) = describe(row.data, row.index == selected, &completed);
        frame.render_widget(Paragraph::new(text).style(style), area);
    }
}

/// Terminal lines `[top, bottom)` a row covers relative to the viewport.
/// Both edges come from pixel offsets so rounding never accumulates.
///
fn row_lines(offset: u64, height: u32, scroll: i64) -> (i64, i64) {
    let line = PX_PER_LINE as i64;
    let top = (offset as i64 - scroll).div_euclid(line);
    let bottom = (offset as i64 + height as i64 - scroll).div_euclid(line);
    (top, bottom.max(top + 1))
}

/// Label and style for one row.
///
fn describe(row: &ItemData, selected: bool, completed: &HashSet<String>) -> (String, Style) {
    let (text, style) = match row {
        ItemData::SectionHeader {
            name, item_count, ..
        } => (
            format!("▌ {} ({} items)", name, item_count),
            styling::section_header_style(),
        ),
        ItemData::Item { item, .. } => {
            if completed.contains(&item.id) {
                (format!("  [x] {}", item.name), styling::completed_item_style())
            } else if is_item_clickable(item, completed) {
                (format!("  [ ] {}", item.name), styling::normal_text_style())
            } else {
                (format!("  [-] {}", item.name), styling::locked_item_style())
            }
        }
        ItemData::SectionConnector { .. } => ("    │".to_string(), styling::connector_style()),
    };
    if selected {
        (text, styling::active_list_item_style())
    } else {
        (text, style)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_stay_on_pixel_grid() {
        // Header 80, then items 136 tall: edges land at 80, 216, 352, 488.
        assert_eq!(row_lines(0, 80, 0), (0, 4));
        assert_eq!(row_lines(80, 136, 0), (4, 10));
        assert_eq!(row_lines(216, 136, 0), (10, 17));
        assert_eq!(row_lines(352, 136, 0), (17, 24));
        // Consecutive rows never overlap or leave gaps.
        assert_eq!(row_lines(80, 136, 0).1, row_lines(216, 136, 0).0);
    }

    #[test]
    fn test_rows_above_viewport_are_negative() {
        assert_eq!(row_lines(0, 80, 100), (-5, -1));
        assert_eq!(row_lines(80, 136, 100), (-1, 5));
        // Rows shorter than a line still get one.
        assert_eq!(row_lines(40, 10, 0), (2, 3));
    }
}
