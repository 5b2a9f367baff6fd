use super::Frame;
use crate::shell::Shell;
use crate::ui::widgets::styling;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
};

/// Render log widget with the newest entries that fit.
///
pub fn log(frame: &mut Frame, size: Rect, shell: &Shell) {
    let block = Block::default()
        .title("Log")
        .borders(Borders::ALL)
        .border_style(styling::normal_block_border_style());
    let visible = block.inner(size).height as usize;

    let items: Vec<ListItem> = shell
        .logs()
        .tail(visible)
        .into_iter()
        .map(|entry| {
            ListItem::new(Line::from(vec![Span::styled(
                entry,
                styling::normal_text_style(),
            )]))
        })
        .collect();

    let list = List::new(items)
        .style(styling::normal_text_style())
        .block(block);
    frame.render_widget(list, size);
}
