use ratatui::style::{Color, Modifier, Style};

/// Return the border style for the active canvas block.
///
pub fn active_block_border_style() -> Style {
    Style::default().fg(Color::Cyan)
}

/// Return the border style for normal blocks.
///
pub fn normal_block_border_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Return the title style for active blocks.
///
pub fn active_block_title_style() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

/// Return the style for section header rows.
///
pub fn section_header_style() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

/// Return the style for connector rows.
///
pub fn connector_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Return the style for the selected row.
///
pub fn active_list_item_style() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD | Modifier::REVERSED)
}

/// Return the style for completed items.
///
pub fn completed_item_style() -> Style {
    Style::default().fg(Color::Green)
}

/// Return the style for locked items.
///
pub fn locked_item_style() -> Style {
    Style::default()
        .fg(Color::DarkGray)
        .add_modifier(Modifier::DIM)
}

/// Return the style for normal text.
///
pub fn normal_text_style() -> Style {
    Style::default().fg(Color::White)
}

/// Return the style for the navigation gauge.
///
pub fn gauge_style() -> Style {
    Style::default().fg(Color::Magenta).bg(Color::Black)
}
