use super::Frame;
use crate::gesture::Direction;
use crate::shell::Shell;
use crate::ui::widgets::styling;
use ratatui::{
    layout::Rect,
    widgets::{Block, Borders, Clear, Gauge},
};

/// Specify the widest the indicator gauge may grow.
///
const MAX_WIDTH: u16 = 56;

/// Render the navigation progress gauge over the canvas edge the gesture is
/// heading for. Nothing is drawn while the indicator is hidden.
///
pub fn indicator(frame: &mut Frame, size: Rect, shell: &Shell) {
    let navigation = shell.store().navigation();
    let (label, progress, at_top) = if navigation.is_animating {
        let target = navigation
            .transition_target
            .unwrap_or_else(|| navigation.current_view.other());
        (
            format!("Opening {}", target.as_str()),
            shell.transition_progress(),
            target.exit_direction() == Direction::Down,
        )
    } else if let Some((progress, direction)) = shell.indicator() {
        (
            format!(
                "Keep scrolling {} for {}",
                direction.as_str(),
                navigation.current_view.other().as_str()
            ),
            progress,
            direction == Direction::Up,
        )
    } else {
        return;
    };

    if size.height < 5 || size.width < 8 {
        return;
    }
    let width = size.width.saturating_sub(4).min(MAX_WIDTH);
    let area = Rect {
        x: size.x + (size.width - width) / 2,
        y: if at_top {
            size.y + 1
        } else {
            size.y + size.height - 4
        },
        width,
        height: 3,
    };

    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL))
        .gauge_style(styling::gauge_style())
        .percent(progress.round().clamp(0.0, 100.0) as u16)
        .label(label);
    frame.render_widget(Clear, area);
    frame.render_widget(gauge, area);
}
