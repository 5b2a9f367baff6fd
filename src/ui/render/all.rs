use super::{canvas, indicator, log, status, Frame};
use crate::shell::Shell;
use ratatui::layout::{Constraint, Direction, Layout};

/// Specify the height of the log panel in lines.
///
const LOG_HEIGHT: u16 = 8;

/// Render all widgets according to the shell state.
///
pub fn all(frame: &mut Frame, shell: &mut Shell) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(5),
            Constraint::Length(LOG_HEIGHT),
        ])
        .split(frame.size());

    status(frame, rows[0], shell);
    canvas(frame, rows[1], shell);
    indicator(frame, rows[1], shell);
    log(frame, rows[2], shell);
}
