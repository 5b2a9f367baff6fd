use super::Frame;
use crate::shell::Shell;
use crate::ui::widgets::styling;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};

/// Render the one-line status bar.
///
pub fn status(frame: &mut Frame, size: Rect, shell: &Shell) {
    let store = shell.store();
    let perf = store.performance();
    let prefs = store.preferences();
    let device = format!("{:?}", prefs.device_type).to_lowercase();
    let motion = if prefs.prefers_reduced_motion { "reduced" } else { "full" };

    let line = Line::from(vec![
        Span::styled(" canvas-nav ", styling::active_block_title_style()),
        Span::styled(
            format!(
                "│ {} │ {} │ {:>7}px │ {:.0} fps │ {} dropped │ motion {} │ {} done ",
                store.current_view().as_str(),
                device,
                store.scroll().y as u64,
                perf.fps,
                perf.dropped_frames,
                motion,
                shell.completed().len(),
            ),
            styling::normal_text_style(),
        ),
        Span::styled(
            "│ Tab switch · j/k select · Enter activate · m motion · q quit",
            styling::connector_style(),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), size);
}
