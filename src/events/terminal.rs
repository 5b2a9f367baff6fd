use crate::shell::Shell;
use anyhow::Result;
use crossterm::{
    event,
    event::{
        Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent,
        MouseEventKind,
    },
};
use log::*;
use std::{sync::mpsc, thread, time::Duration};

/// Specify terminal event poll rate in milliseconds.
///
const TICK_RATE_IN_MS: u64 = 16;

/// Specify different terminal event types.
///
#[derive(Debug)]
pub enum Event {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize(u16, u16),
    Tick,
}

/// Specify struct for managing terminal events channel.
///
pub struct Handler {
    rx: mpsc::Receiver<Event>,
    _tx: mpsc::Sender<Event>,
}

impl Default for Handler {
    fn default() -> Self {
        Handler::new()
    }
}

impl Handler {
    /// Return new instance after spawning new input polling thread.
    ///
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        let tx_clone = tx.clone();
        thread::spawn(move || loop {
            let tick_rate = Duration::from_millis(TICK_RATE_IN_MS);
            if event::poll(tick_rate).unwrap_or(false) {
                let forwarded = match event::read() {
                    Ok(CrosstermEvent::Key(key)) => Some(Event::Key(key)),
                    Ok(CrosstermEvent::Mouse(mouse)) => Some(Event::Mouse(mouse)),
                    Ok(CrosstermEvent::Resize(width, height)) => Some(Event::Resize(width, height)),
                    Ok(_) => None,
                    Err(e) => {
                        warn!("Failed to read terminal event: {}", e);
                        None
                    }
                };
                if let Some(event) = forwarded {
                    if tx_clone.send(event).is_err() {
                        break;
                    }
                }
            }
            if tx_clone.send(Event::Tick).is_err() {
                break;
            }
        });
        Handler { rx, _tx: tx }
    }

    /// Receive next terminal event and handle it accordingly. Returns result
    /// with value true if should continue or false if exit was requested.
    ///
    pub fn handle_next(&self, shell: &mut Shell) -> Result<bool> {
        let now = shell.now();
        match self.rx.recv()? {
            Event::Key(event) => return Ok(handle_key(event, shell, now)),
            Event::Mouse(MouseEvent { kind, .. }) => match kind {
                MouseEventKind::ScrollDown => shell.scroll_wheel(1.0, now),
                MouseEventKind::ScrollUp => shell.scroll_wheel(-1.0, now),
                _ => (),
            },
            Event::Resize(_, height) => {
                debug!("Terminal resized to {} rows", height);
            }
            Event::Tick => shell.tick(now),
        }
        Ok(true)
    }
}

fn handle_key(event: KeyEvent, shell: &mut Shell, now: u64) -> bool {
    if event.kind != KeyEventKind::Press {
        return true;
    }
    match (event.code, event.modifiers) {
        (KeyCode::Char('c'), KeyModifiers::CONTROL) | (KeyCode::Char('q'), _) => {
            debug!("Processing exit terminal event '{:?}'...", event);
            return false;
        }
        (KeyCode::Char('j'), _) | (KeyCode::Down, _) => shell.move_selection(1, now),
        (KeyCode::Char('k'), _) | (KeyCode::Up, _) => shell.move_selection(-1, now),
        (KeyCode::PageDown, _) | (KeyCode::Char('J'), _) => shell.scroll_wheel(1.0, now),
        (KeyCode::PageUp, _) | (KeyCode::Char('K'), _) => shell.scroll_wheel(-1.0, now),
        (KeyCode::Enter, _) => {
            if shell.activate_selected().is_none() {
                debug!("Row {} cannot be activated", shell.selected());
            }
        }
        (KeyCode::Tab, _) => shell.toggle_view(now),
        (KeyCode::Char('m'), _) => shell.toggle_reduced_motion(),
        _ => (),
    }
    true
}
