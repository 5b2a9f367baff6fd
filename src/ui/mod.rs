//! User interface module.
//!
//! This module handles all UI rendering using the `ratatui` library, including:
//! - Terminal layout
//! - The virtualized canvas view
//! - The navigation progress indicator
//! - Status line and log panel

type Frame<'a> = ratatui::Frame<'a>;

mod render;
mod widgets;

pub use render::render;
