//! Event handling module.
//!
//! Terminal events (keys, mouse wheel, resize) are polled on a background
//! thread and fed to the shell together with a steady tick.

pub mod terminal;
