//! Scroll-driven canvas navigation and virtualized row rendering.
//!
//! The engine is split into four parts:
//!
//! - [`gesture`] classifies raw wheel input by device and filters inertial
//!   momentum.
//! - [`navigation`] accumulates qualifying scroll into progress toward the
//!   other view and drives the view transition.
//! - [`store`] holds the shared canvas state with selector subscriptions and
//!   selective persistence.
//! - [`virtual_list`] flattens sectioned content into typed rows and windows
//!   them for rendering.
//!
//! The remaining modules host the terminal shell that exercises the engine.

pub mod app;
pub mod config;
pub mod demo;
pub mod error;
pub mod events;
pub mod gesture;
pub mod logger;
pub mod navigation;
pub mod shell;
pub mod store;
pub mod ui;
pub mod virtual_list;
