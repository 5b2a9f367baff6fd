//! Virtualized row engine module.
//!
//! Renders a two-level section/item hierarchy as one windowed list:
//! - Flattening into header, item and connector rows
//! - Per-row heights and lazily measured offsets
//! - Viewport windowing with overscan
//! - One-shot scroll restore across navigation

mod engine;
mod flatten;
mod interaction;
mod item;
mod sizing;
mod window;

pub use engine::{RowHooks, VirtualRowEngine, VisibleRow};
pub use flatten::{flatten_sections, FlatList};
pub use interaction::is_item_clickable;
pub use item::{Item, ItemData, RowType, Section};
pub use sizing::RowSizer;
pub use window::{Align, VariableSizeList};
