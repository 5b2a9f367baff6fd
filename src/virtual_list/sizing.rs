use super::item::ItemData;
use crate::config::VirtualizationConfig;

/// Pure row-height function over a flattened list.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowSizer {
    config: VirtualizationConfig,
}

impl RowSizer {
    pub fn new(config: VirtualizationConfig) -> Self {
        RowSizer { config }
    }

    pub fn default_height(&self) -> u32 {
        self.config.default_height
    }

    /// Height of the row at `index`. Indices past the end, which overscan can
    /// briefly ask for during a resize, get the default height.
    ///
    pub fn row_height(&self, rows: &[ItemData], index: usize) -> u32 {
        match rows.get(index) {
            Some(ItemData::SectionHeader { .. }) => self.config.header_height,
            Some(ItemData::Item {
                is_last_in_section, ..
            }) => {
                if *is_last_in_section {
                    self.config.item_height
                } else {
                    self.config.item_height + self.config.item_spacing
                }
            }
            Some(ItemData::SectionConnector { .. }) => self.config.connector_height,
            None => self.config.default_height,
        }
    }
}
