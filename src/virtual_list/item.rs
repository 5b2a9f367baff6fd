use fake::Dummy;
use serde::{Deserialize, Serialize};

/// Defines item data structure (a hack, routine step or library entry).
///
/// `is_unlocked` is precomputed by the caller and only displayed here.
#[derive(Clone, Debug, Dummy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    pub name: String,
    pub position: i32,
    #[serde(default)]
    pub prerequisites: Vec<String>,
    #[serde(default)]
    pub is_unlocked: bool,
}

/// Defines section data structure (a level or library shelf).
///
#[derive(Clone, Debug, Dummy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    pub name: String,
    pub items: Vec<Item>,
}

/// Tag of a flattened row.
///
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum RowType {
    SectionHeader,
    Item,
    SectionConnector,
}

/// One row of the flattened section list.
///
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ItemData {
    SectionHeader {
        section_id: String,
        name: String,
        item_count: usize,
    },
    Item {
        section_id: String,
        item: Item,
        index_in_section: usize,
        is_last_in_section: bool,
    },
    SectionConnector {
        from_section: String,
        to_section: String,
    },
}

impl ItemData {
    pub fn row_type(&self) -> RowType {
        match self {
            ItemData::SectionHeader { .. } => RowType::SectionHeader,
            ItemData::Item { .. } => RowType::Item,
            ItemData::SectionConnector { .. } => RowType::SectionConnector,
        }
    }

    /// Stable key for the row, unique within one flattened list.
    ///
    pub fn key(&self) -> String {
        match self {
            ItemData::SectionHeader { section_id, .. } => format!("header-{}", section_id),
            ItemData::Item { item, .. } => format!("item-{}", item.id),
            ItemData::SectionConnector {
                from_section,
                to_section,
            } => format!("connector-{}-{}", from_section, to_section),
        }
    }

    pub fn item(&self) -> Option<&Item> {
        match self {
            ItemData::Item { item, .. } => Some(item),
            _ => None,
        }
    }
}
