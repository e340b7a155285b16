//! Packing checklist store
//!
//! Tracks the user's packing lists and which items are already in the
//! container. Item toggling is the hook the pipeline's drop logic calls when
//! an item lands in a detected container. Kept behind the daemon state's
//! lock; all mutation goes through [`PackingStore`] methods and operates on
//! the currently selected list.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

/// Broad grouping for checklist display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemCategory {
    Clothing,
    Electronics,
    Toiletries,
    Documents,
    Other,
}

/// One checklist entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackingItem {
    pub id: String,
    pub name: String,
    pub category: ItemCategory,
    pub packed: bool,
    pub icon: String,
}

impl PackingItem {
    pub fn new(name: impl Into<String>, category: ItemCategory, icon: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            category,
            packed: false,
            icon: icon.into(),
        }
    }
}

/// A named checklist
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackingList {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub items: Vec<PackingItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PackingList {
    pub fn new(name: impl Into<String>, icon: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            icon: icon.into(),
            items: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// All packing lists plus the current selection
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PackingStore {
    lists: Vec<PackingList>,
    selected_list_id: Option<String>,
}

impl PackingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the starter lists and select the first one
    pub fn with_starter_lists() -> Self {
        let mut store = Self::new();

        let mut beach = PackingList::new("Beach Trip", "🏖️");
        beach.items = vec![
            PackingItem::new("Swimsuit", ItemCategory::Clothing, "🩱"),
            PackingItem::new("Sunscreen", ItemCategory::Toiletries, "🧴"),
            PackingItem::new("Towel", ItemCategory::Other, "🏖️"),
            PackingItem::new("Sunglasses", ItemCategory::Other, "🕶️"),
            PackingItem::new("Sandals", ItemCategory::Clothing, "🩴"),
            PackingItem::new("Camera", ItemCategory::Electronics, "📷"),
        ];

        let mut mountain = PackingList::new("Mountain Weekend", "⛰️");
        mountain.items = vec![
            PackingItem::new("Jacket", ItemCategory::Clothing, "🧥"),
            PackingItem::new("Boots", ItemCategory::Clothing, "🥾"),
            PackingItem::new("Backpack", ItemCategory::Other, "🎒"),
            PackingItem::new("Flashlight", ItemCategory::Electronics, "🔦"),
            PackingItem::new("Water Bottle", ItemCategory::Other, "💧"),
        ];

        let mut conference = PackingList::new("Business Conference", "💼");
        conference.items = vec![
            PackingItem::new("Suit", ItemCategory::Clothing, "🤵"),
            PackingItem::new("Laptop", ItemCategory::Electronics, "💻"),
            PackingItem::new("Documents", ItemCategory::Documents, "📄"),
            PackingItem::new("Charger", ItemCategory::Electronics, "🔌"),
            PackingItem::new("Dress Shoes", ItemCategory::Clothing, "👞"),
        ];

        store.selected_list_id = Some(beach.id.clone());
        store.lists = vec![beach, mountain, conference];
        store
    }

    pub fn lists(&self) -> &[PackingList] {
        &self.lists
    }

    /// The currently selected list, if any
    pub fn current_list(&self) -> Option<&PackingList> {
        let id = self.selected_list_id.as_deref()?;
        self.lists.iter().find(|list| list.id == id)
    }

    fn current_list_mut(&mut self) -> Option<&mut PackingList> {
        let id = self.selected_list_id.clone()?;
        self.lists.iter_mut().find(|list| list.id == id)
    }

    /// Select a list by id; false if no such list (selection unchanged)
    pub fn select_list(&mut self, id: &str) -> bool {
        if self.lists.iter().any(|list| list.id == id) {
            self.selected_list_id = Some(id.to_string());
            true
        } else {
            false
        }
    }

    /// Create an empty list, select it, and return its id
    pub fn create_list(&mut self, name: impl Into<String>, icon: impl Into<String>) -> String {
        let list = PackingList::new(name, icon);
        let id = list.id.clone();
        debug!(list = %list.name, "Created packing list");
        self.lists.push(list);
        self.selected_list_id = Some(id.clone());
        id
    }

    /// Remove a list by id; selection falls back to the first remaining list
    pub fn delete_list(&mut self, id: &str) -> bool {
        let before = self.lists.len();
        self.lists.retain(|list| list.id != id);
        if self.lists.len() == before {
            return false;
        }
        if self.selected_list_id.as_deref() == Some(id) {
            self.selected_list_id = self.lists.first().map(|list| list.id.clone());
        }
        true
    }

    /// Append a new unpacked item to the current list and return its id
    pub fn add_item(
        &mut self,
        name: impl Into<String>,
        category: ItemCategory,
        icon: impl Into<String>,
    ) -> Option<String> {
        let item = PackingItem::new(name, category, icon);
        let id = item.id.clone();
        let list = self.current_list_mut()?;
        debug!(list = %list.name, item = %item.name, "Added packing item");
        list.items.push(item);
        list.updated_at = Utc::now();
        Some(id)
    }

    /// Remove an item from the current list by id; false if no such item
    pub fn remove_item(&mut self, id: &str) -> bool {
        let Some(list) = self.current_list_mut() else {
            return false;
        };
        let before = list.items.len();
        list.items.retain(|item| item.id != id);
        if list.items.len() == before {
            return false;
        }
        list.updated_at = Utc::now();
        true
    }

    /// Flip an item's packed flag; false if no such item
    pub fn toggle_item(&mut self, id: &str) -> bool {
        let Some(list) = self.current_list_mut() else {
            return false;
        };
        match list.items.iter_mut().find(|item| item.id == id) {
            Some(item) => {
                item.packed = !item.packed;
                debug!(item = %item.name, packed = item.packed, "Toggled packing item");
                list.updated_at = Utc::now();
                true
            }
            None => false,
        }
    }

    /// Items of the current list already in the container
    pub fn packed_items(&self) -> Vec<&PackingItem> {
        self.current_list()
            .map(|list| list.items.iter().filter(|item| item.packed).collect())
            .unwrap_or_default()
    }

    /// Items of the current list still to pack
    pub fn unpacked_items(&self) -> Vec<&PackingItem> {
        self.current_list()
            .map(|list| list.items.iter().filter(|item| !item.packed).collect())
            .unwrap_or_default()
    }

    /// True when the current list is non-empty and every item is packed
    pub fn is_all_packed(&self) -> bool {
        self.current_list()
            .map(|list| !list.items.is_empty() && list.items.iter().all(|item| item.packed))
            .unwrap_or(false)
    }
}
