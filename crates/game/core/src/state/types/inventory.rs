use std::collections::BTreeMap;

use super::{Card, CardId};

/// One inventory holding: a card definition and how many units are owned.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InventoryEntry {
    pub card: Card,
    pub count: u32,
}

/// Card holdings keyed by card id. Entries with a zero count are removed.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct InventoryState {
    entries: BTreeMap<CardId, InventoryEntry>,
}

impl InventoryState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &CardId) -> Option<&InventoryEntry> {
        self.entries.get(id)
    }

    pub fn card(&self, id: &CardId) -> Option<&Card> {
        self.entries.get(id).map(|entry| &entry.card)
    }

    pub fn count(&self, id: &CardId) -> u32 {
        self.entries.get(id).map_or(0, |entry| entry.count)
    }

    pub fn contains(&self, id: &CardId) -> bool {
        self.entries.contains_key(id)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Total number of owned units across all entries.
    pub fn total_units(&self) -> u64 {
        self.entries.values().map(|entry| u64::from(entry.count)).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &InventoryEntry> {
        self.entries.values()
    }

    /// Merges `count` units of `card`. An existing entry keeps its record.
    pub fn add(&mut self, card: &Card, count: u32) {
        if count == 0 {
            return;
        }
        self.entries
            .entry(card.id.clone())
            .and_modify(|entry| entry.count = entry.count.saturating_add(count))
            .or_insert_with(|| InventoryEntry {
                card: card.unplaced(),
                count,
            });
    }

    /// Removes up to `count` units. Returns the number actually removed.
    pub fn remove(&mut self, id: &CardId, count: u32) -> u32 {
        let Some(entry) = self.entries.get_mut(id) else {
            return 0;
        };
        if entry.count <= count {
            let removed = entry.count;
            self.entries.remove(id);
            removed
        } else {
            entry.count -= count;
            count
        }
    }
}
