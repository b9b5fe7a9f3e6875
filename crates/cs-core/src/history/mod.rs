//! Ordered in-memory history with exclusive selection.
//!
//! `History` is a plain model: it never touches the clipboard or the disk.
//! Callers pair each mutation with the matching side effects.

mod event;

pub use event::{HistoryEvent, HistorySnapshot, Notification};

use crate::clipboard::{Entry, TextNormalization};
use crate::ids::EntryId;

/// Which section comes first when favorites and history are merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SectionOrder {
    #[default]
    FavoritesFirst,
    HistoryFirst,
}

impl SectionOrder {
    pub fn from_pinned_on_bottom(pinned_on_bottom: bool) -> Self {
        if pinned_on_bottom {
            SectionOrder::HistoryFirst
        } else {
            SectionOrder::FavoritesFirst
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleDirection {
    Next,
    Previous,
}

/// Result of stepping through the merged sequence. `position` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleStep {
    pub id: EntryId,
    pub position: usize,
    pub total: usize,
}

#[derive(Debug, Clone, Default)]
pub struct History {
    /// Newest first.
    items: Vec<Entry>,
    selected: Option<EntryId>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the history from persisted entries, newest first. Nothing is
    /// selected.
    pub fn from_entries(items: Vec<Entry>) -> Self {
        Self {
            items,
            selected: None,
        }
    }

    pub fn items(&self) -> &[Entry] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &EntryId) -> Option<&Entry> {
        self.items.iter().find(|e| e.id() == id)
    }

    fn position(&self, id: &EntryId) -> Option<usize> {
        self.items.iter().position(|e| e.id() == id)
    }

    pub fn selected_id(&self) -> Option<&EntryId> {
        self.selected.as_ref()
    }

    pub fn selected(&self) -> Option<&Entry> {
        self.selected.as_ref().and_then(|id| self.get(id))
    }

    pub fn is_selected(&self, id: &EntryId) -> bool {
        self.selected.as_ref() == Some(id)
    }

    /// Makes `id` the only selected item. Unknown ids leave the selection
    /// untouched.
    pub fn select(&mut self, id: &EntryId) -> bool {
        if self.position(id).is_none() {
            return false;
        }
        self.selected = Some(id.clone());
        true
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn find_duplicate(
        &self,
        entry: &Entry,
        normalization: TextNormalization,
    ) -> Option<&Entry> {
        self.items.iter().find(|e| e.content_eq(entry, normalization))
    }

    /// Keeps the newest of each group of content-equal items. A group with
    /// any favorite stays favorite. Returns the dropped items.
    pub fn collapse_duplicates(&mut self, normalization: TextNormalization) -> Vec<Entry> {
        let mut kept: Vec<Entry> = Vec::with_capacity(self.items.len());
        let mut dropped = Vec::new();
        for entry in std::mem::take(&mut self.items) {
            match kept.iter_mut().find(|k| k.content_eq(&entry, normalization)) {
                Some(existing) => {
                    if entry.is_favorite() {
                        existing.set_favorite(true);
                    }
                    dropped.push(entry);
                }
                None => kept.push(entry),
            }
        }
        self.items = kept;
        if let Some(selected) = self.selected.clone() {
            if self.position(&selected).is_none() {
                self.selected = None;
            }
        }
        dropped
    }

    pub fn find_by_text(&self, text: &str) -> Option<&Entry> {
        self.items
            .iter()
            .find(|e| e.is_text() && e.string_value() == text)
    }

    pub fn push_front(&mut self, entry: Entry) {
        self.items.insert(0, entry);
    }

    pub fn move_to_front(&mut self, id: &EntryId) -> bool {
        match self.position(id) {
            Some(0) => true,
            Some(idx) => {
                let entry = self.items.remove(idx);
                self.items.insert(0, entry);
                true
            }
            None => false,
        }
    }

    /// Removes the entry, dropping the selection when it pointed at it.
    pub fn remove(&mut self, id: &EntryId) -> Option<Entry> {
        let idx = self.position(id)?;
        Some(self.remove_at(idx))
    }

    fn remove_at(&mut self, idx: usize) -> Entry {
        let entry = self.items.remove(idx);
        if self.is_selected(entry.id()) {
            self.selected = None;
        }
        entry
    }

    /// Flips the favorite flag and moves the entry to the front. Returns the
    /// new flag.
    pub fn toggle_favorite(&mut self, id: &EntryId) -> Option<bool> {
        let idx = self.position(id)?;
        let mut entry = self.items.remove(idx);
        let favorite = !entry.is_favorite();
        entry.set_favorite(favorite);
        self.items.insert(0, entry);
        Some(favorite)
    }

    pub fn non_favorite_count(&self) -> usize {
        self.items.iter().filter(|e| !e.is_favorite()).count()
    }

    pub fn oldest_non_favorite(&self) -> Option<&Entry> {
        self.items.iter().rev().find(|e| !e.is_favorite())
    }

    /// Drops the oldest non-favorites until at most `max_history_length`
    /// remain. Favorites are never evicted.
    pub fn evict_overflow(&mut self, max_history_length: usize) -> Vec<Entry> {
        let mut evicted = Vec::new();
        while self.non_favorite_count() > max_history_length {
            let Some(idx) = self.items.iter().rposition(|e| !e.is_favorite()) else {
                break;
            };
            evicted.push(self.remove_at(idx));
        }
        evicted
    }

    /// Removes every non-favorite, oldest last in the returned list.
    pub fn drain_non_favorites(&mut self) -> Vec<Entry> {
        let (favorites, dropped): (Vec<Entry>, Vec<Entry>) =
            std::mem::take(&mut self.items)
                .into_iter()
                .partition(Entry::is_favorite);
        self.items = favorites;
        if let Some(selected) = self.selected.clone() {
            if self.position(&selected).is_none() {
                self.selected = None;
            }
        }
        dropped
    }

    pub fn favorites(&self) -> impl Iterator<Item = &Entry> {
        self.items.iter().filter(|e| e.is_favorite())
    }

    pub fn history(&self) -> impl Iterator<Item = &Entry> {
        self.items.iter().filter(|e| !e.is_favorite())
    }

    /// Ids in display order: both sections keep newest-first order.
    pub fn cycle_order(&self, order: SectionOrder) -> Vec<&EntryId> {
        let favorites = self.favorites().map(Entry::id);
        let history = self.history().map(Entry::id);
        match order {
            SectionOrder::FavoritesFirst => favorites.chain(history).collect(),
            SectionOrder::HistoryFirst => history.chain(favorites).collect(),
        }
    }

    /// Neighbor of the selected item, wrapping at both ends. `None` when
    /// nothing is selected.
    pub fn neighbor(&self, order: SectionOrder, direction: CycleDirection) -> Option<CycleStep> {
        let selected = self.selected.as_ref()?;
        let sequence = self.cycle_order(order);
        let current = sequence.iter().position(|id| *id == selected)?;
        let total = sequence.len();
        let next = match direction {
            CycleDirection::Next => (current + 1) % total,
            CycleDirection::Previous => (current + total - 1) % total,
        };
        Some(CycleStep {
            id: sequence[next].clone(),
            position: next + 1,
            total,
        })
    }

    /// Entries written to the index.
    pub fn persisted_subset(&self, cache_only_favorites: bool) -> Vec<Entry> {
        self.items
            .iter()
            .filter(|e| !cache_only_favorites || e.is_favorite())
            .cloned()
            .collect()
    }

    pub fn snapshot(&self, order: SectionOrder) -> HistorySnapshot {
        HistorySnapshot {
            entries: self.items.clone(),
            selected: self.selected.clone(),
            order,
        }
    }
}
