use super::SectionOrder;
use crate::clipboard::Entry;
use crate::ids::EntryId;

/// Read-only copy of the history handed to observers.
#[derive(Debug, Clone)]
pub struct HistorySnapshot {
    pub entries: Vec<Entry>,
    pub selected: Option<EntryId>,
    pub order: SectionOrder,
}

impl HistorySnapshot {
    pub fn favorites(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter().filter(|e| e.is_favorite())
    }

    pub fn history(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter().filter(|e| !e.is_favorite())
    }

    pub fn selected_entry(&self) -> Option<&Entry> {
        let selected = self.selected.as_ref()?;
        self.entries.iter().find(|e| e.id() == selected)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Copied { label: String },
    Cycled {
        position: usize,
        total: usize,
        label: String,
    },
}

#[derive(Debug, Clone)]
pub enum HistoryEvent {
    HistoryChanged(HistorySnapshot),
    SelectionChanged(Option<EntryId>),
    /// Entry now shown as current clipboard content, `None` when cleared.
    IndicatorChanged(Option<Entry>),
    VisibilityChanged { visible: bool },
    Notify(Notification),
}
