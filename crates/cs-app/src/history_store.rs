//! Clipboard history use cases.
//!
//! Every public operation is one logical step: it takes the store lock,
//! mutates the in-memory [`History`], emits observer events and, when the
//! persisted subset changed, rewrites the registry index before releasing
//! the lock.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use cs_core::ports::{ClipboardIoPort, HistoryObserverPort, RegistryPort};
use cs_core::{
    CycleDirection, Entry, EntryId, History, HistoryConfig, HistoryEvent, HistorySnapshot,
    ImagePreview, Notification,
};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::deferred::DeferredReselect;
use crate::errors::HistoryError;

/// What `ingest` did with an entry.
#[derive(Debug, Clone)]
pub enum IngestOutcome {
    /// New entry, now at the front and selected.
    Inserted(Entry),
    /// Equal content was already stored; that entry is selected instead.
    Reused(Entry),
    /// Images are not captured while `cache_images` is off.
    Discarded,
    /// Private mode is active.
    Suspended,
}

impl IngestOutcome {
    pub fn entry(&self) -> Option<&Entry> {
        match self {
            IngestOutcome::Inserted(entry) | IngestOutcome::Reused(entry) => Some(entry),
            IngestOutcome::Discarded | IngestOutcome::Suspended => None,
        }
    }

    pub fn is_reused(&self) -> bool {
        matches!(self, IngestOutcome::Reused(_))
    }
}

pub struct HistoryPorts {
    pub registry: Arc<dyn RegistryPort>,
    pub clipboard: Arc<dyn ClipboardIoPort>,
    pub observer: Arc<dyn HistoryObserverPort>,
}

/// Shared handle to the history. Clones address the same state; the pending
/// deferred reselect is cancelled when the last clone is dropped.
#[derive(Clone)]
pub struct HistoryStore {
    inner: Arc<Inner>,
}

struct Inner {
    state: Mutex<StoreState>,
    registry: Arc<dyn RegistryPort>,
    clipboard: Arc<dyn ClipboardIoPort>,
    observer: Arc<dyn HistoryObserverPort>,
    /// Single source of the private-mode flag. Written only by
    /// `set_private_mode`, under the state lock.
    private_mode: AtomicBool,
}

struct StoreState {
    history: History,
    config: HistoryConfig,
    deferred: DeferredReselect,
}

impl HistoryStore {
    pub fn new(config: HistoryConfig, ports: HistoryPorts) -> Result<Self, HistoryError> {
        config.validate()?;
        Ok(Self {
            inner: Arc::new(Inner {
                state: Mutex::new(StoreState {
                    history: History::new(),
                    config,
                    deferred: DeferredReselect::default(),
                }),
                registry: ports.registry,
                clipboard: ports.clipboard,
                observer: ports.observer,
                private_mode: AtomicBool::new(false),
            }),
        })
    }

    /// Replaces the in-memory history with the registry contents.
    ///
    /// When `current_clipboard` matches a stored entry, that entry becomes
    /// the selection; the clipboard itself is not written. Records that are
    /// equal under the current text normalization collapse into the newest,
    /// and blobs no loaded entry refers to are deleted. Returns the number of
    /// loaded entries.
    #[tracing::instrument(name = "usecase.history.load", skip_all)]
    pub async fn load(&self, current_clipboard: Option<Entry>) -> Result<usize, HistoryError> {
        let entries = self.inner.registry.read().await;

        let mut guard = self.inner.state.lock().await;
        let state = &mut *guard;
        state.deferred.cancel();
        state.history = History::from_entries(entries);

        // Duplicates of an image share its blob, so they are dropped without
        // touching the registry.
        let collapsed = state
            .history
            .collapse_duplicates(state.config.text_normalization());
        let evicted = state
            .history
            .evict_overflow(state.config.max_history_length);
        let trimmed = !collapsed.is_empty() || !evicted.is_empty();
        self.inner.discard(evicted).await;

        let swept = self
            .inner
            .registry
            .remove_orphan_blobs(state.history.items())
            .await;
        match swept {
            Ok(0) => {}
            Ok(removed) => info!(removed, "unreferenced image blobs removed"),
            Err(err) => warn!(error = %err, "failed to sweep unreferenced image blobs"),
        }

        if let Some(current) = current_clipboard {
            let normalization = state.config.text_normalization();
            let matching = state
                .history
                .find_duplicate(&current, normalization)
                .map(|e| e.id().clone());
            if let Some(id) = matching {
                state.history.select(&id);
                self.inner.show_in_indicator(state.history.selected());
            }
        }

        self.inner.emit_history(state);
        self.inner.emit_selection(state);
        if trimmed {
            self.inner.persist(state).await?;
        }
        info!(count = state.history.len(), "history loaded");
        Ok(state.history.len())
    }

    /// Records a freshly observed clipboard payload.
    ///
    /// Equal content already in the history is re-selected (and moved to the
    /// front when `move_item_first` is on and it is not a favorite) without
    /// writing any blob. New content is inserted at the front, selected,
    /// eviction runs, and the index is rewritten.
    #[tracing::instrument(
        name = "usecase.history.ingest",
        skip(self, entry),
        fields(kind = ?entry.kind(), mime = %entry.mime_type())
    )]
    pub async fn ingest(&self, entry: Entry) -> Result<IngestOutcome, HistoryError> {
        let mut guard = self.inner.state.lock().await;
        let state = &mut *guard;

        if self.inner.is_private() {
            debug!("private mode active, ingest suspended");
            return Ok(IngestOutcome::Suspended);
        }
        if entry.is_image() && !state.config.cache_images {
            debug!("image capture disabled, entry discarded");
            return Ok(IngestOutcome::Discarded);
        }
        state.deferred.cancel();

        let normalization = state.config.text_normalization();
        if let Some(existing) = state.history.find_duplicate(&entry, normalization).cloned() {
            state.history.select(existing.id());
            self.inner.emit_selection(state);
            self.inner.show_in_indicator(Some(&existing));

            if state.config.move_item_first && !existing.is_favorite() {
                state.history.move_to_front(existing.id());
                self.inner.emit_history(state);
                self.inner.persist(state).await?;
            }
            debug!(entry_id = %existing.id(), "duplicate content re-selected");
            return Ok(IngestOutcome::Reused(existing));
        }

        if entry.is_image() {
            if let Err(err) = self.inner.registry.write_entry_file(&entry).await {
                warn!(error = %err, "failed to store image blob, keeping entry in memory");
            }
        }

        state.history.push_front(entry.clone());
        state.history.select(entry.id());
        let evicted = state
            .history
            .evict_overflow(state.config.max_history_length);
        self.inner.discard(evicted).await;

        self.inner.emit_history(state);
        self.inner.emit_selection(state);
        self.inner.show_in_indicator(Some(&entry));
        if state.config.notify_on_copy {
            self.inner.notify(Notification::Copied {
                label: entry.preview_label(state.config.max_entry_preview_length),
            });
        }

        self.inner.persist(state).await?;
        debug!(entry_id = %entry.id(), count = state.history.len(), "entry inserted");
        Ok(IngestOutcome::Inserted(entry))
    }

    /// Selects the next item of the merged favorites/history sequence,
    /// wrapping around. No-op in private mode or when nothing is selected.
    pub async fn select_next(&self) -> Option<EntryId> {
        self.cycle(CycleDirection::Next).await
    }

    pub async fn select_previous(&self) -> Option<EntryId> {
        self.cycle(CycleDirection::Previous).await
    }

    #[tracing::instrument(name = "usecase.history.cycle", skip(self))]
    async fn cycle(&self, direction: CycleDirection) -> Option<EntryId> {
        let mut guard = self.inner.state.lock().await;
        let state = &mut *guard;

        if self.inner.is_private() {
            return None;
        }
        state.deferred.cancel();

        let step = state
            .history
            .neighbor(state.config.section_order(), direction)?;
        state.history.select(&step.id);
        let entry = state.history.get(&step.id)?.clone();
        self.inner.emit_selection(state);

        if state.config.notify_on_cycle {
            self.inner.notify(Notification::Cycled {
                position: step.position,
                total: step.total,
                label: entry.preview_label(state.config.max_entry_preview_length),
            });
        }

        if state.config.move_item_first {
            self.inner.show_in_indicator(Some(&entry));
            self.schedule_reselect(state, step.id.clone());
        } else {
            self.inner.write_clipboard(&entry);
        }
        Some(step.id)
    }

    fn schedule_reselect(&self, state: &mut StoreState, id: EntryId) {
        let generation = state.deferred.arm();
        let delay = state.config.delayed_selection_timeout();
        let weak: Weak<Inner> = Arc::downgrade(&self.inner);

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(inner) = weak.upgrade() {
                inner.fire_reselect(generation, id).await;
            }
        });
        state.deferred.set_pending(handle.abort_handle());
    }

    /// Explicit activation: selects the entry and writes it to the clipboard.
    #[tracing::instrument(name = "usecase.history.select", skip(self), fields(entry_id = %id))]
    pub async fn select(&self, id: &EntryId) -> Result<Entry, HistoryError> {
        let mut guard = self.inner.state.lock().await;
        let state = &mut *guard;
        state.deferred.cancel();

        if !state.history.select(id) {
            return Err(HistoryError::NotFound(id.clone()));
        }
        let entry = state
            .history
            .get(id)
            .cloned()
            .ok_or_else(|| HistoryError::NotFound(id.clone()))?;
        self.inner.emit_selection(state);
        self.inner.write_clipboard(&entry);
        Ok(entry)
    }

    /// Flips the favorite flag and moves the entry to the front. The
    /// selection is kept. Returns the new flag.
    #[tracing::instrument(
        name = "usecase.history.toggle_favorite",
        skip(self),
        fields(entry_id = %id)
    )]
    pub async fn toggle_favorite(&self, id: &EntryId) -> Result<bool, HistoryError> {
        let mut guard = self.inner.state.lock().await;
        let state = &mut *guard;
        state.deferred.cancel();

        let favorite = state
            .history
            .toggle_favorite(id)
            .ok_or_else(|| HistoryError::NotFound(id.clone()))?;

        // Unfavoriting can push the history section over its cap.
        let evicted = state
            .history
            .evict_overflow(state.config.max_history_length);
        let selection_may_change = !evicted.is_empty();
        self.inner.discard(evicted).await;

        self.inner.emit_history(state);
        if selection_may_change {
            self.inner.emit_selection(state);
        }
        self.inner.persist(state).await?;
        Ok(favorite)
    }

    /// Deletes one entry. Removing the selected entry clears the clipboard
    /// first.
    #[tracing::instrument(
        name = "usecase.history.remove_entry",
        skip(self),
        fields(entry_id = %id)
    )]
    pub async fn remove_entry(&self, id: &EntryId) -> Result<Entry, HistoryError> {
        let mut guard = self.inner.state.lock().await;
        let state = &mut *guard;
        state.deferred.cancel();

        let was_selected = state.history.is_selected(id);
        if state.history.get(id).is_none() {
            return Err(HistoryError::NotFound(id.clone()));
        }
        if was_selected {
            self.inner.clear_clipboard();
        }
        let entry = state
            .history
            .remove(id)
            .ok_or_else(|| HistoryError::NotFound(id.clone()))?;
        self.inner.discard(vec![entry.clone()]).await;

        self.inner.emit_history(state);
        if was_selected {
            self.inner.emit_selection(state);
        }
        self.inner.persist(state).await?;
        info!(entry_id = %id, "entry removed");
        Ok(entry)
    }

    pub async fn find_by_text(&self, text: &str) -> Option<Entry> {
        let state = self.inner.state.lock().await;
        state.history.find_by_text(text).cloned()
    }

    /// Removes every non-favorite entry. Returns how many were removed.
    #[tracing::instrument(name = "usecase.history.clear", skip(self))]
    pub async fn clear_history(&self) -> Result<usize, HistoryError> {
        let mut guard = self.inner.state.lock().await;
        let state = &mut *guard;
        state.deferred.cancel();

        let selected_dropped = state
            .history
            .selected()
            .is_some_and(|entry| !entry.is_favorite());
        let dropped = state.history.drain_non_favorites();
        let count = dropped.len();
        if selected_dropped {
            self.inner.clear_clipboard();
        }
        self.inner.discard(dropped).await;

        self.inner.emit_history(state);
        self.inner.emit_selection(state);
        self.inner.persist(state).await?;
        info!(count, "history cleared");
        Ok(count)
    }

    /// Undoes the most recent copy: the newest entry is removed and the one
    /// before it is selected and written back, or the clipboard is cleared
    /// when nothing is left.
    #[tracing::instrument(name = "usecase.history.cancel_last_copy", skip(self))]
    pub async fn cancel_last_copy(&self) -> Result<Option<Entry>, HistoryError> {
        let mut guard = self.inner.state.lock().await;
        let state = &mut *guard;
        state.deferred.cancel();

        let Some(newest) = state.history.items().first().cloned() else {
            return Ok(None);
        };
        match state.history.items().get(1).cloned() {
            Some(previous) => {
                state.history.select(previous.id());
                self.inner.write_clipboard(&previous);
            }
            None => self.inner.clear_clipboard(),
        }
        state.history.remove(newest.id());
        self.inner.discard(vec![newest.clone()]).await;

        self.inner.emit_history(state);
        self.inner.emit_selection(state);
        self.inner.persist(state).await?;
        Ok(Some(newest))
    }

    /// Swaps in a new configuration, then re-applies eviction and rewrites
    /// the index since the persisted subset may have changed.
    #[tracing::instrument(name = "usecase.history.apply_config", skip_all)]
    pub async fn apply_config(&self, config: HistoryConfig) -> Result<(), HistoryError> {
        config.validate()?;

        let mut guard = self.inner.state.lock().await;
        let state = &mut *guard;
        state.config = config;

        let evicted = state
            .history
            .evict_overflow(state.config.max_history_length);
        self.inner.discard(evicted).await;

        self.inner.emit_history(state);
        self.inner.emit_selection(state);
        self.inner.persist(state).await
    }

    pub async fn preview(&self, id: &EntryId) -> Result<ImagePreview, HistoryError> {
        let entry = {
            let state = self.inner.state.lock().await;
            state
                .history
                .get(id)
                .cloned()
                .ok_or_else(|| HistoryError::NotFound(id.clone()))?
        };
        Ok(self.inner.registry.get_entry_as_image(&entry).await)
    }

    pub async fn snapshot(&self) -> HistorySnapshot {
        let state = self.inner.state.lock().await;
        state.history.snapshot(state.config.section_order())
    }

    pub async fn selected(&self) -> Option<Entry> {
        let state = self.inner.state.lock().await;
        state.history.selected().cloned()
    }

    pub async fn config(&self) -> HistoryConfig {
        self.inner.state.lock().await.config.clone()
    }

    pub fn is_private_mode(&self) -> bool {
        self.inner.is_private()
    }

    pub async fn has_pending_reselect(&self) -> bool {
        self.inner.state.lock().await.deferred.is_pending()
    }

    /// Cancels the pending deferred reselect, if any.
    pub async fn shutdown(&self) {
        let mut state = self.inner.state.lock().await;
        if state.deferred.cancel() {
            debug!("pending reselect cancelled on shutdown");
        }
    }

    /// Switches private mode under the store lock. Returns whether the mode
    /// actually changed.
    pub(crate) async fn set_private_mode(&self, active: bool) -> bool {
        let mut guard = self.inner.state.lock().await;
        let state = &mut *guard;
        if self.inner.private_mode.swap(active, Ordering::SeqCst) == active {
            return false;
        }

        if active {
            state.deferred.cancel();
            self.inner
                .observer
                .on_event(HistoryEvent::VisibilityChanged { visible: false });
            self.inner
                .observer
                .on_event(HistoryEvent::IndicatorChanged(None));
        } else {
            match state.history.selected().cloned() {
                Some(entry) => self.inner.write_clipboard(&entry),
                None => self.inner.clear_clipboard(),
            }
            self.inner
                .observer
                .on_event(HistoryEvent::VisibilityChanged { visible: true });
            self.inner.emit_history(state);
        }
        true
    }
}

impl Inner {
    fn is_private(&self) -> bool {
        self.private_mode.load(Ordering::SeqCst)
    }

    async fn fire_reselect(&self, generation: u64, id: EntryId) {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;

        if !state.deferred.complete(generation) || self.is_private() {
            return;
        }
        if !state.history.is_selected(&id) {
            return;
        }
        let Some(entry) = state.history.get(&id).cloned() else {
            return;
        };

        self.write_clipboard(&entry);
        if state.config.move_item_first && !entry.is_favorite() {
            state.history.move_to_front(&id);
            self.emit_history(state);
            if let Err(err) = self.persist(state).await {
                warn!(error = %err, "failed to persist after deferred reselect");
            }
        }
    }

    async fn persist(&self, state: &StoreState) -> Result<(), HistoryError> {
        let entries = state
            .history
            .persisted_subset(state.config.cache_only_favorites);
        self.registry.write(&entries).await.map_err(|err| {
            warn!(error = %err, "index write failed, in-memory history kept");
            HistoryError::Persist(err)
        })
    }

    /// Reclaims blobs of entries that left the history.
    async fn discard(&self, entries: Vec<Entry>) {
        for entry in entries.iter().filter(|e| e.is_image()) {
            if let Err(err) = self.registry.delete_entry_file(entry).await {
                warn!(entry_id = %entry.id(), error = %err, "failed to delete image blob");
            }
        }
    }

    fn write_clipboard(&self, entry: &Entry) {
        if entry.raw_bytes().is_empty() {
            warn!(entry_id = %entry.id(), "entry has no bytes, clipboard left unchanged");
            return;
        }
        if let Err(err) = self.clipboard.write(entry.mime_type(), entry.raw_bytes()) {
            warn!(entry_id = %entry.id(), error = %err, "clipboard write failed");
        }
        self.show_in_indicator(Some(entry));
    }

    fn clear_clipboard(&self) {
        if let Err(err) = self.clipboard.clear() {
            warn!(error = %err, "clipboard clear failed");
        }
        self.show_in_indicator(None);
    }

    fn show_in_indicator(&self, entry: Option<&Entry>) {
        if self.is_private() {
            return;
        }
        self.observer
            .on_event(HistoryEvent::IndicatorChanged(entry.cloned()));
    }

    fn notify(&self, notification: Notification) {
        if self.is_private() {
            return;
        }
        self.observer.on_event(HistoryEvent::Notify(notification));
    }

    fn emit_history(&self, state: &StoreState) {
        self.observer.on_event(HistoryEvent::HistoryChanged(
            state.history.snapshot(state.config.section_order()),
        ));
    }

    fn emit_selection(&self, state: &StoreState) {
        self.observer.on_event(HistoryEvent::SelectionChanged(
            state.history.selected_id().cloned(),
        ));
    }
}
