//! Snapshot-basierte Undo/Redo-History.

use crate::core::{Event, EventStore};
use std::collections::VecDeque;

/// Standard-Tiefe der Undo-History.
pub const DEFAULT_HISTORY_DEPTH: usize = crate::shared::options::HISTORY_DEPTH;

/// Zustand einer Session vor einer Benutzer-Aktion.
///
/// Enthält eine vollständige, unabhängige Kopie aller Events. Es gibt keine
/// geteilten mutablen Teilstrukturen mit dem Live-Zustand.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Bezeichnung der Aktion, die nach diesem Snapshot ausgeführt wurde
    pub label: String,
    /// Alle Events zum Zeitpunkt des Snapshots
    pub events: Vec<Event>,
    /// Aktiver Event-Index zum Zeitpunkt des Snapshots
    pub active_index: usize,
    /// Stand des ID-Allocators
    pub next_id: u64,
}

impl Snapshot {
    /// Erstellt einen Snapshot per Deep-Clone.
    pub fn from_store(store: &EventStore, label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            events: store.events().to_vec(),
            active_index: store.active_index(),
            next_id: store.next_id(),
        }
    }

    /// Stellt den Snapshot wieder her: ersetzt den Zustand vollständig und
    /// gleicht den ID-Allocator ab.
    pub fn apply_to(self, store: &mut EventStore) {
        store.replace_all(self.events, self.active_index, self.next_id);
    }
}

/// Undo/Redo-Manager mit begrenzter Tiefe.
///
/// Älteste Einträge werden bei Überlauf verworfen (FIFO), Zugriff ist LIFO.
#[derive(Debug)]
pub struct EditHistory {
    undo_stack: VecDeque<Snapshot>,
    redo_stack: VecDeque<Snapshot>,
    max_depth: usize,
}

impl Default for EditHistory {
    fn default() -> Self {
        Self::new_with_capacity(DEFAULT_HISTORY_DEPTH)
    }
}

impl EditHistory {
    /// Tiefe 0 wird als 1 behandelt.
    pub fn new_with_capacity(max_depth: usize) -> Self {
        let max_depth = max_depth.max(1);
        Self {
            undo_stack: VecDeque::with_capacity(max_depth),
            redo_stack: VecDeque::with_capacity(max_depth),
            max_depth,
        }
    }

    /// Maximale Anzahl an Undo-Schritten.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Legt einen Snapshot ab und verwirft die Redo-History.
    pub fn record_snapshot(&mut self, snap: Snapshot) {
        push_bounded(&mut self.undo_stack, snap, self.max_depth);
        self.redo_stack.clear();
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Anzahl der Undo-Einträge.
    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    /// Anzahl der Redo-Einträge.
    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    /// Bezeichnung der Aktion, die ein Undo rückgängig machen würde.
    pub fn undo_label(&self) -> Option<&str> {
        self.undo_stack.back().map(|s| s.label.as_str())
    }

    /// Bezeichnung der Aktion, die ein Redo wiederholen würde.
    pub fn redo_label(&self) -> Option<&str> {
        self.redo_stack.back().map(|s| s.label.as_str())
    }

    /// Holt den letzten Undo-Snapshot und legt `current` auf den Redo-Stack.
    ///
    /// `current` übernimmt die Bezeichnung des rückgängig gemachten Eintrags.
    pub fn pop_undo_with_current(&mut self, mut current: Snapshot) -> Option<Snapshot> {
        let prev = self.undo_stack.pop_back()?;
        current.label = prev.label.clone();
        push_bounded(&mut self.redo_stack, current, self.max_depth);
        Some(prev)
    }

    /// Gegenstück zu [`EditHistory::pop_undo_with_current`].
    pub fn pop_redo_with_current(&mut self, mut current: Snapshot) -> Option<Snapshot> {
        let next = self.redo_stack.pop_back()?;
        current.label = next.label.clone();
        push_bounded(&mut self.undo_stack, current, self.max_depth);
        Some(next)
    }

    /// Verwirft beide Stacks.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

fn push_bounded(stack: &mut VecDeque<Snapshot>, snap: Snapshot, max_depth: usize) {
    if stack.len() >= max_depth {
        stack.pop_front();
    }
    stack.push_back(snap);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::NodeKindTag;

    /// Store mit `events` Events, im ersten davon `roots` Wurzel-Knoten.
    fn store_with(events: usize, roots: usize) -> EventStore {
        let mut store = EventStore::new();
        for _ in 0..roots {
            let node = store.create_node(NodeKindTag::SpawnItem).expect("ID frei");
            store.insert_root(node);
        }
        for _ in 1..events {
            store.add_event();
        }
        store
    }

    fn roots_of(snap: &Snapshot) -> usize {
        snap.events[0].model.len()
    }

    #[test]
    fn fresh_history_has_no_steps() {
        let history = EditHistory::default();
        assert_eq!(history.max_depth(), DEFAULT_HISTORY_DEPTH);
        assert_eq!((history.undo_len(), history.redo_len()), (0, 0));
        assert_eq!(history.undo_label(), None);
        assert_eq!(history.redo_label(), None);
    }

    #[test]
    fn zero_depth_is_raised_to_one() {
        let mut history = EditHistory::new_with_capacity(0);
        history.record_snapshot(Snapshot::from_store(&store_with(1, 0), "a"));
        history.record_snapshot(Snapshot::from_store(&store_with(1, 1), "b"));
        assert_eq!(history.undo_len(), 1);
        assert_eq!(history.undo_label(), Some("b"));
    }

    #[test]
    fn undo_swaps_current_onto_redo_with_label() {
        let mut history = EditHistory::new_with_capacity(4);
        history.record_snapshot(Snapshot::from_store(&store_with(1, 2), "Knoten löschen"));

        let live = Snapshot::from_store(&store_with(1, 1), "");
        let prev = history.pop_undo_with_current(live).expect("Undo-Eintrag");

        assert_eq!(roots_of(&prev), 2);
        assert_eq!(history.undo_len(), 0);
        assert_eq!(history.redo_label(), Some("Knoten löschen"));

        let live = Snapshot::from_store(&store_with(1, 2), "");
        let next = history.pop_redo_with_current(live).expect("Redo-Eintrag");
        assert_eq!(roots_of(&next), 1);
        assert_eq!(history.undo_label(), Some("Knoten löschen"));
        assert_eq!(history.redo_len(), 0);
    }

    #[test]
    fn recording_drops_redo_entries() {
        let mut history = EditHistory::new_with_capacity(4);
        history.record_snapshot(Snapshot::from_store(&store_with(1, 0), "Event hinzufügen"));
        let _ = history.pop_undo_with_current(Snapshot::from_store(&store_with(2, 0), ""));
        assert_eq!(history.redo_len(), 1);

        history.record_snapshot(Snapshot::from_store(&store_with(1, 0), "Event umbenennen"));
        assert_eq!(history.redo_len(), 0);
        assert_eq!(history.undo_label(), Some("Event umbenennen"));
    }

    #[test]
    fn overflow_evicts_oldest_first() {
        let mut history = EditHistory::new_with_capacity(3);
        for roots in 1..=5 {
            history.record_snapshot(Snapshot::from_store(&store_with(1, roots), format!("#{roots}")));
        }
        assert_eq!(history.undo_len(), 3);

        let mut restored = Vec::new();
        while let Some(snap) = history.pop_undo_with_current(Snapshot::from_store(&store_with(1, 0), "")) {
            restored.push(snap.label);
        }
        assert_eq!(restored, vec!["#5", "#4", "#3"]);
        assert_eq!(history.redo_len(), 3);
    }

    #[test]
    fn clear_empties_both_stacks() {
        let mut history = EditHistory::new_with_capacity(4);
        history.record_snapshot(Snapshot::from_store(&store_with(1, 0), "a"));
        history.record_snapshot(Snapshot::from_store(&store_with(1, 1), "b"));
        let _ = history.pop_undo_with_current(Snapshot::from_store(&store_with(1, 2), ""));
        history.clear();
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn apply_to_restores_events_index_and_allocator() {
        let snap = Snapshot::from_store(&store_with(2, 1), "vorher");

        let mut target = store_with(1, 10);
        snap.apply_to(&mut target);

        assert_eq!(target.event_count(), 2);
        assert_eq!(target.active_index(), 1);
        assert_eq!(target.events()[0].node_count(), 1);
        assert_eq!(target.next_id(), 1);
    }

    #[test]
    fn snapshot_shares_nothing_with_live_store() {
        let mut store = store_with(1, 1);
        let snap = Snapshot::from_store(&store, "vorher");

        store.remove_by_id(0);
        store.rename_event(0, "neu");
        assert_eq!(snap.events[0].node_count(), 1);
        assert_ne!(snap.events[0].name, "neu");
    }
}
