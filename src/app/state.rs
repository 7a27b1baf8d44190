//! Session State — zentrale Datenhaltung.

use super::history::{EditHistory, Snapshot};
use super::CommandLog;
use crate::core::{compute_reach, EventStore, ReachMap};
use crate::shared::EditorOptions;

/// Gesamter veränderlicher Zustand einer Editor-Session.
#[derive(Debug)]
pub struct SessionState {
    /// Alle Events, aktives Event und ID-Allocator
    pub store: EventStore,
    /// Undo/Redo-History (Snapshot-basiert)
    pub history: EditHistory,
    /// Reach-Wahrscheinlichkeiten des aktiven Events (Stand des letzten Commits)
    pub reach: ReachMap,
    /// Log der ausgeführten Commands
    pub command_log: CommandLog,
    /// Laufzeit-Optionen
    pub options: EditorOptions,
}

impl SessionState {
    /// Erstellt einen neuen State mit einem leeren Event.
    pub fn new(options: EditorOptions) -> Self {
        Self::with_store(EventStore::new(), options)
    }

    /// Erstellt einen State um einen bestehenden Store (ohne History).
    pub fn with_store(store: EventStore, options: EditorOptions) -> Self {
        let reach = compute_reach(store.active_event());
        Self {
            store,
            history: EditHistory::new_with_capacity(options.history_depth),
            reach,
            command_log: CommandLog::with_limit(options.command_log_limit),
            options,
        }
    }

    /// Gibt zurück, ob ein Undo-Schritt verfügbar ist.
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Gibt zurück, ob ein Redo-Schritt verfügbar ist.
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Erstellt einen Undo-Snapshot des aktuellen Zustands.
    /// Muss vor jeder Mutation aufgerufen werden, genau einmal pro Benutzer-Aktion.
    pub fn record_undo_snapshot(&mut self, label: &str) {
        let snap = Snapshot::from_store(&self.store, label);
        self.history.record_snapshot(snap);
    }

    /// Berechnet die Reach-Werte des aktiven Events neu.
    pub fn recompute_reach(&mut self) {
        self.reach = compute_reach(self.store.active_event());
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(EditorOptions::default())
    }
}
