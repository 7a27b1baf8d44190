//! Session-Fassade für zentrale Command-Verarbeitung.
//!
//! Jede sichtbare Zustandsänderung läuft nach dem Muster
//! Snapshot → Mutation → Commit (Reach neu berechnen, Beobachter benachrichtigen).

use super::use_cases;
use super::use_cases::file_io::ExportSnapshot;
use super::{CommandLog, InsertTarget, SessionCommand, SessionState};
use crate::core::{
    BranchSide, EditResult, Event, EventStore, Node, NodeKindTag, NodeParams, ReachMap,
};
use crate::shared::EditorOptions;

/// Read-only Sicht auf den Zustand nach einem Commit.
#[derive(Debug, Clone, Copy)]
pub struct CommitView<'a> {
    /// Alle Events
    pub events: &'a [Event],
    /// Index des aktiven Events
    pub active_index: usize,
    /// Reach-Werte des aktiven Events
    pub reach: &'a ReachMap,
    /// Undo-Schritt verfügbar
    pub can_undo: bool,
    /// Redo-Schritt verfügbar
    pub can_redo: bool,
}

impl CommitView<'_> {
    /// Das aktive Event.
    pub fn active_event(&self) -> &Event {
        &self.events[self.active_index]
    }
}

/// Beobachter, der nach jedem Commit synchron aufgerufen wird (z.B. Rendering).
pub type CommitObserver = Box<dyn FnMut(&CommitView<'_>) -> anyhow::Result<()>>;

/// Orchestriert Store, History und Reach-Berechnung.
pub struct Session {
    state: SessionState,
    observers: Vec<CommitObserver>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Erstellt eine Session mit einem leeren Event und Standard-Optionen.
    pub fn new() -> Self {
        Self::with_options(EditorOptions::default())
    }

    /// Erstellt eine Session mit einem leeren Event.
    pub fn with_options(options: EditorOptions) -> Self {
        Self {
            state: SessionState::new(options),
            observers: Vec::new(),
        }
    }

    /// Erstellt eine Session aus bestehenden Events, ohne History-Eintrag.
    ///
    /// Der Allocator wird auf die vorhandenen IDs abgeglichen.
    pub fn from_events(events: Vec<Event>, options: EditorOptions) -> Self {
        let mut store = EventStore::new();
        store.replace_all(events, 0, 0);
        Self {
            state: SessionState::with_store(store, options),
            observers: Vec::new(),
        }
    }

    // ── Beobachter ─────────────────────────────────────────────────

    /// Registriert einen Beobachter. Gibt die Anzahl registrierter Beobachter zurück.
    ///
    /// Fehler eines Beobachters werden geloggt; der Commit bleibt bestehen und
    /// die übrigen Beobachter laufen weiter.
    pub fn subscribe<F>(&mut self, observer: F) -> usize
    where
        F: FnMut(&CommitView<'_>) -> anyhow::Result<()> + 'static,
    {
        self.observers.push(Box::new(observer));
        self.observers.len()
    }

    /// Entfernt alle Beobachter.
    pub fn clear_observers(&mut self) {
        self.observers.clear();
    }

    fn commit(&mut self) {
        self.state.recompute_reach();
        let view = CommitView {
            events: self.state.store.events(),
            active_index: self.state.store.active_index(),
            reach: &self.state.reach,
            can_undo: self.state.history.can_undo(),
            can_redo: self.state.history.can_redo(),
        };
        for (index, observer) in self.observers.iter_mut().enumerate() {
            if let Err(e) = observer(&view) {
                log::warn!("Beobachter {} fehlgeschlagen: {:#}", index, e);
            }
        }
    }

    fn finish<T>(&mut self, result: EditResult<T>) -> EditResult<T> {
        if result.is_ok() {
            self.commit();
        }
        result
    }

    // ── Lesender Zugriff ───────────────────────────────────────────

    /// Gesamter Session-State (read-only).
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Alle Events.
    pub fn events(&self) -> &[Event] {
        self.state.store.events()
    }

    /// Das aktive Event.
    pub fn active_event(&self) -> &Event {
        self.state.store.active_event()
    }

    /// Index des aktiven Events.
    pub fn active_index(&self) -> usize {
        self.state.store.active_index()
    }

    /// Nächste zu vergebende ID.
    pub fn next_id(&self) -> u64 {
        self.state.store.next_id()
    }

    /// Sucht einen Knoten im aktiven Event.
    pub fn find_node(&self, id: u64) -> Option<&Node> {
        self.state.store.find_by_id(id)
    }

    /// Reach-Werte des aktiven Events (Stand des letzten Commits).
    pub fn reach(&self) -> &ReachMap {
        &self.state.reach
    }

    /// Reach-Wahrscheinlichkeit eines Knotens im aktiven Event.
    pub fn reach_of(&self, id: u64) -> Option<f64> {
        self.state.reach.get(&id).copied()
    }

    /// Gibt zurück, ob ein Undo-Schritt verfügbar ist.
    pub fn can_undo(&self) -> bool {
        self.state.can_undo()
    }

    /// Gibt zurück, ob ein Redo-Schritt verfügbar ist.
    pub fn can_redo(&self) -> bool {
        self.state.can_redo()
    }

    /// Bezeichnung des nächsten Undo-Schritts.
    pub fn undo_label(&self) -> Option<&str> {
        self.state.history.undo_label()
    }

    /// Bezeichnung des nächsten Redo-Schritts.
    pub fn redo_label(&self) -> Option<&str> {
        self.state.history.redo_label()
    }

    /// Log der über [`Session::execute`] ausgeführten Commands.
    pub fn command_log(&self) -> &CommandLog {
        &self.state.command_log
    }

    // ── Events ─────────────────────────────────────────────────────

    /// Hängt ein leeres Event an und aktiviert es.
    pub fn add_event(&mut self) -> usize {
        let index = use_cases::events::add_event(&mut self.state);
        self.commit();
        index
    }

    /// Löscht ein Event (nie das letzte).
    pub fn delete_event(&mut self, index: usize) -> EditResult<()> {
        let result = use_cases::events::delete_event(&mut self.state, index);
        self.finish(result)
    }

    /// Wechselt das aktive Event.
    pub fn switch_active(&mut self, index: usize) -> EditResult<()> {
        let result = use_cases::events::switch_active(&mut self.state, index);
        self.finish(result)
    }

    /// Benennt ein Event um.
    pub fn rename_event(&mut self, index: usize, name: &str) -> EditResult<()> {
        let result = use_cases::events::rename_event(&mut self.state, index, name);
        self.finish(result)
    }

    // ── Knoten ─────────────────────────────────────────────────────

    /// Erzeugt einen Knoten mit frischer ID, ohne ihn einzufügen.
    pub fn create_node(&mut self, kind: NodeKindTag) -> EditResult<Node> {
        use_cases::nodes::create_node(&mut self.state, kind)
    }

    /// Erzeugt einen Knoten und fügt ihn am Ziel ein.
    pub fn add_node(&mut self, kind: NodeKindTag, target: InsertTarget) -> EditResult<u64> {
        let result = use_cases::nodes::add_node(&mut self.state, kind, target);
        self.finish(result)
    }

    /// Fügt einen mit [`Session::create_node`] erzeugten Knoten ein.
    pub fn insert_node(&mut self, node: Node, target: InsertTarget) -> EditResult<u64> {
        let result = use_cases::nodes::insert_node(&mut self.state, node, target);
        self.finish(result)
    }

    /// Entfernt einen Knoten samt Teilbaum.
    pub fn remove_node(&mut self, id: u64) -> EditResult<Node> {
        let result = use_cases::nodes::remove_node(&mut self.state, id);
        self.finish(result)
    }

    /// Entfernt mehrere Knoten in einem Undo-Schritt.
    pub fn remove_nodes(&mut self, ids: &[u64]) -> EditResult<Vec<Node>> {
        let result = use_cases::nodes::remove_nodes(&mut self.state, ids);
        self.finish(result)
    }

    /// Verschiebt einen Knoten in eine Sequenz einer Verzweigung.
    pub fn attach_node(&mut self, child_id: u64, parent_id: u64, side: BranchSide) -> EditResult<()> {
        let result = use_cases::nodes::attach_node(&mut self.state, child_id, parent_id, side);
        self.finish(result)
    }

    /// Verschiebt einen Knoten ans Ende der Wurzel-Sequenz.
    pub fn move_node_to_root(&mut self, id: u64) -> EditResult<()> {
        let result = use_cases::nodes::move_node_to_root(&mut self.state, id);
        self.finish(result)
    }

    /// Ersetzt die Parameter eines Knotens.
    pub fn set_node_params(&mut self, id: u64, params: NodeParams) -> EditResult<()> {
        let result = use_cases::nodes::set_node_params(&mut self.state, id, params);
        self.finish(result)
    }

    /// Setzt die Split-Wahrscheinlichkeit einer Verzweigung.
    pub fn set_split_probability(&mut self, id: u64, probability: f64) -> EditResult<()> {
        let result = use_cases::nodes::set_split_probability(&mut self.state, id, probability);
        self.finish(result)
    }

    // ── History ────────────────────────────────────────────────────

    /// Macht den letzten Schritt rückgängig.
    pub fn undo(&mut self) -> EditResult<()> {
        let result = use_cases::history::undo(&mut self.state);
        self.finish(result)
    }

    /// Wiederholt den zuletzt rückgängig gemachten Schritt.
    pub fn redo(&mut self) -> EditResult<()> {
        let result = use_cases::history::redo(&mut self.state);
        self.finish(result)
    }

    // ── Export / Import ────────────────────────────────────────────

    /// Tiefe Kopie aller Events mit Format-Version.
    pub fn export(&self) -> ExportSnapshot {
        use_cases::file_io::export(&self.state)
    }

    /// Export als JSON-Text.
    pub fn export_json(&self) -> anyhow::Result<String> {
        use_cases::file_io::export_json(&self.state)
    }

    /// XML-Projektion aller Events.
    pub fn export_xml(&self) -> anyhow::Result<String> {
        crate::xml::write_session_xml(self.events(), self.state.options.xml_indent)
    }

    /// Ersetzt alle Events (rückgängig machbar).
    pub fn import(&mut self, snapshot: ExportSnapshot) -> EditResult<()> {
        let result = use_cases::file_io::import(&mut self.state, snapshot);
        self.finish(result)
    }

    /// Ersetzt alle Events aus einer ungeprüften JSON-Struktur.
    pub fn import_value(&mut self, value: serde_json::Value) -> EditResult<()> {
        let result = use_cases::file_io::import_value(&mut self.state, value);
        self.finish(result)
    }

    /// Ersetzt alle Events aus JSON-Text.
    pub fn import_json(&mut self, text: &str) -> EditResult<()> {
        let result = use_cases::file_io::import_json(&mut self.state, text);
        self.finish(result)
    }

    /// Lädt eine Export-Datei.
    pub fn load_file(&mut self, path: &std::path::Path) -> anyhow::Result<()> {
        use_cases::file_io::load_file(&mut self.state, path)?;
        self.commit();
        Ok(())
    }

    /// Speichert alle Events als Export-Datei.
    pub fn save_file(&self, path: &std::path::Path) -> anyhow::Result<()> {
        use_cases::file_io::save_file(&self.state, path)
    }

    // ── Commands ───────────────────────────────────────────────────

    /// Führt einen Command aus und protokolliert ihn.
    pub fn execute(&mut self, command: SessionCommand) -> EditResult<()> {
        self.state.command_log.record(&command);

        match command {
            // === Events ===
            SessionCommand::AddEvent => {
                self.add_event();
                Ok(())
            }
            SessionCommand::DeleteEvent { index } => self.delete_event(index),
            SessionCommand::SwitchActiveEvent { index } => self.switch_active(index),
            SessionCommand::RenameEvent { index, name } => self.rename_event(index, &name),

            // === Knoten ===
            SessionCommand::AddNode { kind, target } => self.add_node(kind, target).map(|_| ()),
            SessionCommand::RemoveNode { id } => self.remove_node(id).map(|_| ()),
            SessionCommand::RemoveNodes { ids } => self.remove_nodes(&ids).map(|_| ()),
            SessionCommand::AttachNode {
                child_id,
                parent_id,
                side,
            } => self.attach_node(child_id, parent_id, side),
            SessionCommand::MoveNodeToRoot { id } => self.move_node_to_root(id),
            SessionCommand::SetNodeParams { id, params } => self.set_node_params(id, params),

            // === Import ===
            SessionCommand::Import { snapshot } => self.import(snapshot),

            // === History ===
            SessionCommand::Undo => self.undo(),
            SessionCommand::Redo => self.redo(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::EditError;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn failed_operation_does_not_commit_or_snapshot() {
        let mut session = Session::new();
        let commits = Rc::new(Cell::new(0));
        let counter = Rc::clone(&commits);
        session.subscribe(move |_| {
            counter.set(counter.get() + 1);
            Ok(())
        });

        assert_eq!(session.remove_node(7).unwrap_err(), EditError::NotFound(7));
        assert_eq!(session.switch_active(3), Err(EditError::EventIndexOutOfRange(3)));
        assert_eq!(commits.get(), 0);
        assert!(!session.can_undo());
    }

    #[test]
    fn observer_error_is_logged_and_others_still_run() {
        let mut session = Session::new();
        let seen = Rc::new(Cell::new(0));
        let counter = Rc::clone(&seen);
        session.subscribe(|_| anyhow::bail!("Render fehlgeschlagen"));
        session.subscribe(move |view| {
            counter.set(view.active_event().node_count());
            Ok(())
        });

        session
            .add_node(NodeKindTag::SpawnItem, InsertTarget::Root)
            .expect("Einfügen an Wurzel");
        assert_eq!(seen.get(), 1);
        assert_eq!(session.active_event().node_count(), 1);
    }

    #[test]
    fn create_node_does_not_touch_history() {
        let mut session = Session::new();
        let node = session.create_node(NodeKindTag::Branch).expect("ID frei");
        assert_eq!(node.id, 0);
        assert_eq!(session.next_id(), 1);
        assert!(!session.can_undo());
        assert!(session.active_event().is_empty());
    }

    #[test]
    fn execute_records_command_log() {
        let mut session = Session::new();
        session
            .execute(SessionCommand::AddEvent)
            .expect("AddEvent");
        let result = session.execute(SessionCommand::DeleteEvent { index: 9 });
        assert!(result.is_err());

        assert_eq!(session.command_log().len(), 2);
        assert_eq!(
            session.command_log().entries().last(),
            Some(&SessionCommand::DeleteEvent { index: 9 })
        );
    }
}
