//! Die zentrale Datenhaltung: alle Events, aktives Event und ID-Allocator.

use super::error::{EditError, EditResult};
use super::event::Event;
use super::node::{BranchSide, Node, NodeKindTag, MAX_NODE_ID};
use super::tree;
use std::collections::HashSet;

/// Container für alle Event-Bäume einer Session
///
/// Knoten-Operationen beziehen sich immer auf das aktive Event.
#[derive(Debug, Clone, PartialEq)]
pub struct EventStore {
    events: Vec<Event>,
    active_index: usize,
    next_id: u64,
}

impl Default for EventStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EventStore {
    /// Erstellt einen Store mit genau einem leeren Event.
    pub fn new() -> Self {
        Self {
            events: vec![Event::new(default_event_name(0))],
            active_index: 0,
            next_id: 0,
        }
    }

    /// Ersetzt den kompletten Zustand (Snapshot-Installation, Import).
    ///
    /// Eine leere Event-Liste wird durch ein leeres Event ersetzt, der aktive
    /// Index auf einen gültigen Wert begrenzt. Der Allocator wird danach
    /// mit den tatsächlich vorhandenen IDs abgeglichen.
    pub fn replace_all(&mut self, events: Vec<Event>, active_index: usize, next_id: u64) {
        self.events = if events.is_empty() {
            vec![Event::new(default_event_name(0))]
        } else {
            events
        };
        self.active_index = active_index.min(self.events.len() - 1);
        self.next_id = next_id;
        self.reconcile_id_allocator();
    }

    // ── Events ─────────────────────────────────────────────────────

    /// Alle Events in Reihenfolge.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Anzahl der Events (immer ≥ 1).
    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    /// Index des aktiven Events.
    pub fn active_index(&self) -> usize {
        self.active_index
    }

    /// Das aktive Event.
    pub fn active_event(&self) -> &Event {
        &self.events[self.active_index]
    }

    fn active_model_mut(&mut self) -> &mut Vec<Node> {
        &mut self.events[self.active_index].model
    }

    /// Hängt ein leeres Event an und aktiviert es. Gibt den neuen Index zurück.
    pub fn add_event(&mut self) -> usize {
        let index = self.events.len();
        self.events.push(Event::new(default_event_name(index)));
        self.active_index = index;
        index
    }

    /// Löscht ein Event. Das letzte verbleibende Event wird nie gelöscht.
    ///
    /// Lag der aktive Index hinter der gelöschten Position, rückt er nach,
    /// sodass dasselbe Event aktiv bleibt; danach wird er auf den letzten
    /// gültigen Index begrenzt.
    pub fn delete_event(&mut self, index: usize) -> EditResult<Event> {
        if index >= self.events.len() {
            return Err(EditError::EventIndexOutOfRange(index));
        }
        if self.events.len() <= 1 {
            return Err(EditError::CannotDeleteLast);
        }
        let removed = self.events.remove(index);
        if index < self.active_index {
            self.active_index -= 1;
        }
        self.active_index = self.active_index.min(self.events.len() - 1);
        Ok(removed)
    }

    /// Wechselt das aktive Event. Ungültige Indizes werden ignoriert.
    pub fn switch_active(&mut self, index: usize) -> bool {
        if index >= self.events.len() {
            return false;
        }
        self.active_index = index;
        true
    }

    /// Benennt ein Event um.
    pub fn rename_event(&mut self, index: usize, name: &str) -> bool {
        match self.events.get_mut(index) {
            Some(event) => {
                event.name = name.to_string();
                true
            }
            None => false,
        }
    }

    // ── ID-Allocator ───────────────────────────────────────────────

    /// Nächste zu vergebende ID.
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    /// Gibt `true` zurück, solange noch IDs bis [`MAX_NODE_ID`] frei sind.
    pub fn can_allocate(&self) -> bool {
        self.next_id <= MAX_NODE_ID
    }

    /// Erzeugt einen Knoten mit frischer ID, ohne ihn einzufügen.
    ///
    /// `None`, wenn der ID-Bereich erschöpft ist.
    pub fn create_node(&mut self, tag: NodeKindTag) -> Option<Node> {
        if !self.can_allocate() {
            return None;
        }
        let id = self.next_id;
        self.next_id = id.checked_add(1)?;
        Some(Node::new(id, tag))
    }

    /// Setzt den Allocator auf eins über der größten ID aller Events.
    pub fn reconcile_id_allocator(&mut self) {
        self.next_id = self
            .events
            .iter()
            .filter_map(|event| tree::max_id(&event.model))
            .max()
            .map_or(0, |max| max.checked_add(1).unwrap_or(u64::MAX));
    }

    /// Liefert die erste ID über [`MAX_NODE_ID`] (nicht vergebbar).
    pub fn find_reserved_id(events: &[Event]) -> Option<u64> {
        events
            .iter()
            .filter_map(|event| tree::max_id(&event.model))
            .find(|&id| id > MAX_NODE_ID)
    }

    /// Liefert die erste mehrfach vorkommende ID über alle Events.
    pub fn find_duplicate_id(events: &[Event]) -> Option<u64> {
        let mut seen = HashSet::new();
        let mut duplicate = None;
        for event in events {
            tree::walk_preorder(&event.model, &mut |node, _| {
                if duplicate.is_none() && !seen.insert(node.id) {
                    duplicate = Some(node.id);
                }
            });
        }
        duplicate
    }

    // ── Knoten im aktiven Event ────────────────────────────────────

    /// Sucht einen Knoten im aktiven Event.
    pub fn find_by_id(&self, id: u64) -> Option<&Node> {
        tree::find(&self.active_event().model, id)
    }

    /// Sucht einen Knoten im aktiven Event (mutable).
    pub fn find_by_id_mut(&mut self, id: u64) -> Option<&mut Node> {
        tree::find_mut(self.active_model_mut(), id)
    }

    /// Löst einen Knoten samt Teilbaum aus dem aktiven Event.
    pub fn remove_by_id(&mut self, id: u64) -> Option<Node> {
        tree::remove(self.active_model_mut(), id)
    }

    /// Verschiebt einen Knoten in die benannte Sequenz einer Verzweigung.
    ///
    /// Siehe [`tree::attach`] für die Vorbedingung der Aufrufer.
    pub fn attach(&mut self, child_id: u64, parent_id: u64, side: BranchSide) -> bool {
        tree::attach(self.active_model_mut(), child_id, parent_id, side)
    }

    /// Verschiebt einen Knoten ans Ende der Wurzel-Sequenz.
    pub fn move_to_root(&mut self, id: u64) -> bool {
        let model = self.active_model_mut();
        match tree::remove(model, id) {
            Some(node) => {
                model.push(node);
                true
            }
            None => false,
        }
    }

    /// Hängt einen Knoten an die Wurzel-Sequenz des aktiven Events an.
    pub fn insert_root(&mut self, node: Node) {
        self.active_model_mut().push(node);
    }

    /// Hängt einen Knoten an die Sequenz einer Verzweigung an.
    ///
    /// Gibt den Knoten zurück, wenn der Elternknoten fehlt oder ein Blatt ist.
    pub fn insert_into(&mut self, parent_id: u64, side: BranchSide, node: Node) -> Result<(), Node> {
        match self.find_by_id_mut(parent_id).and_then(|p| p.branch_mut(side)) {
            Some(seq) => {
                seq.push(node);
                Ok(())
            }
            None => Err(node),
        }
    }

    /// Gibt `true` zurück, wenn `id` im Teilbaum von `root_id` (inklusive) liegt.
    pub fn is_in_subtree(&self, root_id: u64, id: u64) -> bool {
        tree::is_in_subtree(&self.active_event().model, root_id, id)
    }
}

fn default_event_name(index: usize) -> String {
    format!("event_{}", index + 1)
}
