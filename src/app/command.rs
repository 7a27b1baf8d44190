use super::use_cases::file_io::ExportSnapshot;
use crate::core::{BranchSide, NodeKindTag, NodeParams};

/// Ziel beim Einfügen eines neuen Knotens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertTarget {
    /// Ans Ende der Wurzel-Sequenz des aktiven Events
    Root,
    /// Ans Ende einer benannten Sequenz einer Verzweigung
    Branch { parent_id: u64, side: BranchSide },
}

/// Commands sind mutierende Schritte, die zentral über die Session ausgeführt werden.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    /// Leeres Event anhängen und aktivieren
    AddEvent,
    /// Event löschen (nie das letzte)
    DeleteEvent { index: usize },
    /// Aktives Event wechseln
    SwitchActiveEvent { index: usize },
    /// Event umbenennen
    RenameEvent { index: usize, name: String },
    /// Neuen Knoten erzeugen und einfügen
    AddNode {
        kind: NodeKindTag,
        target: InsertTarget,
    },
    /// Knoten samt Teilbaum entfernen
    RemoveNode { id: u64 },
    /// Mehrere Knoten in einem Undo-Schritt entfernen
    RemoveNodes { ids: Vec<u64> },
    /// Knoten in die Sequenz einer Verzweigung verschieben
    AttachNode {
        child_id: u64,
        parent_id: u64,
        side: BranchSide,
    },
    /// Knoten ans Ende der Wurzel-Sequenz verschieben
    MoveNodeToRoot { id: u64 },
    /// Parameter eines Knotens ersetzen
    SetNodeParams { id: u64, params: NodeParams },
    /// Alle Events durch importierte ersetzen
    Import { snapshot: ExportSnapshot },
    /// Letzten Schritt rückgängig machen
    Undo,
    /// Rückgängig gemachten Schritt wiederholen
    Redo,
}
