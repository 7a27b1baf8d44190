//! Fehlertypen der Editor-Operationen.
//!
//! Alle Fehler sind lokal und wiederherstellbar: Sie werden als Werte
//! zurückgegeben, der Zustand bleibt bei einem Fehler unverändert.

use thiserror::Error;

/// Fehlschlag einer Editor-Operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    /// Kein Node mit dieser ID im aktiven Event
    #[error("Node {0} nicht gefunden")]
    NotFound(u64),
    /// Operation ist für die gegebenen Nodes nicht zulässig
    #[error("Ungültige Operation: {0}")]
    InvalidOperation(String),
    /// Das letzte verbleibende Event darf nicht gelöscht werden
    #[error("Das letzte Event kann nicht gelöscht werden")]
    CannotDeleteLast,
    /// Event-Index liegt außerhalb der Event-Liste
    #[error("Event-Index {0} außerhalb des gültigen Bereichs")]
    EventIndexOutOfRange(usize),
    /// Undo/Redo ohne Einträge
    #[error("Keine History-Einträge vorhanden")]
    EmptyHistory,
    /// Import-Daten ohne gültige `events`-Liste
    #[error("Import fehlerhaft: {0}")]
    MalformedImport(String),
}

/// Ergebnis-Typ der Editor-Operationen.
pub type EditResult<T> = Result<T, EditError>;
