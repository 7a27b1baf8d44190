//! Use-Case-Funktionen für Undo/Redo.

use crate::app::history::Snapshot;
use crate::app::SessionState;
use crate::core::{EditError, EditResult};

/// Führt einen Undo-Schritt aus, falls vorhanden.
///
/// Der Live-Zustand wandert auf den Redo-Stack, der Snapshot ersetzt ihn
/// vollständig; danach wird der ID-Allocator abgeglichen.
pub fn undo(state: &mut SessionState) -> EditResult<()> {
    let current = Snapshot::from_store(&state.store, "");
    match state.history.pop_undo_with_current(current) {
        Some(prev) => {
            let label = prev.label.clone();
            prev.apply_to(&mut state.store);
            log::info!("Undo ausgeführt: {}", label);
            Ok(())
        }
        None => {
            log::debug!("Undo: nichts zu tun");
            Err(EditError::EmptyHistory)
        }
    }
}

/// Führt einen Redo-Schritt aus, falls vorhanden.
pub fn redo(state: &mut SessionState) -> EditResult<()> {
    let current = Snapshot::from_store(&state.store, "");
    match state.history.pop_redo_with_current(current) {
        Some(next) => {
            let label = next.label.clone();
            next.apply_to(&mut state.store);
            log::info!("Redo ausgeführt: {}", label);
            Ok(())
        }
        None => {
            log::debug!("Redo: nichts zu tun");
            Err(EditError::EmptyHistory)
        }
    }
}
