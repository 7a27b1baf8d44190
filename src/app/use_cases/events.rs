//! Use-Case-Funktionen für Event-Verwaltung (Tabs).

use crate::app::SessionState;
use crate::core::{EditError, EditResult};

/// Hängt ein leeres Event an und aktiviert es. Gibt den neuen Index zurück.
pub fn add_event(state: &mut SessionState) -> usize {
    // Snapshot VOR Mutation
    state.record_undo_snapshot("Event hinzufügen");
    let index = state.store.add_event();
    log::info!("Event {} hinzugefügt", index);
    index
}

/// Löscht ein Event. Das letzte verbleibende Event wird verweigert.
///
/// Eine Sicherheitsabfrage ist Sache der UI, hier wird nur die harte
/// Invariante (mindestens ein Event) durchgesetzt.
pub fn delete_event(state: &mut SessionState, index: usize) -> EditResult<()> {
    if index >= state.store.event_count() {
        log::debug!("Event {} existiert nicht", index);
        return Err(EditError::EventIndexOutOfRange(index));
    }
    if state.store.event_count() <= 1 {
        log::warn!("Das letzte Event kann nicht gelöscht werden");
        return Err(EditError::CannotDeleteLast);
    }

    state.record_undo_snapshot("Event löschen");
    let removed = state.store.delete_event(index)?;
    log::info!(
        "Event '{}' gelöscht ({} Knoten), aktiv: {}",
        removed.name,
        removed.node_count(),
        state.store.active_index()
    );
    Ok(())
}

/// Wechselt das aktive Event. Ungültige Indizes ändern nichts.
pub fn switch_active(state: &mut SessionState, index: usize) -> EditResult<()> {
    if index >= state.store.event_count() {
        log::debug!("Event-Wechsel ignoriert: Index {} ungültig", index);
        return Err(EditError::EventIndexOutOfRange(index));
    }

    state.record_undo_snapshot("Event wechseln");
    state.store.switch_active(index);
    log::info!("Aktives Event: {}", index);
    Ok(())
}

/// Benennt ein Event um.
pub fn rename_event(state: &mut SessionState, index: usize, name: &str) -> EditResult<()> {
    if index >= state.store.event_count() {
        return Err(EditError::EventIndexOutOfRange(index));
    }

    state.record_undo_snapshot("Event umbenennen");
    state.store.rename_event(index, name);
    log::info!("Event {} umbenannt in '{}'", index, name);
    Ok(())
}
