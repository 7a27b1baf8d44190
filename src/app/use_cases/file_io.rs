//! Use-Case-Funktionen für Export und Import.
//! Alle Dateisystem-Operationen (I/O) sind hier zentralisiert.

use crate::app::SessionState;
use crate::core::tree;
use crate::core::{EditError, EditResult, Event, EventStore, MAX_NODE_ID, MAX_TREE_DEPTH};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

/// Größte JSON-Schachtelung eines Exports mit [`MAX_TREE_DEPTH`] Ebenen.
///
/// Pro Baum-Ebene kommen drei JSON-Ebenen hinzu (Knoten, `children`, Sequenz),
/// dazu Dokument, `events`, Event, `model` und `parameters`.
pub const MAX_JSON_DEPTH: usize = 3 * MAX_TREE_DEPTH + 8;

/// Serialisierbare Kopie aller Events mit Format-Version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportSnapshot {
    /// Format-Version des Exports
    pub version: String,
    /// Alle Events in Reihenfolge
    pub events: Vec<Event>,
}

/// Erstellt eine tiefe Kopie aller Events (keine geteilten Referenzen).
pub fn export(state: &SessionState) -> ExportSnapshot {
    ExportSnapshot {
        version: state.options.export_version.clone(),
        events: state.store.events().to_vec(),
    }
}

/// Exportiert alle Events als JSON-Text.
pub fn export_json(state: &SessionState) -> anyhow::Result<String> {
    let snapshot = export(state);
    Ok(serde_json::to_string_pretty(&snapshot)?)
}

/// Ersetzt alle Events durch die importierten.
///
/// Alles-oder-nichts: Bei fehlerhaften Daten bleibt der Zustand unverändert.
/// Vor dem Ersetzen wird ein Snapshot angelegt, der Import ist also
/// rückgängig machbar. Danach ist Event 0 aktiv und der Allocator abgeglichen.
pub fn import(state: &mut SessionState, snapshot: ExportSnapshot) -> EditResult<()> {
    let mut events = snapshot.events;
    if let Some(duplicate) = EventStore::find_duplicate_id(&events) {
        return Err(EditError::MalformedImport(format!(
            "ID {} kommt mehrfach vor",
            duplicate
        )));
    }
    if let Some(reserved) = EventStore::find_reserved_id(&events) {
        return Err(EditError::MalformedImport(format!(
            "ID {} liegt außerhalb des vergebbaren Bereichs (max. {})",
            reserved, MAX_NODE_ID
        )));
    }
    if let Some(index) = events
        .iter()
        .position(|event| tree::height(&event.model) > MAX_TREE_DEPTH)
    {
        return Err(EditError::MalformedImport(format!(
            "Event {} ist tiefer als {} Ebenen",
            index, MAX_TREE_DEPTH
        )));
    }
    for (index, event) in events.iter_mut().enumerate() {
        if event.name.is_empty() {
            event.name = format!("event_{}", index + 1);
        }
    }

    state.record_undo_snapshot("Import");
    let event_count = events.len();
    state.store.replace_all(events, 0, 0);
    log::info!(
        "Import (Version {}): {} Events, nächste ID {}",
        snapshot.version,
        event_count,
        state.store.next_id()
    );
    Ok(())
}

/// Importiert eine strukturell ungeprüfte JSON-Struktur.
///
/// Geprüft wird nur die oberste Ebene: `events` muss eine Liste sein,
/// ein fehlendes `model` gilt als leere Liste.
pub fn import_value(state: &mut SessionState, value: Value) -> EditResult<()> {
    if value_depth(&value) > MAX_JSON_DEPTH {
        return Err(too_deep());
    }
    let Some(raw_events) = value.get("events").and_then(Value::as_array) else {
        log::warn!("Import abgelehnt: keine 'events'-Liste");
        return Err(EditError::MalformedImport(
            "'events' fehlt oder ist keine Liste".to_string(),
        ));
    };

    let events = raw_events
        .iter()
        .enumerate()
        .map(|(index, raw)| {
            Event::deserialize(raw).map_err(|e| {
                EditError::MalformedImport(format!("Event {}: {}", index, e))
            })
        })
        .collect::<EditResult<Vec<Event>>>()?;

    let version = value
        .get("version")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    import(state, ExportSnapshot { version, events })
}

/// Importiert JSON-Text.
///
/// Die Schachtelung wird vor dem Parsen begrenzt; das eingebaute
/// Rekursionslimit von serde_json ist für tiefe Bäume zu knapp.
pub fn import_json(state: &mut SessionState, text: &str) -> EditResult<()> {
    if text_depth(text) > MAX_JSON_DEPTH {
        return Err(too_deep());
    }
    let value = parse_unbounded(text)
        .map_err(|e| EditError::MalformedImport(format!("kein gültiges JSON: {}", e)))?;
    import_value(state, value)
}

fn parse_unbounded(text: &str) -> serde_json::Result<Value> {
    let mut deserializer = serde_json::Deserializer::from_str(text);
    deserializer.disable_recursion_limit();
    let value = Value::deserialize(&mut deserializer)?;
    deserializer.end()?;
    Ok(value)
}

fn too_deep() -> EditError {
    EditError::MalformedImport(format!(
        "Schachtelung tiefer als {} JSON-Ebenen",
        MAX_JSON_DEPTH
    ))
}

/// Maximale Klammer-Tiefe eines JSON-Texts (Strings werden übersprungen).
fn text_depth(text: &str) -> usize {
    let (mut depth, mut max) = (0usize, 0usize);
    let (mut in_string, mut escaped) = (false, false);
    for byte in text.bytes() {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'{' | b'[' => {
                depth += 1;
                max = max.max(depth);
            }
            b'}' | b']' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    max
}

/// Schachtelungstiefe eines JSON-Werts, iterativ ermittelt.
fn value_depth(value: &Value) -> usize {
    let mut max = 0;
    let mut pending = vec![(value, 0usize)];
    while let Some((current, depth)) = pending.pop() {
        match current {
            Value::Array(items) => {
                max = max.max(depth + 1);
                pending.extend(items.iter().map(|item| (item, depth + 1)));
            }
            Value::Object(fields) => {
                max = max.max(depth + 1);
                pending.extend(fields.values().map(|field| (field, depth + 1)));
            }
            _ => {}
        }
    }
    max
}

/// Lädt eine Export-Datei in die Session.
pub fn load_file(state: &mut SessionState, path: &Path) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Export-Datei nicht lesbar: {}", path.display()))?;
    import_json(state, &text).with_context(|| format!("Import aus {} fehlgeschlagen", path.display()))?;
    log::info!("Geladen: {}", path.display());
    Ok(())
}

/// Schreibt alle Events als JSON-Datei.
pub fn save_file(state: &SessionState, path: &Path) -> anyhow::Result<()> {
    let text = export_json(state)?;
    std::fs::write(path, text)
        .with_context(|| format!("Export-Datei nicht schreibbar: {}", path.display()))?;
    log::info!("Gespeichert: {}", path.display());
    Ok(())
}
