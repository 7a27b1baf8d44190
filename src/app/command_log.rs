//! Command-Log der ausgeführten Session-Commands.

use super::SessionCommand;

/// Speichert ausgeführte Commands in Reihenfolge.
#[derive(Debug)]
pub struct CommandLog {
    entries: Vec<SessionCommand>,
    max_entries: usize,
}

impl Default for CommandLog {
    fn default() -> Self {
        Self::with_limit(crate::shared::options::COMMAND_LOG_LIMIT)
    }
}

impl CommandLog {
    /// Erstellt ein leeres Command-Log mit maximaler Länge.
    pub fn with_limit(max_entries: usize) -> Self {
        Self {
            entries: Vec::new(),
            max_entries: max_entries.max(2),
        }
    }

    /// Fügt einen ausgeführten Command hinzu.
    /// Begrenzt auf `max_entries`, die ältere Hälfte wird bei Überlauf verworfen.
    pub fn record(&mut self, command: &SessionCommand) {
        if self.entries.len() >= self.max_entries {
            self.entries.drain(..self.max_entries / 2);
        }
        self.entries.push(command.clone());
    }

    /// Gibt die Anzahl der geloggten Commands zurück.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Gibt `true` zurück, wenn keine Commands vorhanden sind.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Liefert eine read-only Sicht auf alle Einträge.
    pub fn entries(&self) -> &[SessionCommand] {
        &self.entries
    }
}
