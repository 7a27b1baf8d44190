//! Zentrale Konfiguration für den RNG-Event-Editor.
//!
//! `EditorOptions` enthält alle zur Laufzeit änderbaren Werte.
//! Die `const`-Werte bleiben als Fallback/Default erhalten.

use serde::{Deserialize, Serialize};

// ── History ─────────────────────────────────────────────────────────

/// Maximale Anzahl an Undo-Schritten.
pub const HISTORY_DEPTH: usize = 50;
/// Maximale Anzahl geloggter Commands.
pub const COMMAND_LOG_LIMIT: usize = 1000;

// ── Export ──────────────────────────────────────────────────────────

/// Format-Version, die in jeden JSON-Export geschrieben wird.
pub const EXPORT_VERSION: &str = "1.0";
/// Einrückung (Leerzeichen) im XML-Export.
pub const XML_INDENT: usize = 4;

// ── Knoten ──────────────────────────────────────────────────────────

/// Split-Wahrscheinlichkeit neu erzeugter Verzweigungen.
pub const DEFAULT_SPLIT_PROBABILITY: f64 = crate::core::node::DEFAULT_SPLIT_PROBABILITY;

// ── Laufzeit-Optionen (serialisierbar) ─────────────────────────────

/// Alle zur Laufzeit änderbaren Editor-Optionen.
/// Wird als `rng_event_editor.toml` neben der Binary gespeichert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorOptions {
    /// Maximale Undo-Tiefe
    #[serde(default = "default_history_depth")]
    pub history_depth: usize,
    /// Maximale Länge des Command-Logs
    #[serde(default = "default_command_log_limit")]
    pub command_log_limit: usize,
    /// Versions-Tag für JSON-Exporte
    #[serde(default = "default_export_version")]
    pub export_version: String,
    /// Einrückung im XML-Export (0 = kompakt)
    #[serde(default = "default_xml_indent")]
    pub xml_indent: usize,
    /// Split-Wahrscheinlichkeit neuer Verzweigungen
    #[serde(default = "default_split_probability")]
    pub default_split_probability: f64,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            history_depth: HISTORY_DEPTH,
            command_log_limit: COMMAND_LOG_LIMIT,
            export_version: EXPORT_VERSION.to_string(),
            xml_indent: XML_INDENT,
            default_split_probability: DEFAULT_SPLIT_PROBABILITY,
        }
    }
}

/// Serde-Default für `history_depth` (Abwärtskompatibilität bestehender TOML-Dateien).
fn default_history_depth() -> usize {
    HISTORY_DEPTH
}

fn default_command_log_limit() -> usize {
    COMMAND_LOG_LIMIT
}

fn default_export_version() -> String {
    EXPORT_VERSION.to_string()
}

fn default_xml_indent() -> usize {
    XML_INDENT
}

fn default_split_probability() -> f64 {
    DEFAULT_SPLIT_PROBABILITY
}

impl EditorOptions {
    /// Lädt Optionen aus einer TOML-Datei. Bei Fehler: Standardwerte.
    pub fn load_from_file(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(opts) => {
                    log::info!("Optionen geladen aus: {}", path.display());
                    opts
                }
                Err(e) => {
                    log::warn!("Optionen-Datei fehlerhaft, verwende Standardwerte: {}", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Keine Optionen-Datei gefunden, verwende Standardwerte");
                Self::default()
            }
        }
    }

    /// Speichert Optionen als TOML-Datei.
    pub fn save_to_file(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        log::info!("Optionen gespeichert nach: {}", path.display());
        Ok(())
    }

    /// Ermittelt den Pfad zur Optionen-Datei neben der Binary.
    pub fn config_path() -> std::path::PathBuf {
        std::env::current_exe()
            .unwrap_or_else(|_| std::path::PathBuf::from("rng_event_editor"))
            .parent()
            .unwrap_or_else(|| std::path::Path::new("."))
            .join("rng_event_editor.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let opts: EditorOptions = toml::from_str("history_depth = 5\n").expect("TOML gültig");
        assert_eq!(opts.history_depth, 5);
        assert_eq!(opts.export_version, EXPORT_VERSION);
        assert_eq!(opts.xml_indent, XML_INDENT);
    }

    #[test]
    fn toml_roundtrip_preserves_values() {
        let mut opts = EditorOptions::default();
        opts.xml_indent = 2;
        opts.default_split_probability = 0.3;
        let text = toml::to_string_pretty(&opts).expect("Serialisierung");
        let parsed: EditorOptions = toml::from_str(&text).expect("Parsing");
        assert_eq!(parsed, opts);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let path = std::path::Path::new("/nonexistent/rng_event_editor.toml");
        assert_eq!(EditorOptions::load_from_file(path), EditorOptions::default());
    }
}
