//! RNG Event Editor (Kommandozeile).
//!
//! Lädt einen JSON-Export, berechnet die Reach-Werte aller Events und
//! schreibt die RNGAction-XML-Projektion in eine Datei oder auf stdout.

use anyhow::Context;
use clap::Parser;
use rng_event_editor::core::summarize;
use rng_event_editor::{EditorOptions, Session};
use std::path::PathBuf;

/// Exportiert RNG-Event-Bäume als RNGAction-XML.
#[derive(Debug, Parser)]
#[command(name = "rng-event-editor", version, about)]
struct Cli {
    /// JSON-Export mit allen Events
    input: PathBuf,

    /// Ziel-Datei für das XML (ohne Angabe: stdout)
    output: Option<PathBuf>,

    /// Optionen-Datei (Standard: rng_event_editor.toml neben der Binary)
    #[arg(short, long, env = "RNG_EVENT_EDITOR_CONFIG")]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    // Logger initialisieren
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let cli = Cli::parse();
    log::info!("RNG Event Editor v{} startet...", env!("CARGO_PKG_VERSION"));

    // Optionen aus TOML laden (oder Standardwerte)
    let config_path = cli.config.unwrap_or_else(EditorOptions::config_path);
    let options = EditorOptions::load_from_file(&config_path);
    let mut session = Session::with_options(options);
    session.load_file(&cli.input)?;

    for index in 0..session.events().len() {
        session
            .switch_active(index)
            .with_context(|| format!("Event {} nicht aktivierbar", index))?;
        let event = session.active_event();
        let summary = summarize(event, session.reach());
        log::info!(
            "Event '{}': {} Verzweigungen, {} Aktionen, erwartet: {:.3} Items, {:.3} Kreaturen, {:.3} Afflictions",
            event.name,
            summary.branches,
            summary.leaves,
            summary.expected_items,
            summary.expected_creatures,
            summary.expected_afflictions
        );
    }

    let xml = session.export_xml()?;
    match cli.output {
        Some(path) => {
            std::fs::write(&path, xml)
                .with_context(|| format!("XML nicht schreibbar: {}", path.display()))?;
            log::info!("XML geschrieben nach: {}", path.display());
        }
        None => print!("{}", xml),
    }

    Ok(())
}
