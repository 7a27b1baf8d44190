//! Use-Cases der Application-Layer-Orchestrierung.
//!
//! Jede mutierende Funktion legt genau einen Undo-Snapshot an, bevor sie den
//! Zustand verändert. Neuberechnung und Benachrichtigung übernimmt die Session.

pub mod events;
pub mod file_io;
pub mod history;
pub mod nodes;
