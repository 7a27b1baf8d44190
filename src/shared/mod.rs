//! Geteilte Typen für layer-übergreifende Verträge.

pub mod options;

pub use options::EditorOptions;
pub use options::{EXPORT_VERSION, HISTORY_DEPTH};
