//! XML-Export der Event-Bäume.
//!
//! Pro Verzweigung ein `<RNGAction chance="p">` mit `<Success>`/`<Failure>`,
//! pro Blatt-Aktion ein selbstschließendes Element mit Parametern als Attributen.

pub mod writer;

pub use writer::{write_event_xml, write_session_xml};
