//! Ein Event: benannter Container mit einer geordneten Wurzel-Sequenz.

use super::node::Node;
use super::tree;
use serde::{Deserialize, Serialize};

/// Unabhängiger Event-Baum innerhalb einer Session
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Event {
    /// Anzeigename, wird als `identifier` ins XML geschrieben
    #[serde(default)]
    pub name: String,
    /// Wurzel-Knoten ohne gemeinsamen Elternknoten
    #[serde(default)]
    pub model: Vec<Node>,
}

impl Event {
    /// Erstellt ein leeres Event.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: Vec::new(),
        }
    }

    /// Anzahl aller Knoten im Event (inklusive verschachtelter).
    pub fn node_count(&self) -> usize {
        tree::count(&self.model)
    }

    /// Gibt `true` zurück, wenn das Event keine Knoten enthält.
    pub fn is_empty(&self) -> bool {
        self.model.is_empty()
    }
}
