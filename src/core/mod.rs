//! Core-Domänentypen: Knoten, Events, Baum-Operationen, Reach-Berechnung.

pub mod error;
pub mod event;
pub mod event_store;
/// Core-Datenmodell für Event-Bäume
///
/// - Node: Verzweigung oder Blatt-Aktion mit typisierten Parametern
/// - Event: benannte Wurzel-Sequenz
/// - EventStore: alle Events, aktives Event, ID-Allocator
pub mod node;
pub mod probability;
pub mod tree;

pub use error::{EditError, EditResult};
pub use event::Event;
pub use event_store::EventStore;
pub use node::{
    AfflictionTarget, ApplyAfflictionParams, BranchChildren, BranchParams, BranchSide,
    ItemQuality, Node, NodeKind, NodeKindTag, NodeParams, SpawnCreatureParams, SpawnItemParams,
    SpawnLocation, MAX_NODE_ID,
};
pub use probability::{compute_reach, sanitize_probability, summarize, ReachMap, ReachSummary};
pub use tree::{NodeLocation, MAX_TREE_DEPTH};
