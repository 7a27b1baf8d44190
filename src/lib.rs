//! RNG Event Editor Library.
//! Editor-Kern für probabilistische Event-Bäume, als Library exportiert für
//! Frontends, Tests und Wiederverwendung.

pub mod app;
pub mod core;
pub mod shared;
pub mod xml;

pub use app::{
    CommitView, ExportSnapshot, InsertTarget, Session, SessionCommand, SessionState, Snapshot,
};
pub use core::{
    compute_reach, AfflictionTarget, ApplyAfflictionParams, BranchParams, BranchSide, EditError,
    EditResult, Event, EventStore, ItemQuality, Node, NodeKind, NodeKindTag, NodeParams, ReachMap,
    SpawnCreatureParams, SpawnItemParams, SpawnLocation,
};
pub use shared::EditorOptions;
pub use xml::{write_event_xml, write_session_xml};
