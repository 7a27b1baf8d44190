//! Application-Layer: Session, State, Commands, History und Use-Cases.

pub mod command;
pub mod command_log;
pub mod history;
pub mod session;
/// Session State
///
/// Dieses Modul verwaltet den veränderlichen Zustand (Events, History, Reach-Werte).
pub mod state;
pub mod use_cases;

pub use command::{InsertTarget, SessionCommand};
pub use command_log::CommandLog;
pub use history::{EditHistory, Snapshot};
pub use session::{CommitObserver, CommitView, Session};
pub use state::SessionState;
pub use use_cases::file_io::ExportSnapshot;
