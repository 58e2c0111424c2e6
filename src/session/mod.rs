//! A running presentation: live view, navigation and background exports.

/// Session state.
pub mod deck_session;
/// Async two-phase exports.
pub mod exporter;
/// Single-export flag.
pub mod flag;

pub use deck_session::DeckSession;
pub use exporter::{ExportArtifact, Exporter, SessionOpts};
pub use flag::{ExportFlag, ExportGuard};
