pub mod controller;
pub mod host;
pub mod input;
pub mod state;
pub mod viewport;

#[cfg(test)]
pub(crate) mod testing;

use thiserror::Error;

pub use controller::{Navigator, Session};
pub use host::{Anchor, AnchorScope, HostError, HostPlatform};
pub use input::{InputBinder, KeyCode, KeyEvent, KeyOutcome, Modifiers, NavAction};
pub use state::DEFAULT_SETTLE;
pub use viewport::{
    AnchorSource, DEFAULT_VISIBILITY_THRESHOLD, PanelAnchor, ViewportSyncAgent, VisibilityObserver,
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NavError {
    /// A navigator was requested from a session that was never started (or already ended).
    #[error("navigation state accessed outside an initialized presentation session")]
    SessionNotInitialized,

    #[error("a presentation needs at least one slide")]
    EmptyDeck,
}
