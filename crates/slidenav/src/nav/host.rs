use std::time::Instant;

use thiserror::Error;

/// Which scroll container an anchor lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnchorScope {
    /// The whole scrolling document.
    Document,
    /// The dedicated container shown while presentation mode is on.
    PresentationContainer,
}

impl AnchorScope {
    pub fn for_mode(presentation_mode: bool) -> Self {
        if presentation_mode {
            Self::PresentationContainer
        } else {
            Self::Document
        }
    }
}

/// A scroll target: the panel for `slide` inside `scope`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Anchor {
    pub scope: AnchorScope,
    pub slide: usize,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HostError {
    #[error("fullscreen is not supported by this host")]
    Unsupported,
}

/// Capabilities the navigator needs from whatever is displaying the panels.
pub trait HostPlatform {
    /// Start a smooth scroll that brings `anchor` into view.
    ///
    /// Returns `false` when the anchor does not exist in its scope, in which case
    /// nothing scrolls.
    fn scroll_to_anchor(&mut self, anchor: Anchor) -> bool;

    fn request_fullscreen(&mut self) -> Result<(), HostError>;

    fn exit_fullscreen(&mut self) -> Result<(), HostError>;

    /// Live fullscreen status as the host currently knows it.
    fn is_fullscreen(&self) -> bool;

    fn now(&self) -> Instant;
}
