use std::time::Duration;

use super::NavError;
use super::host::{Anchor, AnchorScope, HostPlatform};
use super::state::{NavigationState, ScrollSuppression};

/// Owns the navigation state and funnels every mutation through its operations.
///
/// UI consumers get `&Navigator` to read and `&mut Navigator` to call operations;
/// nothing outside this module writes the state directly.
pub struct Navigator<H> {
    state: NavigationState,
    suppression: ScrollSuppression,
    host: H,
}

impl<H: HostPlatform> Navigator<H> {
    pub fn new(slide_names: Vec<String>, host: H, settle: Duration) -> Result<Self, NavError> {
        let mut state = NavigationState::new(slide_names)?;
        state.set_fullscreen(host.is_fullscreen());
        Ok(Self {
            state,
            suppression: ScrollSuppression::new(settle),
            host,
        })
    }

    pub fn current_slide(&self) -> usize {
        self.state.current_slide()
    }

    pub fn total_slides(&self) -> usize {
        self.state.total_slides()
    }

    pub fn slide_names(&self) -> &[String] {
        self.state.slide_names()
    }

    pub fn current_slide_name(&self) -> &str {
        self.state.current_slide_name()
    }

    pub fn is_fullscreen(&self) -> bool {
        self.state.is_fullscreen()
    }

    pub fn is_presentation_mode(&self) -> bool {
        self.state.is_presentation_mode()
    }

    pub fn is_first(&self) -> bool {
        self.state.is_first()
    }

    pub fn is_last(&self) -> bool {
        self.state.is_last()
    }

    pub fn anchor_scope(&self) -> AnchorScope {
        AnchorScope::for_mode(self.state.is_presentation_mode())
    }

    /// True while a programmatic scroll (plus its settle window) is in flight.
    pub fn is_self_scrolling(&self) -> bool {
        self.suppression.is_active(self.host.now())
    }

    pub fn suppression_remaining(&self) -> Option<Duration> {
        self.suppression.remaining(self.host.now())
    }

    /// Incremented once per programmatic scroll.
    pub fn scroll_generation(&self) -> u64 {
        self.suppression.generation()
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn go_to_slide(&mut self, index: usize) {
        let target = self.state.set_current(index);
        let anchor = Anchor {
            scope: self.anchor_scope(),
            slide: target,
        };
        if self.host.scroll_to_anchor(anchor) {
            let generation = self.suppression.arm(self.host.now());
            tracing::debug!(
                requested = index,
                slide = target,
                scope = ?anchor.scope,
                generation,
                "scrolling to slide"
            );
        } else {
            tracing::debug!(slide = target, scope = ?anchor.scope, "no anchor for slide");
        }
    }

    pub fn next_slide(&mut self) {
        self.go_to_slide(self.current_slide().saturating_add(1));
    }

    pub fn prev_slide(&mut self) {
        self.go_to_slide(self.current_slide().saturating_sub(1));
    }

    /// Request or exit host fullscreen. The flag itself only changes when the host
    /// reports back through [`Navigator::on_fullscreen_change`].
    pub fn toggle_fullscreen(&mut self) {
        let result = if self.host.is_fullscreen() {
            self.host.exit_fullscreen()
        } else {
            self.host.request_fullscreen()
        };
        if let Err(err) = result {
            tracing::debug!(%err, "fullscreen toggle ignored");
        }
    }

    pub fn toggle_presentation_mode(&mut self) {
        let entering = !self.state.is_presentation_mode();
        self.state.set_presentation_mode(entering);
        tracing::debug!(presentation_mode = entering, "presentation mode toggled");

        if entering && !self.host.is_fullscreen() {
            if let Err(err) = self.host.request_fullscreen() {
                tracing::debug!(%err, "fullscreen request for presentation mode ignored");
            }
            // Optimistic: corrected by the next fullscreen-change notification.
            self.state.set_fullscreen(true);
        }
        self.rescroll_after_mode_change();
    }

    /// Leave presentation mode without touching fullscreen. Returns whether anything changed.
    pub fn exit_presentation_mode(&mut self) -> bool {
        if !self.state.is_presentation_mode() {
            return false;
        }
        self.state.set_presentation_mode(false);
        tracing::debug!("presentation mode exited");
        self.rescroll_after_mode_change();
        true
    }

    /// The other container keeps its own scroll offset, so bring the current slide
    /// into view there and mute visibility sync while it settles.
    fn rescroll_after_mode_change(&mut self) {
        self.go_to_slide(self.current_slide());
    }

    /// Host notification that fullscreen status changed.
    pub fn on_fullscreen_change(&mut self, active: bool) {
        if self.state.is_fullscreen() != active {
            tracing::debug!(fullscreen = active, "host fullscreen changed");
        }
        self.state.set_fullscreen(active);
    }

    /// Record the slide the user scrolled to. No scroll is issued.
    pub(crate) fn sync_visible_slide(&mut self, index: usize) {
        let previous = self.state.current_slide();
        let slide = self.state.set_current(index);
        if slide != previous {
            tracing::debug!(from = previous, to = slide, "visible slide changed");
        }
    }
}

/// The scope a [`Navigator`] lives in.
///
/// Consumers reach the navigator through the session; asking for it before the
/// session has started is a programming error and is reported as one.
pub struct Session<H> {
    navigator: Option<Navigator<H>>,
}

impl<H: HostPlatform> Session<H> {
    pub fn new() -> Self {
        Self { navigator: None }
    }

    pub fn start(navigator: Navigator<H>) -> Self {
        Self {
            navigator: Some(navigator),
        }
    }

    pub fn navigator(&self) -> Result<&Navigator<H>, NavError> {
        self.navigator
            .as_ref()
            .ok_or(NavError::SessionNotInitialized)
    }

    pub fn navigator_mut(&mut self) -> Result<&mut Navigator<H>, NavError> {
        self.navigator
            .as_mut()
            .ok_or(NavError::SessionNotInitialized)
    }

    /// Tear the session down, handing back the navigator.
    pub fn end(&mut self) -> Option<Navigator<H>> {
        self.navigator.take()
    }
}

impl<H: HostPlatform> Default for Session<H> {
    fn default() -> Self {
        Self::new()
    }
}
