use std::time::{Duration, Instant};

use super::host::{Anchor, AnchorScope, HostError, HostPlatform};
use super::{Navigator, state::DEFAULT_SETTLE};

/// Scriptable host with a manual clock.
pub(crate) struct MockHost {
    pub now: Instant,
    pub fullscreen: bool,
    pub refuse: Option<HostError>,
    pub slide_count: usize,
    pub missing_scope: Option<AnchorScope>,
    pub scrolls: Vec<Anchor>,
    pub fullscreen_requests: usize,
    pub fullscreen_exits: usize,
}

impl MockHost {
    pub fn new(slide_count: usize) -> Self {
        Self {
            now: Instant::now(),
            fullscreen: false,
            refuse: None,
            slide_count,
            missing_scope: None,
            scrolls: Vec::new(),
            fullscreen_requests: 0,
            fullscreen_exits: 0,
        }
    }

    pub fn advance(&mut self, by: Duration) {
        self.now += by;
    }
}

impl HostPlatform for MockHost {
    fn scroll_to_anchor(&mut self, anchor: Anchor) -> bool {
        if self.missing_scope == Some(anchor.scope) || anchor.slide >= self.slide_count {
            return false;
        }
        self.scrolls.push(anchor);
        true
    }

    fn request_fullscreen(&mut self) -> Result<(), HostError> {
        self.fullscreen_requests += 1;
        if let Some(err) = self.refuse.clone() {
            return Err(err);
        }
        self.fullscreen = true;
        Ok(())
    }

    fn exit_fullscreen(&mut self) -> Result<(), HostError> {
        self.fullscreen_exits += 1;
        if let Some(err) = self.refuse.clone() {
            return Err(err);
        }
        self.fullscreen = false;
        Ok(())
    }

    fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    fn now(&self) -> Instant {
        self.now
    }
}

pub(crate) fn slide_names(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("Slide {}", i + 1)).collect()
}

pub(crate) fn navigator(count: usize) -> Navigator<MockHost> {
    Navigator::new(slide_names(count), MockHost::new(count), DEFAULT_SETTLE).unwrap()
}
