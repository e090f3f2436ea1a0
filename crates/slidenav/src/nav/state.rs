use std::time::{Duration, Instant};

use super::NavError;

/// How long visibility updates stay muted after a programmatic scroll starts.
pub const DEFAULT_SETTLE: Duration = Duration::from_millis(800);

/// The authoritative record of where the presentation is.
#[derive(Debug, Clone)]
pub struct NavigationState {
    slide_names: Vec<String>,
    current_slide: usize,
    is_fullscreen: bool,
    is_presentation_mode: bool,
}

impl NavigationState {
    pub fn new(slide_names: Vec<String>) -> Result<Self, NavError> {
        if slide_names.is_empty() {
            return Err(NavError::EmptyDeck);
        }
        Ok(Self {
            slide_names,
            current_slide: 0,
            is_fullscreen: false,
            is_presentation_mode: false,
        })
    }

    pub fn current_slide(&self) -> usize {
        self.current_slide
    }

    pub fn total_slides(&self) -> usize {
        self.slide_names.len()
    }

    pub fn slide_names(&self) -> &[String] {
        &self.slide_names
    }

    pub fn current_slide_name(&self) -> &str {
        &self.slide_names[self.current_slide]
    }

    pub fn is_fullscreen(&self) -> bool {
        self.is_fullscreen
    }

    pub fn is_presentation_mode(&self) -> bool {
        self.is_presentation_mode
    }

    pub fn is_first(&self) -> bool {
        self.current_slide == 0
    }

    pub fn is_last(&self) -> bool {
        self.current_slide + 1 == self.total_slides()
    }

    /// Clamp an arbitrary index into `0..total_slides`.
    pub fn clamp(&self, index: usize) -> usize {
        index.min(self.total_slides() - 1)
    }

    /// Set the current slide, clamping out-of-range input. Returns the stored index.
    pub(crate) fn set_current(&mut self, index: usize) -> usize {
        self.current_slide = self.clamp(index);
        self.current_slide
    }

    pub(crate) fn set_fullscreen(&mut self, active: bool) {
        self.is_fullscreen = active;
    }

    pub(crate) fn set_presentation_mode(&mut self, active: bool) {
        self.is_presentation_mode = active;
    }
}

/// Time-boxed mute for visibility-driven updates.
///
/// Every programmatic scroll bumps the generation and pushes the deadline out to
/// `now + settle`, so a burst of navigation calls keeps the mute alive until the
/// last scroll has had its full settle window.
#[derive(Debug, Clone)]
pub struct ScrollSuppression {
    settle: Duration,
    generation: u64,
    until: Option<Instant>,
}

impl ScrollSuppression {
    pub fn new(settle: Duration) -> Self {
        Self {
            settle,
            generation: 0,
            until: None,
        }
    }

    pub fn arm(&mut self, now: Instant) -> u64 {
        self.generation += 1;
        self.until = Some(now + self.settle);
        self.generation
    }

    pub fn is_active(&self, now: Instant) -> bool {
        self.until.is_some_and(|until| now < until)
    }

    /// Time left in the current window, if one is running.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.until
            .filter(|until| now < *until)
            .map(|until| until - now)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl Default for ScrollSuppression {
    fn default() -> Self {
        Self::new(DEFAULT_SETTLE)
    }
}
