use std::collections::HashMap;

use super::Navigator;
use super::host::{AnchorScope, HostPlatform};

/// Fraction of a panel that must be visible before it counts as the current slide.
pub const DEFAULT_VISIBILITY_THRESHOLD: f32 = 0.45;

/// A scrollable panel tagged with its zero-based slide index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelAnchor {
    pub scope: AnchorScope,
    pub tag: String,
}

impl PanelAnchor {
    pub fn new(scope: AnchorScope, slide: usize) -> Self {
        Self {
            scope,
            tag: slide.to_string(),
        }
    }

    /// The slide index carried in the tag, if it is one.
    pub fn slide_index(&self) -> Option<usize> {
        self.tag.trim().parse().ok()
    }
}

/// Anything that can enumerate the panel anchors of a scroll container.
pub trait AnchorSource {
    fn anchors(&self, scope: AnchorScope) -> Vec<PanelAnchor>;
}

/// One threshold crossing reported by a [`VisibilityObserver`].
#[derive(Debug, Clone, PartialEq)]
pub struct VisibilityEntry {
    pub tag: String,
    pub ratio: f32,
    pub is_intersecting: bool,
}

/// Turns per-frame visible ratios into threshold crossings.
///
/// A panel is reported the first time it is seen and afterwards only when it moves
/// from one side of the threshold to the other.
#[derive(Debug, Clone)]
pub struct VisibilityObserver {
    threshold: f32,
    above: HashMap<String, bool>,
}

impl VisibilityObserver {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            above: HashMap::new(),
        }
    }

    /// Forget all previous observations, e.g. after the container changed.
    pub fn reset(&mut self) {
        self.above.clear();
    }

    pub fn observe<I, S>(&mut self, samples: I) -> Vec<VisibilityEntry>
    where
        I: IntoIterator<Item = (S, f32)>,
        S: Into<String>,
    {
        let mut entries = Vec::new();
        for (tag, ratio) in samples {
            let tag = tag.into();
            let is_intersecting = ratio > 0.0 && ratio >= self.threshold;
            let previous = self.above.insert(tag.clone(), is_intersecting);
            if previous != Some(is_intersecting) {
                entries.push(VisibilityEntry {
                    tag,
                    ratio,
                    is_intersecting,
                });
            }
        }
        entries
    }
}

impl Default for VisibilityObserver {
    fn default() -> Self {
        Self::new(DEFAULT_VISIBILITY_THRESHOLD)
    }
}

/// Visible fraction of the span `[top, bottom)` inside `[view_top, view_bottom)`.
pub fn visible_ratio(top: f32, bottom: f32, view_top: f32, view_bottom: f32) -> f32 {
    let height = bottom - top;
    if height <= 0.0 {
        return 0.0;
    }
    let overlap = bottom.min(view_bottom) - top.max(view_top);
    (overlap / height).clamp(0.0, 1.0)
}

#[derive(Debug, Clone)]
struct Registration {
    presentation_mode: bool,
    anchors: Vec<PanelAnchor>,
}

/// Keeps `current_slide` in step with what the user scrolled to by hand.
#[derive(Debug, Clone)]
pub struct ViewportSyncAgent {
    threshold: f32,
    registration: Option<Registration>,
}

impl ViewportSyncAgent {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            registration: None,
        }
    }

    /// Anchors of the current registration; empty before the first one.
    pub fn observed(&self) -> &[PanelAnchor] {
        self.registration
            .as_ref()
            .map(|r| r.anchors.as_slice())
            .unwrap_or(&[])
    }

    pub fn needs_registration(&self, presentation_mode: bool) -> bool {
        self.registration
            .as_ref()
            .is_none_or(|r| r.presentation_mode != presentation_mode)
    }

    /// Watch the anchors of the container that matches `presentation_mode`.
    pub fn register(&mut self, presentation_mode: bool, anchors: Vec<PanelAnchor>) {
        let scope = AnchorScope::for_mode(presentation_mode);
        let anchors: Vec<PanelAnchor> = anchors.into_iter().filter(|a| a.scope == scope).collect();
        if anchors.is_empty() {
            tracing::debug!(?scope, "no panel anchors to observe");
        } else {
            tracing::debug!(?scope, count = anchors.len(), "observing panel anchors");
        }
        self.registration = Some(Registration {
            presentation_mode,
            anchors,
        });
    }

    /// Re-scan `source` if presentation mode changed since the last registration.
    /// Returns whether a new registration happened.
    pub fn refresh<H, S>(&mut self, nav: &Navigator<H>, source: &S) -> bool
    where
        H: HostPlatform,
        S: AnchorSource + ?Sized,
    {
        let mode = nav.is_presentation_mode();
        if !self.needs_registration(mode) {
            return false;
        }
        self.register(mode, source.anchors(AnchorScope::for_mode(mode)));
        true
    }

    /// Apply one batch of visibility entries. Returns the slide that became current.
    ///
    /// While the navigator is scrolling on its own the whole batch is dropped.
    /// Among the entries at or above threshold the one with the largest visible ratio
    /// wins; equal ratios go to the later entry.
    pub fn handle_batch<H: HostPlatform>(
        &self,
        nav: &mut Navigator<H>,
        entries: &[VisibilityEntry],
    ) -> Option<usize> {
        let anchors = self.observed();
        if anchors.is_empty() || entries.is_empty() {
            return None;
        }
        if nav.is_self_scrolling() {
            tracing::trace!(entries = entries.len(), "visibility batch suppressed");
            return None;
        }

        let mut winner: Option<(usize, f32)> = None;
        for entry in entries {
            if !entry.is_intersecting || entry.ratio < self.threshold {
                continue;
            }
            let Some(index) = anchors
                .iter()
                .find(|a| a.tag == entry.tag)
                .and_then(PanelAnchor::slide_index)
            else {
                continue;
            };
            if winner.is_none_or(|(_, best)| entry.ratio >= best) {
                winner = Some((index, entry.ratio));
            }
        }

        let (index, _) = winner?;
        nav.sync_visible_slide(index);
        Some(nav.current_slide())
    }
}

impl Default for ViewportSyncAgent {
    fn default() -> Self {
        Self::new(DEFAULT_VISIBILITY_THRESHOLD)
    }
}
