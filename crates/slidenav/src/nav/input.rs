use super::Navigator;
use super::host::HostPlatform;

/// Keys the binder knows about, independent of any windowing library.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    ArrowRight,
    ArrowDown,
    ArrowLeft,
    ArrowUp,
    Space,
    PageDown,
    PageUp,
    Home,
    End,
    Escape,
    Char(char),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub meta: bool,
    pub alt: bool,
    pub shift: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        ctrl: false,
        meta: false,
        alt: false,
        shift: false,
    };

    /// Ctrl or the platform command key is held; letter shortcuts belong to the host then.
    pub fn has_accelerator(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// What had keyboard focus when the key was pressed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KeyTarget {
    #[default]
    Surface,
    TextEntry,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: KeyCode,
    pub modifiers: Modifiers,
    pub target: KeyTarget,
}

impl KeyEvent {
    pub fn new(key: KeyCode) -> Self {
        Self {
            key,
            modifiers: Modifiers::NONE,
            target: KeyTarget::Surface,
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn in_text_entry(mut self) -> Self {
        self.target = KeyTarget::TextEntry;
        self
    }
}

/// Whether the host should still run its default handling for the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Consumed,
    PassThrough,
}

/// A navigation request from the keyboard or from a UI control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavAction {
    Next,
    Prev,
    First,
    Last,
    GoTo(usize),
    ToggleFullscreen,
    TogglePresentation,
    ExitPresentation,
}

/// Shortcut reference shown in the help overlay and by `slidenav keys`.
pub const KEY_BINDINGS: &[(&str, &str)] = &[
    ("\u{2192} / \u{2193} / Space / PgDn", "Next slide"),
    ("\u{2190} / \u{2191} / PgUp", "Previous slide"),
    ("Home", "First slide"),
    ("End", "Last slide"),
    ("F", "Toggle fullscreen"),
    ("P", "Presentation mode"),
    ("Esc", "Exit presentation"),
];

/// Maps keyboard events and control actions onto navigator operations.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputBinder;

impl InputBinder {
    pub fn new() -> Self {
        Self
    }

    /// The action bound to `event`, ignoring anything typed into a text field.
    pub fn resolve(&self, event: &KeyEvent) -> Option<NavAction> {
        if event.target == KeyTarget::TextEntry {
            return None;
        }
        match event.key {
            KeyCode::ArrowRight | KeyCode::ArrowDown | KeyCode::Space | KeyCode::PageDown => {
                Some(NavAction::Next)
            }
            KeyCode::ArrowLeft | KeyCode::ArrowUp | KeyCode::PageUp => Some(NavAction::Prev),
            KeyCode::Home => Some(NavAction::First),
            KeyCode::End => Some(NavAction::Last),
            KeyCode::Char('f' | 'F') if !event.modifiers.has_accelerator() => {
                Some(NavAction::ToggleFullscreen)
            }
            KeyCode::Char('p' | 'P') if !event.modifiers.has_accelerator() => {
                Some(NavAction::TogglePresentation)
            }
            KeyCode::Escape => Some(NavAction::ExitPresentation),
            KeyCode::Char(_) => None,
        }
    }

    pub fn handle_key<H: HostPlatform>(
        &self,
        nav: &mut Navigator<H>,
        event: &KeyEvent,
    ) -> KeyOutcome {
        let Some(action) = self.resolve(event) else {
            return KeyOutcome::PassThrough;
        };
        tracing::trace!(key = ?event.key, ?action, "key bound");
        if self.apply(nav, action) {
            KeyOutcome::Consumed
        } else {
            KeyOutcome::PassThrough
        }
    }

    /// Run `action`. Returns `false` only for an Escape that had nothing to exit.
    pub fn apply<H: HostPlatform>(&self, nav: &mut Navigator<H>, action: NavAction) -> bool {
        match action {
            NavAction::Next => nav.next_slide(),
            NavAction::Prev => nav.prev_slide(),
            NavAction::First => nav.go_to_slide(0),
            NavAction::Last => nav.go_to_slide(nav.total_slides() - 1),
            NavAction::GoTo(index) => nav.go_to_slide(index),
            NavAction::ToggleFullscreen => nav.toggle_fullscreen(),
            NavAction::TogglePresentation => nav.toggle_presentation_mode(),
            NavAction::ExitPresentation => return nav.exit_presentation_mode(),
        }
        true
    }
}
