use eframe::egui;
use std::path::PathBuf;
use std::time::Instant;

use crate::config::Config;
use crate::controls;
use crate::deck::{Deck, Panel};
use crate::nav::{
    Anchor, AnchorScope, AnchorSource, HostError, HostPlatform, InputBinder, KeyCode, KeyEvent,
    KeyOutcome, Modifiers, NavError, Navigator, PanelAnchor, Session, ViewportSyncAgent,
    VisibilityObserver,
};
use crate::theme::Theme;

const REFERENCE_WIDTH: f32 = 1920.0;
const REFERENCE_HEIGHT: f32 = 1080.0;

pub struct LaunchOptions {
    pub file: Option<PathBuf>,
    pub windowed: bool,
    /// 1-indexed
    pub start_slide: Option<usize>,
    pub presentation: bool,
}

/// Host side of the navigator for an eframe window.
///
/// Requests are queued here and flushed once per frame: scrolls are applied while
/// the matching scroll container is laid out, viewport commands are sent after the
/// input closure has returned.
pub struct EguiHost {
    slide_count: usize,
    fullscreen: bool,
    fullscreen_reported: bool,
    pending_scroll: Option<Anchor>,
    viewport_cmds: Vec<egui::ViewportCommand>,
}

impl EguiHost {
    pub fn new(slide_count: usize, fullscreen: bool) -> Self {
        Self {
            slide_count,
            fullscreen,
            fullscreen_reported: true,
            pending_scroll: None,
            viewport_cmds: Vec::new(),
        }
    }

    /// Feed the fullscreen status the window reported this frame.
    /// Returns the new status when it changed.
    pub fn observe_fullscreen(&mut self, reported: Option<bool>) -> Option<bool> {
        self.fullscreen_reported = reported.is_some();
        let active = reported?;
        if active == self.fullscreen {
            return None;
        }
        self.fullscreen = active;
        Some(active)
    }

    /// Take the pending scroll. A scroll aimed at a container that is no longer
    /// shown is dropped.
    pub fn take_scroll_for(&mut self, scope: AnchorScope) -> Option<usize> {
        let anchor = self.pending_scroll.take()?;
        (anchor.scope == scope).then_some(anchor.slide)
    }

    pub fn has_pending_scroll(&self) -> bool {
        self.pending_scroll.is_some()
    }

    pub fn take_viewport_cmds(&mut self) -> Vec<egui::ViewportCommand> {
        std::mem::take(&mut self.viewport_cmds)
    }

    fn set_fullscreen(&mut self, active: bool) -> Result<(), HostError> {
        if !self.fullscreen_reported {
            return Err(HostError::Unsupported);
        }
        self.viewport_cmds
            .push(egui::ViewportCommand::Fullscreen(active));
        Ok(())
    }
}

impl HostPlatform for EguiHost {
    fn scroll_to_anchor(&mut self, anchor: Anchor) -> bool {
        if anchor.slide >= self.slide_count {
            return false;
        }
        self.pending_scroll = Some(anchor);
        true
    }

    fn request_fullscreen(&mut self) -> Result<(), HostError> {
        self.set_fullscreen(true)
    }

    fn exit_fullscreen(&mut self) -> Result<(), HostError> {
        self.set_fullscreen(false)
    }

    fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// The panels laid out in the current frame.
struct RenderedPanels {
    scope: AnchorScope,
    count: usize,
}

impl AnchorSource for RenderedPanels {
    fn anchors(&self, scope: AnchorScope) -> Vec<PanelAnchor> {
        if scope != self.scope {
            return Vec::new();
        }
        (0..self.count).map(|i| PanelAnchor::new(scope, i)).collect()
    }
}

pub fn key_event_from_egui(
    key: egui::Key,
    modifiers: egui::Modifiers,
    text_entry: bool,
) -> Option<KeyEvent> {
    let letter = |c: char| {
        if modifiers.shift {
            c.to_ascii_uppercase()
        } else {
            c
        }
    };
    let code = match key {
        egui::Key::ArrowRight => KeyCode::ArrowRight,
        egui::Key::ArrowDown => KeyCode::ArrowDown,
        egui::Key::ArrowLeft => KeyCode::ArrowLeft,
        egui::Key::ArrowUp => KeyCode::ArrowUp,
        egui::Key::Space => KeyCode::Space,
        egui::Key::PageDown => KeyCode::PageDown,
        egui::Key::PageUp => KeyCode::PageUp,
        egui::Key::Home => KeyCode::Home,
        egui::Key::End => KeyCode::End,
        egui::Key::Escape => KeyCode::Escape,
        egui::Key::F => KeyCode::Char(letter('f')),
        egui::Key::P => KeyCode::Char(letter('p')),
        _ => return None,
    };
    let event = KeyEvent::new(code).with_modifiers(Modifiers {
        ctrl: modifiers.ctrl,
        meta: modifiers.mac_cmd,
        alt: modifiers.alt,
        shift: modifiers.shift,
    });
    Some(if text_entry {
        event.in_text_entry()
    } else {
        event
    })
}

struct SlideNavApp {
    deck: Deck,
    theme: Theme,
    session: Session<EguiHost>,
    binder: InputBinder,
    agent: ViewportSyncAgent,
    observer: VisibilityObserver,
    show_help: bool,
}

impl SlideNavApp {
    fn handle_keys(&mut self, ctx: &egui::Context) -> Result<(), NavError> {
        let nav = self.session.navigator_mut()?;
        let text_entry = ctx.wants_keyboard_input();
        let events = ctx.input(|i| i.events.clone());

        let mut consumed = Vec::new();
        for event in events {
            let egui::Event::Key {
                key,
                pressed: true,
                modifiers,
                ..
            } = event
            else {
                continue;
            };
            let Some(key_event) = key_event_from_egui(key, modifiers, text_entry) else {
                continue;
            };
            if self.binder.handle_key(nav, &key_event) == KeyOutcome::Consumed {
                consumed.push(key);
            }
        }

        // Consumed keys must not also scroll the panels.
        if !consumed.is_empty() {
            ctx.input_mut(|i| {
                i.events.retain(|e| {
                    !matches!(e, egui::Event::Key { key, .. } if consumed.contains(key))
                })
            });
        }
        Ok(())
    }

    fn frame(&mut self, ctx: &egui::Context) -> Result<(), NavError> {
        {
            let nav = self.session.navigator_mut()?;
            let reported = ctx.input(|i| i.viewport().fullscreen);
            if let Some(active) = nav.host_mut().observe_fullscreen(reported) {
                nav.on_fullscreen_change(active);
            }
        }

        self.handle_keys(ctx)?;

        let (scope, scroll_target) = {
            let nav = self.session.navigator_mut()?;
            let scope = nav.anchor_scope();
            let target = nav.host_mut().take_scroll_for(scope);
            if let Some(slide) = target {
                tracing::trace!(slide, generation = nav.scroll_generation(), "applying scroll");
            }
            (scope, target)
        };

        let theme = &self.theme;
        let (actions, samples) = {
            let nav = self.session.navigator()?;
            controls::progress_bar(ctx, nav, theme);
            let actions = controls::control_bar(ctx, nav, theme, &mut self.show_help);
            controls::keyboard_help(ctx, &mut self.show_help);

            let samples = egui::CentralPanel::default()
                .frame(egui::Frame::new().fill(theme.background).inner_margin(0.0))
                .show(ctx, |ui| {
                    draw_panels(ui, &self.deck.panels, theme, scope, scroll_target)
                })
                .inner;
            (actions, samples)
        };

        let nav = self.session.navigator_mut()?;
        let rendered = RenderedPanels {
            scope,
            count: self.deck.panels.len(),
        };
        if self.agent.refresh(&*nav, &rendered) {
            self.observer.reset();
        }
        let entries = self.observer.observe(samples);
        self.agent.handle_batch(nav, &entries);

        for action in actions {
            self.binder.apply(nav, action);
        }

        for cmd in nav.host_mut().take_viewport_cmds() {
            ctx.send_viewport_cmd(cmd);
        }

        if nav.host().has_pending_scroll() {
            ctx.request_repaint();
        } else if let Some(remaining) = nav.suppression_remaining() {
            ctx.request_repaint_after(remaining);
        }
        Ok(())
    }
}

impl Drop for SlideNavApp {
    fn drop(&mut self) {
        if let Some(nav) = self.session.end() {
            tracing::debug!(slide = nav.current_slide(), "presentation session ended");
        }
    }
}

impl eframe::App for SlideNavApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Err(err) = self.frame(ctx) {
            tracing::error!(%err, "navigation unavailable");
        }
    }
}

fn compute_scale(rect: egui::Rect) -> f32 {
    (rect.width() / REFERENCE_WIDTH)
        .min(rect.height() / REFERENCE_HEIGHT)
        .max(0.3)
}

/// Lay out every panel at full viewport height inside the scroll container for
/// `scope`. Returns each panel's tag with its visible ratio.
fn draw_panels(
    ui: &mut egui::Ui,
    panels: &[Panel],
    theme: &Theme,
    scope: AnchorScope,
    scroll_target: Option<usize>,
) -> Vec<(String, f32)> {
    let panel_height = ui.available_height();
    let id = match scope {
        AnchorScope::Document => "document",
        AnchorScope::PresentationContainer => "presentation_container",
    };

    let output = egui::ScrollArea::vertical()
        .id_salt(id)
        .auto_shrink([false, false])
        .show(ui, |ui| {
            ui.spacing_mut().item_spacing.y = 0.0;
            let width = ui.available_width();
            let mut rects = Vec::with_capacity(panels.len());
            for (i, panel) in panels.iter().enumerate() {
                let (rect, _) = ui.allocate_exact_size(
                    egui::vec2(width, panel_height),
                    egui::Sense::hover(),
                );
                if ui.is_rect_visible(rect) {
                    draw_panel(ui, panel, i, theme, rect, scope);
                }
                if scroll_target == Some(i) {
                    ui.scroll_to_rect(rect, Some(egui::Align::Min));
                }
                rects.push(rect);
            }
            rects
        });

    let view = output.inner_rect;
    output
        .inner
        .iter()
        .enumerate()
        .map(|(i, rect)| {
            let ratio = crate::nav::viewport::visible_ratio(
                rect.top(),
                rect.bottom(),
                view.top(),
                view.bottom(),
            );
            (i.to_string(), ratio)
        })
        .collect()
}

fn draw_panel(
    ui: &egui::Ui,
    panel: &Panel,
    index: usize,
    theme: &Theme,
    rect: egui::Rect,
    scope: AnchorScope,
) {
    let scale = compute_scale(rect);
    let painter = ui.painter();
    let fill = match scope {
        AnchorScope::Document => theme.panel_fill(index),
        AnchorScope::PresentationContainer => theme.background,
    };
    painter.rect_filled(rect, 0.0, fill);

    let padding = 96.0 * scale;
    let wrap_width = rect.width() - padding * 2.0;

    let title = painter.layout(
        panel.name.clone(),
        egui::FontId::proportional(theme.title_size * scale),
        theme.heading_color,
        wrap_width,
    );
    let body = painter.layout(
        panel.body.clone(),
        egui::FontId::proportional(theme.body_size * scale),
        theme.foreground,
        wrap_width,
    );

    let gap = 32.0 * scale;
    let block_height = title.rect.height() + gap + body.rect.height();
    let top = rect.center().y - block_height / 2.0;
    let title_pos = egui::pos2(rect.center().x - title.rect.width() / 2.0, top);
    let body_pos = egui::pos2(
        rect.center().x - body.rect.width() / 2.0,
        top + title.rect.height() + gap,
    );
    painter.galley(title_pos, title, theme.heading_color);
    painter.galley(body_pos, body, theme.foreground);

    let badge_color = Theme::with_opacity(theme.foreground, 0.3);
    painter.text(
        rect.left_top() + egui::vec2(24.0 * scale, 24.0 * scale),
        egui::Align2::LEFT_TOP,
        format!("{:02}", index + 1),
        egui::FontId::monospace(16.0 * scale),
        badge_color,
    );
}

pub fn run(options: LaunchOptions) -> anyhow::Result<()> {
    let deck = match &options.file {
        Some(path) => Deck::load(path)?,
        None => Deck::builtin(),
    };

    let config = Config::load_or_default();
    let settings = config.navigation_settings();

    let title = deck.meta.title.clone().unwrap_or_else(|| match &options.file {
        Some(path) => format!(
            "slidenav \u{2014} {}",
            path.file_name().unwrap_or_default().to_string_lossy()
        ),
        None => "slidenav".to_string(),
    });
    let theme_name = deck
        .meta
        .theme
        .as_deref()
        .or(config.theme())
        .unwrap_or("dark");
    let theme = Theme::from_name(theme_name);

    // CLI flag overrides config; both are 1-indexed.
    let start_slide = options
        .start_slide
        .or(config.start_slide())
        .map(|s| s.saturating_sub(1))
        .unwrap_or(0);

    let host = EguiHost::new(deck.len(), !options.windowed);
    let mut navigator = Navigator::new(deck.slide_names(), host, settings.settle)?;
    if options.presentation {
        navigator.toggle_presentation_mode();
    }
    navigator.go_to_slide(start_slide);

    tracing::info!(
        slides = deck.len(),
        start = navigator.current_slide(),
        theme = %theme.name,
        settle_ms = settings.settle.as_millis() as u64,
        threshold = settings.visibility_threshold,
        "starting presentation"
    );

    let app = SlideNavApp {
        deck,
        theme,
        session: Session::start(navigator),
        binder: InputBinder::new(),
        agent: ViewportSyncAgent::new(settings.visibility_threshold),
        observer: VisibilityObserver::new(settings.visibility_threshold),
        show_help: false,
    };

    let viewport = if options.windowed {
        egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_title(&title)
    } else {
        egui::ViewportBuilder::default()
            .with_fullscreen(true)
            .with_title(&title)
    };

    let native_options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(&title, native_options, Box::new(move |_cc| Ok(Box::new(app))))
        .map_err(|e| anyhow::anyhow!("{e}"))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::nav::input::KeyTarget;

    #[test]
    fn test_host_queues_scroll_for_scope() {
        let mut host = EguiHost::new(3, false);
        assert!(host.scroll_to_anchor(Anchor {
            scope: AnchorScope::Document,
            slide: 2,
        }));
        assert!(host.has_pending_scroll());
        assert_eq!(host.take_scroll_for(AnchorScope::Document), Some(2));
        assert_eq!(host.take_scroll_for(AnchorScope::Document), None);

        host.scroll_to_anchor(Anchor {
            scope: AnchorScope::Document,
            slide: 1,
        });
        assert_eq!(host.take_scroll_for(AnchorScope::PresentationContainer), None);
        assert!(!host.has_pending_scroll());
    }

    #[test]
    fn test_host_rejects_missing_anchor() {
        let mut host = EguiHost::new(3, false);
        assert!(!host.scroll_to_anchor(Anchor {
            scope: AnchorScope::Document,
            slide: 3,
        }));
    }

    #[test]
    fn test_host_fullscreen_commands() {
        let mut host = EguiHost::new(3, false);
        host.request_fullscreen().unwrap();
        host.exit_fullscreen().unwrap();
        let cmds = host.take_viewport_cmds();
        assert_eq!(
            cmds,
            vec![
                egui::ViewportCommand::Fullscreen(true),
                egui::ViewportCommand::Fullscreen(false),
            ]
        );
        assert!(host.take_viewport_cmds().is_empty());
        // Only the window's report changes the status.
        assert!(!host.is_fullscreen());
    }

    #[test]
    fn test_host_unsupported_without_reports() {
        let mut host = EguiHost::new(3, false);
        assert_eq!(host.observe_fullscreen(None), None);
        assert_eq!(host.request_fullscreen(), Err(HostError::Unsupported));
    }

    #[test]
    fn test_observe_fullscreen_reports_changes_only() {
        let mut host = EguiHost::new(3, false);
        assert_eq!(host.observe_fullscreen(Some(false)), None);
        assert_eq!(host.observe_fullscreen(Some(true)), Some(true));
        assert_eq!(host.observe_fullscreen(Some(true)), None);
        assert!(host.is_fullscreen());
    }

    #[test]
    fn test_key_conversion() {
        let none = egui::Modifiers::NONE;
        let event = key_event_from_egui(egui::Key::ArrowRight, none, false).unwrap();
        assert_eq!(event.key, KeyCode::ArrowRight);
        assert_eq!(event.target, KeyTarget::Surface);

        let shifted = key_event_from_egui(egui::Key::F, egui::Modifiers::SHIFT, false).unwrap();
        assert_eq!(shifted.key, KeyCode::Char('F'));

        let typed = key_event_from_egui(egui::Key::P, none, true).unwrap();
        assert_eq!(typed.key, KeyCode::Char('p'));
        assert_eq!(typed.target, KeyTarget::TextEntry);

        let ctrl = key_event_from_egui(egui::Key::F, egui::Modifiers::CTRL, false).unwrap();
        assert!(ctrl.modifiers.has_accelerator());

        assert!(key_event_from_egui(egui::Key::Q, none, false).is_none());
    }

    #[test]
    fn test_rendered_panels_only_expose_current_scope() {
        let rendered = RenderedPanels {
            scope: AnchorScope::PresentationContainer,
            count: 4,
        };
        assert!(rendered.anchors(AnchorScope::Document).is_empty());
        assert_eq!(rendered.anchors(AnchorScope::PresentationContainer).len(), 4);
    }

    #[test]
    fn test_egui_host_drives_navigator() {
        let host = EguiHost::new(5, false);
        let names = (1..=5).map(|i| format!("S{i}")).collect();
        let mut nav = Navigator::new(names, host, crate::nav::DEFAULT_SETTLE).unwrap();
        nav.toggle_presentation_mode();
        nav.go_to_slide(4);
        assert_eq!(
            nav.host_mut().take_scroll_for(AnchorScope::PresentationContainer),
            Some(4)
        );
        assert_eq!(
            nav.host_mut().take_viewport_cmds(),
            vec![egui::ViewportCommand::Fullscreen(true)]
        );
        assert!(nav.is_fullscreen());
    }

    fn test_app(settle: Duration) -> SlideNavApp {
        let deck = Deck::builtin();
        let host = EguiHost::new(deck.len(), false);
        let navigator = Navigator::new(deck.slide_names(), host, settle).unwrap();
        SlideNavApp {
            deck,
            theme: Theme::dark(),
            session: Session::start(navigator),
            binder: InputBinder::new(),
            agent: ViewportSyncAgent::default(),
            observer: VisibilityObserver::default(),
            show_help: false,
        }
    }

    fn test_context() -> egui::Context {
        let ctx = egui::Context::default();
        ctx.style_mut(|style| style.scroll_animation = egui::style::ScrollAnimation::none());
        ctx
    }

    fn key_press(key: egui::Key) -> egui::Event {
        egui::Event::Key {
            key,
            physical_key: None,
            pressed: true,
            repeat: false,
            modifiers: egui::Modifiers::NONE,
        }
    }

    /// Run one frame and return the input events left after the app handled them.
    fn run_frame(
        ctx: &egui::Context,
        app: &mut SlideNavApp,
        events: Vec<egui::Event>,
    ) -> Vec<egui::Event> {
        let input = egui::RawInput {
            screen_rect: Some(egui::Rect::from_min_size(
                egui::Pos2::ZERO,
                egui::vec2(1280.0, 720.0),
            )),
            events,
            ..Default::default()
        };
        let mut remaining = None;
        let _ = ctx.run(input, |ctx| {
            app.frame(ctx).unwrap();
            if remaining.is_none() {
                remaining = Some(ctx.input(|i| i.events.clone()));
            }
        });
        remaining.unwrap_or_default()
    }

    fn run_frames(ctx: &egui::Context, app: &mut SlideNavApp, count: usize) {
        for _ in 0..count {
            run_frame(ctx, app, Vec::new());
        }
    }

    /// Let any scroll land, wait out the settle window, then render again.
    fn settle(ctx: &egui::Context, app: &mut SlideNavApp, window: Duration) {
        run_frames(ctx, app, 3);
        std::thread::sleep(window * 2);
        run_frames(ctx, app, 2);
        assert!(!app.session.navigator().unwrap().is_self_scrolling());
    }

    fn nav(app: &SlideNavApp) -> &Navigator<EguiHost> {
        app.session.navigator().unwrap()
    }

    fn has_key(events: &[egui::Event], wanted: egui::Key) -> bool {
        events
            .iter()
            .any(|e| matches!(e, egui::Event::Key { key, .. } if *key == wanted))
    }

    #[test]
    fn test_frame_mode_switch_keeps_current_slide() {
        let window = Duration::from_millis(150);
        let ctx = test_context();
        let mut app = test_app(window);
        run_frames(&ctx, &mut app, 2);

        app.session.navigator_mut().unwrap().go_to_slide(7);
        settle(&ctx, &mut app, window);
        assert_eq!(nav(&app).current_slide(), 7);

        run_frame(&ctx, &mut app, vec![key_press(egui::Key::P)]);
        settle(&ctx, &mut app, window);
        assert!(nav(&app).is_presentation_mode());
        assert_eq!(nav(&app).current_slide(), 7);

        app.session.navigator_mut().unwrap().go_to_slide(10);
        settle(&ctx, &mut app, window);
        assert_eq!(nav(&app).current_slide(), 10);

        run_frame(&ctx, &mut app, vec![key_press(egui::Key::Escape)]);
        settle(&ctx, &mut app, window);
        assert!(!nav(&app).is_presentation_mode());
        assert_eq!(nav(&app).current_slide(), 10);
    }

    #[test]
    fn test_frame_removes_consumed_keys() {
        let ctx = test_context();
        let mut app = test_app(crate::nav::DEFAULT_SETTLE);
        run_frames(&ctx, &mut app, 2);

        let remaining = run_frame(
            &ctx,
            &mut app,
            vec![key_press(egui::Key::ArrowRight), key_press(egui::Key::A)],
        );
        assert_eq!(nav(&app).current_slide(), 1);
        assert!(!has_key(&remaining, egui::Key::ArrowRight));
        assert!(has_key(&remaining, egui::Key::A));
    }

    #[test]
    fn test_frame_keeps_escape_outside_presentation_mode() {
        let ctx = test_context();
        let mut app = test_app(crate::nav::DEFAULT_SETTLE);
        run_frames(&ctx, &mut app, 2);

        let remaining = run_frame(&ctx, &mut app, vec![key_press(egui::Key::Escape)]);
        assert!(has_key(&remaining, egui::Key::Escape));
    }

    /// Point the navigator at `slide` but leave the document where it is, so the
    /// next frame reports slide 0 again while the navigator believes it moved.
    fn jump_without_scrolling(app: &mut SlideNavApp, slide: usize) {
        let nav = app.session.navigator_mut().unwrap();
        nav.go_to_slide(slide);
        assert_eq!(nav.host_mut().take_scroll_for(AnchorScope::Document), Some(slide));
        app.observer.reset();
    }

    #[test]
    fn test_frame_ignores_visibility_while_self_scrolling() {
        let ctx = test_context();
        let mut app = test_app(crate::nav::DEFAULT_SETTLE);
        run_frames(&ctx, &mut app, 2);

        jump_without_scrolling(&mut app, 5);
        run_frame(&ctx, &mut app, Vec::new());
        assert!(nav(&app).is_self_scrolling());
        assert_eq!(nav(&app).current_slide(), 5);
    }

    #[test]
    fn test_frame_applies_visibility_once_settled() {
        let ctx = test_context();
        let mut app = test_app(Duration::ZERO);
        run_frames(&ctx, &mut app, 2);

        jump_without_scrolling(&mut app, 5);
        run_frame(&ctx, &mut app, Vec::new());
        assert!(!nav(&app).is_self_scrolling());
        assert_eq!(nav(&app).current_slide(), 0);
    }
}
