use eframe::egui;

use crate::nav::input::KEY_BINDINGS;
use crate::nav::{HostPlatform, NavAction, Navigator};
use crate::theme::Theme;

const BAR_HEIGHT: f32 = 44.0;
const PROGRESS_HEIGHT: f32 = 2.0;
const DOT_SIZE: f32 = 6.0;
const ACTIVE_DOT_WIDTH: f32 = 20.0;

/// `"03 / 13"`
pub fn counter_text(current: usize, total: usize) -> String {
    format!("{:02} / {:02}", current + 1, total)
}

pub fn progress_fraction(current: usize, total: usize) -> f32 {
    if total == 0 {
        return 0.0;
    }
    (current + 1) as f32 / total as f32
}

pub fn presentation_tooltip(active: bool) -> &'static str {
    if active {
        "Exit presentation mode"
    } else {
        "Start presentation mode (P)"
    }
}

pub fn fullscreen_tooltip(active: bool) -> &'static str {
    if active {
        "Exit fullscreen (F)"
    } else {
        "Fullscreen (F)"
    }
}

/// Thin bar along the top edge showing how far into the deck we are.
pub fn progress_bar<H: HostPlatform>(ctx: &egui::Context, nav: &Navigator<H>, theme: &Theme) {
    egui::TopBottomPanel::top("progress")
        .exact_height(PROGRESS_HEIGHT)
        .show_separator_line(false)
        .frame(egui::Frame::new().fill(Theme::with_opacity(theme.foreground, 0.1)))
        .show(ctx, |ui| {
            let rect = ui.max_rect();
            let fraction = progress_fraction(nav.current_slide(), nav.total_slides());
            let filled = egui::Rect::from_min_size(
                rect.min,
                egui::vec2(rect.width() * fraction, rect.height()),
            );
            ui.painter().rect_filled(filled, 0.0, theme.accent);
        });
}

/// Bottom control bar. Returns the actions the user clicked this frame.
pub fn control_bar<H: HostPlatform>(
    ctx: &egui::Context,
    nav: &Navigator<H>,
    theme: &Theme,
    show_help: &mut bool,
) -> Vec<NavAction> {
    let mut actions = Vec::new();

    egui::TopBottomPanel::bottom("controls")
        .exact_height(BAR_HEIGHT)
        .frame(
            egui::Frame::new()
                .fill(theme.bar_background)
                .inner_margin(egui::Margin::symmetric(12, 6)),
        )
        .show(ctx, |ui| {
            ui.horizontal_centered(|ui| {
                let prev = ui
                    .add_enabled(!nav.is_first(), egui::Button::new("\u{25C0}"))
                    .on_hover_text("Previous slide");
                if prev.clicked() {
                    actions.push(NavAction::Prev);
                }

                let muted = Theme::with_opacity(theme.foreground, 0.6);
                ui.label(
                    egui::RichText::new(counter_text(nav.current_slide(), nav.total_slides()))
                        .monospace()
                        .size(theme.chrome_size)
                        .color(muted),
                );
                ui.label(
                    egui::RichText::new("|")
                        .size(theme.chrome_size)
                        .color(Theme::with_opacity(theme.foreground, 0.3)),
                );
                ui.label(
                    egui::RichText::new(nav.current_slide_name())
                        .size(theme.chrome_size)
                        .color(muted),
                );

                ui.add_space(12.0);
                slide_dots(ui, nav, theme, &mut actions);

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let next = ui
                        .add_enabled(!nav.is_last(), egui::Button::new("\u{25B6}"))
                        .on_hover_text("Next slide");
                    if next.clicked() {
                        actions.push(NavAction::Next);
                    }

                    let fullscreen_icon = if nav.is_fullscreen() {
                        "\u{2199}"
                    } else {
                        "\u{2197}"
                    };
                    if ui
                        .button(fullscreen_icon)
                        .on_hover_text(fullscreen_tooltip(nav.is_fullscreen()))
                        .clicked()
                    {
                        actions.push(NavAction::ToggleFullscreen);
                    }

                    let presenting = nav.is_presentation_mode();
                    let presentation_button = egui::Button::new(if presenting {
                        "\u{25A3}"
                    } else {
                        "\u{25B7}"
                    })
                    .selected(presenting);
                    if ui
                        .add(presentation_button)
                        .on_hover_text(presentation_tooltip(presenting))
                        .clicked()
                    {
                        actions.push(NavAction::TogglePresentation);
                    }

                    if ui
                        .button("\u{2328}")
                        .on_hover_text("Keyboard shortcuts")
                        .clicked()
                    {
                        *show_help = true;
                    }
                });
            });
        });

    actions
}

fn slide_dots<H: HostPlatform>(
    ui: &mut egui::Ui,
    nav: &Navigator<H>,
    theme: &Theme,
    actions: &mut Vec<NavAction>,
) {
    ui.spacing_mut().item_spacing.x = 6.0;
    for (i, name) in nav.slide_names().iter().enumerate() {
        let active = i == nav.current_slide();
        let width = if active { ACTIVE_DOT_WIDTH } else { DOT_SIZE };
        let (rect, response) =
            ui.allocate_exact_size(egui::vec2(width, DOT_SIZE), egui::Sense::click());
        let color = if active {
            theme.accent
        } else if response.hovered() {
            Theme::with_opacity(theme.foreground, 0.4)
        } else {
            Theme::with_opacity(theme.foreground, 0.2)
        };
        ui.painter().rect_filled(rect, DOT_SIZE / 2.0, color);
        if response.on_hover_text(name.as_str()).clicked() {
            actions.push(NavAction::GoTo(i));
        }
    }
}

/// Modal list of keyboard shortcuts.
pub fn keyboard_help(ctx: &egui::Context, open: &mut bool) {
    egui::Window::new("Keyboard Shortcuts")
        .open(open)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            egui::Grid::new("shortcuts")
                .num_columns(2)
                .spacing([24.0, 8.0])
                .show(ui, |ui| {
                    for (keys, action) in KEY_BINDINGS {
                        ui.label(*action);
                        ui.monospace(*keys);
                        ui.end_row();
                    }
                });
        });
}
