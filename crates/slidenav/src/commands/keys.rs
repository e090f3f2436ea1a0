use colored::Colorize;

use crate::nav::input::KEY_BINDINGS;

pub fn run() {
    println!("{}", "Keyboard Shortcuts".bold());
    println!();
    for line in format_bindings() {
        println!("{line}");
    }
    println!();
    println!(
        "{}",
        "Shortcuts are ignored while typing in a text field; F and P are ignored with Ctrl/Cmd held."
            .dimmed()
    );
}

fn format_bindings() -> Vec<String> {
    let width = KEY_BINDINGS
        .iter()
        .map(|(keys, _)| keys.chars().count())
        .max()
        .unwrap_or(0);
    KEY_BINDINGS
        .iter()
        .map(|(keys, action)| {
            let pad = width - keys.chars().count();
            format!("  {}{}  {}", keys.cyan(), " ".repeat(pad), action)
        })
        .collect()
}
