pub mod completion;
pub mod config;
pub mod keys;

use colored::Colorize;

pub fn print_version() {
    println!(
        "{} {}",
        "slidenav".bold().cyan(),
        env!("CARGO_PKG_VERSION").dimmed()
    );
    println!("{}", env!("CARGO_PKG_DESCRIPTION"));
}
