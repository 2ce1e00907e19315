//! Terminal output with colors
//!
//! `colored` honours NO_COLOR, CLICOLOR and CLICOLOR_FORCE.

use std::fmt::Display;
use std::path::Path;

use colored::Colorize;

use crate::domain::Region;

/// `error: <msg>` on stderr
pub fn error(msg: &(impl Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// `warning: <msg>` on stderr
pub fn warning(msg: &(impl Display + ?Sized)) {
    eprintln!("{}: {}", "warning".yellow(), msg);
}

/// Confirms a written export.
pub fn wrote(path: &Path) {
    println!("{} {}", "wrote".green(), path.display());
}

pub fn heading(title: &(impl Display + ?Sized)) {
    println!("{}", title.to_string().cyan().bold());
}

/// Aligned `label: value` line below a heading.
pub fn field(label: &str, value: &(impl Display + ?Sized)) {
    let label = format!("{:<9}", format!("{label}:"));
    println!("  {} {}", label.dimmed(), value);
}

/// Region name with its id dimmed.
pub fn region(region: &Region) {
    println!("{} {}", region.name, format!("({})", region.id).dimmed());
}

/// Data output, uncolored so it can be piped.
pub fn plain(msg: &(impl Display + ?Sized)) {
    println!("{}", msg);
}
