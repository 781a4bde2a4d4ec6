use ansi_term::{Colour, Style};
use std::fmt;

/// Icons
const ICON_INFO: &str = "ℹ️";
const ICON_OK: &str = "✅";
const ICON_WARN: &str = "⚠️";
const ICON_ERR: &str = "❌";
const ICON_STEP: &str = "➜";

pub fn info<T: fmt::Display>(msg: T) {
    println!("{} {}", Colour::Blue.bold().paint(ICON_INFO), msg);
}

pub fn success<T: fmt::Display>(msg: T) {
    println!("{} {}", Colour::Green.bold().paint(ICON_OK), msg);
}

/// Warnings go to stderr so listings on stdout stay machine-readable.
pub fn warning<T: fmt::Display>(msg: T) {
    eprintln!("{} {}", Colour::Yellow.bold().paint(ICON_WARN), msg);
}

pub fn error<T: fmt::Display>(msg: T) {
    eprintln!("{} {}", Colour::Red.bold().paint(ICON_ERR), msg);
}

/// One browser action, printed with --annotate-actions
pub fn step<T: fmt::Display>(msg: T) {
    println!("{} {}", Colour::Cyan.paint(ICON_STEP), Style::new().dimmed().paint(msg.to_string()));
}

/// Section header above a listing
pub fn header<T: fmt::Display>(msg: T) {
    println!("{}", Style::new().bold().paint(msg.to_string()));
}
