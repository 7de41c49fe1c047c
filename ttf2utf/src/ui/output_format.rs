// ttf2utf/src/ui/output_format.rs
//! Writers for themed status messages and listings.
//!
//! Colour is applied only when the caller says the stream supports it, so the
//! same functions produce plain text for files and pipes.

use owo_colors::OwoColorize;
use std::io::{self, Write};

use super::theme::{ThemeEntry, ThemeMap};

/// Paints `text` with the theme colour of `entry`, or returns it as is.
pub fn paint(text: &str, entry: ThemeEntry, theme: &ThemeMap, supports_color: bool) -> String {
    if !supports_color {
        return text.to_string();
    }
    match theme.get(&entry).and_then(|style| style.fg.as_ref()) {
        Some(color) => text.color(color.to_ansi_color()).to_string(),
        None => text.to_string(),
    }
}

fn print_message<W: Write>(
    writer: &mut W,
    label: &str,
    message: &str,
    entry: ThemeEntry,
    theme: &ThemeMap,
    supports_color: bool,
) -> io::Result<()> {
    let line = format!("{}{}", label, message);
    writeln!(writer, "{}", paint(&line, entry, theme, supports_color))
}

pub fn print_info_message<W: Write>(writer: &mut W, message: &str, theme: &ThemeMap, supports_color: bool) -> io::Result<()> {
    print_message(writer, "", message, ThemeEntry::Info, theme, supports_color)
}

pub fn print_success_message<W: Write>(
    writer: &mut W,
    message: &str,
    theme: &ThemeMap,
    supports_color: bool,
) -> io::Result<()> {
    print_message(writer, "", message, ThemeEntry::Success, theme, supports_color)
}

pub fn print_warn_message<W: Write>(writer: &mut W, message: &str, theme: &ThemeMap, supports_color: bool) -> io::Result<()> {
    print_message(writer, "Warning: ", message, ThemeEntry::Warn, theme, supports_color)
}

pub fn print_error_message<W: Write>(writer: &mut W, message: &str, theme: &ThemeMap, supports_color: bool) -> io::Result<()> {
    print_message(writer, "Error: ", message, ThemeEntry::Error, theme, supports_color)
}

/// A header line followed by one indented line per font name.
pub fn print_font_list<W: Write>(
    writer: &mut W,
    header: &str,
    fonts: &[String],
    theme: &ThemeMap,
    supports_color: bool,
) -> io::Result<()> {
    writeln!(writer, "{}", paint(header, ThemeEntry::Header, theme, supports_color))?;
    for font in fonts {
        writeln!(writer, "  {}", paint(font, ThemeEntry::FontName, theme, supports_color))?;
    }
    Ok(())
}
