// ttf2utf/src/commands/mod.rs
//! Subcommand implementations and the helpers they share for status output.

pub mod convert;
pub mod inspect;

use is_terminal::IsTerminal;
use std::io;
use ttf2utf_core::FontConverter;

use crate::ui::output_format;
use crate::ui::theme::ThemeMap;

/// Everything a subcommand needs besides its own arguments.
pub struct RunContext<'a> {
    pub converter: &'a FontConverter,
    pub theme: &'a ThemeMap,
    /// Suppresses status messages; results and errors are still printed.
    pub quiet: bool,
}

impl RunContext<'_> {
    pub fn info(&self, msg: impl AsRef<str>) {
        if !self.quiet {
            info_msg(msg, self.theme);
        }
    }

    pub fn success(&self, msg: impl AsRef<str>) {
        if !self.quiet {
            success_msg(msg, self.theme);
        }
    }

    pub fn warn(&self, msg: impl AsRef<str>) {
        if !self.quiet {
            warn_msg(msg, self.theme);
        }
    }
}

/// Helper for printing info messages to stderr.
pub fn info_msg(msg: impl AsRef<str>, theme: &ThemeMap) {
    let stderr_supports_color = io::stderr().is_terminal();
    let _ = output_format::print_info_message(&mut io::stderr(), msg.as_ref(), theme, stderr_supports_color);
}

pub fn success_msg(msg: impl AsRef<str>, theme: &ThemeMap) {
    let stderr_supports_color = io::stderr().is_terminal();
    let _ = output_format::print_success_message(&mut io::stderr(), msg.as_ref(), theme, stderr_supports_color);
}

/// Helper for printing error messages to stderr.
pub fn error_msg(msg: impl AsRef<str>, theme: &ThemeMap) {
    let stderr_supports_color = io::stderr().is_terminal();
    let _ = output_format::print_error_message(&mut io::stderr(), msg.as_ref(), theme, stderr_supports_color);
}

pub fn warn_msg(msg: impl AsRef<str>, theme: &ThemeMap) {
    let stderr_supports_color = io::stderr().is_terminal();
    let _ = output_format::print_warn_message(&mut io::stderr(), msg.as_ref(), theme, stderr_supports_color);
}
