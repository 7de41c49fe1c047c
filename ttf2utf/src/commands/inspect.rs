// ttf2utf/src/commands/inspect.rs
//! The `detect` and `fonts` subcommands.

use anyhow::{Context, Result};
use is_terminal::IsTerminal;
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;
use ttf2utf_core::FontConverter;

use super::RunContext;
use crate::cli::{DetectCommand, FontsCommand};
use crate::handlers::{DocumentHandler, DocxHandler};
use crate::ui::output_format;

#[derive(Debug, Serialize)]
pub struct DetectReport {
    pub file: PathBuf,
    pub fonts: Vec<String>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct FontInventory {
    /// Fonts text can be converted from, including `Unicode`.
    pub origin_fonts: Vec<String>,
    /// Fonts text can be converted to, including `Unicode`.
    pub target_fonts: Vec<String>,
}

impl FontInventory {
    pub fn of(converter: &FontConverter) -> Self {
        let mut target_fonts: Vec<String> = converter.legacy_targets().iter().map(|f| f.to_string()).collect();
        target_fonts.push(ttf2utf_core::IDENTITY_FONT.to_string());
        Self {
            origin_fonts: converter.supported_fonts(),
            target_fonts,
        }
    }
}

pub fn run_detect(ctx: &RunContext<'_>, cmd: &DetectCommand) -> Result<()> {
    let handler = DocxHandler::new(ctx.converter);
    let fonts = handler
        .detect_used_fonts(&cmd.input)
        .with_context(|| format!("Failed to inspect {}", cmd.input.display()))?;

    let stdout = io::stdout();
    let mut writer = stdout.lock();
    if cmd.json {
        let report = DetectReport {
            file: cmd.input.clone(),
            fonts,
        };
        serde_json::to_writer_pretty(&mut writer, &report)?;
        writeln!(writer)?;
    } else if fonts.is_empty() {
        ctx.info(format!("No supported legacy fonts found in {}.", cmd.input.display()));
    } else {
        let header = format!("Legacy fonts used in {}:", cmd.input.display());
        output_format::print_font_list(&mut writer, &header, &fonts, ctx.theme, stdout.is_terminal())?;
    }
    Ok(())
}

pub fn run_fonts(ctx: &RunContext<'_>, cmd: &FontsCommand) -> Result<()> {
    let inventory = FontInventory::of(ctx.converter);
    let stdout = io::stdout();
    let mut writer = stdout.lock();
    if cmd.json {
        serde_json::to_writer_pretty(&mut writer, &inventory).context("Failed to write font inventory")?;
        writeln!(writer)?;
    } else {
        let color = stdout.is_terminal();
        output_format::print_font_list(&mut writer, "Input fonts:", &inventory.origin_fonts, ctx.theme, color)?;
        output_format::print_font_list(&mut writer, "Output fonts:", &inventory.target_fonts, ctx.theme, color)?;
    }
    Ok(())
}
