// ttf2utf/src/commands/convert.rs
//! The `string`, `plain` and `docx` subcommands.

use anyhow::{Context, Result};
use log::{debug, info};
use std::io::{self, Read, Write};
use ttf2utf_core::{AUTO_FONT, MarkupOptions, Ttf2UtfError};

use super::RunContext;
use crate::cli::{DocxCommand, PlainCommand, StringCommand};
use crate::handlers::{
    DocumentHandler, DocxComponent, DocxHandler, DocxOptions, MappingRequest, TxtHandler, UnicodeFontPolicy,
};

pub fn run_string(ctx: &RunContext<'_>, cmd: &StringCommand) -> Result<()> {
    if cmd.input_font.eq_ignore_ascii_case(AUTO_FONT) {
        return Err(Ttf2UtfError::AutoDetectUnsupported("strings".to_string()).into());
    }
    let (text, from_stdin) = match &cmd.text {
        Some(text) => (text.clone(), false),
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read text from stdin")?;
            (buffer, true)
        }
    };
    let markup = if cmd.markup {
        MarkupOptions::markup()
    } else {
        MarkupOptions::plain()
    };
    debug!("Converting {} byte(s) from '{}' to '{}'.", text.len(), cmd.input_font, cmd.output_font);

    let converted = ctx
        .converter
        .convert(&text, &cmd.input_font, &cmd.output_font, markup)
        .context("String conversion failed")?;

    let stdout = io::stdout();
    let mut writer = stdout.lock();
    if from_stdin {
        write!(writer, "{}", converted)?;
    } else {
        writeln!(writer, "{}", converted)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn run_plain(ctx: &RunContext<'_>, cmd: &PlainCommand) -> Result<()> {
    let request = MappingRequest::new(cmd.input_font.as_str(), cmd.output_font.as_str());
    let handler = TxtHandler::new(ctx.converter);
    ctx.info(format!("Converting {} from {} to {}...", cmd.input.display(), cmd.input_font, cmd.output_font));
    handler
        .map_fonts(&cmd.input, &cmd.output, &request)
        .with_context(|| format!("Failed to convert {}", cmd.input.display()))?;
    info!("Plain text conversion finished.");
    ctx.success(format!("Wrote {}.", cmd.output.display()));
    Ok(())
}

pub fn run_docx(ctx: &RunContext<'_>, cmd: &DocxCommand) -> Result<()> {
    let components = if cmd.components.is_empty() {
        DocxComponent::ALL.to_vec()
    } else {
        cmd.components.clone()
    };
    let request = MappingRequest::new(cmd.input_font.as_str(), cmd.output_font.as_str())
        .with_components(components)
        .with_known_unicode_fonts(cmd.known_unicode_fonts.clone());
    let options = DocxOptions {
        default_unicode_font: cmd.default_unicode_font.clone(),
        unicode_font_policy: UnicodeFontPolicy {
            enforce: !cmd.no_font_allowlist,
            ..UnicodeFontPolicy::default()
        },
    };
    let handler = DocxHandler::with_options(ctx.converter, options);

    ctx.info(format!("Converting {} from {} to {}...", cmd.input.display(), cmd.input_font, cmd.output_font));
    let report = handler
        .convert_document(&cmd.input, &cmd.output, &request)
        .with_context(|| format!("Failed to convert {}", cmd.input.display()))?;

    if report.runs_converted == 0 && report.paragraph_marks_converted == 0 {
        ctx.warn("No text runs were converted. Check --input-font and --components.");
    }
    if report.runs_skipped > 0 {
        ctx.info(format!("{} run(s) left unchanged.", report.runs_skipped));
    }
    ctx.success(format!(
        "Converted {} run(s); wrote {}.",
        report.runs_converted,
        cmd.output.display()
    ));
    Ok(())
}
