// ttf2utf/src/handlers/docx.rs
//! Word-processing documents (`.docx`).
//!
//! Only `word/document.xml` is rewritten; every other part of the package is
//! copied byte for byte. The XML is streamed twice: a scan records which runs
//! carry text, then the rewrite pass converts those runs and their font
//! declarations. Elements are matched by their `w:` qualified names.

use log::{debug, info};
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::fmt::Display;
use std::fs::{self, File};
use std::io::{Cursor, Read, Write};
use std::path::Path;
use ttf2utf_core::{FontConverter, IDENTITY_FONT, MarkupOptions, Ttf2UtfError, is_identity_font};
use zip::ZipArchive;
use zip::write::{SimpleFileOptions, ZipWriter};

use super::{DocumentHandler, DocxComponent, MappingRequest};

pub const DOCUMENT_PART: &str = "word/document.xml";
pub const DEFAULT_UNICODE_FONT: &str = "Kalimati";
pub const KNOWN_DEVANAGARI_UNICODE_FONTS: [&str; 3] = ["Kalimati", "Mangal", "Noto Sans Devanagari"];

/// Font attributes removed from a converted run before the new font is set.
const STRIPPED_FONT_ATTRIBUTES: &[&[u8]] = &[b"w:cstheme", b"w:eastAsiaTheme", b"w:ascii", b"w:hAnsi", b"w:cs"];

/// Which Unicode runs may be converted to a legacy font in auto mode.
///
/// A run declared only by its complex-script font is Unicode text, but many
/// Unicode fonts hold Latin or other scripts. Only fonts on the allow-list are
/// trusted to contain Devanagari.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnicodeFontPolicy {
    pub known_fonts: Vec<String>,
    /// When false every Unicode run is converted.
    pub enforce: bool,
}

impl Default for UnicodeFontPolicy {
    fn default() -> Self {
        Self {
            known_fonts: KNOWN_DEVANAGARI_UNICODE_FONTS.iter().map(|f| f.to_string()).collect(),
            enforce: true,
        }
    }
}

impl UnicodeFontPolicy {
    /// Allow-list check, extended with per-request names and the registered legacy fonts.
    pub fn allows(&self, font: &str, extra_fonts: &[String], converter: &FontConverter) -> bool {
        !self.enforce
            || self
                .known_fonts
                .iter()
                .chain(extra_fonts)
                .any(|known| known.eq_ignore_ascii_case(font))
            || converter.registry().get(font).is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocxOptions {
    /// Complex-script font given to runs converted to Unicode.
    pub default_unicode_font: String,
    pub unicode_font_policy: UnicodeFontPolicy,
}

impl Default for DocxOptions {
    fn default() -> Self {
        Self {
            default_unicode_font: DEFAULT_UNICODE_FONT.to_string(),
            unicode_font_policy: UnicodeFontPolicy::default(),
        }
    }
}

/// Counts from one document conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DocxReport {
    pub runs_converted: usize,
    pub runs_skipped: usize,
    pub paragraph_marks_converted: usize,
}

/// The font a run declares in its `w:rFonts`.
#[derive(Debug, Clone, PartialEq, Eq)]
enum DeclaredFont {
    /// `w:ascii` is set.
    Legacy(String),
    /// Only `w:cs` is set: Unicode text in that complex-script font.
    Unicode(String),
    Unknown,
}

#[derive(Debug)]
pub struct DocxHandler<'a> {
    converter: &'a FontConverter,
    options: DocxOptions,
}

impl<'a> DocxHandler<'a> {
    pub fn new(converter: &'a FontConverter) -> Self {
        Self::with_options(converter, DocxOptions::default())
    }

    pub fn with_options(converter: &'a FontConverter, options: DocxOptions) -> Self {
        Self { converter, options }
    }

    pub fn options(&self) -> &DocxOptions {
        &self.options
    }

    /// Converts `input` into `output` and reports what was touched.
    pub fn convert_document(
        &self,
        input: &Path,
        output: &Path,
        request: &MappingRequest,
    ) -> Result<DocxReport, Ttf2UtfError> {
        if !self.converter.is_target(&request.to_font) {
            return Err(Ttf2UtfError::UnsupportedTarget(request.to_font.clone()));
        }
        if !request.is_auto() && !self.converter.is_supported(&request.from_font) {
            return Err(Ttf2UtfError::NoMapForOrigin(request.from_font.clone()));
        }

        info!(
            "Converting document {} from '{}' to '{}'.",
            input.display(),
            request.from_font,
            request.to_font
        );
        let xml = read_document_xml(input)?;
        let runs_with_text = scan_runs(&xml).map_err(|e| bad_document(input, e))?;
        debug!("Document has {} run(s).", runs_with_text.len());

        let rewriter = DocumentRewriter::new(self, request, input, runs_with_text);
        let (document, report) = rewriter.rewrite(&xml)?;
        write_package(input, output, &document)?;
        info!(
            "Converted {} run(s) and {} paragraph mark(s); skipped {} run(s).",
            report.runs_converted, report.paragraph_marks_converted, report.runs_skipped
        );
        Ok(report)
    }

    /// The font a run's text is read as, or `None` when the run is left alone.
    fn source_font(&self, declared: &DeclaredFont, request: &MappingRequest) -> Option<String> {
        if !request.is_auto() {
            return Some(request.from_font.clone());
        }
        match declared {
            DeclaredFont::Legacy(font) if self.converter.is_supported(font) => Some(font.clone()),
            DeclaredFont::Unicode(font) => {
                let allowed = is_identity_font(&request.to_font)
                    || self
                        .options
                        .unicode_font_policy
                        .allows(font, &request.known_unicode_fonts, self.converter);
                if allowed {
                    Some(IDENTITY_FONT.to_string())
                } else {
                    debug!("Unicode font '{}' is not known to hold Devanagari; leaving run as is.", font);
                    None
                }
            }
            _ => None,
        }
    }

    /// `w:rFonts` attributes declaring `to_font`.
    fn target_font_attributes(&self, to_font: &str) -> Vec<(&'static str, String)> {
        if is_identity_font(to_font) {
            vec![("w:cs", self.options.default_unicode_font.clone())]
        } else {
            vec![("w:ascii", to_font.to_string()), ("w:hAnsi", to_font.to_string())]
        }
    }
}

impl DocumentHandler for DocxHandler<'_> {
    fn map_fonts(&self, input: &Path, output: &Path, request: &MappingRequest) -> Result<(), Ttf2UtfError> {
        self.convert_document(input, output, request).map(|_| ())
    }

    fn detect_used_fonts(&self, input: &Path) -> Result<Vec<String>, Ttf2UtfError> {
        let xml = read_document_xml(input)?;
        let mut reader = Reader::from_str(&xml);
        let mut fonts: Vec<String> = Vec::new();
        loop {
            match reader.read_event().map_err(|e| bad_document(input, e))? {
                Event::Eof => break,
                Event::Start(e) | Event::Empty(e) if e.name().as_ref() == b"w:rFonts" => {
                    if let DeclaredFont::Legacy(font) = declared_font(&e).map_err(|err| bad_document(input, err))? {
                        if self.converter.is_supported(&font) && !fonts.contains(&font) {
                            fonts.push(font);
                        }
                    }
                }
                _ => {}
            }
        }
        Ok(fonts)
    }
}

/// The element a `w:rPr/w:rFonts` belongs to.
enum FontsOwner {
    Run,
    ParagraphMark,
}

struct RunState {
    /// In a requested component and has text.
    eligible: bool,
    /// Set once the run's font is converted; its text is read as this font.
    source_font: Option<String>,
    fonts_seen: bool,
}

struct DocumentRewriter<'h, 'a> {
    handler: &'h DocxHandler<'a>,
    request: &'h MappingRequest,
    path: &'h Path,
    runs_with_text: Vec<bool>,
    writer: Writer<Vec<u8>>,
    open: Vec<String>,
    table_depth: usize,
    shape_depth: usize,
    run_count: usize,
    runs: Vec<RunState>,
    text: Option<String>,
    report: DocxReport,
}

impl<'h, 'a> DocumentRewriter<'h, 'a> {
    fn new(handler: &'h DocxHandler<'a>, request: &'h MappingRequest, path: &'h Path, runs_with_text: Vec<bool>) -> Self {
        Self {
            handler,
            request,
            path,
            runs_with_text,
            writer: Writer::new(Vec::new()),
            open: Vec::new(),
            table_depth: 0,
            shape_depth: 0,
            run_count: 0,
            runs: Vec::new(),
            text: None,
            report: DocxReport::default(),
        }
    }

    fn rewrite(mut self, xml: &str) -> Result<(Vec<u8>, DocxReport), Ttf2UtfError> {
        let mut reader = Reader::from_str(xml);
        loop {
            match reader.read_event().map_err(|e| bad_document(self.path, e))? {
                Event::Eof => break,
                Event::Start(e) => self.start(e)?,
                Event::Empty(e) => self.empty(e)?,
                Event::End(e) => self.end(e)?,
                Event::Text(t) if self.text.is_some() => {
                    let raw = std::str::from_utf8(&t).map_err(|e| bad_document(self.path, e))?;
                    self.push_text(raw);
                }
                Event::GeneralRef(r) if self.text.is_some() => {
                    let name = std::str::from_utf8(&r).map_err(|e| bad_document(self.path, e))?;
                    let entity = format!("&{};", name);
                    self.push_text(&entity);
                }
                other => self.write(other)?,
            }
        }
        Ok((self.writer.into_inner(), self.report))
    }

    fn write<'e>(&mut self, event: Event<'e>) -> Result<(), Ttf2UtfError> {
        self.writer.write_event(event).map_err(|e| bad_document(self.path, e))
    }

    fn push_text(&mut self, raw: &str) {
        if let Some(buffer) = self.text.as_mut() {
            buffer.push_str(raw);
        }
    }

    fn component(&self) -> DocxComponent {
        if self.table_depth > 0 {
            DocxComponent::Table
        } else if self.shape_depth > 0 {
            DocxComponent::Shape
        } else {
            DocxComponent::BodyParagraph
        }
    }

    fn parent(&self) -> Option<&str> {
        self.open.last().map(String::as_str)
    }

    fn grandparent(&self) -> Option<&str> {
        self.open.iter().rev().nth(1).map(String::as_str)
    }

    fn start(&mut self, e: BytesStart<'_>) -> Result<(), Ttf2UtfError> {
        let name = qualified_name(e.name().as_ref());
        let event = match name.as_str() {
            "w:tbl" => {
                self.table_depth += 1;
                e
            }
            "w:txbxContent" => {
                self.shape_depth += 1;
                e
            }
            "w:r" => {
                let index = self.run_count;
                self.run_count += 1;
                let has_text = self.runs_with_text.get(index).copied().unwrap_or(false);
                let eligible = has_text && self.request.wants(self.component());
                self.runs.push(RunState {
                    eligible,
                    source_font: None,
                    fonts_seen: false,
                });
                e
            }
            "w:rFonts" => self.font_element(e)?,
            "w:t" => {
                let converting = self.parent() == Some("w:r")
                    && self.runs.last().is_some_and(|run| run.source_font.is_some());
                if converting {
                    self.text = Some(String::new());
                }
                e
            }
            _ => e,
        };
        self.open.push(name);
        self.write(Event::Start(event))?;
        Ok(())
    }

    fn empty(&mut self, e: BytesStart<'_>) -> Result<(), Ttf2UtfError> {
        let name = qualified_name(e.name().as_ref());
        match name.as_str() {
            "w:rFonts" => {
                let rewritten = self.font_element(e)?;
                self.write(Event::Empty(rewritten))?;
            }
            "w:rPr" if self.parent() == Some("w:r") && self.needs_inserted_fonts() => {
                let end = BytesEnd::new("w:rPr");
                self.write(Event::Start(e))?;
                self.insert_fonts()?;
                self.write(Event::End(end))?;
            }
            _ => self.write(Event::Empty(e))?,
        }
        Ok(())
    }

    fn end(&mut self, e: BytesEnd<'_>) -> Result<(), Ttf2UtfError> {
        let name = qualified_name(e.name().as_ref());
        match name.as_str() {
            "w:rPr" if self.grandparent() == Some("w:r") && self.needs_inserted_fonts() => {
                self.insert_fonts()?;
            }
            "w:t" => {
                if let Some(raw) = self.text.take() {
                    self.write_converted_text(&raw)?;
                }
            }
            "w:r" => {
                self.runs.pop();
            }
            "w:tbl" => self.table_depth = self.table_depth.saturating_sub(1),
            "w:txbxContent" => self.shape_depth = self.shape_depth.saturating_sub(1),
            _ => {}
        }
        self.open.pop();
        self.write(Event::End(e))?;
        Ok(())
    }

    /// In manual mode, an eligible run whose properties declare no font gets one.
    fn needs_inserted_fonts(&self) -> bool {
        !self.request.is_auto() && self.runs.last().is_some_and(|run| run.eligible && !run.fonts_seen)
    }

    fn insert_fonts(&mut self) -> Result<(), Ttf2UtfError> {
        let mut fonts = BytesStart::new("w:rFonts");
        for (key, value) in self.handler.target_font_attributes(&self.request.to_font) {
            fonts.push_attribute((key, value.as_str()));
        }
        self.write(Event::Empty(fonts))?;
        if let Some(run) = self.runs.last_mut() {
            run.fonts_seen = true;
            run.source_font = Some(self.request.from_font.clone());
        }
        self.report.runs_converted += 1;
        Ok(())
    }

    /// Decides whether a `w:rFonts` is rewritten, for a run or a paragraph mark.
    fn font_element<'e>(&mut self, e: BytesStart<'e>) -> Result<BytesStart<'e>, Ttf2UtfError> {
        if self.parent() != Some("w:rPr") {
            return Ok(e);
        }
        let owner = match self.grandparent() {
            Some("w:r") => FontsOwner::Run,
            Some("w:pPr") => FontsOwner::ParagraphMark,
            _ => return Ok(e),
        };
        let handler = self.handler;
        let request = self.request;
        let declared = declared_font(&e).map_err(|err| bad_document(self.path, err))?;

        match owner {
            FontsOwner::Run => {
                let Some(run) = self.runs.last_mut() else {
                    return Ok(e);
                };
                if !run.eligible {
                    return Ok(e);
                }
                run.fonts_seen = true;
                match handler.source_font(&declared, request) {
                    Some(source) => {
                        run.source_font = Some(source);
                        self.report.runs_converted += 1;
                        self.rewrite_fonts(&e)
                    }
                    None => {
                        self.report.runs_skipped += 1;
                        Ok(e)
                    }
                }
            }
            FontsOwner::ParagraphMark => {
                if request.wants(self.component()) && handler.source_font(&declared, request).is_some() {
                    self.report.paragraph_marks_converted += 1;
                    self.rewrite_fonts(&e)
                } else {
                    Ok(e)
                }
            }
        }
    }

    fn rewrite_fonts<'e>(&self, e: &BytesStart<'_>) -> Result<BytesStart<'e>, Ttf2UtfError> {
        let mut rewritten = BytesStart::new(qualified_name(e.name().as_ref()));
        for attr in e.attributes() {
            let attr = attr.map_err(|err| bad_document(self.path, err))?;
            if !STRIPPED_FONT_ATTRIBUTES.contains(&attr.key.as_ref()) {
                rewritten.push_attribute(attr);
            }
        }
        for (key, value) in self.handler.target_font_attributes(&self.request.to_font) {
            rewritten.push_attribute((key, value.as_str()));
        }
        Ok(rewritten)
    }

    fn write_converted_text(&mut self, raw: &str) -> Result<(), Ttf2UtfError> {
        let source = self
            .runs
            .last()
            .and_then(|run| run.source_font.clone())
            .unwrap_or_else(|| self.request.from_font.clone());
        let converted =
            self.handler
                .converter
                .convert(raw, &source, &self.request.to_font, MarkupOptions::markup())?;
        self.write(Event::Text(BytesText::from_escaped(converted)))?;
        Ok(())
    }
}

fn qualified_name(name: &[u8]) -> String {
    String::from_utf8_lossy(name).into_owned()
}

fn declared_font(e: &BytesStart<'_>) -> Result<DeclaredFont, quick_xml::Error> {
    let mut ascii = None;
    let mut cs = None;
    for attr in e.attributes() {
        let attr = attr?;
        match attr.key.as_ref() {
            b"w:ascii" => ascii = Some(attr.unescape_value()?.into_owned()),
            b"w:cs" => cs = Some(attr.unescape_value()?.into_owned()),
            _ => {}
        }
    }
    Ok(match (ascii, cs) {
        (Some(font), _) => DeclaredFont::Legacy(font),
        (None, Some(font)) => DeclaredFont::Unicode(font),
        (None, None) => DeclaredFont::Unknown,
    })
}

/// For each run, in document order, whether it contains a `w:t`.
fn scan_runs(xml: &str) -> Result<Vec<bool>, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    let mut has_text = Vec::new();
    let mut open_runs: Vec<usize> = Vec::new();
    loop {
        match reader.read_event()? {
            Event::Eof => break,
            Event::Start(e) => match e.name().as_ref() {
                b"w:r" => {
                    open_runs.push(has_text.len());
                    has_text.push(false);
                }
                b"w:t" => {
                    if let Some(&run) = open_runs.last() {
                        has_text[run] = true;
                    }
                }
                _ => {}
            },
            Event::End(e) if e.name().as_ref() == b"w:r" => {
                open_runs.pop();
            }
            _ => {}
        }
    }
    Ok(has_text)
}

fn bad_document(path: &Path, reason: impl Display) -> Ttf2UtfError {
    Ttf2UtfError::BadDocument {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

fn open_package(path: &Path) -> Result<ZipArchive<File>, Ttf2UtfError> {
    let file = File::open(path)?;
    ZipArchive::new(file).map_err(|e| bad_document(path, e))
}

fn read_document_xml(path: &Path) -> Result<String, Ttf2UtfError> {
    let mut archive = open_package(path)?;
    let mut part = archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| bad_document(path, format!("cannot read {}: {}", DOCUMENT_PART, e)))?;
    let mut xml = String::new();
    part.read_to_string(&mut xml).map_err(|e| bad_document(path, e))?;
    Ok(xml)
}

/// Copies the input package to `output`, replacing the main document part.
fn write_package(input: &Path, output: &Path, document: &[u8]) -> Result<(), Ttf2UtfError> {
    let mut archive = open_package(input)?;
    let mut buffer = Cursor::new(Vec::new());
    {
        let mut writer = ZipWriter::new(&mut buffer);
        for index in 0..archive.len() {
            let entry = archive.by_index_raw(index).map_err(|e| bad_document(input, e))?;
            if entry.name() == DOCUMENT_PART {
                let options = SimpleFileOptions::default().compression_method(entry.compression());
                drop(entry);
                writer.start_file(DOCUMENT_PART, options).map_err(std::io::Error::other)?;
                writer.write_all(document)?;
            } else {
                writer.raw_copy_file(entry).map_err(std::io::Error::other)?;
            }
        }
        writer.finish().map_err(std::io::Error::other)?;
    }
    fs::write(output, buffer.into_inner())?;
    debug!("Wrote package {}.", output.display());
    Ok(())
}
