// ttf2utf/src/handlers/txt.rs
//! Plain UTF-8 text files.

use log::{debug, info};
use std::fs;
use std::path::Path;
use ttf2utf_core::{FontConverter, MarkupOptions, Ttf2UtfError};

use super::{DocumentHandler, MappingRequest};

/// Converts a text file line by line. Plain text declares no fonts, so the
/// origin font must be given.
#[derive(Debug)]
pub struct TxtHandler<'a> {
    converter: &'a FontConverter,
}

impl<'a> TxtHandler<'a> {
    pub fn new(converter: &'a FontConverter) -> Self {
        Self { converter }
    }

    /// Converts text already in memory, preserving line endings.
    pub fn map_text(&self, text: &str, request: &MappingRequest) -> Result<String, Ttf2UtfError> {
        if request.is_auto() {
            return Err(Ttf2UtfError::AutoDetectUnsupported("plain text files".to_string()));
        }
        if !self.converter.is_target(&request.to_font) {
            return Err(Ttf2UtfError::UnsupportedTarget(request.to_font.clone()));
        }

        let mut output = String::with_capacity(text.len() * 2);
        for line in text.split_inclusive('\n') {
            output.push_str(&self.converter.convert(
                line,
                &request.from_font,
                &request.to_font,
                MarkupOptions::plain(),
            )?);
        }
        Ok(output)
    }
}

impl DocumentHandler for TxtHandler<'_> {
    fn map_fonts(&self, input: &Path, output: &Path, request: &MappingRequest) -> Result<(), Ttf2UtfError> {
        if request.is_auto() {
            return Err(Ttf2UtfError::AutoDetectUnsupported("plain text files".to_string()));
        }
        info!("Converting text file {} from '{}' to '{}'.", input.display(), request.from_font, request.to_font);
        let text = fs::read_to_string(input)?;
        let converted = self.map_text(&text, request)?;
        fs::write(output, converted)?;
        debug!("Wrote {}.", output.display());
        Ok(())
    }

    fn detect_used_fonts(&self, _input: &Path) -> Result<Vec<String>, Ttf2UtfError> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, tempdir};

    fn converter() -> FontConverter {
        FontConverter::with_default_rules().unwrap()
    }

    #[test]
    fn converts_and_keeps_line_endings() {
        let c = converter();
        let handler = TxtHandler::new(&c);
        let out = handler
            .map_text("g]kfn\r\n\nef/t", &MappingRequest::new("Preeti", "unicode"))
            .unwrap();
        assert_eq!(out, "नेपाल\r\n\nभारत");
    }

    #[test]
    fn lines_ending_in_a_virama_keep_it() {
        let c = converter();
        let handler = TxtHandler::new(&c);
        let out = handler
            .map_text("श्रीमान्\nभारत\n", &MappingRequest::new("unicode", "Preeti"))
            .unwrap();
        assert_eq!(out, ">Ldfg\\\nef/t\n");

        let out = handler
            .map_text("भन्\r\nक", &MappingRequest::new("unicode", "Preeti"))
            .unwrap();
        assert_eq!(out, "eg\\\r\ns");
    }

    #[test]
    fn auto_is_rejected_before_reading() {
        let c = converter();
        let handler = TxtHandler::new(&c);
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.txt");
        let output = dir.path().join("out.txt");
        let err = handler.map_fonts(&missing, &output, &MappingRequest::auto()).unwrap_err();
        assert!(matches!(err, Ttf2UtfError::AutoDetectUnsupported(_)));
        assert!(!output.exists());
    }

    #[test]
    fn unknown_target_writes_nothing() {
        let c = converter();
        let handler = TxtHandler::new(&c);
        let mut input = NamedTempFile::new().unwrap();
        input.write_all("g]kfn".as_bytes()).unwrap();
        let dir = tempdir().unwrap();
        let output = dir.path().join("out.txt");
        let err = handler
            .map_fonts(input.path(), &output, &MappingRequest::new("Preeti", "Sagarmatha"))
            .unwrap_err();
        assert!(matches!(err, Ttf2UtfError::UnsupportedTarget(_)));
        assert!(!output.exists());
    }

    #[test]
    fn file_round_trip_to_preeti() {
        let c = converter();
        let handler = TxtHandler::new(&c);
        let mut input = NamedTempFile::new().unwrap();
        input.write_all("नेपाल\nभारत\n".as_bytes()).unwrap();
        let dir = tempdir().unwrap();
        let output = dir.path().join("out.txt");
        handler
            .map_fonts(input.path(), &output, &MappingRequest::new("Unicode", "Preeti"))
            .unwrap();
        assert_eq!(fs::read_to_string(&output).unwrap(), "g]kfn\nef/t\n");
    }

    #[test]
    fn detects_nothing() {
        let c = converter();
        assert!(TxtHandler::new(&c).detect_used_fonts(Path::new("any.txt")).unwrap().is_empty());
    }
}
