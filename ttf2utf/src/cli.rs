// ttf2utf/src/cli.rs
//! Command-line interface of the `ttf2utf` binary: global flags and subcommands.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::handlers::DocxComponent;

#[derive(Parser, Debug)]
#[command(
    name = "ttf2utf",
    version = env!("CARGO_PKG_VERSION"),
    about = "Convert Preeti and other legacy Nepali font text to Unicode and back",
    long_about = "ttf2utf converts text typed in legacy Devanagari fonts such as Preeti and Kantipur to Unicode, \
                  and Unicode back to Preeti. It works on strings, plain text files and .docx documents, where \
                  the font of each run can be detected automatically.",
    arg_required_else_help = true
)]
pub struct Cli {
    #[arg(long, short = 'q', global = true, help = "Suppress all informational and debug messages.")]
    pub quiet: bool,

    #[arg(long, short = 'd', global = true, help = "Enable debug logging.")]
    pub debug: bool,

    /// Mapping definition merged over the built-in one.
    #[arg(
        long = "map-file",
        value_name = "FILE",
        env = "TTF2UTF_MAP_FILE",
        global = true,
        help = "Mapping definition (JSON or YAML) merged over the built-in rules."
    )]
    pub map_file: Option<PathBuf>,

    #[arg(long = "theme", value_name = "FILE", global = true, help = "Path to a YAML colour theme.")]
    pub theme: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(about = "Convert a string given as an argument or on stdin.")]
    String(StringCommand),

    #[command(about = "Convert a plain text file.")]
    Plain(PlainCommand),

    #[command(about = "Convert the text runs of a .docx document.")]
    Docx(DocxCommand),

    #[command(about = "List the supported legacy fonts used in a .docx document.")]
    Detect(DetectCommand),

    #[command(about = "List the fonts that can be converted from and to.")]
    Fonts(FontsCommand),
}

#[derive(Args, Debug)]
pub struct StringCommand {
    #[arg(long = "input-font", value_name = "FONT", help = "Font the text is written in (e.g. Preeti, Unicode).")]
    pub input_font: String,

    #[arg(long = "output-font", value_name = "FONT", default_value = "unicode", help = "Font to convert to.")]
    pub output_font: String,

    #[arg(long, help = "Treat the text as markup: resolve entities on input and escape the output.")]
    pub markup: bool,

    /// Text to convert; stdin is read when absent.
    #[arg(value_name = "TEXT")]
    pub text: Option<String>,
}

#[derive(Args, Debug)]
pub struct PlainCommand {
    #[arg(long = "input", short = 'i', value_name = "FILE", help = "Text file to read.")]
    pub input: PathBuf,

    #[arg(long = "output", short = 'o', value_name = "FILE", help = "Text file to write.")]
    pub output: PathBuf,

    #[arg(long = "input-font", value_name = "FONT", help = "Font the file is written in.")]
    pub input_font: String,

    #[arg(long = "output-font", value_name = "FONT", default_value = "unicode", help = "Font to convert to.")]
    pub output_font: String,
}

#[derive(Args, Debug)]
pub struct DocxCommand {
    #[arg(long = "input", short = 'i', value_name = "FILE", help = "Document to read.")]
    pub input: PathBuf,

    #[arg(long = "output", short = 'o', value_name = "FILE", help = "Document to write.")]
    pub output: PathBuf,

    #[arg(
        long = "input-font",
        value_name = "FONT",
        default_value = "auto",
        help = "Font of every run, or 'auto' to use the font each run declares."
    )]
    pub input_font: String,

    #[arg(long = "output-font", value_name = "FONT", default_value = "unicode", help = "Font to convert to.")]
    pub output_font: String,

    #[arg(
        long = "components",
        value_delimiter = ',',
        value_enum,
        help = "Document parts to convert (comma-separated). Defaults to all."
    )]
    pub components: Vec<DocxComponent>,

    #[arg(
        long = "known-unicode-fonts",
        value_delimiter = ',',
        value_name = "FONTS",
        help = "Extra Unicode fonts to treat as Devanagari when converting to a legacy font."
    )]
    pub known_unicode_fonts: Vec<String>,

    #[arg(
        long = "default-unicode-font",
        value_name = "FONT",
        default_value = "Kalimati",
        help = "Complex-script font given to runs converted to Unicode."
    )]
    pub default_unicode_font: String,

    #[arg(long = "no-font-allowlist", help = "Convert Unicode runs in any font, not only known Devanagari fonts.")]
    pub no_font_allowlist: bool,
}

#[derive(Args, Debug)]
pub struct DetectCommand {
    #[arg(long = "input", short = 'i', value_name = "FILE", help = "Document to inspect.")]
    pub input: PathBuf,

    #[arg(long, help = "Print the result as JSON on stdout.")]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct FontsCommand {
    #[arg(long, help = "Print the result as JSON on stdout.")]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn docx_defaults() {
        let cli = Cli::parse_from(["ttf2utf", "docx", "-i", "in.docx", "-o", "out.docx"]);
        let Commands::Docx(cmd) = cli.command else {
            panic!("expected docx subcommand");
        };
        assert_eq!(cmd.input_font, "auto");
        assert_eq!(cmd.output_font, "unicode");
        assert_eq!(cmd.default_unicode_font, "Kalimati");
        assert!(cmd.components.is_empty());
        assert!(!cmd.no_font_allowlist);
    }

    #[test]
    fn docx_component_list() {
        let cli = Cli::parse_from([
            "ttf2utf",
            "docx",
            "-i",
            "a.docx",
            "-o",
            "b.docx",
            "--components",
            "table,shape",
            "--known-unicode-fonts",
            "Arial Unicode MS,Nirmala UI",
        ]);
        let Commands::Docx(cmd) = cli.command else {
            panic!("expected docx subcommand");
        };
        assert_eq!(cmd.components, vec![DocxComponent::Table, DocxComponent::Shape]);
        assert_eq!(cmd.known_unicode_fonts, vec!["Arial Unicode MS", "Nirmala UI"]);
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["ttf2utf", "fonts", "--json", "-q", "--map-file", "m.json"]);
        assert!(cli.quiet);
        assert_eq!(cli.map_file, Some(PathBuf::from("m.json")));
        assert!(matches!(cli.command, Commands::Fonts(FontsCommand { json: true })));
    }
}
