// ttf2utf/src/lib.rs
//! # ttf2utf command-line application
//!
//! Front end over `ttf2utf-core`: argument parsing, file handlers for plain
//! text and `.docx` documents, and themed terminal output.

pub mod cli;
pub mod commands;
pub mod exit;
pub mod handlers;
pub mod logger;
pub mod ui;
pub mod utils;

pub use handlers::{DocumentHandler, DocxComponent, DocxHandler, DocxOptions, MappingRequest, TxtHandler};
