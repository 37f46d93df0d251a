//! PDF word-layout backend for slide outline extraction.
//!
//! Runs poppler's `pdftotext -bbox` and reads the word boxes it prints.

pub mod parser;
pub mod pdftotext;

pub use parser::parse_bbox_xml;
pub use pdftotext::PdftotextSource;
