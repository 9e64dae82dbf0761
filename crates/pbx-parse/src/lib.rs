//! Manifest parsing and splice writing for pbx-register
//!
//! [`ParsedDocument::parse`] turns raw manifest text into an object graph
//! plus a byte-accurate layout; staged [`Addition`]s are rendered back by
//! splicing new lines before the existing closing markers, leaving every
//! untouched byte unchanged.

pub mod document;
pub mod error;
pub mod layout;
mod parser;
pub mod text;
pub mod writer;

pub use document::ParsedDocument;
pub use error::{Error, Result};
pub use layout::{DocumentLayout, SectionKind, SectionSpan};
pub use text::{is_bare_token, quote_if_needed, unquote};
pub use writer::{Addition, apply_additions};
