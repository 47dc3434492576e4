//! Product listings embedded in assistant chat messages.
//!
//! Scans message text line by line, resolves numbered product announcements
//! into [`ProductRecord`]s and splits the surrounding prose into a
//! [`ParsedMessage`]. [`carousel::SlideIndex`] drives one-at-a-time display.

pub mod carousel;
pub mod db;
pub mod model;
pub mod parser;
pub mod render;
pub mod settings;

pub use model::{ExtractedMessage, ParsedMessage, ProductRecord, RawMessage, Role};
pub use parser::grammar::Grammar;
pub use parser::{extract_products, process_message};
