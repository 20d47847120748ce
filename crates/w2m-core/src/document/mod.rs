//! Labeled metadata fields in Markdown documents.
//!
//! Word exports end with a block like
//!
//! ```text
//! ---
//!
//! Topics: Analytics, Reporting
//!
//! Products: Analytics
//! ```
//!
//! A [`FieldDescriptor`] pairs an output column with a [`Selector`]: a
//! structural query over the parsed document ([`NodeQuery`]) followed by a
//! regex over each selected text node. Extraction splits the matched value
//! list on commas; updates rewrite it in the source text, keeping the label and
//! backslash-escaping the new value so it reads back unchanged.

mod batch;
mod escape;
mod field;
mod selector;
mod table;
mod tree;

pub use batch::{extract_file, extract_path, update_file, update_records, updated_path};
pub use field::FieldDescriptor;
pub use selector::{NodeQuery, Selector};
pub use table::{parse_update_table, write_table, DocumentRecord, TableFormat, UpdateRecord};
pub use tree::{Block, Document, TextNode};
