//! I/O module
//!
//! Handles the text formats clients are exported to and imported from.
//!
//! # Components
//!
//! - `text_format` - Structured report with labeled paragraphs
//! - `csv_format` - Semicolon-separated tabular format
//! - `importer` - Heuristic import of either format, or of free text

pub mod csv_format;
pub mod importer;
pub mod text_format;

pub use csv_format::{read_tabular, write_tabular, TabularRow};
pub use importer::{parse_text, ClientCandidate, ImportSummary};
pub use text_format::{format_amount, format_client, format_stats, write_structured};
