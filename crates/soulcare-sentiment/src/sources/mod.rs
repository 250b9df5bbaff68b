//! Record sources feeding the pipeline.

mod complaints;
mod page;

pub use complaints::records_from_complaints;
pub use page::{fetch_complaint_page, parse_complaint_page};

/// Column holding the complaint author.
pub const AUTHOR_COLUMN: &str = "Autor";
/// Column holding the complaint free text.
pub const TEXT_COLUMN: &str = "Texto";
