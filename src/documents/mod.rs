/// Document text extraction - Gateway
mod extract;

pub use extract::{extract_document, extract_file, join_pages, DocumentKind};
