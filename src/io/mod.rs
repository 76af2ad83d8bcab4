mod format;
mod input;
mod output;

pub use format::DocumentFormat;
pub use input::{page_from_value, parse_config_str, parse_document_str, parse_page_str};
pub use output::{OutputDestination, OutputOptions, emit, serialize_value};
