mod input_line;
mod markup;
mod parameter;
mod selector;

pub use input_line::render_input_line;
pub use parameter::{render_parameter_row, render_type_selector};
pub use selector::render_selector;

pub(crate) use markup::escape_html;
