mod components;
mod view;

pub use components::{render_input_line, render_parameter_row, render_selector, render_type_selector};
pub use view::{ElementView, PageView, render_page};
