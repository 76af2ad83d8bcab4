use crate::form::ParameterSelector;

use super::{markup::escape_html, parameter::render_parameter_row};

/// Markup for a whole selector: add button plus one row per parameter.
pub fn render_selector(selector: &ParameterSelector) -> String {
    let mut out = format!(
        "<div class=\"parameterSelector\" id=\"{}\" data-param-class=\"{}\">\n",
        escape_html(selector.id()),
        selector.kind().class_name()
    );
    if let Some(label) = selector.label() {
        out.push_str(&format!("<h3>{}</h3>\n", escape_html(label)));
    }
    out.push_str("<div class=\"params\">\n");
    for index in 0..selector.rendered_rows() {
        out.push_str(&render_parameter_row(selector, index));
    }
    out.push_str("</div>\n");
    out.push_str("<button type=\"button\" class=\"addParameter\" data-action=\"add\">+</button>\n");
    out.push_str("</div>\n");
    out
}
