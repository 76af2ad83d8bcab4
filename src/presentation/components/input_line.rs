use crate::form::InputLine;

use super::markup::{derived_id, escape_html, notice_slot};

pub fn render_input_line(line: &InputLine) -> String {
    let mut out = String::from("<div class=\"inputContainer\">\n");
    if let Some(label) = line.label() {
        out.push_str(&format!(
            "<label for=\"{}\">{}</label>\n",
            derived_id(line.id(), &[]),
            escape_html(label)
        ));
    }
    out.push_str(&format!(
        "<input class=\"inputLine\" id=\"{}\" data-input=\"{}\" type=\"text\" value=\"{}\"",
        derived_id(line.id(), &[]),
        escape_html(line.id()),
        escape_html(line.value())
    ));
    if let Some(placeholder) = line.placeholder() {
        out.push_str(&format!(" placeholder=\"{}\"", escape_html(placeholder)));
    }
    out.push_str(" />\n");
    out.push_str(&notice_slot(
        line.validator().notice().map(|notice| notice.message.as_str()),
    ));
    out.push_str("\n</div>\n");
    out
}
