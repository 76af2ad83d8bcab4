use crate::form::{InputLine, ParameterSelector};

use super::components::{escape_html, render_input_line, render_selector};

/// What the page renderer needs, in document order.
pub struct PageView<'a> {
    pub title: Option<&'a str>,
    pub elements: Vec<ElementView<'a>>,
}

pub enum ElementView<'a> {
    InputLine(&'a InputLine),
    Selector(&'a ParameterSelector),
}

pub fn render_page(view: &PageView<'_>) -> String {
    let mut out = String::from("<form class=\"wizard\">\n");
    if let Some(title) = view.title {
        out.push_str(&format!("<h1>{}</h1>\n", escape_html(title)));
    }
    for element in &view.elements {
        match element {
            ElementView::InputLine(line) => out.push_str(&render_input_line(line)),
            ElementView::Selector(selector) => out.push_str(&render_selector(selector)),
        }
    }
    out.push_str("</form>\n");
    out
}
