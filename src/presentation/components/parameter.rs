use crate::domain::UNGROUPED;
use crate::form::{DragSession, Edge, ParameterFields, ParameterItem, ParameterSelector};

use super::markup::{derived_id, escape_html, notice_slot};

const BORDER_STYLE: &str = "2px solid white";

/// Markup for row `index` of `selector`.
pub fn render_parameter_row(selector: &ParameterSelector, index: usize) -> String {
    let Some(item) = selector.parameters().get(index) else {
        return String::new();
    };
    let mut classes = String::from("param");
    let mut style = String::new();
    if let Some(highlight) = selector.highlight()
        && highlight.row == index
    {
        let edge = match highlight.edge {
            Edge::Top => "top",
            Edge::Bottom => "bottom",
        };
        style.push_str(&format!("border-{edge}:{BORDER_STYLE};"));
    }
    if let Some(DragSession { active, x, y, .. }) = selector.drag().copied()
        && active == index
    {
        classes.push_str(" dragging");
        style.push_str(&format!(
            "position:absolute;left:{x}px;top:calc({y}px - 2em);"
        ));
    }

    let mut out = format!(
        "<div class=\"{classes}\" data-selector=\"{}\" data-index=\"{index}\"",
        escape_html(selector.id())
    );
    if !style.is_empty() {
        out.push_str(&format!(" style=\"{style}\""));
    }
    out.push_str(">\n");
    out.push_str(
        "  <div class=\"dragger\" data-action=\"drag\"><span style=\"display:block;margin-top:55%\">&#9776;</span></div>\n",
    );
    out.push_str(&render_type_selector(selector, item));
    out.push_str(&render_inputs(selector, index, item));
    out.push_str("  <button type=\"button\" data-action=\"remove\">-</button>\n  ");
    out.push_str(&notice_slot(item.notice().map(|notice| notice.message.as_str())));
    out.push_str("\n</div>\n");
    out
}

/// Grouped type dropdown: ungrouped entries first, then one optgroup per group.
pub fn render_type_selector(selector: &ParameterSelector, item: &ParameterItem) -> String {
    let option = |descriptor: &str, name: &str| {
        let selected = if item.type_descriptor() == descriptor {
            " selected"
        } else {
            ""
        };
        format!(
            "<option value=\"{}\"{selected}>{}</option>\n",
            escape_html(descriptor),
            escape_html(name)
        )
    };

    let mut out = String::from("  <select data-action=\"set-type\">\n");
    for (group, entries) in selector
        .catalog()
        .presented_groups(selector.include_primitives())
    {
        if group == UNGROUPED {
            for entry in entries {
                out.push_str(&option(&entry.descriptor, &entry.name));
            }
            continue;
        }
        out.push_str(&format!("<optgroup label=\"{}\">\n", escape_html(group)));
        for entry in entries {
            out.push_str(&option(&entry.descriptor, &entry.name));
        }
        out.push_str("</optgroup>\n");
    }
    out.push_str("</select>\n");
    out
}

fn render_inputs(selector: &ParameterSelector, index: usize, item: &ParameterItem) -> String {
    match item.fields() {
        ParameterFields::Hardware { name, doc } => format!(
            concat!(
                "  <div class=\"input\">\n",
                "    <input class=\"argName\" placeholder=\"name\" type=\"text\" value=\"{name}\" data-property=\"name\" /><br/>\n",
                "    <input style=\"margin-top:5px\" class=\"argDoc\" placeholder=\"Javadoc\" type=\"text\" value=\"{doc}\" data-property=\"doc\" />\n",
                "  </div>\n"
            ),
            name = escape_html(name),
            doc = escape_html(doc),
        ),
        ParameterFields::Subsystem {
            name,
            required,
            doc,
        } => {
            let check_id = derived_id(selector.id(), &[&index.to_string(), "required"]);
            let checked = if *required { " checked" } else { "" };
            format!(
                concat!(
                    "  <div class=\"input\">\n",
                    "    <div style=\"display:table;width:-webkit-fill-available\">\n",
                    "      <input style=\"display:table-cell;width:100%\" class=\"paramName\" placeholder=\"name\" type=\"text\" value=\"{name}\" data-property=\"name\" />\n",
                    "      <div style=\"display:table-cell;width:1px;padding-left:1em;user-select:none\"><nobr>\n",
                    "        <input type=\"checkbox\" id=\"{check_id}\" data-property=\"required\"{checked} />\n",
                    "        <label for=\"{check_id}\">Required</label>\n",
                    "      </nobr></div>\n",
                    "    </div>\n",
                    "    <input style=\"margin-top:5px\" class=\"argDoc\" placeholder=\"Javadoc\" type=\"text\" value=\"{doc}\" data-property=\"doc\" />\n",
                    "  </div>\n"
                ),
                name = escape_html(name),
                doc = escape_html(doc),
                check_id = check_id,
                checked = checked,
            )
        }
    }
}
