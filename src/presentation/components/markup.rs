use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};

pub(crate) fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Element id derived from a component id, safe to use in `id`/`for` attributes.
pub(crate) fn derived_id(owner: &str, parts: &[&str]) -> String {
    let mut id = utf8_percent_encode(owner, NON_ALPHANUMERIC).to_string();
    for part in parts {
        id.push('-');
        id.push_str(&utf8_percent_encode(part, NON_ALPHANUMERIC).to_string());
    }
    id
}

pub(crate) fn notice_slot(message: Option<&str>) -> String {
    match message {
        Some(message) => format!(
            "<div class=\"notif\">&#9888; <span class=\"msg\">{}</span></div>",
            escape_html(message)
        ),
        None => "<div class=\"notif\" hidden>&#9888; <span class=\"msg\"></span></div>".to_string(),
    }
}
