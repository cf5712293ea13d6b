//! `href="#"` anchors acting as UI controls, converted to buttons.

use crate::core::markup::{
    Edit, StartTag, apply_edits, inner_html, matching_end, parents, strip_tags, tokenize,
};

/// Attributes that have no meaning on `<button>`.
const ANCHOR_ONLY_ATTRS: &[&str] = &["href", "target", "rel", "download", "hreflang", "ping"];

const CONTROL_CLASS_HINTS: &[&str] = &[
    "dropdown-toggle",
    "mobile-menu-toggle",
    "cookie-preferences",
    "modal-close",
    "btn",
];

/// Whether an `href="#"` anchor is a control rather than a link.
pub fn is_control(anchor: &StartTag, text: &str, parent: Option<&StartTag>) -> bool {
    let onclick = anchor.has_attr("onclick");
    onclick
        || anchor.has_attr("aria-controls")
        || CONTROL_CLASS_HINTS
            .iter()
            .any(|hint| anchor.class_contains(hint))
        || (anchor.class_contains("nav-link") && !onclick)
        || (!text.is_empty() && text.chars().all(|c| c.is_ascii_digit()))
        || parent.is_some_and(|tag| tag.class_contains("pagination"))
}

/// Convert control anchors to `<button type="button">`, keeping inner markup.
///
/// Returns the new page and the number of converted anchors, or `None`
/// when nothing qualified.
pub fn convert(html: &str) -> Option<(String, usize)> {
    let tokens = tokenize(html);
    let parents = parents(&tokens);
    let mut edits = Vec::new();
    let mut converted = 0;

    for (index, token) in tokens.iter().enumerate() {
        let Some(anchor) = token.as_start() else {
            continue;
        };
        if anchor.name != "a" || anchor.attr("href").map(str::trim) != Some("#") {
            continue;
        }
        let Some(close) = matching_end(&tokens, index) else {
            continue;
        };
        let text = inner_html(html, &tokens, index)
            .map(strip_tags)
            .unwrap_or_default();
        let parent = parents[index].and_then(|p| tokens[p].as_start());
        if !is_control(anchor, &text, parent) {
            continue;
        }

        let mut button = anchor.clone();
        for attr in ANCHOR_ONLY_ATTRS {
            button.remove_attr(attr);
        }
        button.set_attr("type", "button");
        edits.push(Edit::replace(anchor.span.clone(), button.render_as("button")));
        edits.push(Edit::replace(tokens[close].span().clone(), "</button>"));
        converted += 1;
    }

    (converted > 0).then(|| (apply_edits(html, edits), converted))
}
