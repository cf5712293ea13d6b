//! SEO and accessibility fixes applied at the tag level.

use std::path::Path;

use crate::core::markup::{
    Edit, Token, apply_edits, escape_attr, escape_text, inner_html, matching_end, plain_text,
    strip_tags, tokenize,
};

pub const VIEWPORT_CONTENT: &str = "width=device-width, initial-scale=1.0";

#[derive(Debug, Clone)]
pub struct EnhanceOptions<'a> {
    /// Value for a missing `<html lang>`.
    pub lang: &'a str,
    /// Suffix for generated titles.
    pub site_name: &'a str,
    /// File stem of the page, used when nothing better names it.
    pub file_stem: &'a str,
}

/// Fix kinds reported back for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fix {
    Lang,
    Title,
    Viewport,
    Heading,
    ImageAlt,
    LinkRel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enhanced {
    pub html: String,
    pub fixes: Vec<Fix>,
}

/// `"about-us"` -> `"About Us"`.
pub fn title_from_stem(stem: &str) -> String {
    stem.replace(['-', '_'], " ")
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

fn src_stem(src: &str) -> &str {
    let path = src.split(['?', '#']).next().unwrap_or("");
    Path::new(path)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("")
}

fn position_of(tokens: &[Token], name: &str) -> Option<usize> {
    tokens
        .iter()
        .position(|token| token.as_start().is_some_and(|tag| tag.name == name))
}

/// Apply every missing fix. `None` when the page already satisfies all of them.
pub fn enhance(html: &str, options: &EnhanceOptions<'_>) -> Option<Enhanced> {
    let tokens = tokenize(html);
    let mut edits = Vec::new();
    let mut fixes = Vec::new();

    if let Some(index) = position_of(&tokens, "html") {
        let mut tag = tokens[index].as_start()?.clone();
        if tag.attr("lang").is_none_or(|lang| lang.trim().is_empty()) {
            tag.set_attr("lang", options.lang);
            edits.push(Edit::replace(tag.span.clone(), tag.render()));
            fixes.push(Fix::Lang);
        }
    }

    let h1 = position_of(&tokens, "h1");
    let fallback_title = match h1.and_then(|index| plain_text(html, &tokens, index)) {
        Some(text) => text,
        None => escape_text(&title_from_stem(options.file_stem)),
    };

    let head = position_of(&tokens, "head");
    let mut existing_title = None;
    if let Some(head_index) = head {
        let head_end = matching_end(&tokens, head_index);
        let in_head = &tokens[head_index + 1..head_end.unwrap_or(tokens.len())];
        let title = in_head
            .iter()
            .position(|token| token.as_start().is_some_and(|tag| tag.name == "title"));
        let has_viewport = in_head.iter().any(|token| {
            token.as_start().is_some_and(|tag| {
                tag.name == "meta"
                    && tag
                        .attr("name")
                        .is_some_and(|name| name.eq_ignore_ascii_case("viewport"))
            })
        });

        if let Some(offset) = title {
            existing_title = inner_html(html, &tokens, head_index + 1 + offset)
                .map(strip_tags)
                .filter(|text| !text.is_empty());
        }

        let mut insertion = String::new();
        if title.is_none() {
            insertion.push_str(&format!(
                "    <title>{} — {}</title>\n",
                fallback_title,
                escape_text(options.site_name)
            ));
            fixes.push(Fix::Title);
        }
        if !has_viewport {
            insertion.push_str(&format!(
                "    <meta name=\"viewport\" content=\"{VIEWPORT_CONTENT}\">\n"
            ));
            fixes.push(Fix::Viewport);
        }
        if !insertion.is_empty() {
            let at = match head_end {
                Some(end) => tokens[end].span().start,
                None => {
                    insertion.insert(0, '\n');
                    insertion.pop();
                    tokens[head_index].span().end
                }
            };
            edits.push(Edit::insert(at, insertion));
        }
    }

    if h1.is_none()
        && let Some(body) = position_of(&tokens, "body")
    {
        let text = existing_title.unwrap_or_else(|| fallback_title.clone());
        edits.push(Edit::insert(
            tokens[body].span().end,
            format!("\n<h1>{text}</h1>"),
        ));
        fixes.push(Fix::Heading);
    }

    for token in &tokens {
        let Some(tag) = token.as_start() else {
            continue;
        };
        match tag.name.as_str() {
            "img" => {
                if tag.attr("alt").is_some_and(|alt| !alt.trim().is_empty()) {
                    continue;
                }
                let alt = title_from_stem(src_stem(tag.attr("src").unwrap_or("")));
                if alt.is_empty() {
                    continue;
                }
                let mut updated = tag.clone();
                updated.set_attr("alt", &escape_attr(&alt));
                edits.push(Edit::replace(tag.span.clone(), updated.render()));
                if !fixes.contains(&Fix::ImageAlt) {
                    fixes.push(Fix::ImageAlt);
                }
            }
            "a" if tag.attr("target") == Some("_blank") => {
                let rel = tag.attr("rel").unwrap_or("");
                if rel.contains("noopener") && rel.contains("noreferrer") {
                    continue;
                }
                let mut updated = tag.clone();
                updated.set_attr("rel", format!("{rel} noopener noreferrer").trim());
                edits.push(Edit::replace(tag.span.clone(), updated.render()));
                if !fixes.contains(&Fix::LinkRel) {
                    fixes.push(Fix::LinkRel);
                }
            }
            _ => {}
        }
    }

    if edits.is_empty() {
        return None;
    }
    Some(Enhanced {
        html: apply_edits(html, edits),
        fixes,
    })
}
