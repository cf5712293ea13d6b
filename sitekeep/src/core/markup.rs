//! Minimal tag scanner for in-place markup edits.
//!
//! DOM queries go through `scraper`; this module exists for edits, where the
//! untouched parts of a page must stay byte-identical. It tokenizes start and
//! end tags with their byte spans, skips comments and raw-text elements, and
//! applies span-based edits.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

static START_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"\A<([A-Za-z][A-Za-z0-9:-]*)((?:\s+[^\s"'>/=]+(?:\s*=\s*(?:"[^"]*"|'[^']*'|[^\s"'=<>`]+))?)*)\s*(/?)>"#,
    )
    .expect("valid start tag regex")
});

static END_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\A</([A-Za-z][A-Za-z0-9:-]*)\s*>").expect("valid end tag regex")
});

static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([^\s"'>/=]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#)
        .expect("valid attribute regex")
});

static TAG_STRIP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid tag strip regex"));

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "textarea"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attr {
    pub name: String,
    /// Raw (still entity-encoded) value; `None` for boolean attributes.
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartTag {
    /// Lowercased element name.
    pub name: String,
    raw_name: String,
    pub attrs: Vec<Attr>,
    pub self_closing: bool,
    pub span: Range<usize>,
}

impl StartTag {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_ascii_lowercase(),
            raw_name: name.to_string(),
            attrs: Vec::new(),
            self_closing: false,
            span: 0..0,
        }
    }

    /// Attribute value; boolean attributes yield `Some("")`.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|attr| attr.name.eq_ignore_ascii_case(name))
            .map(|attr| attr.value.as_deref().unwrap_or(""))
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    pub fn set_attr(&mut self, name: &str, value: &str) {
        match self
            .attrs
            .iter_mut()
            .find(|attr| attr.name.eq_ignore_ascii_case(name))
        {
            Some(attr) => attr.value = Some(value.to_string()),
            None => self.attrs.push(Attr {
                name: name.to_string(),
                value: Some(value.to_string()),
            }),
        }
    }

    pub fn remove_attr(&mut self, name: &str) {
        self.attrs.retain(|attr| !attr.name.eq_ignore_ascii_case(name));
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or("").split_whitespace()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }

    pub fn class_contains(&self, needle: &str) -> bool {
        self.classes().any(|c| c.contains(needle))
    }

    pub fn is_void(&self) -> bool {
        self.self_closing || VOID_ELEMENTS.contains(&self.name.as_str())
    }

    /// Render with a different element name, keeping attributes.
    pub fn render_as(&self, name: &str) -> String {
        let mut out = format!("<{name}");
        for attr in &self.attrs {
            out.push(' ');
            out.push_str(&attr.name);
            if let Some(value) = &attr.value {
                if value.contains('"') {
                    out.push_str(&format!("='{value}'"));
                } else {
                    out.push_str(&format!("=\"{value}\""));
                }
            }
        }
        if self.self_closing {
            out.push_str(" /");
        }
        out.push('>');
        out
    }

    pub fn render(&self) -> String {
        self.render_as(&self.raw_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Start(StartTag),
    End { name: String, span: Range<usize> },
}

impl Token {
    pub fn span(&self) -> &Range<usize> {
        match self {
            Token::Start(tag) => &tag.span,
            Token::End { span, .. } => span,
        }
    }

    pub fn as_start(&self) -> Option<&StartTag> {
        match self {
            Token::Start(tag) => Some(tag),
            Token::End { .. } => None,
        }
    }

    pub fn is_end_of(&self, name: &str) -> bool {
        matches!(self, Token::End { name: end, .. } if end == name)
    }
}

fn parse_attrs(raw: &str) -> Vec<Attr> {
    ATTR_RE
        .captures_iter(raw)
        .map(|caps| Attr {
            name: caps[1].to_string(),
            value: caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map(|m| m.as_str().to_string()),
        })
        .collect()
}

fn find_ignore_case(haystack: &str, needle: &str) -> Option<usize> {
    haystack.to_ascii_lowercase().find(needle)
}

/// Tokenize start and end tags of `html` in document order.
pub fn tokenize(html: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut pos = 0;
    while let Some(offset) = html[pos..].find('<') {
        let at = pos + offset;
        let rest = &html[at..];

        if rest.starts_with("<!--") {
            pos = rest.find("-->").map_or(html.len(), |end| at + end + 3);
            continue;
        }

        if let Some(caps) = END_RE.captures(rest) {
            let len = caps[0].len();
            tokens.push(Token::End {
                name: caps[1].to_ascii_lowercase(),
                span: at..at + len,
            });
            pos = at + len;
            continue;
        }

        if let Some(caps) = START_RE.captures(rest) {
            let len = caps[0].len();
            let raw_name = caps[1].to_string();
            let tag = StartTag {
                name: raw_name.to_ascii_lowercase(),
                raw_name,
                attrs: parse_attrs(caps.get(2).map_or("", |m| m.as_str())),
                self_closing: &caps[3] == "/",
                span: at..at + len,
            };
            pos = at + len;
            if RAW_TEXT_ELEMENTS.contains(&tag.name.as_str()) && !tag.self_closing {
                let close = format!("</{}", tag.name);
                pos = find_ignore_case(&html[pos..], &close).map_or(html.len(), |idx| pos + idx);
            }
            tokens.push(Token::Start(tag));
            continue;
        }

        pos = at + 1;
    }
    tokens
}

/// Index of the end token closing the start token at `open`, nesting-aware.
pub fn matching_end(tokens: &[Token], open: usize) -> Option<usize> {
    let tag = tokens.get(open)?.as_start()?;
    if tag.is_void() {
        return None;
    }
    let mut depth = 0usize;
    for (index, token) in tokens.iter().enumerate().skip(open + 1) {
        match token {
            Token::Start(inner) if inner.name == tag.name && !inner.is_void() => depth += 1,
            Token::End { name, .. } if *name == tag.name => {
                if depth == 0 {
                    return Some(index);
                }
                depth -= 1;
            }
            _ => {}
        }
    }
    None
}

/// Parent start-token index for every token (`None` at the top level).
///
/// Unclosed elements are popped when an ancestor's end tag is seen.
pub fn parents(tokens: &[Token]) -> Vec<Option<usize>> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut stack: Vec<usize> = Vec::new();
    for (index, token) in tokens.iter().enumerate() {
        out.push(stack.last().copied());
        match token {
            Token::Start(tag) if !tag.is_void() => stack.push(index),
            Token::Start(_) => {}
            Token::End { name, .. } => {
                let open = stack.iter().rposition(|&i| {
                    tokens[i].as_start().is_some_and(|tag| &tag.name == name)
                });
                if let Some(position) = open {
                    stack.truncate(position);
                }
            }
        }
    }
    out
}

/// Ancestor start-token indices of `index`, nearest first.
pub fn ancestors(parents: &[Option<usize>], index: usize) -> impl Iterator<Item = usize> + '_ {
    std::iter::successors(parents.get(index).copied().flatten(), move |&i| {
        parents.get(i).copied().flatten()
    })
}

/// Raw markup between a start token and its end token.
pub fn inner_html<'a>(html: &'a str, tokens: &[Token], open: usize) -> Option<&'a str> {
    let close = matching_end(tokens, open)?;
    Some(&html[tokens[open].span().end..tokens[close].span().start])
}

/// Text of an element that holds no child elements, whitespace collapsed
/// the same way as [`strip_tags`].
pub fn plain_text(html: &str, tokens: &[Token], open: usize) -> Option<String> {
    let inner = inner_html(html, tokens, open)?;
    if inner.contains('<') {
        return None;
    }
    let text = strip_tags(inner);
    (!text.is_empty()).then_some(text)
}

/// Text content with tags removed and whitespace collapsed (entities kept raw).
pub fn strip_tags(fragment: &str) -> String {
    TAG_STRIP_RE
        .replace_all(fragment, " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// A replacement of `span` (possibly empty, i.e. an insertion) with `text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub span: Range<usize>,
    pub text: String,
}

impl Edit {
    pub fn replace(span: Range<usize>, text: impl Into<String>) -> Self {
        Self {
            span,
            text: text.into(),
        }
    }

    pub fn insert(at: usize, text: impl Into<String>) -> Self {
        Self {
            span: at..at,
            text: text.into(),
        }
    }
}

/// Apply non-overlapping edits. Overlapping edits after the first are dropped.
pub fn apply_edits(html: &str, mut edits: Vec<Edit>) -> String {
    edits.sort_by_key(|edit| (edit.span.start, edit.span.end));
    let mut out = String::with_capacity(html.len());
    let mut cursor = 0;
    for edit in edits {
        if edit.span.start < cursor {
            continue;
        }
        out.push_str(&html[cursor..edit.span.start]);
        out.push_str(&edit.text);
        cursor = edit.span.end;
    }
    out.push_str(&html[cursor..]);
    out
}

/// Escape text for use inside element content.
pub fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escape text for use inside a double-quoted attribute.
pub fn escape_attr(text: &str) -> String {
    escape_text(text).replace('"', "&quot;")
}
