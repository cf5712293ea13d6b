//! Blog index "read more" links and post previous/next navigation.

use std::collections::BTreeMap;
use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use crate::core::markup::{
    Edit, Token, apply_edits, inner_html, matching_end, plain_text, strip_tags, tokenize,
};

static POST_FILE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^post-(\d+)\.html$").expect("valid post file regex"));

/// Post number of a `post-N.html` file name.
pub fn post_number(file_name: &str) -> Option<u32> {
    POST_FILE_RE
        .captures(file_name)
        .and_then(|caps| caps[1].parse().ok())
}

/// Text of the first `<h1>`, when it is plain text.
pub fn post_title(html: &str) -> Option<String> {
    let tokens = tokenize(html);
    let h1 = tokens
        .iter()
        .position(|token| token.as_start().is_some_and(|tag| tag.name == "h1"))?;
    plain_text(html, &tokens, h1)
}

/// Token index range `[open, close]` of every element carrying `class`.
fn elements_with_class(tokens: &[Token], class: &str) -> Vec<Range<usize>> {
    tokens
        .iter()
        .enumerate()
        .filter(|(_, token)| token.as_start().is_some_and(|tag| tag.has_class(class)))
        .filter_map(|(index, _)| matching_end(tokens, index).map(|close| index..close))
        .collect()
}

fn first_with_class(tokens: &[Token], within: &Range<usize>, class: &str) -> Option<usize> {
    (within.start + 1..within.end)
        .find(|&index| tokens[index].as_start().is_some_and(|tag| tag.has_class(class)))
}

fn set_href(tokens: &[Token], index: usize, href: &str) -> Option<Edit> {
    let tag = tokens[index].as_start()?;
    if tag.attr("href") == Some(href) {
        return None;
    }
    let mut updated = tag.clone();
    updated.set_attr("href", href);
    Some(Edit::replace(tag.span.clone(), updated.render()))
}

/// Point each article card's `a.read-more` at the post whose title matches
/// the card's `.article-title`. `titles` maps post titles to file names.
pub fn link_read_more(index_html: &str, titles: &BTreeMap<String, String>) -> Option<String> {
    let tokens = tokenize(index_html);
    let mut cards = elements_with_class(&tokens, "article-card");
    cards.extend(elements_with_class(&tokens, "featured-article").into_iter().take(1));

    let mut edits = Vec::new();
    for card in &cards {
        let Some(title) = first_with_class(&tokens, card, "article-title") else {
            continue;
        };
        let text = inner_html(index_html, &tokens, title)
            .map(strip_tags)
            .unwrap_or_default();
        let Some(file) = titles.get(&text) else {
            continue;
        };
        let link = (card.start + 1..card.end).find(|&index| {
            tokens[index]
                .as_start()
                .is_some_and(|tag| tag.name == "a" && tag.has_class("read-more"))
        });
        if let Some(edit) = link.and_then(|index| set_href(&tokens, index, file)) {
            edits.push(edit);
        }
    }

    (!edits.is_empty()).then(|| apply_edits(index_html, edits))
}

/// Point the first `a.nav-link` of `.post-navigation` at `prev` and the last
/// (when there are several) at `next`, defaulting to the blog index.
pub fn link_neighbors(post_html: &str, prev: Option<&str>, next: Option<&str>) -> Option<String> {
    let tokens = tokenize(post_html);
    let nav = elements_with_class(&tokens, "post-navigation")
        .into_iter()
        .next()?;
    let links: Vec<usize> = (nav.start + 1..nav.end)
        .filter(|&index| {
            tokens[index]
                .as_start()
                .is_some_and(|tag| tag.name == "a" && tag.has_class("nav-link"))
        })
        .collect();

    let mut edits = Vec::new();
    if let Some(&first) = links.first() {
        edits.extend(set_href(&tokens, first, prev.unwrap_or("index.html")));
    }
    if links.len() > 1
        && let Some(&last) = links.last()
    {
        edits.extend(set_href(&tokens, last, next.unwrap_or("index.html")));
    }

    (!edits.is_empty()).then(|| apply_edits(post_html, edits))
}

#[cfg(test)]
mod tests {
    use super::*;

    const INDEX: &str = r##"<section>
<div class="featured-article"><h2 class="article-title">First Light</h2><a class="read-more" href="#">Read</a></div>
<div class="article-card"><h3 class="article-title"> Second <em>Dawn</em> </h3><a class="read-more" href="post-9.html">Read</a></div>
<div class="article-card"><h3 class="article-title">Unknown</h3><a class="read-more" href="#">Read</a></div>
</section>"##;

    fn titles() -> BTreeMap<String, String> {
        BTreeMap::from([
            ("First Light".to_string(), "post-1.html".to_string()),
            ("Second Dawn".to_string(), "post-2.html".to_string()),
        ])
    }

    #[test]
    fn post_number_parses_file_names() {
        assert_eq!(post_number("post-12.html"), Some(12));
        assert_eq!(post_number("post-.html"), None);
        assert_eq!(post_number("blog-post-1.html"), None);
    }

    #[test]
    fn post_title_requires_plain_h1() {
        assert_eq!(
            post_title("<body><h1> First Light </h1></body>"),
            Some("First Light".to_string())
        );
        assert_eq!(post_title("<h1><span>x</span></h1>"), None);
        assert_eq!(post_title("<p>none</p>"), None);
    }

    #[test]
    fn read_more_links_follow_titles() {
        let out = link_read_more(INDEX, &titles()).expect("changed");
        assert!(out.contains(r#"<a class="read-more" href="post-1.html">"#));
        assert!(out.contains(r#"<a class="read-more" href="post-2.html">"#));
        assert!(out.contains("Unknown</h3><a class=\"read-more\" href=\"#\">"));
        assert_eq!(link_read_more(&out, &titles()), None);
    }

    #[test]
    fn wrapped_titles_match_their_cards() {
        let post = "<main><h1>First\n    Light</h1></main>";
        let title = post_title(post).expect("title");
        assert_eq!(title, "First Light");

        let index = "<div class=\"article-card\"><h3 class=\"article-title\">First\n      Light</h3><a class=\"read-more\" href=\"#\">Read</a></div>";
        let titles = BTreeMap::from([(title, "post-1.html".to_string())]);
        let out = link_read_more(index, &titles).expect("changed");
        assert!(out.contains(r#"<a class="read-more" href="post-1.html">"#));
    }

    #[test]
    fn neighbors_default_to_index() {
        let post = r##"<nav class="post-navigation"><a class="nav-link" href="#">Prev</a><a class="nav-link" href="#">Next</a></nav>"##;
        let first = link_neighbors(post, None, Some("post-2.html")).expect("changed");
        assert_eq!(
            first,
            r#"<nav class="post-navigation"><a class="nav-link" href="index.html">Prev</a><a class="nav-link" href="post-2.html">Next</a></nav>"#
        );
        assert_eq!(link_neighbors(&first, None, Some("post-2.html")), None);
    }

    #[test]
    fn single_nav_link_is_previous_only() {
        let post = r##"<div class="post-navigation"><a class="nav-link" href="#">Back</a></div>"##;
        let out = link_neighbors(post, Some("post-3.html"), Some("post-5.html")).expect("changed");
        assert!(out.contains(r#"href="post-3.html""#));
        assert!(!out.contains("post-5.html"));
        assert_eq!(link_neighbors("<p></p>", None, None), None);
    }
}
