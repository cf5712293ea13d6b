//! Ordered replacement tables.
//!
//! Rules run left to right over the whole text; a later rule sees the output
//! of every earlier one.

use std::borrow::Cow;

use anyhow::{Context, Result};
use regex::Regex;

#[derive(Debug, Clone)]
pub enum Pattern {
    Literal(String),
    Regex(Regex),
}

#[derive(Debug, Clone)]
pub struct Rule {
    pub pattern: Pattern,
    /// Replacement text. For regex rules `$1`/`${name}` expand capture groups.
    pub replacement: String,
}

impl Rule {
    pub fn literal(pattern: &str, replacement: &str) -> Self {
        Self {
            pattern: Pattern::Literal(pattern.to_string()),
            replacement: replacement.to_string(),
        }
    }

    pub fn regex(pattern: &str, replacement: &str) -> Result<Self> {
        let compiled =
            Regex::new(pattern).with_context(|| format!("compile rule pattern '{pattern}'"))?;
        Ok(Self {
            pattern: Pattern::Regex(compiled),
            replacement: replacement.to_string(),
        })
    }

    pub fn apply<'a>(&self, text: &'a str) -> Cow<'a, str> {
        match &self.pattern {
            Pattern::Literal(needle) => {
                if needle.is_empty() || !text.contains(needle.as_str()) {
                    Cow::Borrowed(text)
                } else {
                    Cow::Owned(text.replace(needle.as_str(), &self.replacement))
                }
            }
            Pattern::Regex(re) => re.replace_all(text, self.replacement.as_str()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn extend(&mut self, rules: impl IntoIterator<Item = Rule>) {
        self.rules.extend(rules);
    }

    pub fn apply(&self, text: &str) -> String {
        let mut current = text.to_string();
        for rule in &self.rules {
            if let Cow::Owned(next) = rule.apply(&current) {
                current = next;
            }
        }
        current
    }
}

enum Kind {
    Literal,
    Regex,
}

/// Known broken paths, renamed assets and placeholder links of the site.
const DEFAULT_TABLE: &[(Kind, &str, &str)] = &[
    (Kind::Regex, r"javascript:void\(0\);?", "#"),
    // books
    (Kind::Literal, r#"href="books.html""#, r#"href="/pages/books/books.html""#),
    (Kind::Literal, r#"href="books-online.html""#, r#"href="/pages/books/books-online.html""#),
    (Kind::Literal, r#"href="audio-books.html""#, r#"href="/pages/books/audio-books.html""#),
    (Kind::Literal, r#"href="../books.html""#, r#"href="/pages/books/books.html""#),
    (Kind::Literal, r#"href='../books.html'"#, r#"href='/pages/books/books.html'"#),
    (Kind::Literal, r#"href="./books.html""#, r#"href="/pages/books/books.html""#),
    (Kind::Literal, r#"href="../books/books.html""#, r#"href="/pages/books/books.html""#),
    (Kind::Literal, r#"href="../books/books-online.html""#, r#"href="/pages/books/books-online.html""#),
    (Kind::Literal, r#"href="../books/audio-books.html""#, r#"href="/pages/books/audio-books.html""#),
    // contact
    (Kind::Literal, r#"href="contact-us.html""#, r#"href="/pages/contact/contact-us.html""#),
    (Kind::Literal, r#"href="../contact/index.html""#, r#"href="/pages/contact/index.html""#),
    (Kind::Literal, r#"href="../contact/speaking-request.html""#, r#"href="/pages/contact/speaking-request.html""#),
    (Kind::Literal, r#"href="../contact/privacy-policy.html""#, r#"href="/pages/contact/privacy-policy.html""#),
    // about
    (Kind::Literal, r#"href="about-us.html""#, r#"href="/pages/about/about-us.html""#),
    (Kind::Literal, r#"href="assimagbe-albert-raphael.html""#, r#"href="/pages/about/assimagbe-albert-raphael.html""#),
    // blog
    (Kind::Literal, r#"href="blog-template.html""#, r#"href="/pages/blog/blog-template.html""#),
    (Kind::Literal, r#"href="categories.html""#, r#"href="/pages/blog/categories.html""#),
    (Kind::Regex, r#"href="post-(\d+)\.html""#, r#"href="/pages/blog/post-${1}.html""#),
    (Kind::Regex, r#"href="blog-post-(\d+)\.html""#, r#"href="/pages/blog/post-${1}.html""#),
    (Kind::Literal, r#"href="/pages/blog/post-.html""#, r##"href="#""##),
    (Kind::Literal, r#"href="previous-post.html""#, r#"href="index.html""#),
    (Kind::Literal, r#"href="next-post.html""#, r#"href="index.html""#),
    (Kind::Literal, r#"href='../blog/previous-post.html'"#, r#"href="../blog/index.html""#),
    // profile
    (Kind::Literal, r#"href="../profile/index.html""#, r#"href="/pages/profile/index.html""#),
    (Kind::Literal, r#"href="../profile/subscription.html""#, r#"href="/pages/profile/subscription.html""#),
    (Kind::Literal, r#"href="../profile/library.html""#, r#"href="/pages/profile/library.html""#),
    // home
    (Kind::Literal, r#"href="../../index.html""#, r#"href="/index.html""#),
    // scripts
    (Kind::Regex, r#"src="(?:\.\./)*(?:\./)?js/main\.js""#, r#"src="/js/scripts.js""#),
    (Kind::Regex, r#"src="(?:\.\./)+js/(cookies|auth)\.js""#, r#"src="/js/${1}.js""#),
    // images
    (Kind::Literal, "assets/images/blog-1.jpg", "assets/images/blog-post-1.png"),
    (Kind::Literal, "assets/images/blog-2.jpg", "assets/images/blog-post-2.jpg"),
    (Kind::Literal, "assets/images/blog-3.jpg", "assets/images/blog-post-3.jpg"),
    (Kind::Literal, "assets/images/blog-4.jpg", "assets/images/blog-post-4.jpg"),
    (Kind::Literal, "assets/images/blog-5.jpg", "assets/images/blog-post-5.jpg"),
    (Kind::Literal, "assets/images/blog-6.jpg", "assets/images/blog-post-6.jpg"),
    (Kind::Literal, "assets/images/blog-featured.jpg", "assets/images/blog-post-1.png"),
    (Kind::Literal, "assets/images/blog-image.jpg", "assets/images/blog-post-1.png"),
    (Kind::Literal, r#"assets/images/blank""#, r#"assets/images/quote-1.png""#),
    (Kind::Literal, "assets/images/author-raphael.jpg", "assets/images/raphael.png"),
    // renamed post files referenced from scripts and styles
    (Kind::Regex, r"blog-post-(\d+)\.html", "post-${1}.html"),
    (Kind::Literal, "divine-Jurisprudence", "divine-jurisprudence"),
];

/// Compile the built-in table.
pub fn default_rules() -> Result<Vec<Rule>> {
    DEFAULT_TABLE
        .iter()
        .map(|(kind, pattern, replacement)| match kind {
            Kind::Literal => Ok(Rule::literal(pattern, replacement)),
            Kind::Regex => Rule::regex(pattern, replacement),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> RuleSet {
        RuleSet::new(default_rules().expect("default rules compile"))
    }

    #[test]
    fn later_rules_see_earlier_output() {
        let rules = RuleSet::new(vec![
            Rule::literal("a", "b"),
            Rule::regex("b+", "c").expect("regex"),
        ]);
        assert_eq!(rules.apply("aab"), "c");
    }

    #[test]
    fn regex_rules_expand_groups() {
        let rules = defaults();
        assert_eq!(
            rules.apply(r#"<a href="post-12.html">"#),
            r#"<a href="/pages/blog/post-12.html">"#
        );
        assert_eq!(
            rules.apply(r#"<script src="../../js/auth.js">"#),
            r#"<script src="/js/auth.js">"#
        );
    }

    #[test]
    fn placeholder_javascript_links_become_hash() {
        let rules = defaults();
        assert_eq!(
            rules.apply(r#"<a href="javascript:void(0);">x</a>"#),
            r##"<a href="#">x</a>"##
        );
    }

    #[test]
    fn featured_image_is_remapped() {
        let rules = defaults();
        assert_eq!(
            rules.apply(r#"<img src="../../assets/images/blog-featured.jpg">"#),
            r#"<img src="../../assets/images/blog-post-1.png">"#
        );
    }

    #[test]
    fn default_table_is_idempotent() {
        let rules = defaults();
        let input = concat!(
            r#"<a href="books.html">b</a><a href="../../index.html">h</a>"#,
            r#"<a href="blog-post-3.html">p</a><img src="assets/images/blog-2.jpg">"#,
            r#"<a href="javascript:void(0)">v</a><a class="divine-Jurisprudence">"#,
        );
        let once = rules.apply(input);
        assert_ne!(once, input);
        assert_eq!(rules.apply(&once), once);
    }

    #[test]
    fn invalid_regex_is_reported() {
        let err = Rule::regex("(", "x").expect_err("invalid regex");
        assert!(err.to_string().contains("compile rule pattern"));
    }
}
