//! Best-practice audit of a single page.

use std::fmt;

use anyhow::{Result, anyhow};
use scraper::{Html, Selector};
use serde::Serialize;

/// At most this many offending values are listed per issue in text output.
const SHOWN_VALUES: usize = 5;

pub(crate) fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|err| anyhow!("invalid selector '{css}': {err:?}"))
}

/// Raw counts collected from one page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageAudit {
    pub titles: usize,
    pub has_viewport: bool,
    pub has_lang: bool,
    pub h1_count: usize,
    pub images_missing_alt: Vec<String>,
    pub blank_without_rel: Vec<String>,
    pub placeholder_links: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Issue {
    MissingTitle,
    MissingViewport,
    MissingLang,
    NoH1,
    MultipleH1 { count: usize },
    ImagesMissingAlt { srcs: Vec<String> },
    BlankWithoutRel { hrefs: Vec<String> },
    PlaceholderLinks { count: usize },
}

fn shown(values: &[String]) -> String {
    values
        .iter()
        .take(SHOWN_VALUES)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Issue::MissingTitle => write!(f, "Missing <title>"),
            Issue::MissingViewport => write!(f, "Missing <meta name=\"viewport\">"),
            Issue::MissingLang => write!(f, "<html> tag missing lang attribute"),
            Issue::NoH1 => write!(f, "No <h1> found"),
            Issue::MultipleH1 { count } => write!(f, "Multiple <h1> tags ({count})"),
            Issue::ImagesMissingAlt { srcs } => {
                write!(f, "Images with missing/empty alt: {}", shown(srcs))
            }
            Issue::BlankWithoutRel { hrefs } => write!(
                f,
                "Links with target=_blank missing rel=noopener noreferrer: {}",
                shown(hrefs)
            ),
            Issue::PlaceholderLinks { count } => {
                write!(f, "Placeholder links (href=\"#\") count: {count}")
            }
        }
    }
}

/// Issues found on one page, keyed by its site-relative path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageIssues {
    pub page: String,
    pub issues: Vec<Issue>,
}

impl PageAudit {
    pub fn issues(&self) -> Vec<Issue> {
        let mut issues = Vec::new();
        if self.titles == 0 {
            issues.push(Issue::MissingTitle);
        }
        if !self.has_viewport {
            issues.push(Issue::MissingViewport);
        }
        if !self.has_lang {
            issues.push(Issue::MissingLang);
        }
        match self.h1_count {
            0 => issues.push(Issue::NoH1),
            1 => {}
            count => issues.push(Issue::MultipleH1 { count }),
        }
        if !self.images_missing_alt.is_empty() {
            issues.push(Issue::ImagesMissingAlt {
                srcs: self.images_missing_alt.clone(),
            });
        }
        if !self.blank_without_rel.is_empty() {
            issues.push(Issue::BlankWithoutRel {
                hrefs: self.blank_without_rel.clone(),
            });
        }
        if self.placeholder_links > 0 {
            issues.push(Issue::PlaceholderLinks {
                count: self.placeholder_links,
            });
        }
        issues
    }
}

pub fn audit_page(html: &str) -> Result<PageAudit> {
    let document = Html::parse_document(html);

    let titles = document.select(&selector("title")?).count();
    let has_viewport = document
        .select(&selector("meta[name]")?)
        .any(|meta| meta.value().attr("name") == Some("viewport"));
    let has_lang = document
        .select(&selector("html[lang]")?)
        .next()
        .is_some();
    let h1_count = document.select(&selector("h1")?).count();

    let images_missing_alt = document
        .select(&selector("img")?)
        .filter(|img| img.value().attr("alt").is_none_or(|alt| alt.trim().is_empty()))
        .map(|img| img.value().attr("src").unwrap_or_default().to_string())
        .collect();

    let mut blank_without_rel = Vec::new();
    let mut placeholder_links = 0;
    for anchor in document.select(&selector("a")?) {
        let element = anchor.value();
        if element.attr("target") == Some("_blank") {
            let rel = element.attr("rel").unwrap_or_default();
            if !rel.contains("noopener") || !rel.contains("noreferrer") {
                blank_without_rel.push(element.attr("href").unwrap_or_default().to_string());
            }
        }
        if element.attr("href") == Some("#") {
            placeholder_links += 1;
        }
    }

    Ok(PageAudit {
        titles,
        has_viewport,
        has_lang,
        h1_count,
        images_missing_alt,
        blank_without_rel,
        placeholder_links,
    })
}
