//! `sitekeep check-links`: report local links, assets and anchors that do
//! not resolve.

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::{info, warn};

use super::PassContext;
use crate::core::link_check::{Finding, LinkReport, Reference, collect, resolve};
use crate::io::encoding::read_with_fallback;

/// Anchor names per target file, parsed once.
#[derive(Default)]
struct AnchorCache {
    anchors: HashMap<PathBuf, BTreeSet<String>>,
}

impl AnchorCache {
    fn contains(&mut self, path: &Path, fragment: &str) -> bool {
        self.anchors
            .entry(path.to_path_buf())
            .or_insert_with(|| {
                read_with_fallback(path)
                    .and_then(|(html, _)| collect(&html))
                    .map(|links| links.anchors)
                    .unwrap_or_else(|err| {
                        warn!(path = %path.display(), "{err:#}");
                        BTreeSet::new()
                    })
            })
            .contains(fragment)
    }
}

pub fn render(report: &LinkReport) -> String {
    fn section(out: &mut String, title: &str, findings: &[Finding]) {
        out.push_str(&format!("{title}: {}\n", findings.len()));
        for finding in findings {
            match &finding.expected {
                Some(expected) => out.push_str(&format!(
                    "  Page: {} -> {} expected at {expected}\n",
                    finding.page, finding.link
                )),
                None => out.push_str(&format!("  Page: {} -> {}\n", finding.page, finding.link)),
            }
        }
    }

    let mut out = format!("Scanned {} page(s)\n", report.pages);
    section(&mut out, "Missing files (hrefs)", &report.missing_files);
    section(&mut out, "Missing assets (src/href for CSS/IMG/SCRIPT)", &report.missing_assets);
    section(&mut out, "Broken anchors (fragments)", &report.broken_anchors);
    match report.issue_count() {
        0 => out.push_str("No issues found\n"),
        count => out.push_str(&format!("Issues found: {count}\n")),
    }
    out
}

pub fn run(ctx: &PassContext<'_>, pages: &[String]) -> Result<LinkReport> {
    ctx.paths.ensure_site_dir()?;
    let site_dir = &ctx.paths.site_dir;
    let files = ctx.pages_or_all(pages);
    info!(pages = files.len(), "checking links");

    let mut report = LinkReport {
        pages: files.len(),
        ..LinkReport::default()
    };
    let mut cache = AnchorCache::default();
    for path in &files {
        let page = ctx.display(path);
        let links = match read_with_fallback(path).and_then(|(html, _)| collect(&html)) {
            Ok(links) => links,
            Err(err) => {
                warn!(path = %page, "{err:#}");
                continue;
            }
        };
        let finding = |link: &str, expected: Option<&Path>| Finding {
            page: page.clone(),
            link: link.to_string(),
            expected: expected.map(|target| ctx.paths.root_relative(target)),
        };

        for href in &links.hrefs {
            match resolve(href, path, site_dir) {
                Reference::Skip => {}
                Reference::SamePage(id) => {
                    if !links.anchors.contains(&id) {
                        report.broken_anchors.push(finding(href, None));
                    }
                }
                Reference::File { path: target, fragment } => {
                    if !target.exists() {
                        report.missing_files.push(finding(href, Some(&target)));
                    } else if let Some(fragment) = fragment
                        && target.is_file()
                        && !cache.contains(&target, &fragment)
                    {
                        report.broken_anchors.push(finding(href, None));
                    }
                }
            }
        }
        for asset in &links.assets {
            if let Reference::File { path: target, .. } = resolve(asset, path, site_dir)
                && !target.exists()
            {
                report.missing_assets.push(finding(asset, Some(&target)));
            }
        }
    }
    Ok(report)
}
