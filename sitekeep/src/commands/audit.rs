//! `sitekeep audit`: read-only best-practice report over every page.

use anyhow::Result;
use serde::Serialize;
use tracing::{info, warn};

use super::PassContext;
use crate::core::audit::{PageIssues, audit_page};
use crate::io::encoding::read_with_fallback;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuditReport {
    pub pages: usize,
    pub results: Vec<PageIssues>,
}

impl AuditReport {
    pub fn has_issues(&self) -> bool {
        !self.results.is_empty()
    }

    pub fn render(&self) -> String {
        let mut out = format!("Audited {} page(s)\n", self.pages);
        if self.results.is_empty() {
            out.push_str("No issues detected\n");
            return out;
        }
        out.push_str("\nAudit results:\n");
        for page in &self.results {
            out.push_str(&format!("- {}:\n", page.page));
            for issue in &page.issues {
                out.push_str(&format!("    - {issue}\n"));
            }
        }
        out
    }
}

pub fn run(ctx: &PassContext<'_>, pages: &[String]) -> Result<AuditReport> {
    ctx.paths.ensure_site_dir()?;
    let files = ctx.pages_or_all(pages);
    info!(pages = files.len(), "auditing");

    let mut report = AuditReport {
        pages: files.len(),
        results: Vec::new(),
    };
    for path in &files {
        let page = ctx.display(path);
        let html = match read_with_fallback(path) {
            Ok((html, _)) => html,
            Err(err) => {
                warn!(path = %page, "{err:#}");
                continue;
            }
        };
        let issues = audit_page(&html)?.issues();
        if !issues.is_empty() {
            report.results.push(PageIssues { page, issues });
        }
    }
    Ok(report)
}
