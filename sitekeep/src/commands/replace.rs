//! `sitekeep replace`: apply the ordered replacement table to site sources.

use anyhow::Result;
use tracing::info;

use super::{Backup, PassContext, Summary};
use crate::core::rules::RuleSet;
use crate::io::site::list_files;

pub fn run(ctx: &PassContext<'_>) -> Result<Summary> {
    ctx.paths.ensure_site_dir()?;
    let rules = RuleSet::new(ctx.cfg.replacement_rules()?);
    let extensions: Vec<&str> = ctx.cfg.rules.extensions.iter().map(String::as_str).collect();
    let files = list_files(&ctx.paths.site_dir, &extensions);
    info!(rules = rules.len(), files = files.len(), "applying replacements");
    Ok(ctx.rewrite_files(&files, Backup::Skip, |_, text| Ok(Some(rules.apply(text)))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::config::{RuleEntry, SiteConfig};
    use crate::test_support::TestSite;

    #[test]
    fn built_in_and_extra_rules_apply_to_configured_extensions() {
        let site = TestSite::new().expect("site");
        site.write(
            "index.html",
            r#"<a href="javascript:void(0);">x</a><img src="assets/images/blog-featured.jpg">"#,
        )
        .expect("write");
        site.write("js/app.js", "location = 'blog-post-3.html';").expect("write");
        site.write("notes.txt", "blog-post-3.html").expect("write");
        site.write("css/site.css", ".logo { background: url(old-logo.png); }").expect("write");

        let mut cfg = SiteConfig::default();
        cfg.rules.extra.push(RuleEntry {
            pattern: "old-logo.png".to_string(),
            replacement: "logo.png".to_string(),
            regex: false,
        });
        let paths = site.paths();
        let ctx = PassContext {
            cfg: &cfg,
            paths: &paths,
            dry_run: false,
        };
        let summary = run(&ctx).expect("replace");
        assert_eq!(summary.changed, vec!["css/site.css", "index.html", "js/app.js"]);
        assert_eq!(
            site.read("index.html").expect("read"),
            r##"<a href="#">x</a><img src="assets/images/blog-post-1.png">"##
        );
        assert_eq!(site.read("js/app.js").expect("read"), "location = 'post-3.html';");
        assert_eq!(site.read("notes.txt").expect("read"), "blog-post-3.html");
        assert!(site.read("css/site.css").expect("read").contains("url(logo.png)"));

        assert!(run(&ctx).expect("replace").changed.is_empty());
    }
}
