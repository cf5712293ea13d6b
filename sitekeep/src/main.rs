//! Maintenance toolbox for a hand-edited static HTML site.
//!
//! Each subcommand is one re-runnable pass over the site directory
//! (`frontend/` by default). Passes print a summary of changed and skipped
//! files; the two audits exit with code 2 when they find issues.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use serde::Serialize;

use sitekeep::commands::{
    PassContext, Summary, audit, backfill, blog_nav, check_links, conflicts, dedupe_h1,
    enhance, hash_links, home_links, nav, populate, relink, replace, restore,
};
use sitekeep::exit_codes;
use sitekeep::io::config::{CONFIG_FILE, SiteConfig, load_config};
use sitekeep::io::git::Git;
use sitekeep::io::site::SitePaths;
use sitekeep::logging;

#[derive(Parser, Debug)]
#[command(
    name = "sitekeep",
    version,
    about = "Re-runnable maintenance passes for a static HTML site"
)]
struct Cli {
    /// Project root holding the site directory, config and git repository.
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    /// Config file (default: `<root>/sitekeep.toml`, optional).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Report what would change without writing anything.
    #[arg(long, global = true)]
    dry_run: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rewrite local href/src values to correct page-relative paths.
    Relink {
        /// Site-relative pages (default: every page).
        pages: Vec<String>,
    },
    /// Copy the canonical navigation block into every page.
    SyncNav {
        /// Template file relative to the root (default: `nav.template`).
        #[arg(long)]
        template: Option<String>,
    },
    /// Insert template content into pages lacking a main content section.
    Backfill {
        /// Site-relative pages (default: `backfill.pages`).
        pages: Vec<String>,
    },
    /// Restore main content from git history.
    Restore {
        /// Take content from this revision instead of scanning history.
        #[arg(long)]
        commit: Option<String>,
        /// Site-relative pages (default: `restore.pages`).
        pages: Vec<String>,
    },
    /// Keep the incoming side of every conflict block.
    ResolveConflicts {
        /// Paths relative to the root (default: `conflict_paths`).
        paths: Vec<String>,
    },
    /// Delete stray conflict marker lines.
    StripMarkers {
        /// Paths relative to the root (default: `conflict_paths`).
        paths: Vec<String>,
    },
    /// Remove the site-wide `<h1>` duplicating a page heading.
    DedupeH1 { pages: Vec<String> },
    /// Add missing lang, title, viewport, h1, alt and rel attributes.
    Enhance { pages: Vec<String> },
    /// Point every local `*index.html` link at the site home page.
    HomeLinks { pages: Vec<String> },
    /// Apply the ordered replacement rule table.
    Replace,
    /// Turn `href="#"` control anchors into buttons.
    HashLinks { pages: Vec<String> },
    /// Fix blog index "read more" links and post previous/next links.
    BlogNav,
    /// Fill zero-byte placeholder posts and profile pages.
    Populate,
    /// Report best-practice issues per page.
    Audit {
        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
        pages: Vec<String>,
    },
    /// Report missing local link targets, assets and anchors.
    CheckLinks {
        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
        pages: Vec<String>,
    },
}

fn main() {
    logging::init();
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(exit_codes::INVALID);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    let cfg = load_site_config(&cli.root, cli.config.as_deref())?;
    let paths = SitePaths::new(&cli.root, &cfg)?;
    let ctx = PassContext {
        cfg: &cfg,
        paths: &paths,
        dry_run: cli.dry_run,
    };

    let (title, summary) = match cli.command {
        Command::Relink { pages } => ("Relinked", relink::run(&ctx, &pages)?),
        Command::SyncNav { template } => {
            ("Navigation updated", nav::run(&ctx, template.as_deref())?)
        }
        Command::Backfill { pages } => ("Backfilled", backfill::run(&ctx, &pages)?),
        Command::Restore { commit, pages } => {
            let git = Git::new(&paths.root);
            ("Restored", restore::run(&ctx, &git, commit.as_deref(), &pages)?)
        }
        Command::ResolveConflicts { paths: targets } => {
            ("Resolved", conflicts::resolve(&ctx, &targets)?)
        }
        Command::StripMarkers { paths: targets } => ("Cleaned", conflicts::strip(&ctx, &targets)?),
        Command::DedupeH1 { pages } => ("Deduplicated", dedupe_h1::run(&ctx, &pages)?),
        Command::Enhance { pages } => ("Enhanced", enhance::run(&ctx, &pages)?),
        Command::HomeLinks { pages } => ("Home links fixed", home_links::run(&ctx, &pages)?),
        Command::Replace => ("Replaced", replace::run(&ctx)?),
        Command::HashLinks { pages } => ("Converted", hash_links::run(&ctx, &pages)?),
        Command::BlogNav => ("Blog navigation fixed", blog_nav::run(&ctx)?),
        Command::Populate => ("Populated", populate::run(&ctx)?),
        Command::Audit { json, pages } => {
            let report = audit::run(&ctx, &pages)?;
            print_report(json, &report, || report.render())?;
            return Ok(issues_code(report.has_issues()));
        }
        Command::CheckLinks { json, pages } => {
            let report = check_links::run(&ctx, &pages)?;
            print_report(json, &report, || check_links::render(&report))?;
            return Ok(issues_code(report.issue_count() > 0));
        }
    };
    print_summary(title, &summary, ctx.dry_run);
    Ok(exit_codes::OK)
}

/// Explicit config files must exist; the default one is optional.
fn load_site_config(root: &Path, explicit: Option<&Path>) -> Result<SiteConfig> {
    match explicit {
        Some(path) => {
            if !path.exists() {
                bail!("config file not found: {}", path.display());
            }
            load_config(path)
        }
        None => load_config(&root.join(CONFIG_FILE)),
    }
    .context("load config")
}

fn print_summary(title: &str, summary: &Summary, dry_run: bool) {
    if dry_run {
        print!("(dry run) ");
    }
    print!("{}", summary.render(title));
}

fn print_report<T: Serialize>(
    json: bool,
    report: &T,
    text: impl FnOnce() -> String,
) -> Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(report).context("serialize report")?
        );
    } else {
        print!("{}", text());
    }
    Ok(())
}

fn issues_code(found: bool) -> i32 {
    if found {
        exit_codes::ISSUES
    } else {
        exit_codes::OK
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "sitekeep",
            "restore",
            "--commit",
            "abc123",
            "pages/blog/post-7.html",
            "--dry-run",
            "--root",
            "site",
        ])
        .expect("parse");
        assert!(cli.dry_run);
        assert_eq!(cli.root, PathBuf::from("site"));
        match cli.command {
            Command::Restore { commit, pages } => {
                assert_eq!(commit.as_deref(), Some("abc123"));
                assert_eq!(pages, vec!["pages/blog/post-7.html"]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parse_audit_json() {
        let cli = Cli::try_parse_from(["sitekeep", "audit", "--json"]).expect("parse");
        assert!(matches!(cli.command, Command::Audit { json: true, ref pages } if pages.is_empty()));
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
