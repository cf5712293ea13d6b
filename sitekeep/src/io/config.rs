//! Site configuration stored in `sitekeep.toml` at the project root.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::core::nav::BlockMarker;
use crate::core::rules::{Rule, default_rules};

pub const CONFIG_FILE: &str = "sitekeep.toml";

/// Site configuration (TOML).
///
/// Every field is optional; missing fields fall back to the layout of the
/// site these tools were written for (`frontend/` with `pages/`, `assets/`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SiteConfig {
    /// Site directory, relative to the project root.
    pub site_dir: String,

    /// Site name used as the title suffix and home page title.
    pub site_name: String,

    /// `lang` value for pages missing one.
    pub default_lang: String,

    /// Top-level folders whose links resolve against the site root.
    pub root_folders: Vec<String>,

    /// Folder searched when a link target is missing (`pages`).
    pub fallback_dir: String,

    /// Default paths for `resolve-conflicts` and `strip-markers`.
    pub conflict_paths: Vec<String>,

    pub nav: NavConfig,
    pub backfill: BackfillConfig,
    pub restore: RestoreConfig,
    pub rules: RulesConfig,
    pub placeholders: PlaceholderConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct NavConfig {
    /// File holding the canonical snippet, relative to the project root.
    pub template: String,

    /// Where the template's links are written from, relative to the site.
    pub template_location: String,

    /// Literal start tag of the navigation block.
    pub start_marker: String,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            template: "temp_original_blog_index.html".to_string(),
            template_location: "pages/blog/index.html".to_string(),
            start_marker: r#"<ul class="nav-menu">"#.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BackfillConfig {
    /// Site-relative pages checked when no page is given on the command line.
    pub pages: Vec<String>,

    /// Fragment files (relative to the project root) keyed by site-relative
    /// page. Pages without an entry use the built-in profile templates.
    pub fragments: BTreeMap<String, String>,
}

impl Default for BackfillConfig {
    fn default() -> Self {
        Self {
            pages: vec![
                "pages/profile/index.html".to_string(),
                "pages/profile/library.html".to_string(),
                "pages/profile/subscription.html".to_string(),
            ],
            fragments: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RestoreConfig {
    /// Site-relative pages restored when no page is given on the command line.
    pub pages: Vec<String>,
}

impl Default for RestoreConfig {
    fn default() -> Self {
        Self {
            pages: [7, 8, 10, 11, 12, 13, 14, 15]
                .into_iter()
                .map(|n| format!("pages/blog/post-{n}.html"))
                .chain(BackfillConfig::default().pages)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RulesConfig {
    /// Apply the built-in replacement table first.
    pub use_defaults: bool,

    /// File extensions (without dot) the replacement pass touches.
    pub extensions: Vec<String>,

    /// Extra rules applied after the built-in table, in order.
    pub extra: Vec<RuleEntry>,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            use_defaults: true,
            extensions: vec!["html".to_string(), "css".to_string(), "js".to_string()],
            extra: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RuleEntry {
    pub pattern: String,
    pub replacement: String,
    #[serde(default)]
    pub regex: bool,
}

impl RuleEntry {
    pub fn to_rule(&self) -> Result<Rule> {
        if self.regex {
            Rule::regex(&self.pattern, &self.replacement)
        } else {
            Ok(Rule::literal(&self.pattern, &self.replacement))
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PlaceholderConfig {
    /// Blog post template, relative to the site.
    pub blog_template: String,

    /// Highest post number considered (`post-1.html` ..= `post-N.html`).
    pub max_post: u32,

    /// Profile pages generated from the home page, relative to the site.
    pub profile_pages: Vec<String>,
}

impl Default for PlaceholderConfig {
    fn default() -> Self {
        Self {
            blog_template: "pages/blog/blog-template.html".to_string(),
            max_post: 15,
            profile_pages: BackfillConfig::default().pages,
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site_dir: "frontend".to_string(),
            site_name: "Raphael's Horizon".to_string(),
            default_lang: "en".to_string(),
            root_folders: ["pages", "assets", "css", "js", "fonts"]
                .into_iter()
                .map(str::to_string)
                .collect(),
            fallback_dir: "pages".to_string(),
            conflict_paths: vec!["frontend".to_string(), "backend".to_string()],
            nav: NavConfig::default(),
            backfill: BackfillConfig::default(),
            restore: RestoreConfig::default(),
            rules: RulesConfig::default(),
            placeholders: PlaceholderConfig::default(),
        }
    }
}

impl SiteConfig {
    pub fn validate(&self) -> Result<()> {
        if self.site_dir.trim().is_empty() {
            return Err(anyhow!("site_dir must be non-empty"));
        }
        if self.default_lang.trim().is_empty() {
            return Err(anyhow!("default_lang must be non-empty"));
        }
        if self.fallback_dir.trim().is_empty() {
            return Err(anyhow!("fallback_dir must be non-empty"));
        }
        if self.root_folders.iter().any(|folder| folder.trim().is_empty()) {
            return Err(anyhow!("root_folders entries must be non-empty"));
        }
        BlockMarker::new(&self.nav.start_marker).context("nav.start_marker")?;
        if self.rules.extensions.is_empty() {
            return Err(anyhow!("rules.extensions must be a non-empty array"));
        }
        for (index, entry) in self.rules.extra.iter().enumerate() {
            if entry.pattern.is_empty() {
                return Err(anyhow!("rules.extra[{index}].pattern must be non-empty"));
            }
            entry
                .to_rule()
                .with_context(|| format!("rules.extra[{index}]"))?;
        }
        if self.placeholders.max_post == 0 {
            return Err(anyhow!("placeholders.max_post must be > 0"));
        }
        Ok(())
    }

    /// Built-in table (when enabled) followed by the configured extra rules.
    pub fn replacement_rules(&self) -> Result<Vec<Rule>> {
        let mut rules = if self.rules.use_defaults {
            default_rules()?
        } else {
            Vec::new()
        };
        for entry in &self.rules.extra {
            rules.push(entry.to_rule()?);
        }
        Ok(rules)
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `SiteConfig::default()`.
pub fn load_config(path: &Path) -> Result<SiteConfig> {
    if !path.exists() {
        let cfg = SiteConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: SiteConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_missing_returns_default() {
        let temp = tempfile::tempdir().expect("tempdir");
        let cfg = load_config(&temp.path().join(CONFIG_FILE)).expect("load");
        assert_eq!(cfg, SiteConfig::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join(CONFIG_FILE);
        fs::write(
            &path,
            r#"
site_dir = "public"

[nav]
template_location = "index.html"

[[rules.extra]]
pattern = "old-logo.png"
replacement = "logo.png"

[[rules.extra]]
pattern = 'post-(\d+)\.htm\b'
replacement = "post-${1}.html"
regex = true
"#,
        )
        .expect("write");

        let cfg = load_config(&path).expect("load");
        assert_eq!(cfg.site_dir, "public");
        assert_eq!(cfg.nav.template_location, "index.html");
        assert_eq!(cfg.nav.start_marker, NavConfig::default().start_marker);
        assert_eq!(cfg.default_lang, "en");
        assert_eq!(cfg.rules.extra.len(), 2);
        assert!(cfg.rules.extra[1].regex);

        let rules = cfg.replacement_rules().expect("rules");
        assert_eq!(rules.len(), default_rules().expect("defaults").len() + 2);
    }

    #[test]
    fn invalid_regex_rule_is_rejected() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join(CONFIG_FILE);
        fs::write(
            &path,
            "[[rules.extra]]\npattern = \"(\"\nreplacement = \"x\"\nregex = true\n",
        )
        .expect("write");
        let err = load_config(&path).expect_err("invalid");
        assert!(format!("{err:#}").contains("rules.extra[0]"));
    }

    #[test]
    fn validate_rejects_empty_site_dir() {
        let cfg = SiteConfig {
            site_dir: " ".to_string(),
            ..SiteConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn unparsable_file_is_an_error() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join(CONFIG_FILE);
        fs::write(&path, "site_dir = [").expect("write");
        assert!(load_config(&path).is_err());
    }
}
