//! CLI tests for the rewriting passes: config loading, dry runs, backups and
//! idempotence.

use std::fs;
use std::process::{Command, Output};

use sitekeep::exit_codes;
use sitekeep::test_support::TestSite;

fn sitekeep(site: &TestSite, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_sitekeep"))
        .arg("--root")
        .arg(site.root())
        .args(args)
        .output()
        .expect("run sitekeep")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn resolve_conflicts_backs_up_and_is_idempotent() {
    let site = TestSite::new().expect("site");
    let conflicted = "<<<<<<< HEAD\nA\n=======\nB\n>>>>>>> branch\n";
    site.write("index.html", conflicted).expect("write");

    let first = sitekeep(&site, &["resolve-conflicts"]);
    assert_eq!(first.status.code(), Some(exit_codes::OK));
    assert!(stdout(&first).contains("Resolved: 1 file(s)"));
    assert_eq!(site.read("index.html").expect("read"), "B\n");
    assert_eq!(site.read("index.html.bak").expect("backup"), conflicted);

    let second = sitekeep(&site, &["resolve-conflicts"]);
    assert!(stdout(&second).contains("Resolved: 0 file(s)"));
}

#[test]
fn enhance_dry_run_writes_nothing() {
    let site = TestSite::new().expect("site");
    let page = "<html><head></head><body><p>x</p></body></html>";
    site.write("pages/about-us.html", page).expect("write");

    let dry = sitekeep(&site, &["enhance", "--dry-run"]);
    assert_eq!(dry.status.code(), Some(exit_codes::OK));
    assert!(stdout(&dry).contains("(dry run) Enhanced: 1 file(s)"));
    assert_eq!(site.read("pages/about-us.html").expect("read"), page);

    sitekeep(&site, &["enhance"]);
    let enhanced = site.read("pages/about-us.html").expect("read");
    assert_eq!(enhanced.matches(r#"name="viewport""#).count(), 1);
    assert!(enhanced.contains("<h1>About Us</h1>"));

    let again = sitekeep(&site, &["enhance"]);
    assert!(stdout(&again).contains("Enhanced: 0 file(s)"));
}

#[test]
fn config_file_changes_site_dir_and_rules() {
    let site = TestSite::new().expect("site");
    site.write_root(
        "sitekeep.toml",
        "site_dir = \"public\"\n\n[rules]\nuse_defaults = false\n\n[[rules.extra]]\npattern = \"old.png\"\nreplacement = \"new.png\"\n",
    )
    .expect("write");
    site.write_root("public/index.html", r#"<img src="old.png">"#).expect("write");

    let output = sitekeep(&site, &["replace"]);
    assert_eq!(output.status.code(), Some(exit_codes::OK));
    let page = fs::read_to_string(site.root().join("public/index.html")).expect("read");
    assert_eq!(page, r#"<img src="new.png">"#);
}

#[test]
fn invalid_config_is_rejected() {
    let site = TestSite::new().expect("site");
    site.write_root("sitekeep.toml", "[placeholders]\nmax_post = 0\n").expect("write");
    let output = sitekeep(&site, &["populate"]);
    assert_eq!(output.status.code(), Some(exit_codes::INVALID));
    assert!(String::from_utf8_lossy(&output.stderr).contains("max_post"));

    let explicit = sitekeep(&site, &["--config", "nope.toml", "replace"]);
    assert_eq!(explicit.status.code(), Some(exit_codes::INVALID));
}
