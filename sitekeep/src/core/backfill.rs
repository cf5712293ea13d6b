//! Main-content detection and insertion after the page header.

use std::sync::LazyLock;

use regex::Regex;

static HEADER_CLOSE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</header>").expect("valid header close regex"));

static MAIN_UNTIL_FOOTER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)</header>(.*?)<footer").expect("valid main content regex")
});

static MAIN_TO_END_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)</header>(.*)").expect("valid trailing content regex"));

/// Markers that say a profile page already has its content.
pub const PROFILE_MARKERS: &[&str] = &[
    r#"class="post-content""#,
    r#"class="profile-content""#,
    r#"class="library-hero""#,
];

/// Markers that say a page already has authored main content.
pub const MAIN_CONTENT_MARKERS: &[&str] = &[
    r#"class="post-content""#,
    r#"class="blog-content""#,
    r#"class="books-hero""#,
    r#"class="author-intro""#,
    r#"class="post-article""#,
    r#"class="book-hero""#,
    r#"<article class="post-article""#,
];

pub fn has_marker<S: AsRef<str>>(html: &str, markers: &[S]) -> bool {
    markers.iter().any(|marker| html.contains(marker.as_ref()))
}

/// Text between `</header>` and `<footer`, or everything after `</header>`.
pub fn extract_main_content(html: &str) -> Option<&str> {
    if let Some(caps) = MAIN_UNTIL_FOOTER_RE.captures(html) {
        return caps.get(1).map(|m| m.as_str());
    }
    MAIN_TO_END_RE
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Outcome of checking a page against a candidate fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backfill {
    /// A marker keyword is already present.
    HasContent,
    /// The fragment is already in the page.
    AlreadyInserted,
    /// No `</header>` to insert after.
    NoHeader,
    Insert(String),
}

/// Decide whether `fragment` goes into `page`, and build the new page.
pub fn plan<S: AsRef<str>>(page: &str, fragment: &str, markers: &[S]) -> Backfill {
    if has_marker(page, markers) {
        return Backfill::HasContent;
    }
    let trimmed = fragment.trim();
    if !trimmed.is_empty() && page.contains(trimmed) {
        return Backfill::AlreadyInserted;
    }
    match insert_after_header(page, fragment) {
        Some(updated) => Backfill::Insert(updated),
        None => Backfill::NoHeader,
    }
}

/// Insert `fragment` on its own lines right after the first `</header>`.
pub fn insert_after_header(page: &str, fragment: &str) -> Option<String> {
    let close = HEADER_CLOSE_RE.find(page)?;
    let mut out = String::with_capacity(page.len() + fragment.len() + 2);
    out.push_str(&page[..close.end()]);
    out.push('\n');
    out.push_str(fragment);
    out.push('\n');
    out.push_str(&page[close.end()..]);
    Some(out)
}

const PROFILE_INDEX: &str = r#"
    <!-- PROFILE HERO -->
    <section class="profile-hero">
        <div class="container">
            <div class="section-header">
                <h1>My Profile</h1>
                <p>Welcome to your profile. Manage your account, view library, and manage subscriptions.</p>
            </div>
        </div>
    </section>

    <section class="profile-content">
        <div class="container">
            <div class="profile-actions">
                <a href="subscription.html" class="btn btn-primary">View Subscription</a>
                <a href="library.html" class="btn btn-secondary">My Library</a>
            </div>
        </div>
    </section>
    "#;

const PROFILE_LIBRARY: &str = r#"
    <!-- PROFILE LIBRARY -->
    <section class="library-hero">
        <div class="container">
            <div class="section-header">
                <h1>My Library</h1>
                <p>Your purchased and saved books are listed here.</p>
            </div>
        </div>
    </section>

    <section class="library-content">
        <div class="container">
            <div class="books-grid">
                <div class="book-card">
                    <div class="book-cover"><img src="../../assets/images/light-after-the-tunnel-english.jpg" alt="The Light After the Tunnel"/></div>
                    <div class="book-info">
                        <h4>The Light After the Tunnel</h4>
                        <p>English edition</p>
                    </div>
                </div>
            </div>
        </div>
    </section>
    "#;

const PROFILE_SUBSCRIPTION: &str = r#"
    <!-- PROFILE SUBSCRIPTION -->
    <section class="subscription-hero">
        <div class="container">
            <div class="section-header">
                <h1>Subscription Plans</h1>
                <p>Choose a plan that suits you.</p>
            </div>
        </div>
    </section>

    <section class="subscription-content">
        <div class="container">
            <div class="plans-grid">
                <div class="plan-card">
                    <h4>Free</h4>
                    <p>Access to limited resources</p>
                </div>
                <div class="plan-card">
                    <h4>Premium</h4>
                    <p>Full access to library and premium content</p>
                </div>
            </div>
        </div>
    </section>
    "#;

/// Built-in fragment for a site-relative page path.
pub fn builtin_template(page: &str) -> Option<&'static str> {
    match page {
        "pages/profile/index.html" => Some(PROFILE_INDEX),
        "pages/profile/library.html" => Some(PROFILE_LIBRARY),
        "pages/profile/subscription.html" => Some(PROFILE_SUBSCRIPTION),
        _ => None,
    }
}
