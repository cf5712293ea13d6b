//! Content for zero-byte placeholder pages.

use crate::core::markup::escape_text;

pub const TEMPLATE_TITLE: &str = "POST_TITLE";
pub const TEMPLATE_SUBTITLE: &str = "POST_SUBTITLE";
pub const TEMPLATE_BODY: &str = "<p>Start your blog post content here. Just write your paragraphs and wrap them in &lt;p&gt; tags.</p>";
pub const COMING_SOON_BODY: &str = "<p>This article is coming soon. Stay tuned for updates.</p>";

const SITE_MAIN_OPEN: &str = r#"<main class="site-main">"#;

pub fn post_title(number: u32) -> String {
    format!("Post {number} — Coming Soon")
}

pub const POST_SUBTITLE: &str = "Coming soon — content is being prepared";

/// Fill the blog post template.
pub fn render_post(template: &str, title: &str, subtitle: &str) -> String {
    template
        .replace(TEMPLATE_TITLE, &escape_text(title))
        .replace(TEMPLATE_SUBTITLE, &escape_text(subtitle))
        .replace(TEMPLATE_BODY, COMING_SOON_BODY)
}

/// `"library.html"` -> `"Library"`.
pub fn profile_title(file_name: &str) -> String {
    let stem = file_name.strip_suffix(".html").unwrap_or(file_name);
    let mut chars = stem.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Derive a profile page from the site home page: page title prefixed to the
/// site title and a small hero opening the main element.
pub fn render_profile(home: &str, title: &str, site_name: &str) -> String {
    let title = escape_text(title);
    let site_name = escape_text(site_name);
    home.replace(
        &format!("<title>{site_name}</title>"),
        &format!("<title>{title} — {site_name}</title>"),
    )
    .replacen(
        SITE_MAIN_OPEN,
        &format!(
            "{SITE_MAIN_OPEN}\n    <section class=\"profile-hero\">\n        <div class=\"container\"><h1>{title}</h1><p>Content coming soon</p></div>\n    </section>"
        ),
        1,
    )
}
