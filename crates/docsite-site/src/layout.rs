//! HTML page layout.
//!
//! Wraps rendered page content with the document head, navbar and sidebar.
//! Values taken from configuration are escaped; page content and analytics
//! markup are inserted as-is.

use std::collections::{BTreeMap, HashMap};
use std::fmt::Write;

use docsite_analytics::AnalyticsMarkup;
use docsite_config::{Config, HeadTag};
use docsite_renderer::escape_html;
use docsite_sidebar::{SidebarGroup, page_url};

/// Head elements that have no closing tag.
const VOID_ELEMENTS: &[&str] = &["base", "link", "meta"];

/// Everything needed to lay out one page.
pub(crate) struct Layout<'a> {
    pub config: &'a Config,
    /// Sidebar groups of the page's route.
    pub groups: &'a [SidebarGroup],
    pub route: &'a str,
    /// Route-relative URL of the page (without base).
    pub url: &'a str,
    /// `<title>` text.
    pub title: &'a str,
    /// Rendered page content.
    pub content: &'a str,
    /// Page titles keyed by route-relative URL, used as sidebar link text.
    pub titles: &'a HashMap<String, String>,
    /// Pre-rendered analytics markup.
    pub analytics: Option<&'a AnalyticsMarkup>,
    /// "Edit this page" link target.
    pub edit_url: Option<&'a str>,
}

impl Layout<'_> {
    pub(crate) fn render(&self) -> String {
        let site = &self.config.site;
        let mut out = String::with_capacity(self.content.len() + 4096);

        out.push_str("<!DOCTYPE html>\n");
        let _ = writeln!(out, r#"<html lang="{}">"#, escape_html(&site.lang));
        out.push_str("<head>\n<meta charset=\"utf-8\">\n");
        out.push_str(
            "<meta name=\"viewport\" content=\"width=device-width,initial-scale=1\">\n",
        );
        let _ = writeln!(out, "<title>{}</title>", escape_html(self.title));
        if !site.description.is_empty() {
            let _ = writeln!(
                out,
                r#"<meta name="description" content="{}">"#,
                escape_html(&site.description)
            );
        }
        for tag in &self.config.head {
            out.push_str(&head_tag(tag));
        }
        if !self.config.define.is_empty() {
            out.push_str(&define_script(&self.config.define));
        }
        if let Some(analytics) = self.analytics {
            out.push_str(&analytics.head);
        }
        out.push_str("</head>\n<body>\n");
        if let Some(analytics) = self.analytics {
            out.push_str(&analytics.body);
        }

        self.render_navbar(&mut out);
        self.render_sidebar(&mut out);

        out.push_str("<main class=\"page\">\n");
        out.push_str(self.content);
        if let Some(edit_url) = self.edit_url {
            let _ = writeln!(
                out,
                r#"<footer class="page-edit"><a href="{}" target="_blank" rel="noopener noreferrer">Edit this page</a></footer>"#,
                escape_html(edit_url)
            );
        }
        out.push_str("</main>\n</body>\n</html>\n");
        out
    }

    fn render_navbar(&self, out: &mut String) {
        let site = &self.config.site;
        let theme = &self.config.theme;

        out.push_str("<header class=\"navbar\">\n");
        let _ = write!(out, r#"<a class="home-link" href="{}">"#, escape_html(&site.base));
        if let Some(logo) = &theme.logo {
            let _ = write!(
                out,
                r#"<img class="logo" src="{}" alt="{}">"#,
                escape_html(&with_base(&site.base, logo)),
                escape_html(&site.title)
            );
        }
        let _ = writeln!(
            out,
            r#"<span class="site-name">{}</span></a>"#,
            escape_html(&site.title)
        );

        out.push_str("<nav class=\"nav-links\">\n");
        for link in &self.config.navbar {
            let href = if link.is_external() {
                link.link.clone()
            } else {
                with_base(&site.base, &link.link)
            };
            out.push_str(&anchor(&href, &link.text, link.is_external(), false));
        }
        if let Some(repo_url) = theme.repo_url() {
            let label = theme.repo_label.as_deref().unwrap_or("Repository");
            out.push_str(&anchor(&repo_url, label, true, false));
        }
        out.push_str("</nav>\n</header>\n");
    }

    fn render_sidebar(&self, out: &mut String) {
        if self.groups.is_empty() {
            return;
        }
        out.push_str("<aside class=\"sidebar\">\n");
        for group in self.groups {
            out.push_str("<section class=\"sidebar-group\">\n");
            let _ = writeln!(
                out,
                r#"<p class="sidebar-heading">{}</p>"#,
                escape_html(&group.text)
            );
            out.push_str("<ul>\n");
            for document in &group.children {
                let url = page_url(self.route, document);
                let text = self
                    .titles
                    .get(&url)
                    .map_or_else(|| document_label(document), String::clone);
                let href = with_base(&self.config.site.base, &url);
                out.push_str("<li>");
                out.push_str(anchor(&href, &text, false, url == self.url).trim_end());
                out.push_str("</li>\n");
            }
            out.push_str("</ul>\n</section>\n");
        }
        out.push_str("</aside>\n");
    }
}

/// Prefix a site-relative path with the base URL.
///
/// `with_base("/rport/", "/docs/")` is `/rport/docs/`; relative paths such as
/// `logo/x.svg` are treated as rooted at the base.
pub(crate) fn with_base(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Sidebar text for a document without a title: its file stem.
fn document_label(document: &str) -> String {
    document
        .strip_suffix(".md")
        .unwrap_or(document)
        .to_owned()
}

fn anchor(href: &str, text: &str, external: bool, active: bool) -> String {
    let mut html = format!(r#"<a href="{}""#, escape_html(href));
    if active {
        html.push_str(r#" class="active""#);
    }
    if external {
        html.push_str(r#" target="_blank" rel="noopener noreferrer""#);
    }
    let _ = writeln!(html, ">{}</a>", escape_html(text));
    html
}

fn head_tag(tag: &HeadTag) -> String {
    let mut html = format!("<{}", tag.tag);
    for (name, value) in &tag.attrs {
        let _ = write!(html, r#" {}="{}""#, escape_html(name), escape_html(value));
    }
    html.push('>');
    if !VOID_ELEMENTS.contains(&tag.tag.as_str()) {
        let _ = write!(html, "</{}>", tag.tag);
    }
    html.push('\n');
    html
}

/// Script declaring build-time constants as globals.
fn define_script(define: &BTreeMap<String, String>) -> String {
    let mut script = String::from("<script>\n");
    for (name, value) in define {
        let literal = serde_json::Value::from(value.as_str())
            .to_string()
            .replace("</", "<\\/");
        let _ = writeln!(script, "var {name} = {literal};");
    }
    script.push_str("</script>\n");
    script
}
