//! Site assembly.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use docsite_analytics::{AnalyticsMarkup, AnalyticsPlugin, ConsentBanner};
use docsite_config::Config;
use docsite_renderer::{ContainerProcessor, MarkdownRenderer, VimeoContainer};
use docsite_sidebar::{
    SidebarError, SidebarGroup, SidebarMap, build_sidebar_map, page_file_name, page_url,
};

use crate::layout::Layout;

/// Error returned when assembling or building the site fails.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    /// A sidebar folder could not be listed.
    #[error(transparent)]
    Sidebar(#[from] SidebarError),
    /// A document could not be read or a page could not be written.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Two documents map to the same page.
    #[error(
        "{url} is produced by both {} and {}",
        .first.display(),
        .second.display()
    )]
    DuplicatePage {
        /// Route-relative URL of the page.
        url: String,
        /// Document that claimed the page first.
        first: PathBuf,
        /// Document that would overwrite it.
        second: PathBuf,
    },
}

impl SiteError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// A fully rendered page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// Route-relative URL (e.g. `/docs/install.html`).
    pub url: String,
    /// Output path relative to the output directory.
    pub output_path: PathBuf,
    /// `<title>` text.
    pub title: String,
    /// Complete HTML document.
    pub html: String,
    /// Warnings raised while rendering.
    pub warnings: Vec<String>,
}

/// Summary of a site build.
#[derive(Debug, Default)]
pub struct BuildReport {
    /// Number of pages written.
    pub pages: usize,
    /// Warnings from all pages, prefixed with the page URL.
    pub warnings: Vec<String>,
}

/// Rendered page content before layout.
struct Content {
    url: String,
    title: Option<String>,
    html: String,
    warnings: Vec<String>,
}

/// The assembled site: configuration plus the sidebar built from disk.
///
/// The sidebar is listed once, when the site is loaded.
pub struct Site<'a> {
    config: &'a Config,
    sidebar: SidebarMap,
    analytics: Option<AnalyticsMarkup>,
}

impl<'a> Site<'a> {
    /// Assemble the site described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Sidebar`] if a sidebar folder cannot be listed.
    pub fn load(config: &'a Config) -> Result<Self, SiteError> {
        let sidebar = build_sidebar_map(&config.build_resolved, &config.sidebar)?;
        let analytics = config.analytics.as_ref().map(|analytics| {
            let plugin = AnalyticsPlugin::from(analytics);
            ConsentBanner::from_config(analytics).render(&plugin)
        });
        Ok(Self {
            config,
            sidebar,
            analytics,
        })
    }

    /// Sidebar groups keyed by route.
    #[must_use]
    pub fn sidebar(&self) -> &SidebarMap {
        &self.sidebar
    }

    /// Render a single page.
    ///
    /// Sidebar links to other pages use their file names, since their titles
    /// are only known once they have been rendered; [`build`](Self::build)
    /// uses real titles throughout.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Io`] if the document cannot be read.
    pub fn render_page(
        &self,
        route: &str,
        group: &SidebarGroup,
        document: &str,
    ) -> Result<Page, SiteError> {
        let content = self.render_content(route, group, document)?;
        let mut titles = HashMap::new();
        if let Some(title) = &content.title {
            titles.insert(content.url.clone(), title.clone());
        }
        Ok(self.layout(route, group, document, content, &titles))
    }

    /// Render every sidebar document and write the pages under `out_dir`.
    ///
    /// `README.md` becomes the route's `index.html`; other documents keep
    /// their stem (`install.md` -> `install.html`).
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::DuplicatePage`] if sections sharing a route
    /// contain documents with the same name, and [`SiteError::Io`] if a
    /// document cannot be read or a page cannot be written.
    pub fn build(&self, out_dir: &Path) -> Result<BuildReport, SiteError> {
        let mut sources: HashMap<String, PathBuf> = HashMap::new();
        let mut rendered = Vec::new();
        let mut titles = HashMap::new();
        for (route, groups) in &self.sidebar {
            for group in groups {
                for document in &group.children {
                    let url = page_url(route, document);
                    let source = group.folder.join(document);
                    if let Some(first) = sources.get(&url) {
                        return Err(SiteError::DuplicatePage {
                            url,
                            first: first.clone(),
                            second: source,
                        });
                    }
                    sources.insert(url, source);

                    let content = self.render_content(route, group, document)?;
                    if let Some(title) = &content.title {
                        titles.insert(content.url.clone(), title.clone());
                    }
                    rendered.push((route, group, document, content));
                }
            }
        }

        let mut report = BuildReport::default();
        for (route, group, document, content) in rendered {
            let page = self.layout(route, group, document, content, &titles);
            let path = out_dir.join(&page.output_path);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).map_err(|e| SiteError::io(parent, e))?;
            }
            fs::write(&path, &page.html).map_err(|e| SiteError::io(&path, e))?;
            tracing::debug!(url = %page.url, path = %path.display(), "Page written");

            report.pages += 1;
            report
                .warnings
                .extend(page.warnings.iter().map(|w| format!("{}: {w}", page.url)));
        }

        tracing::info!(
            pages = report.pages,
            warnings = report.warnings.len(),
            out_dir = %out_dir.display(),
            "Site built"
        );
        Ok(report)
    }

    fn render_content(
        &self,
        route: &str,
        group: &SidebarGroup,
        document: &str,
    ) -> Result<Content, SiteError> {
        let source_path = group.folder.join(document);
        let source =
            fs::read_to_string(&source_path).map_err(|e| SiteError::io(&source_path, e))?;

        let mut processor = ContainerProcessor::new().with_container(VimeoContainer::new());
        let processed = processor.process(&source);
        let result = MarkdownRenderer::new()
            .with_title_extraction()
            .render(&processed);

        for warning in processor.warnings() {
            tracing::warn!(path = %source_path.display(), warning = %warning, "Render warning");
        }

        Ok(Content {
            url: page_url(route, document),
            title: result.title,
            html: result.html,
            warnings: processor.warnings().to_vec(),
        })
    }

    fn layout(
        &self,
        route: &str,
        group: &SidebarGroup,
        document: &str,
        content: Content,
        titles: &HashMap<String, String>,
    ) -> Page {
        let site_title = &self.config.site.title;
        let title = match &content.title {
            Some(page_title) if page_title != site_title => format!("{page_title} | {site_title}"),
            _ => site_title.clone(),
        };

        let edit_url = self
            .edit_path(group, document)
            .and_then(|relative| self.config.theme.edit_url(&relative));

        let groups = self.sidebar.get(route).map_or(&[][..], Vec::as_slice);
        let html = Layout {
            config: self.config,
            groups,
            route,
            url: &content.url,
            title: &title,
            content: &content.html,
            titles,
            analytics: self.analytics.as_ref(),
            edit_url: edit_url.as_deref(),
        }
        .render();

        Page {
            output_path: output_path(route, document),
            url: content.url,
            title,
            html,
            warnings: content.warnings,
        }
    }

    /// Document path relative to the content root, with `/` separators.
    fn edit_path(&self, group: &SidebarGroup, document: &str) -> Option<String> {
        let relative = group
            .folder
            .join(document)
            .strip_prefix(&self.config.build_resolved.content_root)
            .ok()?
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/");
        Some(relative)
    }
}

/// Output path of a document relative to the output directory.
fn output_path(route: &str, document: &str) -> PathBuf {
    route
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect::<PathBuf>()
        .join(page_file_name(document))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const CONFIG: &str = r##"
[site]
lang = "en-DE"
title = "rport"
description = "Remote access made easy"

[theme]
logo = "logo/rport-img-text.svg"
repo = "cloudradar-monitoring/rport"
repo_label = "Github-Repo"

[[head]]
tag = "meta"
attrs = { name = "theme-color", content = "#0075ec" }

[[navbar]]
text = "Documentation"
link = "/docs/"

[[navbar]]
text = "Help"
link = "https://github.com/cloudradar-monitoring/rport/discussions"

[define]
__GA4_ID__ = "G-QVHYG93PE3"

[analytics]
provider = "ga4"
id = "G-QVHYG93PE3"
"##;

    fn fixture() -> (tempfile::TempDir, Config) {
        let dir = tempfile::tempdir().unwrap();
        let docs = dir.path().join("docs");
        fs::create_dir_all(&docs).unwrap();
        fs::write(docs.join("README.md"), "# rport\n\nWelcome.\n").unwrap();
        fs::write(
            docs.join("install.md"),
            "# Installation\n\n::: vimeo https://player.vimeo.com/video/999\n:::\n\nDone.\n",
        )
        .unwrap();
        fs::write(docs.join("notes.txt"), "not a page").unwrap();
        fs::create_dir_all(docs.join("img")).unwrap();

        let config = Config::from_toml_str(CONFIG, dir.path()).unwrap();
        (dir, config)
    }

    #[test]
    fn test_output_path() {
        assert_eq!(output_path("/docs/", "README.md"), PathBuf::from("docs/index.html"));
        assert_eq!(
            output_path("/docs/", "install.md"),
            PathBuf::from("docs/install.html")
        );
        assert_eq!(output_path("/", "about.md"), PathBuf::from("about.html"));
    }

    #[test]
    fn test_load_builds_sidebar() {
        let (_dir, config) = fixture();
        let site = Site::load(&config).unwrap();

        let groups = &site.sidebar()["/docs/"];
        assert_eq!(groups.len(), 1);
        let mut children = groups[0].children.clone();
        children.sort();
        assert_eq!(children, vec!["README.md".to_owned(), "install.md".to_owned()]);
    }

    #[test]
    fn test_load_missing_folder() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::from_toml_str("", dir.path()).unwrap();

        let result = Site::load(&config);

        assert!(matches!(result, Err(SiteError::Sidebar(_))));
    }

    #[test]
    fn test_render_page() {
        let (_dir, config) = fixture();
        let site = Site::load(&config).unwrap();
        let group = &site.sidebar()["/docs/"][0];

        let page = site.render_page("/docs/", group, "install.md").unwrap();

        assert_eq!(page.url, "/docs/install.html");
        assert_eq!(page.output_path, PathBuf::from("docs/install.html"));
        assert_eq!(page.title, "Installation | rport");
        assert!(page.html.contains("<title>Installation | rport</title>"));
        assert!(page.html.contains(
            "<iframe src=\"https://player.vimeo.com/video/999?byline=0&portrait=0\" allow=\"autoplay; fullscreen; picture-in-picture\" allowfullscreen></iframe>"
        ));
        assert!(page.html.contains("<p>Done.</p>"));
        assert!(page.html.contains(r#"<html lang="en-DE">"#));
        assert!(page.html.contains(r##"<meta content="#0075ec" name="theme-color">"##));
        assert!(page.html.contains("var __GA4_ID__ = \"G-QVHYG93PE3\";"));
        assert!(page.html.contains("docsiteEnableAnalytics"));
        let body = page.html.find("<body>").unwrap();
        let banner = page.html.find(r#"id="docsite-consent""#).unwrap();
        let bootstrap = page.html.find("window.docsiteEnableAnalytics = function").unwrap();
        assert!(bootstrap < page.html.find("</head>").unwrap());
        assert!(body < banner);
        assert!(page.html[body..].starts_with("<body>\n<div class=\"consent-banner\""));
        assert!(page.html.contains(r#"<a href="/docs/install.html" class="active">Installation</a>"#));
        assert!(page.html.contains(r#"<a href="/docs/">README</a>"#));
        assert!(page.html.contains(r#"<img class="logo" src="/logo/rport-img-text.svg" alt="rport">"#));
        assert!(page.html.contains("https://github.com/cloudradar-monitoring/rport\" target=\"_blank\""));
        assert!(!page.html.contains("Edit this page"));
        assert!(page.warnings.is_empty());
    }

    #[test]
    fn test_page_title_same_as_site_title() {
        let (_dir, config) = fixture();
        let site = Site::load(&config).unwrap();
        let group = &site.sidebar()["/docs/"][0];

        let page = site.render_page("/docs/", group, "README.md").unwrap();

        assert_eq!(page.title, "rport");
        assert_eq!(page.output_path, PathBuf::from("docs/index.html"));
    }

    #[test]
    fn test_edit_link() {
        let (dir, _) = fixture();
        let toml = format!("{CONFIG}\n");
        let toml = toml.replace(
            "repo_label = \"Github-Repo\"",
            "repo_label = \"Github-Repo\"\nedit_link = true",
        );
        let config = Config::from_toml_str(&toml, dir.path()).unwrap();
        let site = Site::load(&config).unwrap();
        let group = &site.sidebar()["/docs/"][0];

        let page = site.render_page("/docs/", group, "install.md").unwrap();

        assert!(page.html.contains(
            "https://github.com/cloudradar-monitoring/rport/edit/main/docs/install.md"
        ));
    }

    #[test]
    fn test_build_writes_pages() {
        let (dir, config) = fixture();
        let site = Site::load(&config).unwrap();
        let out = dir.path().join("dist");

        let report = site.build(&out).unwrap();

        assert_eq!(report.pages, 2);
        assert!(report.warnings.is_empty());
        let index = fs::read_to_string(out.join("docs/index.html")).unwrap();
        let install = fs::read_to_string(out.join("docs/install.html")).unwrap();
        assert!(index.contains("<p>Welcome.</p>"));
        assert!(index.contains(r#"<a href="/docs/install.html">Installation</a>"#));
        assert!(install.contains(r#"<a href="/docs/">rport</a>"#));
        assert!(!out.join("docs/notes.html").exists());
    }

    #[test]
    fn test_build_collects_warnings() {
        let (dir, config) = fixture();
        fs::write(
            dir.path().join("docs/broken.md"),
            "::: vimeo https://vimeo.com/1\n",
        )
        .unwrap();
        let site = Site::load(&config).unwrap();

        let report = site.build(&dir.path().join("dist")).unwrap();

        assert_eq!(report.pages, 3);
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].starts_with("/docs/broken.html: "));
    }

    #[test]
    fn test_build_rejects_duplicate_pages() {
        let (dir, _) = fixture();
        let guides = dir.path().join("guides");
        fs::create_dir_all(&guides).unwrap();
        fs::write(guides.join("README.md"), "# Guides\n").unwrap();
        let toml = format!(
            "{CONFIG}\n[[sidebar]]\nroute = \"/docs/\"\ntext = \"Documentation\"\nfolder = \"docs\"\n\n\
             [[sidebar]]\nroute = \"/docs/\"\ntext = \"Guides\"\nfolder = \"guides\"\n"
        );
        let config = Config::from_toml_str(&toml, dir.path()).unwrap();
        let site = Site::load(&config).unwrap();
        let out = dir.path().join("dist");

        let err = site.build(&out).unwrap_err();

        match err {
            SiteError::DuplicatePage { url, first, second } => {
                assert_eq!(url, "/docs/");
                let mut sources = [first, second];
                sources.sort();
                assert_eq!(
                    sources,
                    [dir.path().join("docs/README.md"), guides.join("README.md")]
                );
            }
            other => panic!("Expected DuplicatePage error, got {other:?}"),
        }
        assert!(!out.join("docs/index.html").exists());
    }

    #[test]
    fn test_base_prefix() {
        let (dir, _) = fixture();
        let toml = CONFIG.replace("lang = \"en-DE\"", "lang = \"en-DE\"\nbase = \"/rport/\"");
        let config = Config::from_toml_str(&toml, dir.path()).unwrap();
        let site = Site::load(&config).unwrap();
        let group = &site.sidebar()["/docs/"][0];

        let page = site.render_page("/docs/", group, "README.md").unwrap();

        assert!(page.html.contains(r#"<a href="/rport/docs/" class="active">rport</a>"#));
        assert!(page.html.contains(r#"<a href="/rport/docs/">Documentation</a>"#));
    }

    #[test]
    fn test_no_analytics_section() {
        let (dir, _) = fixture();
        let toml = CONFIG.replace("[analytics]\nprovider = \"ga4\"\nid = \"G-QVHYG93PE3\"\n", "");
        let config = Config::from_toml_str(&toml, dir.path()).unwrap();
        let site = Site::load(&config).unwrap();
        let group = &site.sidebar()["/docs/"][0];

        let page = site.render_page("/docs/", group, "README.md").unwrap();

        assert!(!page.html.contains("docsiteEnableAnalytics"));
    }
}
