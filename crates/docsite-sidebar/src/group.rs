//! Sidebar groups keyed by route prefix.

use std::collections::BTreeMap;
use std::path::PathBuf;

use docsite_config::{BuildConfig, SidebarSection};
use serde::Serialize;

use crate::{SidebarError, build_sidebar};

/// Document name that becomes the index page of its route.
const INDEX_DOCUMENT: &str = "README.md";

/// A titled group of sidebar documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SidebarGroup {
    /// Group heading.
    pub text: String,
    /// Always true; groups are rendered as headings rather than links.
    pub is_group: bool,
    /// Document names in filesystem enumeration order.
    pub children: Vec<String>,
    /// Folder the children were listed from.
    #[serde(skip)]
    pub folder: PathBuf,
}

impl SidebarGroup {
    /// Page URLs for the group's children under `route`.
    #[must_use]
    pub fn links(&self, route: &str) -> Vec<String> {
        self.children
            .iter()
            .map(|child| page_url(route, child))
            .collect()
    }
}

/// Sidebar groups keyed by the route prefix they apply to.
pub type SidebarMap = BTreeMap<String, Vec<SidebarGroup>>;

/// Build one group per configured section.
///
/// Sections sharing a route are appended to the same entry in configuration
/// order.
///
/// # Errors
///
/// Returns the first [`SidebarError`] raised while listing a section folder.
pub fn build_sidebar_map(
    build: &BuildConfig,
    sections: &[SidebarSection],
) -> Result<SidebarMap, SidebarError> {
    let mut map = SidebarMap::new();
    for section in sections {
        let folder = build.folder_path(section);
        let children = build_sidebar(&folder)?;
        tracing::info!(
            route = %section.route,
            folder = %section.folder,
            documents = children.len(),
            "Sidebar section built"
        );
        map.entry(section.route.clone())
            .or_default()
            .push(SidebarGroup {
                text: section.text.clone(),
                is_group: true,
                children,
                folder,
            });
    }
    Ok(map)
}

/// Output file name for a document.
///
/// Examples:
/// - `README.md` -> `index.html`
/// - `install.md` -> `install.html`
#[must_use]
pub fn page_file_name(document: &str) -> String {
    if document == INDEX_DOCUMENT {
        return "index.html".to_owned();
    }
    let stem = document.strip_suffix(".md").unwrap_or(document);
    format!("{stem}.html")
}

/// URL of a document's page under `route`.
///
/// Examples (route `/docs/`):
/// - `README.md` -> `/docs/`
/// - `install.md` -> `/docs/install.html`
#[must_use]
pub fn page_url(route: &str, document: &str) -> String {
    if document == INDEX_DOCUMENT {
        route.to_owned()
    } else {
        format!("{route}{}", page_file_name(document))
    }
}
