//! Configuration management for docsite.
//!
//! Parses `docsite.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `site.base`
//! - `define.*`
//! - `analytics.id`

mod expand;

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the directory sidebar folders are resolved against.
    pub content_root: Option<PathBuf>,
    /// Override the output directory.
    pub out_dir: Option<PathBuf>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "docsite.toml";

/// Site configuration.
///
/// Passed explicitly to whatever assembles the site; there is no global
/// settings object.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Site metadata.
    pub site: SiteConfig,
    /// Theme options.
    pub theme: ThemeConfig,
    /// Extra tags emitted into every page's `<head>`.
    pub head: Vec<HeadTag>,
    /// Navigation bar links.
    pub navbar: Vec<NavLink>,
    /// Sidebar sections, each generated from a documentation folder.
    #[serde(default = "default_sidebar")]
    pub sidebar: Vec<SidebarSection>,
    /// Build-time constants exposed to client scripts.
    pub define: BTreeMap<String, String>,
    /// Analytics integration (optional section).
    pub analytics: Option<AnalyticsConfig>,
    /// Build configuration (paths are relative strings from TOML).
    build: BuildConfigRaw,

    /// Resolved build configuration (set after loading).
    #[serde(skip)]
    pub build_resolved: BuildConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Site metadata.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Base URL path the site is served under. Must start and end with `/`.
    pub base: String,
    /// Value of the `lang` attribute on `<html>`.
    pub lang: String,
    /// Site title.
    pub title: String,
    /// Site description (`<meta name="description">`).
    pub description: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base: "/".to_owned(),
            lang: "en-US".to_owned(),
            title: "Documentation".to_owned(),
            description: String::new(),
        }
    }
}

/// Theme options.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Logo image path, relative to the site base.
    pub logo: Option<String>,
    /// Repository in `owner/name` form or a full URL.
    pub repo: Option<String>,
    /// Label for the repository link.
    pub repo_label: Option<String>,
    /// Show "edit this page" links (requires `repo`).
    pub edit_link: bool,
    /// Branch edit links point at.
    pub docs_branch: Option<String>,
}

impl ThemeConfig {
    /// Repository URL, expanding `owner/name` shorthand to GitHub.
    #[must_use]
    pub fn repo_url(&self) -> Option<String> {
        let repo = self.repo.as_deref()?;
        if is_external_link(repo) {
            Some(repo.to_owned())
        } else {
            Some(format!("https://github.com/{repo}"))
        }
    }

    /// URL for editing `relative_path` in the repository, if edit links are enabled.
    #[must_use]
    pub fn edit_url(&self, relative_path: &str) -> Option<String> {
        if !self.edit_link {
            return None;
        }
        let repo = self.repo_url()?;
        let branch = self.docs_branch.as_deref().unwrap_or("main");
        Some(format!("{repo}/edit/{branch}/{relative_path}"))
    }
}

/// A tag emitted into `<head>`, e.g. a favicon `<link>` or a `<meta>`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HeadTag {
    /// Element name (`link`, `meta`, ...).
    pub tag: String,
    /// Element attributes.
    #[serde(default)]
    pub attrs: BTreeMap<String, String>,
}

/// A navigation bar link.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NavLink {
    /// Link text.
    pub text: String,
    /// Target: site-relative path or external URL.
    pub link: String,
}

impl NavLink {
    /// True if the link points outside the site.
    #[must_use]
    pub fn is_external(&self) -> bool {
        is_external_link(&self.link)
    }
}

/// A sidebar section generated from a documentation folder.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SidebarSection {
    /// Route prefix the section applies to (e.g. `/docs/`).
    pub route: String,
    /// Group heading.
    pub text: String,
    /// Folder, relative to the content root, to list documents from.
    pub folder: String,
}

fn default_sidebar() -> Vec<SidebarSection> {
    vec![SidebarSection {
        route: "/docs/".to_owned(),
        text: "Documentation".to_owned(),
        folder: "docs".to_owned(),
    }]
}

/// Analytics provider.
///
/// GA4 and GTM are alternative integrations; a site selects exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalyticsProvider {
    /// Google Analytics 4 (`gtag.js`).
    Ga4,
    /// Google Tag Manager.
    Gtm,
}

/// Analytics configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AnalyticsConfig {
    /// Which provider to load.
    pub provider: AnalyticsProvider,
    /// Measurement ID (`G-...`) or container ID (`GTM-...`).
    pub id: String,
    /// Start with analytics enabled instead of waiting for opt-in.
    #[serde(default)]
    pub consent_by_default: bool,
}

impl AnalyticsConfig {
    /// Validate the ID against the provider's format.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if the ID is empty or has the wrong prefix.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.id, "analytics.id")?;
        let prefix = match self.provider {
            AnalyticsProvider::Ga4 => "G-",
            AnalyticsProvider::Gtm => "GTM-",
        };
        if !self.id.starts_with(prefix) {
            return Err(ConfigError::Validation(format!(
                "analytics.id must start with {prefix} for provider {:?}",
                self.provider
            )));
        }
        Ok(())
    }
}

/// Raw build configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct BuildConfigRaw {
    content_root: Option<String>,
    out_dir: Option<String>,
}

/// Resolved build configuration with absolute paths.
#[derive(Debug, Default)]
pub struct BuildConfig {
    /// Directory sidebar folders are resolved against.
    pub content_root: PathBuf,
    /// Directory rendered pages are written to.
    pub out_dir: PathBuf,
}

impl BuildConfig {
    /// Absolute path of a sidebar section's folder.
    #[must_use]
    pub fn folder_path(&self, section: &SidebarSection) -> PathBuf {
        self.content_root.join(&section.folder)
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`analytics.id`").
        field: String,
        /// Error message (e.g., "${`GA4_ID`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a route-like field to start and end with `/`.
fn require_slashes(value: &str, field: &str) -> Result<(), ConfigError> {
    if !value.starts_with('/') || !value.ends_with('/') {
        return Err(ConfigError::Validation(format!(
            "{field} must start and end with /"
        )));
    }
    Ok(())
}

fn is_external_link(link: &str) -> bool {
    link.starts_with("http://") || link.starts_with("https://")
}

/// Valid names for build-time constants: identifier characters only.
fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `docsite.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(content_root) = &settings.content_root {
            self.build_resolved.content_root.clone_from(content_root);
        }
        if let Some(out_dir) = &settings.out_dir {
            self.build_resolved.out_dir.clone_from(out_dir);
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            site: SiteConfig::default(),
            theme: ThemeConfig::default(),
            head: Vec::new(),
            navbar: Vec::new(),
            sidebar: default_sidebar(),
            define: BTreeMap::new(),
            analytics: None,
            build: BuildConfigRaw::default(),
            build_resolved: BuildConfig {
                content_root: base.to_path_buf(),
                out_dir: base.join("dist"),
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&content, path.parent().unwrap_or(Path::new(".")))?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Parse, expand, resolve and validate configuration from TOML source.
    ///
    /// Relative paths are resolved against `config_dir`.
    ///
    /// # Errors
    ///
    /// Returns error if parsing, expansion or validation fails.
    pub fn from_toml_str(content: &str, config_dir: &Path) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;
        config.resolve_paths(config_dir);

        // Validate configuration after loading and resolution
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Checks that all required fields are properly set and contain valid values.
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_site()?;
        self.validate_head()?;
        self.validate_navigation()?;
        self.validate_define()?;
        if let Some(analytics) = &self.analytics {
            analytics.validate()?;
        }
        Ok(())
    }

    fn validate_site(&self) -> Result<(), ConfigError> {
        require_slashes(&self.site.base, "site.base")?;
        require_non_empty(&self.site.title, "site.title")?;
        require_non_empty(&self.site.lang, "site.lang")?;
        Ok(())
    }

    fn validate_head(&self) -> Result<(), ConfigError> {
        for tag in &self.head {
            if tag.tag.is_empty() || !tag.tag.chars().all(|c| c.is_ascii_alphanumeric()) {
                return Err(ConfigError::Validation(format!(
                    "head tag name {:?} is not a valid element name",
                    tag.tag
                )));
            }
        }
        Ok(())
    }

    fn validate_navigation(&self) -> Result<(), ConfigError> {
        for link in &self.navbar {
            require_non_empty(&link.text, "navbar.text")?;
            require_non_empty(&link.link, "navbar.link")?;
        }
        for section in &self.sidebar {
            require_slashes(&section.route, "sidebar.route")?;
            require_non_empty(&section.folder, "sidebar.folder")?;
        }
        Ok(())
    }

    fn validate_define(&self) -> Result<(), ConfigError> {
        if let Some(name) = self.define.keys().find(|name| !is_valid_identifier(name)) {
            return Err(ConfigError::Validation(format!(
                "define key {name:?} is not a valid identifier"
            )));
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.site.base = expand::expand_env(&self.site.base, "site.base")?;

        for (name, value) in &mut self.define {
            *value = expand::expand_env(value, &format!("define.{name}"))?;
        }

        if let Some(ref mut analytics) = self.analytics {
            analytics.id = expand::expand_env(&analytics.id, "analytics.id")?;
        }

        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.build_resolved = BuildConfig {
            content_root: self
                .build
                .content_root
                .as_deref()
                .map_or_else(|| config_dir.to_path_buf(), |p| config_dir.join(p)),
            out_dir: config_dir.join(self.build.out_dir.as_deref().unwrap_or("dist")),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const RPORT_TOML: &str = r##"
[site]
base = "/"
lang = "en-DE"
title = "rport"
description = "Manage remote servers without VPNs"

[theme]
logo = "logo/rport-img-text.svg"
repo = "cloudradar-monitoring/rport"
repo_label = "Github-Repo"

[[head]]
tag = "link"
attrs = { rel = "icon", type = "image/png", sizes = "16x16", href = "/favicon/favicon-16x16.png" }

[[head]]
tag = "meta"
attrs = { name = "theme-color", content = "#0075ec" }

[[navbar]]
text = "Documentation"
link = "/docs/"

[[navbar]]
text = "Wiki"
link = "https://github.com/cloudradar-monitoring/rport/wiki"

[[sidebar]]
route = "/docs/"
text = "Documentation"
folder = "docs"

[define]
__GA4_ID__ = "G-QVHYG93PE3"

[analytics]
provider = "ga4"
id = "G-QVHYG93PE3"
"##;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));
        assert_eq!(config.site.base, "/");
        assert_eq!(config.site.lang, "en-US");
        assert_eq!(config.build_resolved.content_root, PathBuf::from("/test"));
        assert_eq!(config.build_resolved.out_dir, PathBuf::from("/test/dist"));
        assert_eq!(config.sidebar, default_sidebar());
        assert!(config.analytics.is_none());
        config.validate().unwrap();
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.site.title, "Documentation");
        assert_eq!(config.sidebar.len(), 1);
        assert_eq!(config.sidebar[0].folder, "docs");
    }

    #[test]
    fn test_parse_full_config() {
        let config = Config::from_toml_str(RPORT_TOML, Path::new("/project")).unwrap();

        assert_eq!(config.site.title, "rport");
        assert_eq!(config.site.lang, "en-DE");
        assert_eq!(config.head.len(), 2);
        assert_eq!(config.head[0].tag, "link");
        assert_eq!(
            config.head[0].attrs.get("sizes").map(String::as_str),
            Some("16x16")
        );
        assert_eq!(config.navbar.len(), 2);
        assert!(!config.navbar[0].is_external());
        assert!(config.navbar[1].is_external());
        assert_eq!(
            config.define.get("__GA4_ID__").map(String::as_str),
            Some("G-QVHYG93PE3")
        );
        let analytics = config.analytics.unwrap();
        assert_eq!(analytics.provider, AnalyticsProvider::Ga4);
        assert!(!analytics.consent_by_default);
        assert_eq!(config.build_resolved.content_root, PathBuf::from("/project"));
    }

    #[test]
    fn test_repo_url_shorthand() {
        let theme = ThemeConfig {
            repo: Some("cloudradar-monitoring/rport".to_owned()),
            ..Default::default()
        };
        assert_eq!(
            theme.repo_url().as_deref(),
            Some("https://github.com/cloudradar-monitoring/rport")
        );

        let theme = ThemeConfig {
            repo: Some("https://gitlab.com/org/repo".to_owned()),
            ..Default::default()
        };
        assert_eq!(theme.repo_url().as_deref(), Some("https://gitlab.com/org/repo"));
        assert!(ThemeConfig::default().repo_url().is_none());
    }

    #[test]
    fn test_edit_url() {
        let mut theme = ThemeConfig {
            repo: Some("cloudradar-monitoring/rport".to_owned()),
            ..Default::default()
        };
        assert!(theme.edit_url("docs/README.md").is_none());

        theme.edit_link = true;
        assert_eq!(
            theme.edit_url("docs/README.md").as_deref(),
            Some("https://github.com/cloudradar-monitoring/rport/edit/main/docs/README.md")
        );

        theme.docs_branch = Some("develop".to_owned());
        assert_eq!(
            theme.edit_url("docs/a.md").as_deref(),
            Some("https://github.com/cloudradar-monitoring/rport/edit/develop/docs/a.md")
        );
    }

    #[test]
    fn test_resolve_paths() {
        let toml = r#"
[build]
content_root = "site"
out_dir = "public"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(
            config.build_resolved.content_root,
            PathBuf::from("/project/site")
        );
        assert_eq!(config.build_resolved.out_dir, PathBuf::from("/project/public"));
        assert_eq!(
            config.build_resolved.folder_path(&config.sidebar[0]),
            PathBuf::from("/project/site/docs")
        );
    }

    #[test]
    fn test_base_must_have_slashes() {
        let toml = r#"
[site]
base = "docs"
"#;
        let err = Config::from_toml_str(toml, Path::new("/project")).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("site.base"));
    }

    #[test]
    fn test_sidebar_route_must_have_slashes() {
        let toml = r#"
[[sidebar]]
route = "/docs"
text = "Docs"
folder = "docs"
"#;
        let err = Config::from_toml_str(toml, Path::new("/project")).unwrap_err();
        assert!(err.to_string().contains("sidebar.route"));
    }

    #[test]
    fn test_analytics_id_prefix() {
        let toml = r#"
[analytics]
provider = "gtm"
id = "G-QVHYG93PE3"
"#;
        let err = Config::from_toml_str(toml, Path::new("/project")).unwrap_err();
        assert!(err.to_string().contains("GTM-"));

        let toml = r#"
[analytics]
provider = "gtm"
id = "GTM-ABCDEF"
consent_by_default = true
"#;
        let config = Config::from_toml_str(toml, Path::new("/project")).unwrap();
        let analytics = config.analytics.unwrap();
        assert_eq!(analytics.provider, AnalyticsProvider::Gtm);
        assert!(analytics.consent_by_default);
    }

    #[test]
    fn test_unknown_provider_is_parse_error() {
        let toml = r#"
[analytics]
provider = "matomo"
id = "1"
"#;
        let err = Config::from_toml_str(toml, Path::new("/project")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_invalid_define_name() {
        let toml = r#"
[define]
"not valid" = "x"
"#;
        let err = Config::from_toml_str(toml, Path::new("/project")).unwrap_err();
        assert!(err.to_string().contains("not valid"));
    }

    #[test]
    fn test_invalid_head_tag() {
        let toml = r#"
[[head]]
tag = "script><img"
"#;
        let err = Config::from_toml_str(toml, Path::new("/project")).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_env_expansion_with_default() {
        let toml = r#"
[define]
__GA4_ID__ = "${DOCSITE_TEST_UNSET_GA4:-G-DEFAULT}"

[analytics]
provider = "ga4"
id = "${DOCSITE_TEST_UNSET_GA4:-G-DEFAULT}"
"#;
        let config = Config::from_toml_str(toml, Path::new("/project")).unwrap();
        assert_eq!(config.analytics.unwrap().id, "G-DEFAULT");
        assert_eq!(config.define["__GA4_ID__"], "G-DEFAULT");
    }

    #[test]
    fn test_env_expansion_missing_var() {
        let toml = r#"
[analytics]
provider = "ga4"
id = "${DOCSITE_TEST_UNSET_GA4}"
"#;
        let err = Config::from_toml_str(toml, Path::new("/project")).unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
    }

    #[test]
    fn test_apply_cli_settings() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            out_dir: Some(PathBuf::from("/tmp/out")),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.build_resolved.out_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.build_resolved.content_root, PathBuf::from("/test"));
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, RPORT_TOML).unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.config_path.as_deref(), Some(path.as_path()));
        assert_eq!(config.build_resolved.out_dir, dir.path().join("dist"));
    }

    #[test]
    fn test_load_missing_path() {
        let result = Config::load(Some(Path::new("/nonexistent/docsite.toml")), None);
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }
}
