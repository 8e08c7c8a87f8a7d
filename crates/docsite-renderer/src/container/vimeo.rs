//! Vimeo player container.

use std::sync::LazyLock;

use regex::Regex;

use super::{ContainerBlock, ContainerPlugin, Nesting};

static VIMEO_PARAMS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^vimeo\s(.*)$").unwrap());

/// Query string appended to every player URL.
const PLAYER_QUERY: &str = "?byline=0&portrait=0";

/// Embeds a Vimeo player.
///
/// ```text
/// ::: vimeo https://player.vimeo.com/video/12345
/// :::
/// ```
///
/// renders to
///
/// ```html
/// <div class="iframe-container">
/// <iframe src="https://player.vimeo.com/video/12345?byline=0&portrait=0" allow="autoplay; fullscreen; picture-in-picture" allowfullscreen></iframe>
/// </div>
/// ```
///
/// The URL is embedded verbatim. Container content comes from hand-written
/// documentation, so no escaping is applied.
#[derive(Debug, Default, Clone, Copy)]
pub struct VimeoContainer;

impl VimeoContainer {
    /// Create the container plugin.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ContainerPlugin for VimeoContainer {
    fn name(&self) -> &'static str {
        "vimeo"
    }

    fn validate(&self, params: &str) -> bool {
        VIMEO_PARAMS.is_match(params.trim())
    }

    fn render(&self, block: &ContainerBlock) -> String {
        match block.nesting {
            Nesting::Opening => match block.info.split_whitespace().nth(1) {
                Some(url) => format!(
                    "<div class=\"iframe-container\">\n<iframe src=\"{url}{PLAYER_QUERY}\" allow=\"autoplay; fullscreen; picture-in-picture\" allowfullscreen></iframe>"
                ),
                None => {
                    tracing::warn!(info = %block.info, "vimeo container without a video URL");
                    "<div class=\"iframe-container\">".to_owned()
                }
            },
            Nesting::Closing => "</div>\n".to_owned(),
        }
    }
}
