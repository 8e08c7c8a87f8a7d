//! Custom container blocks.
//!
//! A container is a fenced block opened by a line of three or more colons
//! followed by parameters, and closed by a line of colons:
//!
//! ```text
//! ::: vimeo https://player.vimeo.com/video/12345
//! :::
//! ```
//!
//! Each [`ContainerPlugin`] decides through [`validate`](ContainerPlugin::validate)
//! whether it handles a block, then renders its opening and closing markup.

mod parser;
mod processor;
mod vimeo;

pub use processor::ContainerProcessor;
pub use vimeo::VimeoContainer;

/// Which boundary of a container block is being rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nesting {
    /// The opening fence (`::: name params`).
    Opening,
    /// The closing fence (`:::`).
    Closing,
}

/// One boundary of a container block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerBlock {
    /// Opening or closing boundary.
    pub nesting: Nesting,
    /// Raw text following the colons of the opening fence.
    ///
    /// Closing blocks carry the info string of the block they close.
    pub info: String,
}

impl ContainerBlock {
    /// Opening boundary with the given info string.
    #[must_use]
    pub fn opening(info: impl Into<String>) -> Self {
        Self {
            nesting: Nesting::Opening,
            info: info.into(),
        }
    }

    /// Closing boundary for a block opened with `info`.
    #[must_use]
    pub fn closing(info: impl Into<String>) -> Self {
        Self {
            nesting: Nesting::Closing,
            info: info.into(),
        }
    }
}

/// Handler for a named container type.
///
/// Plugins are stateless: the same block always renders the same markup.
///
/// # Example
///
/// ```
/// use docsite_renderer::{ContainerBlock, ContainerPlugin, Nesting};
///
/// struct Tip;
///
/// impl ContainerPlugin for Tip {
///     fn name(&self) -> &str { "tip" }
///
///     fn validate(&self, params: &str) -> bool {
///         params.trim() == "tip"
///     }
///
///     fn render(&self, block: &ContainerBlock) -> String {
///         match block.nesting {
///             Nesting::Opening => r#"<div class="tip">"#.to_owned(),
///             Nesting::Closing => "</div>\n".to_owned(),
///         }
///     }
/// }
/// ```
pub trait ContainerPlugin: Send {
    /// Container type name (e.g., "vimeo").
    fn name(&self) -> &str;

    /// Whether this plugin handles a block with the given parameters.
    ///
    /// `params` is the raw text after the opening colons, surrounding
    /// whitespace included. Blocks no plugin validates are left to the
    /// markdown renderer untouched.
    fn validate(&self, params: &str) -> bool;

    /// Render the markup for one boundary of the block.
    fn render(&self, block: &ContainerBlock) -> String;
}
