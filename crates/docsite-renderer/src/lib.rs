//! Markdown rendering with pluggable container blocks.
//!
//! Rendering happens in two steps:
//!
//! 1. [`ContainerProcessor`] replaces `:::` container fences with the HTML
//!    produced by registered [`ContainerPlugin`]s.
//! 2. [`MarkdownRenderer`] renders the result to HTML with pulldown-cmark;
//!    container output passes through as raw HTML blocks.
//!
//! # Example
//!
//! ```
//! use docsite_renderer::{ContainerProcessor, MarkdownRenderer, VimeoContainer};
//!
//! let markdown = "# Demo\n\n::: vimeo https://player.vimeo.com/video/1\n:::\n";
//! let mut processor = ContainerProcessor::new().with_container(VimeoContainer::new());
//! let processed = processor.process(markdown);
//!
//! let result = MarkdownRenderer::new()
//!     .with_title_extraction()
//!     .render(&processed);
//! assert_eq!(result.title.as_deref(), Some("Demo"));
//! assert!(result.html.contains(r#"<div class="iframe-container">"#));
//! ```

mod container;
mod escape;
mod fence;
mod markdown;

pub use container::{
    ContainerBlock, ContainerPlugin, ContainerProcessor, Nesting, VimeoContainer,
};
pub use escape::escape_html;
pub use markdown::{MarkdownRenderer, RenderResult};
