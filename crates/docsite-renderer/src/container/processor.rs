//! Container preprocessing.
//!
//! Runs before pulldown-cmark and replaces container fences with rendered HTML.

use crate::fence::CodeFences;

use super::parser::{Fence, parse_fence};
use super::{ContainerBlock, ContainerPlugin};

/// An open container waiting for its closing fence.
struct OpenContainer {
    /// Index into the registered plugins.
    plugin: usize,
    /// Colon count of the opening fence.
    colons: usize,
    info: String,
}

/// Replaces container fences in markdown with plugin output.
///
/// Opening fences are offered to each registered plugin in registration order;
/// the first whose [`validate`](ContainerPlugin::validate) accepts the
/// parameters handles the block. Fences no plugin accepts, and closing fences
/// with nothing open, are left as they are.
///
/// Rendered markup is separated from the surrounding lines by blank lines so
/// that `CommonMark` treats it as a raw HTML block while the block's content
/// is still rendered as markdown.
///
/// # Example
///
/// ```
/// use docsite_renderer::{ContainerProcessor, VimeoContainer};
///
/// let mut processor = ContainerProcessor::new().with_container(VimeoContainer::new());
/// let output = processor.process("::: vimeo https://player.vimeo.com/video/7\n:::\n");
///
/// assert!(output.contains("https://player.vimeo.com/video/7?byline=0&portrait=0"));
/// assert!(output.contains("</div>"));
/// ```
#[derive(Default)]
pub struct ContainerProcessor {
    plugins: Vec<Box<dyn ContainerPlugin>>,
    open: Vec<OpenContainer>,
    warnings: Vec<String>,
}

impl ContainerProcessor {
    /// Create a processor with no plugins registered.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a container plugin.
    #[must_use]
    pub fn with_container<P: ContainerPlugin + 'static>(mut self, plugin: P) -> Self {
        self.plugins.push(Box::new(plugin));
        self
    }

    /// Names of the registered plugins, in registration order.
    pub fn plugin_names(&self) -> impl Iterator<Item = &str> {
        self.plugins.iter().map(|plugin| plugin.name())
    }

    /// Warnings collected by previous [`process`](Self::process) calls.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Replace container fences in `input` with rendered HTML.
    ///
    /// Containers still open at the end of the input are closed there and a
    /// warning is recorded.
    #[must_use]
    pub fn process(&mut self, input: &str) -> String {
        let mut output = String::with_capacity(input.len());
        let mut fences = CodeFences::new();

        for line in input.lines() {
            if fences.update(line) || fences.in_fence() {
                push_line(&mut output, line);
                continue;
            }

            match parse_fence(line).and_then(|fence| self.handle_fence(fence)) {
                Some(html) => push_html_block(&mut output, &html),
                None => push_line(&mut output, line),
            }
        }

        while let Some(open) = self.open.pop() {
            let name = self.plugins[open.plugin].name();
            tracing::warn!(container = name, "Container left open at end of input");
            self.warnings
                .push(format!("Unclosed '{name}' container: {}", open.info.trim()));
            let html = self.plugins[open.plugin].render(&ContainerBlock::closing(open.info));
            push_html_block(&mut output, &html);
        }

        output
    }

    /// Render a fence line, or `None` if it passes through unchanged.
    fn handle_fence(&mut self, fence: Fence<'_>) -> Option<String> {
        match fence {
            Fence::Open { colons, params } => {
                let plugin = self.plugins.iter().position(|p| p.validate(params))?;
                let html = self.plugins[plugin].render(&ContainerBlock::opening(params));
                self.open.push(OpenContainer {
                    plugin,
                    colons,
                    info: params.to_owned(),
                });
                Some(html)
            }
            Fence::Close { colons } => {
                if self.open.last()?.colons > colons {
                    return None;
                }
                let open = self.open.pop()?;
                Some(self.plugins[open.plugin].render(&ContainerBlock::closing(open.info)))
            }
        }
    }
}

fn push_line(output: &mut String, line: &str) {
    output.push_str(line);
    output.push('\n');
}

/// Append `html` as a standalone block, surrounded by blank lines.
fn push_html_block(output: &mut String, html: &str) {
    if !output.is_empty() && !output.ends_with("\n\n") {
        output.push('\n');
    }
    output.push_str(html.trim_end_matches('\n'));
    output.push_str("\n\n");
}
